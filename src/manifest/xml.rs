use quick_xml::events::Event;
use quick_xml::Reader as XmlReader;
use url::Url;

use crate::error::{Error, Result};
use crate::manifest::{ManifestParser, SlideRecord, SlideTable};

const TIME_TAG: &[u8] = b"time";
const NAME_TAGS: [&[u8]; 2] = [b"slideName", b"slide-name"];

/// `<id>.xml`: a root element with one child per slide, each slide carrying
/// `<time>` and `<slideName>` elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlManifest;

#[derive(Debug, Clone, Copy)]
enum Column {
    Time,
    Name,
}

#[derive(Debug, Default)]
struct Node {
    time: Option<String>,
    name: Option<String>,
}

impl Node {
    fn is_set(&self, column: Column) -> bool {
        match column {
            Column::Time => self.time.is_some(),
            Column::Name => self.name.is_some(),
        }
    }

    fn slot(&mut self, column: Column) -> &mut Option<String> {
        match column {
            Column::Time => &mut self.time,
            Column::Name => &mut self.name,
        }
    }

    fn into_record(self, index: usize) -> Result<SlideRecord> {
        let time = match self.time {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(time) => Some(time),
                Err(_) => return Err(Error::InvalidTime { index, value }),
            },
            None => None,
        };

        Ok(SlideRecord::from_fields(index, time, self.name))
    }
}

fn column(tag: &[u8]) -> Option<Column> {
    if tag == TIME_TAG {
        Some(Column::Time)
    } else if NAME_TAGS.iter().any(|name| *name == tag) {
        Some(Column::Name)
    } else {
        None
    }
}

impl ManifestParser for XmlManifest {
    fn extension(&self) -> &'static str {
        "xml"
    }

    fn url(&self, base_data_url: &str, video_id: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{0}{1}/{1}.xml", base_data_url, video_id))?)
    }

    fn parse(&self, bytes: &[u8]) -> Result<SlideTable> {
        let mut reader = XmlReader::from_reader(bytes);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut depth = 0usize;
        let mut nodes: Vec<Node> = Vec::new();
        let mut node: Option<Node> = None;
        // column currently being read and its text so far
        let mut field: Option<(Column, String)> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    depth += 1;
                    match depth {
                        2 => node = Some(Node::default()),
                        3 => {
                            // only the first matching child counts
                            field = match (column(e.name().as_ref()), node.as_mut()) {
                                (Some(column), Some(node)) if !node.is_set(column) => {
                                    Some((column, String::new()))
                                }
                                _ => None,
                            };
                        }
                        _ => {}
                    }
                }
                Event::Empty(e) => match depth + 1 {
                    2 => nodes.push(Node::default()),
                    3 => {
                        if let (Some(column), Some(node)) = (column(e.name().as_ref()), node.as_mut()) {
                            if !node.is_set(column) {
                                *node.slot(column) = Some(String::new());
                            }
                        }
                    }
                    _ => {}
                },
                Event::Text(e) if depth == 3 => {
                    if let Some((_, text)) = field.as_mut() {
                        text.push_str(&e.unescape()?);
                    }
                }
                Event::CData(e) if depth == 3 => {
                    if let Some((_, text)) = field.as_mut() {
                        text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Event::End(_) => {
                    match depth {
                        3 => {
                            if let (Some((column, text)), Some(node)) = (field.take(), node.as_mut()) {
                                *node.slot(column) = Some(text);
                            }
                        }
                        2 => {
                            if let Some(node) = node.take() {
                                nodes.push(node);
                            }
                        }
                        _ => {}
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        let records = nodes
            .into_iter()
            .enumerate()
            .map(|(index, node)| node.into_record(index))
            .collect::<Result<Vec<_>>>()?;

        Ok(SlideTable { records })
    }
}
