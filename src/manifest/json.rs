use serde::Deserialize;
use url::Url;

use crate::error::Result;
use crate::manifest::{ManifestParser, SlideRecord, SlideTable};

#[derive(Deserialize, Debug)]
struct SlidesDocument {
    slides: Vec<Option<SlideEntry>>,
}

#[derive(Deserialize, Debug)]
struct SlideEntry {
    time: u64,
    image: SlideImage,
}

#[derive(Deserialize, Debug)]
struct SlideImage {
    name: String,
}

/// `slides.json` as served under `<id>/v1/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonManifest;

impl ManifestParser for JsonManifest {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn url(&self, base_data_url: &str, video_id: &str) -> Result<Url> {
        Ok(Url::parse(&format!("{}{}/v1/slides.json", base_data_url, video_id))?)
    }

    fn parse(&self, bytes: &[u8]) -> Result<SlideTable> {
        let document: SlidesDocument = serde_json::from_slice(bytes)?;

        let records = document
            .slides
            .into_iter()
            .enumerate()
            .map(|(index, entry)| match entry {
                Some(entry) => SlideRecord::Valid {
                    time: entry.time,
                    name: entry.image.name,
                },
                None => SlideRecord::Malformed {
                    index,
                    time: None,
                    name: None,
                },
            })
            .collect();

        Ok(SlideTable { records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn parses_entries_in_manifest_order() {
        let manifest = br#"{
            "slide_qualities": ["medium", "big"],
            "slides": [
                {"time": 0, "type": "image", "image": {"name": "00001", "extname": ".png"}},
                {"time": 61250, "image": {"name": "00002"}},
                {"time": 30000, "image": {"name": "00003"}}
            ]
        }"#;

        let table = JsonManifest.parse(manifest).unwrap();

        assert_eq!(
            table.records,
            vec![
                SlideRecord::Valid { time: 0, name: "00001".into() },
                SlideRecord::Valid { time: 61250, name: "00002".into() },
                SlideRecord::Valid { time: 30000, name: "00003".into() },
            ]
        );
    }

    #[test]
    fn null_entries_keep_their_row() {
        let manifest = br#"{"slides": [null, {"time": 5, "image": {"name": "x"}}, null]}"#;

        let table = JsonManifest.parse(manifest).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.records[0],
            SlideRecord::Malformed { index: 0, time: None, name: None }
        );
        assert_eq!(table.records[1], SlideRecord::Valid { time: 5, name: "x".into() });
        assert!(matches!(table.records[2], SlideRecord::Malformed { index: 2, .. }));
    }

    #[test]
    fn entries_without_an_image_name_are_rejected() {
        let manifest = br#"{"slides": [{"time": 5, "image": {}}]}"#;

        assert!(matches!(JsonManifest.parse(manifest), Err(Error::Json(_))));
    }

    #[test]
    fn url_points_at_versioned_slides_json() {
        let url = JsonManifest.url("https://cdn.example.com/data/presentations/", "38956520").unwrap();
        assert_eq!(
            url.as_str(),
            "https://cdn.example.com/data/presentations/38956520/v1/slides.json"
        );
    }
}
