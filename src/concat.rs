//! ffmpeg concat demuxer input for turning the slides into a video.
//!
//! See <https://trac.ffmpeg.org/wiki/Slideshow>.

use std::fmt::Write as _;
use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::manifest::Slide;

pub const CONCAT_FILE_NAME: &str = "ffmpeg_concat.txt";

/// How long the last slide is shown, the manifest has no end time for it.
pub const LAST_SLIDE_SECONDS: u64 = 30;

/// Renders `(time in ms, file reference)` pairs as a concat list.
///
/// Every file after the first is preceded by the duration of the one before
/// it. The last file is listed a second time without a duration because the
/// demuxer ignores the duration of the final entry otherwise.
pub fn render(entries: &[(u64, String)]) -> String {
    let mut out = String::new();

    let Some(((first_time, first_file), rest)) = entries.split_first() else {
        return out;
    };

    let _ = writeln!(out, "file '{}'", first_file);

    let mut last_time = *first_time;
    for (time, file) in rest {
        let seconds = time.saturating_sub(last_time) / 1000;
        let _ = writeln!(out, "duration {}", seconds);
        let _ = writeln!(out, "file '{}'", file);
        last_time = *time;
    }

    let last_file = rest.last().map_or(first_file, |(_, file)| file);
    let _ = writeln!(out, "duration {}", LAST_SLIDE_SECONDS);
    let _ = writeln!(out, "file '{}'", last_file);

    out
}

/// Writes the concat list for `slides` into `folder`.
///
/// Returns `false` and leaves the file untouched when it already exists.
pub fn write_concat_file(folder: &Path, slides: &[Slide], size: &str) -> Result<bool> {
    let path = folder.join(CONCAT_FILE_NAME);
    if path.exists() {
        debug!("{} already exists, not regenerating it", path.display());
        return Ok(false);
    }

    if slides.is_empty() {
        return Ok(false);
    }

    // paths are resolved relative to the concat file by ffmpeg
    let entries = slides
        .iter()
        .map(|slide| (slide.time, format!("slides/{}", slide.file_name(size))))
        .collect::<Vec<_>>();

    std::fs::write(&path, render(&entries))?;
    info!("Wrote {}", path.display());

    Ok(true)
}
