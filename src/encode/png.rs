use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    encode::sink::FrameSink,
    foundation::error::{SlideError, SlideResult},
    render::surface::Surface,
};

/// Writes every presented frame to `<dir>/frame_NNNNN.png`.
///
/// `present` cannot fail, so the first write error is kept and reported by
/// [`PngDirSink::finish`]; later frames are skipped once an error is recorded.
#[derive(Debug)]
pub struct PngDirSink {
    dir: PathBuf,
    next_index: u64,
    error: Option<SlideError>,
}

impl PngDirSink {
    /// Create the sink, creating `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>) -> SlideResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create frame dir '{}'", dir.display()))?;
        Ok(Self {
            dir,
            next_index: 0,
            error: None,
        })
    }

    /// Directory frames are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Frames presented so far.
    pub fn frames_written(&self) -> u64 {
        self.next_index
    }

    /// Path of frame `index`.
    pub fn frame_path(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{index:05}.png"))
    }

    /// Number of frames written, or the first error hit while writing.
    pub fn finish(self) -> SlideResult<u64> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.next_index),
        }
    }

    fn write(&self, frame: &Surface<'_>, path: &Path) -> SlideResult<()> {
        image::save_buffer_with_format(
            path,
            &frame.to_rgb8(),
            u32::from(frame.width()),
            u32::from(frame.height()),
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

impl FrameSink for PngDirSink {
    fn present(&mut self, frame: &Surface<'_>) {
        if self.error.is_some() {
            return;
        }
        let path = self.frame_path(self.next_index);
        match self.write(frame, &path) {
            Ok(()) => self.next_index += 1,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "frame write failed");
                self.error = Some(e);
            }
        }
    }
}
