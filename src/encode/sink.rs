use crate::render::surface::{Surface, SurfaceDesc};

/// Output callback: receives the output surface once per produced frame.
///
/// The surface is reused for the next frame, so implementations must copy anything they want to
/// keep before returning.
pub trait FrameSink {
    /// Called once per composited frame, in presentation order.
    fn present(&mut self, frame: &Surface<'_>);
}

impl<F> FrameSink for F
where
    F: FnMut(&Surface<'_>),
{
    fn present(&mut self, frame: &Surface<'_>) {
        self(frame)
    }
}

/// A presented frame copied out of the output surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedFrame {
    /// Output geometry at capture time.
    pub desc: SurfaceDesc,
    /// Copy of the output pixels.
    pub pixels: Vec<u8>,
}

impl CapturedFrame {
    /// 8-bit R, G, B of pixel `(x, y)`.
    pub fn rgb(&self, x: u16, y: u16) -> [u8; 3] {
        let off = self.desc.offset_of(x, y);
        self.desc.format.read_rgb(&self.pixels[off..])
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    frames: Vec<CapturedFrame>,
    /// Keep pixel copies; when false only the frame count is tracked.
    keep_pixels: bool,
    presented: u64,
}

impl InMemorySink {
    /// Sink that keeps a copy of every frame.
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            keep_pixels: true,
            presented: 0,
        }
    }

    /// Sink that only counts frames.
    pub fn counting() -> Self {
        Self {
            keep_pixels: false,
            ..Self::default()
        }
    }

    /// Captured frames, oldest first.
    pub fn frames(&self) -> &[CapturedFrame] {
        &self.frames
    }

    /// Frames presented, captured or not.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Drop captured frames and reset the count.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.presented = 0;
    }
}

impl FrameSink for InMemorySink {
    fn present(&mut self, frame: &Surface<'_>) {
        self.presented += 1;
        if self.keep_pixels {
            self.frames.push(CapturedFrame {
                desc: frame.desc(),
                pixels: frame.pixels().to_vec(),
            });
        }
    }
}
