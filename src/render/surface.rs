use crate::{
    foundation::core::{PixelFormat, QVGA_HEIGHT, QVGA_WIDTH},
    foundation::error::{SlideError, SlideResult},
    render::passes::PassIo,
};

/// Geometry and layout of a surface as programmed into the compositing engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceDesc {
    /// Width in pixels.
    pub width: u16,
    /// Height in pixels.
    pub height: u16,
    /// Pixel layout.
    pub format: PixelFormat,
}

impl SurfaceDesc {
    /// Descriptor of a tightly packed `width` x `height` surface.
    pub const fn new(width: u16, height: u16, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
        }
    }

    /// `width * height * bytes_per_pixel(format)`.
    pub fn byte_len(self) -> usize {
        self.pitch() * usize::from(self.height)
    }

    /// Bytes per row.
    pub fn pitch(self) -> usize {
        usize::from(self.width) * self.format.bytes_per_pixel()
    }

    /// Byte offset of pixel `(x, y)`.
    pub fn offset_of(self, x: u16, y: u16) -> usize {
        usize::from(y) * self.pitch() + usize::from(x) * self.format.bytes_per_pixel()
    }
}

/// A pixel buffer descriptor over caller-owned memory.
///
/// The engine never allocates or frees pixel memory; it borrows it for the lifetime of a
/// session. Software writes through [`Surface::pixels_mut`] mark the surface dirty so the
/// engine reconciles the cache before the compositor reads it.
#[derive(Debug)]
pub struct Surface<'a> {
    pixels: &'a mut [u8],
    width: u16,
    height: u16,
    format: PixelFormat,
    cpu_dirty: bool,
}

impl<'a> Surface<'a> {
    /// Wrap `pixels`, which must hold at least `width * height` pixels of `format`.
    pub fn new(
        pixels: &'a mut [u8],
        width: u16,
        height: u16,
        format: PixelFormat,
    ) -> SlideResult<Self> {
        let need = SurfaceDesc::new(width, height, format).byte_len();
        if width == 0 || height == 0 {
            return Err(SlideError::validation("surface dimensions must be > 0"));
        }
        if pixels.len() < need {
            return Err(SlideError::validation(format!(
                "surface buffer holds {} bytes, {width}x{height} {format:?} needs {need}",
                pixels.len()
            )));
        }
        Ok(Self {
            pixels,
            width,
            height,
            format,
            cpu_dirty: true,
        })
    }

    /// Current descriptor; the byte size is derived from it on every call.
    pub fn desc(&self) -> SurfaceDesc {
        SurfaceDesc::new(self.width, self.height, self.format)
    }

    /// Width in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Pixel layout.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes covered by the descriptor; the lent buffer may be longer.
    pub fn byte_len(&self) -> usize {
        self.desc().byte_len()
    }

    /// Read-only pixel view.
    pub fn pixels(&self) -> &[u8] {
        let len = self.byte_len();
        &self.pixels[..len]
    }

    /// Mutable pixel access for software writers. Marks the surface dirty.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        self.cpu_dirty = true;
        let len = self.byte_len();
        &mut self.pixels[..len]
    }

    /// Set every byte to `byte` (0 is black in every format).
    pub fn fill(&mut self, byte: u8) {
        self.pixels_mut().fill(byte);
    }

    /// 8-bit RGB of pixel `(x, y)`.
    pub fn pixel_rgb(&self, x: u16, y: u16) -> [u8; 3] {
        let off = self.desc().offset_of(x, y);
        self.format.read_rgb(&self.pixels[off..])
    }

    /// Write pixel `(x, y)` from 8-bit RGB. Marks the surface dirty.
    pub fn set_pixel_rgb(&mut self, x: u16, y: u16, rgb: [u8; 3]) {
        let off = self.desc().offset_of(x, y);
        let fmt = self.format;
        fmt.write_rgb(&mut self.pixels_mut()[off..], rgb);
    }

    /// Tightly packed RGB8 copy of the surface, row-major top to bottom.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let bpp = self.format.bytes_per_pixel();
        let mut out = Vec::with_capacity(usize::from(self.width) * usize::from(self.height) * 3);
        for px in self.pixels().chunks_exact(bpp) {
            out.extend_from_slice(&self.format.read_rgb(px));
        }
        out
    }

    /// Software wrote since the last cache reconciliation.
    pub fn is_dirty(&self) -> bool {
        self.cpu_dirty
    }

    /// Clear the dirty flag, returning whether it was set.
    pub(crate) fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.cpu_dirty, false)
    }

    /// Record that the compositor (not software) produced the current contents.
    pub(crate) fn mark_device_written(&mut self) {
        self.cpu_dirty = false;
    }
}

/// Which of the three fixed surfaces a value refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceRole {
    /// The displayed (or about to be displayed) image.
    Processing,
    /// The incoming image during a transition; scratch otherwise.
    Alpha,
    /// The composited frame handed to the output sink.
    Output,
}

/// The processing, alpha and output surfaces of one slideshow session.
#[derive(Debug)]
pub struct SurfaceSet<'a> {
    pub(crate) processing: Surface<'a>,
    pub(crate) alpha: Surface<'a>,
    pub(crate) output: Surface<'a>,
}

impl<'a> SurfaceSet<'a> {
    /// All three surfaces must be QVGA; processing and alpha must share a format so the alpha
    /// image can be copied into the processing surface byte for byte.
    pub fn new(
        processing: Surface<'a>,
        alpha: Surface<'a>,
        output: Surface<'a>,
    ) -> SlideResult<Self> {
        for (role, s) in [
            (SurfaceRole::Processing, &processing),
            (SurfaceRole::Alpha, &alpha),
            (SurfaceRole::Output, &output),
        ] {
            if s.width != QVGA_WIDTH || s.height != QVGA_HEIGHT {
                return Err(SlideError::validation(format!(
                    "{role:?} surface is {}x{}, expected {QVGA_WIDTH}x{QVGA_HEIGHT}",
                    s.width, s.height
                )));
            }
        }
        if processing.format != alpha.format {
            return Err(SlideError::validation(format!(
                "processing ({:?}) and alpha ({:?}) surfaces must share a pixel format",
                processing.format, alpha.format
            )));
        }
        Ok(Self {
            processing,
            alpha,
            output,
        })
    }

    /// Surface playing `role`.
    pub fn get(&self, role: SurfaceRole) -> &Surface<'a> {
        match role {
            SurfaceRole::Processing => &self.processing,
            SurfaceRole::Alpha => &self.alpha,
            SurfaceRole::Output => &self.output,
        }
    }

    /// Mutable surface playing `role`.
    pub fn get_mut(&mut self, role: SurfaceRole) -> &mut Surface<'a> {
        match role {
            SurfaceRole::Processing => &mut self.processing,
            SurfaceRole::Alpha => &mut self.alpha,
            SurfaceRole::Output => &mut self.output,
        }
    }

    /// The processing surface.
    pub fn processing(&self) -> &Surface<'a> {
        &self.processing
    }

    /// The alpha surface.
    pub fn alpha(&self) -> &Surface<'a> {
        &self.alpha
    }

    /// The output surface.
    pub fn output(&self) -> &Surface<'a> {
        &self.output
    }

    /// Byte-for-byte copy of the alpha image into the processing surface.
    pub(crate) fn copy_alpha_to_processing(&mut self) {
        let len = self.processing.byte_len();
        let src = &self.alpha.pixels[..len];
        self.processing.pixels_mut().copy_from_slice(src);
    }

    /// Lend the three buffers to the compositor for one pass.
    pub(crate) fn pass_io(&mut self) -> PassIo<'_> {
        let ps_len = self.processing.byte_len();
        let as_len = self.alpha.byte_len();
        let out_len = self.output.byte_len();
        PassIo {
            ps: &self.processing.pixels[..ps_len],
            alpha: &self.alpha.pixels[..as_len],
            out: &mut self.output.pixels[..out_len],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
