use std::io::{self, Read};

use anyhow::Context;

use crate::{
    foundation::core::{PixelFormat, QVGA_HEIGHT, QVGA_WIDTH, pack_rgb565},
    foundation::error::{SlideError, SlideResult},
    render::passes::CacheBarrier,
    render::surface::Surface,
};

/// Size of the file header plus the 40-byte info header.
pub const BMP_HEADER_LEN: usize = 54;
/// Pixel payload of a 320x240 24-bit bitmap (rows are already 4-byte aligned).
pub const QVGA_RGB888_IMAGE_SIZE: u32 = QVGA_WIDTH as u32 * QVGA_HEIGHT as u32 * 3;

const BMP_SIGNATURE: u16 = 0x4D42; // "BM"

/// The fixed 54-byte header in front of every supported slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmpHeader {
    /// `"BM"` read as a little-endian `u16`.
    pub signature: u16,
    /// Total file size in bytes.
    pub file_size: u32,
    /// Unused, written as 0.
    pub reserved1: u16,
    /// Unused, written as 0.
    pub reserved2: u16,
    /// Byte offset of the first pixel row.
    pub pixel_offset: u32,
    /// Size of the info header (40).
    pub header_size: u32,
    /// Width in pixels.
    pub width: i32,
    /// Positive = rows stored bottom to top, negative = top to bottom.
    pub height: i32,
    /// Colour planes (1).
    pub planes: u16,
    /// Bits per pixel.
    pub bit_count: u16,
    /// Compression method; 0 is uncompressed RGB.
    pub compression: u32,
    /// Pixel payload size in bytes.
    pub image_size: u32,
    /// Horizontal resolution hint.
    pub x_pels_per_meter: i32,
    /// Vertical resolution hint.
    pub y_pels_per_meter: i32,
    /// Palette entries in use.
    pub colors_used: u32,
    /// Palette entries required.
    pub colors_important: u32,
}

impl BmpHeader {
    /// Header of a bottom-up 320x240 RGB888 bitmap.
    pub fn qvga_rgb888() -> Self {
        Self {
            signature: BMP_SIGNATURE,
            file_size: BMP_HEADER_LEN as u32 + QVGA_RGB888_IMAGE_SIZE,
            reserved1: 0,
            reserved2: 0,
            pixel_offset: BMP_HEADER_LEN as u32,
            header_size: 40,
            width: i32::from(QVGA_WIDTH),
            height: i32::from(QVGA_HEIGHT),
            planes: 1,
            bit_count: 24,
            compression: 0,
            image_size: QVGA_RGB888_IMAGE_SIZE,
            x_pels_per_meter: 0,
            y_pels_per_meter: 0,
            colors_used: 0,
            colors_important: 0,
        }
    }

    /// Read the little-endian header fields. No validation happens here.
    pub fn parse(b: &[u8; BMP_HEADER_LEN]) -> Self {
        let u16_at = |o: usize| u16::from_le_bytes([b[o], b[o + 1]]);
        let u32_at = |o: usize| u32::from_le_bytes([b[o], b[o + 1], b[o + 2], b[o + 3]]);
        let i32_at = |o: usize| i32::from_le_bytes([b[o], b[o + 1], b[o + 2], b[o + 3]]);
        Self {
            signature: u16_at(0),
            file_size: u32_at(2),
            reserved1: u16_at(6),
            reserved2: u16_at(8),
            pixel_offset: u32_at(10),
            header_size: u32_at(14),
            width: i32_at(18),
            height: i32_at(22),
            planes: u16_at(26),
            bit_count: u16_at(28),
            compression: u32_at(30),
            image_size: u32_at(34),
            x_pels_per_meter: i32_at(38),
            y_pels_per_meter: i32_at(42),
            colors_used: u32_at(46),
            colors_important: u32_at(50),
        }
    }

    /// Little-endian encoding of the header.
    pub fn to_bytes(&self) -> [u8; BMP_HEADER_LEN] {
        let mut b = [0u8; BMP_HEADER_LEN];
        b[0..2].copy_from_slice(&self.signature.to_le_bytes());
        b[2..6].copy_from_slice(&self.file_size.to_le_bytes());
        b[6..8].copy_from_slice(&self.reserved1.to_le_bytes());
        b[8..10].copy_from_slice(&self.reserved2.to_le_bytes());
        b[10..14].copy_from_slice(&self.pixel_offset.to_le_bytes());
        b[14..18].copy_from_slice(&self.header_size.to_le_bytes());
        b[18..22].copy_from_slice(&self.width.to_le_bytes());
        b[22..26].copy_from_slice(&self.height.to_le_bytes());
        b[26..28].copy_from_slice(&self.planes.to_le_bytes());
        b[28..30].copy_from_slice(&self.bit_count.to_le_bytes());
        b[30..34].copy_from_slice(&self.compression.to_le_bytes());
        b[34..38].copy_from_slice(&self.image_size.to_le_bytes());
        b[38..42].copy_from_slice(&self.x_pels_per_meter.to_le_bytes());
        b[42..46].copy_from_slice(&self.y_pels_per_meter.to_le_bytes());
        b[46..50].copy_from_slice(&self.colors_used.to_le_bytes());
        b[50..54].copy_from_slice(&self.colors_important.to_le_bytes());
        b
    }

    /// Accept only uncompressed 24-bit 320x(+/-240) bitmaps with the exact QVGA payload size.
    pub fn validate_qvga(&self) -> SlideResult<()> {
        if self.signature != BMP_SIGNATURE {
            return Err(SlideError::format(format!(
                "bad signature {:#06x}",
                self.signature
            )));
        }
        if self.width != i32::from(QVGA_WIDTH)
            || self.height.unsigned_abs() != u32::from(QVGA_HEIGHT)
        {
            return Err(SlideError::format(format!(
                "geometry {}x{} is not {QVGA_WIDTH}x{QVGA_HEIGHT}",
                self.width, self.height
            )));
        }
        if self.bit_count != 24 || self.compression != 0 {
            return Err(SlideError::format(format!(
                "{} bpp with compression {} is not uncompressed true-color",
                self.bit_count, self.compression
            )));
        }
        if self.image_size != QVGA_RGB888_IMAGE_SIZE {
            return Err(SlideError::format(format!(
                "image size {} != {QVGA_RGB888_IMAGE_SIZE}",
                self.image_size
            )));
        }
        if (self.pixel_offset as usize) < BMP_HEADER_LEN {
            return Err(SlideError::format(format!(
                "pixel data offset {} overlaps the header",
                self.pixel_offset
            )));
        }
        Ok(())
    }

    /// Rows are stored bottom to top.
    pub fn is_bottom_up(&self) -> bool {
        self.height > 0
    }
}

fn read_fully<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8], what: &str) -> SlideResult<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => SlideError::format(format!("truncated {what}")),
        _ => SlideError::io(format!("read {what}: {e}")),
    })
}

/// Decode a QVGA RGB888 bitmap from `reader` into `dst` as RGB565, top row first.
///
/// The header and the whole payload are read before `dst` is written, so a rejected or
/// truncated file leaves `dst` untouched. On success the written surface is passed through
/// `barrier` before returning.
pub fn load_qvga_bmp<R, B>(
    reader: &mut R,
    dst: &mut Surface<'_>,
    barrier: &mut B,
) -> SlideResult<()>
where
    R: Read + ?Sized,
    B: CacheBarrier + ?Sized,
{
    let desc = dst.desc();
    if desc.width != QVGA_WIDTH || desc.height != QVGA_HEIGHT || desc.format != PixelFormat::Rgb565
    {
        return Err(SlideError::validation(format!(
            "bitmap destination must be {QVGA_WIDTH}x{QVGA_HEIGHT} Rgb565, got {}x{} {:?}",
            desc.width, desc.height, desc.format
        )));
    }

    let mut raw = [0u8; BMP_HEADER_LEN];
    read_fully(reader, &mut raw, "header")?;
    let hdr = BmpHeader::parse(&raw);
    hdr.validate_qvga()?;
    tracing::debug!(
        width = hdr.width,
        height = hdr.height,
        offset = hdr.pixel_offset,
        "bitmap header accepted"
    );

    let gap = u64::from(hdr.pixel_offset) - BMP_HEADER_LEN as u64;
    if gap > 0 {
        let skipped = io::copy(&mut (&mut *reader).take(gap), &mut io::sink())
            .map_err(|e| SlideError::io(format!("skip to pixel data: {e}")))?;
        if skipped != gap {
            return Err(SlideError::format("truncated gap before pixel data"));
        }
    }

    let mut payload = vec![0u8; QVGA_RGB888_IMAGE_SIZE as usize];
    read_fully(reader, &mut payload, "pixel data")?;

    let width = usize::from(QVGA_WIDTH);
    let height = usize::from(QVGA_HEIGHT);
    let bottom_up = hdr.is_bottom_up();
    let pixels = dst.pixels_mut();
    for (file_row, src) in payload.chunks_exact(width * 3).enumerate() {
        let y = if bottom_up {
            height - 1 - file_row
        } else {
            file_row
        };
        let row = &mut pixels[y * width * 2..(y + 1) * width * 2];
        for (bgr, out) in src.chunks_exact(3).zip(row.chunks_exact_mut(2)) {
            let px = pack_rgb565(bgr[2], bgr[1], bgr[0]);
            out.copy_from_slice(&px.to_le_bytes());
        }
    }

    barrier.reconcile(dst.pixels());
    dst.take_dirty();
    Ok(())
}

/// Encode top-to-bottom RGB8 pixels (320x240) as a bottom-up QVGA RGB888 bitmap.
pub fn encode_qvga_bmp(rgb: &[u8]) -> SlideResult<Vec<u8>> {
    let row_len = usize::from(QVGA_WIDTH) * 3;
    if rgb.len() != QVGA_RGB888_IMAGE_SIZE as usize {
        return Err(SlideError::validation(format!(
            "expected {QVGA_RGB888_IMAGE_SIZE} RGB bytes, got {}",
            rgb.len()
        )));
    }
    let mut out = Vec::with_capacity(BMP_HEADER_LEN + rgb.len());
    out.extend_from_slice(&BmpHeader::qvga_rgb888().to_bytes());
    for row in rgb.chunks_exact(row_len).rev() {
        for px in row.chunks_exact(3) {
            out.extend_from_slice(&[px[2], px[1], px[0]]);
        }
    }
    Ok(out)
}

/// Decode any image the `image` crate understands, resize it to 320x240 and encode it as a
/// slide bitmap.
pub fn convert_to_qvga_bmp(bytes: &[u8]) -> SlideResult<Vec<u8>> {
    let img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgb = img
        .resize_exact(
            u32::from(QVGA_WIDTH),
            u32::from(QVGA_HEIGHT),
            image::imageops::FilterType::Triangle,
        )
        .to_rgb8();
    encode_qvga_bmp(rgb.as_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/bmp.rs"]
mod tests;
