use crate::foundation::error::{SlideError, SlideResult};

/// Width of the one supported slide geometry (QVGA).
pub const QVGA_WIDTH: u16 = 320;
/// Height of the one supported slide geometry (QVGA).
pub const QVGA_HEIGHT: u16 = 240;

/// Pixel layouts understood by the compositing engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    /// 16-bit packed 5:6:5, little-endian.
    #[default]
    Rgb565,
    /// 24-bit, bytes in R, G, B order.
    Rgb888,
    /// 32-bit little-endian word `0x00RRGGBB` (bytes B, G, R, X).
    Xrgb8888,
}

impl PixelFormat {
    /// Storage size of one pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb565 => 2,
            Self::Rgb888 => 3,
            Self::Xrgb8888 => 4,
        }
    }

    /// Decode the pixel at the start of `px` to 8-bit R, G, B.
    pub fn read_rgb(self, px: &[u8]) -> [u8; 3] {
        match self {
            Self::Rgb565 => unpack_rgb565(u16::from_le_bytes([px[0], px[1]])),
            Self::Rgb888 => [px[0], px[1], px[2]],
            Self::Xrgb8888 => [px[2], px[1], px[0]],
        }
    }

    /// Encode 8-bit R, G, B into the pixel at the start of `px`.
    pub fn write_rgb(self, px: &mut [u8], rgb: [u8; 3]) {
        match self {
            Self::Rgb565 => {
                let [lo, hi] = pack_rgb565(rgb[0], rgb[1], rgb[2]).to_le_bytes();
                px[0] = lo;
                px[1] = hi;
            }
            Self::Rgb888 => px[..3].copy_from_slice(&rgb),
            Self::Xrgb8888 => {
                px[0] = rgb[2];
                px[1] = rgb[1];
                px[2] = rgb[0];
                px[3] = 0;
            }
        }
    }
}

/// Pack 8-bit channels into RGB565, truncating the low bits.
pub fn pack_rgb565(r: u8, g: u8, b: u8) -> u16 {
    ((u16::from(r) & 0xF8) << 8) | ((u16::from(g) & 0xFC) << 3) | (u16::from(b) >> 3)
}

/// Expand RGB565 to 8-bit channels, replicating the high bits into the low ones.
pub fn unpack_rgb565(px: u16) -> [u8; 3] {
    let r5 = ((px >> 11) & 0x1F) as u8;
    let g6 = ((px >> 5) & 0x3F) as u8;
    let b5 = (px & 0x1F) as u8;
    [(r5 << 3) | (r5 >> 2), (g6 << 2) | (g6 >> 4), (b5 << 3) | (b5 >> 2)]
}

/// A pixel position in destination (output) space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Corner {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
}

impl Corner {
    /// Top-left pixel.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Corner at column `x`, row `y`.
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Rectangle given by inclusive upper-left and lower-right corners, the way the engine's
/// corner registers describe it. `ulc` beyond `lrc` on either axis is an empty rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CornerRect {
    /// Upper-left corner.
    pub ulc: Corner,
    /// Lower-right corner.
    pub lrc: Corner,
}

impl CornerRect {
    /// Rectangle from its two inclusive corners.
    pub const fn new(ulc: Corner, lrc: Corner) -> Self {
        Self { ulc, lrc }
    }

    /// The rectangle covering a whole `width` x `height` frame.
    pub fn full(width: u16, height: u16) -> Self {
        Self {
            ulc: Corner::ORIGIN,
            lrc: Corner::new(width.saturating_sub(1), height.saturating_sub(1)),
        }
    }

    /// Covers no pixel.
    pub fn is_empty(self) -> bool {
        self.ulc.x > self.lrc.x || self.ulc.y > self.lrc.y
    }

    /// `(x, y)` lies inside, corners included.
    pub fn contains(self, x: u16, y: u16) -> bool {
        self.ulc.x <= x && x <= self.lrc.x && self.ulc.y <= y && y <= self.lrc.y
    }
}

/// Output flip applied by the engine after compositing.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Flip {
    /// Mirror left to right.
    pub horizontal: bool,
    /// Mirror top to bottom.
    pub vertical: bool,
}

impl Flip {
    /// No mirroring.
    pub const NONE: Self = Self {
        horizontal: false,
        vertical: false,
    };

    /// Parse `none`, `h`, `v` or `hv` (also `horizontal`, `vertical`, `both`).
    pub fn parse(s: &str) -> SlideResult<Self> {
        let flip = match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "off" => Self::NONE,
            "h" | "horizontal" => Self {
                horizontal: true,
                vertical: false,
            },
            "v" | "vertical" => Self {
                horizontal: false,
                vertical: true,
            },
            "hv" | "vh" | "both" => Self {
                horizontal: true,
                vertical: true,
            },
            other => {
                return Err(SlideError::validation(format!("unknown flip '{other}'")));
            }
        };
        Ok(flip)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
