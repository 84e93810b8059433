use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use crate::foundation::{
    core::{Corner, CornerRect},
    error::{SlideError, SlideResult},
};

/// Number of stretch-in steps before the final full-frame pass (scale 0.05 ..= 0.95).
pub const STRETCH_STEPS: u16 = 19;
/// Scale fraction added per stretch-in step.
pub const STRETCH_INCREMENT: f32 = 0.05;

/// Direction the incoming image travels across the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WipeDir {
    /// Right to left.
    Left,
    /// Left to right.
    Right,
    /// Bottom to top.
    Up,
    /// Top to bottom.
    Down,
}

impl WipeDir {
    /// Sweeps along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Parse `left`/`right`/`up`/`down` or the `rtl`/`ltr`/`btt`/`ttb` shorthands.
    pub fn parse(s: &str) -> SlideResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "rtl" | "right_to_left" => Ok(Self::Left),
            "right" | "ltr" | "left_to_right" => Ok(Self::Right),
            "up" | "btt" | "bottom_to_top" => Ok(Self::Up),
            "down" | "ttb" | "top_to_bottom" => Ok(Self::Down),
            other => Err(SlideError::validation(format!("unknown direction '{other}'"))),
        }
    }
}

/// A pan-and-zoom window over the processing surface. Its height follows from the output
/// aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Window {
    /// First source row.
    pub top: u16,
    /// First source column.
    pub left: u16,
    /// Width in source pixels.
    pub width: u16,
}

impl Window {
    /// Window at (`left`, `top`) spanning `width` pixels.
    pub const fn new(top: u16, left: u16, width: u16) -> Self {
        Self { top, left, width }
    }

    fn parse(s: &str) -> SlideResult<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [top, left, width] = parts.as_slice() else {
            return Err(SlideError::validation(format!(
                "window '{s}' must be top,left,width"
            )));
        };
        let num = |v: &str| {
            v.parse::<u16>()
                .map_err(|e| SlideError::validation(format!("window value '{v}': {e}")))
        };
        Ok(Self::new(num(top)?, num(left)?, num(width)?))
    }
}

/// Ken-Burns pan/zoom path from `start` to `end` over `duration_ms` (0 = default duration).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct KenBurns {
    /// Window of the first frame.
    pub start: Window,
    /// Window of the last frame.
    pub end: Window,
    /// Total duration; 0 selects the configured default.
    #[serde(default)]
    pub duration_ms: u32,
}

impl KenBurns {
    /// Number of interpolation intervals; the effect presents `steps + 1` frames.
    pub fn steps(&self, step_ms: u32, default_ms: u32) -> u32 {
        let total = if self.duration_ms == 0 {
            default_ms
        } else {
            self.duration_ms
        };
        total / step_ms.max(1)
    }

    /// Window at `step` of `steps`: each field moves linearly by `step / steps` and truncates.
    pub fn window_at(&self, step: u32, steps: u32) -> Window {
        let fraction = if steps == 0 {
            1.0
        } else {
            step as f32 / steps as f32
        };
        let lerp = |a: u16, b: u16| (f32::from(a) + fraction * (f32::from(b) - f32::from(a))) as u16;
        Window {
            top: lerp(self.start.top, self.end.top),
            left: lerp(self.start.left, self.end.left),
            width: lerp(self.start.width, self.end.width),
        }
    }

    /// Both windows must be non-empty and lie inside a `src_width` x `src_height` surface
    /// when framed for an output whose lower-right corner is `out_lrc`.
    pub fn validate(&self, out_lrc: Corner, src_width: u16, src_height: u16) -> SlideResult<()> {
        for (name, w) in [("start", self.start), ("end", self.end)] {
            if w.width == 0 {
                return Err(SlideError::validation(format!(
                    "ken-burns {name} width must be > 0"
                )));
            }
            let h = window_height(w.width, out_lrc);
            if u32::from(w.left) + u32::from(w.width) > u32::from(src_width)
                || u32::from(w.top) + u32::from(h) > u32::from(src_height)
            {
                return Err(SlideError::validation(format!(
                    "ken-burns {name} window {}x{h} at ({}, {}) leaves the {src_width}x{src_height} surface",
                    w.width, w.left, w.top
                )));
            }
        }
        Ok(())
    }
}

/// Output aspect ratio taken from the output's lower-right corner register.
fn aspect(out_lrc: Corner) -> f32 {
    f32::from(out_lrc.x) / f32::from(out_lrc.y.max(1))
}

/// Height of a window of `width` that matches the output aspect ratio (truncated).
pub fn window_height(width: u16, out_lrc: Corner) -> u16 {
    (f32::from(width) / aspect(out_lrc)) as u16
}

/// Engine parameters for one Ken-Burns step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurnsFrame {
    /// First processing-surface pixel read.
    pub origin: Corner,
    /// Output scale so the window fills the output width.
    pub scale: f32,
    /// Rows covered by the window.
    pub window_height: u16,
}

/// Frame `win` to fill the output. With a vertically flipped output the top coordinate is
/// mirrored so the visible window still pans the intended way.
pub fn burns_frame(win: Window, out_lrc: Corner, src_height: u16, vflip: bool) -> BurnsFrame {
    let window_height = window_height(win.width, out_lrc);
    let scale = f32::from(out_lrc.x) / f32::from(win.width.max(1));
    let top = if vflip {
        src_height.saturating_sub(window_height).saturating_sub(win.top)
    } else {
        win.top
    };
    BurnsFrame {
        origin: Corner::new(win.left, top),
        scale,
        window_height,
    }
}

/// Blend level of dissolve ramp step `step`.
pub fn dissolve_level(step: u16, increment: u8) -> u8 {
    (u32::from(step) * u32::from(increment)).min(255) as u8
}

/// Destination rectangle and scale of stretch-in step `step` (1-based) for a `width` x
/// `height` output: the rectangle grows symmetrically around the centre.
pub fn stretch_frame(step: u16, width: u16, height: u16) -> (CornerRect, f32) {
    let (cx, cy) = (width / 2, height / 2);
    let hinc = (STRETCH_INCREMENT * f32::from(cx)) as u16;
    let vinc = (STRETCH_INCREMENT * f32::from(cy)) as u16;
    let (dx, dy) = (hinc.saturating_mul(step), vinc.saturating_mul(step));
    let rect = CornerRect::new(
        Corner::new(cx.saturating_sub(dx), cy.saturating_sub(dy)),
        Corner::new(cx.saturating_add(dx), cy.saturating_add(dy)),
    );
    (rect, f32::from(step) * STRETCH_INCREMENT)
}

/// Sweep positions of a wipe or push: `0, step_px, 2*step_px, ...` below the axis length.
pub fn edge_positions(dir: WipeDir, width: u16, height: u16, step_px: u16) -> Vec<u16> {
    let axis = if dir.is_horizontal() { width } else { height };
    (0..axis).step_by(usize::from(step_px.max(1))).collect()
}

/// Alpha-surface placement for one wipe step at sweep position `pos`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WipeFrame {
    /// Output region taken from the alpha surface.
    pub as_rect: CornerRect,
    /// First alpha-surface pixel read.
    pub as_origin: Corner,
}

/// Reveal the incoming image up to `pos` along `dir`; the rest of the frame keeps the
/// current image.
pub fn wipe_frame(dir: WipeDir, pos: u16, width: u16, height: u16) -> WipeFrame {
    let full = CornerRect::full(width, height);
    match dir {
        WipeDir::Right => WipeFrame {
            as_rect: CornerRect::new(full.ulc, Corner::new(pos, full.lrc.y)),
            as_origin: Corner::ORIGIN,
        },
        WipeDir::Left => {
            let x = width - pos;
            WipeFrame {
                as_rect: CornerRect::new(Corner::new(x, 0), full.lrc),
                as_origin: Corner::new(x, 0),
            }
        }
        WipeDir::Down => WipeFrame {
            as_rect: CornerRect::new(full.ulc, Corner::new(full.lrc.x, pos)),
            as_origin: Corner::ORIGIN,
        },
        WipeDir::Up => {
            let y = height - pos;
            WipeFrame {
                as_rect: CornerRect::new(Corner::new(0, y), full.lrc),
                as_origin: Corner::new(0, y),
            }
        }
    }
}

/// Placement of both surfaces for one push step: the outgoing image slides off while the
/// incoming one slides in behind it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PushFrame {
    /// Output region still showing the outgoing image.
    pub ps_rect: CornerRect,
    /// First processing-surface pixel read.
    pub ps_origin: Corner,
    /// Output region showing the incoming image.
    pub as_rect: CornerRect,
    /// First alpha-surface pixel read.
    pub as_origin: Corner,
}

/// Shift both images by `pos` along `dir`.
pub fn push_frame(dir: WipeDir, pos: u16, width: u16, height: u16) -> PushFrame {
    let full = CornerRect::full(width, height);
    let (right, bottom) = (full.lrc.x, full.lrc.y);
    match dir {
        WipeDir::Left => {
            let edge = right - pos;
            PushFrame {
                ps_rect: CornerRect::new(Corner::ORIGIN, Corner::new(edge, bottom)),
                ps_origin: Corner::new(pos, 0),
                as_rect: CornerRect::new(Corner::new(edge, 0), full.lrc),
                as_origin: Corner::ORIGIN,
            }
        }
        WipeDir::Right => PushFrame {
            ps_rect: CornerRect::new(Corner::new(pos, 0), full.lrc),
            ps_origin: Corner::ORIGIN,
            as_rect: CornerRect::new(Corner::ORIGIN, Corner::new(pos, bottom)),
            as_origin: Corner::new(right - pos, 0),
        },
        WipeDir::Up => {
            let edge = bottom - pos;
            PushFrame {
                ps_rect: CornerRect::new(Corner::ORIGIN, Corner::new(right, edge)),
                ps_origin: Corner::new(0, pos),
                as_rect: CornerRect::new(Corner::new(0, edge), full.lrc),
                as_origin: Corner::ORIGIN,
            }
        }
        WipeDir::Down => PushFrame {
            ps_rect: CornerRect::new(Corner::new(0, pos), full.lrc),
            ps_origin: Corner::ORIGIN,
            as_rect: CornerRect::new(Corner::ORIGIN, Corner::new(right, pos)),
            as_origin: Corner::new(0, bottom - pos),
        },
    }
}

/// One slideshow request.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
    /// Load and show without a transition.
    Display {
        /// Image file to load.
        file: String,
    },
    /// Re-present whatever the processing surface holds.
    Show,
    /// Cross-dissolve to `file`.
    Dissolve {
        /// Image file to load.
        file: String,
    },
    /// Dissolve from black to `file`.
    FadeIn {
        /// Image file to load.
        file: String,
    },
    /// Dissolve the current image to black.
    FadeOut,
    /// Zoom `file` in from the centre.
    Stretch {
        /// Image file to load.
        file: String,
    },
    /// Reveal `file` with an edge moving along `dir`.
    Wipe {
        /// Image file to load.
        file: String,
        /// Direction of travel.
        dir: WipeDir,
    },
    /// Slide `file` in along `dir`, pushing the current image out.
    Push {
        /// Image file to load.
        file: String,
        /// Direction of travel.
        dir: WipeDir,
    },
    /// Pan and zoom over `file`.
    KenBurns {
        /// Image file to load.
        file: String,
        /// Pan/zoom path.
        path: KenBurns,
    },
}

impl Transition {
    /// Short effect name used in logs and error reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Display { .. } => "display",
            Self::Show => "show",
            Self::Dissolve { .. } => "dissolve",
            Self::FadeIn { .. } => "fade-in",
            Self::FadeOut => "fade-out",
            Self::Stretch { .. } => "stretch",
            Self::Wipe { .. } => "wipe",
            Self::Push { .. } => "push",
            Self::KenBurns { .. } => "ken-burns",
        }
    }

    /// Slide the transition loads, if any.
    pub fn file(&self) -> Option<&str> {
        match self {
            Self::Display { file }
            | Self::Dissolve { file }
            | Self::FadeIn { file }
            | Self::Stretch { file }
            | Self::Wipe { file, .. }
            | Self::Push { file, .. }
            | Self::KenBurns { file, .. } => Some(file),
            Self::Show | Self::FadeOut => None,
        }
    }
}

/// Parse `effect[:file[:args...]]`, e.g. `dissolve:b.bmp`, `wipe-right:c.bmp`,
/// `ken-burns:d.bmp:0,0,320:60,80,160:3000`.
pub fn parse_transition(s: &str) -> SlideResult<Transition> {
    let mut parts = s.split(':');
    let kind = parts
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
        .replace('_', "-");
    if kind.is_empty() {
        return Err(SlideError::validation("transition kind must be non-empty"));
    }
    let mut file = || -> SlideResult<String> {
        match parts.next().map(str::trim) {
            Some(f) if !f.is_empty() => Ok(f.to_string()),
            _ => Err(SlideError::validation(format!(
                "transition '{kind}' needs a file name"
            ))),
        }
    };

    let t = match kind.as_str() {
        "display" | "show-file" => Transition::Display { file: file()? },
        "show" | "refresh" => Transition::Show,
        "dissolve" | "crossfade" => Transition::Dissolve { file: file()? },
        "fade-in" | "fadein" => Transition::FadeIn { file: file()? },
        "fade-out" | "fadeout" => Transition::FadeOut,
        "stretch" | "stretch-in" => Transition::Stretch { file: file()? },
        "ken-burns" | "kenburns" | "kb" => {
            let file = file()?;
            let start = parts
                .next()
                .ok_or_else(|| SlideError::validation("ken-burns needs a start window"))?;
            let end = parts
                .next()
                .ok_or_else(|| SlideError::validation("ken-burns needs an end window"))?;
            let duration_ms = match parts.next() {
                None => 0,
                Some(ms) => ms.trim().parse::<u32>().map_err(|e| {
                    SlideError::validation(format!("ken-burns duration '{ms}': {e}"))
                })?,
            };
            Transition::KenBurns {
                file,
                path: KenBurns {
                    start: Window::parse(start)?,
                    end: Window::parse(end)?,
                    duration_ms,
                },
            }
        }
        other => {
            if let Some(dir) = other.strip_prefix("wipe-") {
                let dir = WipeDir::parse(dir)?;
                Transition::Wipe { file: file()?, dir }
            } else if let Some(dir) = other.strip_prefix("push-") {
                let dir = WipeDir::parse(dir)?;
                Transition::Push { file: file()?, dir }
            } else {
                return Err(SlideError::validation(format!(
                    "unknown transition kind '{other}'"
                )));
            }
        }
    };
    let extra: Vec<&str> = parts.collect();
    if !extra.is_empty() {
        return Err(SlideError::validation(format!(
            "transition '{kind}' has unexpected trailing arguments ':{}'",
            extra.join(":")
        )));
    }
    Ok(t)
}

/// Read a JSON programme: an array of transitions tagged by `kind`, e.g.
/// `[{"kind": "display", "file": "a.bmp"}, {"kind": "wipe", "file": "b.bmp", "dir": "left"}]`.
pub fn programme_from_reader<R: Read>(r: R) -> SlideResult<Vec<Transition>> {
    serde_json::from_reader(r)
        .map_err(|e| SlideError::validation(format!("parse slideshow programme JSON: {e}")))
}

/// [`programme_from_reader`] over a file.
pub fn programme_from_path(path: impl AsRef<Path>) -> SlideResult<Vec<Transition>> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| {
        SlideError::validation(format!("open slideshow programme '{}': {e}", path.display()))
    })?;
    programme_from_reader(BufReader::new(f))
}

impl FromStr for Transition {
    type Err = SlideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_transition(s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transitions.rs"]
mod tests;
