use crate::{
    foundation::core::{Corner, CornerRect, Flip, PixelFormat, QVGA_HEIGHT, QVGA_WIDTH},
    foundation::error::{SlideError, SlideResult},
    render::passes::{CacheBarrier, Compositor, PassIo, PassState},
    render::surface::SurfaceDesc,
};

/// Behaviour knobs for [`SoftCompositor`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SoftCompositorOpts {
    /// Number of `poll_done` calls that report "busy" before a pass completes.
    pub busy_polls: u32,
    /// Keep a [`PassState`] snapshot of every started pass.
    pub record_history: bool,
    /// Never report completion (simulates a hung engine).
    pub never_completes: bool,
}

/// CPU implementation of the [`Compositor`] contract.
///
/// The processing surface is read through its origin and scaled into its destination
/// rectangle; out-of-range scaled reads replicate the edge pixel and output pixels outside the
/// rectangle take the black background. The alpha surface is read unscaled inside its own
/// rectangle and blended by the alpha level. The blended frame is flipped and converted to the
/// output format.
#[derive(Debug)]
pub struct SoftCompositor {
    opts: SoftCompositorOpts,
    state: PassState,
    in_flight: bool,
    polls_left: u32,
    passes: u64,
    barriers: u64,
    history: Vec<PassState>,
}

impl SoftCompositor {
    /// Idle compositor latched to full-frame RGB565 QVGA parameters.
    pub fn new(opts: SoftCompositorOpts) -> Self {
        let desc = SurfaceDesc::new(QVGA_WIDTH, QVGA_HEIGHT, PixelFormat::Rgb565);
        Self {
            opts,
            state: PassState::full_frame(desc, desc, desc),
            in_flight: false,
            polls_left: 0,
            passes: 0,
            barriers: 0,
            history: Vec::new(),
        }
    }

    /// Currently latched parameters.
    pub fn state(&self) -> &PassState {
        &self.state
    }

    /// Snapshots of every started pass (empty unless `record_history`).
    pub fn history(&self) -> &[PassState] {
        &self.history
    }

    /// Passes started so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Cache reconciliations requested so far.
    pub fn barriers(&self) -> u64 {
        self.barriers
    }

    /// A pass is in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }
}

impl Default for SoftCompositor {
    fn default() -> Self {
        Self::new(SoftCompositorOpts::default())
    }
}

impl CacheBarrier for SoftCompositor {
    fn reconcile(&mut self, _bytes: &[u8]) {
        // CPU and "engine" share one coherent view; only count the handoff.
        self.barriers += 1;
    }
}

impl Compositor for SoftCompositor {
    fn set_ps(&mut self, desc: SurfaceDesc) {
        self.state.ps = desc;
    }

    fn set_as(&mut self, desc: SurfaceDesc) {
        self.state.alpha_surface = desc;
    }

    fn set_output(&mut self, desc: SurfaceDesc) {
        self.state.out = desc;
    }

    fn set_scale(&mut self, scale: f32) {
        self.state.scale = scale;
    }

    fn set_alpha(&mut self, level: u8) {
        self.state.alpha = level;
    }

    fn set_flip(&mut self, flip: Flip) {
        self.state.flip = flip;
    }

    fn set_ps_rect(&mut self, rect: CornerRect) {
        self.state.ps_rect = rect;
    }

    fn set_as_rect(&mut self, rect: CornerRect) {
        self.state.as_rect = rect;
    }

    fn set_ps_origin(&mut self, origin: Corner) {
        self.state.ps_origin = origin;
    }

    fn set_as_origin(&mut self, origin: Corner) {
        self.state.as_origin = origin;
    }

    fn start(&mut self, io: PassIo<'_>) -> SlideResult<()> {
        if self.in_flight {
            return Err(SlideError::engine("pass started while another is in flight"));
        }
        let st = &self.state;
        for (name, have, desc) in [
            ("processing", io.ps.len(), st.ps),
            ("alpha", io.alpha.len(), st.alpha_surface),
            ("output", io.out.len(), st.out),
        ] {
            if have < desc.byte_len() {
                return Err(SlideError::engine(format!(
                    "{name} buffer holds {have} bytes, programmed geometry needs {}",
                    desc.byte_len()
                )));
            }
        }
        if !st.scale.is_finite() || st.scale <= 0.0 {
            return Err(SlideError::engine(format!(
                "scale must be finite and > 0, got {}",
                st.scale
            )));
        }

        composite(st, io);

        if self.opts.record_history {
            self.history.push(self.state);
        }
        self.passes += 1;
        self.in_flight = true;
        self.polls_left = self.opts.busy_polls;
        Ok(())
    }

    fn poll_done(&mut self) -> bool {
        if !self.in_flight {
            return true;
        }
        if self.opts.never_completes {
            return false;
        }
        if self.polls_left > 0 {
            self.polls_left -= 1;
            return false;
        }
        true
    }

    fn stop(&mut self) {
        self.in_flight = false;
        self.polls_left = 0;
    }
}

fn blend(ps: [u8; 3], alpha: [u8; 3], level: u8) -> [u8; 3] {
    let a = u16::from(level);
    let ia = 255 - a;
    let mut out = [0u8; 3];
    for i in 0..3 {
        out[i] = ((u16::from(ps[i]) * ia + u16::from(alpha[i]) * a + 127) / 255) as u8;
    }
    out
}

/// Source coordinate for destination `d` inside a rectangle starting at `ulc`, read through
/// `origin` at `inv_scale` source pixels per destination pixel, clamped to `extent`.
fn scaled_src(d: u16, ulc: u16, origin: u16, inv_scale: f32, extent: u16) -> u16 {
    let rel = f32::from(d - ulc) * inv_scale;
    let s = u32::from(origin) + rel as u32;
    s.min(u32::from(extent.saturating_sub(1))) as u16
}

fn composite(st: &PassState, mut io: PassIo<'_>) {
    let out = st.out;
    let (ps, asd) = (st.ps, st.alpha_surface);
    let ps_bpp = ps.format.bytes_per_pixel();
    let as_bpp = asd.format.bytes_per_pixel();
    let inv_scale = 1.0 / st.scale;

    for y in 0..out.height {
        for x in 0..out.width {
            let base = if st.ps_rect.contains(x, y) {
                let sx = scaled_src(x, st.ps_rect.ulc.x, st.ps_origin.x, inv_scale, ps.width);
                let sy = scaled_src(y, st.ps_rect.ulc.y, st.ps_origin.y, inv_scale, ps.height);
                let off = ps.offset_of(sx, sy);
                ps.format.read_rgb(&io.ps[off..off + ps_bpp])
            } else {
                [0, 0, 0]
            };

            let mut rgb = base;
            if st.alpha > 0 && st.as_rect.contains(x, y) {
                let ax = u32::from(st.as_origin.x) + u32::from(x - st.as_rect.ulc.x);
                let ay = u32::from(st.as_origin.y) + u32::from(y - st.as_rect.ulc.y);
                if ax < u32::from(asd.width) && ay < u32::from(asd.height) {
                    let off = asd.offset_of(ax as u16, ay as u16);
                    let top = asd.format.read_rgb(&io.alpha[off..off + as_bpp]);
                    rgb = blend(base, top, st.alpha);
                }
            }

            let dx = if st.flip.horizontal {
                out.width - 1 - x
            } else {
                x
            };
            let dy = if st.flip.vertical {
                out.height - 1 - y
            } else {
                y
            };
            let off = out.offset_of(dx, dy);
            out.format.write_rgb(&mut io.out[off..], rgb);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
