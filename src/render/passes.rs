use crate::{
    foundation::core::{Corner, CornerRect, Flip},
    foundation::error::SlideResult,
    render::surface::SurfaceDesc,
};

/// Cache-reconciliation barrier between software and the compositing engine.
///
/// Must run after every software write to a buffer the engine will read, and after every
/// engine write before software reads the buffer.
pub trait CacheBarrier {
    /// Clean and invalidate the cached view of `bytes`.
    fn reconcile(&mut self, bytes: &[u8]);
}

/// The three buffers lent to the engine for one pass.
pub struct PassIo<'a> {
    /// Processing surface (PS) pixels.
    pub ps: &'a [u8],
    /// Alpha surface (AS) pixels.
    pub alpha: &'a [u8],
    /// Output surface pixels.
    pub out: &'a mut [u8],
}

/// Capability interface of a fixed-function 2D compositing engine (scale, blend, format
/// convert). Programming calls latch parameters for the next pass; they persist across passes
/// until reprogrammed.
///
/// Exactly one pass may be in flight: after [`Compositor::start`] the caller polls
/// [`Compositor::poll_done`] until it reports completion and then calls [`Compositor::stop`]
/// before reprogramming.
pub trait Compositor: CacheBarrier {
    /// Processing surface geometry.
    fn set_ps(&mut self, desc: SurfaceDesc);

    /// Alpha surface geometry.
    fn set_as(&mut self, desc: SurfaceDesc);

    /// Output surface geometry.
    fn set_output(&mut self, desc: SurfaceDesc);

    /// Output scale applied to the processing surface, 1.0 = no scale.
    fn set_scale(&mut self, scale: f32);

    /// Alpha surface contribution, 0 = processing only, 255 = alpha only.
    fn set_alpha(&mut self, level: u8);

    /// Mirroring applied to the composited frame.
    fn set_flip(&mut self, flip: Flip);

    /// Destination corners of the processing surface in output space.
    fn set_ps_rect(&mut self, rect: CornerRect);

    /// Destination corners of the alpha surface in output space.
    fn set_as_rect(&mut self, rect: CornerRect);

    /// First processing-surface pixel read (sub-window origin). Rows advance by the PS pitch.
    fn set_ps_origin(&mut self, origin: Corner);

    /// First alpha-surface pixel read (sub-window origin). Rows advance by the AS pitch.
    fn set_as_origin(&mut self, origin: Corner);

    /// Begin one composite pass over `io`.
    fn start(&mut self, io: PassIo<'_>) -> SlideResult<()>;

    /// Non-blocking completion check for the pass in flight.
    fn poll_done(&mut self) -> bool;

    /// Release the engine for the next pass.
    fn stop(&mut self);
}

/// Snapshot of everything a pass is programmed with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassState {
    /// Processing surface geometry.
    pub ps: SurfaceDesc,
    /// Alpha surface geometry.
    pub alpha_surface: SurfaceDesc,
    /// Output surface geometry.
    pub out: SurfaceDesc,
    /// See [`Compositor::set_scale`].
    pub scale: f32,
    /// See [`Compositor::set_alpha`].
    pub alpha: u8,
    /// See [`Compositor::set_flip`].
    pub flip: Flip,
    /// See [`Compositor::set_ps_rect`].
    pub ps_rect: CornerRect,
    /// See [`Compositor::set_as_rect`].
    pub as_rect: CornerRect,
    /// See [`Compositor::set_ps_origin`].
    pub ps_origin: Corner,
    /// See [`Compositor::set_as_origin`].
    pub as_origin: Corner,
}

impl PassState {
    /// Full-frame, unscaled, unblended state for surfaces of `desc` geometry.
    pub fn full_frame(ps: SurfaceDesc, alpha_surface: SurfaceDesc, out: SurfaceDesc) -> Self {
        Self {
            ps,
            alpha_surface,
            out,
            scale: 1.0,
            alpha: 0,
            flip: Flip::NONE,
            ps_rect: CornerRect::full(out.width, out.height),
            as_rect: CornerRect::full(out.width, out.height),
            ps_origin: Corner::ORIGIN,
            as_origin: Corner::ORIGIN,
        }
    }
}
