//! Slideshow transition engine for a fixed-function 2D compositing accelerator.
//!
//! Two 320x240 source surfaces (processing and alpha) are composited into an output surface by
//! an engine that can only scale, blend and convert formats. The [`Slideshow`] drives that
//! engine through dissolve, fade, Ken-Burns, stretch, wipe and push effects:
//!
//! - Attach a [`SlideSource`] to open 24-bit QVGA bitmaps by name
//! - Supply a [`Compositor`] (the built-in [`SoftCompositor`] runs on the CPU)
//! - Receive every composited frame through a [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Slide files: bitmap decoding and slide sources.
pub mod assets;
/// Transition step laws and transition requests.
pub mod effects;
/// Frame sinks.
pub mod encode;
/// Core value types, clocks and errors.
pub mod foundation;
/// Surfaces, the compositor contract and its CPU implementation.
pub mod render;
/// The transition engine with its config and statistics.
pub mod session;

pub use crate::assets::bmp::{convert_to_qvga_bmp, encode_qvga_bmp, load_qvga_bmp};
pub use crate::assets::source::{DirSource, MemorySource, SlideSource};
pub use crate::effects::transitions::{
    KenBurns, Transition, WipeDir, Window, programme_from_path, programme_from_reader,
};
pub use crate::encode::png::PngDirSink;
pub use crate::encode::sink::{CapturedFrame, FrameSink, InMemorySink};
pub use crate::foundation::clock::{Clock, MonotonicClock, SimClock};
pub use crate::foundation::core::{Corner, CornerRect, Flip, PixelFormat, QVGA_HEIGHT, QVGA_WIDTH};
pub use crate::foundation::error::{SlideError, SlideResult};
pub use crate::render::cpu::{SoftCompositor, SoftCompositorOpts};
pub use crate::render::passes::{CacheBarrier, Compositor, PassIo, PassState};
pub use crate::render::surface::{Surface, SurfaceDesc, SurfaceRole, SurfaceSet};
pub use crate::session::config::SlideshowConfig;
pub use crate::session::slideshow::Slideshow;
pub use crate::session::stats::{Phase, PhaseStats, PhaseSummary, StatsCollector, StatsReport};
