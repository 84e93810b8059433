/// Monotonic and simulated microsecond clocks.
pub mod clock;
/// Pixel formats, corner geometry and output flip.
pub mod core;
/// Crate error type.
pub mod error;
