//! Surfaces and the compositing engine they are lent to.

/// Software implementation of the compositor contract.
pub mod cpu;
/// Spin-wait frame pacing.
pub mod pacer;
/// Compositor capability trait and per-pass parameters.
pub mod passes;
/// Pixel surfaces and the fixed processing/alpha/output set.
pub mod surface;
