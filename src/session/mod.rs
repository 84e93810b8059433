/// Pacing and step configuration.
pub mod config;
/// The transition engine.
pub mod slideshow;
/// Per-phase timing statistics.
pub mod stats;
