//! Frame sinks.
//!
//! Sinks receive the output surface once per composited frame, in presentation order.

/// PNG-sequence sink.
pub mod png;
/// Frame sink trait and built-in sinks.
pub mod sink;
