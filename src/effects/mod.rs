/// Per-step parameter laws of every transition and the parsed transition request.
pub mod transitions;
