/// QVGA 24-bit bitmap loading and preparation.
pub mod bmp;
/// Where slides are opened from.
pub mod source;
