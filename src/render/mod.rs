//! Rendering module for jop.
//!
//! Turns colours into palette indices and palette indices back into colours.

mod preview;
mod quantize;

pub use preview::{expand_block, write_preview};
pub use quantize::{DitherMethod, Quantizer};
