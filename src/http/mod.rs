//! HTTP layer shared by all Watson façades.
//!
//! The SSE decoder is re-exported at the crate root so streaming bodies
//! obtained elsewhere can be decoded with the same rules; the rest are
//! implementation details.

pub(crate) mod common;
pub(crate) mod error_helpers;
pub(crate) mod loud_wire;
pub mod sse_parser;
