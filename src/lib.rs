//! Public library API for reading, inspecting, and rewriting compiled map
//! (`.bsp`) files across engine dialects.

/// Dialect sniffing, lump directory resolution, record decoding, and rewrite.
pub mod bsp;
