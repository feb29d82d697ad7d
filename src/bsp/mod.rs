mod brushside;
mod bytes;
mod dialect;
mod directory;
mod error;
mod file;
mod lumpio;
mod model;
mod obfuscation;
mod record;
mod sidecar;
mod sniff;
#[cfg(test)]
mod test_support;
mod writer;

/// Brush-side record and its per-dialect layouts.
pub use brushside::{BrushSide, SideLayout};
/// Dialect classification and directory geometry.
pub use dialect::{Dialect, DirectoryShape, Endianness};
/// Lump location resolution.
pub use directory::{LumpLocation, LumpSource, ResolvedLump, resolve_lump};
/// Error and result aliases.
pub use error::{BspError, Result};
/// Container over an opened map file.
pub use file::BspFile;
/// Raw payload reads.
pub use lumpio::read_lump;
/// Model record and its per-dialect shapes.
pub use model::{Model, ModelShape};
/// XOR deobfuscation key.
pub use obfuscation::XorKey;
/// Typed record contract shared by all record kinds.
pub use record::{ABSENT_INDEX, LumpRecord};
/// Side-car override discovery.
pub use sidecar::{SidecarEntry, SidecarIndex};
/// Dialect sniffing entry point and session state.
pub use sniff::{Session, sniff};
/// Map re-serialization.
pub use writer::write_map;
