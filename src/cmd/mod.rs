/// Brush-side record listing command.
pub mod brushsides;
/// Raw lump extraction command.
pub mod extract;
/// File-level information command.
pub mod info;
/// Lump directory listing command.
pub mod lumps;
/// Model record listing command.
pub mod models;
/// Map re-serialization command.
pub mod rewrite;
/// Shared argument parsing and output helpers.
pub(crate) mod util;
