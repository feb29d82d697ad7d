use std::path::PathBuf;

use bspdoc::bsp::{BspFile, Result};

use crate::cmd::util::parse_lump_index;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Decimal lump index to extract.
	pub index: String,
	/// Destination file for the raw payload.
	pub out: PathBuf,
}

/// Write one lump's raw bytes to a file.
pub fn run(args: Args) -> Result<()> {
	let Args { path, index, out } = args;
	let index = parse_lump_index(&index)?;

	let file = BspFile::open(&path)?;
	let bytes = file.lump_bytes(index)?;
	std::fs::write(&out, &bytes)?;

	println!("lump: {index}");
	println!("length: {}", bytes.len());
	println!("out: {}", out.display());
	Ok(())
}
