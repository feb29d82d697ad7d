use std::path::PathBuf;

use bspdoc::bsp::{BspFile, Result, write_map};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Destination map file.
	pub out: PathBuf,
}

/// Re-serialize a map, inlining side-car overrides.
pub fn run(args: Args) -> Result<()> {
	let Args { path, out } = args;

	let file = BspFile::open(&path)?;
	write_map(&file, &out)?;
	let written = std::fs::metadata(&out)?.len();

	println!("dialect: {}", file.dialect());
	println!("out: {}", out.display());
	println!("bytes: {written}");
	Ok(())
}
