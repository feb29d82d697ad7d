use std::path::PathBuf;

use bspdoc::bsp::{BspFile, Result};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Print session classification and a directory summary.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let file = BspFile::open(&path)?;
	let session = file.session();

	let mut populated = 0_u32;
	let mut payload_bytes = 0_u64;
	for index in 0..file.lump_count() {
		let location = file.location(index)?.location;
		if !location.is_empty() {
			populated += 1;
			payload_bytes += location.length;
		}
	}

	let overrides: Vec<OverrideJson> = file
		.sidecars()
		.entries()
		.into_iter()
		.map(|entry| OverrideJson {
			lump: entry.lump_index,
			file: entry.source.display().to_string(),
			length: entry.length,
			version: entry.version,
		})
		.collect();

	if json {
		emit_json(&InfoJson {
			path: path.display().to_string(),
			dialect: file.dialect().as_str().to_owned(),
			endianness: file.endianness().as_str().to_owned(),
			obfuscated: session.key.is_some(),
			file_len: session.file_len,
			lump_count: file.lump_count(),
			populated_lumps: populated,
			payload_bytes,
			overrides,
		});
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("dialect: {}", file.dialect());
	println!("endianness: {}", file.endianness().as_str());
	println!("obfuscated: {}", session.key.is_some());
	println!("file_len: {}", session.file_len);
	println!("lump_count: {}", file.lump_count());
	println!("populated_lumps: {populated}");
	println!("payload_bytes: {payload_bytes}");

	if !overrides.is_empty() {
		println!("overrides:");
		for entry in &overrides {
			println!("  {}: {} ({} bytes, version {})", entry.lump, entry.file, entry.length, entry.version);
		}
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	dialect: String,
	endianness: String,
	obfuscated: bool,
	file_len: u64,
	lump_count: u32,
	populated_lumps: u32,
	payload_bytes: u64,
	overrides: Vec<OverrideJson>,
}

#[derive(serde::Serialize)]
struct OverrideJson {
	lump: u32,
	file: String,
	length: u64,
	version: u32,
}
