use std::path::PathBuf;

use bspdoc::bsp::{BspFile, LumpSource, Result};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Include empty lump slots.
	#[arg(long)]
	pub all: bool,
	#[arg(long)]
	pub json: bool,
}

/// List every resolved lump directory entry.
pub fn run(args: Args) -> Result<()> {
	let Args { path, all, json } = args;

	let file = BspFile::open(&path)?;
	let mut rows = Vec::new();
	for index in 0..file.lump_count() {
		let resolved = file.location(index)?;
		if resolved.location.is_empty() && !all {
			continue;
		}
		rows.push(LumpJson {
			index,
			offset: resolved.location.offset,
			length: resolved.location.length,
			version: resolved.location.version,
			ident: resolved.location.ident,
			source: match resolved.source {
				LumpSource::Main => "main".to_owned(),
				LumpSource::Sidecar(path) => path.display().to_string(),
			},
		});
	}

	if json {
		emit_json(&LumpsJson {
			path: path.display().to_string(),
			dialect: file.dialect().as_str().to_owned(),
			lumps: rows,
		});
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("dialect: {}", file.dialect());
	println!("{:>5} {:>10} {:>10} {:>8} {:>10} source", "index", "offset", "length", "version", "ident");
	for row in &rows {
		println!("{:>5} {:>10} {:>10} {:>8} {:>10} {}", row.index, row.offset, row.length, row.version, row.ident, row.source);
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct LumpsJson {
	path: String,
	dialect: String,
	lumps: Vec<LumpJson>,
}

#[derive(serde::Serialize)]
struct LumpJson {
	index: u32,
	offset: u64,
	length: u64,
	version: u32,
	ident: u32,
	source: String,
}
