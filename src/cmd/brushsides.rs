use std::path::PathBuf;

use bspdoc::bsp::{BspFile, BrushSide, Result};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Print at most this many records.
	#[arg(long)]
	pub limit: Option<usize>,
	#[arg(long)]
	pub json: bool,
}

/// Decode and print the brush-side lump.
pub fn run(args: Args) -> Result<()> {
	let Args { path, limit, json } = args;

	let mut file = BspFile::open(&path)?;
	let dialect = file.dialect();
	let sides = file.brush_sides()?;
	let shown = limit.unwrap_or(sides.len()).min(sides.len());

	if json {
		emit_json(&SidesJson {
			path: path.display().to_string(),
			dialect: dialect.as_str().to_owned(),
			count: sides.len(),
			brush_sides: sides[..shown].iter().map(SideJson::from).collect(),
		});
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("dialect: {dialect}");
	println!("count: {}", sides.len());
	for (index, side) in sides[..shown].iter().enumerate() {
		println!("{index}: plane {} texture {} disp_info {} bevel {}", side.plane, side.texture, side.disp_info, side.bevel);
	}
	if shown < sides.len() {
		println!("... {} more", sides.len() - shown);
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct SidesJson {
	path: String,
	dialect: String,
	count: usize,
	brush_sides: Vec<SideJson>,
}

#[derive(serde::Serialize)]
struct SideJson {
	plane: i32,
	texture: i32,
	disp_info: i32,
	bevel: bool,
}

impl From<&BrushSide> for SideJson {
	fn from(side: &BrushSide) -> Self {
		Self {
			plane: side.plane,
			texture: side.texture,
			disp_info: side.disp_info,
			bevel: side.bevel,
		}
	}
}
