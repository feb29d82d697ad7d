use std::path::PathBuf;

use bspdoc::bsp::{BspFile, Model, Result};

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

/// Decode and print the model lump.
pub fn run(args: Args) -> Result<()> {
	let Args { path, limit, json } = args;

	let mut file = BspFile::open(&path)?;
	let dialect = file.dialect();
	let models = file.models()?;
	let shown = limit.unwrap_or(models.len()).min(models.len());

	if json {
		emit_json(&ModelsJson {
			path: path.display().to_string(),
			dialect: dialect.as_str().to_owned(),
			count: models.len(),
			models: models[..shown].iter().map(ModelJson::from).collect(),
		});
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("dialect: {dialect}");
	println!("count: {}", models.len());
	for (index, model) in models[..shown].iter().enumerate() {
		println!(
			"{index}: mins {:?} maxs {:?} origin {:?} head_node {} leaves {}+{} brushes {}+{} faces {}+{}",
			model.mins,
			model.maxs,
			model.origin,
			model.head_node,
			model.first_leaf,
			model.num_leaves,
			model.first_brush,
			model.num_brushes,
			model.first_face,
			model.num_faces,
		);
	}
	if shown < models.len() {
		println!("... {} more", models.len() - shown);
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct ModelsJson {
	path: String,
	dialect: String,
	count: usize,
	models: Vec<ModelJson>,
}

#[derive(serde::Serialize)]
struct ModelJson {
	mins: [f32; 3],
	maxs: [f32; 3],
	origin: [f32; 3],
	head_node: i32,
	first_leaf: i32,
	num_leaves: i32,
	first_brush: i32,
	num_brushes: i32,
	first_face: i32,
	num_faces: i32,
}

impl From<&Model> for ModelJson {
	fn from(model: &Model) -> Self {
		Self {
			mins: model.mins,
			maxs: model.maxs,
			origin: model.origin,
			head_node: model.head_node,
			first_leaf: model.first_leaf,
			num_leaves: model.num_leaves,
			first_brush: model.first_brush,
			num_brushes: model.num_brushes,
			first_face: model.first_face,
			num_faces: model.num_faces,
		}
	}
}
