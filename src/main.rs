#![allow(missing_docs)]

use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "bspdoc", about = "Compiled map (.bsp) inspection tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	Info(cmd::info::Args),
	Lumps(cmd::lumps::Args),
	Models(cmd::models::Args),
	Brushsides(cmd::brushsides::Args),
	Extract(cmd::extract::Args),
	Rewrite(cmd::rewrite::Args),
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> bspdoc::bsp::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Lumps(args) => cmd::lumps::run(args),
		Commands::Models(args) => cmd::models::run(args),
		Commands::Brushsides(args) => cmd::brushsides::run(args),
		Commands::Extract(args) => cmd::extract::run(args),
		Commands::Rewrite(args) => cmd::rewrite::run(args),
	}
}
