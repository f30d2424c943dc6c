#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "assetdoc", about = "Console game asset inspection tools")]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// List archive entries with their tags and compression.
	Info(cmd::info::Args),
	/// Write every decompressed archive entry to a directory.
	Extract(cmd::extract::Args),
	/// Describe a NUT texture and optionally dump decoded RGBA8.
	Texture(cmd::texture::Args),
	/// Decode an animation and list its curves.
	Anim(cmd::anim::Args),
}

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.with_writer(std::io::stderr)
		.init();

	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> assetdoc::asset::Result<()> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Extract(args) => cmd::extract::run(args),
		Commands::Texture(args) => cmd::texture::run(args),
		Commands::Anim(args) => cmd::anim::run(args),
	}
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;

	use super::Cli;

	#[test]
	fn command_definitions_are_consistent() {
		Cli::command().debug_assert();
	}
}
