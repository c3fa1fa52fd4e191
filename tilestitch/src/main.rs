mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<ErrorLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	#[clap(alias = "stitch")]
	/// Stitch the tiles covering a bounding box or center point into one image
	Render(tools::render::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Render(arguments) => tools::render::run(arguments),
	}
}

#[cfg(test)]
mod tests {
	use crate::{Cli, run};
	use anyhow::Result;
	use clap::Parser;

	pub fn run_command(arg_vec: Vec<&str>) -> Result<String> {
		let cli = Cli::try_parse_from(arg_vec)?;
		let msg = format!("{cli:?}");
		run(cli)?;
		Ok(msg)
	}

	#[test]
	fn help() {
		let err = run_command(vec!["tilestitch"]).unwrap_err().to_string();
		assert!(err.starts_with("Stitches slippy-map tiles covering a bounding box or center point into one image."));
		assert!(err.contains("\nUsage: tilestitch [OPTIONS] <COMMAND>"));
	}

	#[test]
	fn version() {
		let err = run_command(vec!["tilestitch", "-V"]).unwrap_err().to_string();
		assert!(err.starts_with("tilestitch "));
	}

	#[test]
	fn render_subcommand() {
		let output = run_command(vec!["tilestitch", "render"]).unwrap_err().to_string();
		assert!(output.starts_with("Stitch the tiles covering a bounding box or center point into one image"));
	}
}
