use anyhow::{Context, Result, anyhow, bail};
use std::{
	path::{Path, PathBuf},
	sync::Arc,
};
use tilestitch::{
	config::RequestConfig,
	core::{CenterInput, GeoBBox, OutputFormat, StitchResult, stitch},
	image::ImageCompositor,
	sources::get_tile_source,
};
use tilestitch_derive::context;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// URL template like https://tiles.example.org/{z}/{x}/{y}.png,
	/// or a tile directory, optionally followed by #extension (default: png)
	#[arg(verbatim_doc_comment)]
	source: Option<String>,

	/// YAML request file; command line arguments override its values
	#[arg(long, short, value_name = "FILE")]
	config: Option<PathBuf>,

	/// image file to write
	#[arg(long, short, value_name = "FILE")]
	output: Option<PathBuf>,

	/// center of the image
	#[arg(
		long,
		value_name = "lng,lat",
		allow_hyphen_values = true,
		requires_all = ["width", "height"],
		display_order = 1
	)]
	center: Option<String>,

	/// image width before scaling, used with --center
	#[arg(long, value_name = "int", requires = "center", display_order = 1)]
	width: Option<u32>,

	/// image height before scaling, used with --center
	#[arg(long, value_name = "int", requires = "center", display_order = 1)]
	height: Option<u32>,

	/// area of the image
	#[arg(
		long,
		short,
		value_name = "west,south,east,north",
		allow_hyphen_values = true,
		conflicts_with = "center",
		display_order = 1
	)]
	bbox: Option<String>,

	/// zoom level of the tiles
	#[arg(long, short, value_name = "int", display_order = 2)]
	zoom: Option<u8>,

	/// pixel density, e.g. 2 for high-DPI images
	#[arg(long, short, value_name = "float", display_order = 2)]
	scale: Option<f64>,

	/// edge length of a source tile in pixels
	#[arg(long, value_name = "int", display_order = 2)]
	tile_size: Option<u32>,

	/// output format: png, jpeg or webp; defaults to the output file extension
	#[arg(long, short, value_name = "FORMAT", display_order = 3)]
	format: Option<OutputFormat>,

	/// encoder quality, 0-100
	#[arg(long, value_name = "int", display_order = 3)]
	quality: Option<u8>,

	/// image sides must stay below this number of pixels
	#[arg(long, value_name = "int", display_order = 3)]
	limit: Option<u32>,

	/// maximum number of tiles fetched at the same time
	#[arg(long, value_name = "int", display_order = 3)]
	concurrency: Option<usize>,

	/// print the cache headers of the image
	#[arg(long, display_order = 4)]
	headers: bool,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let RequestConfig {
		source,
		output,
		options,
	} = build_request(arguments)?;

	let Some(output) = output else {
		bail!("an output file is required, use --output or 'output' in the request file");
	};
	let Some(source) = source else {
		bail!("a tile source is required, pass it as argument or as 'source' in the request file");
	};

	let options = options.with_tile_source(get_tile_source(&source)?);
	eprintln!("render {source:?} to {output:?}");

	let result = stitch(&options, Arc::new(ImageCompositor::new())).await?;
	write_result(&result, &output, arguments.headers).await
}

/// Merge the request file (if any) with the command line arguments.
#[context("reading render arguments")]
fn build_request(arguments: &Subcommand) -> Result<RequestConfig> {
	let mut request = match &arguments.config {
		Some(path) => RequestConfig::from_path(path)?,
		None => RequestConfig::default(),
	};

	if let Some(source) = &arguments.source {
		request.source = Some(source.clone());
	}
	if let Some(output) = &arguments.output {
		request.output = Some(output.clone());
	}

	let options = &mut request.options;

	if let Some(center) = &arguments.center {
		let [lng, lat] = parse_numbers::<2>(center, "center")?;
		options.center = Some(CenterInput {
			lng,
			lat,
			width: arguments.width.unwrap_or_default(),
			height: arguments.height.unwrap_or_default(),
		});
		options.bbox = None;
	}
	if let Some(bbox) = &arguments.bbox {
		let [west, south, east, north] = parse_numbers::<4>(bbox, "bbox")?;
		options.bbox = Some(GeoBBox::new(west, south, east, north));
		options.center = None;
	}

	if let Some(zoom) = arguments.zoom {
		options.zoom = zoom;
	}
	if let Some(scale) = arguments.scale {
		options.scale = scale;
	}
	if let Some(tile_size) = arguments.tile_size {
		options.tile_size = tile_size;
	}
	if let Some(quality) = arguments.quality {
		options.quality = Some(quality);
	}
	if let Some(limit) = arguments.limit {
		options.limit = limit;
	}
	if let Some(concurrency) = arguments.concurrency {
		options.concurrency = Some(concurrency);
	}

	if let Some(format) = arguments.format {
		options.format = format;
	} else if arguments.config.is_none()
		&& let Some(format) = request.output.as_deref().and_then(format_from_extension)
	{
		options.format = format;
	}

	Ok(request)
}

fn format_from_extension(path: &Path) -> Option<OutputFormat> {
	path.extension()?.to_str()?.parse().ok()
}

/// Parse exactly `N` numbers separated by commas, semicolons or spaces.
fn parse_numbers<const N: usize>(value: &str, name: &str) -> Result<[f64; N]> {
	log::trace!("parsing {name} argument: {value:?}");
	let numbers = value
		.split(&[' ', ',', ';'])
		.filter(|s| !s.is_empty())
		.map(|s| {
			s.parse::<f64>()
				.with_context(|| format!("{name} value {s:?} is not a number"))
		})
		.collect::<Result<Vec<f64>>>()?;

	<[f64; N]>::try_from(numbers)
		.map_err(|numbers| anyhow!("{name} must contain exactly {N} numbers, but got {}: {value:?}", numbers.len()))
}

async fn write_result(result: &StitchResult, output: &Path, print_headers: bool) -> Result<()> {
	tokio::fs::write(output, result.image.as_slice())
		.await
		.with_context(|| format!("writing image to {output:?}"))?;

	eprintln!("tiles: {}", result.stats.tiles);
	eprintln!("render_avg: {}", result.stats.render_avg);

	if print_headers {
		for (name, value) in result.headers.iter() {
			println!("{name}: {value}");
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tests::run_command;
	use image::{ImageFormat, Rgba, RgbaImage};
	use pretty_assertions::assert_eq;
	use rstest::rstest;
	use std::fs;
	use tempfile::{TempDir, tempdir};

	/// A zoom 1 tile directory: the western tiles are red, the eastern ones blue.
	fn tile_dir() -> TempDir {
		let dir = tempdir().unwrap();
		for x in 0..2 {
			for y in 0..2 {
				let color = if x == 0 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 255, 255]) };
				let folder = dir.path().join("1").join(x.to_string());
				fs::create_dir_all(&folder).unwrap();
				RgbaImage::from_pixel(256, 256, color)
					.save_with_format(folder.join(format!("{y}.png")), ImageFormat::Png)
					.unwrap();
			}
		}
		dir
	}

	fn arguments(args: &[&str]) -> Subcommand {
		use clap::Parser;

		#[derive(clap::Parser)]
		struct Wrapper {
			#[command(flatten)]
			subcommand: Subcommand,
		}

		let mut argv = vec!["render"];
		argv.extend_from_slice(args);
		Wrapper::try_parse_from(argv).unwrap().subcommand
	}

	#[rstest]
	#[case("1,2", [1.0, 2.0])]
	#[case("-1.5; 2", [-1.5, 2.0])]
	#[case(" 3 4 ", [3.0, 4.0])]
	fn parses_numbers(#[case] value: &str, #[case] expected: [f64; 2]) {
		assert_eq!(parse_numbers::<2>(value, "center").unwrap(), expected);
	}

	#[test]
	fn rejects_bad_numbers() {
		assert_eq!(
			parse_numbers::<4>("1,2,3", "bbox").unwrap_err().to_string(),
			"bbox must contain exactly 4 numbers, but got 3: \"1,2,3\""
		);
		assert_eq!(
			parse_numbers::<2>("1,x", "center").unwrap_err().to_string(),
			"center value \"x\" is not a number"
		);
	}

	#[test]
	fn command_line_overrides_the_request_file() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("request.yml");
		fs::write(
			&path,
			"source: tiles\noutput: out.png\noptions:\n  zoom: 3\n  format: jpeg\n  bbox: [0, 0, 10, 10]\n",
		)
		.unwrap();
		let config = path.to_string_lossy().into_owned();

		let request = build_request(&arguments(&["--config", config.as_str(), "--zoom", "4"])).unwrap();
		assert_eq!(request.options.zoom, 4);
		assert_eq!(request.options.format, OutputFormat::Jpeg);
		assert_eq!(request.options.bbox, Some(GeoBBox::new(0.0, 0.0, 10.0, 10.0)));
		assert_eq!(request.source, Some(dir.path().join("tiles").to_string_lossy().into_owned()));

		let request = build_request(&arguments(&[
			"--config", config.as_str(), "--center", "5,-5", "--width", "200", "--height", "100",
		]))
		.unwrap();
		assert_eq!(request.options.bbox, None);
		assert_eq!(
			request.options.center,
			Some(CenterInput {
				lng: 5.0,
				lat: -5.0,
				width: 200,
				height: 100
			})
		);
	}

	#[test]
	fn format_follows_the_output_extension() {
		let request = build_request(&arguments(&["tiles", "-o", "map.webp", "-b", "-10,-10,10,10"])).unwrap();
		assert_eq!(request.options.format, OutputFormat::Webp);

		let request = build_request(&arguments(&["tiles", "-o", "map.webp", "-f", "jpg", "-b", "0,0,1,1"])).unwrap();
		assert_eq!(request.options.format, OutputFormat::Jpeg);

		let request = build_request(&arguments(&["tiles", "-o", "map.tif", "-b", "0,0,1,1"])).unwrap();
		assert_eq!(request.options.format, OutputFormat::Png);
	}

	#[test]
	fn renders_a_directory() {
		let tiles = tile_dir();
		let source = tiles.path().to_string_lossy().into_owned();
		let output = tiles.path().join("world.png");
		let output_arg = output.to_string_lossy().into_owned();

		run_command(vec![
			"tilestitch",
			"render",
			"-q",
			source.as_str(),
			"--output",
			output_arg.as_str(),
			"--center=0,0",
			"--width=512",
			"--height=512",
			"--zoom=1",
		])
		.unwrap();

		let image = image::open(&output).unwrap().to_rgba8();
		assert_eq!(image.dimensions(), (512, 512));
		assert_eq!(image.get_pixel(10, 10), &Rgba([255, 0, 0, 255]));
		assert_eq!(image.get_pixel(300, 500), &Rgba([0, 0, 255, 255]));
	}

	#[test]
	fn missing_tiles_fail_the_render() {
		let tiles = tile_dir();
		let source = tiles.path().to_string_lossy().into_owned();
		let output = tiles.path().join("out.png");
		let output_arg = output.to_string_lossy().into_owned();

		let error = run_command(vec![
			"tilestitch",
			"render",
			source.as_str(),
			"-o",
			output_arg.as_str(),
			"--bbox=-10,-10,10,10",
			"--zoom=2",
		])
		.unwrap_err();

		assert!(format!("{error:#}").contains("failed to fetch tile 2/"), "{error:#}");
		assert!(!output.exists());
	}

	#[test]
	fn requires_an_output() {
		let tiles = tile_dir();
		let source = tiles.path().to_string_lossy().into_owned();
		let error = run_command(vec![
			"tilestitch",
			"render",
			source.as_str(),
			"--bbox=-10,-10,10,10",
		])
		.unwrap_err();
		assert_eq!(
			error.to_string(),
			"an output file is required, use --output or 'output' in the request file"
		);
	}
}
