use futures::FutureExt;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage, load_from_memory_with_format};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tilestitch_core::{
	Blob, FetchedTile, OutputFormat, StitchError, StitchOptions, TileAddress, TileSourceFn, TileStats, stitch,
};
use tilestitch_image::{ImageCompositor, format::png};

const WEST: Rgba<u8> = Rgba([255, 0, 0, 255]);
const EAST: Rgba<u8> = Rgba([0, 0, 255, 255]);

/// Zoom 1 tiles: the western column red, the eastern one blue.
fn hemisphere_source() -> Arc<TileSourceFn> {
	Arc::new(TileSourceFn::new("hemispheres", |address: TileAddress| {
		async move {
			let color = if address.x == 0 { WEST } else { EAST };
			let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(256, 256, color));
			let blob = png::encode(&image, None)?;
			Ok::<_, anyhow::Error>(FetchedTile::new(blob).with_stats(TileStats::with_render(u64::from(address.y) * 10)))
		}
		.boxed()
	}))
}

#[tokio::test]
async fn stitches_the_whole_world() {
	let options = StitchOptions {
		zoom: 1,
		..StitchOptions::default()
	}
	.with_center(0.0, 0.0, 512, 512)
	.with_tile_source(hemisphere_source());

	let result = stitch(&options, Arc::new(ImageCompositor::new())).await.unwrap();

	// three columns (the third wraps and lies off-canvas), three rows (the third clamps)
	assert_eq!(result.stats.tiles, 9);
	assert_eq!(result.stats.render_avg, 7);
	assert_eq!(result.headers.content_type, "image/png");

	let image = load_from_memory_with_format(result.image.as_slice(), ImageFormat::Png)
		.unwrap()
		.to_rgba8();
	assert_eq!(image.dimensions(), (512, 512));
	assert_eq!(image.get_pixel(0, 0), &WEST);
	assert_eq!(image.get_pixel(255, 511), &WEST);
	assert_eq!(image.get_pixel(256, 0), &EAST);
	assert_eq!(image.get_pixel(511, 511), &EAST);
}

#[tokio::test]
async fn scaled_jpeg_output() {
	let options = StitchOptions {
		zoom: 1,
		scale: 0.5,
		format: OutputFormat::Jpeg,
		quality: Some(80),
		..StitchOptions::default()
	}
	.with_center(90.0, 0.0, 200, 100)
	.with_tile_source(hemisphere_source());

	let result = stitch(&options, Arc::new(ImageCompositor::new())).await.unwrap();
	let image = load_from_memory_with_format(result.image.as_slice(), ImageFormat::Jpeg).unwrap();
	assert_eq!((image.width(), image.height()), (100, 50));
	assert_eq!(result.headers.content_type, "image/jpeg");
}

#[tokio::test]
async fn broken_tiles_fail_composition() {
	let options = StitchOptions::default()
		.with_center(0.0, 0.0, 16, 16)
		.with_tile_source(Arc::new(TileSourceFn::new("garbage", |_| {
			async { Ok(FetchedTile::new(Blob::from("<html>404</html>"))) }.boxed()
		})));

	let error = stitch(&options, Arc::new(ImageCompositor::new())).await.unwrap_err();
	assert_eq!(error.downcast_ref::<StitchError>(), Some(&StitchError::Composition));
}
