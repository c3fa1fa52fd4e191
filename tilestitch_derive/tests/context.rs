use anyhow::{Result, bail};
use tilestitch_derive::context;

#[context("resolving tile {z}/{x}/{y}")]
fn failing(z: u8, x: u32, y: u32) -> Result<u32> {
	if x > y {
		bail!("column {x} is beyond row {y}");
	}
	Ok(u32::from(z) + x + y)
}

#[context("fetching {} tiles", count)]
async fn failing_async(count: usize) -> Result<usize> {
	if count == 0 {
		bail!("nothing to fetch");
	}
	Ok(count * 2)
}

#[test]
fn passes_through_ok_values() {
	assert_eq!(failing(1, 1, 2).unwrap(), 4);
}

#[test]
fn wraps_errors_with_message() {
	let error = failing(3, 5, 2).unwrap_err();
	assert_eq!(error.to_string(), "resolving tile 3/5/2");
	assert_eq!(error.root_cause().to_string(), "column 5 is beyond row 2");
}

#[tokio::test]
async fn wraps_async_errors() {
	assert_eq!(failing_async(3).await.unwrap(), 6);
	let error = failing_async(0).await.unwrap_err();
	assert_eq!(format!("{error:#}"), "fetching 0 tiles: nothing to fetch");
}
