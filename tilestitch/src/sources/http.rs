//! Tiles from an HTTP server, addressed by a URL template such as
//! `https://tile.example.org/{z}/{x}/{y}.png`.
//!
//! Connection errors, timeouts and broken bodies are retried up to [`MAX_RETRIES`] times with
//! exponential backoff, starting at [`DEFAULT_RETRY_DELAY`]. Any non-success status is an error
//! and is not retried.

use anyhow::{Result, bail};
use async_trait::async_trait;
use reqwest::{Client, Url, header};
use std::time::{Duration, Instant};
use tilestitch_core::{Blob, FetchedTile, TileAddress, TileHeaders, TileSource, TileStats};
use tilestitch_derive::context;
use tokio::time::sleep;

pub const MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const PLACEHOLDERS: [&str; 3] = ["{z}", "{x}", "{y}"];

#[derive(Debug)]
pub struct HttpTileSource {
	client: Client,
	template: String,
	timeout: Duration,
	retry_delay: Duration,
}

impl HttpTileSource {
	/// Create a source from a URL template containing `{z}`, `{x}` and `{y}`.
	#[context("creating HTTP tile source for '{template}'")]
	pub fn from_template(template: &str) -> Result<HttpTileSource> {
		for placeholder in PLACEHOLDERS {
			if !template.contains(placeholder) {
				bail!("URL template is missing the placeholder {placeholder}");
			}
		}

		let url = Url::parse(&fill_template(template, 0, 0, 0))?;
		match url.scheme() {
			"http" | "https" => (),
			other => bail!("unsupported URL scheme '{other}', expected 'http' or 'https'"),
		}

		let client = Client::builder()
			.tcp_keepalive(Duration::from_secs(600))
			.use_rustls_tls()
			.build()?;

		Ok(HttpTileSource {
			client,
			template: template.to_string(),
			timeout: DEFAULT_TIMEOUT,
			retry_delay: DEFAULT_RETRY_DELAY,
		})
	}

	/// Limit the time of a single attempt, including reading the body.
	#[must_use]
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	/// Delay before the first retry; it doubles with every further attempt.
	#[must_use]
	pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
		self.retry_delay = retry_delay;
		self
	}

	/// The URL of the tile at `address`.
	pub fn url(&self, address: TileAddress) -> Result<Url> {
		Ok(Url::parse(&fill_template(&self.template, address.z, address.x, address.y))?)
	}
}

fn fill_template(template: &str, z: u8, x: u32, y: u32) -> String {
	template
		.replace("{z}", &z.to_string())
		.replace("{x}", &x.to_string())
		.replace("{y}", &y.to_string())
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
	err.is_connect() || err.is_timeout() || err.is_body()
}

/// Copy the cache-relevant response headers.
fn cache_headers(headers: &header::HeaderMap) -> TileHeaders {
	[header::LAST_MODIFIED, header::ETAG]
		.iter()
		.filter_map(|name| {
			let value = headers.get(name)?.to_str().ok()?;
			Some((name.as_str(), value))
		})
		.collect()
}

impl HttpTileSource {
	/// Fetch one tile, retrying transient network errors.
	#[context("fetching tile {address} from '{}'", self.template)]
	pub async fn fetch(&self, address: TileAddress) -> Result<FetchedTile> {
		let url = self.url(address)?;
		let start = Instant::now();

		for attempt in 0..=MAX_RETRIES {
			if attempt > 0 {
				let backoff = self.retry_delay * (1 << (attempt - 1));
				log::warn!("retry attempt {attempt}/{MAX_RETRIES} fetching '{url}', waiting {backoff:?}");
				sleep(backoff).await;
			}

			let response = match self.client.get(url.clone()).timeout(self.timeout).send().await {
				Ok(r) => r,
				Err(e) if is_retryable_error(&e) && attempt < MAX_RETRIES => {
					log::warn!("retryable error: {e}");
					continue;
				}
				Err(e) => return Err(e.into()),
			};

			if !response.status().is_success() {
				bail!("'{url}' responded with HTTP {}", response.status());
			}

			let headers = cache_headers(response.headers());

			let bytes = match response.bytes().await {
				Ok(b) => b,
				Err(e) if is_retryable_error(&e) && attempt < MAX_RETRIES => {
					log::warn!("retryable error reading response body: {e}");
					continue;
				}
				Err(e) => return Err(e.into()),
			};

			let render = start.elapsed().as_millis() as u64;
			log::trace!("fetched {} bytes from '{url}' in {render} ms", bytes.len());

			return Ok(FetchedTile::new(Blob::from(bytes.to_vec()))
				.with_headers(headers)
				.with_stats(TileStats::with_render(render)));
		}

		bail!("request failed after {MAX_RETRIES} retries")
	}
}

#[async_trait]
impl TileSource for HttpTileSource {
	async fn get_tile(&self, address: TileAddress) -> Result<FetchedTile> {
		self.fetch(address).await
	}
}
