//! Cover image fetching with an in-memory LRU.

use std::sync::Arc;
use std::time::Duration;

use nowwatching_core::cache::BoundedCache;
use reqwest::Client;

/// Downloads poster bytes, remembering successful fetches by URL.
#[derive(Debug)]
pub struct ImageLoader {
    http: Client,
    cache: BoundedCache<String, Arc<[u8]>>,
}

impl ImageLoader {
    pub fn new(timeout: Duration, capacity: usize) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: Client::builder().timeout(timeout).build()?,
            cache: BoundedCache::new(capacity),
        })
    }

    /// Bytes at `url`, or `None` when the download fails. Failures are not
    /// cached.
    pub async fn load(&self, url: &str) -> Option<Arc<[u8]>> {
        if let Some(hit) = self.cache.get(&url.to_string()) {
            return Some(hit);
        }

        match self.fetch(url).await {
            Ok(bytes) if !bytes.is_empty() => {
                let bytes: Arc<[u8]> = Arc::from(bytes);
                self.cache.put(url.to_string(), bytes.clone());
                Some(bytes)
            }
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(url, error = %e, "cover image download failed");
                None
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, reqwest::Error> {
        let resp = self.http.get(url).send().await?.error_for_status()?;
        Ok(resp.bytes().await?.to_vec())
    }
}
