//! Shared helpers for pack-core integration tests.

use std::cell::RefCell;
use std::collections::HashMap;

use pack_core::{Error, Fetcher, Result};
use pack_fs::NormalizedPath;

/// In-memory [`Fetcher`] keyed by URL. Unknown URLs fail like a 404.
#[derive(Default)]
pub struct FakeFetcher {
    objects: HashMap<String, Vec<u8>>,
    requested: RefCell<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: impl AsRef<[u8]>) -> Self {
        self.objects.insert(url.to_string(), body.as_ref().to_vec());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }

    fn lookup(&self, url: &str) -> Result<&Vec<u8>> {
        self.requested.borrow_mut().push(url.to_string());
        self.objects.get(url).ok_or_else(|| Error::FetchFailed {
            url: url.to_string(),
            message: "HTTP 404 Not Found".to_string(),
        })
    }
}

impl Fetcher for FakeFetcher {
    fn fetch_to(&self, url: &str, dest: &NormalizedPath) -> Result<u64> {
        let body = self.lookup(url)?;
        std::fs::write(dest.to_native(), body).map_err(|e| Error::io(dest.to_native(), e))?;
        Ok(body.len() as u64)
    }

    fn fetch_text(&self, url: &str) -> Result<String> {
        Ok(String::from_utf8_lossy(self.lookup(url)?).into_owned())
    }
}
