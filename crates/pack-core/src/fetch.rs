//! HTTP transport for manifests and pack files.

use std::fs::{self, File};
use std::time::Duration;

use pack_fs::NormalizedPath;
use tracing::{debug, info};

use crate::config::NetworkSettings;
use crate::error::{Error, Result};

/// Source of remote objects.
///
/// The synchronizer and driver only see this trait, so tests can substitute
/// a local server or an in-memory fake.
pub trait Fetcher {
    /// Stream the object at `url` into `dest`, returning the bytes written.
    ///
    /// `dest` is only replaced once the whole body has arrived; a failed
    /// fetch leaves any previous file in place.
    fn fetch_to(&self, url: &str, dest: &NormalizedPath) -> Result<u64>;

    /// Fetch the object at `url` as text.
    fn fetch_text(&self, url: &str) -> Result<String>;
}

/// Blocking HTTP(S) fetcher. Any non-2xx status is a failure.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(network: &NetworkSettings) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(network.timeout_secs))
            .user_agent(network.user_agent.clone())
            .build()
            .map_err(|e| Error::FetchFailed {
                url: String::new(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let response = self.client.get(url).send().map_err(|e| Error::FetchFailed {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::FetchFailed {
                url: url.to_string(),
                message: format!("HTTP {}", status),
            });
        }
        Ok(response)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_to(&self, url: &str, dest: &NormalizedPath) -> Result<u64> {
        info!(url, "fetching");
        let mut response = self.get(url)?;

        let native = dest.to_native();
        let part = native.with_file_name(format!(
            "{}.part",
            dest.file_name().unwrap_or("download")
        ));

        let written = File::create(&part)
            .map_err(|e| Error::io(&part, e))
            .and_then(|mut file| {
                let written = response.copy_to(&mut file).map_err(|e| Error::FetchFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
                file.sync_all().map_err(|e| Error::io(&part, e))?;
                Ok(written)
            });

        let written = match written {
            Ok(written) => written,
            Err(e) => {
                let _ = fs::remove_file(&part);
                return Err(e);
            }
        };

        fs::rename(&part, &native).map_err(|e| {
            let _ = fs::remove_file(&part);
            Error::io(&native, e)
        })?;

        debug!(url, path = %dest, bytes = written, "download complete");
        Ok(written)
    }

    fn fetch_text(&self, url: &str) -> Result<String> {
        debug!(url, "fetching text");
        self.get(url)?.text().map_err(|e| Error::FetchFailed {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Append `relative` to `base`, inserting a `/` only when needed.
pub fn join_url(base: &str, relative: &str) -> String {
    let relative = relative.replace('\\', "/");
    match (base.ends_with('/'), relative.starts_with('/')) {
        (true, true) => format!("{}{}", base, &relative[1..]),
        (false, false) => format!("{}/{}", base, relative),
        _ => format!("{}{}", base, relative),
    }
}
