use bytes::Bytes;

use crate::error::Result;

/// Anything that can turn a URL into the raw bytes behind it.
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Bytes>;
}

#[cfg(feature = "download")]
pub use http::HttpFetcher;

#[cfg(feature = "download")]
mod http {
    use std::{io::Read, time::Duration};

    use bytes::Bytes;
    use reqwest::{blocking::Client, redirect::Policy};

    use super::Fetch;
    use crate::error::{Error, Result};

    const USER_AGENT: &str = concat!("resultados/", env!("CARGO_PKG_VERSION"));

    /// Blocking HTTP GET. No retries: a failed request is reported and the
    /// render cycle ends.
    pub struct HttpFetcher {
        client: Client,
    }

    impl HttpFetcher {
        /// Client with the library defaults, including reqwest's request timeout.
        pub fn new() -> Result<Self> {
            Self::with_timeout(None)
        }

        /// Client with an overall request timeout. `None` keeps the client default.
        pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
            let mut builder = Client::builder()
                .user_agent(USER_AGENT)
                .redirect(Policy::limited(10));
            if let Some(timeout) = timeout {
                builder = builder.timeout(timeout);
            }
            let client = builder.build()
                .map_err(|e| Error::network("<client>", e))?;
            Ok(Self { client })
        }
    }

    impl Fetch for HttpFetcher {
        fn fetch(&self, url: &str) -> Result<Bytes> {
            log::info!("[source::fetch] GET {url}");
            let mut resp = self.client.get(url).send()
                .map_err(|e| Error::network(url, e))?
                .error_for_status()
                .map_err(|e| Error::network(url, e))?;

            let mut buf = Vec::with_capacity(resp.content_length().unwrap_or(0) as usize);
            resp.read_to_end(&mut buf)
                .map_err(|e| Error::network(url, e))?;

            log::debug!("[source::fetch] {url}: {} bytes", buf.len());
            Ok(Bytes::from(buf))
        }
    }
}
