use crate::adapters::outbound::csv::parse_blocklist_csv;
use crate::ports::outbound::BlocklistRepository;
use crate::scanning::domain::Blocklist;
use crate::shared::error::ScanError;
use crate::shared::Result;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HttpBlocklistClient adapter downloading blocklist CSVs over HTTP(S)
///
/// GitHub web links (`github.com/<owner>/<repo>/blob/<ref>/<file>`) are
/// rewritten to their `raw.githubusercontent.com` form before the request.
pub struct HttpBlocklistClient {
    client: reqwest::blocking::Client,
}

impl HttpBlocklistClient {
    /// Creates a client with a 30 second timeout and a `hulud-scan/<version>` user agent
    pub fn new() -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("hulud-scan/{}", version);
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    fn download(&self, url: &str) -> std::result::Result<String, String> {
        let response = self.client.get(url).send().map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }

        response.text().map_err(|e| e.to_string())
    }
}

impl BlocklistRepository for HttpBlocklistClient {
    fn fetch_blocklist(&self, location: &str) -> Result<Blocklist> {
        let url = convert_to_raw_url(location);
        debug!(url = %url, "downloading blocklist");

        let body = self.download(&url).map_err(|details| ScanError::BlocklistLoad {
            location: url.clone(),
            details: format!("download failed: {}", details),
        })?;

        parse_blocklist_csv(&body, &url)
    }
}

/// Whether a blocklist location should be fetched over the network
pub fn is_remote_location(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Rewrites `github.com/.../blob/...` links to `raw.githubusercontent.com/...`
pub fn convert_to_raw_url(url: &str) -> String {
    if url.contains("github.com") && url.contains("/blob/") {
        url.replacen("github.com", "raw.githubusercontent.com", 1)
            .replacen("/blob/", "/", 1)
    } else {
        url.to_string()
    }
}
