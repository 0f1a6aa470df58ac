/// Network adapters for remote blocklists
mod http_blocklist_client;

pub use http_blocklist_client::{convert_to_raw_url, is_remote_location, HttpBlocklistClient};
