use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Method;

use crate::remote::domain::remote_store::RemoteStore;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Storage system fronted by a WebDAV-style HTTP endpoint.
///
/// Upload is PUT, delete is DELETE, rename is MOVE with a Destination
/// header. Each is a single independent request, matching the no-atomicity
/// assumption of the replacement protocol.
pub struct HttpRemoteStore {
    base_url: String,
    client: Client,
}

impl HttpRemoteStore {
    pub fn new(base_url: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl RemoteStore for HttpRemoteStore {
    fn upload(&self, path: &str, bytes: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
        self.client
            .put(self.url(path))
            .body(bytes.to_vec())
            .send()?
            .error_for_status()?;
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.client
            .delete(self.url(path))
            .send()?
            .error_for_status()?;
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> Result<(), Box<dyn std::error::Error>> {
        let method = Method::from_bytes(b"MOVE")?;
        self.client
            .request(method, self.url(from))
            .header("Destination", self.url(to))
            .header("Overwrite", "T")
            .send()?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base_and_path() {
        let store = HttpRemoteStore::new("https://files.example.com/dav/").unwrap();
        assert_eq!(
            store.url("/calls/rec.wav"),
            "https://files.example.com/dav/calls/rec.wav"
        );
        assert_eq!(
            store.url("calls/rec.wav"),
            "https://files.example.com/dav/calls/rec.wav"
        );
    }

    #[test]
    fn test_unreachable_host_is_an_error() {
        let store = HttpRemoteStore::new("http://invalid.nonexistent.example.com").unwrap();
        assert!(store.upload("rec.wav", b"audio").is_err());
        assert!(store.delete("rec.wav").is_err());
        assert!(store.rename("a", "b").is_err());
    }
}
