//! HTTP client construction for the FANBOX API and media hosts.

use reqwest::{header, Client};

use crate::config::ProxyConfig;
use crate::error::{Error, Result};

/// Browser user agent presented to FANBOX.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/110.0.0.0 Safari/537.36";

/// What a client is used for. The API client and the media downloader
/// client differ only in their Accept header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    Api,
    Download,
}

/// Build an HTTP client carrying the session cookie and FANBOX default
/// headers, optionally routed through a proxy.
pub fn build_client(
    session_id: &str,
    kind: ClientKind,
    proxy: Option<&ProxyConfig>,
) -> Result<Client> {
    let mut headers = header::HeaderMap::new();

    let accept = match kind {
        ClientKind::Api => "application/json, text/plain, */*",
        ClientKind::Download => "*/*",
    };
    headers.insert(header::ACCEPT, accept.parse().unwrap());
    headers.insert("Origin", "https://www.fanbox.cc".parse().unwrap());
    headers.insert(header::REFERER, "https://www.fanbox.cc".parse().unwrap());

    let cookie = format!(
        "FANBOXSESSID={}; privacy_policy_notification=0",
        session_id
    );
    headers.insert(
        header::COOKIE,
        cookie
            .parse()
            .map_err(|_| Error::Config("Session id contains invalid characters".to_string()))?,
    );

    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers);

    if let Some(proxy) = proxy {
        builder = builder.proxy(proxy.to_reqwest()?);
    }

    builder
        .build()
        .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_api_client() {
        assert!(build_client("session", ClientKind::Api, None).is_ok());
    }

    #[test]
    fn test_build_with_proxy() {
        let proxy = ProxyConfig::Http {
            url: "http://127.0.0.1:8080".to_string(),
        };
        assert!(build_client("session", ClientKind::Download, Some(&proxy)).is_ok());
    }

    #[test]
    fn test_invalid_session_rejected() {
        assert!(build_client("bad\nvalue", ClientKind::Api, None).is_err());
    }
}
