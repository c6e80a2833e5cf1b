//! Proxy configuration parsing.

use url::Url;

use crate::error::{Error, Result};

/// Parsed proxy configuration.
///
/// Derived once from `Config.proxy` at startup and passed to every HTTP
/// client constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyConfig {
    Http { url: String },
    Socks5 { host: String, port: u16 },
}

impl ProxyConfig {
    /// Parse a `scheme://host:port` proxy URL. Supported schemes are `http`
    /// and `socks5`.
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input)
            .map_err(|e| Error::Proxy(format!("Could not parse '{}': {}", input, e)))?;

        match url.scheme() {
            "http" => Ok(ProxyConfig::Http {
                url: input.to_string(),
            }),
            "socks5" => {
                let host = url
                    .host_str()
                    .ok_or_else(|| Error::Proxy(format!("Could not determine host: {}", input)))?
                    .to_string();
                let port = url
                    .port()
                    .ok_or_else(|| Error::Proxy(format!("Could not determine port: {}", input)))?;
                Ok(ProxyConfig::Socks5 { host, port })
            }
            scheme => Err(Error::Proxy(format!(
                "Proxy protocol '{}' is not supported",
                scheme
            ))),
        }
    }

    /// Convert into a reqwest proxy.
    pub fn to_reqwest(&self) -> Result<reqwest::Proxy> {
        let url = match self {
            ProxyConfig::Http { url } => url.clone(),
            ProxyConfig::Socks5 { host, port } => format!("socks5://{}:{}", host, port),
        };
        reqwest::Proxy::all(&url).map_err(|e| Error::Proxy(format!("{}: {}", url, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_http_proxy() {
        let proxy = ProxyConfig::parse("http://127.0.0.1:8080").unwrap();
        assert_eq!(
            proxy,
            ProxyConfig::Http {
                url: "http://127.0.0.1:8080".to_string()
            }
        );
    }

    #[test]
    fn test_parse_socks5_proxy() {
        let proxy = ProxyConfig::parse("socks5://localhost:1080").unwrap();
        assert_eq!(
            proxy,
            ProxyConfig::Socks5 {
                host: "localhost".to_string(),
                port: 1080
            }
        );
    }

    #[test]
    fn test_socks5_without_port_rejected() {
        assert!(ProxyConfig::parse("socks5://localhost").is_err());
    }

    #[test]
    fn test_unsupported_scheme_rejected() {
        assert!(ProxyConfig::parse("ftp://example.com:21").is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(ProxyConfig::parse("not a proxy").is_err());
    }
}
