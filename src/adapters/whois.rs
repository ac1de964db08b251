use crate::domain::model::DomainQuery;
use crate::domain::ports::RegistryClient;
use crate::utils::error::{CheckError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

const WHOIS_PORT: u16 = 43;
const IANA_WHOIS_SERVER: &str = "whois.iana.org";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RESPONSE_SIZE: usize = 1024 * 1024; // 1MB

/// Plain TCP WHOIS client (RFC 3912).
///
/// The registry server is taken from, in order: the forced server, a built-in
/// table of common TLDs, or the `refer:` line of an IANA lookup.
#[derive(Debug, Clone)]
pub struct WhoisClient {
    timeout: Duration,
    server: Option<String>,
}

impl Default for WhoisClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WhoisClient {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            server: None,
        }
    }

    /// Timeout for each connect/read/write step.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Query this `host[:port]` for every domain instead of resolving one.
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    pub async fn lookup(&self, domain: &str) -> Result<String> {
        let domain = normalize_domain(domain)?;
        let server = match &self.server {
            Some(server) => server.clone(),
            None => self.resolve_server(&domain).await?,
        };

        tracing::debug!(domain = %domain, server = %server, "querying WHOIS server");
        self.query_server(&server, &domain, &domain).await
    }

    async fn resolve_server(&self, domain: &str) -> Result<String> {
        let tld = domain.rsplit('.').next().unwrap_or(domain);
        if let Some(server) = known_server(tld) {
            return Ok(server.to_string());
        }

        tracing::debug!(tld = %tld, "asking IANA for the registry WHOIS server");
        let response = self.query_server(IANA_WHOIS_SERVER, tld, domain).await?;
        parse_iana_referral(&response).ok_or_else(|| CheckError::Query {
            domain: domain.to_string(),
            message: format!("no WHOIS server known for .{}", tld),
        })
    }

    async fn query_server(&self, server: &str, query: &str, domain: &str) -> Result<String> {
        let addr = if server.contains(':') {
            server.to_string()
        } else {
            format!("{}:{}", server, WHOIS_PORT)
        };
        let query_error = |message: String| CheckError::Query {
            domain: domain.to_string(),
            message,
        };

        let mut stream = timeout(self.timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| query_error(format!("connection to {} timed out", addr)))?
            .map_err(|e| query_error(format!("failed to connect to {}: {}", addr, e)))?;

        timeout(self.timeout, stream.write_all(format!("{}\r\n", query).as_bytes()))
            .await
            .map_err(|_| query_error("write timed out".to_string()))?
            .map_err(|e| query_error(format!("failed to send query: {}", e)))?;

        let mut response = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            match timeout(self.timeout, stream.read(&mut buf)).await {
                Ok(Ok(0)) => break,
                Ok(Ok(n)) => {
                    response.extend_from_slice(&buf[..n]);
                    if response.len() > MAX_RESPONSE_SIZE {
                        return Err(query_error("response too large".to_string()));
                    }
                }
                Ok(Err(e)) => return Err(query_error(format!("read error: {}", e))),
                // 有些伺服器回完資料後不關連線
                Err(_) if !response.is_empty() => break,
                Err(_) => return Err(query_error("read timed out".to_string())),
            }
        }

        Ok(decode_response(response))
    }
}

#[async_trait]
impl RegistryClient for WhoisClient {
    async fn query(&self, domain: &DomainQuery) -> Result<String> {
        self.lookup(domain.as_str()).await
    }
}

fn normalize_domain(domain: &str) -> Result<String> {
    let lowered = domain.trim().to_lowercase();
    let stripped = lowered
        .strip_prefix("http://")
        .or_else(|| lowered.strip_prefix("https://"))
        .unwrap_or(&lowered);
    let host = stripped.split('/').next().unwrap_or(stripped);
    let host = host.trim_end_matches('.');

    let valid = !host.is_empty()
        && host.contains('.')
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
    if !valid {
        return Err(CheckError::Query {
            domain: domain.to_string(),
            message: "invalid domain name".to_string(),
        });
    }

    Ok(host.to_string())
}

fn known_server(tld: &str) -> Option<&'static str> {
    match tld {
        "com" | "net" => Some("whois.verisign-grs.com"),
        "org" => Some("whois.pir.org"),
        "info" => Some("whois.afilias.net"),
        "io" => Some("whois.nic.io"),
        "co" => Some("whois.nic.co"),
        "me" => Some("whois.nic.me"),
        "xyz" => Some("whois.nic.xyz"),
        "app" | "dev" | "page" => Some("whois.nic.google"),
        "cn" => Some("whois.cnnic.cn"),
        _ => None,
    }
}

fn parse_iana_referral(response: &str) -> Option<String> {
    response.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();
        if (key == "refer" || key == "whois") && !value.is_empty() {
            Some(value.to_lowercase())
        } else {
            None
        }
    })
}

// UTF-8 優先，失敗時以 Latin-1 解碼
fn decode_response(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|e| e.into_bytes().iter().map(|&b| b as char).collect())
}
