//! OIDC thumbprint resolution
//!
//! The thumbprint of an OIDC provider is the SHA-1 digest of the root CA
//! certificate its endpoint presents. The resolver performs a TLS handshake
//! with the endpoint host on port 443, never sends application data, and
//! picks the certificate to hash from the presented chain:
//!
//! 1. the first certificate that is self-issued (raw issuer equals raw
//!    subject) and marked as a CA by its basic constraints;
//! 2. otherwise the last certificate of the chain.
//!
//! Resolution is fallible and never panics; callers decide how to degrade.

use async_trait::async_trait;
use rustls::pki_types::{CertificateDer, ServerName};
use rustls::{ClientConfig, RootCertStore};
use sha1::{Digest, Sha1};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;
use url::Url;
use x509_parser::prelude::*;

const TLS_PORT: u16 = 443;

/// Reasons a thumbprint could not be resolved
#[derive(Debug, Error)]
pub enum ThumbprintError {
    /// The endpoint is not a URL with a usable host
    #[error("Invalid OIDC endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// TCP connection to the endpoint failed
    #[error("Failed to connect to {address}: {source}")]
    Connect {
        address: String,
        source: std::io::Error,
    },

    /// TLS handshake failed, e.g. the chain is not trusted
    #[error("TLS handshake with {host} failed: {source}")]
    Handshake {
        host: String,
        source: std::io::Error,
    },

    /// Connect plus handshake took longer than the configured deadline
    #[error("TLS handshake with {host} timed out after {timeout:?}")]
    Timeout { host: String, timeout: Duration },

    /// The handshake completed without peer certificates
    #[error("Server presented no certificates")]
    EmptyChain,

    /// A certificate of the chain does not parse
    #[error("Invalid certificate at position {index}: {reason}")]
    Certificate { index: usize, reason: String },

    /// The TLS client could not be configured
    #[error("TLS configuration error: {0}")]
    Config(String),
}

/// Resolves the thumbprint of an OIDC endpoint
#[async_trait]
pub trait ThumbprintResolver: Send + Sync {
    /// Return the lower case hex SHA-1 thumbprint for `endpoint_url`
    async fn resolve(&self, endpoint_url: &str) -> Result<String, ThumbprintError>;
}

/// Resolver that reads the chain from a live TLS handshake
#[derive(Clone)]
pub struct TlsThumbprintResolver {
    connector: TlsConnector,
    port: u16,
    timeout: Duration,
}

impl std::fmt::Debug for TlsThumbprintResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsThumbprintResolver")
            .field("port", &self.port)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl TlsThumbprintResolver {
    /// Create a resolver trusting the Mozilla root store
    ///
    /// # Errors
    ///
    /// Returns `ThumbprintError::Config` if the TLS client can't be configured.
    pub fn new(timeout: Duration) -> Result<Self, ThumbprintError> {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        Self::with_roots(roots, timeout)
    }

    /// Create a resolver trusting only `roots`
    ///
    /// # Errors
    ///
    /// Returns `ThumbprintError::Config` if the TLS client can't be configured.
    pub fn with_roots(roots: RootCertStore, timeout: Duration) -> Result<Self, ThumbprintError> {
        let config = ClientConfig::builder_with_provider(Arc::new(
            rustls::crypto::ring::default_provider(),
        ))
        .with_safe_default_protocol_versions()
        .map_err(|e| ThumbprintError::Config(e.to_string()))?
        .with_root_certificates(roots)
        .with_no_client_auth();

        Ok(Self {
            connector: TlsConnector::from(Arc::new(config)),
            port: TLS_PORT,
            timeout,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Handshake with `host` and return the presented chain
    async fn fetch_chain(&self, host: &str) -> Result<Vec<CertificateDer<'static>>, ThumbprintError> {
        let server_name =
            ServerName::try_from(host.to_string()).map_err(|e| ThumbprintError::InvalidEndpoint {
                endpoint: host.to_string(),
                reason: e.to_string(),
            })?;
        let address = format!("{host}:{}", self.port);

        let handshake = async {
            let tcp = TcpStream::connect(&address)
                .await
                .map_err(|source| ThumbprintError::Connect {
                    address: address.clone(),
                    source,
                })?;
            let tls = self
                .connector
                .connect(server_name, tcp)
                .await
                .map_err(|source| ThumbprintError::Handshake {
                    host: host.to_string(),
                    source,
                })?;
            let (_, session) = tls.get_ref();
            Ok::<_, ThumbprintError>(
                session
                    .peer_certificates()
                    .map(<[CertificateDer<'static>]>::to_vec)
                    .unwrap_or_default(),
            )
        };

        tokio::time::timeout(self.timeout, handshake)
            .await
            .map_err(|_elapsed| ThumbprintError::Timeout {
                host: host.to_string(),
                timeout: self.timeout,
            })?
    }
}

#[async_trait]
impl ThumbprintResolver for TlsThumbprintResolver {
    async fn resolve(&self, endpoint_url: &str) -> Result<String, ThumbprintError> {
        let host = endpoint_host(endpoint_url)?;
        let chain = self.fetch_chain(&host).await?;
        debug!("OIDC endpoint {} presented {} certificate(s)", host, chain.len());
        select_thumbprint(&chain)
    }
}

/// Extract the host of an OIDC endpoint; bare `host/path` values are read as
/// `https://host/path`
///
/// # Errors
///
/// Returns `ThumbprintError::InvalidEndpoint` if the value is not a URL with a host.
pub fn endpoint_host(endpoint_url: &str) -> Result<String, ThumbprintError> {
    let invalid = |reason: String| ThumbprintError::InvalidEndpoint {
        endpoint: endpoint_url.to_string(),
        reason,
    };

    let trimmed = endpoint_url.trim();
    if trimmed.is_empty() {
        return Err(invalid("endpoint is empty".to_string()));
    }
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = Url::parse(&candidate).map_err(|e| invalid(e.to_string()))?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(host.to_string()),
        _ => Err(invalid("endpoint has no host".to_string())),
    }
}

/// Pick the certificate to hash from `chain` and return its thumbprint
///
/// # Errors
///
/// Returns `ThumbprintError::EmptyChain` for an empty chain and
/// `ThumbprintError::Certificate` if a certificate does not parse.
pub fn select_thumbprint(chain: &[CertificateDer<'_>]) -> Result<String, ThumbprintError> {
    let last = chain.last().ok_or(ThumbprintError::EmptyChain)?;

    for (index, der) in chain.iter().enumerate() {
        let (_, cert) =
            X509Certificate::from_der(der.as_ref()).map_err(|e| ThumbprintError::Certificate {
                index,
                reason: e.to_string(),
            })?;
        if is_self_signed_ca(&cert) {
            debug!("Using self-signed CA at position {} for thumbprint", index);
            return Ok(sha1_hex(der.as_ref()));
        }
    }

    debug!("No self-signed CA in chain, using last certificate for thumbprint");
    Ok(sha1_hex(last.as_ref()))
}

fn is_self_signed_ca(cert: &X509Certificate<'_>) -> bool {
    let self_issued = cert.issuer().as_raw() == cert.subject().as_raw();
    let is_ca = matches!(cert.basic_constraints(), Ok(Some(ext)) if ext.value.ca);
    self_issued && is_ca
}

fn sha1_hex(der: &[u8]) -> String {
    format!("{:x}", Sha1::digest(der))
}
