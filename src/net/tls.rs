//! TLS configuration and certificate loading.

use axum_server::tls_rustls::RustlsConfig;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for TLS setup.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("Certificate file not found: {0:?}")]
    CertNotFound(PathBuf),
    #[error("Private key file not found: {0:?}")]
    KeyNotFound(PathBuf),
    #[error("No certificates found in {0:?}")]
    NoCertificates(PathBuf),
    #[error("No private key found in {0:?}")]
    NoPrivateKey(PathBuf),
    #[error("Failed to read PEM from {path:?}: {source}")]
    Pem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid TLS configuration: {0}")]
    Config(#[source] std::io::Error),
}

/// Load TLS configuration from certificate and key files.
///
/// The files are checked up front so a bad path or empty PEM is reported
/// by name instead of as a generic rustls failure.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, TlsError> {
    if !cert_path.exists() {
        return Err(TlsError::CertNotFound(cert_path.to_path_buf()));
    }
    if !key_path.exists() {
        return Err(TlsError::KeyNotFound(key_path.to_path_buf()));
    }

    let cert_count = count_certs(cert_path)?;
    if cert_count == 0 {
        return Err(TlsError::NoCertificates(cert_path.to_path_buf()));
    }
    if !has_private_key(key_path)? {
        return Err(TlsError::NoPrivateKey(key_path.to_path_buf()));
    }

    tracing::debug!(cert = ?cert_path, certificates = cert_count, "TLS material validated");
    RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .map_err(TlsError::Config)
}

fn open(path: &Path) -> Result<BufReader<File>, TlsError> {
    File::open(path).map(BufReader::new).map_err(|source| TlsError::Pem {
        path: path.to_path_buf(),
        source,
    })
}

fn count_certs(path: &Path) -> Result<usize, TlsError> {
    let mut reader = open(path)?;
    let mut count = 0;
    for cert in rustls_pemfile::certs(&mut reader) {
        cert.map_err(|source| TlsError::Pem {
            path: path.to_path_buf(),
            source,
        })?;
        count += 1;
    }
    Ok(count)
}

fn has_private_key(path: &Path) -> Result<bool, TlsError> {
    let mut reader = open(path)?;
    rustls_pemfile::private_key(&mut reader)
        .map(|key| key.is_some())
        .map_err(|source| TlsError::Pem {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("request-bin-tls-{}-{}", name, std::process::id()));
        File::create(&path).unwrap().write_all(content.as_bytes()).unwrap();
        path
    }

    #[tokio::test]
    async fn missing_cert_is_reported() {
        let err = load_tls_config(Path::new("/no/cert.pem"), Path::new("/no/key.pem"))
            .await
            .unwrap_err();
        assert!(matches!(err, TlsError::CertNotFound(_)));
    }

    #[tokio::test]
    async fn empty_pem_is_reported() {
        let cert = temp_file("cert", "not a pem\n");
        let key = temp_file("key", "not a key\n");

        let err = load_tls_config(&cert, &key).await.unwrap_err();
        std::fs::remove_file(&cert).ok();
        std::fs::remove_file(&key).ok();

        assert!(matches!(err, TlsError::NoCertificates(_)));
    }

    #[tokio::test]
    async fn loads_pem_pair() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
        let result = load_tls_config(&dir.join("localhost.crt"), &dir.join("localhost.key")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn key_file_without_key_is_reported() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
        let cert = dir.join("localhost.crt");

        let err = load_tls_config(&cert, &cert).await.unwrap_err();
        assert!(matches!(err, TlsError::NoPrivateKey(_)));
    }
}
