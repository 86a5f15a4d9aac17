// src/config/tls.rs
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a PEM bundle of root CAs for the outbound storage probe.
pub fn load_root_certs(path: &Path) -> Result<Vec<reqwest::Certificate>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open CA bundle {}", path.display()))?;
    let mut reader = BufReader::new(file);

    let der_certs = rustls_pemfile::certs(&mut reader)
        .with_context(|| format!("Failed to parse CA bundle {}", path.display()))?;
    if der_certs.is_empty() {
        bail!("no certificates found in {}", path.display());
    }

    der_certs
        .into_iter()
        .map(|der| {
            reqwest::Certificate::from_der(&der)
                .with_context(|| format!("invalid certificate in {}", path.display()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_bundle_is_an_error() {
        let err = load_root_certs(Path::new("/nonexistent/ca.pem")).unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }

    #[test]
    fn bundle_without_certificates_is_an_error() {
        let path = std::env::temp_dir().join("healthcheckd-empty-ca.pem");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"not a certificate\n").unwrap();

        let err = load_root_certs(&path).unwrap_err();
        assert!(err.to_string().contains("no certificates"));
    }
}
