use thiserror::Error;
use url::Url;

use crate::param::Param;
use crate::signing::SigningConfig;

/// This error indicates that we failed to verify a signed URL. As a result
/// the URL should not be trusted.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VerifyingError {
    /// The URL could not be parsed.
    #[error("Malformed URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL does not end with a `signature` parameter.
    #[error("URL has no trailing signature parameter")]
    MissingSignature,
    /// The configuration has no secret to verify against.
    #[error("No signing secret configured")]
    NoSecret,
    /// The signature does not match the rest of the URL.
    #[error("Signature does not match")]
    Mismatch,
}

/// Checks that `url` carries a valid signature for `config`'s key.
///
/// The signature must be the final query parameter. Everything before it is
/// verified exactly as received, so any change to the path or to the query
/// (including re-ordering) is detected.
pub fn verify_url(url: &str, config: &SigningConfig) -> Result<(), VerifyingError> {
    let signature = config.signature().ok_or(VerifyingError::NoSecret)?;

    let url: Url = url.parse()?;
    let query = url.query().ok_or(VerifyingError::MissingSignature)?;

    let marker = format!("{}=", Param::Signature);
    let (signed_query, value) = match query.rfind(&marker) {
        Some(0) => ("", &query[marker.len()..]),
        Some(idx) if query[..idx].ends_with('&') => {
            (&query[..idx - 1], &query[idx + marker.len()..])
        }
        _ => return Err(VerifyingError::MissingSignature),
    };
    if value.is_empty() || value.contains('&') {
        return Err(VerifyingError::MissingSignature);
    }

    // Build the content block
    let content = format!("{}?{}", url.path(), signed_query);
    if signature.url_verify(content.as_bytes(), value) {
        debug!("Verified signature for {}", url.path());
        Ok(())
    } else {
        info!("Signature mismatch for {}", url.path());
        Err(VerifyingError::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{LatLng, MapRequest, MapType, Markers, SigningExt};

    fn config() -> SigningConfig {
        SigningConfig::default()
            .with_client_id("gme-test")
            .with_encoded_secret("Zm9vYmFy")
            .expect("valid secret")
    }

    fn request() -> MapRequest {
        MapRequest::new()
            .with_center("city hall, new york")
            .with_zoom(13)
            .with_size("600x300")
            .with_map_type(MapType::Roadmap)
            .with_markers(
                Markers::new()
                    .with_color("blue")
                    .with_label("S")
                    .with_location(LatLng::new(40.702147, -74.015794)),
            )
    }

    #[test]
    fn signed_url_verifies() {
        let url = request().signed_url(&config());
        verify_url(&url, &config()).expect("Signature to be verified correctly");
    }

    #[test]
    fn known_vector_verifies() {
        let url = "https://maps.googleapis.com/maps/api/staticmap?center=Paris&zoom=5&signature=yjA-EOwOw0-Ryo9nLO1ZD9By3aM";
        verify_url(url, &SigningConfig::default().with_key(b"foobar"))
            .expect("Signature to be verified correctly");
    }

    #[test]
    fn non_default_paths_verify() {
        for (host, path) in &[
            ("https://example.com", ""),
            ("https://example.com/", "map"),
            ("https://example.com", "/a b"),
            ("http://localhost:8080", "/tiles/./static/../map"),
        ] {
            let config = SigningConfig::new(host, path).with_key(b"foobar");
            let url = request().signed_url(&config);
            verify_url(&url, &config)
                .unwrap_or_else(|e| panic!("{} failed to verify: {}", url, e));
        }
    }

    #[test]
    fn tampered_query_fails() {
        let url = request().signed_url(&config());
        let tampered = url.replace("zoom=13", "zoom=14");
        assert!(matches!(
            verify_url(&tampered, &config()),
            Err(VerifyingError::Mismatch)
        ));
    }

    #[test]
    fn other_key_fails() {
        let url = request().signed_url(&config());
        let other = SigningConfig::default().with_key(b"another key");
        assert!(matches!(verify_url(&url, &other), Err(VerifyingError::Mismatch)));
    }

    #[test]
    fn unsigned_url_fails() {
        let url = request().signed_url(&SigningConfig::default());
        assert!(matches!(
            verify_url(&url, &config()),
            Err(VerifyingError::MissingSignature)
        ));
        assert!(matches!(
            verify_url("https://maps.googleapis.com/maps/api/staticmap", &config()),
            Err(VerifyingError::MissingSignature)
        ));
    }

    #[test]
    fn signature_must_be_last() {
        let url = "https://maps.googleapis.com/maps/api/staticmap?signature=yjA-EOwOw0-Ryo9nLO1ZD9By3aM&center=Paris&zoom=5";
        assert!(matches!(
            verify_url(url, &SigningConfig::default().with_key(b"foobar")),
            Err(VerifyingError::MissingSignature)
        ));
    }

    #[test]
    fn requires_secret() {
        assert!(matches!(
            verify_url("https://example.com/?signature=abc", &SigningConfig::default()),
            Err(VerifyingError::NoSecret)
        ));
        assert!(matches!(
            verify_url("not a url", &config()),
            Err(VerifyingError::InvalidUrl(_))
        ));
    }
}
