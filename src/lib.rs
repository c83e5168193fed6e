#![deny(missing_docs)]
//! Canonical encoding and signing of URLs for a static map image service.
//!
//! A [`MapRequest`] describes the desired map. It is encoded into query
//! parameters in a fixed order, which are then canonicalized (keys sorted,
//! values percent-encoded) and optionally signed with an HMAC keyed by a
//! shared secret. The signature lets the service authenticate the URL without
//! the caller embedding a raw API key.
//!
//! ## Signing protocol
//!
//! 1. If a client identifier is configured it is added as `client`.
//! 2. The parameters are canonicalized.
//! 3. `path + "?" + query` is signed with HMAC-SHA1 using the base64url
//!    decoded secret.
//! 4. The digest is base64url encoded without padding and appended as the
//!    final `signature` parameter.
//!
//! ## Example usage
//!
//! ```rust
//! use static_map_sig::*;
//!
//! let config = SigningConfig::default()
//!     .with_client_id("gme-example")
//!     .with_encoded_secret("Zm9vYmFy")
//!     .unwrap();
//!
//! let request = MapRequest::new()
//!     .with_center("40.714728,-73.998672")
//!     .with_zoom(12)
//!     .with_size("400x400")
//!     .with_map_type(MapType::Roadmap)
//!     .with_markers(Markers::new().with_color("red").with_location((40.7, -73.9)));
//!
//! let url = request.signed_url(&config);
//! assert!(url.starts_with("https://maps.googleapis.com/maps/api/staticmap?center="));
//! verify_url(&url, &config).unwrap();
//! ```

use thiserror::Error;

/// Host of the static map service.
pub const DEFAULT_HOST: &str = "https://maps.googleapis.com";
/// Path of the static map endpoint. This is the path covered by the signature.
pub const DEFAULT_PATH: &str = "/maps/api/staticmap";

type DefaultSignatureAlgorithm = algorithm::HmacSha1;

#[macro_use]
mod macros;

mod algorithm;
pub use algorithm::*;

mod latlng;
pub use latlng::*;

mod param;
pub use param::*;

mod canonicalize;
pub use canonicalize::*;

mod request;
pub use request::*;

mod signing;
pub use signing::*;

mod verifying;
pub use verifying::*;

/// Error returned when a value cannot be parsed from its textual form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Not one of the supported image formats.
    #[error("Unknown image format: {0:?}")]
    ImageFormat(String),
    /// Not one of the supported map types.
    #[error("Unknown map type: {0:?}")]
    MapType(String),
    /// Not a `lat,lng` pair of decimal numbers.
    #[error("Malformed coordinate: {0:?}")]
    Coordinate(String),
}
