use std::sync::Arc;

use thiserror::Error;
use url::Url;

use crate::algorithm::UrlSignature;
use crate::canonicalize::{QueryLike, QueryParams};
use crate::param::Param;
use crate::{DefaultSignatureAlgorithm, DEFAULT_HOST, DEFAULT_PATH};

/// The types of error which may occur whilst signing a URL. No partially
/// signed URL is ever produced alongside an error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SigningError {
    /// The configured secret is not valid base64url. Retrying with the same
    /// configuration cannot succeed.
    #[error("Signing secret is not valid base64url: {0}")]
    InvalidSecret(#[from] base64::DecodeError),
    /// The configured secret decodes to a zero-length key, which anybody
    /// could use to forge signatures.
    #[error("Signing secret decodes to an empty key")]
    EmptySecret,
}

/// Decodes a base64url secret as handed out by the map service. Trailing
/// padding is accepted but not required. A secret which decodes to no bytes
/// is rejected.
pub fn decode_secret(secret: &str) -> Result<Vec<u8>, SigningError> {
    let key = base64::decode_config(secret.trim_end_matches('='), base64::URL_SAFE_NO_PAD)?;
    if key.is_empty() {
        return Err(SigningError::EmptySecret);
    }
    Ok(key)
}

/// Signs a query for `path`.
///
/// `client_id` is added as the `client` parameter when non-empty. Without a
/// secret (`None` or empty) the canonical query is returned unsigned. With one, the secret is
/// decoded from base64url and an HMAC-SHA1 signature over `path?query` is
/// appended as the final `signature` parameter.
pub fn sign_query(
    path: &str,
    client_id: Option<&str>,
    secret: Option<&str>,
    params: QueryParams,
) -> Result<String, SigningError> {
    let signature = secret
        .filter(|s| !s.is_empty())
        .map(|secret| decode_secret(secret).map(|key| DefaultSignatureAlgorithm::new(&key)))
        .transpose()?;
    Ok(sign_with(
        path,
        client_id,
        signature.as_ref().map(|s| s as &dyn UrlSignature),
        params,
    ))
}

fn sign_with(
    path: &str,
    client_id: Option<&str>,
    signature: Option<&dyn UrlSignature>,
    mut params: QueryParams,
) -> String {
    if let Some(client_id) = client_id.filter(|c| !c.is_empty()) {
        params.set_param(Param::Client, client_id);
    }

    let query = params.canonicalize();
    let signature = match signature {
        Some(signature) => signature,
        None => {
            debug!("Signing key absent, leaving query for {} unsigned", path);
            return query;
        }
    };

    // Sign the content
    let content = format!("{}?{}", path, query);
    let value = signature.url_sign(content.as_bytes());
    debug!("Signed query for {} using {}", path, signature.name());

    if query.is_empty() {
        format!("{}={}", Param::Signature, value)
    } else {
        format!("{}&{}={}", query, Param::Signature, value)
    }
}

fn normalize_path(path: &str) -> String {
    let mut url = Url::parse("http://localhost/").expect("Base URL should always parse");
    url.set_path(path);
    url.path().to_owned()
}

/// Where and how to sign requests: the service host and path, the client
/// identifier, and the signing key.
#[derive(Debug, Clone)]
pub struct SigningConfig {
    host: String,
    path: String,
    client_id: Option<String>,
    signature: Option<Arc<dyn UrlSignature>>,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PATH)
    }
}

impl SigningConfig {
    /// Creates an unsigned configuration for the given host and path.
    ///
    /// The path is normalized the way a URL parser sees it (leading `/`,
    /// percent-encoded, dot segments resolved), so that the signed bytes
    /// match the path of the URL which is eventually sent.
    pub fn new(host: &str, path: &str) -> Self {
        SigningConfig {
            host: host.trim_end_matches('/').into(),
            path: normalize_path(path),
            client_id: None,
            signature: None,
        }
    }

    /// Returns the service host, without a trailing `/`.
    pub fn host(&self) -> &str {
        &self.host
    }
    /// Returns the normalized service path covered by the signature.
    pub fn path(&self) -> &str {
        &self.path
    }
    /// Returns the client identifier sent as `client`, if any.
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }
    /// Set the client identifier (in-place)
    pub fn set_client_id(&mut self, client_id: &str) -> &mut Self {
        self.client_id = Some(client_id.into());
        self
    }
    /// Set the client identifier
    pub fn with_client_id(mut self, client_id: &str) -> Self {
        self.set_client_id(client_id);
        self
    }
    /// Returns the signature algorithm, or `None` if URLs are left unsigned.
    pub fn signature(&self) -> Option<&dyn UrlSignature> {
        self.signature.as_deref()
    }
    /// Set the signature algorithm and key (in-place)
    pub fn set_signature<SigAlg: UrlSignature>(&mut self, signature: SigAlg) -> &mut Self {
        self.signature = Some(Arc::new(signature));
        self
    }
    /// Set the signature algorithm and key
    pub fn with_signature<SigAlg: UrlSignature>(mut self, signature: SigAlg) -> Self {
        self.set_signature(signature);
        self
    }
    /// Use the default signature algorithm with a raw key
    pub fn with_key(self, key: &[u8]) -> Self {
        self.with_signature(DefaultSignatureAlgorithm::new(key))
    }
    /// Use the default signature algorithm with a base64url encoded secret.
    /// Fails immediately if the secret cannot be decoded. An empty secret
    /// leaves the configuration unsigned, as with [`sign_query`].
    pub fn with_encoded_secret(self, secret: &str) -> Result<Self, SigningError> {
        if secret.is_empty() {
            return Ok(self);
        }
        let key = decode_secret(secret)?;
        Ok(self.with_key(&key))
    }

    /// Signs `params` for this configuration's path, returning the query
    /// string only.
    pub fn sign_query(&self, params: QueryParams) -> String {
        sign_with(
            &self.path,
            self.client_id.as_deref(),
            self.signature(),
            params,
        )
    }

    /// Signs `params` and assembles the full URL.
    pub fn sign_url(&self, params: QueryParams) -> String {
        let query = self.sign_query(params);
        let url = if query.is_empty() {
            format!("{}{}", self.host, self.path)
        } else {
            format!("{}{}?{}", self.host, self.path, query)
        };
        info!("Built static map URL for {}{}", self.host, self.path);
        url
    }
}

/// Import this trait to get access to the `signed_url` method on all types
/// implementing `QueryLike`.
pub trait SigningExt {
    /// Encode and sign, returning only the query string.
    fn signed_query(&self, config: &SigningConfig) -> String;
    /// Encode and sign, returning `host + path + "?" + query`.
    fn signed_url(&self, config: &SigningConfig) -> String;
}

impl<R: QueryLike> SigningExt for R {
    fn signed_query(&self, config: &SigningConfig) -> String {
        config.sign_query(self.query_params())
    }
    fn signed_url(&self, config: &SigningConfig) -> String {
        config.sign_url(self.query_params())
    }
}
