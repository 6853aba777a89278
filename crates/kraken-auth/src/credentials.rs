//! Authentication credentials for Kraken API
//!
//! Implements HMAC-SHA512 signing as required by Kraken's private endpoints.
//!
//! # Security
//!
//! Private keys are stored using the `secrecy` crate which:
//! - Zeroizes memory on drop (prevents memory scanning)
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretBox};
use sha2::{Digest, Sha256, Sha512};
use std::fmt;

use crate::error::{AuthError, AuthResult};

type HmacSha512 = Hmac<Sha512>;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "KRAKEN_API_KEY";
/// Environment variable holding the base64 private key
pub const PRIVATE_KEY_ENV: &str = "KRAKEN_PRIVATE_KEY";

/// Compute the `API-Sign` value for a private request
///
/// Kraken signature algorithm:
/// 1. SHA256(nonce + POST_data)
/// 2. HMAC-SHA512(secret, uri_path + SHA256_result)
/// 3. Base64 encode result
///
/// `post_data` must be the exact form-encoded body that goes on the wire and
/// must already contain `nonce=<nonce>`. `secret` is the base64-decoded key.
///
/// Pure function: identical inputs always give the identical signature.
pub fn sign_request(path: &str, nonce: u64, post_data: &[u8], secret: &[u8]) -> String {
    let mut sha256 = Sha256::new();
    sha256.update(nonce.to_string().as_bytes());
    sha256.update(post_data);
    let digest = sha256.finalize();

    let mut mac = HmacSha512::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(path.as_bytes());
    mac.update(&digest);

    BASE64.encode(mac.finalize().into_bytes())
}

/// API credentials for authenticated requests
///
/// Private keys are automatically zeroized when the Credentials are dropped,
/// preventing sensitive data from remaining in memory.
pub struct Credentials {
    /// API key (public)
    api_key: String,
    /// Private key (decoded from base64, zeroized on drop)
    private_key: SecretBox<Vec<u8>>,
}

impl Credentials {
    /// Create new credentials from API key and private key
    ///
    /// # Arguments
    /// * `api_key` - Your Kraken API key
    /// * `private_key` - Your private key (base64 encoded string)
    ///
    /// # Errors
    /// Fails if the API key is empty or the private key is not valid base64.
    /// The key is decoded here once, so signing itself cannot fail.
    pub fn new(api_key: impl Into<String>, private_key: impl AsRef<str>) -> AuthResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AuthError::InvalidCredentials("API key is empty".to_string()));
        }

        let decoded = BASE64.decode(private_key.as_ref().trim()).map_err(|e| {
            AuthError::InvalidCredentials(format!("Invalid base64 private key: {}", e))
        })?;
        if decoded.is_empty() {
            return Err(AuthError::InvalidCredentials("Private key is empty".to_string()));
        }

        Ok(Self {
            api_key,
            private_key: SecretBox::new(Box::new(decoded)),
        })
    }

    /// Create credentials from environment variables
    ///
    /// Reads `KRAKEN_API_KEY` and `KRAKEN_PRIVATE_KEY` from the environment.
    pub fn from_env() -> AuthResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(API_KEY_ENV.to_string()))?;
        let private_key = std::env::var(PRIVATE_KEY_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(PRIVATE_KEY_ENV.to_string()))?;

        Self::new(api_key, private_key)
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Sign a request body for `path` with this key
    pub fn sign(&self, path: &str, nonce: u64, post_data: &[u8]) -> String {
        sign_request(path, nonce, post_data, self.private_key.expose_secret())
    }
}

impl Clone for Credentials {
    /// Clone credentials (creates new SecretBox with same content)
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            private_key: SecretBox::new(Box::new(self.private_key.expose_secret().clone())),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible: String = self.api_key.chars().take(8).collect();
        f.debug_struct("Credentials")
            .field("api_key", &format!("{}...", visible))
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// A fully signed private request, ready for the transport
///
/// Built, sent and dropped per call. Never reuse one: Kraken rejects a nonce
/// it has already seen.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// Resource path, e.g. `/0/private/AddOrder`
    pub path: String,
    /// Nonce embedded in `body`
    pub nonce: u64,
    /// Form-encoded body, nonce first
    pub body: String,
    /// Value of the `API-Key` header
    pub api_key: String,
    /// Value of the `API-Sign` header
    pub signature: String,
}

impl fmt::Debug for SignedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedRequest")
            .field("path", &self.path)
            .field("nonce", &self.nonce)
            .field("body_len", &self.body.len())
            .finish_non_exhaustive()
    }
}

/// Request signer for building authenticated requests
#[derive(Debug)]
pub struct RequestSigner<'a> {
    credentials: &'a Credentials,
    path: String,
    nonce: u64,
}

impl<'a> RequestSigner<'a> {
    /// Create a signer for one request to `path` using a freshly issued nonce
    pub fn new(credentials: &'a Credentials, path: impl Into<String>, nonce: u64) -> Self {
        Self {
            credentials,
            path: path.into(),
            nonce,
        }
    }

    /// Get the nonce for this request
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    /// Sign the form-encoded body, which must already carry this signer's nonce
    pub fn sign(self, post_data: String) -> SignedRequest {
        let signature = self.credentials.sign(&self.path, self.nonce, post_data.as_bytes());
        SignedRequest {
            path: self.path,
            nonce: self.nonce,
            body: post_data,
            api_key: self.credentials.api_key().to_string(),
            signature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC_SECRET: &str =
        "kQH5HW/8p1uGOVjbgWA7FunAmGO8lsSUXNsu3eow76sz84Q18fWxnyRzBHCd3pd5nE9qa99HAZtuZuj6F1huXg==";
    const DOC_NONCE: u64 = 1616492376594;
    const DOC_BODY: &str =
        "nonce=1616492376594&ordertype=limit&pair=XBTUSD&price=37500&type=buy&volume=1.25";
    const DOC_SIGNATURE: &str =
        "4/dpxb3iT4tp/ZCVEwSnEsLxx0bqyhLpdfOpc6fn7OR8+UClSV5n9E6aSS8MPtnRfp32bAb0nmbRn6H8ndwLUQ==";

    fn doc_secret() -> Vec<u8> {
        BASE64.decode(DOC_SECRET).unwrap()
    }

    #[test]
    fn test_documented_signature_vector() {
        let signature = sign_request(
            "/0/private/AddOrder",
            DOC_NONCE,
            DOC_BODY.as_bytes(),
            &doc_secret(),
        );
        assert_eq!(signature, DOC_SIGNATURE);
    }

    #[test]
    fn test_credentials_match_free_function() {
        let creds = Credentials::new("API_KEY", DOC_SECRET).unwrap();
        assert_eq!(
            creds.sign("/0/private/AddOrder", DOC_NONCE, DOC_BODY.as_bytes()),
            DOC_SIGNATURE
        );
    }

    #[test]
    fn test_signing_consistency() {
        let creds = Credentials::new("API_KEY", DOC_SECRET).unwrap();
        let first = creds.sign("/0/private/Balance", DOC_NONCE, b"nonce=1616492376594");
        let second = creds.sign("/0/private/Balance", DOC_NONCE, b"nonce=1616492376594");
        assert_eq!(first, second);
        assert!(BASE64.decode(&first).is_ok());
    }

    #[test]
    fn test_signature_changes_with_path() {
        let secret = doc_secret();
        let base = sign_request("/0/private/AddOrder", DOC_NONCE, DOC_BODY.as_bytes(), &secret);
        let other = sign_request("/0/private/AddOrdeR", DOC_NONCE, DOC_BODY.as_bytes(), &secret);
        assert_ne!(base, other);
    }

    #[test]
    fn test_signature_changes_with_body() {
        let secret = doc_secret();
        let base = sign_request("/0/private/AddOrder", DOC_NONCE, DOC_BODY.as_bytes(), &secret);
        let mut body = DOC_BODY.as_bytes().to_vec();
        let last = body.len() - 1;
        body[last] = b'6';
        let other = sign_request("/0/private/AddOrder", DOC_NONCE, &body, &secret);
        assert_ne!(base, other);
    }

    #[test]
    fn test_signature_changes_with_secret() {
        let base = sign_request("/0/private/AddOrder", DOC_NONCE, DOC_BODY.as_bytes(), &doc_secret());
        let mut secret = doc_secret();
        secret[0] ^= 0x01;
        let other = sign_request("/0/private/AddOrder", DOC_NONCE, DOC_BODY.as_bytes(), &secret);
        assert_ne!(base, other);
    }

    #[test]
    fn test_signature_changes_with_nonce() {
        let secret = doc_secret();
        let base = sign_request("/0/private/AddOrder", DOC_NONCE, DOC_BODY.as_bytes(), &secret);
        let other = sign_request("/0/private/AddOrder", DOC_NONCE + 1, DOC_BODY.as_bytes(), &secret);
        assert_ne!(base, other);
    }

    #[test]
    fn test_invalid_base64_fails_at_construction() {
        let err = Credentials::new("API_KEY", "not base64!!").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials(_)));
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(Credentials::new("", DOC_SECRET).is_err());
        assert!(Credentials::new("API_KEY", "").is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_key() {
        let creds = Credentials::new("test_api_key", "dGVzdF9wcml2YXRlX2tleQ==").unwrap();
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("test_private_key"));
        assert!(!debug.contains("dGVzdF9wcml2YXRlX2tleQ"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_request_signer_builds_signed_request() {
        let creds = Credentials::new("API_KEY", DOC_SECRET).unwrap();
        let signer = RequestSigner::new(&creds, "/0/private/AddOrder", DOC_NONCE);
        assert_eq!(signer.nonce(), DOC_NONCE);
        assert_eq!(signer.api_key(), "API_KEY");

        let signed = signer.sign(DOC_BODY.to_string());
        assert_eq!(signed.signature, DOC_SIGNATURE);
        assert_eq!(signed.body, DOC_BODY);
        assert_eq!(signed.api_key, "API_KEY");

        let debug = format!("{:?}", signed);
        assert!(!debug.contains(DOC_SIGNATURE));
    }
}
