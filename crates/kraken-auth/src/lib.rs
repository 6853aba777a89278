//! Request signing and nonce issuance for Kraken private REST endpoints
//!
//! Every private call carries a strictly increasing nonce and an `API-Sign`
//! header computed over the exact form body that goes on the wire.
//!
//! # Example
//!
//! ```
//! use kraken_auth::{Credentials, CounterNonce, NonceSource, RequestSigner};
//!
//! let creds = Credentials::new("API_KEY", "c2VjcmV0")?;
//! let nonces = CounterNonce::starting_at(1);
//!
//! let nonce = nonces.next_nonce();
//! let signed = RequestSigner::new(&creds, "/0/private/Balance", nonce)
//!     .sign(format!("nonce={}", nonce));
//!
//! assert_eq!(signed.body, "nonce=1");
//! assert!(!signed.signature.is_empty());
//! # Ok::<(), kraken_auth::AuthError>(())
//! ```

mod credentials;
mod error;
mod nonce;

pub use credentials::{
    sign_request, Credentials, RequestSigner, SignedRequest, API_KEY_ENV, PRIVATE_KEY_ENV,
};
pub use error::{AuthError, AuthResult};
pub use nonce::{default_nonce_source, CounterNonce, MillisNonce, NonceSource};
