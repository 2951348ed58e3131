//! OAuth 1.0 request signing with HMAC-SHA1 ([RFC 5849]).
//!
//! ```
//! use oauth_signer::{HttpMethod, NonceCounter, NonceGenerator, OAuthRequest};
//!
//! let counter = NonceCounter::new();
//! let mut request = OAuthRequest::new(NonceGenerator::new(counter.clone()));
//! request.init_request("https://api.example.com/statuses")?;
//! request.set_http_method(HttpMethod::Get)?;
//! request.set_consumer("consumer-key", "consumer-secret")?;
//! request.set_token("token", "token-secret")?;
//! request.add_additional("count", "10")?;
//!
//! let signed = request.sign_request()?;
//! assert_eq!(signed.url.as_str(), "https://api.example.com/statuses?count=10");
//! assert!(signed.authorization.starts_with("OAuth oauth_signature_method=\"HMAC-SHA1\""));
//! # Ok::<(), oauth_signer::Error>(())
//! ```
//!
//! [RFC 5849]: https://tools.ietf.org/html/rfc5849

#![warn(
    bad_style,
    missing_docs,
    unused,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod base_string;
mod client;
pub mod encode;
mod error;
pub mod hmac;
pub mod nonce;
pub mod params;
mod request;
pub mod timeout;

#[cfg(feature = "reqwest-blocking")]
pub use crate::client::DefaultRequestBuilder;
pub use crate::client::{ClientHandle, OAuthManager, RequestBuildah};
pub use crate::error::{Error, ManagerError, Result};
pub use crate::nonce::{NonceCounter, NonceGenerator};
pub use crate::params::{Parameter, ParameterList};
pub use crate::request::{
    Credentials, HttpMethod, OAuthRequest, RequestState, SignedRequest, FORM_URLENCODED,
};
pub use crate::timeout::{RequestTimer, TimeoutWait, TimerOutcome};
