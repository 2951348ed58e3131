//! The signing request and its lifecycle.
//!
//! A request moves through `Empty -> Initialized -> Prepared -> Signed`:
//!
//! * [`OAuthRequest::init_request`] validates the endpoint, clears every
//!   field and seeds a fresh nonce and timestamp.
//! * [`OAuthRequest::build_headers`] fills in the protocol parameters once,
//!   validates the request and signs it. Calling it again returns the same
//!   header entries.
//!
//! Setters only work while the request is `Initialized`.

use crate::base_string;
use crate::encode::{encode, join_pairs};
use crate::error::{Error, Result};
use crate::hmac::base64_hmac_sha1;
use crate::nonce::NonceGenerator;
use crate::params::{self, ParameterList};
use crate::timeout::RequestTimer;
use log::{debug, warn};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Content type of form-encoded bodies.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const VERSION: &str = "1.0";

/// HTTP methods a request can be signed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`; additional parameters go into the query string.
    Get,
    /// `POST`; additional parameters go into a form body.
    Post,
}

impl HttpMethod {
    /// The method token.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Post => http::Method::POST,
        }
    }
}

/// Client and token credentials.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Consumer key.
    pub consumer_key: String,
    /// Consumer secret.
    pub consumer_secret: String,
    /// Token.
    pub token: String,
    /// Token secret.
    pub token_secret: String,
    /// Verifier returned by the authorization step, if any.
    pub verifier: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("token", &self.token)
            .field("token_secret", &"<redacted>")
            .field("verifier", &self.verifier)
            .finish()
    }
}

/// Lifecycle state of an [`OAuthRequest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequestState {
    /// No endpoint yet.
    Empty,
    /// Endpoint set; credentials and parameters may be changed.
    Initialized,
    /// Protocol parameters are filled in.
    Prepared,
    /// `oauth_signature` has been computed.
    Signed,
}

/// Everything the transport needs to send a signed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
    /// Request method.
    pub method: HttpMethod,
    /// Target URL. For `GET` it carries the additional parameters.
    pub url: Url,
    /// `key="value"` entries of the `Authorization` header.
    pub header_entries: Vec<String>,
    /// Full `Authorization` header value.
    pub authorization: String,
    /// `Content-Type` for `POST`, `None` for `GET`.
    pub content_type: Option<String>,
    /// Request body. Empty for `GET`.
    pub body: Vec<u8>,
    /// The percent-encoded `oauth_signature` value.
    pub signature: String,
    /// Response timeout. Zero means none.
    pub timeout: Duration,
}

/// A request being prepared for signing.
#[derive(Debug)]
pub struct OAuthRequest {
    state: RequestState,
    nonces: NonceGenerator,
    endpoint: Option<Url>,
    method: HttpMethod,
    content_type: String,
    credentials: Credentials,
    nonce: String,
    timestamp: String,
    protocol: ParameterList,
    additional: ParameterList,
    raw_body: Vec<u8>,
    timeout: Duration,
}

fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let invalid = |reason: String| Error::EndpointInvalid {
        endpoint: endpoint.to_owned(),
        reason,
    };

    if endpoint.trim().is_empty() {
        return Err(invalid("endpoint is empty".to_owned()));
    }
    let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme `{}`", other))),
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("endpoint has no host".to_owned()));
    }
    Ok(url)
}

impl OAuthRequest {
    /// Creates an empty request drawing nonces from `nonces`.
    pub fn new(nonces: NonceGenerator) -> Self {
        let nonce = nonces.nonce();
        let timestamp = nonces.timestamp();
        OAuthRequest {
            state: RequestState::Empty,
            nonces,
            endpoint: None,
            method: HttpMethod::Post,
            content_type: FORM_URLENCODED.to_owned(),
            credentials: Credentials::default(),
            nonce,
            timestamp,
            protocol: ParameterList::new(),
            additional: ParameterList::new(),
            raw_body: Vec::new(),
            timeout: Duration::ZERO,
        }
    }

    /// Sets the endpoint and resets everything else to defaults: `POST`,
    /// form content type, fresh nonce and timestamp, no credentials.
    ///
    /// Query pairs on `endpoint` become additional parameters. On failure
    /// the request is left untouched.
    pub fn init_request(&mut self, endpoint: &str) -> Result<()> {
        let mut url = parse_endpoint(endpoint).map_err(|e| {
            warn!("Endpoint URL is not valid: {}", e);
            e
        })?;

        self.clear_request();

        let query = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect::<Vec<_>>();
        self.additional.extend(query);
        url.set_query(None);
        url.set_fragment(None);

        self.endpoint = Some(url);
        self.state = RequestState::Initialized;
        Ok(())
    }

    /// Drops the endpoint and credentials and returns the request to `Empty`.
    pub fn clear_request(&mut self) {
        self.credentials = Credentials::default();
        self.endpoint = None;
        self.reset_request();
    }

    /// Discards the protocol parameters, additional parameters, body and
    /// timeout, and reseeds the nonce and timestamp. The endpoint and the
    /// consumer and token credentials are kept, so a request that was
    /// prepared or signed goes back to `Initialized` and can be fixed and
    /// signed again.
    pub fn reset_request(&mut self) {
        self.state = if self.endpoint.is_some() {
            RequestState::Initialized
        } else {
            RequestState::Empty
        };
        self.method = HttpMethod::Post;
        self.content_type = FORM_URLENCODED.to_owned();
        self.credentials.verifier = None;
        self.nonce = self.nonces.nonce();
        self.timestamp = self.nonces.timestamp();
        self.protocol.clear();
        self.additional.clear();
        self.raw_body.clear();
        self.timeout = Duration::ZERO;
    }

    fn ensure_mutable(&self) -> Result<()> {
        match self.state {
            RequestState::Empty => Err(Error::SigningPrecondition("request is not initialized")),
            RequestState::Initialized => Ok(()),
            RequestState::Prepared | RequestState::Signed => Err(Error::AlreadyPrepared),
        }
    }

    /// Sets the consumer key and secret.
    pub fn set_consumer<K, S>(&mut self, key: K, secret: S) -> Result<()>
    where
        K: Into<String>,
        S: Into<String>,
    {
        self.ensure_mutable()?;
        self.credentials.consumer_key = key.into();
        self.credentials.consumer_secret = secret.into();
        Ok(())
    }

    /// Sets the token and token secret.
    pub fn set_token<T, S>(&mut self, token: T, secret: S) -> Result<()>
    where
        T: Into<String>,
        S: Into<String>,
    {
        self.ensure_mutable()?;
        self.credentials.token = token.into();
        self.credentials.token_secret = secret.into();
        Ok(())
    }

    /// Sets the verifier sent as `oauth_verifier`.
    pub fn set_verifier<V: Into<String>>(&mut self, verifier: V) -> Result<()> {
        self.ensure_mutable()?;
        self.credentials.verifier = Some(verifier.into());
        Ok(())
    }

    /// Replaces all credentials at once.
    pub fn set_credentials(&mut self, credentials: Credentials) -> Result<()> {
        self.ensure_mutable()?;
        self.credentials = credentials;
        Ok(())
    }

    /// Sets the HTTP method.
    pub fn set_http_method(&mut self, method: HttpMethod) -> Result<()> {
        self.ensure_mutable()?;
        self.method = method;
        Ok(())
    }

    /// Sets the `POST` content type.
    pub fn set_content_type<C: Into<String>>(&mut self, content_type: C) -> Result<()> {
        self.ensure_mutable()?;
        self.content_type = content_type.into();
        Ok(())
    }

    /// Sets the body sent verbatim when the content type is not form-encoded.
    pub fn set_raw_body<B: Into<Vec<u8>>>(&mut self, body: B) -> Result<()> {
        self.ensure_mutable()?;
        self.raw_body = body.into();
        Ok(())
    }

    /// Adds one additional parameter. Names may repeat.
    pub fn add_additional<N, V>(&mut self, name: N, value: V) -> Result<()>
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.ensure_mutable()?;
        self.additional.push(name, value);
        Ok(())
    }

    /// Adds every pair of `params` as additional parameters.
    pub fn set_additional<I, N, V>(&mut self, params: I) -> Result<()>
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        self.ensure_mutable()?;
        self.additional.extend(params);
        Ok(())
    }

    /// Overrides the seeded nonce.
    pub fn set_nonce<N: Into<String>>(&mut self, nonce: N) -> Result<()> {
        self.ensure_mutable()?;
        self.nonce = nonce.into();
        Ok(())
    }

    /// Overrides the seeded timestamp.
    pub fn set_timestamp<T: Into<String>>(&mut self, timestamp: T) -> Result<()> {
        self.ensure_mutable()?;
        self.timestamp = timestamp.into();
        Ok(())
    }

    /// Sets the response timeout. Zero disables it.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RequestState {
        self.state
    }

    /// The endpoint, without query string.
    pub fn endpoint(&self) -> Option<&Url> {
        self.endpoint.as_ref()
    }

    /// The HTTP method.
    pub fn http_method(&self) -> HttpMethod {
        self.method
    }

    /// The `POST` content type.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The raw body.
    pub fn raw_body(&self) -> &[u8] {
        &self.raw_body
    }

    /// The credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The nonce used for `oauth_nonce`.
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// The timestamp used for `oauth_timestamp`.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// The response timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// A stopped timer for the response timeout.
    pub fn timer(&self) -> RequestTimer {
        RequestTimer::new(self.timeout)
    }

    /// Caller-supplied parameters.
    pub fn additional_parameters(&self) -> &ParameterList {
        &self.additional
    }

    /// Protocol parameters. Empty until the request is prepared.
    pub fn protocol_parameters(&self) -> &ParameterList {
        &self.protocol
    }

    fn is_form(&self) -> bool {
        self.content_type == FORM_URLENCODED
    }

    /// Additional parameters are signed unless they are left out of the
    /// request, which happens for a `POST` with a non-form body.
    fn signs_additional(&self) -> bool {
        self.method == HttpMethod::Get || self.is_form()
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        let c = &self.credentials;
        let endpoint_empty = self.endpoint.as_ref().map_or(true, |e| e.as_str().is_empty());
        [
            ("endpoint", endpoint_empty),
            ("consumer key", c.consumer_key.is_empty()),
            ("nonce", self.nonce.is_empty()),
            ("timestamp", self.timestamp.is_empty()),
            ("token", c.token.is_empty()),
            ("token secret", c.token_secret.is_empty()),
        ]
        .iter()
        .filter(|(_, missing)| *missing)
        .map(|(name, _)| *name)
        .collect()
    }

    /// Checks that every field needed for signing is present.
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::ValidationFailed { missing })
        }
    }

    /// Whether [`validate`](Self::validate) passes.
    pub fn is_valid(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// The signature base string for the current parameters.
    pub fn base_string(&self) -> Result<String> {
        let endpoint = self.endpoint.as_ref().ok_or(Error::SigningPrecondition(
            "base string requested before initialization",
        ))?;
        let empty = ParameterList::new();
        let additional = if self.signs_additional() {
            &self.additional
        } else {
            &empty
        };
        Ok(base_string::base_string(
            self.method.as_str(),
            endpoint,
            &self.protocol,
            additional,
        ))
    }

    fn prepare(&mut self) {
        // Already populated: adding them again would duplicate every entry.
        if !self.protocol.is_empty() {
            return;
        }

        let p = &mut self.protocol;
        p.push(params::OAUTH_SIGNATURE_METHOD, SIGNATURE_METHOD);
        p.push(params::OAUTH_CONSUMER_KEY, self.credentials.consumer_key.as_str());
        p.push(params::OAUTH_VERSION, VERSION);
        p.push(params::OAUTH_TIMESTAMP, self.timestamp.as_str());
        p.push(params::OAUTH_NONCE, self.nonce.as_str());
        p.push(params::OAUTH_TOKEN, self.credentials.token.as_str());
        if let Some(verifier) = self.credentials.verifier.as_deref().filter(|v| !v.is_empty()) {
            p.push(params::OAUTH_VERIFIER, verifier);
        }
        self.state = RequestState::Prepared;
    }

    fn signing_key(&self) -> String {
        format!(
            "{}&{}",
            encode(&self.credentials.consumer_secret),
            encode(&self.credentials.token_secret)
        )
    }

    fn sign(&mut self) -> Result<()> {
        if self.protocol.contains(params::OAUTH_SIGNATURE) {
            return Ok(());
        }

        let base = self.base_string()?;
        debug!("Signature base string: {}", base);
        let signature = encode(&base64_hmac_sha1(
            base.as_bytes(),
            self.signing_key().as_bytes(),
        ));
        self.protocol.push(params::OAUTH_SIGNATURE, signature);
        self.state = RequestState::Signed;
        Ok(())
    }

    /// Prepares, validates and signs the request, then returns the
    /// `Authorization` header entries as `key="value"`.
    ///
    /// Validation runs before the signature is computed. If it fails the
    /// request stays `Prepared` without a signature; call
    /// [`reset_request`](Self::reset_request) to fix the inputs and sign
    /// again, or [`init_request`](Self::init_request) to start over.
    pub fn build_headers(&mut self) -> Result<Vec<String>> {
        if self.state == RequestState::Empty {
            return Err(Error::SigningPrecondition("request is not initialized"));
        }

        self.prepare();
        if let Err(e) = self.validate() {
            warn!("Invalid request: {}", e);
            return Err(e);
        }
        self.sign()?;

        Ok(self
            .protocol
            .iter()
            .map(|p| {
                // The signature is already percent-encoded.
                if p.name == params::OAUTH_SIGNATURE {
                    format!("{}=\"{}\"", p.name, p.value)
                } else {
                    format!("{}=\"{}\"", p.name, encode(&p.value))
                }
            })
            .collect())
    }

    /// The full `Authorization` header value.
    pub fn authorization_header(&mut self) -> Result<String> {
        let header = format!("OAuth {}", self.build_headers()?.join(", "));
        debug!("Authorization header: {}", header);
        Ok(header)
    }

    /// Additional parameters as a form-encoded body.
    pub fn request_body(&self) -> Vec<u8> {
        join_pairs(&self.additional).into_bytes()
    }

    /// Signs the request and assembles what the transport sends.
    pub fn sign_request(&mut self) -> Result<SignedRequest> {
        let authorization = self.authorization_header()?;
        let header_entries = self.build_headers()?;
        let endpoint = self.endpoint.clone().ok_or(Error::SigningPrecondition(
            "signed request has no endpoint",
        ))?;
        let signature = self
            .protocol
            .get(params::OAUTH_SIGNATURE)
            .unwrap_or_default()
            .to_owned();

        let (url, content_type, body) = match self.method {
            HttpMethod::Get => {
                let mut url = endpoint;
                if !self.additional.is_empty() {
                    url.set_query(Some(&join_pairs(&self.additional)));
                }
                (url, None, Vec::new())
            }
            HttpMethod::Post if self.is_form() => {
                (endpoint, Some(self.content_type.clone()), self.request_body())
            }
            HttpMethod::Post => {
                if !self.additional.is_empty() {
                    warn!(
                        "{} additional parameters dropped for content type {}",
                        self.additional.len(),
                        self.content_type
                    );
                }
                (endpoint, Some(self.content_type.clone()), self.raw_body.clone())
            }
        };

        Ok(SignedRequest {
            method: self.method,
            url,
            header_entries,
            authorization,
            content_type,
            body,
            signature,
            timeout: self.timeout,
        })
    }
}
