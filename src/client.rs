//! Handing signed requests to an HTTP client.

use crate::error::{Error, ManagerError};
use crate::nonce::NonceGenerator;
use crate::request::{HttpMethod, OAuthRequest};
use http::header::{HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use log::{debug, warn};
use std::convert::TryFrom;
use std::error::Error as StdError;
use std::ops::Deref;
use std::time::Duration;

/// A request builder of some HTTP client.
///
/// Implement this to plug a client into [`OAuthManager`].
pub trait RequestBuildah: Sized {
    /// Error returned by `send`.
    type Error: StdError + 'static;
    /// What `send` yields, e.g. the response text or a join handle.
    type ReturnValue;
    /// The client requests are built from.
    type ClientBuilder;

    /// Starts a request.
    fn new(method: Method, url: &'_ str, client: &Self::ClientBuilder) -> Self;

    /// Sets the body.
    fn body(self, b: Vec<u8>) -> Self;

    /// Adds a header.
    fn header<K, V>(self, key: K, val: V) -> Self
    where
        HeaderName: TryFrom<K>,
        HeaderValue: TryFrom<V>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>;

    /// Bounds the wait for the response. Builders without a timeout of
    /// their own ignore it.
    fn timeout(self, _timeout: Duration) -> Self {
        self
    }

    /// Sends the request.
    fn send(self) -> Result<Self::ReturnValue, Self::Error>;
}

/// A client either owned by the manager or borrowed from the caller.
#[derive(Debug)]
pub enum ClientHandle<'a, C> {
    /// Created and dropped by the manager.
    Owned(C),
    /// Owned by the caller, who outlives the manager.
    Borrowed(&'a C),
}

impl<C> ClientHandle<'_, C> {
    /// Whether the client came from the caller.
    pub fn is_borrowed(&self) -> bool {
        matches!(self, ClientHandle::Borrowed(_))
    }
}

impl<C> Deref for ClientHandle<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        match self {
            ClientHandle::Owned(c) => c,
            ClientHandle::Borrowed(c) => c,
        }
    }
}

/// Signs [`OAuthRequest`]s and sends them through `RB`.
pub struct OAuthManager<'a, RB: RequestBuildah> {
    client: ClientHandle<'a, RB::ClientBuilder>,
    nonces: NonceGenerator,
}

impl<'a, RB> OAuthManager<'a, RB>
where
    RB: RequestBuildah,
    RB::ClientBuilder: Default,
{
    /// Creates a manager owning a default client.
    pub fn new() -> Self {
        OAuthManager {
            client: ClientHandle::Owned(RB::ClientBuilder::default()),
            nonces: NonceGenerator::default(),
        }
    }
}

impl<'a, RB> Default for OAuthManager<'a, RB>
where
    RB: RequestBuildah,
    RB::ClientBuilder: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, RB: RequestBuildah> OAuthManager<'a, RB> {
    /// Creates a manager using a client owned by the caller.
    pub fn with_client(client: &'a RB::ClientBuilder) -> Self {
        OAuthManager {
            client: ClientHandle::Borrowed(client),
            nonces: NonceGenerator::default(),
        }
    }

    /// Replaces the nonce generator handed to new requests.
    pub fn with_nonces(mut self, nonces: NonceGenerator) -> Self {
        self.nonces = nonces;
        self
    }

    /// Switches to a caller-owned client. An owned client is dropped.
    pub fn set_client(&mut self, client: &'a RB::ClientBuilder) {
        self.client = ClientHandle::Borrowed(client);
    }

    /// Whether the client was supplied by the caller.
    pub fn is_client_user_set(&self) -> bool {
        self.client.is_borrowed()
    }

    /// The client in use.
    pub fn client(&self) -> &RB::ClientBuilder {
        &self.client
    }

    /// An empty request sharing this manager's nonce counter.
    pub fn new_request(&self) -> OAuthRequest {
        OAuthRequest::new(self.nonces.clone())
    }

    /// Signs `request` and sends it.
    ///
    /// `GET` requests carry the additional parameters in the query string;
    /// `POST` requests carry a form body or the raw body depending on the
    /// content type.
    pub fn execute_request(
        &self,
        request: &mut OAuthRequest,
    ) -> Result<RB::ReturnValue, ManagerError<RB::Error>> {
        if request.endpoint().is_none() {
            warn!("Request endpoint URL is not valid. Cannot proceed.");
            return Err(Error::EndpointInvalid {
                endpoint: String::new(),
                reason: "request has no endpoint".to_owned(),
            }
            .into());
        }
        if let Err(e) = request.validate() {
            warn!("Request is not valid. Cannot proceed.");
            return Err(e.into());
        }

        let signed = request.sign_request()?;
        let authorization = HeaderValue::from_str(&signed.authorization)
            .map_err(|e| ManagerError::InvalidHeader(e.into()))?;
        debug!("{} {}", signed.method, signed.url);

        let mut builder = RB::new(signed.method.into(), signed.url.as_str(), &self.client)
            .header(AUTHORIZATION, authorization);
        if signed.method == HttpMethod::Post {
            if let Some(content_type) = &signed.content_type {
                let value = HeaderValue::from_str(content_type)
                    .map_err(|e| ManagerError::InvalidHeader(e.into()))?;
                builder = builder.header(CONTENT_TYPE, value);
            }
            builder = builder.body(signed.body);
        }
        if !signed.timeout.is_zero() {
            builder = builder.timeout(signed.timeout);
        }

        builder.send().map_err(ManagerError::Transport)
    }
}

/// Blocking `reqwest` request builder.
#[cfg(feature = "reqwest-blocking")]
#[derive(Debug)]
pub struct DefaultRequestBuilder {
    inner: reqwest::blocking::RequestBuilder,
}

#[cfg(feature = "reqwest-blocking")]
impl RequestBuildah for DefaultRequestBuilder {
    type Error = reqwest::Error;
    type ReturnValue = String;
    type ClientBuilder = reqwest::blocking::Client;

    fn new(method: Method, url: &'_ str, client: &Self::ClientBuilder) -> Self {
        Self {
            inner: client.request(method, url),
        }
    }

    fn body(mut self, b: Vec<u8>) -> Self {
        self.inner = self.inner.body(b);
        self
    }

    fn header<K, V>(mut self, key: K, val: V) -> Self
    where
        HeaderName: TryFrom<K>,
        HeaderValue: TryFrom<V>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        self.inner = self.inner.header(key, val);
        self
    }

    fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    fn send(self) -> Result<Self::ReturnValue, Self::Error> {
        self.inner.send()?.error_for_status()?.text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nonce::NonceCounter;
    use crate::request::FORM_URLENCODED;
    use std::cell::Cell;
    use std::fmt;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct MockClient {
        sent: Rc<Cell<usize>>,
    }

    #[derive(Debug)]
    struct Sent {
        method: Method,
        url: String,
        headers: Vec<(HeaderName, HeaderValue)>,
        body: Option<Vec<u8>>,
        timeout: Option<Duration>,
    }

    impl Sent {
        fn header(&self, name: &HeaderName) -> Option<&str> {
            self.headers
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.to_str().unwrap())
        }
    }

    struct MockBuilder {
        count: Rc<Cell<usize>>,
        sent: Sent,
    }

    impl RequestBuildah for MockBuilder {
        type Error = fmt::Error;
        type ReturnValue = Sent;
        type ClientBuilder = MockClient;

        fn new(method: Method, url: &'_ str, client: &MockClient) -> Self {
            MockBuilder {
                count: Rc::clone(&client.sent),
                sent: Sent {
                    method,
                    url: url.to_owned(),
                    headers: Vec::new(),
                    body: None,
                    timeout: None,
                },
            }
        }

        fn body(mut self, b: Vec<u8>) -> Self {
            self.sent.body = Some(b);
            self
        }

        fn header<K, V>(mut self, key: K, val: V) -> Self
        where
            HeaderName: TryFrom<K>,
            HeaderValue: TryFrom<V>,
            <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
            <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
        {
            let name = HeaderName::try_from(key).ok().unwrap();
            let value = HeaderValue::try_from(val).ok().unwrap();
            self.sent.headers.push((name, value));
            self
        }

        fn timeout(mut self, timeout: Duration) -> Self {
            self.sent.timeout = Some(timeout);
            self
        }

        fn send(self) -> Result<Sent, fmt::Error> {
            self.count.set(self.count.get() + 1);
            Ok(self.sent)
        }
    }

    fn signed_request(manager: &OAuthManager<'_, MockBuilder>, method: HttpMethod) -> OAuthRequest {
        let mut req = manager.new_request();
        req.init_request("https://api.example.com/resource").unwrap();
        req.set_http_method(method).unwrap();
        req.set_consumer("ck", "cs").unwrap();
        req.set_token("tok", "ts").unwrap();
        req.add_additional("q", "1").unwrap();
        req
    }

    #[test]
    fn owned_and_borrowed_clients() {
        let owned = OAuthManager::<MockBuilder>::new();
        assert!(!owned.is_client_user_set());

        let external = MockClient::default();
        let mut manager = OAuthManager::<MockBuilder>::new();
        manager.set_client(&external);
        assert!(manager.is_client_user_set());
        assert!(std::ptr::eq(manager.client(), &external));

        let borrowed = OAuthManager::<MockBuilder>::with_client(&external);
        assert!(borrowed.is_client_user_set());
    }

    #[test]
    fn get_sends_query_without_body() {
        let client = MockClient::default();
        let manager = OAuthManager::<MockBuilder>::with_client(&client);
        let mut req = signed_request(&manager, HttpMethod::Get);

        let sent = manager.execute_request(&mut req).unwrap();
        assert_eq!(sent.method, Method::GET);
        assert_eq!(sent.url, "https://api.example.com/resource?q=1");
        assert!(sent.body.is_none());
        assert!(sent.header(&CONTENT_TYPE).is_none());
        assert!(sent.header(&AUTHORIZATION).unwrap().starts_with("OAuth "));
        assert_eq!(client.sent.get(), 1);
    }

    #[test]
    fn post_sends_form_body() {
        let client = MockClient::default();
        let manager = OAuthManager::<MockBuilder>::with_client(&client);
        let mut req = signed_request(&manager, HttpMethod::Post);

        let sent = manager.execute_request(&mut req).unwrap();
        assert_eq!(sent.method, Method::POST);
        assert_eq!(sent.url, "https://api.example.com/resource");
        assert_eq!(sent.body.as_deref(), Some(&b"q=1"[..]));
        assert_eq!(sent.header(&CONTENT_TYPE), Some(FORM_URLENCODED));
        let auth = sent.header(&AUTHORIZATION).unwrap();
        assert!(auth.contains("oauth_signature=\""));
    }

    #[test]
    fn timeout_is_forwarded() {
        let client = MockClient::default();
        let manager = OAuthManager::<MockBuilder>::with_client(&client);

        let mut req = signed_request(&manager, HttpMethod::Get);
        req.set_timeout(Duration::from_millis(1));
        let sent = manager.execute_request(&mut req).unwrap();
        assert_eq!(sent.timeout, Some(Duration::from_millis(1)));

        let mut req = signed_request(&manager, HttpMethod::Post);
        let sent = manager.execute_request(&mut req).unwrap();
        assert_eq!(sent.timeout, None);
    }

    #[test]
    fn invalid_request_is_not_sent() {
        let client = MockClient::default();
        let manager = OAuthManager::<MockBuilder>::with_client(&client);

        let mut empty = manager.new_request();
        assert!(matches!(
            manager.execute_request(&mut empty),
            Err(ManagerError::Request(Error::EndpointInvalid { .. }))
        ));

        let mut req = manager.new_request();
        req.init_request("https://api.example.com/resource").unwrap();
        req.set_consumer("ck", "cs").unwrap();
        assert!(matches!(
            manager.execute_request(&mut req),
            Err(ManagerError::Request(Error::ValidationFailed { .. }))
        ));
        assert_eq!(client.sent.get(), 0);
    }

    #[test]
    fn requests_share_nonce_counter() {
        let counter = NonceCounter::with_seed(3);
        let manager =
            OAuthManager::<MockBuilder>::new().with_nonces(NonceGenerator::new(counter));
        let a = manager.new_request();
        let b = manager.new_request();
        assert_ne!(a.nonce(), b.nonce());
    }
}
