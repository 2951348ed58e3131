// Copyright 2026 oauth-signer Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use oauth_signer::{HttpMethod, OAuthManager, RequestBuildah, TimerOutcome};
use reqwest::{
    header::{HeaderName, HeaderValue},
    Client, Method, RequestBuilder,
};
use std::convert::TryFrom;
use std::error::Error;
use std::time::Duration;

mod api {
    pub const REQUEST_TOKEN: &str = "http://oauthbin.com/v1/request-token";
}

pub struct AsyncRequestBuilder {
    inner: RequestBuilder,
}

impl RequestBuildah for AsyncRequestBuilder {
    type Error = reqwest::Error;
    type ReturnValue = tokio::task::JoinHandle<Result<String, Self::Error>>;
    type ClientBuilder = Client;

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
        Ok(tokio::spawn(async {
            Ok(self.inner.send().await?.error_for_status()?.text().await?)
        }))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    simple_logger::init_with_level(log::Level::Info)?;

    let client = Client::new();
    let manager = OAuthManager::<AsyncRequestBuilder>::with_client(&client);

    let mut request = manager.new_request();
    request.init_request(api::REQUEST_TOKEN)?;
    request.set_http_method(HttpMethod::Get)?;
    request.set_consumer("key", "secret")?;
    request.set_token("requestkey", "requestsecret")?;
    request.set_timeout(Duration::from_secs(10));

    let mut timer = request.timer();
    let response = manager.execute_request(&mut request)?;
    match timer.start() {
        Some(wait) => {
            tokio::select! {
                resp = response => {
                    timer.stop();
                    println!("Response: {:#?}", resp??);
                }
                outcome = wait.wait() => {
                    if outcome == TimerOutcome::TimedOut {
                        println!("request timed out");
                    }
                }
            }
        }
        None => println!("Response: {:#?}", response.await??),
    }

    Ok(())
}
