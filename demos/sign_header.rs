// Copyright 2026 oauth-signer Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

#![warn(
    bad_style,
    unused,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]

use oauth_signer::{HttpMethod, NonceCounter, NonceGenerator, OAuthRequest};
use std::error::Error;

mod api {
    pub const ECHO: &str = "http://oauthbin.com/v1/echo?lang=en";
}

fn main() -> Result<(), Box<dyn Error>> {
    simple_logger::init_with_level(log::Level::Debug)?;

    let counter = NonceCounter::new();
    let mut request = OAuthRequest::new(NonceGenerator::new(counter));
    request.init_request(api::ECHO)?;
    request.set_http_method(HttpMethod::Get)?;
    request.set_consumer("key", "secret")?;
    request.set_token("accesskey", "accesssecret")?;
    request.add_additional("status", "hello world")?;

    println!("base string: {}", request.base_string()?);
    let signed = request.sign_request()?;
    println!("{} {}", signed.method, signed.url);
    println!("Authorization: {}", signed.authorization);

    Ok(())
}
