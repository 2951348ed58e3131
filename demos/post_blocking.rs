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

use oauth_signer::{DefaultRequestBuilder, OAuthManager};
use rand::{distributions::Alphanumeric, Rng};
use std::error::Error;
use std::iter;

mod api {
    pub const ECHO: &str = "http://oauthbin.com/v1/echo";
}

fn random_string(len: usize) -> String {
    let mut rng = rand::thread_rng();
    iter::repeat(())
        .map(|()| rng.sample(Alphanumeric))
        .map(char::from)
        .take(len)
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    simple_logger::init_with_level(log::Level::Debug)?;

    let manager = OAuthManager::<DefaultRequestBuilder>::new();
    let mut request = manager.new_request();
    request.init_request(api::ECHO)?;
    request.set_consumer("key", "secret")?;
    request.set_token("accesskey", "accesssecret")?;
    request.add_additional("testFOO", "testFOO")?;
    for _ in 0..2 {
        request.add_additional(random_string(32), random_string(32))?;
    }

    let expected = String::from_utf8(request.request_body())?;
    let resp = manager.execute_request(&mut request)?;
    println!("echo response: {:?}", resp);
    assert_eq!(expected, resp);

    println!("OK");
    Ok(())
}
