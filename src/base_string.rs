//! Signature base string construction ([RFC 5849 section 3.4.1][rfc]).
//!
//! ```text
//! METHOD & encode(endpoint) & encode(encode(k1)=encode(v1)&encode(k2)=encode(v2)...)
//! ```
//!
//! Parameter names and values are encoded once on their own and then a second
//! time as part of the joined block, so a space in a value ends up as `%2520`.
//!
//! [rfc]: https://tools.ietf.org/html/rfc5849#section-3.4.1

use crate::encode::{encode, join_pairs, normalize};
use crate::params::{ParameterList, OAUTH_SIGNATURE};
use url::Url;

/// The base string URI: scheme, host, port and path of `endpoint`.
pub fn base_uri(endpoint: &Url) -> String {
    let mut uri = endpoint.clone();
    // Only fails for URLs without a host, which never reach here.
    let _ = uri.set_username("");
    let _ = uri.set_password(None);
    uri.set_query(None);
    uri.set_fragment(None);
    uri.to_string()
}

/// Builds the signature base string.
///
/// `method` is upper-cased. Any `oauth_signature` entry in `protocol` is
/// skipped so a signed request reproduces its own base string.
pub fn base_string(
    method: &str,
    endpoint: &Url,
    protocol: &ParameterList,
    additional: &ParameterList,
) -> String {
    let params = protocol
        .iter()
        .filter(|p| p.name != OAUTH_SIGNATURE)
        .chain(additional.iter());
    let joined = join_pairs(normalize(params));

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(&base_uri(endpoint)),
        encode(&joined)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn uri_drops_query_and_fragment() {
        assert_eq!(
            base_uri(&url("HTTPS://API.Example.com:443/a/b?x=1#frag")),
            "https://api.example.com/a/b"
        );
        assert_eq!(
            base_uri(&url("http://example.com:8080/r")),
            "http://example.com:8080/r"
        );
    }

    #[test]
    fn uri_drops_userinfo() {
        assert_eq!(
            base_uri(&url("https://user:pw@api.example.com/resource")),
            "https://api.example.com/resource"
        );
        let base = base_string(
            "POST",
            &url("https://user@api.example.com/resource"),
            &ParameterList::new(),
            &ParameterList::new(),
        );
        assert_eq!(base, "POST&https%3A%2F%2Fapi.example.com%2Fresource&");
    }

    #[test]
    fn literal_fixture() {
        let protocol = vec![
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_consumer_key", "ck"),
            ("oauth_version", "1.0"),
            ("oauth_timestamp", "1000000000"),
            ("oauth_nonce", "abc"),
            ("oauth_token", "tok"),
        ]
        .into_iter()
        .collect::<ParameterList>();
        let additional = vec![("name", "a b")].into_iter().collect::<ParameterList>();

        let base = base_string(
            "post",
            &url("https://api.example.com/resource"),
            &protocol,
            &additional,
        );
        assert_eq!(
            base,
            "POST&https%3A%2F%2Fapi.example.com%2Fresource&name%3Da%2520b%26\
             oauth_consumer_key%3Dck%26oauth_nonce%3Dabc%26\
             oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1000000000%26\
             oauth_token%3Dtok%26oauth_version%3D1.0"
        );
    }

    #[test]
    fn space_is_double_encoded() {
        let additional = vec![("name", "a b")].into_iter().collect::<ParameterList>();
        let base = base_string(
            "GET",
            &url("http://example.com/"),
            &ParameterList::new(),
            &additional,
        );
        assert_eq!(base, "GET&http%3A%2F%2Fexample.com%2F&name%3Da%2520b");
        assert!(!base.contains("a%20b"));
    }

    #[test]
    fn repeated_names_and_reserved_values() {
        let additional = vec![("a3", "a"), ("b5", "=%3D"), ("a3", "2 q"), ("c2", "")]
            .into_iter()
            .collect::<ParameterList>();
        let base = base_string(
            "POST",
            &url("http://example.com/request?b5=ignored"),
            &ParameterList::new(),
            &additional,
        );
        assert_eq!(
            base,
            "POST&http%3A%2F%2Fexample.com%2Frequest&\
             a3%3D2%2520q%26a3%3Da%26b5%3D%253D%25253D%26c2%3D"
        );
    }

    #[test]
    fn signature_entry_is_excluded() {
        let mut protocol = vec![("oauth_nonce", "n")].into_iter().collect::<ParameterList>();
        let endpoint = url("http://example.com/");
        let before = base_string("GET", &endpoint, &protocol, &ParameterList::new());
        protocol.push(OAUTH_SIGNATURE, "sig");
        let after = base_string("GET", &endpoint, &protocol, &ParameterList::new());
        assert_eq!(before, after);
    }
}
