//! OAuth percent-encoding ([RFC 5849 section 3.6][rfc]) and parameter
//! normalization.
//!
//! [rfc]: https://tools.ietf.org/html/rfc5849#section-3.6

use crate::params::Parameter;
use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything but the unreserved characters `A-Z a-z 0-9 - . _ ~`.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encodes the UTF-8 bytes of `s`, escaping every octet outside the
/// unreserved set as an uppercase `%XX`.
pub fn encode(s: &str) -> String {
    encode_bytes(s.as_bytes())
}

/// Same as [`encode`] for arbitrary bytes.
pub fn encode_bytes(bytes: &[u8]) -> String {
    percent_encode(bytes, OAUTH_ENCODE_SET).to_string()
}

/// Sorts parameters by name, then by value, comparing the raw (unencoded)
/// strings byte-wise.
///
/// The sort is stable, so identical pairs keep their input order.
pub fn normalize<'a, I>(parameters: I) -> Vec<&'a Parameter>
where
    I: IntoIterator<Item = &'a Parameter>,
{
    let mut sorted = parameters.into_iter().collect::<Vec<_>>();
    sorted.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.value.cmp(&b.value)));
    sorted
}

/// Joins `name=value` pairs with `&`, encoding each name and value.
pub(crate) fn join_pairs<'a, I>(parameters: I) -> String
where
    I: IntoIterator<Item = &'a Parameter>,
{
    parameters
        .into_iter()
        .map(|p| format!("{}={}", encode(&p.name), encode(&p.value)))
        .collect::<Vec<_>>()
        .join("&")
}
