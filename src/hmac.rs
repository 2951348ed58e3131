//! Keyed-hashing for message authentication ([RFC 2104][rfc]) over SHA-1.
//!
//! Nothing here knows about OAuth.
//!
//! [rfc]: https://tools.ietf.org/html/rfc2104

use ring::digest::{self, SHA1_FOR_LEGACY_USE_ONLY, SHA1_OUTPUT_LEN};

/// SHA-1 block size in bytes.
pub const BLOCK_SIZE: usize = 64;
/// Length of an HMAC-SHA1 tag in bytes.
pub const OUTPUT_LEN: usize = SHA1_OUTPUT_LEN;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

fn sha1(parts: &[&[u8]]) -> [u8; OUTPUT_LEN] {
    let mut ctx = digest::Context::new(&SHA1_FOR_LEGACY_USE_ONLY);
    for part in parts {
        ctx.update(part);
    }
    let mut out = [0; OUTPUT_LEN];
    out.copy_from_slice(ctx.finish().as_ref());
    out
}

/// Computes `SHA1(K ^ opad, SHA1(K ^ ipad, message))`.
///
/// Keys longer than [`BLOCK_SIZE`] are replaced by their SHA-1 digest first;
/// shorter keys are zero-padded.
pub fn hmac_sha1(message: &[u8], key: &[u8]) -> [u8; OUTPUT_LEN] {
    let mut block = [0u8; BLOCK_SIZE];
    if key.len() > BLOCK_SIZE {
        block[..OUTPUT_LEN].copy_from_slice(&sha1(&[key]));
    } else {
        block[..key.len()].copy_from_slice(key);
    }

    let mut ipad = [0u8; BLOCK_SIZE];
    let mut opad = [0u8; BLOCK_SIZE];
    for (i, b) in block.iter().enumerate() {
        ipad[i] = b ^ IPAD;
        opad[i] = b ^ OPAD;
    }

    let inner = sha1(&[&ipad[..], message]);
    sha1(&[&opad[..], &inner[..]])
}

/// HMAC-SHA1 of `message`, base64-encoded.
pub fn base64_hmac_sha1(message: &[u8], key: &[u8]) -> String {
    base64::encode(hmac_sha1(message, key))
}
