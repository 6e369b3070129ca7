//! Textual encoding of 128-bit capability values.
//!
//! A token is the URL-safe base64 encoding of 16 bytes with the two trailing
//! `=` characters removed. The padding is always exactly `==` for a 16 byte
//! input, so nothing is lost by dropping it.

use crate::*;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::convert::TryInto;
use std::fmt;
use std::str::FromStr;

/// Length of every token, in characters
pub const TOKEN_LEN: usize = 22;

const URL_SAFE_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// A 22 character capability token drawn from `[A-Za-z0-9_-]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    text: String,
    bytes: [u8; 16],
}

impl Token {
    /// Encode 16 bytes as a token
    pub fn encode(bytes: &[u8; 16]) -> Self {
        let encoded = base64::encode_config(bytes, base64::URL_SAFE);
        debug_assert!(encoded.len() == TOKEN_LEN + 2 && encoded.ends_with("=="));

        let mut text = encoded;
        text.truncate(TOKEN_LEN);
        Token {
            text,
            bytes: *bytes,
        }
    }

    /// The 16 bytes behind this token
    pub fn decode(&self) -> [u8; 16] {
        self.bytes
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Encode 16 bytes as a 22 character token string
pub fn encode_token(bytes: &[u8; 16]) -> String {
    Token::encode(bytes).text
}

/// Decode a token string, returning `None` if it has the wrong length or alphabet
pub fn decode_token(token: &str) -> Option<[u8; 16]> {
    if !is_well_formed(token) {
        return None;
    }

    // The last symbol carries two data bits; its low four bits fall in the
    // dropped padding. Clear them so every well-formed token decodes.
    let mut padded = token.as_bytes().to_vec();
    let last = padded[TOKEN_LEN - 1];
    padded[TOKEN_LEN - 1] = URL_SAFE_ALPHABET[symbol_value(last)? & 0b11_0000];
    padded.extend_from_slice(b"==");

    let bytes = base64::decode_config(&padded, base64::URL_SAFE).ok()?;
    bytes.as_slice().try_into().ok()
}

fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_LEN
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

fn symbol_value(symbol: u8) -> Option<usize> {
    URL_SAFE_ALPHABET.iter().position(|&s| s == symbol)
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl FromStr for Token {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_token(s).ok_or(Error::TokenMalformed)?;
        Ok(Token::encode(&bytes))
    }
}

impl Serialize for Token {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Token::from_str(&s).map_err(de::Error::custom)
    }
}
