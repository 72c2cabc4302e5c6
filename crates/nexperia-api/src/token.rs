//! Page-scoped write token.
//!
//! The guest Wi-Fi page embeds `_sessionTmpToken = "<encoded>"` in its
//! script. The payload is a sequence of 4-character units (in practice
//! `\xNN`); the last two characters of each unit are one hex byte of the
//! real token.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Error;

static WRITE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"_sessionTmpToken = "(.+)""#).expect("write token pattern is valid")
});

const UNIT_LEN: usize = 4;
const PREFIX_LEN: usize = 2;

/// Decoded anti-forgery token sent as `_sessionTOKEN` on writes.
#[derive(Clone, PartialEq, Eq)]
pub struct WriteToken(String);

impl WriteToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for WriteToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WriteToken({} chars)", self.0.chars().count())
    }
}

/// Find the `_sessionTmpToken` assignment in a page body and decode it.
pub fn extract_write_token(body: &str) -> Result<WriteToken, Error> {
    let encoded = WRITE_TOKEN_RE
        .captures(body)
        .and_then(|caps| caps.get(1))
        .ok_or(Error::WriteTokenNotFound)?;
    decode_write_token(encoded.as_str())
}

/// Decode a `\xNN\xNN...`-style payload.
///
/// Yields one character per complete 4-character unit; a trailing partial
/// unit is ignored.
pub fn decode_write_token(encoded: &str) -> Result<WriteToken, Error> {
    let chars: Vec<char> = encoded.chars().collect();
    let mut decoded = String::with_capacity(chars.len() / UNIT_LEN);

    for (position, unit) in chars.chunks_exact(UNIT_LEN).enumerate() {
        let digits: String = unit[PREFIX_LEN..].iter().collect();
        let byte = u8::from_str_radix(&digits, 16).map_err(|_| Error::MalformedWriteToken {
            unit: unit.iter().collect(),
            position,
        })?;
        decoded.push(char::from(byte));
    }

    Ok(WriteToken(decoded))
}
