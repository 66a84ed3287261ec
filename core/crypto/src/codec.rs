//! Textual representation of binary data.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use pwvault_common::{Error, Result};

/// Byte to text codec.
///
/// `decode(encode(bytes)) == bytes` for every input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Codec {
    /// Lower-case hexadecimal. Decoding accepts either case.
    #[default]
    Hex,
    /// Standard base64 alphabet with padding.
    Base64,
}

impl Codec {
    /// Encode bytes as text.
    pub fn encode(self, data: &[u8]) -> String {
        match self {
            Self::Hex => hex::encode(data),
            Self::Base64 => STANDARD.encode(data),
        }
    }

    /// Decode text produced by [`encode`](Codec::encode).
    ///
    /// # Errors
    /// - Returns error on characters outside the alphabet or a bad length
    pub fn decode(self, text: &str) -> Result<Vec<u8>> {
        match self {
            Self::Hex => hex::decode(text).map_err(|e| Error::Codec(e.to_string())),
            Self::Base64 => STANDARD
                .decode(text)
                .map_err(|e| Error::Codec(e.to_string())),
        }
    }

    /// Configuration name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Base64 => "base64",
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Codec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hex" => Ok(Self::Hex),
            "base64" => Ok(Self::Base64),
            _ => Err(Error::invalid_value("codec", s)),
        }
    }
}

impl Serialize for Codec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Codec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
