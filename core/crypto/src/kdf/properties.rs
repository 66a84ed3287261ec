//! Flat, named-property form of a KDF spec, as found in configuration.

use serde::{Deserialize, Serialize};

/// KDF configuration as a mapping of named properties.
///
/// Every field is optional here; [`KdfSpecBuilder`](super::KdfSpecBuilder)
/// applies the per-function defaults and reports what is missing. Integer
/// properties accept JSON numbers or decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KdfProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,

    #[serde(default, alias = "hash", skip_serializing_if = "Option::is_none")]
    pub hash_function: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub derived_key_length: Option<u32>,

    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub iterations: Option<u32>,

    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub block_size: Option<u32>,

    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub parallelization: Option<u32>,
}

impl KdfProperties {
    /// Properties naming only a function.
    pub fn with_function(function: impl Into<String>) -> Self {
        Self {
            function: Some(function.into()),
            ..Self::default()
        }
    }
}

mod lenient {
    use serde::de::{self, Deserializer};
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    pub fn option<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = match Option::<NumberOrString>::deserialize(deserializer)? {
            None => return Ok(None),
            Some(NumberOrString::Number(n)) => n,
            Some(NumberOrString::String(s)) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| de::Error::custom(format!("invalid integer \"{}\"", s)))?,
        };
        u32::try_from(value)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("integer {} out of range", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strings_and_numbers() {
        let properties: KdfProperties = serde_json::from_str(
            r#"{"function":"scrypt","derivedKeyLength":"64","iterations":1024,"blockSize":" 8 "}"#,
        )
        .unwrap();
        assert_eq!(properties.function.as_deref(), Some("scrypt"));
        assert_eq!(properties.derived_key_length, Some(64));
        assert_eq!(properties.iterations, Some(1024));
        assert_eq!(properties.block_size, Some(8));
        assert_eq!(properties.parallelization, None);
    }

    #[test]
    fn test_hash_alias() {
        let properties: KdfProperties =
            serde_json::from_str(r#"{"function":"pbkdf2","hash":"sha512"}"#).unwrap();
        assert_eq!(properties.hash_function.as_deref(), Some("sha512"));
    }

    #[test]
    fn test_rejects_negative_and_garbage() {
        assert!(serde_json::from_str::<KdfProperties>(r#"{"iterations":-1}"#).is_err());
        assert!(serde_json::from_str::<KdfProperties>(r#"{"iterations":"ten"}"#).is_err());
        assert!(serde_json::from_str::<KdfProperties>(r#"{"iterations":4294967296}"#).is_err());
    }

    #[test]
    fn test_serialize_skips_absent() {
        let json = serde_json::to_string(&KdfProperties::with_function("legacy")).unwrap();
        assert_eq!(json, r#"{"function":"legacy"}"#);
    }
}
