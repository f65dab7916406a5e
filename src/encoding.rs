//! Text encodings for wire bytes

use crate::error::{Result, SolkitError};
use base64::prelude::{Engine as _, BASE64_STANDARD};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionEncoding {
    Base58,
    #[default]
    Base64,
}

impl TransactionEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base58 => "base58",
            Self::Base64 => "base64",
        }
    }

    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Base58 => bs58::encode(bytes).into_string(),
            Self::Base64 => BASE64_STANDARD.encode(bytes),
        }
    }

    pub fn decode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            Self::Base58 => Ok(bs58::decode(text).into_vec()?),
            Self::Base64 => Ok(BASE64_STANDARD.decode(text)?),
        }
    }
}

impl fmt::Display for TransactionEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionEncoding {
    type Err = SolkitError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "base58" => Ok(Self::Base58),
            "base64" => Ok(Self::Base64),
            other => Err(SolkitError::UnsupportedEncoding(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_values() {
        let bytes = [0u8, 1, 2, 255];
        assert_eq!(TransactionEncoding::Base64.encode(&bytes), "AAEC/w==");
        assert_eq!(TransactionEncoding::Base58.encode(&[0, 0, 1]), "112");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            TransactionEncoding::Base58.decode("0OIl"),
            Err(SolkitError::DecodingError(_))
        ));
        assert!(matches!(
            TransactionEncoding::Base64.decode("***"),
            Err(SolkitError::DecodingError(_))
        ));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(
            "base58".parse::<TransactionEncoding>().unwrap(),
            TransactionEncoding::Base58
        );
        assert!(matches!(
            "base64+zstd".parse::<TransactionEncoding>(),
            Err(SolkitError::UnsupportedEncoding(_))
        ));
        assert_eq!(
            serde_json::to_string(&TransactionEncoding::Base64).unwrap(),
            "\"base64\""
        );
    }
}
