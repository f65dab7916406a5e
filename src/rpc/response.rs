//! Response shapes returned by the cluster

use crate::error::{Result, SolkitError};
use crate::fee_calculator::FeeCalculator;
use crate::hash::Hash;
use crate::pubkey::PublicKey;
use base64::prelude::{Engine as _, BASE64_STANDARD};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcResponseContext {
    pub slot: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

/// A value together with the slot at which it was observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response<T> {
    pub context: RpcResponseContext,
    pub value: T,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcFeeCalculator {
    pub lamports_per_signature: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBlockhashFeeCalculator {
    pub blockhash: String,
    pub fee_calculator: RpcFeeCalculator,
}

impl RpcBlockhashFeeCalculator {
    pub fn into_parts(self) -> Result<(Hash, FeeCalculator)> {
        let blockhash: Hash = self.blockhash.parse()?;
        Ok((
            blockhash,
            FeeCalculator::new(self.fee_calculator.lamports_per_signature, blockhash),
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcLatestBlockhash {
    pub blockhash: String,
    pub last_valid_block_height: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RpcVersionInfo {
    pub solana_core: String,
    #[serde(default)]
    pub feature_set: Option<u32>,
}

/// Encoding of account data in `getAccountInfo`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountEncoding {
    Base58,
    Base64,
    #[serde(rename = "base64+zstd")]
    Base64Zstd,
    JsonParsed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAccount {
    pub program: String,
    pub parsed: Value,
    pub space: u64,
}

/// Account data as returned on the wire: either text-encoded bytes tagged
/// with their encoding, or a program-specific JSON rendering.
///
/// The node sends the first as a `[data, encoding]` array and the second as
/// an object, so the JSON shape selects the variant when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AccountData {
    Encoded(String, AccountEncoding),
    JsonParsed(ParsedAccount),
}

impl<'de> Deserialize<'de> for AccountData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            value @ Value::Array(_) => {
                let (data, encoding) = serde_json::from_value(value).map_err(de::Error::custom)?;
                Ok(AccountData::Encoded(data, encoding))
            }
            value @ Value::Object(_) => serde_json::from_value(value)
                .map(AccountData::JsonParsed)
                .map_err(de::Error::custom),
            other => Err(de::Error::custom(format!(
                "account data must be a [data, encoding] array or a parsed object, got {}",
                other
            ))),
        }
    }
}

impl AccountData {
    pub fn encoding(&self) -> AccountEncoding {
        match self {
            AccountData::Encoded(_, encoding) => *encoding,
            AccountData::JsonParsed(_) => AccountEncoding::JsonParsed,
        }
    }

    /// Raw account bytes. Fails for `jsonParsed` and compressed payloads.
    pub fn decode(&self) -> Result<Vec<u8>> {
        match self {
            AccountData::Encoded(data, AccountEncoding::Base58) => {
                Ok(bs58::decode(data).into_vec()?)
            }
            AccountData::Encoded(data, AccountEncoding::Base64) => Ok(BASE64_STANDARD.decode(data)?),
            AccountData::Encoded(_, AccountEncoding::Base64Zstd) => {
                Err(SolkitError::UnsupportedEncoding("base64+zstd".to_string()))
            }
            AccountData::Encoded(_, AccountEncoding::JsonParsed) | AccountData::JsonParsed(_) => {
                Err(SolkitError::UnsupportedEncoding("jsonParsed".to_string()))
            }
        }
    }

    pub fn parsed(&self) -> Option<&ParsedAccount> {
        match self {
            AccountData::JsonParsed(parsed) => Some(parsed),
            AccountData::Encoded(..) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub lamports: u64,
    pub data: AccountData,
    pub owner: String,
    pub executable: bool,
    pub rent_epoch: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<u64>,
}

impl AccountInfo {
    pub fn owner(&self) -> Result<PublicKey> {
        self.owner.parse()
    }
}
