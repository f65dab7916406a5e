//! Synchronous JSON-RPC client

use crate::encoding::TransactionEncoding;
use crate::error::Result;
use crate::fee_calculator::FeeCalculator;
use crate::hash::Hash;
use crate::pubkey::PublicKey;
use crate::rpc::config::{
    CommitmentConfig, CommitmentLevel, RpcAccountInfoConfig, RpcClientConfig,
    RpcSendTransactionConfig,
};
use crate::rpc::http_sender::HttpSender;
use crate::rpc::mock_sender::MockSender;
use crate::rpc::request::RpcRequest;
use crate::rpc::response::{
    AccountEncoding, AccountInfo, Response, RpcBlockhashFeeCalculator, RpcLatestBlockhash,
    RpcVersionInfo,
};
use crate::rpc::sender::RpcSender;
use crate::signer::Signature;
use crate::transaction::Transaction;
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

pub struct RpcClient {
    sender: Box<dyn RpcSender + Send + Sync>,
    config: RpcClientConfig,
}

impl RpcClient {
    /// A client for `url` with default settings
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::new_with_config(RpcClientConfig::with_endpoint(url))
    }

    pub fn new_with_config(config: RpcClientConfig) -> Result<Self> {
        let sender = HttpSender::new_with_timeout(config.endpoint.clone(), config.timeout)?;
        Ok(Self::new_sender(sender, config))
    }

    pub fn new_sender<S: RpcSender + Send + Sync + 'static>(
        sender: S,
        config: RpcClientConfig,
    ) -> Self {
        Self {
            sender: Box::new(sender),
            config,
        }
    }

    /// A client backed by [`MockSender`]
    pub fn new_mock(url: impl Into<String>) -> Self {
        let url = url.into();
        Self::new_sender(
            MockSender::new(url.clone()),
            RpcClientConfig::with_endpoint(url),
        )
    }

    pub fn url(&self) -> String {
        self.sender.url()
    }

    pub fn config(&self) -> &RpcClientConfig {
        &self.config
    }

    /// The commitment used when a request does not name one
    pub fn commitment(&self) -> CommitmentLevel {
        self.config.commitment.commitment
    }

    pub fn send<T: DeserializeOwned>(&self, request: RpcRequest, params: Value) -> Result<T> {
        debug!("{} {}", request, params);
        let result = self.sender.send(request, params)?;
        Ok(serde_json::from_value(result)?)
    }

    pub fn get_balance(&self, pubkey: &PublicKey) -> Result<u64> {
        Ok(self
            .get_balance_with_commitment(pubkey, self.config.commitment)?
            .value)
    }

    pub fn get_balance_with_commitment(
        &self,
        pubkey: &PublicKey,
        commitment: CommitmentConfig,
    ) -> Result<Response<u64>> {
        self.send(
            RpcRequest::GetBalance,
            json!([pubkey.to_string(), commitment]),
        )
    }

    /// Account state as base64 bytes; `None` if the account does not exist
    pub fn get_account_info(&self, pubkey: &PublicKey) -> Result<Option<AccountInfo>> {
        let config = RpcAccountInfoConfig {
            encoding: Some(AccountEncoding::Base64),
            ..RpcAccountInfoConfig::default()
        };
        Ok(self.get_account_info_with_config(pubkey, config)?.value)
    }

    pub fn get_account_info_with_config(
        &self,
        pubkey: &PublicKey,
        mut config: RpcAccountInfoConfig,
    ) -> Result<Response<Option<AccountInfo>>> {
        config.commitment.get_or_insert(self.config.commitment);
        self.send(
            RpcRequest::GetAccountInfo,
            json!([pubkey.to_string(), config]),
        )
    }

    /// A recent blockhash and the fee schedule that applies to it
    pub fn get_recent_blockhash(&self) -> Result<(Hash, FeeCalculator)> {
        let response: Response<RpcBlockhashFeeCalculator> = self.send(
            RpcRequest::GetRecentBlockhash,
            json!([self.config.commitment]),
        )?;
        response.value.into_parts()
    }

    pub fn get_latest_blockhash(&self) -> Result<Hash> {
        Ok(self
            .get_latest_blockhash_with_commitment(self.config.commitment)?
            .0)
    }

    /// The blockhash and the last block height at which it is still valid
    pub fn get_latest_blockhash_with_commitment(
        &self,
        commitment: CommitmentConfig,
    ) -> Result<(Hash, u64)> {
        let response: Response<RpcLatestBlockhash> =
            self.send(RpcRequest::GetLatestBlockhash, json!([commitment]))?;
        Ok((
            response.value.blockhash.parse()?,
            response.value.last_valid_block_height,
        ))
    }

    pub fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64> {
        self.send(
            RpcRequest::GetMinimumBalanceForRentExemption,
            json!([data_len, self.config.commitment]),
        )
    }

    pub fn get_slot(&self) -> Result<u64> {
        self.send(RpcRequest::GetSlot, json!([self.config.commitment]))
    }

    pub fn get_version(&self) -> Result<RpcVersionInfo> {
        self.send(RpcRequest::GetVersion, Value::Null)
    }

    pub fn request_airdrop(&self, pubkey: &PublicKey, lamports: u64) -> Result<Signature> {
        let signature: String = self.send(
            RpcRequest::RequestAirdrop,
            json!([pubkey.to_string(), lamports, self.config.commitment]),
        )?;
        signature.parse()
    }

    /// Submit a signed transaction, base64 encoded
    pub fn send_transaction(&self, transaction: &Transaction) -> Result<Signature> {
        self.send_wire_transaction(&transaction.serialize()?, TransactionEncoding::Base64)
    }

    pub fn send_transaction_with_config(
        &self,
        transaction: &Transaction,
        config: RpcSendTransactionConfig,
    ) -> Result<Signature> {
        let encoding = config.encoding.unwrap_or_default();
        self.send_encoded(
            encoding.encode(&transaction.serialize()?),
            RpcSendTransactionConfig {
                encoding: Some(encoding),
                ..config
            },
        )
    }

    /// Submit already serialized transaction bytes
    pub fn send_wire_transaction(
        &self,
        wire_transaction: &[u8],
        encoding: TransactionEncoding,
    ) -> Result<Signature> {
        self.send_encoded(
            encoding.encode(wire_transaction),
            RpcSendTransactionConfig {
                encoding: Some(encoding),
                preflight_commitment: Some(self.commitment()),
                ..RpcSendTransactionConfig::default()
            },
        )
    }

    fn send_encoded(&self, encoded: String, config: RpcSendTransactionConfig) -> Result<Signature> {
        let signature: String =
            self.send(RpcRequest::SendTransaction, json!([encoded, config]))?;
        signature.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolkitError;
    use crate::program::system;
    use crate::rpc::mock_sender::{BLOCKHASH, PUBKEY, SIGNATURE};
    use crate::signer::Keypair;
    use std::sync::Arc;

    fn mock_client() -> (RpcClient, Arc<MockSender>) {
        let sender = Arc::new(MockSender::new("succeeds"));
        let client = RpcClient::new_sender(sender.clone(), RpcClientConfig::default());
        (client, sender)
    }

    #[test]
    fn test_get_balance_uses_configured_commitment() {
        let (client, sender) = mock_client();
        let pubkey: PublicKey = PUBKEY.parse().unwrap();

        assert_eq!(client.get_balance(&pubkey).unwrap(), 50);
        assert_eq!(
            sender.last_params(RpcRequest::GetBalance).unwrap(),
            json!([PUBKEY, {"commitment": "confirmed"}])
        );

        let response = client
            .get_balance_with_commitment(&pubkey, CommitmentConfig::finalized())
            .unwrap();
        assert_eq!(response.context.slot, 1);
        assert_eq!(
            sender.last_params(RpcRequest::GetBalance).unwrap()[1],
            json!({"commitment": "finalized"})
        );
    }

    #[test]
    fn test_get_account_info() {
        let (client, sender) = mock_client();
        let pubkey: PublicKey = PUBKEY.parse().unwrap();
        assert_eq!(client.get_account_info(&pubkey).unwrap(), None);
        assert_eq!(
            sender.last_params(RpcRequest::GetAccountInfo).unwrap()[1],
            json!({"encoding": "base64", "commitment": "confirmed"})
        );

        sender.set_mock(
            RpcRequest::GetAccountInfo,
            json!({
                "context": {"slot": 9},
                "value": {
                    "lamports": 10,
                    "data": ["AQID", "base64"],
                    "owner": "11111111111111111111111111111111",
                    "executable": false,
                    "rentEpoch": 0,
                },
            }),
        );
        let account = client.get_account_info(&pubkey).unwrap().unwrap();
        assert_eq!(account.lamports, 10);
        assert_eq!(account.data.decode().unwrap(), vec![1, 2, 3]);
        assert_eq!(account.owner().unwrap(), system::ID);
    }

    #[test]
    fn test_get_recent_blockhash() {
        let (client, _) = mock_client();
        let (blockhash, calculator) = client.get_recent_blockhash().unwrap();
        assert_eq!(blockhash.to_string(), BLOCKHASH);
        assert_eq!(calculator.lamports_per_signature, 5000);
    }

    #[test]
    fn test_get_latest_blockhash() {
        let (client, _) = mock_client();
        let (blockhash, last_valid) = client
            .get_latest_blockhash_with_commitment(CommitmentConfig::processed())
            .unwrap();
        assert_eq!(blockhash.to_string(), BLOCKHASH);
        assert_eq!(last_valid, 1234);
        assert_eq!(client.get_latest_blockhash().unwrap(), blockhash);
    }

    #[test]
    fn test_simple_queries() {
        let (client, _) = mock_client();
        assert_eq!(client.get_minimum_balance_for_rent_exemption(165).unwrap(), 20);
        assert_eq!(client.get_slot().unwrap(), 0);
        assert_eq!(client.get_version().unwrap().solana_core, "1.18.0");
        assert_eq!(
            client
                .request_airdrop(&PublicKey::new_unique(), 1_000)
                .unwrap()
                .to_string(),
            SIGNATURE
        );
    }

    #[test]
    fn test_send_transaction() {
        let (client, sender) = mock_client();
        let payer = Keypair::from_seed(&[11u8; 32]).unwrap();
        let blockhash = client.get_latest_blockhash().unwrap();

        let mut tx = Transaction::new_with_blockhash(
            vec![system::transfer(&payer.public_key, &PublicKey::new_unique(), 10).unwrap()],
            blockhash,
        );
        tx.sign(&[payer.private_key.clone()]).unwrap();

        let signature = client.send_transaction(&tx).unwrap();
        assert_eq!(Some(signature), tx.signatures()[0]);

        let params = sender.last_params(RpcRequest::SendTransaction).unwrap();
        assert_eq!(params[0], json!(tx.to_base64().unwrap()));
        assert_eq!(params[1]["encoding"], "base64");

        let signature = client
            .send_wire_transaction(&tx.serialize().unwrap(), TransactionEncoding::Base58)
            .unwrap();
        assert_eq!(Some(signature), tx.signatures()[0]);
    }

    #[test]
    fn test_rpc_error_is_propagated() {
        struct Failing;
        impl RpcSender for Failing {
            fn send(&self, _: RpcRequest, _: Value) -> Result<Value> {
                Err(SolkitError::RpcResponseError {
                    code: -32005,
                    message: "Node is behind".to_string(),
                })
            }
            fn url(&self) -> String {
                "failing".to_string()
            }
        }

        let client = RpcClient::new_sender(Failing, RpcClientConfig::default());
        assert!(matches!(
            client.get_slot(),
            Err(SolkitError::RpcResponseError { code: -32005, .. })
        ));
    }

    #[test]
    fn test_null_result_fails_to_parse() {
        let client = RpcClient::new_mock("fails");
        assert!(matches!(
            client.get_balance(&PublicKey::new_unique()),
            Err(SolkitError::SerdeJson(_))
        ));
    }
}
