//! Transaction wire codec and the signing state machine
//!
//! Wire layout:
//!
//! ```text
//!   signatures   compact-array of 64-byte signatures
//!   message      header ‖ keys ‖ blockhash ‖ instructions (not length-prefixed)
//! ```
//!
//! A [`Transaction`] starts out `Building`. The first signature freezes its
//! instruction list and blockhash; after that only more signatures can be
//! attached.

use crate::compact_array;
use crate::encoding::TransactionEncoding;
use crate::error::{Result, SolkitError};
use crate::fee_calculator::FeeCalculator;
use crate::hash::Hash;
use crate::instruction::Instruction;
use crate::message::Message;
use crate::pubkey::PublicKey;
use crate::serialization::{compact_u16_size, remaining, ByteDeserialize, ByteSerialize};
use crate::signer::{PrivateKey, Signature, SIGNATURE_BYTES};
use log::trace;
use std::io::Cursor;

/// Largest serialized transaction the cluster accepts in one packet
pub const PACKET_DATA_SIZE: usize = 1280 - 40 - 8;

/// Prefix `message` with its signatures.
///
/// The signature count must equal the message's first header byte.
pub fn encode_transaction(signatures: &[Signature], message: &[u8]) -> Result<Vec<u8>> {
    let required = *message.first().ok_or(SolkitError::BufferTooSmall {
        needed: 1,
        available: 0,
    })? as usize;
    if signatures.len() != required {
        return Err(SolkitError::SignatureCountMismatch {
            expected: required,
            actual: signatures.len(),
        });
    }

    let mut bytes = Vec::with_capacity(
        compact_u16_size(signatures.len()) + signatures.len() * SIGNATURE_BYTES + message.len(),
    );
    compact_array::encode_pod(signatures, &mut bytes)?;
    bytes.extend_from_slice(message);
    Ok(bytes)
}

/// A message together with one signature per required signer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTransaction {
    pub signatures: Vec<Signature>,
    pub message: Message,
}

impl CompiledTransaction {
    pub fn new(signatures: Vec<Signature>, message: Message) -> Result<Self> {
        let expected = message.header.num_required_signatures as usize;
        if signatures.len() != expected {
            return Err(SolkitError::SignatureCountMismatch {
                expected,
                actual: signatures.len(),
            });
        }
        Ok(Self {
            signatures,
            message,
        })
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        encode_transaction(&self.signatures, &self.message.serialize()?)
    }

    /// Decode wire bytes. Re-serializing the result yields `bytes` again.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let signatures = compact_array::decode_pod::<Signature>(&mut cursor)?;
        let message = Message::deserialize_bytes(&mut cursor)?;

        let trailing = remaining(&cursor);
        if trailing != 0 {
            return Err(SolkitError::DeserializationError(format!(
                "{} trailing bytes after transaction",
                trailing
            )));
        }
        Self::new(signatures, message)
    }

    pub fn message_data(&self) -> Result<Vec<u8>> {
        self.message.serialize()
    }

    /// Serialized length in bytes
    pub fn size(&self) -> usize {
        compact_u16_size(self.signatures.len())
            + self.signatures.len() * SIGNATURE_BYTES
            + self.message.byte_size()
    }

    pub fn exceeds_packet_limit(&self) -> bool {
        self.size() > PACKET_DATA_SIZE
    }

    /// Every signature is valid for its signer over the message bytes
    pub fn verify(&self) -> Result<bool> {
        let data = self.message_data()?;
        Ok(self
            .signatures
            .iter()
            .zip(self.message.signer_keys())
            .all(|(signature, key)| signature.verify(key, &data)))
    }

    pub fn encode(&self, encoding: TransactionEncoding) -> Result<String> {
        Ok(encoding.encode(&self.serialize()?))
    }

    pub fn decode(text: &str, encoding: TransactionEncoding) -> Result<Self> {
        Self::deserialize(&encoding.decode(text)?)
    }

    pub fn to_base58(&self) -> Result<String> {
        self.encode(TransactionEncoding::Base58)
    }

    pub fn to_base64(&self) -> Result<String> {
        self.encode(TransactionEncoding::Base64)
    }

    pub fn from_base58(text: &str) -> Result<Self> {
        Self::decode(text, TransactionEncoding::Base58)
    }

    pub fn from_base64(text: &str) -> Result<Self> {
        Self::decode(text, TransactionEncoding::Base64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// No signatures yet; instructions may still be added
    Building,
    PartiallySigned,
    FullySigned,
}

/// A transaction under construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    instructions: Vec<Instruction>,
    recent_blockhash: Hash,
    /// Compiled on the first signature and never recompiled
    frozen: Option<Message>,
    signatures: Vec<Option<Signature>>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_with_blockhash(instructions: Vec<Instruction>, recent_blockhash: Hash) -> Self {
        Self {
            instructions,
            recent_blockhash,
            ..Self::default()
        }
    }

    /// Append instructions; fails once any signature is attached
    pub fn add_instructions<I>(&mut self, instructions: I) -> Result<()>
    where
        I: IntoIterator<Item = Instruction>,
    {
        self.ensure_building()?;
        self.instructions.extend(instructions);
        Ok(())
    }

    pub fn set_recent_blockhash(&mut self, recent_blockhash: Hash) -> Result<()> {
        self.ensure_building()?;
        self.recent_blockhash = recent_blockhash;
        Ok(())
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn recent_blockhash(&self) -> Hash {
        self.recent_blockhash
    }

    pub fn signatures(&self) -> &[Option<Signature>] {
        &self.signatures
    }

    pub fn state(&self) -> TransactionState {
        if self.frozen.is_none() {
            TransactionState::Building
        } else if self.signatures.iter().all(Option::is_some) {
            TransactionState::FullySigned
        } else {
            TransactionState::PartiallySigned
        }
    }

    /// The message signers sign
    pub fn message(&self) -> Result<Message> {
        match &self.frozen {
            Some(message) => Ok(message.clone()),
            None => Message::new(&self.instructions, self.recent_blockhash),
        }
    }

    pub fn message_data(&self) -> Result<Vec<u8>> {
        self.message()?.serialize()
    }

    /// Sign with every key in `private_keys`.
    ///
    /// Each key must belong to a required signer. Nothing is recorded unless
    /// every key is accepted.
    pub fn sign(&mut self, private_keys: &[PrivateKey]) -> Result<()> {
        if private_keys.is_empty() {
            return Ok(());
        }

        let message = self.message()?;
        let data = message.serialize()?;

        let signed = private_keys
            .iter()
            .map(|key| {
                let position = signer_position(&message, &key.public_key())?;
                Ok((position, key.sign(&data)?))
            })
            .collect::<Result<Vec<_>>>()?;

        trace!(
            "signed message of {} bytes with {} keys",
            data.len(),
            signed.len()
        );

        self.freeze(message);
        for (position, signature) in signed {
            self.signatures[position] = Some(signature);
        }
        Ok(())
    }

    /// Attach a signature produced elsewhere (e.g. by a hardware wallet)
    pub fn add_signature(&mut self, public_key: &PublicKey, signature: Signature) -> Result<()> {
        let message = self.message()?;
        let position = signer_position(&message, public_key)?;
        if !signature.verify(public_key, &message.serialize()?) {
            return Err(SolkitError::InvalidSignature(format!(
                "signature does not verify for {}",
                public_key
            )));
        }

        self.freeze(message);
        self.signatures[position] = Some(signature);
        Ok(())
    }

    /// True only when fully signed and every signature verifies
    pub fn verify(&self) -> Result<bool> {
        if self.state() != TransactionState::FullySigned {
            return Ok(false);
        }
        self.to_compiled()?.verify()
    }

    /// Signatures in signer order, unsigned slots zero-filled
    pub fn to_compiled(&self) -> Result<CompiledTransaction> {
        let message = self.message()?;
        let required = message.header.num_required_signatures as usize;
        let signatures = if self.signatures.is_empty() {
            vec![Signature::default(); required]
        } else {
            self.signatures
                .iter()
                .map(|slot| slot.unwrap_or_default())
                .collect()
        };
        CompiledTransaction::new(signatures, message)
    }

    /// Wire bytes; callable in any state
    pub fn serialize(&self) -> Result<Vec<u8>> {
        self.to_compiled()?.serialize()
    }

    pub fn to_base58(&self) -> Result<String> {
        self.to_compiled()?.to_base58()
    }

    pub fn to_base64(&self) -> Result<String> {
        self.to_compiled()?.to_base64()
    }

    pub fn fee(&self, fee_calculator: &FeeCalculator) -> Result<u64> {
        fee_calculator.calculate_transaction_fee(self)
    }

    pub fn to_sdk_transaction(&self) -> Result<solana_sdk::transaction::Transaction> {
        Ok(bincode::deserialize(&self.serialize()?)?)
    }

    fn ensure_building(&self) -> Result<()> {
        match self.state() {
            TransactionState::Building => Ok(()),
            _ => Err(SolkitError::TransactionAlreadySigned),
        }
    }

    fn freeze(&mut self, message: Message) {
        if self.frozen.is_none() {
            self.signatures = vec![None; message.header.num_required_signatures as usize];
            self.frozen = Some(message);
        }
    }
}

fn signer_position(message: &Message, public_key: &PublicKey) -> Result<usize> {
    message
        .signer_keys()
        .iter()
        .position(|key| key == public_key)
        .ok_or(SolkitError::KeypairPubkeyMismatch(*public_key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::InstructionBuilder;
    use crate::signer::Keypair;

    fn transfer(from: PublicKey, to: PublicKey) -> Instruction {
        InstructionBuilder::new(crate::program::system::ID)
            .signer(from, true)
            .writable(to, false)
            .append_u32(2)
            .append_u64(1_000)
            .build()
    }

    fn blockhash() -> Hash {
        Hash::new_from_array([7u8; 32])
    }

    #[test]
    fn test_encode_transaction_layout() {
        let message = [1u8, 0, 0, 0xaa];
        let signature = Signature::new_from_array([9u8; 64]);
        let bytes = encode_transaction(&[signature], &message).unwrap();

        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[1..65], &[9u8; 64][..]);
        assert_eq!(&bytes[65..], &message);
    }

    #[test]
    fn test_encode_transaction_count_mismatch() {
        let message = [2u8, 0, 0];
        let err = encode_transaction(&[Signature::default()], &message).unwrap_err();
        assert!(matches!(
            err,
            SolkitError::SignatureCountMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_state_machine() {
        let payer = Keypair::from_seed(&[1u8; 32]).unwrap();
        let cosigner = Keypair::from_seed(&[2u8; 32]).unwrap();
        let mut tx = Transaction::new();
        tx.set_recent_blockhash(blockhash()).unwrap();
        tx.add_instructions([
            transfer(payer.public_key, PublicKey::new_unique()),
            InstructionBuilder::new(PublicKey::new_unique())
                .signer(cosigner.public_key, false)
                .build(),
        ])
        .unwrap();
        assert_eq!(tx.state(), TransactionState::Building);

        tx.sign(&[payer.private_key.clone()]).unwrap();
        assert_eq!(tx.state(), TransactionState::PartiallySigned);
        assert!(!tx.verify().unwrap());

        tx.sign(&[cosigner.private_key.clone()]).unwrap();
        assert_eq!(tx.state(), TransactionState::FullySigned);
        assert!(tx.verify().unwrap());
    }

    #[test]
    fn test_add_instructions_after_signing_is_rejected() {
        let payer = Keypair::from_seed(&[3u8; 32]).unwrap();
        let mut tx = Transaction::new_with_blockhash(
            vec![transfer(payer.public_key, PublicKey::new_unique())],
            blockhash(),
        );
        tx.sign(&[payer.private_key.clone()]).unwrap();

        let before = tx.instructions().to_vec();
        let err = tx
            .add_instructions([transfer(payer.public_key, PublicKey::new_unique())])
            .unwrap_err();
        assert!(matches!(err, SolkitError::TransactionAlreadySigned));
        assert_eq!(tx.instructions(), before.as_slice());
        assert!(matches!(
            tx.set_recent_blockhash(Hash::default()),
            Err(SolkitError::TransactionAlreadySigned)
        ));
    }

    #[test]
    fn test_sign_with_unknown_key_records_nothing() {
        let payer = Keypair::from_seed(&[4u8; 32]).unwrap();
        let stranger = Keypair::from_seed(&[5u8; 32]).unwrap();
        let mut tx = Transaction::new_with_blockhash(
            vec![transfer(payer.public_key, PublicKey::new_unique())],
            blockhash(),
        );

        let err = tx
            .sign(&[payer.private_key.clone(), stranger.private_key.clone()])
            .unwrap_err();
        assert!(matches!(err, SolkitError::KeypairPubkeyMismatch(key) if key == stranger.public_key));
        assert_eq!(tx.state(), TransactionState::Building);
    }

    #[test]
    fn test_sign_empty_transaction() {
        let keypair = Keypair::from_seed(&[6u8; 32]).unwrap();
        let mut tx = Transaction::new();
        assert!(matches!(
            tx.sign(&[keypair.private_key]),
            Err(SolkitError::EmptyTransaction)
        ));
    }

    #[test]
    fn test_unsigned_serialization_zero_fills() {
        let payer = PublicKey::new_unique();
        let tx = Transaction::new_with_blockhash(
            vec![transfer(payer, PublicKey::new_unique())],
            blockhash(),
        );
        let bytes = tx.serialize().unwrap();
        assert_eq!(bytes[0], 1);
        assert_eq!(&bytes[1..65], &[0u8; 64][..]);
        assert_eq!(&bytes[65..], tx.message_data().unwrap().as_slice());
    }

    #[test]
    fn test_add_external_signature() {
        let payer = Keypair::from_seed(&[8u8; 32]).unwrap();
        let mut tx = Transaction::new_with_blockhash(
            vec![transfer(payer.public_key, PublicKey::new_unique())],
            blockhash(),
        );
        let data = tx.message_data().unwrap();
        let signature = payer.sign(&data).unwrap();

        assert!(tx
            .add_signature(&payer.public_key, Signature::default())
            .is_err());
        tx.add_signature(&payer.public_key, signature).unwrap();
        assert_eq!(tx.state(), TransactionState::FullySigned);
        assert_eq!(tx.signatures(), &[Some(signature)]);
    }

    #[test]
    fn test_deserialize_is_idempotent() {
        let payer = Keypair::from_seed(&[9u8; 32]).unwrap();
        let mut tx = Transaction::new_with_blockhash(
            vec![
                transfer(payer.public_key, PublicKey::new_unique()),
                InstructionBuilder::new(PublicKey::new_unique())
                    .readonly(PublicKey::new_unique())
                    .append_data(&[0u8; 200])
                    .build(),
            ],
            blockhash(),
        );
        tx.sign(&[payer.private_key.clone()]).unwrap();

        let bytes = tx.serialize().unwrap();
        let decoded = CompiledTransaction::deserialize(&bytes).unwrap();
        assert_eq!(decoded.serialize().unwrap(), bytes);
        assert_eq!(decoded.size(), bytes.len());
        assert!(decoded.verify().unwrap());
    }

    #[test]
    fn test_deserialize_rejects_signature_count_mismatch() {
        let tx = Transaction::new_with_blockhash(
            vec![transfer(PublicKey::new_unique(), PublicKey::new_unique())],
            blockhash(),
        );
        let message = tx.message_data().unwrap();
        let mut bytes = vec![0u8];
        bytes.extend_from_slice(&message);
        assert!(matches!(
            CompiledTransaction::deserialize(&bytes),
            Err(SolkitError::SignatureCountMismatch { .. })
        ));
    }

    #[test]
    fn test_text_encodings_round_trip() {
        let payer = Keypair::from_seed(&[10u8; 32]).unwrap();
        let mut tx = Transaction::new_with_blockhash(
            vec![transfer(payer.public_key, PublicKey::new_unique())],
            blockhash(),
        );
        tx.sign(&[payer.private_key.clone()]).unwrap();
        let compiled = tx.to_compiled().unwrap();

        assert_eq!(
            CompiledTransaction::from_base58(&tx.to_base58().unwrap()).unwrap(),
            compiled
        );
        assert_eq!(
            CompiledTransaction::from_base64(&tx.to_base64().unwrap()).unwrap(),
            compiled
        );
    }

    #[test]
    fn test_packet_limit() {
        let payer = PublicKey::new_unique();
        let small = Transaction::new_with_blockhash(
            vec![transfer(payer, PublicKey::new_unique())],
            blockhash(),
        );
        assert!(!small.to_compiled().unwrap().exceeds_packet_limit());

        let big = Transaction::new_with_blockhash(
            vec![InstructionBuilder::new(PublicKey::new_unique())
                .signer(payer, true)
                .data(vec![0u8; PACKET_DATA_SIZE])
                .build()],
            blockhash(),
        );
        assert!(big.to_compiled().unwrap().exceeds_packet_limit());
    }

    #[test]
    fn test_fee() {
        let tx = Transaction::new_with_blockhash(
            vec![transfer(PublicKey::new_unique(), PublicKey::new_unique())],
            blockhash(),
        );
        let calculator = FeeCalculator::new(5_000, blockhash());
        assert_eq!(tx.fee(&calculator).unwrap(), 5_000);
    }
}
