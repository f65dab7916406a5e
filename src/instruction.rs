//! Instructions and their compiled, index-based wire form
//!
//! An [`Instruction`] names its program and accounts by public key. Before it
//! can go on the wire it is compiled against a [`ResolvedAccountList`]: every
//! key is replaced by its position in the message's address list.

use crate::account_resolver::ResolvedAccountList;
use crate::compact_array;
use crate::error::{Result, SolkitError};
use crate::pubkey::PublicKey;
use crate::serialization::{
    compact_u16_size, decode_length_prefixed, decode_u8, encode_length_prefixed, encode_u8,
    ByteDeserialize, ByteSerialize,
};
use std::io::Cursor;

/// How one instruction uses one account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountMeta {
    pub pubkey: PublicKey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn new(pubkey: PublicKey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn new_readonly(pubkey: PublicKey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

impl From<&solana_sdk::instruction::AccountMeta> for AccountMeta {
    fn from(meta: &solana_sdk::instruction::AccountMeta) -> Self {
        Self {
            pubkey: meta.pubkey.into(),
            is_signer: meta.is_signer,
            is_writable: meta.is_writable,
        }
    }
}

/// A call into `program_id` with opaque `data`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: PublicKey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

impl Instruction {
    pub fn new_with_bytes(program_id: PublicKey, data: &[u8], accounts: Vec<AccountMeta>) -> Self {
        Self {
            program_id,
            accounts,
            data: data.to_vec(),
        }
    }

    /// Instruction data in bincode layout (u32 enum tags, u64 string lengths)
    pub fn new_with_bincode<T: serde::Serialize>(
        program_id: PublicKey,
        data: &T,
        accounts: Vec<AccountMeta>,
    ) -> Result<Self> {
        Ok(Self {
            program_id,
            accounts,
            data: bincode::serialize(data)?,
        })
    }

    /// Instruction data in borsh layout
    pub fn new_with_borsh<T: borsh::BorshSerialize>(
        program_id: PublicKey,
        data: &T,
        accounts: Vec<AccountMeta>,
    ) -> Result<Self> {
        let data =
            borsh::to_vec(data).map_err(|e| SolkitError::SerializationError(e.to_string()))?;
        Ok(Self {
            program_id,
            accounts,
            data,
        })
    }
}

impl From<&solana_sdk::instruction::Instruction> for Instruction {
    fn from(ix: &solana_sdk::instruction::Instruction) -> Self {
        Self {
            program_id: ix.program_id.into(),
            accounts: ix.accounts.iter().map(AccountMeta::from).collect(),
            data: ix.data.clone(),
        }
    }
}

/// Fluent instruction construction
pub struct InstructionBuilder {
    program_id: PublicKey,
    accounts: Vec<AccountMeta>,
    data: Vec<u8>,
}

impl InstructionBuilder {
    pub fn new(program_id: PublicKey) -> Self {
        Self {
            program_id,
            accounts: Vec::new(),
            data: Vec::new(),
        }
    }

    pub fn account(mut self, meta: AccountMeta) -> Self {
        self.accounts.push(meta);
        self
    }

    pub fn signer(mut self, pubkey: PublicKey, is_writable: bool) -> Self {
        self.accounts.push(AccountMeta {
            pubkey,
            is_signer: true,
            is_writable,
        });
        self
    }

    pub fn writable(mut self, pubkey: PublicKey, is_signer: bool) -> Self {
        self.accounts.push(AccountMeta::new(pubkey, is_signer));
        self
    }

    pub fn readonly(mut self, pubkey: PublicKey) -> Self {
        self.accounts.push(AccountMeta::new_readonly(pubkey, false));
        self
    }

    /// Replace the instruction data
    pub fn data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    pub fn append_data(mut self, data: &[u8]) -> Self {
        self.data.extend_from_slice(data);
        self
    }

    pub fn append_u8(mut self, value: u8) -> Self {
        self.data.push(value);
        self
    }

    /// Append u32 (little-endian) to instruction data
    pub fn append_u32(mut self, value: u32) -> Self {
        self.data.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Append u64 (little-endian) to instruction data
    pub fn append_u64(mut self, value: u64) -> Self {
        self.data.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn build(self) -> Instruction {
        Instruction {
            program_id: self.program_id,
            accounts: self.accounts,
            data: self.data,
        }
    }
}

/// An instruction whose keys have been replaced by address-list indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

impl CompiledInstruction {
    /// Look every key of `instruction` up in `resolved`
    pub fn compile(instruction: &Instruction, resolved: &ResolvedAccountList) -> Result<Self> {
        let index_of = |key: &PublicKey| {
            resolved
                .index_of(key)
                .ok_or(SolkitError::UnresolvedAccount(*key))
        };

        let program_id_index = index_of(&instruction.program_id)?;
        let accounts = instruction
            .accounts
            .iter()
            .map(|meta| index_of(&meta.pubkey))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            program_id_index,
            accounts,
            data: instruction.data.clone(),
        })
    }

    /// Parse data as borsh-serialized structure
    pub fn parse_borsh_data<T: borsh::BorshDeserialize>(&self) -> Result<T> {
        borsh::from_slice(&self.data).map_err(|e| SolkitError::DeserializationError(e.to_string()))
    }
}

impl ByteSerialize for CompiledInstruction {
    fn serialize_bytes(&self, writer: &mut Vec<u8>) -> Result<()> {
        encode_u8(self.program_id_index, writer);
        compact_array::encode_pod(&self.accounts, writer)?;
        encode_length_prefixed(&self.data, writer)
    }

    fn byte_size(&self) -> usize {
        1 + compact_u16_size(self.accounts.len())
            + self.accounts.len()
            + compact_u16_size(self.data.len())
            + self.data.len()
    }
}

impl ByteDeserialize for CompiledInstruction {
    fn deserialize_bytes(cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        let program_id_index = decode_u8(cursor)?;
        let accounts = compact_array::decode_pod::<u8>(cursor)?;
        let data = decode_length_prefixed(cursor)?;

        Ok(Self {
            program_id_index,
            accounts,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account_resolver::resolve_accounts;
    use borsh::{BorshDeserialize, BorshSerialize};

    #[test]
    fn test_instruction_builder() {
        let program_id = PublicKey::new_unique();
        let account = PublicKey::new_unique();

        let instruction = InstructionBuilder::new(program_id)
            .signer(account, true)
            .append_u8(42)
            .append_u64(1000)
            .build();

        assert_eq!(instruction.program_id, program_id);
        assert_eq!(instruction.accounts, vec![AccountMeta::new(account, true)]);
        assert_eq!(instruction.data.len(), 9);
    }

    #[test]
    fn test_account_meta_constructors() {
        let pubkey = PublicKey::new_unique();
        let meta = AccountMeta::new_readonly(pubkey, true);
        assert!(meta.is_signer);
        assert!(!meta.is_writable);
        assert!(AccountMeta::new(pubkey, false).is_writable);
    }

    #[test]
    fn test_compile_maps_keys_to_indices() {
        let payer = PublicKey::new_unique();
        let other = PublicKey::new_unique();
        let program_id = PublicKey::new_unique();
        let instruction = InstructionBuilder::new(program_id)
            .readonly(other)
            .signer(payer, true)
            .append_u8(7)
            .build();

        let resolved = resolve_accounts(std::slice::from_ref(&instruction)).unwrap();
        let compiled = CompiledInstruction::compile(&instruction, &resolved).unwrap();

        // payer is the only signer, so it is index 0; other then program follow
        assert_eq!(compiled.program_id_index, 2);
        assert_eq!(compiled.accounts, vec![1, 0]);
        assert_eq!(compiled.data, vec![7]);
    }

    #[test]
    fn test_compile_unresolved_account() {
        let known = InstructionBuilder::new(PublicKey::new_unique()).build();
        let resolved = resolve_accounts(&[known]).unwrap();

        let stranger = PublicKey::new_unique();
        let foreign = InstructionBuilder::new(PublicKey::new_unique())
            .readonly(stranger)
            .build();
        let err = CompiledInstruction::compile(&foreign, &resolved).unwrap_err();
        assert!(matches!(err, SolkitError::UnresolvedAccount(_)));
    }

    #[test]
    fn test_compiled_instruction_layout() {
        let compiled = CompiledInstruction {
            program_id_index: 3,
            accounts: vec![0, 1],
            data: vec![0xaa, 0xbb, 0xcc],
        };
        let mut bytes = Vec::new();
        compiled.serialize_bytes(&mut bytes).unwrap();
        assert_eq!(bytes, vec![3, 2, 0, 1, 3, 0xaa, 0xbb, 0xcc]);
        assert_eq!(compiled.byte_size(), bytes.len());

        let decoded =
            CompiledInstruction::deserialize_bytes(&mut Cursor::new(bytes.as_slice())).unwrap();
        assert_eq!(decoded, compiled);
    }

    #[test]
    fn test_large_data_uses_wide_length_prefix() {
        let compiled = CompiledInstruction {
            program_id_index: 0,
            accounts: vec![],
            data: vec![1u8; 300],
        };
        let mut bytes = Vec::new();
        compiled.serialize_bytes(&mut bytes).unwrap();
        assert_eq!(&bytes[..4], &[0, 0, 0xac, 0x02]);
        assert_eq!(bytes.len(), compiled.byte_size());
    }

    #[derive(BorshSerialize, BorshDeserialize, Debug, PartialEq)]
    struct Deposit {
        amount: u64,
        memo: String,
    }

    #[test]
    fn test_borsh_data_round_trip() {
        let payload = Deposit {
            amount: 55,
            memo: "tip".to_string(),
        };
        let instruction =
            Instruction::new_with_borsh(PublicKey::new_unique(), &payload, vec![]).unwrap();
        let compiled = CompiledInstruction {
            program_id_index: 0,
            accounts: vec![],
            data: instruction.data,
        };
        assert_eq!(compiled.parse_borsh_data::<Deposit>().unwrap(), payload);
    }

    #[test]
    fn test_from_sdk_instruction() {
        let program_id = solana_sdk::pubkey::Pubkey::new_unique();
        let key = solana_sdk::pubkey::Pubkey::new_unique();
        let sdk = solana_sdk::instruction::Instruction::new_with_bytes(
            program_id,
            &[1, 2, 3],
            vec![solana_sdk::instruction::AccountMeta::new_readonly(key, true)],
        );
        let ours = Instruction::from(&sdk);
        assert_eq!(ours.program_id, PublicKey::from(program_id));
        assert_eq!(ours.accounts, vec![AccountMeta::new_readonly(key.into(), true)]);
        assert_eq!(ours.data, vec![1, 2, 3]);
    }
}
