//! Message assembly
//!
//! The message is the byte sequence every signer signs:
//!
//! ```text
//!   num_required_signatures     u8
//!   num_readonly_signed         u8
//!   num_readonly_unsigned       u8
//!   account_keys                compact-array of 32-byte keys
//!   recent_blockhash            32 bytes
//!   instructions                compact-array of compiled instructions
//! ```

use crate::account_resolver::{resolve_accounts, ResolvedAccountList};
use crate::compact_array;
use crate::error::{Result, SolkitError};
use crate::hash::Hash;
use crate::instruction::{CompiledInstruction, Instruction};
use crate::pubkey::PublicKey;
use crate::serialization::{
    compact_u16_size, decode_array, decode_u8, encode_u8, remaining, ByteDeserialize,
    ByteSerialize,
};
use log::trace;
use std::io::Cursor;

/// Signer/writable partition counts of the address list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

impl MessageHeader {
    pub fn new(
        num_required_signatures: u8,
        num_readonly_signed_accounts: u8,
        num_readonly_unsigned_accounts: u8,
    ) -> Self {
        Self {
            num_required_signatures,
            num_readonly_signed_accounts,
            num_readonly_unsigned_accounts,
        }
    }

    pub fn is_signer(&self, index: usize) -> bool {
        index < self.num_required_signatures as usize
    }

    /// Whether the key at `index` of a `num_keys`-long address list is writable
    pub fn is_writable(&self, index: usize, num_keys: usize) -> bool {
        let num_signed = self.num_required_signatures as usize;
        if index < num_signed {
            index < num_signed.saturating_sub(self.num_readonly_signed_accounts as usize)
        } else {
            let num_unsigned = num_keys.saturating_sub(num_signed);
            let num_writable_unsigned =
                num_unsigned.saturating_sub(self.num_readonly_unsigned_accounts as usize);
            index - num_signed < num_writable_unsigned
        }
    }
}

impl ByteSerialize for MessageHeader {
    fn serialize_bytes(&self, writer: &mut Vec<u8>) -> Result<()> {
        encode_u8(self.num_required_signatures, writer);
        encode_u8(self.num_readonly_signed_accounts, writer);
        encode_u8(self.num_readonly_unsigned_accounts, writer);
        Ok(())
    }

    fn byte_size(&self) -> usize {
        3
    }
}

impl ByteDeserialize for MessageHeader {
    fn deserialize_bytes(cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        Ok(Self {
            num_required_signatures: decode_u8(cursor)?,
            num_readonly_signed_accounts: decode_u8(cursor)?,
            num_readonly_unsigned_accounts: decode_u8(cursor)?,
        })
    }
}

/// An unsigned, compiled message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<PublicKey>,
    pub recent_blockhash: Hash,
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Resolve accounts and compile `instructions` against them
    pub fn new(instructions: &[Instruction], recent_blockhash: Hash) -> Result<Self> {
        let resolved = resolve_accounts(instructions)?;
        Self::from_resolved(instructions, &resolved, recent_blockhash)
    }

    pub fn from_resolved(
        instructions: &[Instruction],
        resolved: &ResolvedAccountList,
        recent_blockhash: Hash,
    ) -> Result<Self> {
        let compiled = instructions
            .iter()
            .map(|ix| CompiledInstruction::compile(ix, resolved))
            .collect::<Result<Vec<_>>>()?;

        trace!(
            "compiled {} instructions over {} accounts",
            compiled.len(),
            resolved.len()
        );

        Ok(Self {
            header: resolved.header(),
            account_keys: resolved.keys().to_vec(),
            recent_blockhash,
            instructions: compiled,
        })
    }

    /// The message bytes; identical inputs always give identical bytes
    pub fn serialize(&self) -> Result<Vec<u8>> {
        assemble(
            &self.header,
            &self.account_keys,
            &self.recent_blockhash,
            &self.instructions,
        )
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let message = Self::deserialize_bytes(&mut cursor)?;
        let trailing = remaining(&cursor);
        if trailing != 0 {
            return Err(SolkitError::DeserializationError(format!(
                "{} trailing bytes after message",
                trailing
            )));
        }
        Ok(message)
    }

    /// The keys that must sign, in signature order
    pub fn signer_keys(&self) -> &[PublicKey] {
        let num_signers =
            (self.header.num_required_signatures as usize).min(self.account_keys.len());
        &self.account_keys[..num_signers]
    }

    pub fn is_signer(&self, index: usize) -> bool {
        self.header.is_signer(index)
    }

    pub fn is_writable(&self, index: usize) -> bool {
        index < self.account_keys.len()
            && self.header.is_writable(index, self.account_keys.len())
    }

    pub fn program_ids(&self) -> Vec<&PublicKey> {
        self.instructions
            .iter()
            .filter_map(|ix| self.account_keys.get(ix.program_id_index as usize))
            .collect()
    }

    /// Structural checks a decoded message must pass
    pub fn sanitize(&self) -> Result<()> {
        let num_keys = self.account_keys.len();
        let header = &self.header;

        if header.num_required_signatures as usize + header.num_readonly_unsigned_accounts as usize
            > num_keys
        {
            return Err(SolkitError::DeserializationError(
                "header counts exceed the number of account keys".to_string(),
            ));
        }
        if header.num_readonly_signed_accounts > header.num_required_signatures {
            return Err(SolkitError::DeserializationError(
                "more read-only signers than signers".to_string(),
            ));
        }
        for ix in &self.instructions {
            let out_of_range = std::iter::once(&ix.program_id_index)
                .chain(ix.accounts.iter())
                .any(|&i| i as usize >= num_keys);
            if out_of_range {
                return Err(SolkitError::DeserializationError(
                    "instruction references an account index out of range".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl ByteSerialize for Message {
    fn serialize_bytes(&self, writer: &mut Vec<u8>) -> Result<()> {
        write_message(
            &self.header,
            &self.account_keys,
            &self.recent_blockhash,
            &self.instructions,
            writer,
        )
    }

    fn byte_size(&self) -> usize {
        message_size(&self.account_keys, &self.instructions)
    }
}

impl ByteDeserialize for Message {
    fn deserialize_bytes(cursor: &mut Cursor<&[u8]>) -> Result<Self> {
        let header = MessageHeader::deserialize_bytes(cursor)?;
        let account_keys = compact_array::decode_pod::<PublicKey>(cursor)?;
        let recent_blockhash = Hash::new_from_array(decode_array(cursor)?);
        let instructions = compact_array::decode_deserializable::<CompiledInstruction>(cursor)?;

        let message = Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        };
        message.sanitize()?;
        Ok(message)
    }
}

/// Lay out header, addresses, blockhash and compiled instructions
pub fn assemble(
    header: &MessageHeader,
    account_keys: &[PublicKey],
    recent_blockhash: &Hash,
    instructions: &[CompiledInstruction],
) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(message_size(account_keys, instructions));
    write_message(
        header,
        account_keys,
        recent_blockhash,
        instructions,
        &mut bytes,
    )?;
    Ok(bytes)
}

fn write_message(
    header: &MessageHeader,
    account_keys: &[PublicKey],
    recent_blockhash: &Hash,
    instructions: &[CompiledInstruction],
    writer: &mut Vec<u8>,
) -> Result<()> {
    header.serialize_bytes(writer)?;
    compact_array::encode_pod(account_keys, writer)?;
    writer.extend_from_slice(recent_blockhash.as_ref());
    compact_array::encode_serializable(instructions, writer)
}

fn message_size(account_keys: &[PublicKey], instructions: &[CompiledInstruction]) -> usize {
    3 + compact_u16_size(account_keys.len())
        + account_keys.len() * 32
        + 32
        + compact_array::byte_size(instructions)
}
