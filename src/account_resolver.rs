//! Account address resolution
//!
//! Collects every key the instructions touch into one deduplicated list,
//! ordered the way the cluster expects:
//!
//! ```text
//!   [ signer+writable | signer+readonly | writable | readonly ]
//!     <------- num_required_signatures ------->
//! ```
//!
//! Keys keep their first-seen order inside each group. Flags are OR-merged
//! across every occurrence of a key, so an account any instruction writes to
//! (or needs a signature from) is writable (or a signer) for the whole
//! transaction. Program ids join as read-only non-signers after the metas of
//! all instructions, unless an explicit meta already granted them more.

use crate::error::{Result, SolkitError};
use crate::instruction::Instruction;
use crate::message::MessageHeader;
use crate::pubkey::PublicKey;
use log::trace;
use std::collections::HashMap;

/// Account lists longer than this cannot be addressed by a u8 index
pub const MAX_ACCOUNTS: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AccountFlags {
    is_signer: bool,
    is_writable: bool,
}

impl AccountFlags {
    fn group(&self) -> u8 {
        match (self.is_signer, self.is_writable) {
            (true, true) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        }
    }
}

/// The ordered, deduplicated address list of one message plus its header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAccountList {
    keys: Vec<PublicKey>,
    header: MessageHeader,
    index: HashMap<PublicKey, u8>,
}

impl ResolvedAccountList {
    pub fn keys(&self) -> &[PublicKey] {
        &self.keys
    }

    pub fn header(&self) -> MessageHeader {
        self.header
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn index_of(&self, key: &PublicKey) -> Option<u8> {
        self.index.get(key).copied()
    }

    /// The keys whose signatures the transaction carries, in signature order
    pub fn signer_keys(&self) -> &[PublicKey] {
        &self.keys[..self.header.num_required_signatures as usize]
    }

    pub fn is_signer(&self, index: usize) -> bool {
        self.header.is_signer(index)
    }

    pub fn is_writable(&self, index: usize) -> bool {
        self.header.is_writable(index, self.keys.len())
    }

    pub fn into_parts(self) -> (MessageHeader, Vec<PublicKey>) {
        (self.header, self.keys)
    }
}

/// Resolve the address list and header for `instructions`, given in the
/// order they will execute.
pub fn resolve_accounts(instructions: &[Instruction]) -> Result<ResolvedAccountList> {
    if instructions.is_empty() {
        return Err(SolkitError::EmptyTransaction);
    }

    let mut order: Vec<PublicKey> = Vec::new();
    let mut flags: HashMap<PublicKey, AccountFlags> = HashMap::new();

    let mut upsert = |key: PublicKey, is_signer: bool, is_writable: bool| {
        let entry = flags.entry(key).or_insert_with(|| {
            order.push(key);
            AccountFlags {
                is_signer: false,
                is_writable: false,
            }
        });
        entry.is_signer |= is_signer;
        entry.is_writable |= is_writable;
    };

    for meta in instructions.iter().flat_map(|ix| &ix.accounts) {
        upsert(meta.pubkey, meta.is_signer, meta.is_writable);
    }
    // program ids only after every meta has been seen
    for instruction in instructions {
        upsert(instruction.program_id, false, false);
    }

    if order.len() > MAX_ACCOUNTS {
        return Err(SolkitError::TooManyAccounts(order.len()));
    }

    let mut entries: Vec<(PublicKey, AccountFlags)> =
        order.into_iter().map(|key| (key, flags[&key])).collect();
    // sort_by_key is stable: first-seen order survives within each group
    entries.sort_by_key(|(_, f)| f.group());

    let count = |group: u8| entries.iter().filter(|(_, f)| f.group() == group).count();
    let as_u8 = |n: usize| u8::try_from(n).map_err(|_| SolkitError::TooManyAccounts(n));

    let header = MessageHeader {
        num_required_signatures: as_u8(count(0) + count(1))?,
        num_readonly_signed_accounts: as_u8(count(1))?,
        num_readonly_unsigned_accounts: as_u8(count(3))?,
    };

    let keys: Vec<PublicKey> = entries.into_iter().map(|(key, _)| key).collect();
    let index = keys
        .iter()
        .enumerate()
        .map(|(i, key)| (*key, i as u8))
        .collect();

    trace!("resolved {} accounts, header {:?}", keys.len(), header);

    Ok(ResolvedAccountList {
        keys,
        header,
        index,
    })
}
