//! Solkit - Solana client with a byte-exact transaction encoder
//!
//! Builds legacy transactions from instructions, compiles them into the
//! cluster's wire format (compact-u16 framed account list, header, blockhash
//! and index-based instructions), signs them and submits them over JSON-RPC.

pub mod account_resolver;
pub mod compact_array;
pub mod encoding;
pub mod error;
pub mod fee_calculator;
pub mod hash;
pub mod instruction;
pub mod message;
pub mod program;
pub mod pubkey;
pub mod rpc;
pub mod serialization;
pub mod signer;
pub mod transaction;

pub use error::{Result, SolkitError};
pub use hash::Hash;
pub use instruction::{AccountMeta, CompiledInstruction, Instruction, InstructionBuilder};
pub use message::{Message, MessageHeader};
pub use pubkey::PublicKey;
pub use signer::{Keypair, PrivateKey, Signature};
pub use transaction::{CompiledTransaction, Transaction, TransactionState};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::encoding::TransactionEncoding;
    pub use crate::error::{Result, SolkitError};
    pub use crate::fee_calculator::FeeCalculator;
    pub use crate::hash::Hash;
    pub use crate::instruction::{AccountMeta, Instruction, InstructionBuilder};
    pub use crate::message::Message;
    pub use crate::program::{compute_budget, system};
    pub use crate::pubkey::PublicKey;
    pub use crate::rpc::{CommitmentConfig, Network, RpcClient, RpcClientConfig};
    pub use crate::signer::{Keypair, PrivateKey, Signature};
    pub use crate::transaction::{CompiledTransaction, Transaction, TransactionState};
}
