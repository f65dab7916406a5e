//! Transaction fee schedule

use crate::error::Result;
use crate::hash::Hash;
use crate::message::Message;
use crate::transaction::Transaction;

/// The fee schedule in force at `blockhash`.
///
/// Currently the fee is a flat charge per required signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeCalculator {
    pub lamports_per_signature: u64,
    pub blockhash: Hash,
}

impl FeeCalculator {
    pub fn new(lamports_per_signature: u64, blockhash: Hash) -> Self {
        Self {
            lamports_per_signature,
            blockhash,
        }
    }

    pub fn calculate_fee(&self, message: &Message) -> u64 {
        self.lamports_per_signature
            .saturating_mul(message.header.num_required_signatures as u64)
    }

    /// Cost in lamports to submit `transaction`
    pub fn calculate_transaction_fee(&self, transaction: &Transaction) -> Result<u64> {
        Ok(self.calculate_fee(&transaction.message()?))
    }
}
