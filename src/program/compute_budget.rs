//! Compute budget program instructions
//!
//! Data is borsh: a one-byte variant tag then the little-endian argument.

use crate::error::Result;
use crate::instruction::Instruction;
use crate::pubkey::PublicKey;
use borsh::{BorshDeserialize, BorshSerialize};

/// `ComputeBudget111111111111111111111111111111`
pub const ID: PublicKey = PublicKey::new_from_array([
    0x03, 0x06, 0x46, 0x6f, 0xe5, 0x21, 0x17, 0x32, 0xff, 0xec, 0xad, 0xba, 0x72, 0xc3, 0x9b, 0xe7,
    0xbc, 0x8c, 0xe5, 0xbb, 0xc5, 0xf7, 0x12, 0x6b, 0x2c, 0x43, 0x9b, 0x3a, 0x40, 0x00, 0x00, 0x00,
]);

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum ComputeBudgetInstruction {
    RequestUnitsDeprecated { units: u32, additional_fee: u32 },
    /// Heap size in bytes, a multiple of 1024
    RequestHeapFrame(u32),
    SetComputeUnitLimit(u32),
    /// Micro-lamports per compute unit
    SetComputeUnitPrice(u64),
    SetLoadedAccountsDataSizeLimit(u32),
}

fn compute_budget_instruction(data: &ComputeBudgetInstruction) -> Result<Instruction> {
    Instruction::new_with_borsh(ID, data, vec![])
}

pub fn request_heap_frame(bytes: u32) -> Result<Instruction> {
    compute_budget_instruction(&ComputeBudgetInstruction::RequestHeapFrame(bytes))
}

pub fn set_compute_unit_limit(units: u32) -> Result<Instruction> {
    compute_budget_instruction(&ComputeBudgetInstruction::SetComputeUnitLimit(units))
}

/// Priority fee: the price paid per requested compute unit
pub fn set_compute_unit_price(micro_lamports: u64) -> Result<Instruction> {
    compute_budget_instruction(&ComputeBudgetInstruction::SetComputeUnitPrice(micro_lamports))
}

pub fn set_loaded_accounts_data_size_limit(bytes: u32) -> Result<Instruction> {
    compute_budget_instruction(&ComputeBudgetInstruction::SetLoadedAccountsDataSizeLimit(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::CompiledInstruction;
    use solana_sdk::compute_budget::ComputeBudgetInstruction as SdkInstruction;

    #[test]
    fn test_program_id() {
        assert_eq!(ID, PublicKey::from(solana_sdk::compute_budget::id()));
    }

    #[test]
    fn test_instruction_data() {
        let limit = set_compute_unit_limit(200_000).unwrap();
        assert_eq!(limit.data, vec![0x02, 0x40, 0x0d, 0x03, 0x00]);
        assert!(limit.accounts.is_empty());

        let price = set_compute_unit_price(1_000).unwrap();
        assert_eq!(price.data[0], 0x03);
        assert_eq!(price.data.len(), 9);
    }

    #[test]
    fn test_matches_sdk() {
        assert_eq!(
            set_compute_unit_limit(1_400_000).unwrap(),
            Instruction::from(&SdkInstruction::set_compute_unit_limit(1_400_000))
        );
        assert_eq!(
            set_compute_unit_price(25).unwrap(),
            Instruction::from(&SdkInstruction::set_compute_unit_price(25))
        );
        assert_eq!(
            request_heap_frame(64 * 1024).unwrap(),
            Instruction::from(&SdkInstruction::request_heap_frame(64 * 1024))
        );
    }

    #[test]
    fn test_parse_compiled_data() {
        let ix = set_loaded_accounts_data_size_limit(4096).unwrap();
        let compiled = CompiledInstruction {
            program_id_index: 0,
            accounts: vec![],
            data: ix.data,
        };
        assert_eq!(
            compiled
                .parse_borsh_data::<ComputeBudgetInstruction>()
                .unwrap(),
            ComputeBudgetInstruction::SetLoadedAccountsDataSizeLimit(4096)
        );
    }
}
