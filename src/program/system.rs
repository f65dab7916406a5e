//! System program instructions
//!
//! Instruction data is the bincode encoding of [`SystemInstruction`]: a u32
//! little-endian variant tag followed by the fields, strings prefixed with a
//! u64 length.

use crate::error::Result;
use crate::instruction::{AccountMeta, Instruction};
use crate::pubkey::PublicKey;
use serde::{Deserialize, Serialize};

/// `11111111111111111111111111111111`
pub const ID: PublicKey = PublicKey::new_from_array([0u8; 32]);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemInstruction {
    CreateAccount {
        lamports: u64,
        space: u64,
        owner: PublicKey,
    },
    Assign {
        owner: PublicKey,
    },
    Transfer {
        lamports: u64,
    },
    CreateAccountWithSeed {
        base: PublicKey,
        seed: String,
        lamports: u64,
        space: u64,
        owner: PublicKey,
    },
    AdvanceNonceAccount,
    WithdrawNonceAccount(u64),
    InitializeNonceAccount(PublicKey),
    AuthorizeNonceAccount(PublicKey),
    Allocate {
        space: u64,
    },
    AllocateWithSeed {
        base: PublicKey,
        seed: String,
        space: u64,
        owner: PublicKey,
    },
    AssignWithSeed {
        base: PublicKey,
        seed: String,
        owner: PublicKey,
    },
    TransferWithSeed {
        lamports: u64,
        from_seed: String,
        from_owner: PublicKey,
    },
    UpgradeNonceAccount,
}

fn recent_blockhashes_sysvar() -> PublicKey {
    #[allow(deprecated)]
    let id = solana_sdk::sysvar::recent_blockhashes::id();
    id.into()
}

fn rent_sysvar() -> PublicKey {
    solana_sdk::sysvar::rent::id().into()
}

fn system_instruction(data: &SystemInstruction, accounts: Vec<AccountMeta>) -> Result<Instruction> {
    Instruction::new_with_bincode(ID, data, accounts)
}

pub fn create_account(
    from: &PublicKey,
    to: &PublicKey,
    lamports: u64,
    space: u64,
    owner: &PublicKey,
) -> Result<Instruction> {
    system_instruction(
        &SystemInstruction::CreateAccount {
            lamports,
            space,
            owner: *owner,
        },
        vec![AccountMeta::new(*from, true), AccountMeta::new(*to, true)],
    )
}

#[allow(clippy::too_many_arguments)]
pub fn create_account_with_seed(
    from: &PublicKey,
    to: &PublicKey,
    base: &PublicKey,
    seed: &str,
    lamports: u64,
    space: u64,
    owner: &PublicKey,
) -> Result<Instruction> {
    system_instruction(
        &SystemInstruction::CreateAccountWithSeed {
            base: *base,
            seed: seed.to_string(),
            lamports,
            space,
            owner: *owner,
        },
        vec![
            AccountMeta::new(*from, true),
            AccountMeta::new(*to, false),
            AccountMeta::new_readonly(*base, true),
        ],
    )
}

pub fn assign(account: &PublicKey, owner: &PublicKey) -> Result<Instruction> {
    system_instruction(
        &SystemInstruction::Assign { owner: *owner },
        vec![AccountMeta::new(*account, true)],
    )
}

pub fn assign_with_seed(
    address: &PublicKey,
    base: &PublicKey,
    seed: &str,
    owner: &PublicKey,
) -> Result<Instruction> {
    system_instruction(
        &SystemInstruction::AssignWithSeed {
            base: *base,
            seed: seed.to_string(),
            owner: *owner,
        },
        vec![
            AccountMeta::new(*address, false),
            AccountMeta::new_readonly(*base, true),
        ],
    )
}

/// Move `lamports` from `from` (signer) to `to`
pub fn transfer(from: &PublicKey, to: &PublicKey, lamports: u64) -> Result<Instruction> {
    system_instruction(
        &SystemInstruction::Transfer { lamports },
        vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)],
    )
}

/// Transfer out of an address derived with [`PublicKey::create_with_seed`];
/// `from_base` signs.
pub fn transfer_with_seed(
    from: &PublicKey,
    from_base: &PublicKey,
    from_seed: &str,
    from_owner: &PublicKey,
    to: &PublicKey,
    lamports: u64,
) -> Result<Instruction> {
    system_instruction(
        &SystemInstruction::TransferWithSeed {
            lamports,
            from_seed: from_seed.to_string(),
            from_owner: *from_owner,
        },
        vec![
            AccountMeta::new(*from, false),
            AccountMeta::new_readonly(*from_base, true),
            AccountMeta::new(*to, false),
        ],
    )
}

pub fn allocate(account: &PublicKey, space: u64) -> Result<Instruction> {
    system_instruction(
        &SystemInstruction::Allocate { space },
        vec![AccountMeta::new(*account, true)],
    )
}

pub fn allocate_with_seed(
    address: &PublicKey,
    base: &PublicKey,
    seed: &str,
    space: u64,
    owner: &PublicKey,
) -> Result<Instruction> {
    system_instruction(
        &SystemInstruction::AllocateWithSeed {
            base: *base,
            seed: seed.to_string(),
            space,
            owner: *owner,
        },
        vec![
            AccountMeta::new(*address, false),
            AccountMeta::new_readonly(*base, true),
        ],
    )
}

/// Consume the stored nonce, replacing it with a successor
pub fn advance_nonce_account(nonce: &PublicKey, authority: &PublicKey) -> Result<Instruction> {
    system_instruction(
        &SystemInstruction::AdvanceNonceAccount,
        vec![
            AccountMeta::new(*nonce, false),
            AccountMeta::new_readonly(recent_blockhashes_sysvar(), false),
            AccountMeta::new_readonly(*authority, true),
        ],
    )
}

pub fn withdraw_nonce_account(
    nonce: &PublicKey,
    authority: &PublicKey,
    to: &PublicKey,
    lamports: u64,
) -> Result<Instruction> {
    system_instruction(
        &SystemInstruction::WithdrawNonceAccount(lamports),
        vec![
            AccountMeta::new(*nonce, false),
            AccountMeta::new(*to, false),
            AccountMeta::new_readonly(recent_blockhashes_sysvar(), false),
            AccountMeta::new_readonly(rent_sysvar(), false),
            AccountMeta::new_readonly(*authority, true),
        ],
    )
}

pub fn authorize_nonce_account(
    nonce: &PublicKey,
    authority: &PublicKey,
    new_authority: &PublicKey,
) -> Result<Instruction> {
    system_instruction(
        &SystemInstruction::AuthorizeNonceAccount(*new_authority),
        vec![
            AccountMeta::new(*nonce, false),
            AccountMeta::new_readonly(*authority, true),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::pubkey::Pubkey;
    use solana_sdk::system_instruction as sdk;

    fn sdk_key() -> (Pubkey, PublicKey) {
        let key = Pubkey::new_unique();
        (key, key.into())
    }

    fn assert_same(ours: Instruction, theirs: solana_sdk::instruction::Instruction) {
        assert_eq!(ours, Instruction::from(&theirs));
    }

    #[test]
    fn test_program_id() {
        assert_eq!(ID, PublicKey::from(solana_sdk::system_program::id()));
        assert_eq!(ID.to_string(), "11111111111111111111111111111111");
    }

    #[test]
    fn test_transfer_data_layout() {
        let (_, from) = sdk_key();
        let (_, to) = sdk_key();
        let ix = transfer(&from, &to, 1_000).unwrap();
        assert_eq!(ix.data, [vec![2, 0, 0, 0], 1_000u64.to_le_bytes().to_vec()].concat());
        assert_eq!(
            ix.accounts,
            vec![AccountMeta::new(from, true), AccountMeta::new(to, false)]
        );
    }

    #[test]
    fn test_matches_sdk_builders() {
        let (a, pa) = sdk_key();
        let (b, pb) = sdk_key();
        let (c, pc) = sdk_key();
        let (d, pd) = sdk_key();

        assert_same(
            create_account(&pa, &pb, 10, 165, &pc).unwrap(),
            sdk::create_account(&a, &b, 10, 165, &c),
        );
        assert_same(assign(&pa, &pb).unwrap(), sdk::assign(&a, &b));
        assert_same(transfer(&pa, &pb, 7).unwrap(), sdk::transfer(&a, &b, 7));
        assert_same(allocate(&pa, 64).unwrap(), sdk::allocate(&a, 64));
        assert_same(
            create_account_with_seed(&pa, &pb, &pc, "vault", 1, 2, &pd).unwrap(),
            sdk::create_account_with_seed(&a, &b, &c, "vault", 1, 2, &d),
        );
        assert_same(
            allocate_with_seed(&pa, &pb, "seed", 32, &pc).unwrap(),
            sdk::allocate_with_seed(&a, &b, "seed", 32, &c),
        );
        assert_same(
            assign_with_seed(&pa, &pb, "seed", &pc).unwrap(),
            sdk::assign_with_seed(&a, &b, "seed", &c),
        );
        assert_same(
            transfer_with_seed(&pa, &pb, "seed", &pc, &pd, 99).unwrap(),
            sdk::transfer_with_seed(&a, &b, "seed".to_string(), &c, &d, 99),
        );
    }

    #[test]
    fn test_nonce_builders_match_sdk() {
        let (nonce, pnonce) = sdk_key();
        let (auth, pauth) = sdk_key();
        let (to, pto) = sdk_key();

        assert_same(
            advance_nonce_account(&pnonce, &pauth).unwrap(),
            sdk::advance_nonce_account(&nonce, &auth),
        );
        assert_same(
            withdraw_nonce_account(&pnonce, &pauth, &pto, 500).unwrap(),
            sdk::withdraw_nonce_account(&nonce, &auth, &to, 500),
        );
        assert_same(
            authorize_nonce_account(&pnonce, &pauth, &pto).unwrap(),
            sdk::authorize_nonce_account(&nonce, &auth, &to),
        );
    }

    #[test]
    fn test_decode_instruction_data() {
        let (_, owner) = sdk_key();
        let ix = assign(&PublicKey::new_unique(), &owner).unwrap();
        let decoded: SystemInstruction = bincode::deserialize(&ix.data).unwrap();
        assert_eq!(decoded, SystemInstruction::Assign { owner });
    }
}
