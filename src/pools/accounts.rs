//! Transaction message decoding and pool account mapping
//!
//! The RPC can hand back a transaction message in two equivalent shapes:
//! raw JSON (account key strings plus compiled instructions with index
//! lists) or base64 binary (a legacy or v0 `VersionedMessage`). Both are
//! normalized into one internal representation here, and the positional
//! account layout of the pool-initialize instruction is resolved through
//! a single offset table.

use solana_sdk::message::VersionedMessage;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::VersionedTransaction;
use solana_transaction_status::option_serializer::OptionSerializer;
use solana_transaction_status::{
    EncodedTransaction, EncodedTransactionWithStatusMeta, UiMessage, UiRawMessage,
};
use std::str::FromStr;

use crate::errors::ExtractError;

/// Positional account layout of the Raydium AMM v4 initialize2 instruction.
///
/// This is a closed contract with the on-chain program's account ordering:
///
/// | offset | role              |
/// |--------|-------------------|
/// | 0      | token program     |
/// | 4      | amm pool          |
/// | 5      | amm authority     |
/// | 6      | amm open orders   |
/// | 7      | lp mint           |
/// | 8      | coin (base) mint  |
/// | 9      | pc (quote) mint   |
/// | 10     | coin vault        |
/// | 11     | pc vault          |
/// | 13     | amm target orders |
/// | 17     | deployer          |
mod offsets {
    pub const PROGRAM_ID: usize = 0;
    pub const AMM_ID: usize = 4;
    pub const AMM_AUTHORITY: usize = 5;
    pub const AMM_OPEN_ORDERS: usize = 6;
    pub const LP_MINT: usize = 7;
    pub const COIN_MINT: usize = 8;
    pub const PC_MINT: usize = 9;
    pub const COIN_VAULT: usize = 10;
    pub const PC_VAULT: usize = 11;
    pub const AMM_TARGET_ORDERS: usize = 13;
    pub const DEPLOYER: usize = 17;
}

/// A transaction message reduced to the parts the extractor needs:
/// the flat account list and index-based instructions.
#[derive(Debug, Clone)]
pub struct DecodedMessage {
    pub account_keys: Vec<String>,
    pub instructions: Vec<RawInstruction>,
}

#[derive(Debug, Clone)]
pub struct RawInstruction {
    pub program_id_index: usize,
    pub account_indexes: Vec<usize>,
    pub data: Vec<u8>,
}

/// The 11 account roles read from the initialize instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolAccounts {
    pub program_id: String,
    pub amm_id: String,
    pub amm_authority: String,
    pub amm_open_orders: String,
    pub lp_mint: String,
    pub coin_mint: String,
    pub pc_mint: String,
    pub coin_vault: String,
    pub pc_vault: String,
    pub amm_target_orders: String,
    pub deployer: String,
}

/// Resolve a transaction into the flat account list and instruction set.
///
/// Loaded addresses from the transaction meta (populated for versioned
/// messages that reference address lookup tables) are appended after the
/// static keys, writable first, so both encodings resolve the same set.
pub fn resolve_message(
    tx: &EncodedTransactionWithStatusMeta,
) -> Result<DecodedMessage, ExtractError> {
    let mut message = match &tx.transaction {
        EncodedTransaction::Json(ui_tx) => match &ui_tx.message {
            UiMessage::Raw(raw) => decode_raw_message(raw),
            UiMessage::Parsed(_) => return Err(ExtractError::UnsupportedEncoding),
        },
        encoded => {
            let versioned = encoded.decode().ok_or(ExtractError::UnsupportedEncoding)?;
            decode_versioned_transaction(&versioned)
        }
    };

    if let Some(meta) = &tx.meta {
        if let OptionSerializer::Some(loaded) = &meta.loaded_addresses {
            message.account_keys.extend(loaded.writable.iter().cloned());
            message.account_keys.extend(loaded.readonly.iter().cloned());
        }
    }

    Ok(message)
}

pub fn decode_raw_message(raw: &UiRawMessage) -> DecodedMessage {
    let instructions = raw
        .instructions
        .iter()
        .map(|ix| RawInstruction {
            program_id_index: ix.program_id_index as usize,
            account_indexes: ix.accounts.iter().map(|a| *a as usize).collect(),
            data: bs58::decode(&ix.data).into_vec().unwrap_or_default(),
        })
        .collect();

    DecodedMessage {
        account_keys: raw.account_keys.clone(),
        instructions,
    }
}

pub fn decode_versioned_transaction(tx: &VersionedTransaction) -> DecodedMessage {
    let account_keys = match &tx.message {
        VersionedMessage::Legacy(message) => &message.account_keys,
        VersionedMessage::V0(message) => &message.account_keys,
    }
    .iter()
    .map(|key| key.to_string())
    .collect();

    let instructions = tx
        .message
        .instructions()
        .iter()
        .map(|ix| RawInstruction {
            program_id_index: ix.program_id_index as usize,
            account_indexes: ix.accounts.iter().map(|a| *a as usize).collect(),
            data: ix.data.clone(),
        })
        .collect();

    DecodedMessage {
        account_keys,
        instructions,
    }
}

/// Select the first instruction issued by the AMM program with a
/// non-empty payload. Remaining instructions are never inspected.
pub fn find_amm_instruction<'a>(
    message: &'a DecodedMessage,
    amm_program_id: &str,
) -> Option<&'a RawInstruction> {
    message.instructions.iter().find(|ix| {
        !ix.data.is_empty()
            && message
                .account_keys
                .get(ix.program_id_index)
                .map(|key| key == amm_program_id)
                .unwrap_or(false)
    })
}

/// Map the instruction's account-index list to the pool roles.
///
/// An offset beyond the index list, an index beyond the account list, or
/// an account key that does not decode as a valid address all fail the
/// extraction for this transaction instead of producing garbage fields.
pub fn map_pool_accounts(
    account_keys: &[String],
    account_indexes: &[usize],
) -> Result<PoolAccounts, ExtractError> {
    let resolve = |offset: usize| -> Result<String, ExtractError> {
        let index = *account_indexes
            .get(offset)
            .ok_or(ExtractError::AccountOffsetOutOfRange {
                offset,
                available: account_indexes.len(),
            })?;
        let key = account_keys
            .get(index)
            .ok_or(ExtractError::AccountIndexOutOfRange {
                index,
                available: account_keys.len(),
            })?;
        let pubkey = Pubkey::from_str(key).map_err(|e| ExtractError::MalformedAccountKey {
            key: key.clone(),
            reason: e.to_string(),
        })?;
        Ok(pubkey.to_string())
    };

    Ok(PoolAccounts {
        program_id: resolve(offsets::PROGRAM_ID)?,
        amm_id: resolve(offsets::AMM_ID)?,
        amm_authority: resolve(offsets::AMM_AUTHORITY)?,
        amm_open_orders: resolve(offsets::AMM_OPEN_ORDERS)?,
        lp_mint: resolve(offsets::LP_MINT)?,
        coin_mint: resolve(offsets::COIN_MINT)?,
        pc_mint: resolve(offsets::PC_MINT)?,
        coin_vault: resolve(offsets::COIN_VAULT)?,
        pc_vault: resolve(offsets::PC_VAULT)?,
        amm_target_orders: resolve(offsets::AMM_TARGET_ORDERS)?,
        deployer: resolve(offsets::DEPLOYER)?,
    })
}

/// Full decode pipeline for one transaction: resolve the message, locate
/// the AMM instruction, map the accounts. `Ok(None)` means the
/// transaction simply does not contain a matching instruction.
pub fn decode_pool_accounts(
    tx: &EncodedTransactionWithStatusMeta,
    amm_program_id: &str,
) -> Result<Option<PoolAccounts>, ExtractError> {
    let message = resolve_message(tx)?;

    let instruction = match find_amm_instruction(&message, amm_program_id) {
        Some(ix) => ix,
        None => return Ok(None),
    };

    map_pool_accounts(&message.account_keys, &instruction.account_indexes).map(Some)
}
