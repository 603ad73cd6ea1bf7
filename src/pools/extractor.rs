//! Pool event extraction
//!
//! `PoolEventExtractor::extract` turns one transaction signature into at
//! most one persisted `PoolRecord`. Every per-transaction failure is
//! absorbed here and reduced to a log line; callers processing a stream
//! of signatures only ever see "record or none".

use std::sync::Arc;

use crate::database::Database;
use crate::errors::ExtractError;
use crate::logger::{self, LogTag};
use crate::pools::accounts::decode_pool_accounts;
use crate::pools::record::PoolRecord;
use crate::rpc::RpcClient;

pub struct PoolEventExtractor {
    rpc: Arc<RpcClient>,
    database: Arc<Database>,
    amm_program_id: String,
}

impl PoolEventExtractor {
    pub fn new(rpc: Arc<RpcClient>, database: Arc<Database>, amm_program_id: &str) -> Self {
        Self {
            rpc,
            database,
            amm_program_id: amm_program_id.to_string(),
        }
    }

    /// Extract pool metadata from the transaction behind `signature`.
    ///
    /// Returns the persisted record, or `None` when the transaction is
    /// unknown, contains no matching AMM instruction, or fails to decode.
    /// A failed persistence write is logged but does not withhold the
    /// record from the caller.
    pub async fn extract(&self, signature: &str) -> Option<PoolRecord> {
        match self.try_extract(signature).await {
            Ok(result) => result,
            Err(e) if e.is_decode_skip() => {
                logger::warning(
                    LogTag::Extract,
                    &format!("Skipping transaction {}: {}", short_sig(signature), e),
                );
                None
            }
            Err(e) => {
                logger::error(
                    LogTag::Extract,
                    &format!(
                        "Error processing transaction {}: {}",
                        short_sig(signature),
                        e
                    ),
                );
                None
            }
        }
    }

    async fn try_extract(&self, signature: &str) -> Result<Option<PoolRecord>, ExtractError> {
        let tx = self
            .rpc
            .get_transaction(signature)
            .await
            .map_err(ExtractError::Rpc)?;

        let tx = match tx {
            Some(tx) => tx,
            None => {
                logger::warning(
                    LogTag::Extract,
                    &format!(
                        "No transaction details found for signature {}",
                        short_sig(signature)
                    ),
                );
                return Ok(None);
            }
        };

        let accounts = match decode_pool_accounts(&tx.transaction, &self.amm_program_id)? {
            Some(accounts) => accounts,
            None => {
                logger::debug(
                    LogTag::Extract,
                    &format!("No AMM instruction in {}", short_sig(signature)),
                );
                return Ok(None);
            }
        };

        // The two vault reads are independent round trips; they reflect
        // chain state at query time, not at the transaction's slot.
        let (base_amount, quote_amount) = futures::future::try_join(
            self.fetch_vault_amount(&accounts.coin_vault),
            self.fetch_vault_amount(&accounts.pc_vault),
        )
        .await?;

        let mut record = PoolRecord::new(accounts, base_amount, quote_amount);
        record.normalize_wrapped_native();

        logger::info(
            LogTag::Extract,
            &format!(
                "New pool {} ({} / {}), base={}, quote={}",
                record.amm_id, record.coin_mint, record.pc_mint, record.base_amount,
                record.quote_amount
            ),
        );

        match self.database.save_pool(&record) {
            Ok(row_id) => {
                logger::info(
                    LogTag::Database,
                    &format!("Pool record saved (row id {})", row_id),
                );
            }
            Err(e) => {
                logger::error(
                    LogTag::Database,
                    &format!("Failed to save pool record for {}: {}", record.amm_id, e),
                );
            }
        }

        Ok(Some(record))
    }

    async fn fetch_vault_amount(&self, vault: &str) -> Result<f64, ExtractError> {
        self.rpc
            .get_token_account_ui_amount(vault)
            .await
            .map_err(ExtractError::Rpc)
    }
}

fn short_sig(signature: &str) -> &str {
    signature.get(..12).unwrap_or(signature)
}
