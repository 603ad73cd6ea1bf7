use serde::{Deserialize, Serialize};

use crate::constants::{
    ASSOCIATED_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID, WRAPPED_SOL_MINT,
};
use crate::pools::accounts::PoolAccounts;

/// Metadata derived from one liquidity-pool-creation transaction.
///
/// Serialized field names keep the camelCase shape of the persisted
/// documents. Records are written once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRecord {
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
    pub system_program_id: String,
    pub token_program_id: String,
    pub associated_token_program_id: String,
    pub base_amount: f64,
    pub quote_amount: f64,
    #[serde(rename = "K")]
    pub k: f64,
    #[serde(rename = "V")]
    pub v: f64,
}

impl PoolRecord {
    pub fn new(accounts: PoolAccounts, base_amount: f64, quote_amount: f64) -> Self {
        let (k, v) = pool_metrics(base_amount, quote_amount);

        Self {
            program_id: accounts.program_id,
            amm_id: accounts.amm_id,
            amm_authority: accounts.amm_authority,
            amm_open_orders: accounts.amm_open_orders,
            lp_mint: accounts.lp_mint,
            coin_mint: accounts.coin_mint,
            pc_mint: accounts.pc_mint,
            coin_vault: accounts.coin_vault,
            pc_vault: accounts.pc_vault,
            amm_target_orders: accounts.amm_target_orders,
            deployer: accounts.deployer,
            system_program_id: SYSTEM_PROGRAM_ID.to_string(),
            token_program_id: TOKEN_PROGRAM_ID.to_string(),
            associated_token_program_id: ASSOCIATED_TOKEN_PROGRAM_ID.to_string(),
            base_amount,
            quote_amount,
            k,
            v,
        }
    }

    /// Normalize mint ordering so the wrapped native asset is always the
    /// quote side: when the coin mint is wrapped SOL, the two mint fields
    /// swap. Vaults and amounts stay as extracted.
    pub fn normalize_wrapped_native(&mut self) {
        if self.coin_mint == WRAPPED_SOL_MINT {
            std::mem::swap(&mut self.coin_mint, &mut self.pc_mint);
        }
    }
}

/// Compute the reserve product `K` and balance ratio `V` for a pool.
///
/// `V` is min/max of the two amounts and lies in `[0, 1]`; when either
/// amount is zero it is defined as 0 rather than NaN.
pub fn pool_metrics(base_amount: f64, quote_amount: f64) -> (f64, f64) {
    let k = base_amount * quote_amount;

    let (smaller, larger) = if base_amount <= quote_amount {
        (base_amount, quote_amount)
    } else {
        (quote_amount, base_amount)
    };
    let v = if larger == 0.0 { 0.0 } else { smaller / larger };

    (k, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::pubkey::Pubkey;

    fn accounts_with_mints(coin_mint: &str, pc_mint: &str) -> PoolAccounts {
        PoolAccounts {
            program_id: Pubkey::new_unique().to_string(),
            amm_id: Pubkey::new_unique().to_string(),
            amm_authority: Pubkey::new_unique().to_string(),
            amm_open_orders: Pubkey::new_unique().to_string(),
            lp_mint: Pubkey::new_unique().to_string(),
            coin_mint: coin_mint.to_string(),
            pc_mint: pc_mint.to_string(),
            coin_vault: Pubkey::new_unique().to_string(),
            pc_vault: Pubkey::new_unique().to_string(),
            amm_target_orders: Pubkey::new_unique().to_string(),
            deployer: Pubkey::new_unique().to_string(),
        }
    }

    #[test]
    fn metrics_match_launch_scenario() {
        let (k, v) = pool_metrics(1000.0, 500.0);
        assert_eq!(k, 500_000.0);
        assert_eq!(v, 0.5);
    }

    #[test]
    fn ratio_is_one_for_equal_amounts() {
        let (k, v) = pool_metrics(250.0, 250.0);
        assert_eq!(k, 62_500.0);
        assert_eq!(v, 1.0);
    }

    #[test]
    fn ratio_is_bounded_for_positive_pairs() {
        let pairs = [(1.0, 1_000_000.0), (42.5, 0.003), (7.0, 7.1)];
        for (base, quote) in pairs {
            let (_, v) = pool_metrics(base, quote);
            assert!(v > 0.0 && v <= 1.0, "v={} out of range", v);
        }
    }

    #[test]
    fn zero_amount_short_circuits_ratio() {
        let (k, v) = pool_metrics(0.0, 500.0);
        assert_eq!(k, 0.0);
        assert_eq!(v, 0.0);

        let (k, v) = pool_metrics(0.0, 0.0);
        assert_eq!(k, 0.0);
        assert_eq!(v, 0.0);
        assert!(!v.is_nan());
    }

    #[test]
    fn wrapped_native_coin_mint_swaps_to_quote_side() {
        let other_mint = Pubkey::new_unique().to_string();
        let mut record =
            PoolRecord::new(accounts_with_mints(WRAPPED_SOL_MINT, &other_mint), 1000.0, 500.0);
        let coin_vault = record.coin_vault.clone();
        let pc_vault = record.pc_vault.clone();

        record.normalize_wrapped_native();

        assert_eq!(record.coin_mint, other_mint);
        assert_eq!(record.pc_mint, WRAPPED_SOL_MINT);
        // Only the mint fields swap
        assert_eq!(record.coin_vault, coin_vault);
        assert_eq!(record.pc_vault, pc_vault);
        assert_eq!(record.base_amount, 1000.0);
        assert_eq!(record.quote_amount, 500.0);
    }

    #[test]
    fn non_native_mints_are_left_alone() {
        let coin = Pubkey::new_unique().to_string();
        let pc = Pubkey::new_unique().to_string();
        let mut record = PoolRecord::new(accounts_with_mints(&coin, &pc), 10.0, 20.0);

        record.normalize_wrapped_native();

        assert_eq!(record.coin_mint, coin);
        assert_eq!(record.pc_mint, pc);
    }

    #[test]
    fn serializes_with_document_field_names() {
        let record = PoolRecord::new(
            accounts_with_mints(
                &Pubkey::new_unique().to_string(),
                &Pubkey::new_unique().to_string(),
            ),
            1000.0,
            500.0,
        );

        let doc = serde_json::to_value(&record).unwrap();
        assert!(doc.get("programId").is_some());
        assert!(doc.get("ammOpenOrders").is_some());
        assert!(doc.get("associatedTokenProgramId").is_some());
        assert_eq!(doc.get("K").unwrap().as_f64().unwrap(), 500_000.0);
        assert_eq!(doc.get("V").unwrap().as_f64().unwrap(), 0.5);
    }
}
