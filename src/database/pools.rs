use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::pools::PoolRecord;

impl Database {
    /// Insert a pool record and return the new row id.
    ///
    /// A write that changes zero rows is reported as an error so the
    /// caller can log it as an unacknowledged persistence attempt.
    pub fn save_pool(&self, record: &PoolRecord) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "INSERT INTO pools (
                program_id, amm_id, amm_authority, amm_open_orders, lp_mint,
                coin_mint, pc_mint, coin_vault, pc_vault, amm_target_orders,
                deployer, system_program_id, token_program_id,
                associated_token_program_id, base_amount, quote_amount, k, v,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
            params![
                record.program_id,
                record.amm_id,
                record.amm_authority,
                record.amm_open_orders,
                record.lp_mint,
                record.coin_mint,
                record.pc_mint,
                record.coin_vault,
                record.pc_vault,
                record.amm_target_orders,
                record.deployer,
                record.system_program_id,
                record.token_program_id,
                record.associated_token_program_id,
                record.base_amount,
                record.quote_amount,
                record.k,
                record.v,
                Utc::now().to_rfc3339(),
            ],
        )?;

        if changed == 0 {
            anyhow::bail!("Pool insert was not acknowledged");
        }

        Ok(conn.last_insert_rowid())
    }

    /// Fetch a pool record by AMM pool id
    pub fn get_pool(&self, amm_id: &str) -> Result<Option<PoolRecord>> {
        let conn = self.conn.lock().unwrap();
        let record = conn
            .query_row(
                "SELECT program_id, amm_id, amm_authority, amm_open_orders, lp_mint,
                        coin_mint, pc_mint, coin_vault, pc_vault, amm_target_orders,
                        deployer, system_program_id, token_program_id,
                        associated_token_program_id, base_amount, quote_amount, k, v
                 FROM pools WHERE amm_id = ?1",
                params![amm_id],
                |row| {
                    Ok(PoolRecord {
                        program_id: row.get(0)?,
                        amm_id: row.get(1)?,
                        amm_authority: row.get(2)?,
                        amm_open_orders: row.get(3)?,
                        lp_mint: row.get(4)?,
                        coin_mint: row.get(5)?,
                        pc_mint: row.get(6)?,
                        coin_vault: row.get(7)?,
                        pc_vault: row.get(8)?,
                        amm_target_orders: row.get(9)?,
                        deployer: row.get(10)?,
                        system_program_id: row.get(11)?,
                        token_program_id: row.get(12)?,
                        associated_token_program_id: row.get(13)?,
                        base_amount: row.get(14)?,
                        quote_amount: row.get(15)?,
                        k: row.get(16)?,
                        v: row.get(17)?,
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    /// Total number of stored pool records
    pub fn pool_count(&self) -> Result<u64> {
        let conn = self.conn.lock().unwrap();
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM pools", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pools::accounts::PoolAccounts;
    use solana_sdk::pubkey::Pubkey;

    fn sample_record() -> PoolRecord {
        let accounts = PoolAccounts {
            program_id: Pubkey::new_unique().to_string(),
            amm_id: Pubkey::new_unique().to_string(),
            amm_authority: Pubkey::new_unique().to_string(),
            amm_open_orders: Pubkey::new_unique().to_string(),
            lp_mint: Pubkey::new_unique().to_string(),
            coin_mint: Pubkey::new_unique().to_string(),
            pc_mint: Pubkey::new_unique().to_string(),
            coin_vault: Pubkey::new_unique().to_string(),
            pc_vault: Pubkey::new_unique().to_string(),
            amm_target_orders: Pubkey::new_unique().to_string(),
            deployer: Pubkey::new_unique().to_string(),
        };
        PoolRecord::new(accounts, 1000.0, 500.0)
    }

    #[test]
    fn save_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::init(dir.path().join("pools.db").to_str().unwrap()).unwrap();

        let record = sample_record();
        let row_id = db.save_pool(&record).unwrap();
        assert!(row_id > 0);
        assert_eq!(db.pool_count().unwrap(), 1);

        let loaded = db.get_pool(&record.amm_id).unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn unknown_pool_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::init(dir.path().join("pools.db").to_str().unwrap()).unwrap();

        assert!(db.get_pool("missing").unwrap().is_none());
        assert_eq!(db.pool_count().unwrap(), 0);
    }

    #[test]
    fn inserts_are_append_only() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::init(dir.path().join("pools.db").to_str().unwrap()).unwrap();

        let first = db.save_pool(&sample_record()).unwrap();
        let second = db.save_pool(&sample_record()).unwrap();
        assert!(second > first);
        assert_eq!(db.pool_count().unwrap(), 2);
    }
}
