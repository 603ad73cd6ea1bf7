//! Embedded pool record store
//!
//! A single insert-only `pools` table holds one row per decoded
//! liquidity-pool-creation transaction. Rows are never updated or
//! deleted; `save_pool` is the only write path.

mod pools;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::sync::Mutex;

pub struct Database {
    pub(crate) conn: Mutex<Connection>,
}

impl Database {
    /// Open the database file and ensure the schema exists.
    ///
    /// Callers treat a failure here as fatal: without a working store
    /// there is nothing meaningful for the extractor to do.
    pub fn init(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS pools (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                program_id TEXT NOT NULL,
                amm_id TEXT NOT NULL,
                amm_authority TEXT NOT NULL,
                amm_open_orders TEXT NOT NULL,
                lp_mint TEXT NOT NULL,
                coin_mint TEXT NOT NULL,
                pc_mint TEXT NOT NULL,
                coin_vault TEXT NOT NULL,
                pc_vault TEXT NOT NULL,
                amm_target_orders TEXT NOT NULL,
                deployer TEXT NOT NULL,
                system_program_id TEXT NOT NULL,
                token_program_id TEXT NOT NULL,
                associated_token_program_id TEXT NOT NULL,
                base_amount REAL NOT NULL,
                quote_amount REAL NOT NULL,
                k REAL NOT NULL,
                v REAL NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create pools table")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}
