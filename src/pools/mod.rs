//! Raydium liquidity-pool-creation decoding
//!
//! `accounts` normalizes transaction encodings and maps instruction
//! accounts to pool roles, `record` holds the persisted domain record,
//! `extractor` drives the fetch → decode → persist flow.

pub mod accounts;
pub mod extractor;
pub mod record;

pub use extractor::PoolEventExtractor;
pub use record::PoolRecord;
