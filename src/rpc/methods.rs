//! RPC methods used by the pool event extractor
//!
//! Thin wrappers over `RpcClient::execute_raw` that build the request
//! params and parse the results into typed values.

use solana_account_decoder::{UiAccount, UiAccountData};
use solana_transaction_status::EncodedConfirmedTransactionWithStatusMeta;

use super::RpcClient;

impl RpcClient {
    /// Fetch a transaction by signature.
    ///
    /// Uses `json` encoding so instruction account indexes are preserved,
    /// confirmed commitment and version tolerance up to v0. A null result
    /// (unknown or not yet confirmed signature) maps to `Ok(None)`.
    pub async fn get_transaction(
        &self,
        signature: &str,
    ) -> Result<Option<EncodedConfirmedTransactionWithStatusMeta>, String> {
        let params = serde_json::json!([
            signature,
            {
                "encoding": "json",
                "commitment": "confirmed",
                "maxSupportedTransactionVersion": 0
            }
        ]);

        match self.execute_raw("getTransaction", params).await {
            Ok(value) => {
                if value.is_null() {
                    return Ok(None);
                }
                let tx: EncodedConfirmedTransactionWithStatusMeta = serde_json::from_value(value)
                    .map_err(|e| format!("Failed to parse transaction: {}", e))?;
                Ok(Some(tx))
            }
            Err(e) => Err(e.to_string()),
        }
    }

    /// Get the ui amount held by an SPL token account.
    ///
    /// Queries `getAccountInfo` with jsonParsed encoding and reads
    /// `data.parsed.info.tokenAmount.uiAmount`. A null ui amount is
    /// reported as 0.
    pub async fn get_token_account_ui_amount(&self, token_account: &str) -> Result<f64, String> {
        let params = serde_json::json!([
            token_account,
            {
                "encoding": "jsonParsed",
                "commitment": "confirmed"
            }
        ]);

        let result = self
            .execute_raw("getAccountInfo", params)
            .await
            .map_err(|e| e.to_string())?;

        let value = match result.get("value") {
            Some(v) if !v.is_null() => v.clone(),
            _ => return Err(format!("Token account not found: {}", token_account)),
        };

        let account: UiAccount = serde_json::from_value(value)
            .map_err(|e| format!("Failed to parse account info: {}", e))?;

        match account.data {
            UiAccountData::Json(parsed) => Ok(parsed
                .parsed
                .get("info")
                .and_then(|i| i.get("tokenAmount"))
                .and_then(|t| t.get("uiAmount"))
                .and_then(|a| a.as_f64())
                .unwrap_or(0.0)),
            _ => Err(format!(
                "Account {} did not parse as an SPL token account",
                token_account
            )),
        }
    }
}
