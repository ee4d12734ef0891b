use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A parsed ("enhanced") transaction as returned by the Helius API.
///
/// Records are immutable once fetched: the streaming layer hands them from
/// the producer task to the consumer by value, one at a time. The
/// `signature` doubles as the pagination cursor: the signature of the last
/// record of a page addresses the page that follows it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transaction {
    /// Human-readable summary produced by the API.
    pub description: String,
    /// Transaction type label, e.g. `TRANSFER`.
    #[serde(rename = "type")]
    pub tx_type: String,
    /// Program or platform the transaction was attributed to.
    pub source: String,
    /// Fee in lamports.
    pub fee: u64,
    /// Account that paid the fee.
    pub fee_payer: String,
    /// Unique transaction signature; also the pagination cursor.
    pub signature: String,
    pub slot: u64,
    /// Block time in unix seconds; zero when the server omitted it.
    pub timestamp: i64,
    pub native_transfers: Vec<NativeTransfer>,
    pub token_transfers: Vec<TokenTransfer>,
    pub account_data: Vec<AccountData>,
    pub transaction_error: Option<TransactionError>,
    pub instructions: Vec<Instruction>,
    pub events: Events,
}

impl Transaction {
    /// Block time as a UTC timestamp, when the server provided one.
    pub fn block_time(&self) -> Option<DateTime<Utc>> {
        if self.timestamp == 0 {
            return None;
        }
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// A deposit credits `address` from somewhere else: the address did not
    /// pay the fee and the transaction carries exactly one native transfer.
    pub fn is_deposit_for(&self, address: &str) -> bool {
        self.fee_payer != address && self.native_transfers.len() == 1
    }
}

/// A lamport transfer between two user accounts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NativeTransfer {
    pub from_user_account: String,
    pub to_user_account: String,
    /// Amount in lamports.
    pub amount: u64,
}

/// An SPL token transfer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenTransfer {
    pub from_user_account: String,
    pub to_user_account: String,
    pub from_token_account: String,
    pub to_token_account: String,
    pub token_amount: f64,
    pub mint: String,
}

/// Per-account balance effects of a transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountData {
    pub account: String,
    pub native_balance_change: i64,
    pub token_balance_changes: Vec<TokenBalanceChange>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenBalanceChange {
    pub user_account: String,
    pub token_account: String,
    pub mint: String,
    pub raw_token_amount: TokenAmount,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenAmount {
    pub token_amount: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionError {
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Instruction {
    pub accounts: Vec<String>,
    pub data: String,
    pub program_id: String,
    pub inner_instructions: Vec<InnerInstruction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InnerInstruction {
    pub accounts: Vec<String>,
    pub data: String,
    pub program_id: String,
}

/// Structured event payloads the API attaches to some transaction types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Events {
    pub nft: Option<NftEvent>,
    pub swap: Option<SwapEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NftEvent {
    pub description: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub source: String,
    pub amount: u64,
    pub fee: u64,
    pub fee_payer: String,
    pub signature: String,
    pub slot: u64,
    pub timestamp: i64,
    pub sale_type: String,
    pub buyer: String,
    pub seller: String,
    pub staker: String,
    pub nfts: Vec<Nft>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Nft {
    pub mint: String,
    pub token_standard: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwapEvent {
    pub native_input: Option<NativeAmount>,
    pub native_output: Option<NativeAmount>,
    pub token_inputs: Vec<TokenValue>,
    pub token_outputs: Vec<TokenValue>,
    pub token_fees: Vec<TokenValue>,
    pub native_fees: Vec<NativeAmount>,
    pub inner_swaps: Vec<InnerSwap>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NativeAmount {
    pub account: String,
    pub amount: String,
}

/// A token amount attributed to an account, used for swap legs and fees.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenValue {
    pub user_account: String,
    pub token_account: String,
    pub mint: String,
    pub raw_token_amount: TokenAmount,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InnerSwap {
    pub token_inputs: Vec<TokenValue>,
    pub token_outputs: Vec<TokenValue>,
    pub token_fees: Vec<TokenValue>,
    pub native_fees: Vec<NativeAmount>,
    pub program_info: ProgramInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgramInfo {
    pub source: String,
    pub account: String,
    pub program_name: String,
    pub instruction_name: String,
}
