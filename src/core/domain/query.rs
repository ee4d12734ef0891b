/// Filter values for the transaction-history endpoint.
///
/// `before` carries the pagination cursor and is rewritten by the streaming
/// paginator after every fetched page; a query value therefore belongs to
/// exactly one stream and must not be shared across concurrent paginations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    pub tx_type: Option<TransactionType>,
    pub source: Option<TransactionSource>,
    /// Return records older than this signature.
    pub before: Option<String>,
    /// Return records newer than this signature.
    pub after: Option<String>,
    pub commitment: Option<Commitment>,
    /// Maximum number of records per page.
    pub limit: Option<u32>,
}

impl TransactionQuery {
    /// Renders the query as request parameters.
    ///
    /// The mapping is declared field by field: unset fields and empty cursor
    /// strings contribute no pair, and every key is the lowercased field
    /// name (`tx_type` maps to the wire name `type`).
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(tx_type) = self.tx_type {
            pairs.push(("type", tx_type.as_str().to_string()));
        }
        if let Some(source) = self.source {
            pairs.push(("source", source.as_str().to_string()));
        }
        if let Some(before) = &self.before {
            if !before.is_empty() {
                pairs.push(("before", before.clone()));
            }
        }
        if let Some(after) = &self.after {
            if !after.is_empty() {
                pairs.push(("after", after.clone()));
            }
        }
        if let Some(commitment) = self.commitment {
            pairs.push(("commitment", commitment.as_str().to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }

    /// Moves the pagination window past `cursor`.
    ///
    /// Only the paginator's producer task calls this, once per fetched page,
    /// with the signature of the page's last record.
    pub(crate) fn advance_cursor(&mut self, cursor: String) {
        self.before = Some(cursor);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Transfer,
    Swap,
    NftSale,
    NftMint,
    Burn,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Transfer => "transfer",
            TransactionType::Swap => "swap",
            TransactionType::NftSale => "nft_sale",
            TransactionType::NftMint => "nft_mint",
            TransactionType::Burn => "burn",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionSource {
    SystemProgram,
    Jupiter,
    MagicEden,
}

impl TransactionSource {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionSource::SystemProgram => "system_program",
            TransactionSource::Jupiter => "jupiter",
            TransactionSource::MagicEden => "magic_eden",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commitment {
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(self) -> &'static str {
        match self {
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}
