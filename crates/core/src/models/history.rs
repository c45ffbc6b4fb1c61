use serde::{Deserialize, Serialize};

/// One computed chart sample as it appears on the wire:
/// `[timestampMs, value]`.
pub type SamplePair = (i64, f64);

/// The full portfolio-history response: three parallel series, one entry
/// per surviving sample point, strictly increasing by timestamp.
///
/// Charts need at least two points to draw a line; when the computation
/// produced fewer (empty ledger, immediate deadline expiry, no price
/// data) the series are empty and `error` explains why. That is still a
/// success response — the caller always gets this shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioHistory {
    /// Unrealized profit/loss per sample; the first sample is always 0
    pub pnl: Vec<SamplePair>,

    /// Total market value of holdings per sample
    pub value: Vec<SamplePair>,

    /// Total cost basis per sample
    pub cost: Vec<SamplePair>,

    /// Set only when the series are empty for a describable reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PortfolioHistory {
    /// The empty-but-valid shape for a degenerate input (no error).
    pub fn empty() -> Self {
        Self::default()
    }

    /// The empty shape with an explanation attached.
    pub fn empty_with_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}
