use super::transaction::{Transaction, TransactionKind};

/// Quantities at or below this are floating-point noise, not holdings,
/// and are excluded from valuation.
pub const DUST_THRESHOLD: f64 = 1e-7;

/// Running per-asset position while replaying the ledger up to an
/// instant. Ephemeral — rebuilt per valuation, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HoldingSnapshot {
    /// Units currently held (buys + transfers − sells)
    pub quantity: f64,
    /// Sum of `quantity × price_per_coin` over buy transactions only
    pub total_buy_cost: f64,
    /// Sum of quantities over buy transactions only
    pub total_buy_quantity: f64,
}

impl HoldingSnapshot {
    /// Apply one transaction to the running position.
    ///
    /// Transfers increase quantity without touching the buy totals: a
    /// transfer-in is already-owned, cost-free inventory.
    pub fn apply(&mut self, txn: &Transaction) {
        match txn.kind {
            TransactionKind::Buy => {
                self.quantity += txn.quantity;
                self.total_buy_quantity += txn.quantity;
                self.total_buy_cost += txn.quantity * txn.price_per_coin;
            }
            TransactionKind::Sell => {
                self.quantity -= txn.quantity;
            }
            TransactionKind::Transfer => {
                self.quantity += txn.quantity;
            }
        }
    }

    /// Quantity-weighted mean of buy prices; 0 when nothing was bought.
    pub fn average_buy_price(&self) -> f64 {
        if self.total_buy_quantity > 0.0 {
            self.total_buy_cost / self.total_buy_quantity
        } else {
            0.0
        }
    }

    /// Amount paid for the currently-held units.
    pub fn cost_basis(&self) -> f64 {
        self.quantity * self.average_buy_price()
    }

    /// Whether this position is large enough to count toward valuation.
    pub fn is_above_dust(&self) -> bool {
        self.quantity > DUST_THRESHOLD
    }
}
