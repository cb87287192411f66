use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assets::Asset;
use crate::portfolios::Portfolio;

/// Performance of one ledger transaction against the current price.
/// Every field is rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionPerformance {
    pub buy_price: Decimal,
    pub quantity: Decimal,
    pub actual_price: Decimal,
    pub profit_loss: Decimal,
    pub performance_pct: Decimal,
}

/// Weighted performance of one asset, summed from its transaction rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPerformance {
    pub symbol: String,
    pub total_quantity: Decimal,
    pub total_cost: Decimal,
    pub actual_value: Decimal,
    pub total_profit_loss: Decimal,
    pub performance_pct: Decimal,
    pub transactions: Vec<TransactionPerformance>,
}

/// Result of evaluating an asset. `NoData` is a normal outcome (no ledger,
/// zero cost, or no usable quote) and must be kept out of aggregate totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssetPerformanceOutcome {
    Data(AssetPerformance),
    NoData { symbol: String, reason: String },
}

impl AssetPerformanceOutcome {
    pub fn no_data(symbol: &str, reason: impl Into<String>) -> Self {
        AssetPerformanceOutcome::NoData {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }

    pub fn performance(&self) -> Option<&AssetPerformance> {
        match self {
            AssetPerformanceOutcome::Data(performance) => Some(performance),
            AssetPerformanceOutcome::NoData { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AssetPerformanceOutcome::Data(_) => None,
            AssetPerformanceOutcome::NoData { reason, .. } => Some(reason),
        }
    }
}

/// Rolled-up figures shared by portfolio and dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceTotals {
    pub total_cost: Decimal,
    pub current_value: Decimal,
    pub total_profit_loss: Decimal,
    pub performance_pct: Decimal,
}

/// A ledger transaction merged with its performance row.
///
/// `id` and `created_at` come from the ledger. They are `None` when the
/// computed rows could not be matched one-to-one with the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledTransaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    pub price: Decimal,
    pub quantity: Decimal,
    pub actual_price: Option<Decimal>,
    pub profit_loss: Option<Decimal>,
    pub performance_pct: Option<Decimal>,
}

/// Asset-level figures without the per-transaction rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPerformanceSummary {
    pub total_cost: Decimal,
    pub actual_value: Decimal,
    pub total_profit_loss: Decimal,
    pub performance_pct: Decimal,
    /// Quantity as summed from the rounded transaction rows.
    pub total_quantity_calc: Decimal,
}

impl From<&AssetPerformance> for AssetPerformanceSummary {
    fn from(performance: &AssetPerformance) -> Self {
        Self {
            total_cost: performance.total_cost,
            actual_value: performance.actual_value,
            total_profit_loss: performance.total_profit_loss,
            performance_pct: performance.performance_pct,
            total_quantity_calc: performance.total_quantity,
        }
    }
}

/// An asset as presented alongside its performance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetPerformanceReport {
    #[serde(flatten)]
    pub asset: Asset,
    #[serde(flatten)]
    pub performance: Option<AssetPerformanceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_error: Option<String>,
    pub transactions: Vec<ReconciledTransaction>,
}

/// A portfolio with its point-in-time performance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioPerformance {
    #[serde(flatten)]
    pub portfolio: Portfolio,
    #[serde(flatten)]
    pub totals: PerformanceTotals,
    pub assets: Vec<AssetPerformanceReport>,
}

/// Per-portfolio line of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub id: String,
    pub name: String,
    pub base_currency: String,
    pub created_at: NaiveDateTime,
    #[serde(flatten)]
    pub totals: PerformanceTotals,
    pub asset_count: usize,
    /// Assets left out of the totals because no performance was available.
    pub assets_without_data: usize,
}

/// Aggregation across every portfolio a user owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSetPerformance {
    pub total_investment_cost: Decimal,
    pub total_current_value: Decimal,
    pub total_profit_loss: Decimal,
    pub total_performance_pct: Decimal,
    pub total_portfolios: usize,
    pub portfolios: Vec<PortfolioSummary>,
}

/// Return since the first purchase, measured on acquisition price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionPerformance {
    pub symbol: String,
    pub acquisition_date: NaiveDate,
    pub acquisition_price: Decimal,
    /// First market close on or after the acquisition date; the acquisition
    /// price when the market has no history for that window.
    pub historical_close: Decimal,
    pub current_price: Decimal,
    pub performance_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AcquisitionPerformanceOutcome {
    Data(AcquisitionPerformance),
    NoData { symbol: String, reason: String },
}
