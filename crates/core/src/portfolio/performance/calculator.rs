//! Pure performance arithmetic.
//!
//! Nothing in here performs I/O. Callers fetch the ledger and one current
//! price per asset, then hand them over. Division is always guarded: a zero
//! denominator yields a zero percentage or a `NoData` outcome.

use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;

use super::performance_model::{
    AcquisitionPerformance, AssetPerformance, AssetPerformanceOutcome, PerformanceTotals,
    PortfolioSetPerformance, PortfolioSummary, ReconciledTransaction, TransactionPerformance,
};
use crate::assets::AssetTransaction;
use crate::utils::decimal_utils::{percentage_of, round_display};

pub const NO_TRANSACTIONS_REASON: &str = "No transactions for this asset";
pub const ZERO_COST_REASON: &str = "Total cost is zero";
pub const OVERFLOW_REASON: &str = "Amounts are too large to evaluate";

/// One row per transaction, in ledger order, each field rounded to 2 dp.
///
/// Returns `None` when a row's profit or loss does not fit in a `Decimal`.
pub fn transaction_performance(
    transactions: &[AssetTransaction],
    current_price: Decimal,
) -> Option<Vec<TransactionPerformance>> {
    transactions
        .iter()
        .map(|tx| {
            let price_change = current_price.checked_sub(tx.price)?;
            Some(TransactionPerformance {
                buy_price: round_display(tx.price),
                quantity: round_display(tx.quantity),
                actual_price: round_display(current_price),
                profit_loss: round_display(price_change.checked_mul(tx.quantity)?),
                performance_pct: round_display(
                    percentage_of(price_change, tx.price).unwrap_or(Decimal::ZERO),
                ),
            })
        })
        .collect()
}

/// Weighted performance of an asset.
///
/// Totals are summed from the already rounded transaction rows, so they can
/// differ by a few cents from a computation on raw ledger values.
pub fn asset_performance(
    symbol: &str,
    transactions: &[AssetTransaction],
    current_price: Decimal,
) -> AssetPerformanceOutcome {
    if transactions.is_empty() {
        return AssetPerformanceOutcome::no_data(symbol, NO_TRANSACTIONS_REASON);
    }

    let Some(rows) = transaction_performance(transactions, current_price) else {
        return AssetPerformanceOutcome::no_data(symbol, OVERFLOW_REASON);
    };
    let totals = rows.iter().try_fold(
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        |(quantity, cost, value), row| {
            Some((
                quantity.checked_add(row.quantity)?,
                cost.checked_add(row.buy_price.checked_mul(row.quantity)?)?,
                value.checked_add(row.actual_price.checked_mul(row.quantity)?)?,
            ))
        },
    );
    let Some((total_quantity, total_cost, actual_value)) = totals else {
        return AssetPerformanceOutcome::no_data(symbol, OVERFLOW_REASON);
    };
    let Some(total_profit_loss) = actual_value.checked_sub(total_cost) else {
        return AssetPerformanceOutcome::no_data(symbol, OVERFLOW_REASON);
    };

    let Some(performance_pct) = percentage_of(total_profit_loss, total_cost) else {
        return AssetPerformanceOutcome::no_data(symbol, ZERO_COST_REASON);
    };

    AssetPerformanceOutcome::Data(AssetPerformance {
        symbol: symbol.to_string(),
        total_quantity,
        total_cost: round_display(total_cost),
        actual_value: round_display(actual_value),
        total_profit_loss: round_display(total_profit_loss),
        performance_pct: round_display(performance_pct),
        transactions: rows,
    })
}

/// Rolls asset outcomes into totals. `NoData` outcomes are skipped, and so
/// is any asset whose amounts no longer fit once added to the running sum.
pub fn summarize_assets<'a, I>(outcomes: I) -> PerformanceTotals
where
    I: IntoIterator<Item = &'a AssetPerformanceOutcome>,
{
    let (total_cost, total_profit_loss) = outcomes
        .into_iter()
        .filter_map(AssetPerformanceOutcome::performance)
        .fold((Decimal::ZERO, Decimal::ZERO), |sums, perf| {
            accumulate(sums, perf.total_cost, perf.total_profit_loss, &perf.symbol)
        });
    totals_from(total_cost, total_profit_loss)
}

/// Rolls portfolio summaries one level higher into the dashboard view.
pub fn summarize_portfolios(portfolios: Vec<PortfolioSummary>) -> PortfolioSetPerformance {
    let (total_cost, total_profit_loss) = portfolios
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |sums, p| {
            accumulate(sums, p.totals.total_cost, p.totals.total_profit_loss, &p.id)
        });
    let totals = totals_from(total_cost, total_profit_loss);

    PortfolioSetPerformance {
        total_investment_cost: totals.total_cost,
        total_current_value: totals.current_value,
        total_profit_loss: totals.total_profit_loss,
        total_performance_pct: totals.performance_pct,
        total_portfolios: portfolios.len(),
        portfolios,
    }
}

// Keeps cost, profit/loss and their sum (the current value) representable.
fn accumulate(
    (cost, pl): (Decimal, Decimal),
    add_cost: Decimal,
    add_pl: Decimal,
    label: &str,
) -> (Decimal, Decimal) {
    let next = cost
        .checked_add(add_cost)
        .zip(pl.checked_add(add_pl))
        .filter(|(c, p)| c.checked_add(*p).is_some());
    match next {
        Some(sums) => sums,
        None => {
            warn!("Skipping {} in totals: amounts out of range", label);
            (cost, pl)
        }
    }
}

fn totals_from(total_cost: Decimal, total_profit_loss: Decimal) -> PerformanceTotals {
    let performance_pct = if total_cost > Decimal::ZERO {
        percentage_of(total_profit_loss, total_cost).unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };
    PerformanceTotals {
        total_cost: round_display(total_cost),
        current_value: round_display(
            total_cost.checked_add(total_profit_loss).unwrap_or(total_cost),
        ),
        total_profit_loss: round_display(total_profit_loss),
        performance_pct: round_display(performance_pct),
    }
}

/// Merges computed rows with the ledger they were computed from.
///
/// `rows` must have been computed from the ledger in canonical
/// `(created_at, id)` order; the ledger is put in that same order before
/// pairing.
/// When the counts differ the rows are returned without ledger identity
/// rather than pairing a row with the wrong transaction.
pub fn reconcile_transactions(
    ledger: &[AssetTransaction],
    rows: &[TransactionPerformance],
) -> Vec<ReconciledTransaction> {
    if ledger.len() != rows.len() {
        return rows
            .iter()
            .map(|row| ReconciledTransaction {
                id: None,
                created_at: None,
                price: row.buy_price,
                quantity: row.quantity,
                actual_price: Some(row.actual_price),
                profit_loss: Some(row.profit_loss),
                performance_pct: Some(row.performance_pct),
            })
            .collect();
    }

    let mut ordered = ledger.to_vec();
    AssetTransaction::sort_canonical(&mut ordered);

    ordered
        .into_iter()
        .zip(rows)
        .map(|(tx, row)| ReconciledTransaction {
            id: Some(tx.id),
            created_at: Some(tx.created_at),
            price: row.buy_price,
            quantity: row.quantity,
            actual_price: Some(row.actual_price),
            profit_loss: Some(row.profit_loss),
            performance_pct: Some(row.performance_pct),
        })
        .collect()
}

/// Ledger transactions with no performance attached.
pub fn ledger_only_transactions(ledger: &[AssetTransaction]) -> Vec<ReconciledTransaction> {
    ledger
        .iter()
        .map(|tx| ReconciledTransaction {
            id: Some(tx.id.clone()),
            created_at: Some(tx.created_at),
            price: tx.price,
            quantity: tx.quantity,
            actual_price: None,
            profit_loss: None,
            performance_pct: None,
        })
        .collect()
}

/// Return of `current_price` over the acquisition price of `first`.
pub fn acquisition_performance(
    symbol: &str,
    first: &AssetTransaction,
    historical_close: Option<Decimal>,
    current_price: Decimal,
) -> AcquisitionPerformance {
    let acquisition_date: NaiveDate = first.created_at.date();
    let performance_pct = current_price
        .checked_sub(first.price)
        .and_then(|change| percentage_of(change, first.price))
        .unwrap_or(Decimal::ZERO);

    AcquisitionPerformance {
        symbol: symbol.to_string(),
        acquisition_date,
        acquisition_price: first.price,
        historical_close: historical_close.unwrap_or(first.price),
        current_price,
        performance_pct: round_display(performance_pct),
    }
}
