//! Pure aggregation over transactions, budgets and health samples.
//!
//! Handlers fetch rows through the store and pass them here; nothing in this
//! module touches the database, which keeps the arithmetic testable without a
//! connection.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::kinds::EmotionKind;
use crate::entities::{budget, emotion, health_sample, transaction};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmotionSpend {
    pub emotion: EmotionKind,
    pub amount: f64,
}

/// Sums expense amounts per linked emotion label.
///
/// Only transactions with a negative amount and a resolvable `emotion_id`
/// contribute; everything else is ignored. The result always contains all
/// five labels in taxonomy order, zero-filled, because clients chart the full
/// set unconditionally.
pub fn spending_by_emotion(
    transactions: &[transaction::Model],
    emotions: &[emotion::Model],
) -> Vec<EmotionSpend> {
    let kind_by_id: HashMap<i32, EmotionKind> = emotions
        .iter()
        .filter_map(|e| EmotionKind::parse(&e.kind).map(|k| (e.id, k)))
        .collect();

    let mut totals: HashMap<EmotionKind, f64> = HashMap::new();
    for tx in transactions {
        if tx.amount >= 0.0 {
            continue;
        }
        let Some(kind) = tx.emotion_id.and_then(|id| kind_by_id.get(&id)) else {
            continue;
        };
        *totals.entry(*kind).or_insert(0.0) += tx.amount.abs();
    }

    EmotionKind::ALL
        .into_iter()
        .map(|emotion| EmotionSpend {
            emotion,
            amount: totals.get(&emotion).copied().unwrap_or(0.0),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetSpending {
    pub spent: f64,
    pub remaining: f64,
    pub percentage: f64,
}

/// Derives how much of a budget's allowance has been consumed.
///
/// The window is `[start_date, end_date ?? now]`; only expenses count, and a
/// set category restricts matches to that exact string. `remaining` never
/// goes negative and `percentage` is clamped to [0, 100], with a zero-amount
/// budget reported as 0% rather than dividing by zero.
pub fn budget_spending(
    budget: &budget::Model,
    transactions: &[transaction::Model],
    now: NaiveDateTime,
) -> BudgetSpending {
    let window_end = budget.end_date.unwrap_or(now);

    let spent: f64 = transactions
        .iter()
        .filter(|tx| tx.amount < 0.0)
        .filter(|tx| tx.date >= budget.start_date && tx.date <= window_end)
        .filter(|tx| match &budget.category {
            Some(category) => tx.category == *category,
            None => true,
        })
        .map(|tx| tx.amount.abs())
        .sum();

    let remaining = (budget.amount - spent).max(0.0);
    let percentage = if budget.amount <= 0.0 {
        0.0
    } else {
        (spent / budget.amount * 100.0).min(100.0)
    };

    BudgetSpending {
        spent,
        remaining,
        percentage,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HealthStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub count: u64,
}

/// Min/max/avg/count over sample values with `timestamp >= cutoff`.
///
/// An empty window yields all zeros with `count = 0`, never an error or NaN.
pub fn health_stats(samples: &[health_sample::Model], cutoff: NaiveDateTime) -> HealthStats {
    let values: Vec<f64> = samples
        .iter()
        .filter(|s| s.timestamp >= cutoff)
        .map(|s| s.value)
        .collect();

    if values.is_empty() {
        return HealthStats {
            min: 0.0,
            max: 0.0,
            avg: 0.0,
            count: 0,
        };
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let sum: f64 = values.iter().sum();

    HealthStats {
        min,
        max,
        avg: sum / values.len() as f64,
        count: values.len() as u64,
    }
}
