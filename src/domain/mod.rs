//! Domain types and pure aggregation logic, shared by every API handler.

pub mod analytics;
pub mod kinds;

pub use analytics::{budget_spending, health_stats, spending_by_emotion};
pub use kinds::{EmotionKind, HealthMetric};
