use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

use crate::entities::prelude::*;

/// Seeds the entity gauges from current table counts at startup so the
/// dashboard does not show zeros until the first write.
pub async fn init_metrics(db: &DatabaseConnection) {
    let user_count = User::find().count(db).await.unwrap_or(0);
    metrics::gauge!("moodledger_users_total").set(user_count as f64);

    let emotion_count = Emotion::find().count(db).await.unwrap_or(0);
    metrics::gauge!("moodledger_emotions_total").set(emotion_count as f64);

    let transaction_count = Transaction::find().count(db).await.unwrap_or(0);
    metrics::gauge!("moodledger_transactions_total").set(transaction_count as f64);

    let sample_count = HealthSample::find().count(db).await.unwrap_or(0);
    metrics::gauge!("moodledger_health_samples_total_rows").set(sample_count as f64);

    let insight_count = Insight::find().count(db).await.unwrap_or(0);
    metrics::gauge!("moodledger_insights_total").set(insight_count as f64);

    tracing::info!(
        users = user_count,
        emotions = emotion_count,
        transactions = transaction_count,
        health_samples = sample_count,
        insights = insight_count,
        "initialized metrics"
    );
}
