pub use super::budget::Entity as Budget;
pub use super::emotion::Entity as Emotion;
pub use super::emotion_reference_image::Entity as EmotionReferenceImage;
pub use super::health_sample::Entity as HealthSample;
pub use super::insight::Entity as Insight;
pub use super::transaction::Entity as Transaction;
pub use super::user::Entity as User;
