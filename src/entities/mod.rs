pub mod budget;
pub mod emotion;
pub mod emotion_reference_image;
pub mod health_sample;
pub mod insight;
pub mod transaction;
pub mod user;

pub use budget::Entity as Budget;
pub use emotion::Entity as Emotion;
pub use emotion_reference_image::Entity as EmotionReferenceImage;
pub use health_sample::Entity as HealthSample;
pub use insight::Entity as Insight;
pub use transaction::Entity as Transaction;
pub use user::Entity as User;

pub mod prelude;
