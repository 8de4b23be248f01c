pub mod analysis;
pub mod analytics;
pub mod auth;
pub mod budget;
pub mod emotion;
pub mod extractors;
pub mod health;
pub mod insight;
pub mod middleware;
pub mod reference_image;
pub mod transaction;
