pub mod api;
pub mod app;
pub mod domain;
pub mod entities;
pub mod error;
pub mod gemini;
pub mod metrics;
pub mod migrator;
pub mod store;
pub mod telemetry;

pub mod test_utils;

pub use sea_orm;
