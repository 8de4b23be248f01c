//! Persistence adapter: thin async CRUD and query functions per entity.
//!
//! Handlers never build sea-orm queries themselves and backends swap through
//! `DATABASE_URL` alone (Postgres in deployment, SQLite in tests). No
//! function here performs referential checks beyond scoping rows to their
//! owning user; cross-entity validation happens at the API layer.

pub mod budgets;
pub mod emotions;
pub mod health;
pub mod insights;
pub mod reference_images;
pub mod transactions;
pub mod users;
