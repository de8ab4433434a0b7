//! studymap-db: PostgreSQL persistence for roadmaps.
//!
//! The engine in studymap-core is pure; this crate stores its output.
//! Rows carry the full roadmap as JSONB plus denormalized columns for
//! list views, and writes go through an optimistic-lock replace so
//! concurrent toggles never silently overwrite each other.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;

pub use config::DbConfig;
pub use models::StoredRoadmap;
