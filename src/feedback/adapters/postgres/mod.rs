//! `PostgreSQL` adapters for feedback persistence.

mod models;
mod repository;
mod schema;

pub use repository::PostgresFeedbackRepository;
