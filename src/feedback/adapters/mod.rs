//! Adapter implementations for feedback ports.

pub mod memory;
pub mod ollama;
pub mod postgres;
