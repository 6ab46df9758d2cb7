//! Automatic feedback for completed tasks.
//!
//! Scores a task by comparing its estimate with the measured duration and
//! attaches a comment, either templated or produced by an optional
//! generator. Exactly one feedback record exists per completed task.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
