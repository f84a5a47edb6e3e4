//! HTTP handlers for the ranking API

pub mod health;
pub mod rank;
