//! Core betting math: odds conversion, probability models, EV and Kelly

pub mod ev;
pub mod odds;
pub mod probability;
