//! Loading odds payloads and statistical context from disk

pub mod context_loader;
pub mod odds_loader;

pub use context_loader::load_game_context;
pub use odds_loader::load_odds_payload;
