//! Statistical context JSON loading

use crate::error::EngineError;
use crate::models::GameContext;
use std::fs;
use std::path::Path;

/// Load the per-game statistical context (both teams and their players)
/// from a JSON file
pub fn load_game_context<P: AsRef<Path>>(path: P) -> Result<GameContext, EngineError> {
    let content = fs::read_to_string(path.as_ref())?;
    let context: GameContext = serde_json::from_str(&content)?;
    Ok(context)
}
