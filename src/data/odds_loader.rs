//! Odds payload JSON loading

use crate::error::EngineError;
use crate::models::OddsPayload;
use std::fs;
use std::path::Path;

/// Load a normalized odds payload from a JSON file
pub fn load_odds_payload<P: AsRef<Path>>(path: P) -> Result<OddsPayload, EngineError> {
    let content = fs::read_to_string(path.as_ref())?;
    let payload: OddsPayload = serde_json::from_str(&content)?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_payload_from_json_string() {
        let json = r#"{
            "teams": {
                "away": {"name": "New York Jets", "abbr": "NYJ"},
                "home": {"name": "New England Patriots", "abbr": "NE"}
            },
            "game_lines": {
                "moneyline": {"away": 130, "home": -150}
            },
            "player_props": []
        }"#;

        let payload: OddsPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.teams.home.abbr, "NE");
        assert!(!payload.is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_odds_payload("/nonexistent/odds.json");
        assert!(matches!(result, Err(EngineError::Io(_))));
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let dir = std::env::temp_dir();
        let path = dir.join("sportsedge_test_malformed_odds.json");
        fs::write(&path, "{not json").unwrap();

        let result = load_odds_payload(&path);
        assert!(matches!(result, Err(EngineError::Json(_))));

        fs::remove_file(&path).ok();
    }
}
