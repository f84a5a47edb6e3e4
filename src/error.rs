//! Engine errors and input validation helpers

use thiserror::Error;

/// Errors produced by the EV engine and its loaders
#[derive(Debug, Error)]
pub enum EngineError {
    /// The odds payload has neither a game_lines nor a player_props section
    #[error("odds payload is missing both game_lines and player_props sections")]
    EmptyPayload,

    /// Conservative adjustment factor outside the accepted range
    #[error("invalid conservative adjustment {0}: must be within [0, 1]")]
    InvalidAdjustment(f64),

    /// American odds value that cannot price a wager
    #[error("invalid American odds {0}: must be nonzero with magnitude >= 100")]
    InvalidOdds(i32),

    #[error("failed to read input file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse JSON document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validate an American odds price
pub fn validate_american_odds(odds: i32) -> Result<(), EngineError> {
    if odds == 0 || odds.abs() < 100 {
        return Err(EngineError::InvalidOdds(odds));
    }
    Ok(())
}

/// Validate the conservative adjustment factor.
///
/// 0 collapses every estimate to the market price; 1 trusts the model fully.
pub fn validate_adjustment(factor: f64) -> Result<(), EngineError> {
    if !(0.0..=1.0).contains(&factor) || factor.is_nan() {
        return Err(EngineError::InvalidAdjustment(factor));
    }
    Ok(())
}

#[cfg(feature = "api")]
mod api {
    use super::EngineError;
    use crate::models::ErrorResponse;
    use actix_web::{http::StatusCode, HttpResponse, ResponseError};

    impl ResponseError for EngineError {
        fn status_code(&self) -> StatusCode {
            match self {
                EngineError::EmptyPayload
                | EngineError::InvalidAdjustment(_)
                | EngineError::InvalidOdds(_)
                | EngineError::Json(_) => StatusCode::BAD_REQUEST,
                EngineError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }

        fn error_response(&self) -> HttpResponse {
            let error_code = match self {
                EngineError::EmptyPayload => "empty_payload",
                EngineError::InvalidAdjustment(_) => "invalid_adjustment",
                EngineError::InvalidOdds(_) => "invalid_odds",
                EngineError::Json(_) => "invalid_json",
                EngineError::Io(_) => "io_error",
            };

            HttpResponse::build(self.status_code()).json(ErrorResponse {
                error: error_code.to_string(),
                message: self.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_american_odds_valid() {
        assert!(validate_american_odds(-110).is_ok());
        assert!(validate_american_odds(100).is_ok());
        assert!(validate_american_odds(-100).is_ok());
        assert!(validate_american_odds(450).is_ok());
    }

    #[test]
    fn test_validate_american_odds_invalid() {
        assert!(validate_american_odds(0).is_err());
        assert!(validate_american_odds(50).is_err());
        assert!(validate_american_odds(-99).is_err());
    }

    #[test]
    fn test_validate_adjustment_range() {
        assert!(validate_adjustment(0.0).is_ok());
        assert!(validate_adjustment(0.85).is_ok());
        assert!(validate_adjustment(1.0).is_ok());
        assert!(validate_adjustment(-0.1).is_err());
        assert!(validate_adjustment(1.1).is_err());
        assert!(validate_adjustment(f64::NAN).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = EngineError::InvalidOdds(0);
        assert!(err.to_string().contains("invalid American odds 0"));

        let err = EngineError::EmptyPayload;
        assert!(err.to_string().contains("game_lines"));
    }
}
