//! Shared input validation
//!
//! Runs before any draw is consumed, so a rejected request never touches
//! round state.

use crate::errors::{FairplayError, FairplayResult};
use serde_json::Value;

pub fn client_seed(seed: &str) -> FairplayResult<()> {
    if seed.is_empty() {
        return Err(FairplayError::InvalidClientSeed);
    }
    Ok(())
}

pub fn bet_amount(amount: f64) -> FairplayResult<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(FairplayError::InvalidBetAmount(format!(
            "{} (must be a finite amount greater than zero)",
            amount
        )));
    }
    Ok(())
}

/// Parse a nonce from raw JSON; only non-negative integers are accepted.
pub fn nonce(raw: &Value) -> FairplayResult<u64> {
    match raw {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return Ok(v);
            }
            // Accept integral floats such as `3.0`, reject everything else.
            match n.as_f64() {
                Some(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 => {
                    Ok(f as u64)
                }
                _ => Err(FairplayError::InvalidNonce(format!(
                    "{} is not a non-negative integer",
                    n
                ))),
            }
        }
        Value::Null => Err(FairplayError::InvalidNonce("nonce is required".to_string())),
        other => Err(FairplayError::InvalidNonce(format!(
            "expected a non-negative integer, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_seed() {
        assert!(client_seed("player1").is_ok());
        assert!(matches!(
            client_seed(""),
            Err(FairplayError::InvalidClientSeed)
        ));
    }

    #[test]
    fn test_bet_amount() {
        assert!(bet_amount(0.0001).is_ok());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                bet_amount(bad),
                Err(FairplayError::InvalidBetAmount(_))
            ));
        }
    }

    #[test]
    fn test_nonce_parsing() {
        assert_eq!(nonce(&json!(0)).unwrap(), 0);
        assert_eq!(nonce(&json!(42)).unwrap(), 42);
        assert_eq!(nonce(&json!(7.0)).unwrap(), 7);
        for bad in [json!(-1), json!(1.5), json!("3"), json!(null), json!([1])] {
            assert!(
                matches!(nonce(&bad), Err(FairplayError::InvalidNonce(_))),
                "{} should be rejected",
                bad
            );
        }
    }
}
