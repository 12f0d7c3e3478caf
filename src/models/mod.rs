use crate::window::{TrendDirection, TrendLine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tracked market symbol
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    pub symbol: String,
}

impl Token {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
        }
    }
}

/// Simple price snapshot - just price and timestamp
/// This is the only thing the feeds produce
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceSnapshot {
    pub token: String,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

/// Trading signal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
        };
        write!(f, "{}", label)
    }
}

/// Point-in-time view of one symbol's window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendReport {
    pub token: String,
    pub samples: usize,
    pub full: bool,
    pub latest: Option<f64>,
    pub sum: f64,
    pub trend: TrendLine,
    pub threshold: f64,
    /// `None` while the angle sits exactly on the threshold
    pub direction: Option<TrendDirection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_creation() {
        let token = Token::new("SOL");
        assert_eq!(token.symbol, "SOL");
        assert_eq!(token, Token::new("SOL"));
    }

    #[test]
    fn test_snapshot_serializes() {
        let snapshot = PriceSnapshot {
            token: "SOL".to_string(),
            price: 101.5,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: PriceSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.token, "SOL");
        assert_eq!(back.price, 101.5);
    }

    #[test]
    fn test_signal_display() {
        assert_eq!(Signal::Buy.to_string(), "BUY");
        assert_eq!(Signal::Hold.to_string(), "HOLD");
    }
}
