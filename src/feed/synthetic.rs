use crate::error::FeedError;
use crate::models::{PriceSnapshot, Token};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Market scenario types for synthetic data generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MarketScenario {
    /// Steady uptrend with noise (+0.5% per sample)
    Uptrend,
    /// Steady downtrend with noise (-0.5% per sample)
    Downtrend,
    /// Sideways/choppy market (±1% around mean)
    Sideways,
    /// High volatility (±5% large swings)
    Volatile,
}

const BASE_PRICE: f64 = 150.0;

struct TokenState {
    token: Token,
    price: f64,
}

/// Seeded price generator for one or more tokens
///
/// Yields snapshots round-robin across tokens: sample 0 of every token,
/// then sample 1 of every token, and so on, `samples` times each.
pub struct SyntheticPriceGenerator {
    rng: StdRng,
    scenario: MarketScenario,
    tokens: Vec<TokenState>,
    samples: usize,
    interval_minutes: i64,
    start_time: DateTime<Utc>,
    step: usize,
    next_token: usize,
}

impl SyntheticPriceGenerator {
    /// Create a new generator with a seed for reproducibility
    ///
    /// # Arguments
    /// * `seed` - RNG seed
    /// * `scenario` - Market scenario to simulate
    /// * `tokens` - Tokens to generate prices for
    /// * `samples` - Samples per token
    /// * `interval_minutes` - Minutes between samples of the same token
    ///
    /// Fails when `samples * interval_minutes` cannot be represented as a
    /// timestamp offset.
    pub fn new(
        seed: u64,
        scenario: MarketScenario,
        tokens: Vec<Token>,
        samples: usize,
        interval_minutes: i64,
    ) -> Result<Self, FeedError> {
        let out_of_range = || FeedError::SpanOutOfRange {
            samples,
            interval_minutes,
        };
        let span = i64::try_from(samples)
            .ok()
            .and_then(|n| n.checked_mul(interval_minutes))
            .and_then(Duration::try_minutes)
            .ok_or_else(out_of_range)?;
        let start_time = Utc::now().checked_sub_signed(span).ok_or_else(out_of_range)?;

        let tokens = tokens
            .into_iter()
            .enumerate()
            .map(|(i, token)| TokenState {
                token,
                // Spread base prices so tokens are distinguishable
                price: BASE_PRICE * (i + 1) as f64,
            })
            .collect();

        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            scenario,
            tokens,
            samples,
            interval_minutes,
            start_time,
            step: 0,
            next_token: 0,
        })
    }

    pub fn scenario(&self) -> MarketScenario {
        self.scenario
    }

    /// Generate a single price series without timestamps
    pub fn series(
        seed: u64,
        scenario: MarketScenario,
        samples: usize,
    ) -> Result<Vec<f64>, FeedError> {
        Self::new(seed, scenario, vec![Token::new("SYNTH")], samples, 5)?
            .map(|s| s.map(|s| s.price))
            .collect()
    }

    fn next_price(&mut self, current: f64, mean: f64) -> f64 {
        match self.scenario {
            MarketScenario::Uptrend => {
                let drift = current * 0.005;
                let noise = current * self.rng.gen_range(-0.001..0.001); // ±0.1% noise
                current + drift + noise
            }
            MarketScenario::Downtrend => {
                let drift = current * -0.005;
                let noise = current * self.rng.gen_range(-0.001..0.001);
                current + drift + noise
            }
            MarketScenario::Sideways => {
                let reversion = (mean - current) * 0.1; // 10% pull to mean
                let noise = current * self.rng.gen_range(-0.01..0.01); // ±1% noise
                current + reversion + noise
            }
            MarketScenario::Volatile => {
                let change = current * self.rng.gen_range(-0.05..0.05); // ±5% per sample

                // Prevent price from going too low
                (current + change).max(mean * 0.5)
            }
        }
    }
}

impl Iterator for SyntheticPriceGenerator {
    type Item = Result<PriceSnapshot, FeedError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.tokens.is_empty() || self.step >= self.samples {
            return None;
        }

        let idx = self.next_token;
        let mean = BASE_PRICE * (idx + 1) as f64;
        let current = self.tokens[idx].price;
        let price = self.next_price(current, mean);
        self.tokens[idx].price = price;

        let snapshot = PriceSnapshot {
            token: self.tokens[idx].token.symbol.clone(),
            price,
            // Within the span checked in `new`, so this cannot overflow
            timestamp: self.start_time
                + Duration::minutes(self.interval_minutes * self.step as i64),
        };

        self.next_token += 1;
        if self.next_token == self.tokens.len() {
            self.next_token = 0;
            self.step += 1;
        }

        Some(Ok(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_uptrend() {
        let prices = SyntheticPriceGenerator::series(42, MarketScenario::Uptrend, 500).unwrap();
        assert_eq!(prices.len(), 500);

        let first_price = prices[0];
        let last_price = prices[499];
        assert!(
            last_price > first_price,
            "Uptrend should end higher: {} -> {}",
            first_price,
            last_price
        );
    }

    #[test]
    fn test_generate_downtrend() {
        let prices = SyntheticPriceGenerator::series(42, MarketScenario::Downtrend, 100).unwrap();
        assert_eq!(prices.len(), 100);
        assert!(prices[99] < prices[0]);
    }

    #[test]
    fn test_generate_sideways() {
        let prices = SyntheticPriceGenerator::series(42, MarketScenario::Sideways, 500).unwrap();

        // Should stay roughly around base price (±10%)
        for price in &prices {
            assert!(
                *price > BASE_PRICE * 0.9 && *price < BASE_PRICE * 1.1,
                "Sideways should stay near base: {} vs {}",
                price,
                BASE_PRICE
            );
        }
    }

    #[test]
    fn test_volatile_has_floor() {
        let prices = SyntheticPriceGenerator::series(7, MarketScenario::Volatile, 1000).unwrap();
        assert!(prices.iter().all(|p| *p >= BASE_PRICE * 0.5));
    }

    #[test]
    fn test_same_seed_same_series() {
        let a = SyntheticPriceGenerator::series(9, MarketScenario::Volatile, 50).unwrap();
        let b = SyntheticPriceGenerator::series(9, MarketScenario::Volatile, 50).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_round_robin_tokens() {
        let tokens = vec![Token::new("SOL"), Token::new("JUP")];
        let snapshots: Vec<PriceSnapshot> =
            SyntheticPriceGenerator::new(1, MarketScenario::Uptrend, tokens, 3, 5)
                .unwrap()
                .map(|s| s.unwrap())
                .collect();

        assert_eq!(snapshots.len(), 6);
        let order: Vec<&str> = snapshots.iter().map(|s| s.token.as_str()).collect();
        assert_eq!(order, vec!["SOL", "JUP", "SOL", "JUP", "SOL", "JUP"]);
    }

    #[test]
    fn test_timestamps_are_sequential_per_token() {
        let snapshots: Vec<PriceSnapshot> = SyntheticPriceGenerator::new(
            42,
            MarketScenario::Uptrend,
            vec![Token::new("SOL")],
            100,
            5,
        )
        .unwrap()
        .map(|s| s.unwrap())
        .collect();

        for pair in snapshots.windows(2) {
            assert_eq!((pair[1].timestamp - pair[0].timestamp).num_minutes(), 5);
        }
    }

    #[test]
    fn test_no_tokens_yields_nothing() {
        let mut generator =
            SyntheticPriceGenerator::new(1, MarketScenario::Uptrend, vec![], 10, 5).unwrap();
        assert!(generator.next().is_none());
    }

    #[test]
    fn test_rejects_span_past_time_range() {
        let result = SyntheticPriceGenerator::new(
            1,
            MarketScenario::Uptrend,
            vec![Token::new("SOL")],
            100_000_000_000_000,
            5,
        );
        assert!(matches!(
            result,
            Err(FeedError::SpanOutOfRange {
                samples: 100_000_000_000_000,
                interval_minutes: 5
            })
        ));

        // Overflows the multiplication itself
        let result = SyntheticPriceGenerator::new(
            1,
            MarketScenario::Uptrend,
            vec![Token::new("SOL")],
            usize::MAX / 2,
            i64::MAX,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_last_timestamp_is_near_now() {
        let snapshots: Vec<PriceSnapshot> = SyntheticPriceGenerator::new(
            3,
            MarketScenario::Sideways,
            vec![Token::new("SOL")],
            10,
            5,
        )
        .unwrap()
        .map(|s| s.unwrap())
        .collect();

        let last = snapshots.last().unwrap().timestamp;
        assert!((Utc::now() - last).num_minutes() <= 6);
    }
}
