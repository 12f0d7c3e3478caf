use crate::error::FeedError;
use crate::models::PriceSnapshot;
use chrono::{DateTime, Utc};
use std::io::{BufRead, Lines};

/// Replays price samples from text lines
///
/// Accepted line formats:
/// - `price` (uses the default token)
/// - `symbol,price`
/// - `symbol,price,rfc3339-timestamp`
///
/// Blank lines and lines starting with `#` are skipped. Samples without a
/// timestamp are stamped with the time they were read.
pub struct ReplaySource<R> {
    lines: Lines<R>,
    line_no: usize,
    default_token: String,
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(reader: R, default_token: &str) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
            default_token: default_token.to_string(),
        }
    }

    fn parse_line(&self, line: &str) -> Result<PriceSnapshot, FeedError> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        let (token, price_field, timestamp_field) = match fields.as_slice() {
            [price] => (self.default_token.as_str(), *price, None),
            [token, price] => (*token, *price, None),
            [token, price, ts] => (*token, *price, Some(*ts)),
            _ => {
                return Err(self.parse_error(format!(
                    "expected 1-3 comma separated fields, got {}",
                    fields.len()
                )))
            }
        };

        if token.is_empty() {
            return Err(self.parse_error("empty symbol".to_string()));
        }

        let price: f64 = price_field
            .parse()
            .map_err(|e| self.parse_error(format!("invalid price '{}': {}", price_field, e)))?;
        if !price.is_finite() {
            return Err(self.parse_error(format!("non-finite price '{}'", price_field)));
        }

        let timestamp = match timestamp_field {
            Some(ts) => DateTime::parse_from_rfc3339(ts)
                .map_err(|e| self.parse_error(format!("invalid timestamp '{}': {}", ts, e)))?
                .with_timezone(&Utc),
            None => Utc::now(),
        };

        Ok(PriceSnapshot {
            token: token.to_string(),
            price,
            timestamp,
        })
    }

    fn parse_error(&self, reason: String) -> FeedError {
        FeedError::Parse {
            line: self.line_no,
            reason,
        }
    }
}

impl<R: BufRead> Iterator for ReplaySource<R> {
    type Item = Result<PriceSnapshot, FeedError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(FeedError::Io(e))),
            };
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            return Some(self.parse_line(trimmed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn replay(input: &str) -> Vec<Result<PriceSnapshot, FeedError>> {
        ReplaySource::new(Cursor::new(input.to_string()), "SOL").collect()
    }

    #[test]
    fn test_price_only_uses_default_token() {
        let results = replay("100.5\n101\n");
        assert_eq!(results.len(), 2);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.token, "SOL");
        assert_eq!(first.price, 100.5);
    }

    #[test]
    fn test_symbol_and_timestamp() {
        let results = replay("JUP, 1.25, 2024-01-01T00:05:00Z\n");
        let snapshot = results[0].as_ref().unwrap();
        assert_eq!(snapshot.token, "JUP");
        assert_eq!(snapshot.price, 1.25);
        assert_eq!(snapshot.timestamp.to_rfc3339(), "2024-01-01T00:05:00+00:00");
    }

    #[test]
    fn test_skips_comments_and_blank_lines() {
        let results = replay("# header\n\nSOL,100\n   \nSOL,101\n");
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_ok()));
    }

    #[test]
    fn test_parse_error_reports_line_number() {
        let results = replay("SOL,100\n# note\nSOL,abc\n");
        assert_eq!(results.len(), 2);
        match &results[1] {
            Err(FeedError::Parse { line, reason }) => {
                assert_eq!(*line, 3);
                assert!(reason.contains("invalid price"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_shapes() {
        let results = replay("a,b,c,d\n,100\nSOL,NaN\nSOL,1,yesterday\n");
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.is_err()));
    }
}
