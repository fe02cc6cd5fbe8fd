// crates/spool-core/src/stats.rs
//
// Decode-phase counters. Measured over the decode loop only: the timer
// starts after the prefill submission returns, so model load, tokenize
// and prompt ingestion never inflate the tokens/s figure.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DecodeStats {
    /// Tokens successfully sampled and emitted (prompt and any terminal
    /// end-of-generation token excluded).
    pub n_decoded: usize,
    /// Wall time spent in the decode loop.
    pub elapsed: Duration,
}

impl DecodeStats {
    pub fn new(n_decoded: usize, elapsed: Duration) -> Self {
        Self { n_decoded, elapsed }
    }

    pub fn tokens_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.n_decoded as f64 / secs
    }
}

impl fmt::Display for DecodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "tokens generated: {}", self.n_decoded)?;
        writeln!(f, "decode time:      {:.2} s", self.elapsed.as_secs_f64())?;
        write!(f, "speed:            {:.2} tokens/s", self.tokens_per_sec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_is_tokens_over_elapsed() {
        let s = DecodeStats::new(10, Duration::from_secs(2));
        assert!((s.tokens_per_sec() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn zero_elapsed_reports_zero_speed() {
        let s = DecodeStats::new(3, Duration::ZERO);
        assert_eq!(s.tokens_per_sec(), 0.0);
    }

    #[test]
    fn display_is_the_three_line_block() {
        let s = DecodeStats::new(4, Duration::from_millis(500));
        let text = s.to_string();
        assert!(text.contains("tokens generated: 4"));
        assert!(text.contains("0.50 s"));
        assert!(text.contains("8.00 tokens/s"));
    }
}
