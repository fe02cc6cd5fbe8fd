// crates/spool-core/src/sampling.rs
//
// Sampler chain: an ordered list of stages over a candidate list, then a
// fixed terminal arg-max. Stages mutate candidates (scale, truncate);
// selection itself never moves out of the chain, so the loop's contract
// stays "one token per call".

use spool_abi::{EngineError, Result, Token};

/// One vocabulary entry still in the running, with its current score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub token: Token,
    pub score: f32,
}

/// A single transformation over the candidate list.
pub trait SamplerStage {
    fn apply(&mut self, candidates: &mut Vec<Candidate>);
}

/// Keep only the best-scoring candidate (ties: lowest token id).
pub struct Greedy;

impl SamplerStage for Greedy {
    fn apply(&mut self, candidates: &mut Vec<Candidate>) {
        if let Some(best) = best_candidate(candidates) {
            *candidates = vec![best];
        }
    }
}

/// Scale scores by 1/t. Does not change the arg-max winner; kept for
/// composition ahead of future stochastic terminals.
pub struct Temperature(pub f32);

impl SamplerStage for Temperature {
    fn apply(&mut self, candidates: &mut Vec<Candidate>) {
        if self.0 <= 0.0 {
            return;
        }
        for c in candidates.iter_mut() {
            c.score /= self.0;
        }
    }
}

/// Keep the k best-scoring candidates (ties: lowest token id first).
pub struct TopK(pub usize);

impl SamplerStage for TopK {
    fn apply(&mut self, candidates: &mut Vec<Candidate>) {
        if self.0 == 0 || candidates.len() <= self.0 {
            return;
        }
        candidates.sort_unstable_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.token.0.cmp(&b.token.0))
        });
        candidates.truncate(self.0);
    }
}

/// Ordered pipeline of stages plus the terminal deterministic arg-max.
///
/// Never fails under valid input; an empty or all-non-finite distribution
/// is an internal invariant violation, not a recoverable condition.
pub struct SamplerChain {
    stages: Vec<Box<dyn SamplerStage>>,
}

impl SamplerChain {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// The chain the CLI runs: a single greedy stage, fully deterministic.
    pub fn greedy() -> Self {
        Self::new().with(Greedy)
    }

    pub fn with(mut self, stage: impl SamplerStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Reduce one logits vector to one token.
    pub fn sample(&mut self, logits: &[f32]) -> Result<Token> {
        if logits.is_empty() {
            return Err(EngineError::SamplerInvariant(
                "empty logits distribution".into(),
            ));
        }

        let mut candidates: Vec<Candidate> = logits
            .iter()
            .enumerate()
            .map(|(id, &score)| Candidate {
                token: Token(id as i32),
                score,
            })
            .collect();

        for stage in &mut self.stages {
            stage.apply(&mut candidates);
        }

        best_candidate(&candidates)
            .map(|c| c.token)
            .ok_or_else(|| {
                EngineError::SamplerInvariant("no finite candidate to select".into())
            })
    }
}

impl Default for SamplerChain {
    fn default() -> Self {
        Self::greedy()
    }
}

/// Arg-max with a fixed tie-break (lowest token id wins). Non-finite
/// scores are skipped so a stray NaN cannot poison the comparison.
fn best_candidate(candidates: &[Candidate]) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for c in candidates {
        if !c.score.is_finite() {
            continue;
        }
        best = match best {
            None => Some(*c),
            Some(b) if c.score > b.score => Some(*c),
            Some(b) if c.score == b.score && c.token.0 < b.token.0 => Some(*c),
            keep => keep,
        };
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greedy_picks_the_arg_max() {
        let mut chain = SamplerChain::greedy();
        assert_eq!(chain.sample(&[0.1, 0.9, 0.5]).unwrap(), Token(1));
    }

    #[test]
    fn ties_break_to_the_lowest_token_id() {
        let mut chain = SamplerChain::greedy();
        assert_eq!(chain.sample(&[0.5, 0.9, 0.9, 0.9]).unwrap(), Token(1));
    }

    #[test]
    fn empty_distribution_is_an_invariant_violation() {
        let mut chain = SamplerChain::greedy();
        let err = chain.sample(&[]).unwrap_err();
        assert!(matches!(err, EngineError::SamplerInvariant(_)));
    }

    #[test]
    fn nan_scores_are_skipped_not_selected() {
        let mut chain = SamplerChain::greedy();
        assert_eq!(chain.sample(&[f32::NAN, 0.2, 0.1]).unwrap(), Token(1));
        let err = chain.sample(&[f32::NAN, f32::NAN]).unwrap_err();
        assert!(matches!(err, EngineError::SamplerInvariant(_)));
    }

    #[test]
    fn temperature_does_not_change_the_winner() {
        let logits = [0.1, 2.0, 0.3];
        let mut plain = SamplerChain::greedy();
        let mut scaled = SamplerChain::new().with(Temperature(0.7)).with(Greedy);
        assert_eq!(
            plain.sample(&logits).unwrap(),
            scaled.sample(&logits).unwrap()
        );
    }

    #[test]
    fn top_k_truncates_before_selection() {
        // Without TopK the winner is token 3; keep the top-2 then drop
        // the best via a score-inverting stage to see truncation bite.
        struct Negate;
        impl SamplerStage for Negate {
            fn apply(&mut self, candidates: &mut Vec<Candidate>) {
                for c in candidates.iter_mut() {
                    c.score = -c.score;
                }
            }
        }
        let logits = [0.1, 0.4, 0.2, 0.9];
        let mut chain = SamplerChain::new().with(TopK(2)).with(Negate);
        // Top-2 keeps tokens 3 and 1; negation makes token 1 the arg-max.
        assert_eq!(chain.sample(&logits).unwrap(), Token(1));
    }

    #[test]
    fn determinism_same_logits_same_token() {
        let logits = [0.3, 0.31, 0.29, 0.31];
        let mut chain = SamplerChain::greedy();
        let first = chain.sample(&logits).unwrap();
        for _ in 0..16 {
            assert_eq!(chain.sample(&logits).unwrap(), first);
        }
    }
}
