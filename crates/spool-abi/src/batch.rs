// crates/spool-abi/src/batch.rs
//
// Batch = tokens + the sequence position of the first one. A pure value:
// construction never validates capacity (that pre-flight belongs to the
// execution context, which knows n_pos and n_ctx).

use crate::token::Token;

/// One unit of work submitted to a model session. The loop produces three
/// shapes: the whole-prompt prefill, the one-token decoder-start batch for
/// encoder-decoder models, and the steady-state one-token step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    tokens: Vec<Token>,
    pos: i32,
}

impl Batch {
    /// Whole-prompt batch anchored at position 0.
    pub fn prefill(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// One-token batch at an explicit position (decoder-start or step).
    pub fn single(token: Token, pos: i32) -> Self {
        Self {
            tokens: vec![token],
            pos,
        }
    }

    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Sequence position of the first token in this batch.
    #[inline]
    pub fn pos(&self) -> i32 {
        self.pos
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Positions covered by this batch, in token order.
    pub fn positions(&self) -> impl Iterator<Item = i32> + '_ {
        (0..self.tokens.len() as i32).map(move |i| self.pos + i)
    }
}
