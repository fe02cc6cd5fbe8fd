// crates/spool-abi/src/model.rs
//
// The model collaborator contract. Backends implement these three traits;
// the engine drives them and owns all position/budget bookkeeping.

use serde::{Deserialize, Serialize};

use crate::batch::Batch;
use crate::error::Result;
use crate::token::Token;

/// Construction parameters for a model session, mirroring the knobs the
/// engine actually sets: total positions the cache must hold and the
/// largest batch that will ever be submitted (the prompt length, so the
/// prefill fits in one call).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SessionParams {
    pub n_ctx: usize,
    pub n_batch: usize,
}

/// Text ↔ token mapping plus the special-token predicates the loop needs.
pub trait Vocabulary {
    /// Tokenize `text`. `add_bos` prepends the begin-of-sequence token;
    /// `parse_special` lets special-token text in the prompt through.
    fn tokenize(&self, text: &str, add_bos: bool, parse_special: bool) -> Result<Vec<Token>>;

    /// UTF-8 fragment for one token id, for incremental output.
    fn token_to_piece(&self, token: Token) -> Result<String>;

    /// True when `token` signals the model considers output complete.
    fn is_eog(&self, token: Token) -> bool;

    /// Begin-of-sequence token (encoder-decoder decoder-start fallback).
    fn bos(&self) -> Token;

    fn n_vocab(&self) -> usize;
}

/// A loaded model. Immutable once loaded; all mutable state lives in the
/// sessions it opens, so one model may back several independent sessions.
pub trait LanguageModel {
    fn vocab(&self) -> &dyn Vocabulary;

    /// True for encoder-decoder topologies that need a separate encode
    /// pass over the prompt before autoregressive decoding.
    fn has_encoder(&self) -> bool;

    /// Designated decoder-start token, when the model defines one.
    /// `None` means the caller falls back to `vocab().bos()`.
    fn decoder_start_token(&self) -> Option<Token>;

    /// Allocate recurrent state (KV cache) sized to `params`. Fails with
    /// `EngineError::ContextCreate` when the cache cannot be allocated.
    fn new_session(&self, params: SessionParams) -> Result<Box<dyn ModelSession + '_>>;
}

/// Opaque per-request compute state. Calls block for the duration of one
/// batch and are not reentrant: never submit a second batch while one is
/// outstanding on the same session.
pub trait ModelSession {
    /// Encoder pass over a batch. Valid only when the owning model
    /// reports `has_encoder()`.
    fn encode(&mut self, batch: &Batch) -> Result<()>;

    /// Advance the recurrent state by `batch.len()` positions.
    fn decode(&mut self, batch: &Batch) -> Result<()>;

    /// Scores over the vocabulary for the *last* position of the most
    /// recently decoded batch. Intermediate positions are not retained.
    fn last_logits(&self) -> &[f32];
}
