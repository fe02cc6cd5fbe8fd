//! Generation loop: Init → Prefill → (Encode →) Decode ⇄ Decode → stop.
//!
//! One [`Generator`] drives one request. It owns the sampler chain,
//! opens the execution context sized to `prompt + max_new_tokens`, and
//! streams text fragments through the caller's sink. Teardown is scoped:
//! chain and context drop on every exit path, success or error, in
//! reverse acquisition order.

use serde::{Deserialize, Serialize};

use crate::context::ExecutionContext;
use crate::sampling::SamplerChain;
use crate::stats::DecodeStats;
use spool_abi::{Batch, LanguageModel, Result, SessionParams};

// The decode loop lives in a child module as `impl Generator` with
// pub(super) methods called below.
mod decode;

/// Why a request stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The sampler produced an end-of-generation token. The token itself
    /// is neither emitted nor counted.
    EndOfGeneration,
    /// `max_new_tokens` were sampled before any end-of-generation token.
    Budget,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerateParams {
    pub max_new_tokens: usize,
}

impl Default for GenerateParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 128,
        }
    }
}

/// Outcome of one completed request. Emitted text is a stream and is
/// never retracted; the report only summarizes it.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GenerationReport {
    pub n_prompt: usize,
    pub n_decoded: usize,
    pub stop: StopReason,
    pub stats: DecodeStats,
}

/// Engine = {model handle} + {sampler chain} + {token budget}.
/// One `Generator` is one logical request; it holds no state between runs
/// beyond the chain itself.
pub struct Generator<'m> {
    model: &'m dyn LanguageModel,
    chain: SamplerChain,
    params: GenerateParams,
}

impl<'m> Generator<'m> {
    pub fn new(model: &'m dyn LanguageModel, chain: SamplerChain, params: GenerateParams) -> Self {
        Self {
            model,
            chain,
            params,
        }
    }

    /// Run one request. Prompt fragments are echoed to `sink` before any
    /// model call; generated fragments follow one per sampled token.
    pub fn run(&mut self, prompt: &str, sink: &mut dyn FnMut(&str)) -> Result<GenerationReport> {
        let vocab = self.model.vocab();

        // Init: tokenize, size the context, open the session.
        let prompt_tokens = vocab.tokenize(prompt, true, true)?;
        let n_prompt = prompt_tokens.len();
        let capacity = n_prompt + self.params.max_new_tokens;
        let n_batch = n_prompt.max(1);

        let session = self.model.new_session(SessionParams {
            n_ctx: capacity,
            n_batch,
        })?;
        let mut ctx = ExecutionContext::new(session, capacity, n_batch);

        // Prefill echo: observable side effect with no compute dependency.
        for token in &prompt_tokens {
            sink(&vocab.token_to_piece(*token)?);
        }

        // Encoder-decoder models take the prompt through `encode`; the
        // first decode input is then a fresh one-token decoder-start
        // batch. Decoder-only models feed the prefill batch to `decode`.
        let prefill = Batch::prefill(prompt_tokens);
        let first = if self.model.has_encoder() {
            ctx.encode(&prefill)?;
            let start = self
                .model
                .decoder_start_token()
                .unwrap_or_else(|| vocab.bos());
            Batch::single(start, ctx.n_pos())
        } else {
            prefill
        };

        self.run_decode(vocab, &mut ctx, first, n_prompt, sink)
    }
}
