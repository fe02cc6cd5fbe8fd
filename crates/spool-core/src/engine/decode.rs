use std::time::Instant;

use super::{GenerationReport, Generator, StopReason};
use crate::context::ExecutionContext;
use crate::stats::DecodeStats;
use spool_abi::{Batch, Result, Vocabulary};

impl<'m> Generator<'m> {
    /// Decode phase. `first` is either the whole-prompt prefill batch or,
    /// for encoder-decoder models, the one-token decoder-start batch.
    ///
    /// The budget counts *sampled* tokens: the loop stops once
    /// `max_new_tokens` have been emitted, so encoder-decoder runs get
    /// the same number of new tokens as decoder-only runs even though
    /// their position cursors differ.
    pub(super) fn run_decode(
        &mut self,
        vocab: &dyn Vocabulary,
        ctx: &mut ExecutionContext<'_>,
        first: Batch,
        n_prompt: usize,
        sink: &mut dyn FnMut(&str),
    ) -> Result<GenerationReport> {
        let max_new = self.params.max_new_tokens;
        let mut n_decoded = 0usize;

        // Prefill submission; everything after this line is the timed
        // decode phase.
        ctx.decode(&first)?;
        let t_decode = Instant::now();

        let stop = if max_new == 0 {
            StopReason::Budget
        } else {
            loop {
                let token = self.chain.sample(ctx.last_logits())?;

                if vocab.is_eog(token) {
                    break StopReason::EndOfGeneration;
                }

                sink(&vocab.token_to_piece(token)?);
                n_decoded += 1;

                if n_decoded == max_new {
                    break StopReason::Budget;
                }

                // Fresh one-token batch at the current cursor.
                let step = Batch::single(token, ctx.n_pos());
                ctx.decode(&step)?;
            }
        };

        Ok(GenerationReport {
            n_prompt,
            n_decoded,
            stop,
            stats: DecodeStats::new(n_decoded, t_decode.elapsed()),
        })
    }
}
