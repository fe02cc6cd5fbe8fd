// crates/spool-core/src/context.rs
//
// Execution context = {backend session} + {fixed capacity} + {position
// cursor}. All capacity pre-flight happens here, before any model call;
// the session itself is trusted to be dumb about positions.

use spool_abi::{Batch, EngineError, ModelSession, Result};

/// Wraps a model session for the duration of one generation request.
///
/// Invariant: `n_pos + batch.len() <= capacity` holds before every
/// `decode` submission, or the model's finite context would be violated.
/// A batch that would overflow is rejected without touching the session.
pub struct ExecutionContext<'m> {
    session: Box<dyn ModelSession + 'm>,
    capacity: usize,
    n_batch: usize,
    n_pos: i32,
}

impl<'m> ExecutionContext<'m> {
    pub fn new(session: Box<dyn ModelSession + 'm>, capacity: usize, n_batch: usize) -> Self {
        Self {
            session,
            capacity,
            n_batch,
            n_pos: 0,
        }
    }

    /// Positions consumed so far.
    #[inline]
    pub fn n_pos(&self) -> i32 {
        self.n_pos
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Encoder pass. Does not consume decoder positions; only the batch
    /// size itself is checked against the session's batch limit.
    pub fn encode(&mut self, batch: &Batch) -> Result<()> {
        if batch.len() > self.n_batch {
            return Err(EngineError::Encode(format!(
                "batch of {} tokens exceeds n_batch {}",
                batch.len(),
                self.n_batch
            )));
        }
        self.session.encode(batch)
    }

    /// Submit a batch and advance the position cursor by its size.
    pub fn decode(&mut self, batch: &Batch) -> Result<()> {
        let end = self.n_pos as usize + batch.len();
        if end > self.capacity {
            return Err(EngineError::Decode(format!(
                "batch of {} tokens at position {} exceeds context capacity {}",
                batch.len(),
                self.n_pos,
                self.capacity
            )));
        }
        if batch.len() > self.n_batch {
            return Err(EngineError::Decode(format!(
                "batch of {} tokens exceeds n_batch {}",
                batch.len(),
                self.n_batch
            )));
        }
        self.session.decode(batch)?;
        self.n_pos = end as i32;
        Ok(())
    }

    /// Scores for the last position of the most recent batch.
    #[inline]
    pub fn last_logits(&self) -> &[f32] {
        self.session.last_logits()
    }
}
