use thiserror::Error;

/// Fatal error kinds for one generation request. There is no retry
/// anywhere in the engine: whatever phase fails aborts the request and
/// the error is surfaced to the caller after ordered teardown.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("model load failed: {0}")]
    ModelLoad(String),

    #[error("context create failed: {0}")]
    ContextCreate(String),

    #[error("tokenize failed: {0}")]
    Tokenize(String),

    #[error("encode failed: {0}")]
    Encode(String),

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("detokenize failed: {0}")]
    Detokenize(String),

    #[error("sampler invariant violated: {0}")]
    SamplerInvariant(String),
}

impl EngineError {
    /// Short name of the failing phase, for diagnostics.
    pub fn phase(&self) -> &'static str {
        match self {
            EngineError::ModelLoad(_) => "load",
            EngineError::ContextCreate(_) => "context",
            EngineError::Tokenize(_) => "tokenize",
            EngineError::Encode(_) => "encode",
            EngineError::Decode(_) => "decode",
            EngineError::Detokenize(_) => "detokenize",
            EngineError::SamplerInvariant(_) => "sampler",
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failing_phase() {
        let e = EngineError::Decode("kv cache exhausted".into());
        assert_eq!(e.phase(), "decode");
        assert_eq!(e.to_string(), "decode failed: kv cache exhausted");
    }
}
