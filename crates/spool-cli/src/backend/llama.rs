// crates/spool-cli/src/backend/llama.rs
//
// llama.cpp backend over the published `llama-cpp-2` bindings. The model
// is immutable once loaded; all mutable state lives in the session, which
// owns one reusable native batch sized to the prompt.

use std::num::NonZeroU32;
use std::path::Path;

use llama_cpp_2::context::params::LlamaContextParams;
use llama_cpp_2::context::LlamaContext;
use llama_cpp_2::llama_backend::LlamaBackend;
use llama_cpp_2::llama_batch::LlamaBatch;
use llama_cpp_2::model::params::LlamaModelParams;
use llama_cpp_2::model::{AddBos, LlamaModel, Special};
use llama_cpp_2::token::LlamaToken;

use spool_abi::{
    Batch, EngineError, LanguageModel, ModelSession, Result, SessionParams, Token, Vocabulary,
};

pub struct LlamaLanguageModel {
    backend: LlamaBackend,
    model: LlamaModel,
}

impl LlamaLanguageModel {
    pub fn load(path: &Path, n_gpu_layers: u32) -> Result<Self> {
        let backend =
            LlamaBackend::init().map_err(|e| EngineError::ModelLoad(e.to_string()))?;
        let params = LlamaModelParams::default().with_n_gpu_layers(n_gpu_layers);
        let model = LlamaModel::load_from_file(&backend, path, &params)
            .map_err(|e| EngineError::ModelLoad(e.to_string()))?;
        Ok(Self { backend, model })
    }
}

impl Vocabulary for LlamaLanguageModel {
    fn tokenize(&self, text: &str, add_bos: bool, _parse_special: bool) -> Result<Vec<Token>> {
        // The bindings parse special-token text unconditionally; the flag
        // is accepted for contract parity.
        let add = if add_bos { AddBos::Always } else { AddBos::Never };
        let tokens = self
            .model
            .str_to_token(text, add)
            .map_err(|e| EngineError::Tokenize(e.to_string()))?;
        Ok(tokens.into_iter().map(|t| Token(t.0)).collect())
    }

    fn token_to_piece(&self, token: Token) -> Result<String> {
        self.model
            .token_to_str(LlamaToken(token.0), Special::Tokenize)
            .map_err(|e| EngineError::Detokenize(e.to_string()))
    }

    fn is_eog(&self, token: Token) -> bool {
        self.model.is_eog_token(LlamaToken(token.0))
    }

    fn bos(&self) -> Token {
        Token(self.model.token_bos().0)
    }

    fn n_vocab(&self) -> usize {
        self.model.n_vocab() as usize
    }
}

impl LanguageModel for LlamaLanguageModel {
    fn vocab(&self) -> &dyn Vocabulary {
        self
    }

    fn has_encoder(&self) -> bool {
        // The bindings do not surface encoder-decoder topologies (T5 and
        // friends); this backend is decoder-only.
        false
    }

    fn decoder_start_token(&self) -> Option<Token> {
        None
    }

    fn new_session(&self, params: SessionParams) -> Result<Box<dyn ModelSession + '_>> {
        let n_batch = params.n_batch.max(1);
        let ctx_params = LlamaContextParams::default()
            .with_n_ctx(NonZeroU32::new(params.n_ctx.max(1) as u32))
            .with_n_batch(n_batch as u32);
        let ctx = self
            .model
            .new_context(&self.backend, ctx_params)
            .map_err(|e| EngineError::ContextCreate(e.to_string()))?;
        Ok(Box::new(LlamaModelSession {
            ctx,
            batch: LlamaBatch::new(n_batch, 1),
            last_idx: 0,
        }))
    }
}

struct LlamaModelSession<'m> {
    ctx: LlamaContext<'m>,
    batch: LlamaBatch,
    /// Batch index whose logits are valid after the last decode.
    last_idx: i32,
}

impl LlamaModelSession<'_> {
    fn fill_batch(&mut self, batch: &Batch) -> Result<()> {
        self.batch.clear();
        for (i, token) in batch.tokens().iter().enumerate() {
            let pos = batch.pos() + i as i32;
            let want_logits = i + 1 == batch.len();
            self.batch
                .add(LlamaToken(token.0), pos, &[0], want_logits)
                .map_err(|e| EngineError::Decode(e.to_string()))?;
        }
        Ok(())
    }
}

impl ModelSession for LlamaModelSession<'_> {
    fn encode(&mut self, _batch: &Batch) -> Result<()> {
        Err(EngineError::Encode(
            "encoder-decoder models are not supported by the llama backend".into(),
        ))
    }

    fn decode(&mut self, batch: &Batch) -> Result<()> {
        self.fill_batch(batch)?;
        self.ctx
            .decode(&mut self.batch)
            .map_err(|e| EngineError::Decode(e.to_string()))?;
        self.last_idx = self.batch.n_tokens() - 1;
        Ok(())
    }

    fn last_logits(&self) -> &[f32] {
        self.ctx.get_logits_ith(self.last_idx)
    }
}
