// crates/spool-cli/src/backend/mod.rs
//
// Backend selection. One compiled-in backend today (llama.cpp via the
// published bindings, behind the `llama` feature); a plain build reports
// the absence at load time instead of failing to compile.

use std::path::Path;

use spool_abi::{EngineError, LanguageModel};

#[cfg(feature = "llama")]
pub mod llama;

#[cfg(feature = "llama")]
pub fn load_model(path: &Path, n_gpu_layers: u32) -> Result<Box<dyn LanguageModel>, EngineError> {
    Ok(Box::new(llama::LlamaLanguageModel::load(
        path,
        n_gpu_layers,
    )?))
}

#[cfg(not(feature = "llama"))]
pub fn load_model(path: &Path, _n_gpu_layers: u32) -> Result<Box<dyn LanguageModel>, EngineError> {
    Err(EngineError::ModelLoad(format!(
        "no model backend compiled in; rebuild with `--features llama` to load {}",
        path.display()
    )))
}
