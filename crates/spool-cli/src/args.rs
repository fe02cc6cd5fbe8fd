// crates/spool-cli/src/args.rs
//
// Hand-rolled argument parsing. `-ngl` is a multi-character short flag,
// which rules out the usual derive-style parsers; the grammar is small
// enough that a single pass over argv stays the clearest option.

use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_PROMPT: &str = "Hello, my name is";
pub const DEFAULT_N_PREDICT: usize = 128;
pub const DEFAULT_N_GPU_LAYERS: u32 = 99;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgError {
    #[error("missing value for {0}")]
    MissingValue(&'static str),

    #[error("invalid number for {0}: {1:?}")]
    InvalidNumber(&'static str, String),

    #[error("model path is required (-m <path>)")]
    MissingModel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub model_path: PathBuf,
    /// Max new tokens to generate (`-n`).
    pub n_predict: usize,
    /// Compute-offload hint, forwarded opaquely to the backend (`-ngl`).
    pub n_gpu_layers: u32,
    /// Trailing words joined by single spaces.
    pub prompt: String,
}

/// Parse argv (without the program name). Flags may appear in any order;
/// the first non-flag argument starts the prompt and swallows the rest.
pub fn parse<I>(args: I) -> Result<CliArgs, ArgError>
where
    I: IntoIterator<Item = String>,
{
    let mut model_path: Option<PathBuf> = None;
    let mut n_predict = DEFAULT_N_PREDICT;
    let mut n_gpu_layers = DEFAULT_N_GPU_LAYERS;
    let mut prompt_words: Vec<String> = Vec::new();

    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-m" => {
                let v = it.next().ok_or(ArgError::MissingValue("-m"))?;
                model_path = Some(PathBuf::from(v));
            }
            "-n" => {
                let v = it.next().ok_or(ArgError::MissingValue("-n"))?;
                n_predict = v
                    .parse()
                    .map_err(|_| ArgError::InvalidNumber("-n", v))?;
            }
            "-ngl" => {
                let v = it.next().ok_or(ArgError::MissingValue("-ngl"))?;
                n_gpu_layers = v
                    .parse()
                    .map_err(|_| ArgError::InvalidNumber("-ngl", v))?;
            }
            _ => {
                // Prompt starts here; everything that follows is prompt.
                prompt_words.push(arg);
                prompt_words.extend(it);
                break;
            }
        }
    }

    let model_path = model_path.ok_or(ArgError::MissingModel)?;
    let prompt = if prompt_words.is_empty() {
        DEFAULT_PROMPT.to_string()
    } else {
        prompt_words.join(" ")
    };

    Ok(CliArgs {
        model_path,
        n_predict,
        n_gpu_layers,
        prompt,
    })
}

pub fn usage(program: &str) -> String {
    format!(
        "\nUsage:\n    {program} -m <model.gguf> [-n tokens] [-ngl gpu_layers] [prompt]\n\n\
         Options:\n\
         \x20   -m <path>      Path to GGUF model file (required)\n\
         \x20   -n <number>    Number of tokens to generate (default: {DEFAULT_N_PREDICT})\n\
         \x20   -ngl <number>  Number of GPU layers to offload (default: {DEFAULT_N_GPU_LAYERS})\n\
         \x20   [prompt]       Text prompt (default: '{DEFAULT_PROMPT}')\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_apply_when_only_model_is_given() {
        let a = parse(argv(&["-m", "model.gguf"])).unwrap();
        assert_eq!(a.model_path, PathBuf::from("model.gguf"));
        assert_eq!(a.n_predict, DEFAULT_N_PREDICT);
        assert_eq!(a.n_gpu_layers, DEFAULT_N_GPU_LAYERS);
        assert_eq!(a.prompt, DEFAULT_PROMPT);
    }

    #[test]
    fn trailing_words_join_into_the_prompt() {
        let a = parse(argv(&["-m", "m.gguf", "-n", "50", "Tell", "me", "a", "story"])).unwrap();
        assert_eq!(a.n_predict, 50);
        assert_eq!(a.prompt, "Tell me a story");
    }

    #[test]
    fn prompt_swallows_later_flag_lookalikes() {
        let a = parse(argv(&["-m", "m.gguf", "say", "-n", "things"])).unwrap();
        assert_eq!(a.n_predict, DEFAULT_N_PREDICT);
        assert_eq!(a.prompt, "say -n things");
    }

    #[test]
    fn missing_model_is_an_error() {
        assert_eq!(parse(argv(&["-n", "5"])), Err(ArgError::MissingModel));
    }

    #[test]
    fn dangling_flag_values_are_errors() {
        assert_eq!(parse(argv(&["-m"])), Err(ArgError::MissingValue("-m")));
        assert_eq!(
            parse(argv(&["-m", "m.gguf", "-ngl"])),
            Err(ArgError::MissingValue("-ngl"))
        );
    }

    #[test]
    fn non_numeric_counts_are_rejected() {
        assert_eq!(
            parse(argv(&["-m", "m.gguf", "-n", "lots"])),
            Err(ArgError::InvalidNumber("-n", "lots".into()))
        );
    }

    #[test]
    fn ngl_parses_as_its_own_flag() {
        let a = parse(argv(&["-ngl", "0", "-m", "m.gguf"])).unwrap();
        assert_eq!(a.n_gpu_layers, 0);
    }
}
