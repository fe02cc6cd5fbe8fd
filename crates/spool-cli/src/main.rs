// crates/spool-cli/src/main.rs
//
// spool: stream a bounded greedy continuation of a prompt to stdout.
// Diagnostics go to stderr; stdout carries only the prompt echo, the
// generated fragments and the final statistics block.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use spool_core::{GenerateParams, Generator, SamplerChain};

mod args;
mod backend;

fn main() -> ExitCode {
    let mut argv = std::env::args();
    let program = argv.next().unwrap_or_else(|| "spool".into());

    let cli = match args::parse(argv) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("❌ [args] {e}");
            eprint!("{}", args::usage(&program));
            return ExitCode::FAILURE;
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &args::CliArgs) -> anyhow::Result<()> {
    eprintln!("📦 [load] model: {}", cli.model_path.display());
    eprintln!(
        "🧮 [load] n_predict = {}, n_gpu_layers = {}",
        cli.n_predict, cli.n_gpu_layers
    );

    let model = backend::load_model(&cli.model_path, cli.n_gpu_layers)
        .context("model load failed")?;

    let mut generator = Generator::new(
        model.as_ref(),
        SamplerChain::greedy(),
        GenerateParams {
            max_new_tokens: cli.n_predict,
        },
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut sink = |piece: &str| {
        // Output is a stream: flush per fragment, never retract.
        let _ = out.write_all(piece.as_bytes());
        let _ = out.flush();
    };

    let report = generator
        .run(&cli.prompt, &mut sink)
        .context("generation failed")?;

    writeln!(out, "\n")?;
    writeln!(out, "{}", report.stats)?;
    eprintln!("🏁 [done] stop = {:?}", report.stop);
    Ok(())
}
