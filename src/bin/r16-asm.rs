use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use r16_asm::{assemble_source, AsmConfig};

#[derive(Parser, Debug)]
#[command(
    about = "Assemble R16 source into a hex ROM image",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Opts {
    /// Assembly source (case-insensitive, `;` comments)
    #[arg(value_name = "INPUT")]
    input: PathBuf,
    /// Output text file, one 4-digit hex word per line
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
}

fn run(opts: &Opts) -> Result<()> {
    let src = std::fs::read_to_string(&opts.input)
        .with_context(|| format!("reading {}", opts.input.display()))?;

    let asm = assemble_source(&src, &AsmConfig::default())?;
    tracing::info!(
        instructions = asm.words.len(),
        labels = asm.symbols.len(),
        "assembled {}",
        opts.input.display()
    );

    std::fs::write(&opts.output, asm.image.to_hex_text())
        .with_context(|| format!("writing {}", opts.output.display()))?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // anything but exactly two paths, flags included, is a usage error
    let opts = match Opts::try_parse() {
        Ok(opts) => opts,
        Err(_) => {
            println!("usage: r16-asm input_file output_file");
            return ExitCode::from(1);
        }
    };

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{e:#}");
            ExitCode::from(1)
        }
    }
}
