use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use r16_asm::{AsmConfig, ROM_SIZE};

use r16_disasm::{analyze_entries, labels_from_source, listing, load_hex_image, EdgeKind, Line};

#[derive(Parser, Debug)]
#[command(author, version, about = "R16 ROM image disassembler", long_about=None)]
struct Cli {
    /// Hex ROM image (one 4-digit word per line)
    #[arg(value_name = "HEXFILE")]
    input: PathBuf,
    /// Image size in bytes
    #[arg(long, default_value_t = ROM_SIZE)]
    rom_size: usize,
    /// Assembly source the image was built from; its labels annotate the output
    #[arg(long, value_name = "ASM")]
    source: Option<PathBuf>,
    /// Output format: text or json
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write output to file instead of stdout
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Disassemble a range [start, end) in bytes
    Range {
        /// Start address (hex or dec)
        #[arg(default_value = "0")]
        start: String,
        /// End address (hex or dec, exclusive; default: end of image)
        end: Option<String>,
        /// Show the raw word next to each instruction
        #[arg(long)]
        show_bytes: bool,
        /// Leave out all-zero words
        #[arg(long)]
        skip_zero: bool,
    },
    /// Follow pc-relative control flow from entry points
    Analyze {
        /// Entry addresses (hex or dec). Repeat flag to add multiple entries.
        #[arg(long = "entry", value_name = "ADDR", num_args = 1..)]
        entries: Vec<String>,
        /// Maximum instructions to visit before stopping
        #[arg(long, default_value_t = 100_000usize)]
        max_instr: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat { Text, Json }

fn parse_u32(s: &str) -> Result<u32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(u32::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse::<u32>()?)
    }
}

fn render_lines(lines: &[Line], show_bytes: bool) -> String {
    let mut buf = String::new();
    for l in lines {
        if let Some(lbl) = &l.label {
            let _ = writeln!(buf, "{lbl}:");
        }
        if show_bytes {
            let _ = writeln!(buf, "  {:#06x}: {:04X}   {}", l.addr, l.word, l.text);
        } else {
            let _ = writeln!(buf, "  {:#06x}: {}", l.addr, l.text);
        }
    }
    buf
}

fn emit(out: Option<&Path>, text: String) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, text)?,
        None => print!("{text}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let img = load_hex_image(&cli.input, cli.rom_size)?;
    let labels: BTreeMap<u32, String> = match &cli.source {
        Some(path) => labels_from_source(path, &AsmConfig::with_rom_size(cli.rom_size))?,
        None => BTreeMap::new(),
    };

    match cli.cmd {
        Command::Range { start, end, show_bytes, skip_zero } => {
            let start = parse_u32(&start)?;
            let end = match end {
                Some(e) => parse_u32(&e)?,
                None => img.capacity() as u32,
            };
            anyhow::ensure!(end >= start, "end must be >= start");
            let lines = listing(&img, start, end, skip_zero, &labels);
            let text = match cli.format {
                OutputFormat::Json => serde_json::to_string_pretty(&lines)? + "\n",
                OutputFormat::Text => render_lines(&lines, show_bytes),
            };
            emit(cli.out.as_deref(), text)?;
        }
        Command::Analyze { entries, max_instr } => {
            let mut seeds = Vec::new();
            for e in &entries { seeds.push(parse_u32(e)?); }
            if seeds.is_empty() { seeds.push(0); }
            seeds.sort_unstable();
            seeds.dedup();
            let a = analyze_entries(&img, &seeds, max_instr);

            let text = match cli.format {
                OutputFormat::Json => serde_json::to_string_pretty(&a)? + "\n",
                OutputFormat::Text => {
                    let mut buf = String::new();
                    let _ = writeln!(buf, "Analysis summary:");
                    let _ = writeln!(buf, "  entries  : {:?}", seeds.iter().map(|a| format!("{a:#06x}")).collect::<Vec<_>>());
                    let _ = writeln!(buf, "  insts    : {}", a.visited.len());
                    let _ = writeln!(buf, "  edges    : {}", a.edges.len());
                    let _ = writeln!(buf, "  indirect : {}", a.indirect.len());
                    let _ = writeln!(buf, "  returns  : {}", a.returns.len());
                    let _ = writeln!(buf, "Edges:");
                    for e in &a.edges {
                        let kind = match e.kind { EdgeKind::Fallthrough => "ft", EdgeKind::Branch => "br", EdgeKind::CondBranch => "cbr", EdgeKind::Call => "call" };
                        let name = labels.get(&e.to).map(|n| format!(" <{n}>")).unwrap_or_default();
                        let _ = writeln!(buf, "  {:#06x} -> {:#06x}{name} ({kind})", e.from, e.to);
                    }
                    let rows: Vec<Line> = listing(&img, 0, img.capacity() as u32, false, &labels)
                        .into_iter()
                        .filter(|l| a.visited.contains(&l.addr))
                        .collect();
                    let _ = writeln!(buf, "\nListing (reachable words):");
                    buf.push_str(&render_lines(&rows, false));
                    buf
                }
            };
            emit(cli.out.as_deref(), text)?;
        }
    }

    Ok(())
}
