use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use r16_asm::decoder::Decoder;
use r16_asm::disasm::{branch_target, fmt_decoded};
use r16_asm::isa::r16::R16Decoder;
use r16_asm::{assemble_source, AsmConfig, RomImage};

pub fn load_hex_image(path: &Path, capacity: usize) -> Result<RomImage> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let img = RomImage::from_hex_text(&text, capacity)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(img)
}

/// Assembles the source an image came from, only to recover label names.
pub fn labels_from_source(path: &Path, cfg: &AsmConfig) -> Result<BTreeMap<u32, String>> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let asm = assemble_source(&src, cfg)?;
    let mut out = BTreeMap::new();
    for l in asm.symbols.iter() {
        out.entry(l.address).or_insert_with(|| l.name.clone());
    }
    Ok(out)
}

/// One listing row.
#[derive(Debug, Clone, Serialize)]
pub struct Line {
    pub addr: u32,
    pub word: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<u32>,
}

/// Decodes words in `[start, end)`. Zero words are dropped when `skip_zero`.
pub fn listing(
    img: &RomImage,
    start: u32,
    end: u32,
    skip_zero: bool,
    labels: &BTreeMap<u32, String>,
) -> Vec<Line> {
    let dec = R16Decoder::new();
    let mut out = Vec::new();
    for (addr, word) in img.words() {
        if addr < start || addr >= end || (skip_zero && word == 0) {
            continue;
        }
        let (text, target) = match dec.decode(word) {
            Some(d) => {
                let target = branch_target(&d, addr);
                let mut text = fmt_decoded(&d);
                if let Some(name) = target.and_then(|t| labels.get(&t)) {
                    text.push_str(&format!("    ; {name}"));
                }
                (text, target)
            }
            None => (format!(".word 0X{word:04X}"), None),
        };
        out.push(Line {
            addr,
            word,
            label: labels.get(&addr).cloned(),
            text,
            target,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_reads_hex_text() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("r16-disasm-{}.hex", std::process::id()));
        std::fs::write(&path, "0253\n8001\n0000\n0000\n").unwrap();
        let img = load_hex_image(&path, 8).unwrap();
        assert_eq!(img.read_word(0), Some(0x0253));
        assert_eq!(img.read_word(2), Some(0x8001));
        assert!(load_hex_image(&path, 16).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn listing_annotates_branch_targets() {
        let asm = assemble_source("top: add r1 r2 r3\nbrr top\n", &AsmConfig::with_rom_size(8)).unwrap();
        let mut labels = BTreeMap::new();
        labels.insert(0, "TOP".to_string());
        let lines = listing(&asm.image, 0, 8, true, &labels);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].label.as_deref(), Some("TOP"));
        assert_eq!(lines[0].text, "ADD R1 R2 R3");
        assert_eq!(lines[1].text, "BRR -1    ; TOP");
        assert_eq!(lines[1].target, Some(0));

        let all = listing(&asm.image, 0, 8, false, &labels);
        assert_eq!(all.len(), 4);
        assert_eq!(all[3].text, "NOP");
    }
}
