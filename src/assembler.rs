//! The whole pipeline: words, pass 1, pass 2, image.

use tracing::debug;

use crate::config::AsmConfig;
use crate::encoder::{encode_program, EncodedWord};
use crate::error::Result;
use crate::image::RomImage;
use crate::lexer::Tokenizer;
use crate::symbols::{collect_labels, SymbolTable};

#[derive(Debug, Clone)]
pub struct Assembly {
    pub image: RomImage,
    pub symbols: SymbolTable,
    pub words: Vec<EncodedWord>,
}

/// Upper-cases the source; the tokenizer only knows upper-case words.
pub fn normalize(src: &str) -> String {
    src.to_ascii_uppercase()
}

/// Assembles already-normalized text. Stops at the first error; no image is
/// built unless both passes succeed.
pub fn assemble(src: &str, cfg: &AsmConfig) -> Result<Assembly> {
    let tok = Tokenizer::new(src);

    let symbols = collect_labels(tok.words(), cfg)?;
    let words = encode_program(tok.words(), &symbols)?;
    debug!(instructions = words.len(), "pass 2 done");

    let mut image = RomImage::new(cfg.rom_size);
    for w in &words {
        image
            .write_word(w.address, w.word)
            .map_err(|k| k.at(w.line))?;
    }

    Ok(Assembly {
        image,
        symbols,
        words,
    })
}

pub fn assemble_source(src: &str, cfg: &AsmConfig) -> Result<Assembly> {
    assemble(&normalize(src), cfg)
}
