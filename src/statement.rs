//! Groups the word stream into statements. Both passes walk the same grammar:
//! an optional `NAME:`, then an `ORG n` directive or one mnemonic with its
//! operands, up to the newline.

use std::iter::Peekable;

use crate::error::{ErrorKind, Result};
use crate::instructions::{lookup, OpcodeSpec};
use crate::lexer::{Word, Words};
use crate::operand::parse_num;

pub const ORG: &str = "ORG";
const ORG_BITS: u32 = 16;

#[derive(Debug, Clone)]
pub enum Statement<'a> {
    /// `NAME:`; `name` has the colon stripped.
    Label { name: &'a str, line: u32 },
    Org {
        directive: Word<'a>,
        operand: Option<Word<'a>>,
    },
    Instruction {
        mnemonic: Word<'a>,
        spec: &'static OpcodeSpec,
        operands: Vec<Word<'a>>,
    },
    /// Neither label, directive nor mnemonic.
    Stray(Word<'a>),
}

pub struct Statements<'a> {
    words: Peekable<Words<'a>>,
}

impl<'a> Statements<'a> {
    pub fn new(words: Words<'a>) -> Self {
        Self {
            words: words.peekable(),
        }
    }

    fn rest_of_line(&mut self) -> Vec<Word<'a>> {
        let mut out = Vec::new();
        while let Some(w) = self.words.next_if(|w| !w.is_newline()) {
            out.push(w);
        }
        out
    }
}

impl<'a> Iterator for Statements<'a> {
    type Item = Statement<'a>;

    fn next(&mut self) -> Option<Statement<'a>> {
        loop {
            let word = self.words.next()?;
            if word.is_newline() {
                continue;
            }
            if word.text == ORG {
                let operand = self.words.next_if(|w| !w.is_newline());
                return Some(Statement::Org {
                    directive: word,
                    operand,
                });
            }
            if let Some(name) = word.text.strip_suffix(':') {
                return Some(Statement::Label {
                    name,
                    line: word.line,
                });
            }
            if let Some(spec) = lookup(word.text) {
                let operands = self.rest_of_line();
                return Some(Statement::Instruction {
                    mnemonic: word,
                    spec,
                    operands,
                });
            }
            return Some(Statement::Stray(word));
        }
    }
}

/// New emit address from an `ORG` operand: a 16-bit literal, word aligned.
pub fn org_address(directive: &Word<'_>, operand: Option<&Word<'_>>) -> Result<u32> {
    let operand = operand.ok_or_else(|| {
        ErrorKind::ArityMismatch {
            mnemonic: ORG.to_string(),
            expected: 1,
            found: 0,
        }
        .at(directive.line)
    })?;
    let addr = parse_num(operand.text, ORG_BITS).map_err(|k| k.at(operand.line))?;
    if addr % 2 != 0 {
        return Err(ErrorKind::MisalignedAddress { addr }.at(operand.line));
    }
    Ok(addr)
}
