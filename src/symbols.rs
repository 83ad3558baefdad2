//! First pass: label addresses.

use tracing::debug;

use crate::config::AsmConfig;
use crate::error::{ErrorKind, Result};
use crate::lexer::Words;
use crate::statement::{org_address, Statement, Statements};

pub const INSTR_BYTES: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub address: u32,
}

/// Labels in definition order. Filled once by [`collect_labels`], then only read.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    labels: Vec<Label>,
    name_bytes: usize,
}

impl SymbolTable {
    pub fn get(&self, name: &str) -> Option<u32> {
        self.labels
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.address)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }

    fn insert(&mut self, name: &str, address: u32, cfg: &AsmConfig) -> Result<(), ErrorKind> {
        if name.is_empty() {
            return Err(ErrorKind::InvalidLabel {
                text: format!("{name}:"),
            });
        }
        if self.get(name).is_some() {
            return Err(ErrorKind::DuplicateLabel {
                name: name.to_string(),
            });
        }
        if self.labels.len() >= cfg.max_labels {
            return Err(ErrorKind::LabelTableFull {
                limit: format!("{} labels", cfg.max_labels),
            });
        }
        if self.name_bytes + name.len() > cfg.label_name_capacity {
            return Err(ErrorKind::LabelTableFull {
                limit: format!("{} bytes of label names", cfg.label_name_capacity),
            });
        }
        self.name_bytes += name.len();
        self.labels.push(Label {
            name: name.to_string(),
            address,
        });
        Ok(())
    }
}

/// Walks the whole program once, tracking the emit address, and records
/// where every label lands. Operands are skipped, not parsed.
pub fn collect_labels(words: Words<'_>, cfg: &AsmConfig) -> Result<SymbolTable> {
    let mut table = SymbolTable::default();
    let mut emit: u32 = 0;

    for st in Statements::new(words) {
        match st {
            Statement::Org { directive, operand } => {
                emit = org_address(&directive, operand.as_ref())?;
            }
            Statement::Label { name, line } => {
                table.insert(name, emit, cfg).map_err(|k| k.at(line))?;
            }
            Statement::Instruction { .. } => emit += INSTR_BYTES,
            Statement::Stray(w) => debug!(line = w.line, word = w.text, "ignoring stray word"),
        }
    }

    debug!(labels = table.len(), end = emit, "pass 1 done");
    Ok(table)
}
