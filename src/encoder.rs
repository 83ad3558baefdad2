//! Second pass: operand resolution and bit packing.

use tracing::trace;

use crate::error::{ErrorKind, Result};
use crate::instructions::{Format, OpcodeSpec, OPCODE_SHIFT, UPPER_BIT};
use crate::lexer::{Word, Words};
use crate::operand::{fit_signed, parse_displacement, parse_num, register_field, Literal};
use crate::statement::{org_address, Statement, Statements};
use crate::symbols::{SymbolTable, INSTR_BYTES};

/// A mnemonic with its raw operand words, placed at an address.
#[derive(Debug, Clone)]
pub struct PendingInstruction<'a> {
    pub address: u32,
    pub spec: &'static OpcodeSpec,
    pub operands: Vec<Word<'a>>,
    pub line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedWord {
    pub address: u32,
    pub word: u16,
    pub line: u32,
}

/// Re-scans the program with its own emit address and encodes every
/// instruction against the finished label table.
pub fn encode_program(words: Words<'_>, symbols: &SymbolTable) -> Result<Vec<EncodedWord>> {
    let mut out = Vec::new();
    let mut emit: u32 = 0;

    for st in Statements::new(words) {
        match st {
            Statement::Org { directive, operand } => {
                emit = org_address(&directive, operand.as_ref())?;
            }
            Statement::Instruction {
                mnemonic,
                spec,
                operands,
            } => {
                let pending = PendingInstruction {
                    address: emit,
                    spec,
                    operands,
                    line: mnemonic.line,
                };
                let word = encode_instruction(&pending, symbols)?;
                trace!(addr = pending.address, word = %format!("{word:04X}"), "{}", spec.mnemonic);
                out.push(EncodedWord {
                    address: pending.address,
                    word,
                    line: pending.line,
                });
                emit += INSTR_BYTES;
            }
            Statement::Label { .. } | Statement::Stray(_) => {}
        }
    }

    Ok(out)
}

pub fn encode_instruction(inst: &PendingInstruction<'_>, symbols: &SymbolTable) -> Result<u16> {
    let spec = inst.spec;
    let ops = &inst.operands;
    let expected = spec.format.arity();
    if ops.len() != expected {
        return Err(ErrorKind::ArityMismatch {
            mnemonic: spec.mnemonic.to_string(),
            expected,
            found: ops.len(),
        }
        .at(inst.line));
    }

    let reg = |i: usize| register_field(ops[i].text).map_err(|k| k.at(ops[i].line));
    let imm = |i: usize, bits: u32| -> Result<u16> {
        parse_num(ops[i].text, bits)
            .map(|v| v as u16)
            .map_err(|k| k.at(ops[i].line))
    };

    let mut word = u16::from(spec.opcode) << OPCODE_SHIFT;
    word |= match spec.format {
        Format::A0 => 0,
        Format::A1 => reg(0)? << 6 | reg(1)? << 3 | reg(2)?,
        Format::A2 => reg(0)? << 6 | imm(1, 4)?,
        Format::A3 => reg(0)? << 6,
        Format::B1 => branch_target(&ops[0], inst.address, symbols)?,
        Format::B2 => reg(0)? << 6 | imm(1, 6)?,
        Format::L1 => {
            let upper = if spec.upper { UPPER_BIT } else { 0 };
            upper | imm(0, 8)?
        }
        Format::L2 => reg(0)? << 6 | reg(1)? << 3,
    };
    Ok(word)
}

const DISP_BITS: u32 = 9;

/// Literal displacement, or `(label - address) / 2` in words. Either must fit
/// the signed 9-bit field.
fn branch_target(op: &Word<'_>, address: u32, symbols: &SymbolTable) -> Result<u16> {
    match parse_displacement(op.text, DISP_BITS).map_err(|k| k.at(op.line))? {
        Literal::Value(v) => Ok(v as u16),
        Literal::NotANumber => {
            let target = symbols.get(op.text).ok_or_else(|| {
                ErrorKind::LabelNotFound {
                    name: op.text.to_string(),
                }
                .at(op.line)
            })?;
            let disp = (i64::from(target) - i64::from(address)) / 2;
            fit_signed(disp, DISP_BITS, op.text)
                .map(|v| v as u16)
                .map_err(|k| k.at(op.line))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AsmConfig;
    use crate::lexer::Tokenizer;
    use crate::symbols::collect_labels;

    fn encode(src: &str) -> Result<Vec<(u32, u16)>> {
        let tok = Tokenizer::new(src);
        let symbols = collect_labels(tok.words(), &AsmConfig::default())?;
        let words = encode_program(tok.words(), &symbols)?;
        Ok(words.into_iter().map(|w| (w.address, w.word)).collect())
    }

    fn one(src: &str) -> u16 {
        encode(src).unwrap()[0].1
    }

    #[test]
    fn every_format_packs() {
        assert_eq!(one("NOP"), 0x0000);
        assert_eq!(one("ADD R1 R2 R3"), 0x0253);
        assert_eq!(one("SHL R2 0XF"), (5 << 9) | (2 << 6) | 0xF);
        assert_eq!(one("OUT R7"), (32 << 9) | (7 << 6));
        assert_eq!(one("BRR 5"), (64 << 9) | 5);
        assert_eq!(one("BR R3 -1"), (67 << 9) | (3 << 6) | 0x3F);
        assert_eq!(one("LOADIMM.UPPER 0X20"), 0x2520);
        assert_eq!(one("LOADIMM.LOWER 0X20"), 0x2420);
        assert_eq!(one("MOV R4 R5"), (19 << 9) | (4 << 6) | (5 << 3));
        assert_eq!(one("RETURN"), 71 << 9);
    }

    #[test]
    fn branch_to_label_is_word_relative() {
        let src = "ORG 8\nBRR FAIL\nFAIL: NOP\n";
        assert_eq!(encode(src).unwrap()[0], (8, 0x8001));
        let src = "ORG 8\nBRR FAIL\nNOP\nFAIL: NOP\n";
        assert_eq!(encode(src).unwrap()[0], (8, 0x8002));
    }

    #[test]
    fn backward_branch_is_negative() {
        let src = "TOP: NOP\nNOP\nBRR.Z TOP\n";
        // (0 - 4) / 2 = -2 -> 0x1FE
        assert_eq!(encode(src).unwrap()[2], (4, (66 << 9) | 0x1FE));
    }

    #[test]
    fn arity_is_exact() {
        let e = encode("NOP\nADD R1 R2\n").unwrap_err();
        assert_eq!(e.line, 2);
        assert_eq!(
            e.kind,
            ErrorKind::ArityMismatch {
                mnemonic: "ADD".into(),
                expected: 3,
                found: 2
            }
        );
        assert!(encode("NOP R1").is_err());
        assert!(encode("OUT R1 R2").is_err());
    }

    #[test]
    fn non_branch_fields_take_literals_only() {
        let e = encode("X: NOP\nLOADIMM.LOWER X\n").unwrap_err();
        assert!(matches!(e.kind, ErrorKind::MalformedConstant { .. }));
        assert_eq!(e.line, 2);
    }

    #[test]
    fn unknown_label_and_bad_register() {
        let e = encode("BRR NOWHERE").unwrap_err();
        assert!(matches!(e.kind, ErrorKind::LabelNotFound { .. }));
        let e = encode("TEST X1").unwrap_err();
        assert!(matches!(e.kind, ErrorKind::InvalidRegister { .. }));
        let e = encode("TEST R9").unwrap_err();
        assert!(matches!(e.kind, ErrorKind::OperandOutOfRange { bits: 3, .. }));
    }

    #[test]
    fn branch_field_is_signed_nine_bits() {
        // +256 words would wrap to -256
        let far = "ORG 0X200\nBRR FAR\nORG 0X400\nFAR: NOP\n";
        let e = encode(far).unwrap_err();
        assert_eq!(e.line, 2);
        assert!(matches!(e.kind, ErrorKind::OperandOutOfRange { bits: 9, .. }));

        for src in ["BRR 256", "BRR -257", "BRR 511"] {
            let e = encode(src).unwrap_err();
            assert!(matches!(e.kind, ErrorKind::OperandOutOfRange { bits: 9, .. }), "{src}");
        }
        assert_eq!(one("BRR 255"), (64 << 9) | 0xFF);
        assert_eq!(one("BRR -256"), (64 << 9) | 0x100);
    }

    #[test]
    fn malformed_prefix_in_branch_is_not_a_label() {
        let e = encode("EXIT: NOP\nBRR EXIT\n").unwrap_err();
        assert_eq!(e.line, 2);
        assert_eq!(e.kind, ErrorKind::MalformedConstant { text: "EXIT".into() });
    }

    #[test]
    fn immediate_ranges() {
        assert!(encode("SHR R1 16").is_err());
        assert_eq!(one("SHR R1 -8"), (6 << 9) | (1 << 6) | 0x8);
        assert!(encode("BR R1 64").is_err());
        assert!(encode("LOADIMM.LOWER 256").is_err());
        assert_eq!(one("LOADIMM.LOWER 255"), (18 << 9) | 0xFF);
    }
}
