/// Operand layout of an instruction word. The opcode always sits in bits 15..9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    A0, // no operands
    A1, // rA rB rC
    A2, // rA imm4
    A3, // rA
    B1, // disp9, pc-relative in words
    B2, // rA imm6
    L1, // imm8, bit 8 picks the upper byte
    L2, // rA rB
}

impl Format {
    pub fn arity(self) -> usize {
        match self {
            Format::A0 => 0,
            Format::A3 | Format::B1 | Format::L1 => 1,
            Format::A2 | Format::B2 | Format::L2 => 2,
            Format::A1 => 3,
        }
    }

    /// Width of the immediate field, if the format has one.
    pub fn imm_bits(self) -> Option<u32> {
        match self {
            Format::A2 => Some(4),
            Format::B2 => Some(6),
            Format::L1 => Some(8),
            Format::B1 => Some(9),
            Format::A0 | Format::A1 | Format::A3 | Format::L2 => None,
        }
    }
}

pub const OPCODE_SHIFT: u32 = 9;
pub const REG_BITS: u32 = 3;
pub const UPPER_BIT: u16 = 1 << 8;

#[derive(Debug, Clone, Copy)]
pub struct OpcodeSpec {
    pub mnemonic: &'static str,
    pub opcode: u8,
    pub format: Format,
    pub upper: bool, // only LOADIMM.UPPER
}

const fn op(mnemonic: &'static str, opcode: u8, format: Format) -> OpcodeSpec {
    OpcodeSpec {
        mnemonic,
        opcode,
        format,
        upper: false,
    }
}

pub const TABLE: &[OpcodeSpec] = &[
    op("NOP", 0, Format::A0),
    op("ADD", 1, Format::A1),
    op("SUB", 2, Format::A1),
    op("MUL", 3, Format::A1),
    op("NAND", 4, Format::A1),
    op("SHL", 5, Format::A2),
    op("SHR", 6, Format::A2),
    op("TEST", 7, Format::A3),
    op("MUH", 8, Format::A1),
    op("OUT", 32, Format::A3),
    op("IN", 33, Format::A3),
    op("BRR", 64, Format::B1),
    op("BRR.N", 65, Format::B1),
    op("BRR.Z", 66, Format::B1),
    op("BRR.O", 73, Format::B1),
    op("BR", 67, Format::B2),
    op("BR.N", 68, Format::B2),
    op("BR.Z", 69, Format::B2),
    op("BR.O", 72, Format::B2),
    op("BR.SUB", 70, Format::B2),
    op("RETURN", 71, Format::A0),
    op("LOAD", 16, Format::L2),
    op("STORE", 17, Format::L2),
    op("LOADIMM.LOWER", 18, Format::L1),
    OpcodeSpec {
        mnemonic: "LOADIMM.UPPER",
        opcode: 18,
        format: Format::L1,
        upper: true,
    },
    op("MOV", 19, Format::L2),
];

/// Exact, case-sensitive match against the table.
pub fn lookup(mnemonic: &str) -> Option<&'static OpcodeSpec> {
    TABLE.iter().find(|d| d.mnemonic == mnemonic)
}
