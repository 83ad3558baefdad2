use crate::decoder::{Decoded, Decoder};
use crate::instructions::{Format, OPCODE_SHIFT, TABLE, UPPER_BIT};

/// Table-driven decoder for the bootloader ISA.
/// Bits the format does not use are ignored.
pub struct R16Decoder;

impl R16Decoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for R16Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for R16Decoder {
    fn decode(&self, word: u16) -> Option<Decoded> {
        let opcode = (word >> OPCODE_SHIFT) as u8;
        let upper = word & UPPER_BIT != 0;
        let spec = TABLE
            .iter()
            .find(|d| d.opcode == opcode && (d.format != Format::L1 || d.upper == upper))?;

        let r0 = ((word >> 6) & 0x7) as u8;
        let r1 = ((word >> 3) & 0x7) as u8;
        let r2 = (word & 0x7) as u8;

        let (regs, imm) = match spec.format {
            Format::A0 => ([0, 0, 0], 0),
            Format::A1 => ([r0, r1, r2], 0),
            Format::A2 => ([r0, 0, 0], word & 0xF),
            Format::A3 => ([r0, 0, 0], 0),
            Format::B1 => ([0, 0, 0], word & 0x1FF),
            Format::B2 => ([r0, 0, 0], word & 0x3F),
            Format::L1 => ([0, 0, 0], word & 0xFF),
            Format::L2 => ([r0, r1, 0], 0),
        };
        Some(Decoded { spec, regs, imm })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_documented_words() {
        let dec = R16Decoder::new();
        let d = dec.decode(0x0253).unwrap();
        assert_eq!(d.spec.mnemonic, "ADD");
        assert_eq!(d.regs, [1, 2, 3]);

        let d = dec.decode(0x2520).unwrap();
        assert_eq!(d.spec.mnemonic, "LOADIMM.UPPER");
        assert_eq!(d.imm, 0x20);
        assert_eq!(dec.decode(0x2420).unwrap().spec.mnemonic, "LOADIMM.LOWER");

        let d = dec.decode(0x81FE).unwrap();
        assert_eq!(d.spec.mnemonic, "BRR");
        assert_eq!(d.imm_signed(), -2);

        assert_eq!(dec.decode(0x0000).unwrap().spec.mnemonic, "NOP");
    }

    #[test]
    fn unknown_opcode() {
        let dec = R16Decoder::new();
        assert!(dec.decode(9 << 9).is_none());
        assert!(dec.decode(0x7F << 9).is_none());
    }
}
