use crate::decoder::Decoded;
use crate::instructions::Format;

/// Renders a decoded word as source that assembles back to the same word.
pub fn fmt_decoded(d: &Decoded) -> String {
    let mn = d.spec.mnemonic;
    let [a, b, c] = d.regs;
    match d.spec.format {
        Format::A0 => mn.to_string(),
        Format::A1 => format!("{mn} R{a} R{b} R{c}"),
        Format::A2 | Format::B2 => format!("{mn} R{a} 0X{:X}", d.imm),
        Format::A3 => format!("{mn} R{a}"),
        Format::B1 => format!("{mn} {:+}", d.imm_signed()),
        Format::L1 => format!("{mn} 0X{:02X}", d.imm),
        Format::L2 => format!("{mn} R{a} R{b}"),
    }
}

/// Absolute target of a B1 branch at `addr`.
pub fn branch_target(d: &Decoded, addr: u32) -> Option<u32> {
    (d.spec.format == Format::B1).then(|| (addr as i64 + 2 * d.imm_signed() as i64) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Decoder;
    use crate::isa::r16::R16Decoder;

    fn dis(word: u16) -> String {
        fmt_decoded(&R16Decoder::new().decode(word).unwrap())
    }

    #[test]
    fn renders_each_format() {
        assert_eq!(dis(0x0000), "NOP");
        assert_eq!(dis(0x0253), "ADD R1 R2 R3");
        assert_eq!(dis((5 << 9) | (2 << 6) | 0xF), "SHL R2 0XF");
        assert_eq!(dis((33 << 9) | (4 << 6)), "IN R4");
        assert_eq!(dis(0x8001), "BRR +1");
        assert_eq!(dis((65 << 9) | 0x100), "BRR.N -256");
        assert_eq!(dis((70 << 9) | (1 << 6) | 0x3F), "BR.SUB R1 0X3F");
        assert_eq!(dis(0x2520), "LOADIMM.UPPER 0X20");
        assert_eq!(dis((17 << 9) | (6 << 6) | (7 << 3)), "STORE R6 R7");
    }

    #[test]
    fn branch_targets() {
        let dec = R16Decoder::new();
        assert_eq!(branch_target(&dec.decode(0x8001).unwrap(), 8), Some(10));
        assert_eq!(branch_target(&dec.decode(0x81FE).unwrap(), 4), Some(0));
        assert_eq!(branch_target(&dec.decode(0x0253).unwrap(), 4), None);
    }
}
