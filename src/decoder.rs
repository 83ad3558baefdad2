use crate::instructions::OpcodeSpec;

/// Fields unpacked from one instruction word. Unused slots are zero.
#[derive(Debug, Clone, Copy)]
pub struct Decoded {
    pub spec: &'static OpcodeSpec,
    pub regs: [u8; 3],
    pub imm: u16, // raw field bits, not sign-extended
}

impl Decoded {
    /// Immediate sign-extended from the format's field width.
    pub fn imm_signed(&self) -> i32 {
        match self.spec.format.imm_bits() {
            Some(bits) => {
                let s = 32 - bits;
                ((self.imm as u32) << s) as i32 >> s
            }
            None => 0,
        }
    }
}

pub trait Decoder {
    fn decode(&self, word: u16) -> Option<Decoded>;
}
