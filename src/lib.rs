pub mod assembler;
pub mod config;
pub mod decoder;
pub mod disasm;
pub mod encoder;
pub mod error;
pub mod image;
pub mod instructions;
pub mod lexer;
pub mod operand;
pub mod statement;
pub mod symbols;

pub mod isa {
    pub mod r16; // bootloader ROM ISA, 7-bit opcodes
}

pub use assembler::{assemble, assemble_source, Assembly};
pub use config::{AsmConfig, ROM_SIZE};
pub use error::{AsmError, ErrorKind};
pub use image::RomImage;
