/// What went wrong, without the source position.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("malformed constant `{text}`")]
    MalformedConstant { text: String },
    #[error("argument `{text}` needs more than {bits} bits")]
    OperandOutOfRange { text: String, bits: u32 },
    #[error("not a valid register: `{text}`")]
    InvalidRegister { text: String },
    #[error("duplicate label `{name}`")]
    DuplicateLabel { name: String },
    #[error("label not found: `{name}`")]
    LabelNotFound { name: String },
    #[error("invalid label definition `{text}`")]
    InvalidLabel { text: String },
    #[error("{mnemonic} expects {expected} operand(s), got {found}")]
    ArityMismatch {
        mnemonic: String,
        expected: usize,
        found: usize,
    },
    #[error("label table full ({limit})")]
    LabelTableFull { limit: String },
    #[error("address {addr:#06x} is outside the {capacity}-byte image")]
    AddressOutOfBounds { addr: u32, capacity: usize },
    #[error("address {addr:#06x} is not word aligned")]
    MisalignedAddress { addr: u32 },
}

impl ErrorKind {
    pub fn at(self, line: u32) -> AsmError {
        AsmError { line, kind: self }
    }
}

/// First fatal error of an assembly run; `line` is 1-based.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Line {line}: {kind}")]
pub struct AsmError {
    pub line: u32,
    pub kind: ErrorKind,
}

pub type Result<T, E = AsmError> = std::result::Result<T, E>;
