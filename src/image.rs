use std::fmt::Write as _;

use crate::error::ErrorKind;

/// Fixed-capacity ROM contents. Words are stored big-endian; bytes never
/// written stay zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomImage {
    bytes: Vec<u8>,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum HexError {
    #[error("line {line}: expected four hex digits, got `{text}`")]
    BadLine { line: usize, text: String },
    #[error("expected {expected} lines, got {found}")]
    WrongLength { expected: usize, found: usize },
}

impl RomImage {
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn span(&self, addr: u32) -> Result<usize, ErrorKind> {
        if addr % 2 != 0 {
            return Err(ErrorKind::MisalignedAddress { addr });
        }
        let off = addr as usize;
        if off + 1 >= self.bytes.len() {
            return Err(ErrorKind::AddressOutOfBounds {
                addr,
                capacity: self.bytes.len(),
            });
        }
        Ok(off)
    }

    /// High byte at `addr`, low byte at `addr + 1`.
    pub fn write_word(&mut self, addr: u32, word: u16) -> Result<(), ErrorKind> {
        let off = self.span(addr)?;
        self.bytes[off..off + 2].copy_from_slice(&word.to_be_bytes());
        Ok(())
    }

    pub fn read_word(&self, addr: u32) -> Option<u16> {
        let off = self.span(addr).ok()?;
        Some(u16::from_be_bytes([self.bytes[off], self.bytes[off + 1]]))
    }

    /// `(address, word)` for every word slot, in address order.
    pub fn words(&self) -> impl Iterator<Item = (u32, u16)> + '_ {
        self.bytes
            .chunks_exact(2)
            .enumerate()
            .map(|(i, c)| ((i * 2) as u32, u16::from_be_bytes([c[0], c[1]])))
    }

    /// One `XXXX` line per word, covering the whole capacity.
    pub fn to_hex_text(&self) -> String {
        let mut s = String::with_capacity(self.bytes.len() / 2 * 5);
        for (_, w) in self.words() {
            let _ = writeln!(s, "{w:04X}");
        }
        s
    }

    /// Inverse of [`RomImage::to_hex_text`] for an image of `capacity` bytes.
    pub fn from_hex_text(text: &str, capacity: usize) -> Result<Self, HexError> {
        let mut img = Self::new(capacity);
        let mut count = 0;
        for (i, line) in text.lines().enumerate() {
            let t = line.trim();
            if t.len() != 4 || !t.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(HexError::BadLine {
                    line: i + 1,
                    text: t.to_string(),
                });
            }
            let w = u16::from_str_radix(t, 16).map_err(|_| HexError::BadLine {
                line: i + 1,
                text: t.to_string(),
            })?;
            let addr = (i * 2) as u32;
            if img.write_word(addr, w).is_err() {
                return Err(HexError::WrongLength {
                    expected: capacity / 2,
                    found: text.lines().count(),
                });
            }
            count += 1;
        }
        if count != capacity / 2 {
            return Err(HexError::WrongLength {
                expected: capacity / 2,
                found: count,
            });
        }
        Ok(img)
    }
}
