//! Splits case-normalized source text into words.
//!
//! A word is a maximal run of `A-Z`, `0-9`, `.` and `:`, or a lone newline,
//! which terminates a statement. A `+` or `-` directly in front of a digit
//! opens a word so signed literals keep their sign. Everything else separates
//! words. A `;` comments out the rest of its line, but the newline word still
//! comes through.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word<'a> {
    pub text: &'a str,
    pub line: u32, // 1-based
}

impl<'a> Word<'a> {
    pub fn is_newline(&self) -> bool {
        self.text == "\n"
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'.' || b == b':'
}

/// Owns nothing; hands out fresh word streams over the same text.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'a> {
    src: &'a str,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src }
    }

    /// A new stream from the start of the text. Each pass calls this once.
    pub fn words(&self) -> Words<'a> {
        Words {
            src: self.src,
            pos: 0,
            line: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Words<'a> {
    src: &'a str,
    pos: usize,
    line: u32,
}

impl<'a> Words<'a> {
    fn at_signed_digit(&self) -> bool {
        let bytes = self.src.as_bytes();
        matches!(bytes.get(self.pos), Some(b'+' | b'-'))
            && bytes.get(self.pos + 1).is_some_and(u8::is_ascii_digit)
    }
}

impl<'a> Iterator for Words<'a> {
    type Item = Word<'a>;

    fn next(&mut self) -> Option<Word<'a>> {
        let bytes = self.src.as_bytes();
        loop {
            let b = *bytes.get(self.pos)?;
            match b {
                b'\n' => {
                    let word = Word {
                        text: &self.src[self.pos..self.pos + 1],
                        line: self.line,
                    };
                    self.pos += 1;
                    self.line += 1;
                    return Some(word);
                }
                b';' => {
                    // leave the newline for the next round
                    self.pos = bytes[self.pos..]
                        .iter()
                        .position(|&c| c == b'\n')
                        .map_or(bytes.len(), |off| self.pos + off);
                }
                b if is_word_byte(b) || self.at_signed_digit() => {
                    let start = self.pos;
                    let len = bytes[start + 1..]
                        .iter()
                        .take_while(|&&c| is_word_byte(c))
                        .count();
                    self.pos = start + 1 + len;
                    return Some(Word {
                        text: &self.src[start..self.pos],
                        line: self.line,
                    });
                }
                _ => self.pos += 1,
            }
        }
    }
}
