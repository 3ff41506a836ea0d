//! Forward-only cursor over a source buffer.
//!
//! Yields one [`Step`] per logical unit: a single ASCII byte, or a whole
//! multi-byte UTF-8 sequence. Continuation bytes are consumed together with
//! their lead byte and never surface on their own, so structural checks
//! (comment delimiters, punctuation, keywords) only ever fire on ASCII.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Ascii(u8),
    /// A multi-byte sequence, or a stray byte with the top bit set.
    Wide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Offset of the unit's first byte.
    pub offset: usize,
    /// Byte length of the unit.
    pub len: usize,
    /// 0-based line the unit is on.
    pub line: usize,
    pub unit: Unit,
}

impl Step {
    /// Offset of the unit's last byte.
    pub fn last(&self) -> usize {
        self.offset + self.len - 1
    }

    pub fn byte(&self) -> Option<u8> {
        match self.unit {
            Unit::Ascii(b) => Some(b),
            Unit::Wide => None,
        }
    }

    pub fn is(&self, b: u8) -> bool {
        self.unit == Unit::Ascii(b)
    }

    pub fn is_newline(&self) -> bool {
        self.is(b'\n')
    }

    /// Space, tab, carriage return or newline.
    pub fn is_space(&self) -> bool {
        matches!(self.unit, Unit::Ascii(b' ' | b'\t' | b'\r' | b'\n'))
    }

    /// `[A-Za-z0-9_]` or any non-ASCII unit.
    pub fn is_ident(&self) -> bool {
        match self.unit {
            Unit::Ascii(b) => is_ident_byte(b),
            Unit::Wide => true,
        }
    }
}

pub fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0, line: 0 }
    }

    /// Raw byte `ahead` positions past the unit last returned.
    pub fn peek(&self, ahead: usize) -> Option<u8> {
        self.buf.get(self.pos + ahead).copied()
    }

    /// Skip `n` bytes already inspected with [`peek`](Self::peek).
    /// Only used for ASCII delimiter bytes, never newlines.
    pub fn bump(&mut self, n: usize) {
        debug_assert!(self.buf[self.pos..self.pos + n].iter().all(|&b| b.is_ascii() && b != b'\n'));
        self.pos = (self.pos + n).min(self.buf.len());
    }
}

impl Iterator for Cursor<'_> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let offset = self.pos;
        let lead = *self.buf.get(offset)?;
        let line = self.line;

        if lead.is_ascii() {
            self.pos += 1;
            if lead == b'\n' {
                self.line += 1;
            }
            return Some(Step { offset, len: 1, line, unit: Unit::Ascii(lead) });
        }

        let expected = continuation_count(lead);
        let mut len = 1;
        // Only genuine continuation bytes belong to the sequence; anything
        // else is left for the next step.
        while len <= expected && self.buf.get(offset + len).is_some_and(|&b| b & 0xc0 == 0x80) {
            len += 1;
        }
        self.pos += len;
        Some(Step { offset, len, line, unit: Unit::Wide })
    }
}

/// Continuation bytes announced by a UTF-8 lead byte.
fn continuation_count(lead: u8) -> usize {
    if lead & 0xe0 == 0xc0 {
        1
    } else if lead & 0xf0 == 0xe0 {
        2
    } else if lead & 0xf8 == 0xf0 {
        3
    } else {
        0
    }
}
