//! Comment and literal regions.
//!
//! Transitions out of [`Region::Code`]:
//!
//! | input          | next region      |
//! |----------------|------------------|
//! | `//`           | `LineComment`    |
//! | `/**` + other  | `DocComment`     |
//! | `/*`, `/**/`, `/***` | `BlockComment` |
//! | `"""`          | `TextBlock`      |
//! | `"` or `'`     | `Literal`        |
//!
//! Line comments end at `\n`, block and doc comments at `*/`, literals at
//! their unescaped closing quote (a `'` literal also at end of line), text
//! blocks at the next unescaped `"""`.

use super::cursor::{Cursor, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Code,
    LineComment,
    BlockComment,
    DocComment,
    Literal { quote: u8, escaped: bool },
    /// Java text block, Kotlin raw string or Swift multi-line string.
    TextBlock { escaped: bool },
}

/// What a step in code opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opener {
    LineComment,
    BlockComment,
    /// Doc-comment whose text starts at `body`.
    DocComment { body: usize },
    Literal(u8),
    TextBlock,
}

/// Detect a comment or literal opening at `step`, consuming the rest of the
/// delimiter from `cursor`.
pub fn open(step: &Step, cursor: &mut Cursor<'_>) -> Option<Opener> {
    match step.byte()? {
        b'/' => match (cursor.peek(0), cursor.peek(1), cursor.peek(2)) {
            (Some(b'/'), _, _) => {
                cursor.bump(1);
                Some(Opener::LineComment)
            }
            (Some(b'*'), Some(b'*'), third) if !matches!(third, Some(b'*' | b'/')) => {
                cursor.bump(2);
                Some(Opener::DocComment { body: step.offset + 3 })
            }
            (Some(b'*'), _, _) => {
                cursor.bump(1);
                Some(Opener::BlockComment)
            }
            _ => None,
        },
        b'"' if cursor.peek(0) == Some(b'"') && cursor.peek(1) == Some(b'"') => {
            cursor.bump(2);
            Some(Opener::TextBlock)
        }
        q @ (b'"' | b'\'') => Some(Opener::Literal(q)),
        _ => None,
    }
}

/// Whether `step` is the `*` of a `*/`; the `/` is consumed.
pub fn closes_comment(step: &Step, cursor: &mut Cursor<'_>) -> bool {
    if step.is(b'*') && cursor.peek(0) == Some(b'/') {
        cursor.bump(1);
        true
    } else {
        false
    }
}

impl Region {
    pub fn entered_by(opener: Opener) -> Self {
        match opener {
            Opener::LineComment => Region::LineComment,
            Opener::BlockComment => Region::BlockComment,
            Opener::DocComment { .. } => Region::DocComment,
            Opener::Literal(quote) => Region::Literal { quote, escaped: false },
            Opener::TextBlock => Region::TextBlock { escaped: false },
        }
    }

    /// Advance a text block by one step, consuming a closing `"""`.
    pub fn text_block_step(escaped: bool, step: &Step, cursor: &mut Cursor<'_>) -> Region {
        if escaped {
            return Region::TextBlock { escaped: false };
        }
        match step.byte() {
            Some(b'\\') => Region::TextBlock { escaped: true },
            Some(b'"') if cursor.peek(0) == Some(b'"') && cursor.peek(1) == Some(b'"') => {
                cursor.bump(2);
                Region::Code
            }
            _ => Region::TextBlock { escaped: false },
        }
    }

    /// Advance a literal region by one step; returns the region to continue in.
    pub fn literal_step(quote: u8, escaped: bool, step: &Step) -> Region {
        if escaped {
            return Region::Literal { quote, escaped: false };
        }
        match step.byte() {
            Some(b'\\') => Region::Literal { quote, escaped: true },
            Some(b) if b == quote => Region::Code,
            Some(b'\n') if quote == b'\'' => Region::Code,
            _ => Region::Literal { quote, escaped: false },
        }
    }
}
