//! Doc-comment body extraction: description lines and `@param` /
//! `@return` / `@throws` tags.
//!
//! Each physical line starts in the margin, where whitespace and `*`
//! decoration are skipped. The first other byte decides the line: `@`
//! starts a tag keyword, anything else starts a description line. A tag
//! occupies exactly one line; text on the following line is description
//! again. A known tag keyword preceded by whitespace also starts a new tag
//! in the middle of a line.

use super::cursor::{is_ident_byte, Step};
use crate::model::{ByteSpan, TagRegion};

/// Everything collected from one doc-comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    /// Comment text without the delimiters and outer decoration.
    pub comment: Option<ByteSpan>,
    pub lines: Vec<Option<ByteSpan>>,
    pub params: Vec<TagRegion>,
    pub throws: Vec<TagRegion>,
    pub ret: Option<TagRegion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Param,
    Return,
    Throws,
}

impl TagKind {
    fn from_keyword(word: &[u8]) -> Option<Self> {
        match word {
            b"param" => Some(TagKind::Param),
            b"return" => Some(TagKind::Return),
            b"throws" | b"exception" => Some(TagKind::Throws),
            _ => None,
        }
    }

    fn first_part(self) -> TagPart {
        match self {
            TagKind::Return => TagPart::BeforeComment { code: None },
            TagKind::Param | TagKind::Throws => TagPart::BeforeCode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagPart {
    BeforeCode,
    Code { start: usize },
    BeforeComment { code: Option<ByteSpan> },
    Comment { code: Option<ByteSpan>, start: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinePhase {
    /// Leading whitespace and `*` decoration.
    Margin,
    Text { start: usize },
    /// Tag keyword starting right after the `@`.
    Keyword { start: usize },
    Tag { kind: TagKind, part: TagPart },
    /// Unknown tag; the rest of the line is dropped.
    Ignored,
}

pub struct DocCollector {
    body: usize,
    block: DocBlock,
    phase: LinePhase,
    seen_text: bool,
    prev_space: bool,
    truncated: usize,
}

impl DocCollector {
    /// Start collecting a comment whose text begins at `body`.
    pub fn new(body: usize) -> Self {
        Self {
            body,
            block: DocBlock::default(),
            phase: LinePhase::Margin,
            seen_text: false,
            prev_space: true,
            truncated: 0,
        }
    }

    pub fn feed(&mut self, step: &Step, buf: &[u8]) {
        self.phase = self.advance(self.phase, step, buf);
        self.prev_space = step.is_space();
    }

    /// Finish at the `*/` whose `*` is at `end`.
    /// Returns the block and the number of tags dropped as truncated.
    pub fn close(mut self, end: usize, buf: &[u8]) -> (DocBlock, usize) {
        match self.phase {
            LinePhase::Margin | LinePhase::Ignored => {}
            LinePhase::Text { start } => {
                if let Some(span) = ByteSpan::trimmed(buf, start, end, true) {
                    self.block.lines.push(Some(span));
                }
            }
            LinePhase::Keyword { start } => {
                if TagKind::from_keyword(&buf[start..end]).is_some() {
                    self.truncated += 1;
                }
            }
            LinePhase::Tag { kind, part } => {
                let (code, comment) = match part {
                    TagPart::BeforeCode => (None, None),
                    TagPart::Code { start } => (ByteSpan::trimmed(buf, start, end, true), None),
                    TagPart::BeforeComment { code } => (code, None),
                    TagPart::Comment { code, start } => {
                        (code, ByteSpan::trimmed(buf, start, end, true))
                    }
                };
                self.finish_tag(kind, code, comment);
            }
        }
        self.block.comment = ByteSpan::trimmed(buf, self.body, end, true);
        (self.block, self.truncated)
    }

    /// The buffer ended inside the comment. Returns the number of tags lost.
    pub fn abandon(self) -> usize {
        let open_tag = matches!(self.phase, LinePhase::Tag { .. });
        self.truncated + usize::from(open_tag)
    }

    fn advance(&mut self, phase: LinePhase, step: &Step, buf: &[u8]) -> LinePhase {
        match phase {
            LinePhase::Margin => {
                if step.is_newline() {
                    if self.seen_text {
                        self.block.lines.push(None);
                    }
                    LinePhase::Margin
                } else if step.is_space() || step.is(b'*') {
                    LinePhase::Margin
                } else if step.is(b'@') {
                    LinePhase::Keyword { start: step.offset + 1 }
                } else {
                    self.seen_text = true;
                    LinePhase::Text { start: step.offset }
                }
            }
            LinePhase::Text { start } => {
                if step.is_newline() {
                    self.push_line(buf, start, step.offset);
                    LinePhase::Margin
                } else if self.starts_inline_tag(step, buf) {
                    self.push_line(buf, start, step.offset);
                    LinePhase::Keyword { start: step.offset + 1 }
                } else {
                    phase
                }
            }
            LinePhase::Keyword { start } => {
                if step.is_ident() {
                    return phase;
                }
                match TagKind::from_keyword(&buf[start..step.offset]) {
                    Some(kind) => self.advance_tag(kind, kind.first_part(), step, buf),
                    None if step.is_newline() => LinePhase::Margin,
                    None => LinePhase::Ignored,
                }
            }
            LinePhase::Tag { kind, part } => self.advance_tag(kind, part, step, buf),
            LinePhase::Ignored => {
                if step.is_newline() {
                    LinePhase::Margin
                } else {
                    LinePhase::Ignored
                }
            }
        }
    }

    fn advance_tag(&mut self, kind: TagKind, part: TagPart, step: &Step, buf: &[u8]) -> LinePhase {
        let next = match part {
            TagPart::BeforeCode => {
                if step.is_newline() {
                    self.finish_tag(kind, None, None);
                    return LinePhase::Margin;
                }
                if step.is_space() {
                    part
                } else {
                    TagPart::Code { start: step.offset }
                }
            }
            TagPart::Code { start } => {
                if !step.is_space() {
                    part
                } else {
                    let code = Some(ByteSpan::new(start, step.offset - 1));
                    if step.is_newline() {
                        self.finish_tag(kind, code, None);
                        return LinePhase::Margin;
                    }
                    TagPart::BeforeComment { code }
                }
            }
            TagPart::BeforeComment { code } => {
                if step.is_newline() {
                    self.finish_tag(kind, code, None);
                    return LinePhase::Margin;
                }
                if self.starts_inline_tag(step, buf) {
                    self.finish_tag(kind, code, None);
                    return LinePhase::Keyword { start: step.offset + 1 };
                }
                if step.is_space() {
                    part
                } else {
                    TagPart::Comment { code, start: step.offset }
                }
            }
            TagPart::Comment { code, start } => {
                if step.is_newline() || self.starts_inline_tag(step, buf) {
                    let comment = ByteSpan::trimmed(buf, start, step.offset, false);
                    self.finish_tag(kind, code, comment);
                    return if step.is_newline() {
                        LinePhase::Margin
                    } else {
                        LinePhase::Keyword { start: step.offset + 1 }
                    };
                }
                part
            }
        };
        LinePhase::Tag { kind, part: next }
    }

    /// `@` after whitespace followed by a known tag keyword and whitespace.
    fn starts_inline_tag(&self, step: &Step, buf: &[u8]) -> bool {
        if !step.is(b'@') || !self.prev_space {
            return false;
        }
        let start = step.offset + 1;
        let len = buf[start..].iter().take_while(|&&b| is_ident_byte(b)).count();
        let after = buf.get(start + len);
        TagKind::from_keyword(&buf[start..start + len]).is_some()
            && after.map_or(true, |b| b.is_ascii_whitespace())
    }

    fn push_line(&mut self, buf: &[u8], start: usize, end: usize) {
        self.block.lines.push(ByteSpan::trimmed(buf, start, end, false));
    }

    fn finish_tag(&mut self, kind: TagKind, code: Option<ByteSpan>, comment: Option<ByteSpan>) {
        match kind {
            TagKind::Param | TagKind::Throws if code.is_some() => {
                let tag = TagRegion { code, comment };
                if kind == TagKind::Param {
                    self.block.params.push(tag);
                } else {
                    self.block.throws.push(tag);
                }
            }
            TagKind::Return if comment.is_some() => {
                self.block.ret = Some(TagRegion { code: None, comment });
            }
            _ => self.truncated += 1,
        }
    }
}
