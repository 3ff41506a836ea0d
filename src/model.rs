//! Data model for parsed documentation — format-agnostic.
//!
//! Every piece of text is kept as a [`ByteSpan`] into the owning
//! [`Source`]'s buffer. Tags and description lines live in flat pools on the
//! `Source`; a [`Declaration`] refers to its slice of each pool with a
//! [`PoolRange`].

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;

/// Inclusive byte range `[start, end]` into a source buffer.
///
/// A span always covers at least one byte; absence is expressed with
/// `Option<ByteSpan>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ByteSpan {
    pub start: usize,
    pub end: usize,
}

impl ByteSpan {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted span {start}..={end}");
        Self { start, end }
    }

    /// Number of bytes covered.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Half-open range suitable for slicing.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end + 1
    }

    pub fn slice<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.range()]
    }

    /// Span of `buf[start..end]` with surrounding ASCII whitespace removed.
    /// When `stars` is set, `*` decoration is stripped as well.
    /// Returns `None` if nothing is left.
    pub fn trimmed(buf: &[u8], start: usize, end: usize, stars: bool) -> Option<Self> {
        let strip = |b: u8| b.is_ascii_whitespace() || (stars && b == b'*');
        let end = end.min(buf.len());
        let mut lo = start;
        let mut hi = end;
        while lo < hi && strip(buf[lo]) {
            lo += 1;
        }
        while hi > lo && strip(buf[hi - 1]) {
            hi -= 1;
        }
        (lo < hi).then(|| Self::new(lo, hi - 1))
    }
}

/// A `code` / `comment` pair of spans.
///
/// For a `@param` tag `code` is the parameter name and `comment` its
/// description. For a declaration's main region `comment` is the
/// doc-comment text and `code` the representative code span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TagRegion {
    pub code: Option<ByteSpan>,
    pub comment: Option<ByteSpan>,
}

/// `[first, first + count)` slice of one of the pools on [`Source`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolRange {
    pub first: usize,
    pub count: usize,
}

impl PoolRange {
    pub fn range(&self) -> Range<usize> {
        self.first..self.first + self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Visibility of a declaration.
///
/// Variants are declared from least to most visible, so the derived
/// ordering reads as "meets or exceeds": `Private < Package < Protected <
/// Public`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Private,
    #[default]
    Package,
    Protected,
    Public,
}

impl AccessLevel {
    /// Whether this level passes a filter whose threshold is `minimum`.
    pub fn meets(self, minimum: AccessLevel) -> bool {
        self >= minimum
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccessLevel::Private => "private",
            AccessLevel::Package => "package",
            AccessLevel::Protected => "protected",
            AccessLevel::Public => "public",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(AccessLevel::Private),
            "package" => Ok(AccessLevel::Package),
            "protected" => Ok(AccessLevel::Protected),
            "public" => Ok(AccessLevel::Public),
            _ => Err(format!(
                "unknown access level: {s}. Use public, protected, package or private"
            )),
        }
    }
}

/// Subkind of a scope-opening type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Extension,
}

impl TypeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Interface => "interface",
            TypeKind::Extension => "extension",
        }
    }
}

/// What a declaration declares, resolved when its signature is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Field,
    Method,
    Constructor,
    Type(TypeKind),
    /// Nothing recognisable, e.g. an initializer block.
    Unknown,
}

impl DeclKind {
    pub fn is_type(self) -> bool {
        matches!(self, DeclKind::Type(_))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Field => "field",
            DeclKind::Method => "method",
            DeclKind::Constructor => "constructor",
            DeclKind::Type(kind) => kind.as_str(),
            DeclKind::Unknown => "unknown",
        }
    }
}

/// Punctuation seen in a declaration's signature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Markers {
    pub parens: bool,
    pub equals: bool,
    pub open_brace: bool,
    pub semicolon: bool,
    pub colon: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Modifiers {
    pub is_abstract: bool,
    pub is_static: bool,
    pub is_final: bool,
    pub is_synchronized: bool,
}

/// Dialect hinted at by a declaration's keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Kotlin,
    Swift,
}

/// Source language, derived from the file name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
    Kotlin,
    Swift,
    #[default]
    Unknown,
}

impl Language {
    pub fn from_name(name: &str) -> Self {
        match Path::new(name).extension().and_then(|e| e.to_str()) {
            Some("java") => Language::Java,
            Some("kt" | "kts") => Language::Kotlin,
            Some("swift") => Language::Swift,
            _ => Language::Unknown,
        }
    }

    /// Kotlin and Swift end statements at a newline.
    pub fn newline_terminated(self) -> bool {
        matches!(self, Language::Kotlin | Language::Swift)
    }
}

/// One documented or documentable code entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub name: Option<ByteSpan>,
    /// `comment` is the doc-comment text, `code` the representative code.
    pub main: TagRegion,
    pub return_tag: Option<TagRegion>,
    /// Index of the enclosing type declaration.
    pub parent: Option<usize>,
    /// 0-based line on which the code starts.
    pub line: usize,
    pub description: PoolRange,
    pub params: PoolRange,
    pub throws: PoolRange,
    pub kind: DeclKind,
    pub markers: Markers,
    pub modifiers: Modifiers,
    /// Set on type declarations that name supertypes.
    pub inherits: bool,
    pub dialect: Option<Dialect>,
    pub access: AccessLevel,
}

impl Declaration {
    /// Scope-opening declarations may be the parent of others.
    pub fn is_parent(&self) -> bool {
        self.kind.is_type()
    }

    pub fn has_doc(&self) -> bool {
        self.main.comment.is_some()
    }
}

/// Items the scanner dropped instead of emitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Doc-comments not followed by any declaration.
    pub orphan_comments: usize,
    /// Declarations without a usable code span, name or kind.
    pub incomplete_declarations: usize,
    /// Undocumented declarations under the minimum access level.
    pub below_access: usize,
    /// `@param`/`@return`/`@throws` tags missing their required parts.
    pub truncated_tags: usize,
    /// Type scopes beyond the nesting cap.
    pub untracked_scopes: usize,
}

/// One input file: its bytes plus everything the scanner extracted from it.
#[derive(Debug, Clone, Default)]
pub struct Source {
    /// Display name, usually the file name or archive entry path.
    pub name: String,
    pub language: Language,
    buf: Vec<u8>,
    pub package_name: Option<ByteSpan>,
    pub class_name: Option<ByteSpan>,
    pub extends_name: Option<ByteSpan>,
    pub implements_names: Vec<ByteSpan>,
    pub declarations: Vec<Declaration>,
    pub params: Vec<TagRegion>,
    pub throws: Vec<TagRegion>,
    /// `None` entries are blank lines kept inside a description.
    pub description_lines: Vec<Option<ByteSpan>>,
    pub diagnostics: Diagnostics,
}

impl Source {
    pub fn new(name: impl Into<String>, buf: Vec<u8>) -> Self {
        let name = name.into();
        Self {
            language: Language::from_name(&name),
            name,
            buf,
            ..Default::default()
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Text of a span, with invalid UTF-8 replaced.
    pub fn text(&self, span: ByteSpan) -> Cow<'_, str> {
        String::from_utf8_lossy(span.slice(&self.buf))
    }

    pub fn opt_text(&self, span: Option<ByteSpan>) -> Option<Cow<'_, str>> {
        span.map(|s| self.text(s))
    }

    pub fn params_of(&self, decl: &Declaration) -> &[TagRegion] {
        &self.params[decl.params.range()]
    }

    pub fn throws_of(&self, decl: &Declaration) -> &[TagRegion] {
        &self.throws[decl.throws.range()]
    }

    pub fn description_of(&self, decl: &Declaration) -> &[Option<ByteSpan>] {
        &self.description_lines[decl.description.range()]
    }

    /// Declarations whose parent is `parent`, in source order.
    pub fn children(&self, parent: Option<usize>) -> impl Iterator<Item = (usize, &Declaration)> {
        self.declarations
            .iter()
            .enumerate()
            .filter(move |(_, d)| d.parent == parent)
    }

    /// File name without directories or the last extension.
    /// "src/Foo.java" → "Foo"
    pub fn file_stem(&self) -> &str {
        let file = self.name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(&self.name);
        match file.rfind('.') {
            Some(dot) if dot > 0 => &file[..dot],
            _ => file,
        }
    }

    /// Document title: the top-level type name, else the file stem.
    pub fn title(&self) -> Cow<'_, str> {
        match self.class_name {
            Some(span) => self.text(span),
            None => Cow::Borrowed(self.file_stem()),
        }
    }
}
