//! Declaration classifier — sees only code (never comments or literals).
//!
//! Phases and their transitions:
//!
//! | phase          | input                      | next                         |
//! |----------------|----------------------------|------------------------------|
//! | `Idle`         | `@name`                    | `Annotation`                 |
//! | `Idle`         | `{`                        | `Body` (stray block)         |
//! | `Idle`         | other non-space            | `Signature`                  |
//! | `Annotation`   | space at paren depth 0     | `Idle`                       |
//! | `Signature`    | first word `package`/`import` | `Directive`               |
//! | `Signature`    | `;`                        | finalize, `Idle`             |
//! | `Signature`    | `{` (type)                 | finalize, enter scope, `Idle`|
//! | `Signature`    | `{` (other)                | finalize, `Body`             |
//! | `Signature`    | `=`                        | `Initializer`                |
//! | `Signature`    | end of line (see below)    | finalize, `AwaitBrace`       |
//! | `Initializer`  | `;` / end of statement     | finalize, `Idle`             |
//! | `Initializer`  | end of line (property)     | finalize, `AwaitBrace`       |
//! | `Body`         | matching `}`               | `Idle`                       |
//! | `AwaitBrace`   | `{`                        | scope or `Body`              |
//! | `AwaitBrace`   | `get`/`set`/... (property) | `Accessor`                   |
//! | `AwaitBrace`   | other non-space            | `Idle` (re-dispatched)       |
//! | `Accessor`     | end of line outside blocks | `AwaitBrace`                 |
//! | `Directive`    | `;` or end of line         | `Idle`                       |
//!
//! A signature ends at a line end (outside parentheses) once it has seen a
//! parenthesis, or, for newline-terminated dialects, whenever the line does
//! not end in a continuation character.

use super::assemble::Supertypes;
use super::cursor::Step;
use super::nesting::ScopeStack;
use crate::model::{AccessLevel, ByteSpan, DeclKind, Dialect, Language, Markers, Modifiers, TypeKind};

/// Everything the classifier needs from the scan it is part of.
pub trait Sink {
    fn buf(&self) -> &[u8];
    fn language(&self) -> Language;
    fn scopes(&mut self) -> &mut ScopeStack;
    /// Hand over a finished signature whose terminator is at `end`.
    /// Returns the declaration's index when it is a retained type that
    /// may open a scope.
    fn finalize(&mut self, sig: Signature, end: usize) -> Option<usize>;
    /// Record the file's package name.
    fn package(&mut self, name: ByteSpan);
    /// Drop any doc-comment waiting for a declaration.
    fn discard_doc(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Fun,
    Func,
    Var,
    Val,
    Let,
    Final,
    Static,
    Abstract,
    Synchronized,
    Type(TypeKind, Option<Dialect>),
    Extends,
    Implements,
    Access(AccessLevel),
    Package,
    Import,
}

const KEYWORDS: &[(&str, Keyword)] = &[
    ("fun", Keyword::Fun),
    ("func", Keyword::Func),
    ("var", Keyword::Var),
    ("val", Keyword::Val),
    ("let", Keyword::Let),
    ("final", Keyword::Final),
    ("static", Keyword::Static),
    ("abstract", Keyword::Abstract),
    ("synchronized", Keyword::Synchronized),
    ("class", Keyword::Type(TypeKind::Class, None)),
    ("enum", Keyword::Type(TypeKind::Class, None)),
    ("struct", Keyword::Type(TypeKind::Struct, None)),
    ("interface", Keyword::Type(TypeKind::Interface, None)),
    ("protocol", Keyword::Type(TypeKind::Interface, Some(Dialect::Swift))),
    ("extension", Keyword::Type(TypeKind::Extension, None)),
    ("object", Keyword::Type(TypeKind::Class, Some(Dialect::Kotlin))),
    ("companion", Keyword::Static),
    ("record", Keyword::Type(TypeKind::Class, None)),
    ("actor", Keyword::Type(TypeKind::Class, Some(Dialect::Swift))),
    ("extends", Keyword::Extends),
    ("implements", Keyword::Implements),
    ("public", Keyword::Access(AccessLevel::Public)),
    ("open", Keyword::Access(AccessLevel::Public)),
    ("protected", Keyword::Access(AccessLevel::Protected)),
    ("internal", Keyword::Access(AccessLevel::Package)),
    ("private", Keyword::Access(AccessLevel::Private)),
    ("fileprivate", Keyword::Access(AccessLevel::Private)),
    ("package", Keyword::Package),
    ("import", Keyword::Import),
];

fn keyword(word: &[u8]) -> Option<Keyword> {
    KEYWORDS
        .iter()
        .find(|(text, _)| text.as_bytes() == word)
        .map(|&(_, kw)| kw)
}

/// Keywords that are ordinary identifiers outside their own language
/// (`Object object;`, `var actor: Actor`). They only count there, and only
/// when a name or `{` follows.
const CONTEXTUAL: &[(&str, Language)] = &[
    ("object", Language::Kotlin),
    ("companion", Language::Kotlin),
    ("record", Language::Java),
    ("actor", Language::Swift),
];

fn contextual_fits(word: &[u8], next: Option<u8>, language: Language) -> bool {
    match CONTEXTUAL.iter().find(|(text, _)| text.as_bytes() == word) {
        None => true,
        Some(&(_, home)) => {
            (language == home || language == Language::Unknown)
                && next.is_some_and(|b| b == b'{' || b == b'_' || b.is_ascii_alphabetic())
        }
    }
}

/// What the keywords say a declaration is; the last such keyword wins, so
/// Swift `class func` is a method and Kotlin `fun interface` a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Method,
    Field,
    Type(TypeKind),
}

/// A declaration's signature as it is being read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub code_start: usize,
    pub line: usize,
    /// Frozen end of the representative code, set at `=`.
    code_end: Option<usize>,
    /// Last byte of the last non-space code unit.
    last_code: usize,
    pub name: Option<ByteSpan>,
    pub markers: Markers,
    pub modifiers: Modifiers,
    pub access: Option<AccessLevel>,
    pub dialect: Option<Dialect>,
    pub role: Option<Role>,
    /// `extends` or `implements` seen.
    pub inherits_keyword: bool,
    supertypes: Vec<ByteSpan>,
    /// Index into `supertypes` where an `implements` list starts.
    implements_at: Option<usize>,
    words: usize,
    paren_depth: usize,
    angle_depth: usize,
    collecting_supertypes: bool,
    expect_supertype: bool,
    extend_supertype: bool,
    last_significant: u8,
}

impl Signature {
    pub fn new(step: &Step) -> Self {
        Self {
            code_start: step.offset,
            line: step.line,
            code_end: None,
            last_code: step.last(),
            name: None,
            markers: Markers::default(),
            modifiers: Modifiers::default(),
            access: None,
            dialect: None,
            role: None,
            inherits_keyword: false,
            supertypes: Vec::new(),
            implements_at: None,
            words: 0,
            paren_depth: 0,
            angle_depth: 0,
            collecting_supertypes: false,
            expect_supertype: false,
            extend_supertype: false,
            last_significant: step.byte().unwrap_or(b'a'),
        }
    }

    /// Representative code span.
    pub fn code(&self) -> ByteSpan {
        ByteSpan::new(self.code_start, self.code_end.unwrap_or(self.last_code))
    }

    /// The superclass, if one is named before any `implements`, and the
    /// remaining supertypes.
    pub fn supertypes(&self) -> Supertypes<'_> {
        let split = match self.implements_at {
            Some(0) => None,
            _ => self.supertypes.split_first(),
        };
        match split {
            Some((first, rest)) => Supertypes {
                extends: Some(*first),
                implements: rest,
            },
            None => Supertypes {
                extends: None,
                implements: &self.supertypes,
            },
        }
    }

    /// Declaration kind, given the name of the enclosing type.
    ///
    /// Without a role keyword, parentheses before any `=` make a method
    /// whether or not a body follows, so abstract and interface methods
    /// (`void f();`) are methods rather than fields.
    pub fn resolve_kind(&self, buf: &[u8], enclosing: Option<&[u8]>) -> DeclKind {
        let callable = match self.role {
            Some(Role::Type(kind)) => return DeclKind::Type(kind),
            Some(Role::Field) => return DeclKind::Field,
            Some(Role::Method) => true,
            None => self.markers.parens && !self.markers.equals,
        };
        if callable {
            let name = self.name.map(|n| n.slice(buf));
            let is_constructor = match name {
                Some(b"init" | b"constructor") => true,
                Some(n) => enclosing == Some(n),
                None => false,
            };
            if is_constructor {
                DeclKind::Constructor
            } else {
                DeclKind::Method
            }
        } else if self.markers.semicolon || self.markers.equals {
            DeclKind::Field
        } else {
            DeclKind::Unknown
        }
    }

    /// Once any of these is seen, later identifiers are not the name.
    fn structural(&self) -> bool {
        let m = &self.markers;
        m.colon || m.semicolon || m.open_brace || m.parens || m.equals || self.inherits_keyword
    }

    fn note(&mut self, step: &Step) {
        self.last_code = step.last();
        self.last_significant = step.byte().unwrap_or(b'a');
    }

    fn apply(&mut self, kw: Keyword) {
        match kw {
            Keyword::Fun => self.member(Role::Method, Dialect::Kotlin),
            Keyword::Func => self.member(Role::Method, Dialect::Swift),
            Keyword::Var => self.member(Role::Field, Dialect::Kotlin),
            Keyword::Val => {
                self.member(Role::Field, Dialect::Kotlin);
                self.modifiers.is_final = true;
            }
            Keyword::Let => {
                self.member(Role::Field, Dialect::Swift);
                self.modifiers.is_final = true;
            }
            Keyword::Final => self.modifiers.is_final = true,
            Keyword::Static => self.modifiers.is_static = true,
            Keyword::Abstract => self.modifiers.is_abstract = true,
            Keyword::Synchronized => self.modifiers.is_synchronized = true,
            Keyword::Type(kind, dialect) => {
                self.role = Some(Role::Type(kind));
                if dialect.is_some() {
                    self.dialect = dialect;
                }
            }
            Keyword::Extends | Keyword::Implements => {
                if kw == Keyword::Implements {
                    self.implements_at.get_or_insert(self.supertypes.len());
                }
                self.inherits_keyword = true;
                self.collecting_supertypes = true;
                self.expect_supertype = true;
            }
            Keyword::Access(level) => self.access = Some(level),
            Keyword::Package | Keyword::Import => {}
        }
    }

    fn member(&mut self, role: Role, dialect: Dialect) {
        self.role = Some(role);
        self.dialect = Some(dialect);
    }

    fn ident(&mut self, span: ByteSpan) {
        if self.collecting_supertypes && self.angle_depth == 0 {
            if self.extend_supertype {
                if let Some(last) = self.supertypes.last_mut() {
                    last.end = span.end;
                }
            } else if self.expect_supertype {
                self.supertypes.push(span);
            }
            self.expect_supertype = false;
            self.extend_supertype = false;
        }
        if !self.structural() {
            self.name = Some(span);
        }
    }

    /// `val`/`var`/`let` declarations may be followed by accessors.
    fn is_property(&self) -> bool {
        self.role == Some(Role::Field)
    }

    fn ends_in_continuation(&self) -> bool {
        matches!(self.last_significant, b',' | b':' | b'=' | b'.' | b'(')
    }
}

#[derive(Debug)]
enum Phase {
    Idle,
    Annotation { parens: usize },
    Signature(Signature),
    Initializer { sig: Signature, depth: usize },
    /// Skipping the block whose `{` brought the brace depth to `depth`.
    Body { depth: usize },
    /// A signature ended at a line end; a `{` may still follow, or, after
    /// a property, its accessors.
    AwaitBrace { scope: Option<usize>, property: bool },
    /// Skipping a property accessor (`get() = ..`, `set(value) { .. }`).
    Accessor { depth: usize },
    Directive { package: bool, name: Option<ByteSpan> },
}

pub struct Classifier {
    phase: Phase,
    word: Option<usize>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            word: None,
        }
    }

    /// Whether a doc-comment may attach here. Comments inside bodies and
    /// initializers are plain comments.
    pub fn accepts_doc(&self) -> bool {
        !matches!(
            self.phase,
            Phase::Body { .. } | Phase::Initializer { .. } | Phase::Accessor { .. }
        )
    }

    /// A doc-comment opened: hand over whatever signature is in progress.
    pub fn doc_opened<S: Sink>(&mut self, offset: usize, sink: &mut S) {
        self.end_word(offset, sink);
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Signature(sig) | Phase::Initializer { sig, .. } => {
                sink.finalize(sig, offset);
            }
            Phase::Directive { package: true, name: Some(name) } => sink.package(name),
            _ => {}
        }
    }

    /// A comment or literal starts at `offset`; it ends any word in progress.
    pub fn separator<S: Sink>(&mut self, step: &Step, sink: &mut S) {
        self.end_word(step.offset, sink);
        match &mut self.phase {
            Phase::Idle if step.byte().is_some_and(|b| b == b'"' || b == b'\'') => {
                self.phase = Phase::Signature(Signature::new(step));
            }
            Phase::Signature(sig) if !step.is(b'/') => sig.note(step),
            // a literal value completes the initializer's line
            Phase::Initializer { sig, .. } if !step.is(b'/') => sig.last_significant = b'"',
            _ => {}
        }
    }

    pub fn feed<S: Sink>(&mut self, step: &Step, sink: &mut S) {
        if step.is_ident() {
            self.word.get_or_insert(step.offset);
        } else {
            self.end_word(step.offset, sink);
        }
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        self.phase = self.advance(phase, step, sink);
    }

    /// End of input: finalize what is still open.
    pub fn finish<S: Sink>(&mut self, len: usize, sink: &mut S) {
        self.end_word(len, sink);
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Signature(sig) | Phase::Initializer { sig, .. } => {
                sink.finalize(sig, len);
            }
            Phase::Directive { package: true, name: Some(name) } => sink.package(name),
            _ => {}
        }
    }

    fn end_word<S: Sink>(&mut self, offset: usize, sink: &mut S) {
        if let Some(start) = self.word.take() {
            self.on_word(ByteSpan::new(start, offset - 1), sink);
        }
    }

    fn on_word<S: Sink>(&mut self, span: ByteSpan, sink: &mut S) {
        let buf = sink.buf();
        let word = span.slice(buf);
        let kw = keyword(word)
            .filter(|_| contextual_fits(word, next_significant(buf, span.end + 1), sink.language()));
        match &mut self.phase {
            Phase::Signature(sig) => {
                match kw {
                    Some(kw @ (Keyword::Package | Keyword::Import)) if sig.words == 0 => {
                        self.phase = Phase::Directive {
                            package: kw == Keyword::Package,
                            name: None,
                        };
                        sink.discard_doc();
                        return;
                    }
                    Some(kw) if sig.paren_depth == 0 => sig.apply(kw),
                    Some(_) => {}
                    None => sig.ident(span),
                }
                sig.words += 1;
            }
            Phase::Directive { package: true, name } => {
                *name = Some(match name {
                    Some(prev) => ByteSpan::new(prev.start, span.end),
                    None => span,
                });
            }
            _ => {}
        }
    }

    fn advance<S: Sink>(&mut self, phase: Phase, step: &Step, sink: &mut S) -> Phase {
        match phase {
            Phase::Idle => self.idle(step, sink),
            Phase::Annotation { parens } => match step.byte() {
                Some(b'(') => Phase::Annotation { parens: parens + 1 },
                Some(b')') if parens <= 1 => Phase::Idle,
                Some(b')') => Phase::Annotation { parens: parens - 1 },
                _ if parens > 0 || step.is_ident() => Phase::Annotation { parens },
                Some(b'.' | b':') => Phase::Annotation { parens },
                _ if step.is_space() => Phase::Idle,
                _ => self.idle(step, sink),
            },
            Phase::Signature(sig) => self.signature(sig, step, sink),
            Phase::Initializer { sig, depth } => self.initializer(sig, depth, step, sink),
            Phase::Body { depth } => match step.byte() {
                Some(b'{') => {
                    sink.scopes().open_brace();
                    Phase::Body { depth }
                }
                Some(b'}') => {
                    let closes = sink.scopes().depth() == depth;
                    sink.scopes().close_brace();
                    if closes {
                        Phase::Idle
                    } else {
                        Phase::Body { depth }
                    }
                }
                _ => Phase::Body { depth },
            },
            Phase::AwaitBrace { scope, property } => {
                if step.is_space() {
                    Phase::AwaitBrace { scope, property }
                } else if step.is(b'{') {
                    self.open_block(scope, sink)
                } else if property && starts_accessor(sink.buf(), step.offset) {
                    Phase::Accessor { depth: 0 }
                } else {
                    self.idle(step, sink)
                }
            }
            Phase::Accessor { depth } => match step.byte() {
                Some(b'(' | b'[') => Phase::Accessor { depth: depth + 1 },
                Some(b')' | b']') => Phase::Accessor { depth: depth.saturating_sub(1) },
                Some(b'{') => {
                    sink.scopes().open_brace();
                    Phase::Accessor { depth: depth + 1 }
                }
                // closes the enclosing type
                Some(b'}') if depth == 0 => {
                    sink.scopes().close_brace();
                    Phase::Idle
                }
                Some(b'}') => {
                    sink.scopes().close_brace();
                    Phase::Accessor { depth: depth - 1 }
                }
                Some(b'\n') if depth == 0 => Phase::AwaitBrace { scope: None, property: true },
                _ => Phase::Accessor { depth },
            },
            Phase::Directive { package, name } => match step.byte() {
                Some(b';' | b'\n') => {
                    if let (true, Some(name)) = (package, name) {
                        sink.package(name);
                    }
                    Phase::Idle
                }
                _ => Phase::Directive { package, name },
            },
        }
    }

    fn idle<S: Sink>(&mut self, step: &Step, sink: &mut S) -> Phase {
        if step.is_space() {
            return Phase::Idle;
        }
        match step.byte() {
            Some(b'@') if !sink.buf()[step.offset + 1..].starts_with(b"interface") => {
                Phase::Annotation { parens: 0 }
            }
            Some(b'{') => {
                let depth = sink.scopes().open_brace();
                Phase::Body { depth }
            }
            Some(b'}') => {
                sink.scopes().close_brace();
                Phase::Idle
            }
            Some(b';' | b',') => Phase::Idle,
            _ => {
                let sig = Signature::new(step);
                self.signature(sig, step, sink)
            }
        }
    }

    fn signature<S: Sink>(&mut self, mut sig: Signature, step: &Step, sink: &mut S) -> Phase {
        let Some(b) = step.byte().filter(|_| !step.is_ident()) else {
            sig.note(step);
            return Phase::Signature(sig);
        };
        let top = sig.paren_depth == 0;
        match b {
            b'\n' => return self.line_end(sig, step, sink),
            b' ' | b'\t' | b'\r' => return Phase::Signature(sig),
            b'(' => {
                sig.markers.parens = true;
                sig.paren_depth += 1;
            }
            b')' => sig.paren_depth = sig.paren_depth.saturating_sub(1),
            b'{' if top => {
                sig.markers.open_brace = true;
                let scope = sink.finalize(sig, step.offset);
                return self.open_block(scope, sink);
            }
            b'}' if top => {
                sink.finalize(sig, step.offset);
                sink.scopes().close_brace();
                return Phase::Idle;
            }
            b'{' => {
                sink.scopes().open_brace();
            }
            b'}' => sink.scopes().close_brace(),
            b';' if top => {
                sig.markers.semicolon = true;
                sink.finalize(sig, step.offset);
                return Phase::Idle;
            }
            b'=' if top => {
                sig.markers.equals = true;
                sig.code_end = Some(sig.last_code);
                sig.last_significant = b'=';
                return Phase::Initializer { sig, depth: 0 };
            }
            b':' if top => {
                sig.markers.colon = true;
                if matches!(sig.role, Some(Role::Type(_))) {
                    sig.collecting_supertypes = true;
                    sig.expect_supertype = true;
                }
            }
            b',' if top && sig.collecting_supertypes && sig.angle_depth == 0 => {
                sig.expect_supertype = true;
            }
            b'.' => {
                let follows_supertype = sig
                    .supertypes
                    .last()
                    .is_some_and(|s| s.end + 1 == step.offset);
                if sig.collecting_supertypes && follows_supertype {
                    sig.extend_supertype = true;
                }
            }
            b'<' => sig.angle_depth += 1,
            b'>' if sig.last_significant != b'-' => {
                sig.angle_depth = sig.angle_depth.saturating_sub(1);
            }
            _ => {}
        }
        sig.note(step);
        Phase::Signature(sig)
    }

    fn line_end<S: Sink>(&mut self, sig: Signature, step: &Step, sink: &mut S) -> Phase {
        if sig.paren_depth > 0 {
            return Phase::Signature(sig);
        }
        let ends = if sig.markers.parens {
            true
        } else {
            newline_terminated(&sig, sink)
                && sig.words > 0
                && !sig.ends_in_continuation()
                && next_significant(sink.buf(), step.offset + 1) != Some(b':')
        };
        if ends {
            let property = sig.is_property();
            let scope = sink.finalize(sig, step.offset);
            Phase::AwaitBrace { scope, property }
        } else {
            Phase::Signature(sig)
        }
    }

    fn initializer<S: Sink>(&mut self, mut sig: Signature, depth: usize, step: &Step, sink: &mut S) -> Phase {
        let Some(b) = step.byte() else {
            sig.last_significant = b'a';
            return Phase::Initializer { sig, depth };
        };
        let depth = match b {
            b'(' | b'[' => depth + 1,
            b'{' => {
                sink.scopes().open_brace();
                depth + 1
            }
            b')' | b']' => depth.saturating_sub(1),
            b'}' if depth > 0 => {
                sink.scopes().close_brace();
                depth - 1
            }
            b'}' => {
                sink.finalize(sig, step.offset);
                sink.scopes().close_brace();
                return Phase::Idle;
            }
            b';' if depth == 0 => {
                sig.markers.semicolon = true;
                sink.finalize(sig, step.offset);
                return Phase::Idle;
            }
            b'\n' if depth == 0
                && newline_terminated(&sig, sink)
                && !sig.ends_in_continuation()
                && !matches!(
                    next_significant(sink.buf(), step.offset + 1),
                    Some(b'.' | b'?' | b':' | b'&' | b'|' | b'+')
                ) =>
            {
                let property = sig.is_property();
                sink.finalize(sig, step.offset);
                return if property {
                    Phase::AwaitBrace { scope: None, property }
                } else {
                    Phase::Idle
                };
            }
            _ => depth,
        };
        if !step.is_space() {
            sig.last_significant = b;
        }
        Phase::Initializer { sig, depth }
    }

    /// A `{` right after a finalized signature: enter the type's scope or
    /// skip the body.
    fn open_block<S: Sink>(&mut self, scope: Option<usize>, sink: &mut S) -> Phase {
        let depth = sink.scopes().open_brace();
        match scope {
            Some(decl) => {
                sink.scopes().enter(decl);
                Phase::Idle
            }
            None => Phase::Body { depth },
        }
    }
}

fn newline_terminated<S: Sink>(sig: &Signature, sink: &S) -> bool {
    sig.dialect.is_some() || sink.language().newline_terminated()
}

/// Whether a property accessor (`get`, `set`, `willSet`, `didSet`, possibly
/// behind access modifiers) starts at `at`.
fn starts_accessor(buf: &[u8], mut at: usize) -> bool {
    loop {
        let rest = buf.get(at..).unwrap_or_default();
        let len = rest
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
            .count();
        match &rest[..len] {
            b"get" | b"set" | b"willSet" | b"didSet" => {
                let after = rest[len..].iter().copied().find(|&b| b != b' ' && b != b'\t');
                return matches!(after, None | Some(b'(' | b'{' | b'=' | b'\n' | b'\r' | b'}' | b';'));
            }
            b"private" | b"protected" | b"internal" | b"public" | b"fileprivate" => {
                let spaces = rest[len..].iter().take_while(|&&b| b == b' ' || b == b'\t').count();
                if spaces == 0 {
                    return false;
                }
                at += len + spaces;
            }
            _ => return false,
        }
    }
}

/// First non-whitespace byte at or after `from`.
fn next_significant(buf: &[u8], from: usize) -> Option<u8> {
    buf.get(from..)?
        .iter()
        .copied()
        .find(|b| !b.is_ascii_whitespace())
}
