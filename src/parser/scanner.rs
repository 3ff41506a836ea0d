//! The single forward pass over a source buffer.
//!
//! Every unit goes through the region machine first. Code units are handed
//! to the classifier, doc-comment units to the doc collector; everything
//! else is skipped.

use super::assemble::Assembler;
use super::classify::{Classifier, Signature, Sink};
use super::cursor::Cursor;
use super::doc_comment::{DocBlock, DocCollector};
use super::nesting::ScopeStack;
use super::region::{self, Opener, Region};
use super::ParseOptions;
use crate::model::{AccessLevel, ByteSpan, DeclKind, Declaration, Language, Source, TagRegion, TypeKind};

/// Scan state shared between the region loop and the classifier.
struct Context<'a> {
    buf: &'a [u8],
    language: Language,
    /// Constructor name used at file scope when no type has been seen.
    stem: &'a str,
    scopes: ScopeStack,
    assembler: Assembler,
    pending_doc: Option<DocBlock>,
}

impl Context<'_> {
    fn doc_closed(&mut self, block: DocBlock, truncated: usize) {
        self.assembler.truncated(truncated);
        if self.pending_doc.replace(block).is_some() {
            self.assembler.orphan();
        }
    }

    fn default_access(&self, parent: Option<DeclKind>, sig: &Signature) -> AccessLevel {
        if parent == Some(DeclKind::Type(TypeKind::Interface)) {
            return AccessLevel::Public;
        }
        let kotlin = match sig.dialect {
            Some(dialect) => dialect == crate::model::Dialect::Kotlin,
            None => self.language == Language::Kotlin,
        };
        if kotlin {
            AccessLevel::Public
        } else {
            AccessLevel::Package
        }
    }
}

impl Sink for Context<'_> {
    fn buf(&self) -> &[u8] {
        self.buf
    }

    fn language(&self) -> Language {
        self.language
    }

    fn scopes(&mut self) -> &mut ScopeStack {
        &mut self.scopes
    }

    fn finalize(&mut self, sig: Signature, _end: usize) -> Option<usize> {
        let buf = self.buf;
        let parent = self.scopes.parent();
        let parent_decl = parent.map(|p| &self.assembler.declarations()[p]);
        let enclosing = match parent_decl {
            Some(decl) => decl.name.map(|n| n.slice(buf)),
            None => Some(match self.assembler.class_name() {
                Some(name) => name.slice(buf),
                None => self.stem.as_bytes(),
            }),
        };
        let kind = sig.resolve_kind(buf, enclosing);
        let access = sig
            .access
            .unwrap_or_else(|| self.default_access(parent_decl.map(|d| d.kind), &sig));

        let decl = Declaration {
            name: sig.name,
            main: TagRegion {
                code: Some(sig.code()),
                comment: None,
            },
            return_tag: None,
            parent,
            line: sig.line,
            description: Default::default(),
            params: Default::default(),
            throws: Default::default(),
            kind,
            markers: sig.markers,
            modifiers: sig.modifiers,
            inherits: kind.is_type() && (sig.inherits_keyword || sig.markers.colon),
            dialect: sig.dialect,
            access,
        };
        let doc = self.pending_doc.take();
        let index = self.assembler.offer(decl, sig.supertypes(), doc)?;
        kind.is_type().then_some(index)
    }

    fn package(&mut self, name: ByteSpan) {
        self.assembler.package(name);
    }

    fn discard_doc(&mut self) {
        if self.pending_doc.take().is_some() {
            self.assembler.orphan();
        }
    }
}

/// Scan `source`'s buffer and store the results on it.
pub fn scan(source: &mut Source, options: &ParseOptions) {
    let (assembler, untracked) = {
        let buf = source.bytes();
        let mut ctx = Context {
            buf,
            language: source.language,
            stem: source.file_stem(),
            scopes: ScopeStack::new(options.max_nesting),
            assembler: Assembler::new(options.min_access),
            pending_doc: None,
        };
        let mut classifier = Classifier::new();
        let mut cursor = Cursor::new(buf);
        let mut region = Region::Code;
        let mut doc: Option<DocCollector> = None;

        while let Some(step) = cursor.next() {
            match region {
                Region::Code => match region::open(&step, &mut cursor) {
                    Some(Opener::DocComment { body }) if classifier.accepts_doc() => {
                        classifier.doc_opened(step.offset, &mut ctx);
                        doc = Some(DocCollector::new(body));
                        region = Region::DocComment;
                    }
                    // inside a body or initializer it is an ordinary comment
                    Some(Opener::DocComment { .. }) => region = Region::BlockComment,
                    Some(opener) => {
                        classifier.separator(&step, &mut ctx);
                        region = Region::entered_by(opener);
                    }
                    None => classifier.feed(&step, &mut ctx),
                },
                Region::LineComment => {
                    if step.is_newline() {
                        region = Region::Code;
                        classifier.feed(&step, &mut ctx);
                    }
                }
                Region::BlockComment => {
                    if region::closes_comment(&step, &mut cursor) {
                        region = Region::Code;
                    }
                }
                Region::DocComment => {
                    if region::closes_comment(&step, &mut cursor) {
                        if let Some(collector) = doc.take() {
                            let (block, truncated) = collector.close(step.offset, buf);
                            ctx.doc_closed(block, truncated);
                        }
                        region = Region::Code;
                    } else if let Some(collector) = doc.as_mut() {
                        collector.feed(&step, buf);
                    }
                }
                Region::Literal { quote, escaped } => {
                    region = Region::literal_step(quote, escaped, &step);
                    if region == Region::Code && step.is_newline() {
                        classifier.feed(&step, &mut ctx);
                    }
                }
                Region::TextBlock { escaped } => {
                    region = Region::text_block_step(escaped, &step, &mut cursor);
                }
            }
        }

        if let Some(collector) = doc.take() {
            tracing::debug!(file = %source.name, "unterminated doc-comment");
            ctx.assembler.truncated(collector.abandon());
            ctx.assembler.orphan();
        }
        classifier.finish(buf.len(), &mut ctx);
        ctx.discard_doc();
        (ctx.assembler, ctx.scopes.untracked())
    };

    if untracked > 0 {
        tracing::warn!(
            file = %source.name,
            scopes = untracked,
            cap = options.max_nesting,
            "type nesting exceeds the cap; members attributed to the outer type"
        );
    }
    assembler.finish(source, untracked);
    tracing::debug!(
        file = %source.name,
        declarations = source.declarations.len(),
        diagnostics = ?source.diagnostics,
        "scanned"
    );
}
