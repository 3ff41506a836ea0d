//! Retention and pooling of finalized declarations.

use super::doc_comment::DocBlock;
use crate::model::{AccessLevel, ByteSpan, DeclKind, Declaration, Diagnostics, PoolRange, Source, TagRegion};

/// Supertypes named by a type declaration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Supertypes<'a> {
    pub extends: Option<ByteSpan>,
    pub implements: &'a [ByteSpan],
}

/// Output collections for one source, filled as declarations are offered.
#[derive(Debug, Default)]
pub struct Assembler {
    min_access: AccessLevel,
    declarations: Vec<Declaration>,
    params: Vec<TagRegion>,
    throws: Vec<TagRegion>,
    description_lines: Vec<Option<ByteSpan>>,
    package_name: Option<ByteSpan>,
    class_name: Option<ByteSpan>,
    extends_name: Option<ByteSpan>,
    implements_names: Vec<ByteSpan>,
    diagnostics: Diagnostics,
}

impl Assembler {
    pub fn new(min_access: AccessLevel) -> Self {
        Self {
            min_access,
            ..Default::default()
        }
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn class_name(&self) -> Option<ByteSpan> {
        self.class_name
    }

    /// Offer a finalized declaration together with the doc-comment that
    /// preceded it. Returns its index if it was retained.
    ///
    /// A declaration is kept when it is a type, when it is documented, or
    /// when it is complete and its access level meets the minimum.
    pub fn offer(&mut self, mut decl: Declaration, supertypes: Supertypes<'_>, doc: Option<DocBlock>) -> Option<usize> {
        let is_type = decl.kind.is_type();
        let complete = decl.kind != DeclKind::Unknown && decl.name.is_some();
        let retained = is_type || doc.is_some() || (complete && decl.access.meets(self.min_access));
        if !retained {
            if complete {
                self.diagnostics.below_access += 1;
            } else {
                self.diagnostics.incomplete_declarations += 1;
            }
            tracing::debug!(line = decl.line + 1, kind = decl.kind.as_str(), complete, "dropped declaration");
            return None;
        }

        if let Some(doc) = doc {
            decl.main.comment = doc.comment;
            decl.return_tag = doc.ret;
            decl.description = append(&mut self.description_lines, doc.lines);
            decl.params = append(&mut self.params, doc.params);
            decl.throws = append(&mut self.throws, doc.throws);
        } else {
            decl.description = PoolRange { first: self.description_lines.len(), count: 0 };
            decl.params = PoolRange { first: self.params.len(), count: 0 };
            decl.throws = PoolRange { first: self.throws.len(), count: 0 };
        }

        if is_type && decl.parent.is_none() && self.class_name.is_none() {
            self.class_name = decl.name;
            self.extends_name = supertypes.extends;
            self.implements_names.extend_from_slice(supertypes.implements);
        }

        self.declarations.push(decl);
        Some(self.declarations.len() - 1)
    }

    /// A doc-comment that no declaration claimed.
    pub fn orphan(&mut self) {
        self.diagnostics.orphan_comments += 1;
    }

    pub fn truncated(&mut self, tags: usize) {
        if tags > 0 {
            tracing::debug!(tags, "dropped truncated tags");
        }
        self.diagnostics.truncated_tags += tags;
    }

    pub fn package(&mut self, name: ByteSpan) {
        self.package_name.get_or_insert(name);
    }

    /// Move everything collected into `source`.
    pub fn finish(self, source: &mut Source, untracked_scopes: usize) {
        source.package_name = self.package_name;
        source.class_name = self.class_name;
        source.extends_name = self.extends_name;
        source.implements_names = self.implements_names;
        source.declarations = self.declarations;
        source.params = self.params;
        source.throws = self.throws;
        source.description_lines = self.description_lines;
        source.diagnostics = Diagnostics {
            untracked_scopes,
            ..self.diagnostics
        };
    }
}

fn append<T>(pool: &mut Vec<T>, items: Vec<T>) -> PoolRange {
    let range = PoolRange {
        first: pool.len(),
        count: items.len(),
    };
    pool.extend(items);
    range
}
