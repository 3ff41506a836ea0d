//! JSON renderer — structured output for tooling integration.
//!
//! Spans are resolved to text and members are nested under their type, so
//! consumers never need the source buffer.

use crate::model::*;
use crate::render::{ordered_children, RenderOptions, Renderer, SortOrder};
use serde::Serialize;

pub struct JsonRenderer;

#[derive(Serialize)]
struct SourceView<'a> {
    name: &'a str,
    language: Language,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    package: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extends: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    implements: Vec<String>,
    declarations: Vec<DeclarationView>,
    diagnostics: Diagnostics,
}

#[derive(Serialize)]
struct DeclarationView {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    kind: &'static str,
    access: AccessLevel,
    modifiers: Modifiers,
    #[serde(skip_serializing_if = "Option::is_none")]
    dialect: Option<Dialect>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    inherits: bool,
    /// 1-based.
    line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    description: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    params: Vec<TagView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    returns: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    throws: Vec<TagView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    members: Vec<DeclarationView>,
}

#[derive(Serialize)]
struct TagView {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Renderer for JsonRenderer {
    fn render(&self, source: &Source, options: &RenderOptions<'_>) -> String {
        let text = |span: Option<ByteSpan>| source.opt_text(span).map(|t| t.into_owned());
        let view = SourceView {
            name: &source.name,
            language: source.language,
            title: source.title().into_owned(),
            package: text(source.package_name),
            extends: text(source.extends_name),
            implements: source
                .implements_names
                .iter()
                .map(|n| source.text(*n).into_owned())
                .collect(),
            declarations: scope(source, None, options.sort),
            diagnostics: source.diagnostics,
        };
        // plain owned data; serialization cannot fail
        let mut out = serde_json::to_string_pretty(&view).unwrap_or_default();
        out.push('\n');
        out
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

fn scope(source: &Source, parent: Option<usize>, sort: SortOrder) -> Vec<DeclarationView> {
    ordered_children(source, parent, sort)
        .into_iter()
        .map(|index| declaration(source, index, sort))
        .collect()
}

fn declaration(source: &Source, index: usize, sort: SortOrder) -> DeclarationView {
    let decl = &source.declarations[index];
    let text = |span: Option<ByteSpan>| source.opt_text(span).map(|t| t.into_owned());
    let tags = |tags: &[TagRegion]| -> Vec<TagView> {
        tags.iter()
            .map(|t| TagView {
                name: text(t.code).unwrap_or_default(),
                description: text(t.comment),
            })
            .collect()
    };
    DeclarationView {
        name: text(decl.name),
        kind: decl.kind.as_str(),
        access: decl.access,
        modifiers: decl.modifiers,
        dialect: decl.dialect,
        inherits: decl.inherits,
        line: decl.line + 1,
        code: text(decl.main.code),
        comment: text(decl.main.comment),
        description: source
            .description_of(decl)
            .iter()
            .map(|line| text(*line).unwrap_or_default())
            .collect(),
        params: tags(source.params_of(decl)),
        returns: decl.return_tag.and_then(|r| text(r.comment)),
        throws: tags(source.throws_of(decl)),
        members: if decl.is_parent() {
            scope(source, Some(index), sort)
        } else {
            Vec::new()
        },
    }
}
