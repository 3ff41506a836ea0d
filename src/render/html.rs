//! HTML renderer — one standalone page per source.

use crate::model::*;
use crate::render::{ordered_children, Css, RenderOptions, Renderer};
use regex::Regex;
use std::fmt::Write as _;
use std::sync::LazyLock;

static RE_INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{@(?:code|literal)\s+([^}]*)\}").unwrap());
static RE_INLINE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{@(?:link|linkplain)\s+([^}\s]*)(?:\s+([^}]*))?\}").unwrap());

pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, source: &Source, options: &RenderOptions<'_>) -> String {
        let mut out = String::new();
        let title = escape(&source.title());

        out.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>");
        out.push_str(&title);
        out.push_str("</title>");
        match &options.css {
            Css::Embed(text) => {
                out.push_str("<style>\n");
                // raw text element: references are not decoded here
                out.push_str(&text.replace("</", "<\\/"));
                out.push_str("\n</style>");
            }
            Css::Link(href) => {
                let _ = write!(out, "<link rel=\"stylesheet\" href=\"{}\">", escape(href));
            }
        }
        let _ = write!(out, "</head>\n<body><h1>{}</h1>\n", title);

        if let Some(package) = source.opt_text(source.package_name) {
            let _ = writeln!(out, "<p class=\"package\">package <code>{}</code></p>", escape(&package));
        }
        if source.extends_name.is_some() || !source.implements_names.is_empty() {
            out.push_str("<p class=\"inherits\">");
            if let Some(base) = source.opt_text(source.extends_name) {
                let _ = write!(out, "extends <code>{}</code>", escape(&base));
            }
            if !source.implements_names.is_empty() {
                if source.extends_name.is_some() {
                    out.push(' ');
                }
                out.push_str("implements ");
                let names: Vec<String> = source
                    .implements_names
                    .iter()
                    .map(|n| format!("<code>{}</code>", escape(&source.text(*n))))
                    .collect();
                out.push_str(&names.join(", "));
            }
            out.push_str("</p>\n");
        }

        render_scope(&mut out, source, None, 2, options);

        out.push_str("</body></html>\n");
        out
    }

    fn file_extension(&self) -> &str {
        "html"
    }
}

fn render_scope(out: &mut String, source: &Source, parent: Option<usize>, level: usize, options: &RenderOptions<'_>) {
    for index in ordered_children(source, parent, options.sort) {
        render_declaration(out, source, index, level, options);
    }
}

fn render_declaration(out: &mut String, source: &Source, index: usize, level: usize, options: &RenderOptions<'_>) {
    let decl = &source.declarations[index];
    let heading = level.min(6);
    let label = source
        .opt_text(decl.name)
        .or_else(|| source.opt_text(decl.main.code))
        .unwrap_or_default();

    let _ = writeln!(
        out,
        "<section class=\"decl {}\" id=\"decl-{}\">",
        decl.kind.as_str(),
        index
    );
    let _ = write!(out, "<h{heading}>{}", escape(&label));
    for badge in badges(decl) {
        let _ = write!(out, " <span class=\"badge {}\">{}</span>", badge.1, badge.0);
    }
    let _ = writeln!(out, "</h{heading}>");

    if let Some(code) = source.opt_text(decl.main.code) {
        let _ = writeln!(out, "<pre><code>{}</code></pre>", escape(&code));
    }

    render_description(out, source, source.description_of(decl));

    let params = source.params_of(decl);
    if !params.is_empty() {
        render_tag_table(out, source, "Parameter", params);
    }
    if let Some(comment) = decl.return_tag.and_then(|r| source.opt_text(r.comment)) {
        let _ = writeln!(
            out,
            "<p class=\"returns\"><strong>Returns:</strong> {}</p>",
            inline_tags(&escape(&comment))
        );
    }
    let throws = source.throws_of(decl);
    if !throws.is_empty() {
        render_tag_table(out, source, "Throws", throws);
    }

    if decl.is_parent() {
        render_scope(out, source, Some(index), level + 1, options);
    }
    out.push_str("</section>\n");
}

/// Badge texts and CSS classes: access level, modifiers, kind.
fn badges(decl: &Declaration) -> Vec<(&'static str, &'static str)> {
    let mut badges = vec![(decl.access.as_str(), decl.access.as_str())];
    let m = &decl.modifiers;
    for (set, text) in [
        (m.is_abstract, "abstract"),
        (m.is_static, "static"),
        (m.is_final, "final"),
        (m.is_synchronized, "synchronized"),
    ] {
        if set {
            badges.push((text, "modifier"));
        }
    }
    if let Some(dialect) = decl.dialect {
        badges.push((
            match dialect {
                Dialect::Kotlin => "kotlin",
                Dialect::Swift => "swift",
            },
            "dialect",
        ));
    }
    badges.push((decl.kind.as_str(), "kind"));
    badges
}

/// Description lines as paragraphs; blank lines separate paragraphs.
fn render_description(out: &mut String, source: &Source, lines: &[Option<ByteSpan>]) {
    let mut paragraph: Vec<String> = Vec::new();
    let flush = |out: &mut String, paragraph: &mut Vec<String>| {
        if !paragraph.is_empty() {
            let _ = writeln!(out, "<p>{}</p>", inline_tags(&paragraph.join("\n")));
            paragraph.clear();
        }
    };
    for line in lines {
        match line {
            Some(span) => paragraph.push(escape(&source.text(*span))),
            None => flush(out, &mut paragraph),
        }
    }
    flush(out, &mut paragraph);
}

fn render_tag_table(out: &mut String, source: &Source, header: &str, tags: &[TagRegion]) {
    let _ = writeln!(
        out,
        "<table class=\"tags\"><tr><th>{}</th><th>Description</th></tr>",
        header
    );
    for tag in tags {
        let code = source.opt_text(tag.code).unwrap_or_default();
        let comment = source.opt_text(tag.comment).unwrap_or_default();
        let _ = writeln!(
            out,
            "<tr><td><code>{}</code></td><td>{}</td></tr>",
            escape(&code),
            inline_tags(&escape(&comment))
        );
    }
    out.push_str("</table>\n");
}

/// Rewrite `{@code x}` and `{@link X label}` in already escaped text.
fn inline_tags(escaped: &str) -> String {
    let code = RE_INLINE_CODE.replace_all(escaped, "<code>$1</code>");
    RE_INLINE_LINK
        .replace_all(&code, |caps: &regex::Captures| match caps.get(2) {
            Some(label) if !label.as_str().trim().is_empty() => label.as_str().trim().to_string(),
            _ => format!("<code>{}</code>", &caps[1]),
        })
        .into_owned()
}

/// Escape text for HTML.
///
/// Non-ASCII characters pass through. ASCII control characters other than
/// newline and tab, DEL, and `& < > "` become `&#xNN;` references. NUL is
/// dropped.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\0' => {}
            '\n' | '\t' => out.push(c),
            '&' | '<' | '>' | '"' | '\u{1}'..='\u{1f}' | '\u{7f}' => {
                let _ = write!(out, "&#x{:02x};", c as u32);
            }
            _ => out.push(c),
        }
    }
    out
}
