//! Renderer module — trait-based format dispatch.

pub mod html;
pub mod json;

use crate::model::Source;
use anyhow::{anyhow, Result};
use std::cmp::Ordering;

/// Stylesheet used when no `style.css` is supplied.
pub const BUILTIN_CSS: &str = include_str!("style.css");

/// Member order within each scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SortOrder {
    /// Source order.
    #[default]
    Content,
    /// Alphabetical by name; nested types keep their place.
    Alpha,
}

/// The stylesheet an HTML page embeds or links to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    /// File name the page links to when the sheet is not embedded.
    pub name: String,
    pub text: String,
}

impl Stylesheet {
    pub fn builtin() -> Self {
        Self {
            name: "style.css".to_string(),
            text: BUILTIN_CSS.to_string(),
        }
    }
}

/// How an HTML page gets its stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Css<'a> {
    /// Inline the sheet's text in a `<style>` element.
    Embed(&'a str),
    /// Link to the sheet at this relative URL.
    Link(String),
}

pub struct RenderOptions<'a> {
    pub css: Css<'a>,
    pub sort: SortOrder,
}

/// Trait for rendering a parsed source into a specific output format.
pub trait Renderer: Send + Sync {
    fn render(&self, source: &Source, options: &RenderOptions<'_>) -> String;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "html" => Ok(Box::new(html::HtmlRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use html or json", format)),
    }
}

/// Indices of the declarations directly under `parent`, in display order.
pub fn ordered_children(source: &Source, parent: Option<usize>, sort: SortOrder) -> Vec<usize> {
    let mut order: Vec<usize> = source.children(parent).map(|(i, _)| i).collect();
    if sort == SortOrder::Alpha {
        let slots: Vec<usize> = (0..order.len())
            .filter(|&slot| !source.declarations[order[slot]].is_parent())
            .collect();
        let mut members: Vec<usize> = slots.iter().map(|&slot| order[slot]).collect();
        members.sort_by(|&a, &b| compare_names(source, a, b));
        for (slot, member) in slots.into_iter().zip(members) {
            order[slot] = member;
        }
    }
    order
}

fn compare_names(source: &Source, a: usize, b: usize) -> Ordering {
    let key = |i: usize| {
        let decl = &source.declarations[i];
        source
            .opt_text(decl.name.or(decl.main.code))
            .map(|t| t.to_lowercase())
            .unwrap_or_default()
    };
    key(a).cmp(&key(b)).then(a.cmp(&b))
}
