//! docgen — extract documentation from Java, Kotlin and Swift sources.
//!
//! [`parser::parse`] scans one source buffer into a [`model::Source`];
//! [`render`] turns that into HTML or JSON. [`input`] and [`output`] handle
//! files, folders and ZIP archives for the command-line tool.

pub mod input;
pub mod model;
pub mod output;
pub mod parser;
pub mod render;
