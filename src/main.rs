//! docgen — generate HTML documentation from doc-comments.
//!
//! Sources come from files (`--in-single`, globs and `-` for stdin), folders
//! (`--in-folder`) or ZIP archives (`--in-zip`); pages go to one file or
//! stdout (`--out-single`), a folder (`--out-folder`) or an archive
//! (`--out-zip`).

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use docgen::input::{self, InputSpec};
use docgen::model::AccessLevel;
use docgen::output::{self, Destination, Page};
use docgen::parser;
use docgen::render::{self, Css, RenderOptions, SortOrder, Stylesheet};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Stylesheet looked up when `--css` is not given.
const DEFAULT_CSS_NAME: &str = "style.css";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EmbedCss {
    /// Embed only when there is exactly one source.
    Auto,
    Always,
    Never,
}

#[derive(Parser)]
#[command(
    name = "docgen",
    version,
    about = "Generate HTML documentation from doc-comments in Java, Kotlin and Swift sources",
    after_help = "If --in-single is given \"-\", contents are read from stdin.\nIf --out-single is given \"-\", contents are written to stdout.",
    group(ArgGroup::new("inputs").required(true).multiple(true).args(["in_single", "in_folder", "in_zip"]))
)]
struct Cli {
    /// Add one source file to the inputs (glob patterns supported)
    #[arg(long, value_name = "FILE")]
    in_single: Vec<String>,

    /// Folder containing input source files (searched recursively)
    #[arg(long, value_name = "DIR")]
    in_folder: Vec<String>,

    /// ZIP archive containing input source files
    #[arg(long, value_name = "ZIP")]
    in_zip: Vec<String>,

    /// File extensions read from folders and archives, comma separated
    #[arg(long, value_delimiter = ',', default_value = "java,kt,kts,swift")]
    exts: Vec<String>,

    /// File listing every source to generate docs from
    #[arg(long, value_name = "FILE")]
    yes_list: Option<PathBuf>,

    /// File listing every source to exclude
    #[arg(long, value_name = "FILE")]
    no_list: Option<PathBuf>,

    /// Write one page to this file; only valid with exactly one source
    #[arg(long, value_name = "FILE", conflicts_with_all = ["out_folder", "out_zip"])]
    out_single: Option<String>,

    /// Write pages to this folder, replacing it if it exists
    #[arg(long, value_name = "DIR", conflicts_with = "out_zip")]
    out_folder: Option<PathBuf>,

    /// Write pages to this ZIP file, replacing it if it exists
    #[arg(long, value_name = "ZIP")]
    out_zip: Option<PathBuf>,

    /// Stylesheet to use [default: style.css, or a built-in one if absent]
    #[arg(long, value_name = "FILE")]
    css: Option<PathBuf>,

    /// Embed the stylesheet into each page or keep it separate
    #[arg(long, value_enum, default_value_t = EmbedCss::Auto)]
    embed_css: EmbedCss,

    /// Order of fields and methods within each type
    #[arg(long, value_enum, default_value_t = SortOrder::Content)]
    sort: SortOrder,

    /// Minimum access level of undocumented members: public, protected, package, private
    #[arg(long, default_value = "private")]
    access: AccessLevel,

    /// Output format: html (default), json
    #[arg(short = 'f', long, default_value = "html")]
    format: String,

    /// Log what is being scanned and dropped
    #[arg(short, long)]
    verbose: bool,
}

/// Everything a run needs, resolved from the command line.
#[derive(Debug)]
struct Config {
    inputs: InputSpec,
    destination: Option<Destination>,
    css: Option<PathBuf>,
    embed_css: EmbedCss,
    sort: SortOrder,
    access: AccessLevel,
    format: String,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        let yes_list = self.yes_list.as_deref().map(input::read_list).transpose()?;
        let no_list = match self.no_list.as_deref() {
            Some(path) => input::read_list(path)?,
            None => Vec::new(),
        };
        let destination = match (self.out_single, self.out_folder, self.out_zip) {
            (Some(target), _, _) => Some(Destination::Single(target)),
            (_, Some(dir), _) => Some(Destination::Folder(dir)),
            (_, _, Some(path)) => Some(Destination::Zip(path)),
            _ => None,
        };
        Ok(Config {
            inputs: InputSpec {
                singles: self.in_single,
                folders: self.in_folder,
                zips: self.in_zip,
                extensions: self.exts.into_iter().map(|e| e.trim_start_matches('.').to_string()).collect(),
                yes_list,
                no_list,
            },
            destination,
            css: self.css,
            embed_css: self.embed_css,
            sort: self.sort,
            access: self.access,
            format: self.format,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = cli.into_config()?;
    run(&config)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("docgen=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docgen=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(config: &Config) -> Result<()> {
    let renderer = render::create_renderer(&config.format)?;
    let files = input::collect(&config.inputs)?;
    if files.is_empty() {
        anyhow::bail!("no readable source files");
    }
    let destination = resolve_destination(config.destination.clone(), files.len())?;
    let stylesheet = load_stylesheet(config.css.as_deref())?;
    let embed = should_embed(config.embed_css, files.len());

    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    let paths = output::page_paths(&names, renderer.file_extension());

    let pages: Vec<Page> = files
        .into_par_iter()
        .zip(paths.into_par_iter())
        .map(|(file, path)| {
            let source = parser::parse(file.bytes, &file.name, config.access);
            tracing::debug!(name = %source.name, diagnostics = ?source.diagnostics, "parsed");
            let css = if embed {
                Css::Embed(&stylesheet.text)
            } else {
                Css::Link(format!("{}{}", output::root_prefix(&path), stylesheet.name))
            };
            let content = renderer.render(&source, &RenderOptions { css, sort: config.sort });
            Page { path, content }
        })
        .collect();

    let separate_css = !embed
        && renderer.file_extension() == "html"
        && !matches!(destination, Destination::Single(_));
    output::write(&destination, &pages, separate_css.then_some(&stylesheet))
}

/// `--out-single -` is implied for a single source; several sources need
/// an explicit folder or archive.
fn resolve_destination(requested: Option<Destination>, sources: usize) -> Result<Destination> {
    match requested {
        Some(Destination::Single(_)) if sources != 1 => anyhow::bail!(
            "--out-single is only valid with exactly one source, got {}; use --out-folder or --out-zip",
            sources
        ),
        Some(dest) => Ok(dest),
        None if sources == 1 => Ok(Destination::Single("-".to_string())),
        None => anyhow::bail!("{} sources given; choose an output with --out-folder or --out-zip", sources),
    }
}

/// An explicitly named stylesheet must exist; the default one may be
/// missing, in which case the built-in sheet is used.
fn load_stylesheet(path: Option<&Path>) -> Result<Stylesheet> {
    let (path, explicit) = match path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CSS_NAME), false),
    };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_CSS_NAME.to_string());
    match fs::read_to_string(path) {
        Ok(text) => Ok(Stylesheet { name, text }),
        Err(e) if explicit => Err(e).with_context(|| format!("failed to read stylesheet: {}", path.display())),
        Err(_) => {
            tracing::debug!("no {} found, using the built-in stylesheet", DEFAULT_CSS_NAME);
            Ok(Stylesheet::builtin())
        }
    }
}

fn should_embed(mode: EmbedCss, sources: usize) -> bool {
    match mode {
        EmbedCss::Auto => sources == 1,
        EmbedCss::Always => true,
        EmbedCss::Never => false,
    }
}
