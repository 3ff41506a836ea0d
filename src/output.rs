//! Output sinks: a single file or stdout, a folder, or a ZIP archive.
//! Folder and archive outputs replace whatever was there before.

use crate::render::Stylesheet;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// One page to a file, or to stdout for `-`.
    Single(String),
    Folder(PathBuf),
    Zip(PathBuf),
}

/// A rendered page and its path relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub path: String,
    pub content: String,
}

/// Output path for each source name: the name with its extension replaced
/// by `ext`, kept relative. Sources that would collide keep their original
/// extension as well ("A.java" → "A.java.html").
pub fn page_paths(names: &[&str], ext: &str) -> Vec<String> {
    let base: Vec<String> = names.iter().map(|name| relative_path(name)).collect();
    let replaced: Vec<String> = base.iter().map(|p| with_extension(p, ext)).collect();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for path in &replaced {
        *counts.entry(path.as_str()).or_default() += 1;
    }
    base.iter()
        .zip(&replaced)
        .map(|(base, path)| {
            if counts[path.as_str()] > 1 {
                format!("{}.{}", base, ext)
            } else {
                path.clone()
            }
        })
        .collect()
}

/// `../` prefix from a page at `path` back to the output root.
pub fn root_prefix(path: &str) -> String {
    "../".repeat(path.matches('/').count())
}

/// Keep only normal components so pages cannot escape the output root.
fn relative_path(name: &str) -> String {
    let parts: Vec<String> = Path::new(&name.replace('\\', "/"))
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        "index".to_string()
    } else {
        parts.join("/")
    }
}

fn with_extension(path: &str, ext: &str) -> String {
    let file_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[file_start..].rfind('.') {
        Some(dot) if dot > 0 => format!("{}.{}", &path[..file_start + dot], ext),
        _ => format!("{}.{}", path, ext),
    }
}

/// Write `pages` to `dest`; `stylesheet` is written next to them when the
/// pages link to it.
pub fn write(dest: &Destination, pages: &[Page], stylesheet: Option<&Stylesheet>) -> Result<()> {
    match dest {
        Destination::Single(target) => write_single(target, pages),
        Destination::Folder(dir) => write_folder(dir, pages, stylesheet),
        Destination::Zip(path) => write_zip(path, pages, stylesheet),
    }
}

fn write_single(target: &str, pages: &[Page]) -> Result<()> {
    let [page] = pages else {
        anyhow::bail!("--out-single needs exactly one source, got {}", pages.len());
    };
    if target == "-" {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(page.content.as_bytes())
            .and_then(|_| stdout.flush())
            .context("failed to write to stdout")?;
    } else {
        fs::write(target, &page.content).with_context(|| format!("failed to write {}", target))?;
        tracing::info!(path = target, "wrote page");
    }
    Ok(())
}

fn write_folder(dir: &Path, pages: &[Page], stylesheet: Option<&Stylesheet>) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)
            .with_context(|| format!("failed to replace output folder: {}", dir.display()))?;
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory: {}", dir.display()))?;

    let css = stylesheet.map(|s| (s.name.as_str(), s.text.as_str()));
    for (path, content) in pages.iter().map(|p| (p.path.as_str(), p.content.as_str())).chain(css) {
        let out_path = dir.join(path);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
        fs::write(&out_path, content)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }
    tracing::info!(path = %dir.display(), pages = pages.len(), "wrote folder");
    Ok(())
}

fn write_zip(path: &Path, pages: &[Page], stylesheet: Option<&Stylesheet>) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)
            .with_context(|| format!("failed to replace output file: {}", path.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("failed to create zip file: {}", path.display()))?;
    let mut zip_writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    let css = stylesheet.map(|s| (s.name.as_str(), s.text.as_str()));
    for (name, content) in pages.iter().map(|p| (p.path.as_str(), p.content.as_str())).chain(css) {
        zip_writer
            .start_file(name, options)
            .with_context(|| format!("failed to add {} to archive", name))?;
        zip_writer
            .write_all(content.as_bytes())
            .with_context(|| format!("failed to write {} to archive", name))?;
    }
    zip_writer
        .finish()
        .with_context(|| format!("failed to finalize zip archive: {}", path.display()))?;
    tracing::info!(path = %path.display(), pages = pages.len(), "wrote archive");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    fn page(path: &str, content: &str) -> Page {
        Page {
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn page_paths_replace_extension() {
        assert_eq!(
            page_paths(&["src/Foo.java", "Bar.kt", "stdin"], "html"),
            vec!["src/Foo.html", "Bar.html", "stdin.html"]
        );
    }

    #[test]
    fn page_paths_stay_inside_root() {
        assert_eq!(page_paths(&["../../etc/A.java", "/abs/B.swift"], "html"), vec!["etc/A.html", "abs/B.html"]);
    }

    #[test]
    fn colliding_pages_keep_source_extension() {
        assert_eq!(
            page_paths(&["A.java", "A.kt", "B.java"], "html"),
            vec!["A.java.html", "A.kt.html", "B.html"]
        );
    }

    #[test]
    fn root_prefix_counts_directories() {
        assert_eq!(root_prefix("A.html"), "");
        assert_eq!(root_prefix("a/b/A.html"), "../../");
    }

    #[test]
    fn folder_output_replaces_existing_folder() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("docs");
        fs::create_dir_all(&out).unwrap();
        fs::write(out.join("stale.html"), "old").unwrap();

        let css = Stylesheet::builtin();
        write(
            &Destination::Folder(out.clone()),
            &[page("A.html", "a"), page("pkg/B.html", "b")],
            Some(&css),
        )
        .unwrap();
        assert!(!out.join("stale.html").exists());
        assert_eq!(fs::read_to_string(out.join("pkg/B.html")).unwrap(), "b");
        assert_eq!(fs::read_to_string(out.join("style.css")).unwrap(), css.text);
    }

    #[test]
    fn zip_output_contains_pages_and_css() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docs.zip");
        fs::write(&path, "not a zip").unwrap();
        let css = Stylesheet::builtin();
        write(&Destination::Zip(path.clone()), &[page("A.html", "<p>a</p>")], Some(&css)).unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        let mut content = String::new();
        archive.by_name("A.html").unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "<p>a</p>");
        assert!(archive.by_name("style.css").is_ok());
    }

    #[test]
    fn single_output_needs_one_page() {
        let err = write(
            &Destination::Single("-".into()),
            &[page("A.html", "a"), page("B.html", "b")],
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("exactly one source"));
    }
}
