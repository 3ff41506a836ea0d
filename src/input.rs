//! Source collection: single files and globs, folders, ZIP archives, stdin.

use anyhow::{Context, Result};
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use walkdir::WalkDir;

/// Extensions read from folders and archives when none are given.
pub const DEFAULT_EXTENSIONS: &[&str] = &["java", "kt", "kts", "swift"];

/// Display name of the source read from stdin.
pub const STDIN_NAME: &str = "stdin";

/// One source to document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Path as given, relative to its folder, or the archive entry name.
    pub name: String,
    pub bytes: Vec<u8>,
    /// Canonical path, or `archive!entry`; a source is read once per origin.
    origin: String,
    /// Folder or archive the source was found in, as given.
    root: Option<String>,
}

/// Where sources come from and which of them to keep.
#[derive(Debug, Clone, Default)]
pub struct InputSpec {
    /// Files, glob patterns, or `-` for stdin.
    pub singles: Vec<String>,
    pub folders: Vec<String>,
    pub zips: Vec<String>,
    /// Extensions accepted from folders and archives.
    pub extensions: Vec<String>,
    /// When set, only listed sources are kept.
    pub yes_list: Option<Vec<String>>,
    pub no_list: Vec<String>,
}

impl InputSpec {
    fn accepts_extension(&self, name: &str) -> bool {
        let ext = Path::new(name).extension().and_then(|e| e.to_str());
        match ext {
            Some(ext) => self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }

    fn selected(&self, name: &str) -> bool {
        let listed = |list: &[String]| list.iter().any(|entry| list_matches(entry, name));
        if let Some(yes) = &self.yes_list {
            if !listed(yes) {
                return false;
            }
        }
        !listed(&self.no_list)
    }
}

/// A list entry names a source by its full name or its file name.
fn list_matches(entry: &str, name: &str) -> bool {
    let normalize = |s: &str| s.trim_start_matches("./").replace('\\', "/");
    let entry = normalize(entry);
    let name = normalize(name);
    entry == name || name.rsplit('/').next() == Some(entry.as_str())
}

/// Read a list file: one entry per line, blank and `#` lines ignored.
pub fn read_list(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read list file: {}", path.display()))?;
    Ok(parse_list(&text))
}

fn parse_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Gather every selected source, sorted by name. Unreadable files are
/// skipped with a warning; unreadable folders or archives are errors.
pub fn collect(spec: &InputSpec) -> Result<Vec<InputFile>> {
    let mut files = Vec::new();

    for single in &spec.singles {
        if single == "-" {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .context("failed to read stdin")?;
            files.push(InputFile {
                name: STDIN_NAME.to_string(),
                bytes,
                origin: "-".to_string(),
                root: None,
            });
        } else {
            for path in expand_glob(single)? {
                read_into(&mut files, &path, path.to_string_lossy().into_owned(), None);
            }
        }
    }
    for folder in &spec.folders {
        collect_folder(&mut files, Path::new(folder), spec)?;
    }
    for zip in &spec.zips {
        collect_zip(&mut files, Path::new(zip), spec)?;
    }

    files.retain(|f| {
        let keep = spec.selected(&f.name);
        if !keep {
            tracing::debug!(name = %f.name, "excluded by list");
        }
        keep
    });
    dedup(&mut files);
    // Sort for deterministic output
    files.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::info!(count = files.len(), "collected sources");
    Ok(files)
}

/// A path that exists is taken as is; anything else is a glob pattern.
fn expand_glob(pattern: &str) -> Result<Vec<std::path::PathBuf>> {
    let path = Path::new(pattern);
    if path.exists() {
        return Ok(vec![path.to_path_buf()]);
    }
    let matches: Vec<_> = glob::glob(pattern)
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    if matches.is_empty() {
        tracing::warn!("no files matched: {}", pattern);
    }
    Ok(matches)
}

/// Drop sources read twice from the same origin, then prefix names that
/// different origins share with the folder or archive they came from.
fn dedup(files: &mut Vec<InputFile>) {
    let mut origins = HashSet::new();
    files.retain(|f| {
        let first = origins.insert(f.origin.clone());
        if !first {
            tracing::debug!(name = %f.name, origin = %f.origin, "already collected");
        }
        first
    });

    let mut counts: HashMap<String, usize> = HashMap::new();
    for file in files.iter() {
        *counts.entry(file.name.clone()).or_default() += 1;
    }
    for file in files.iter_mut() {
        if counts.get(&file.name).copied().unwrap_or(0) < 2 {
            continue;
        }
        if let Some(root) = &file.root {
            let renamed = format!("{}/{}", root, file.name);
            tracing::warn!(name = %file.name, renamed = %renamed, "sources share a name");
            file.name = renamed;
        }
    }

    let mut names = HashSet::new();
    for file in files.iter() {
        if !names.insert(file.name.as_str()) {
            tracing::warn!(name = %file.name, origin = %file.origin, "sources still share a name; their pages collide");
        }
    }
}

fn origin_of(path: &Path) -> String {
    fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .into_owned()
}

/// How a folder or archive argument prefixes the names found in it.
fn root_label(given: &str) -> String {
    let label = given.replace('\\', "/");
    let trimmed = label.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn read_into(files: &mut Vec<InputFile>, path: &Path, name: String, root: Option<&str>) {
    match fs::read(path) {
        Ok(bytes) => files.push(InputFile {
            name,
            bytes,
            origin: origin_of(path),
            root: root.map(root_label),
        }),
        Err(e) => tracing::warn!("skipping {}: {}", path.display(), e),
    }
}

fn collect_folder(files: &mut Vec<InputFile>, root: &Path, spec: &InputSpec) -> Result<()> {
    if !root.is_dir() {
        anyhow::bail!("input folder not found: {}", root.display());
    }
    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            // Skip hidden directories below the root
            !(e.depth() > 0 && e.file_type().is_dir() && e.file_name().to_string_lossy().starts_with('.'))
        })
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("skipping entry in {}: {}", root.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let name = relative.to_string_lossy().replace('\\', "/");
        if spec.accepts_extension(&name) {
            read_into(files, entry.path(), name, Some(root.to_string_lossy().as_ref()));
        }
    }
    Ok(())
}

fn collect_zip(files: &mut Vec<InputFile>, path: &Path, spec: &InputSpec) -> Result<()> {
    let file = File::open(path)
        .with_context(|| format!("failed to open zip file: {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(file)
        .with_context(|| format!("failed to read zip archive: {}", path.display()))?;

    let archive_origin = origin_of(path);
    let root = root_label(&path.to_string_lossy());
    for i in 0..archive.len() {
        let mut entry = match archive.by_index(i) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("skipping entry {} of {}: {}", i, path.display(), e);
                continue;
            }
        };
        if entry.is_dir() || !spec.accepts_extension(entry.name()) {
            continue;
        }
        let name = entry.name().to_string();
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        match entry.read_to_end(&mut bytes) {
            Ok(_) => files.push(InputFile {
                origin: format!("{}!{}", archive_origin, name),
                root: Some(root.clone()),
                name,
                bytes,
            }),
            Err(e) => tracing::warn!("skipping {} in {}: {}", name, path.display(), e),
        }
    }
    Ok(())
}
