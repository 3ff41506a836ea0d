use predicates::prelude::*;
use std::fs;
use std::io::Read;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_docgen")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn fixtures_dir() -> String {
    format!("{}/tests/fixtures", env!("CARGO_MANIFEST_DIR"))
}

/// Run in an empty directory so no stray `style.css` is picked up.
fn run_in(dir: &TempDir, args: &[&str]) -> String {
    let assert = cmd().current_dir(dir.path()).args(args).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

// -- single source --

#[test]
fn single_source_renders_html_to_stdout() {
    let dir = TempDir::new().unwrap();
    let html = run_in(&dir, &["--in-single", &fixture_path("Shapes.java")]);

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Shape</title>"));
    // one source: the stylesheet is embedded
    assert!(html.contains("<style>"));
    assert!(html.contains("demo.shapes"));
    assert!(html.contains("implements <code>Comparable"));
    assert!(html.contains("<h2>Shape"));
    assert!(html.contains("Computes the area."));
    assert!(html.contains("<strong>Returns:</strong> the area in square units"));
    assert!(html.contains("NullPointerException"));
    assert!(html.contains("<code>Circle</code>"));
    assert!(html.trim_end().ends_with("</html>"));
}

#[test]
fn stdin_source_is_read() {
    let dir = TempDir::new().unwrap();
    let input = fs::read_to_string(fixture_path("Shapes.java")).unwrap();
    let assert = cmd()
        .current_dir(dir.path())
        .args(["--in-single", "-"])
        .write_stdin(input)
        .assert()
        .success();
    let html = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(html.contains("<title>Shape</title>"));
    assert!(html.contains("<h3>area"));
}

#[test]
fn out_single_writes_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("square.html");
    cmd()
        .current_dir(dir.path())
        .args(["--in-single", &fixture_path("Square.swift"), "--out-single"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let html = fs::read_to_string(&out).unwrap();
    assert!(html.contains("<h2>Square"));
    assert!(html.contains("<h3>init"));
}

#[test]
fn json_format() {
    let dir = TempDir::new().unwrap();
    let out = run_in(&dir, &["--in-single", &fixture_path("Shapes.java"), "--format", "json"]);
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["title"], "Shape");
    assert_eq!(json["package"], "demo.shapes");
    let shape = &json["declarations"][0];
    assert_eq!(shape["kind"], "class");
    let names: Vec<&str> = shape["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["sides", "label", "Shape", "area", "zIndex", "compareTo"]);
    assert_eq!(shape["members"][2]["kind"], "constructor");
}

#[test]
fn access_filter_drops_undocumented_members() {
    let dir = TempDir::new().unwrap();
    let all = run_in(&dir, &["--in-single", &fixture_path("Shapes.java")]);
    assert!(all.contains("<h3>label"));
    assert!(all.contains("<h3>zIndex"));

    let public = run_in(&dir, &["--in-single", &fixture_path("Shapes.java"), "--access", "public"]);
    assert!(!public.contains("<h3>label"));
    assert!(!public.contains("<h3>zIndex"));
    // documented members stay regardless of access
    assert!(public.contains("<h3>sides"));
}

#[test]
fn alpha_sort_orders_members_by_name() {
    let dir = TempDir::new().unwrap();
    let content = run_in(&dir, &["--in-single", &fixture_path("Shapes.java")]);
    assert!(content.find("<h3>sides").unwrap() < content.find("<h3>area").unwrap());

    let alpha = run_in(&dir, &["--in-single", &fixture_path("Shapes.java"), "--sort", "alpha"]);
    assert!(alpha.find("<h3>area").unwrap() < alpha.find("<h3>sides").unwrap());
    assert!(alpha.find("<h3>compareTo").unwrap() < alpha.find("<h3>label").unwrap());
}

#[test]
fn explicit_css_is_embedded() {
    let dir = TempDir::new().unwrap();
    let html = run_in(&dir, &["--in-single", &fixture_path("Box.kt"), "--css", &fixture_path("site.css")]);
    assert!(html.contains("font-family: serif"));
}

#[test]
fn default_css_is_taken_from_working_directory() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("style.css"), "h1 { color: teal; }").unwrap();
    let html = run_in(&dir, &["--in-single", &fixture_path("Box.kt")]);
    assert!(html.contains("color: teal"));
}

// -- batch outputs --

#[test]
fn out_folder_writes_pages_and_stylesheet() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("docs");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("stale.html"), "old").unwrap();

    cmd()
        .current_dir(dir.path())
        .args(["--in-folder", &fixtures_dir(), "--out-folder"])
        .arg(&out)
        .assert()
        .success();

    assert!(!out.join("stale.html").exists());
    let shapes = fs::read_to_string(out.join("Shapes.html")).unwrap();
    assert!(shapes.contains("<link rel=\"stylesheet\" href=\"style.css\">"));
    assert!(!shapes.contains("<style>"));
    assert!(out.join("Box.html").exists());
    assert!(out.join("Square.html").exists());
    assert!(out.join("style.css").exists());
    // non-source files are not documented
    assert!(!out.join("site.html").exists());
}

#[test]
fn embed_always_skips_separate_stylesheet() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("docs");
    cmd()
        .current_dir(dir.path())
        .args(["--in-folder", &fixtures_dir(), "--embed-css", "always", "--out-folder"])
        .arg(&out)
        .assert()
        .success();
    assert!(!out.join("style.css").exists());
    assert!(fs::read_to_string(out.join("Box.html")).unwrap().contains("<style>"));
}

#[test]
fn out_zip_contains_pages() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("docs.zip");
    cmd()
        .current_dir(dir.path())
        .args(["--in-folder", &fixtures_dir(), "--exts", "java,swift", "--out-zip"])
        .arg(&out)
        .assert()
        .success();

    let mut archive = zip::ZipArchive::new(fs::File::open(&out).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    assert_eq!(names, vec!["Shapes.html", "Square.html", "style.css"]);
    let mut page = String::new();
    archive.by_name("Square.html").unwrap().read_to_string(&mut page).unwrap();
    assert!(page.contains("<h2>Square"));
}

#[test]
fn yes_and_no_lists_filter_sources() {
    let dir = TempDir::new().unwrap();
    let yes = dir.path().join("yes.txt");
    let no = dir.path().join("no.txt");
    fs::write(&yes, "# wanted\nBox.kt\nSquare.swift\n").unwrap();
    fs::write(&no, "Square.swift\n").unwrap();

    // a single remaining source goes to stdout
    let html = run_in(
        &dir,
        &[
            "--in-folder",
            &fixtures_dir(),
            "--yes-list",
            yes.to_str().unwrap(),
            "--no-list",
            no.to_str().unwrap(),
        ],
    );
    assert!(html.contains("<title>Box</title>"));
}

// -- errors --

#[test]
fn missing_input_argument_fails() {
    cmd().assert().failure();
}

#[test]
fn missing_input_folder_fails() {
    cmd()
        .args(["--in-folder", "/nonexistent/docgen-sources"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("input folder not found"));
}

#[test]
fn several_sources_need_an_output() {
    let dir = TempDir::new().unwrap();
    cmd()
        .current_dir(dir.path())
        .args(["--in-folder", &fixtures_dir()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--out-folder or --out-zip"));
}

#[test]
fn out_single_with_several_sources_fails() {
    let dir = TempDir::new().unwrap();
    cmd()
        .current_dir(dir.path())
        .args(["--in-folder", &fixtures_dir(), "--out-single", "all.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exactly one source"));
    assert!(!dir.path().join("all.html").exists());
}

#[test]
fn missing_explicit_css_fails() {
    cmd()
        .args(["--in-single", &fixture_path("Box.kt"), "--css", "/nonexistent/site.css"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read stylesheet"));
}

#[test]
fn unknown_format_fails() {
    cmd()
        .args(["--in-single", &fixture_path("Box.kt"), "--format", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}
