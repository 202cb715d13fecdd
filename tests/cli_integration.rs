//! End-to-end tests driving the libwright binary against tempfile projects

mod support;

use libwright::library::AssetSource;
use libwright::{CssGroup, Libraries, GENERATED_MARKER};
use serial_test::serial;
use std::fs;
use std::process::{Command, Output};
use support::get_libwright_binary;
use tempfile::TempDir;

fn create_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("demo.info.yml"), "name: Demo\ntype: module\n").unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{"name": "demo", "version": "1.2.0"}"#,
    )
    .unwrap();
    dir
}

fn write_records(project: &TempDir, records: &str) {
    fs::write(project.path().join("records.json"), records).unwrap();
}

fn run_build(project: &TempDir, extra_args: &[&str]) -> Output {
    Command::new(get_libwright_binary())
        .arg("build")
        .arg("--bundle")
        .arg(project.path().join("records.json"))
        .arg("--project-dir")
        .arg(project.path())
        .args(extra_args)
        .output()
        .expect("failed to run libwright")
}

fn read_manifest(project: &TempDir) -> String {
    fs::read_to_string(project.path().join("demo.libraries.yml")).unwrap()
}

fn parse_generated(document: &str) -> Libraries {
    let (_, generated) = document
        .split_once(GENERATED_MARKER)
        .expect("generated-section marker present");
    serde_yaml::from_str(generated).expect("generated section parses")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "libwright failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
#[serial]
fn test_build_translates_bundle_into_manifest() {
    let project = create_project();
    write_records(
        &project,
        r#"[
            {"fileName": "js/foo.js", "code": "debounce(save, 250);\nCookies.set('sid', token);", "isDynamicEntry": false},
            {"fileName": "css/foo.theme.css"},
            {"fileName": "js/lazy.js", "code": "Drupal.t('skip');", "isDynamicEntry": true},
            {"fileName": "js/empty.js", "code": "\n", "isDynamicEntry": false}
        ]"#,
    );

    let output = run_build(&project, &[]);

    assert_success(&output);
    let libraries = parse_generated(&read_manifest(&project));
    assert_eq!(libraries.len(), 1);

    let unit = &libraries["foo"];
    assert_eq!(unit.version.as_deref(), Some("1.2.0"));
    assert_eq!(unit.dependencies.len(), 2);
    assert!(unit.dependencies.contains("core/drupal.debounce"));
    assert!(unit.dependencies.contains("core/js-cookie"));

    let script = &unit.js["dist/js/foo.js"];
    assert_eq!(script.source, Some(AssetSource::File));
    assert_eq!(script.minified, Some(true));

    let style = &unit.css[&CssGroup::Theme]["dist/css/foo.theme.css"];
    assert_eq!(style.source, Some(AssetSource::File));
}

#[test]
#[serial]
fn test_build_preserves_hand_prefix_and_is_idempotent() {
    let project = create_project();
    write_records(&project, r#"[{"fileName": "js/foo.js", "code": "once('a', '.a');"}]"#);
    let hand_prefix = "demo.global:\n  css:\n    theme:\n      css/global.css: {}";
    fs::write(
        project.path().join("demo.libraries.yml"),
        format!("{hand_prefix}\n\n{GENERATED_MARKER}\nstale:\n  version: 0.0.1\n"),
    )
    .unwrap();

    assert_success(&run_build(&project, &[]));
    let first = read_manifest(&project);
    assert!(first.starts_with(hand_prefix));
    assert!(!first.contains("stale:"));

    assert_success(&run_build(&project, &[]));
    let second = read_manifest(&project);
    assert_eq!(first, second);
}

#[test]
#[serial]
fn test_build_hash_versioning_converges_on_prehash_identity() {
    let project = create_project();
    write_records(
        &project,
        r#"[{"fileName": "js/foo.abc12345.js", "code": "once('a', '.a');"}]"#,
    );

    let output = run_build(&project, &["--versioning", "hash"]);

    assert_success(&output);
    let libraries = parse_generated(&read_manifest(&project));
    let unit = &libraries["foo"];
    assert_eq!(unit.version, None);
    assert!(unit.dependencies.contains("core/once"));

    let script = &unit.js["dist/js/foo.js"];
    assert_eq!(script.preprocessed, Some(true));
}

#[test]
#[serial]
fn test_dev_cycle_writes_dev_client_and_header_markup() {
    let project = create_project();
    fs::create_dir_all(project.path().join("js")).unwrap();
    fs::write(
        project.path().join("js/app.js"),
        "const el = once('app', '.app');\n",
    )
    .unwrap();
    let side_doc_dir = project.path().join("vendor/drupal/core");
    fs::create_dir_all(&side_doc_dir).unwrap();
    fs::write(
        side_doc_dir.join("core.libraries.yml"),
        "once:\n  js:\n    assets/vendor/once/once.min.js:\n      minified: true\n",
    )
    .unwrap();
    fs::write(
        project.path().join("index.html"),
        "<html><head><title>demo</title></head><body></body></html>",
    )
    .unwrap();

    let output = Command::new(get_libwright_binary())
        .current_dir(project.path())
        .args(["dev", "js/app.js", "--html", "index.html"])
        .output()
        .expect("failed to run libwright");

    assert_success(&output);
    let libraries = parse_generated(&read_manifest(&project));

    let client = &libraries["vite"];
    assert_eq!(client.header, Some(true));
    let client_script = &client.js["http://localhost:5173/@vite/client"];
    assert_eq!(client_script.source, Some(AssetSource::External));

    let app = &libraries["app"];
    assert!(app.dependencies.contains("core/once"));
    let app_script = &app.js["http://localhost:5173/js/app.js"];
    assert_eq!(app_script.source, Some(AssetSource::External));

    let page = fs::read_to_string(project.path().join("index.html")).unwrap();
    assert!(page.contains(
        r#"<script type="text/javascript" src="/vendor/drupal/core/assets/vendor/once/once.min.js"></script></head>"#
    ));
}

#[test]
#[serial]
fn test_dev_cycle_continues_without_side_document() {
    let project = create_project();

    let output = Command::new(get_libwright_binary())
        .current_dir(project.path())
        .args(["dev"])
        .output()
        .expect("failed to run libwright");

    assert_success(&output);
    let libraries = parse_generated(&read_manifest(&project));
    assert!(libraries.contains_key("vite"));
}

#[test]
#[serial]
fn test_build_without_info_file_fails() {
    let project = TempDir::new().unwrap();
    write_records(&project, "[]");

    let output = run_build(&project, &[]);

    assert!(!output.status.success());
    assert!(!project.path().join("demo.libraries.yml").exists());
}

#[test]
#[serial]
fn test_build_with_unreadable_records_fails() {
    let project = create_project();

    let output = run_build(&project, &[]);

    assert!(!output.status.success());
}
