#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::fs;

use genapi::generator::FormatterChoice;
use genapi::{Endpoint, GenError, GenerateOptions, RestApi, WriteMode};

fn shop() -> RestApi {
    RestApi::new("shop").with_endpoint(Endpoint::new("GetElem", "/api/elem/{id}", "GET"))
}

#[test]
fn test_existing_directory_is_a_conflict_and_left_untouched() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("shop");
    fs::create_dir(&out).unwrap();
    common::write_file(&out, "service.go", "package keep\n");
    common::write_file(&out, "notes.txt", "mine");

    let options = GenerateOptions::new(&out).with_formatter(FormatterChoice::Builtin);
    match shop().generate(&options).unwrap_err() {
        GenError::DestinationConflict(path) => assert_eq!(path, out),
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(common::list_dir(&out), ["notes.txt", "service.go"]);
    assert_eq!(fs::read_to_string(out.join("service.go")).unwrap(), "package keep\n");
    // no staging directory left behind
    assert_eq!(common::list_dir(tmp.path()), ["shop"]);
}

#[test]
fn test_new_directory_mode_creates_parents_and_cleans_staging() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("nested").join("deeper").join("shop");
    let options = GenerateOptions::new(&out).with_formatter(FormatterChoice::Builtin);
    assert_eq!(options.mode, WriteMode::NewDirectory);

    shop().generate(&options).unwrap();
    assert_eq!(common::list_dir(&out), ["handler.go", "service.go"]);
    assert_eq!(common::list_dir(out.parent().unwrap()), ["shop"]);
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_is_a_conflict() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("shop");
    std::os::unix::fs::symlink(tmp.path().join("missing-target"), &out).unwrap();

    let options = GenerateOptions::new(&out).with_formatter(FormatterChoice::Builtin);
    match shop().generate(&options).unwrap_err() {
        GenError::DestinationConflict(path) => assert_eq!(path, out),
        other => panic!("unexpected error: {other}"),
    }
    assert!(fs::symlink_metadata(&out).unwrap().file_type().is_symlink());
    assert_eq!(common::list_dir(tmp.path()), ["shop"]);

    // same rule for the files of an in-place run
    let project = tmp.path().join("project");
    fs::create_dir(&project).unwrap();
    std::os::unix::fs::symlink(project.join("elsewhere.go"), project.join("service.go")).unwrap();
    let options = GenerateOptions::in_place(&project).with_formatter(FormatterChoice::Builtin);
    match shop().generate(&options).unwrap_err() {
        GenError::DestinationConflict(path) => assert_eq!(path, project.join("service.go")),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(common::list_dir(&project), ["service.go"]);
}

#[cfg(unix)]
#[test]
fn test_generated_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("shop");
    shop()
        .generate(&GenerateOptions::new(&out).with_formatter(FormatterChoice::Builtin))
        .unwrap();
    let mode = |p: &std::path::Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode(&out), 0o755);

    let tmp = tempfile::tempdir().unwrap();
    let project = shop()
        .generate(&GenerateOptions::in_place(tmp.path()).with_formatter(FormatterChoice::Builtin))
        .unwrap();
    assert_eq!(mode(&project.service_path), 0o644);
    assert_eq!(mode(&project.handler_path), 0o644);
}

#[test]
fn test_in_place_writes_next_to_existing_files() {
    let tmp = tempfile::tempdir().unwrap();
    common::write_file(tmp.path(), "config.yaml", common::SHOP_YAML);

    let options = GenerateOptions::in_place(tmp.path()).with_formatter(FormatterChoice::Builtin);
    let project = shop().generate(&options).unwrap();
    assert_eq!(project.dir, tmp.path());
    assert_eq!(
        common::list_dir(tmp.path()),
        ["config.yaml", "handler.go", "service.go"]
    );
}

#[test]
fn test_in_place_conflict_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    common::write_file(tmp.path(), "handler.go", "package keep\n");

    let options = GenerateOptions::in_place(tmp.path()).with_formatter(FormatterChoice::Builtin);
    match shop().generate(&options).unwrap_err() {
        GenError::DestinationConflict(path) => assert_eq!(path, tmp.path().join("handler.go")),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(common::list_dir(tmp.path()), ["handler.go"]);
    assert_eq!(
        fs::read_to_string(tmp.path().join("handler.go")).unwrap(),
        "package keep\n"
    );
}

#[test]
fn test_in_place_requires_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let options = GenerateOptions::in_place(tmp.path().join("missing"))
        .with_formatter(FormatterChoice::Builtin);
    assert!(matches!(shop().generate(&options), Err(GenError::Io { .. })));
}
