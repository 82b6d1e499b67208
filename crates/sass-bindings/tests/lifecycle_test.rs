//! Every compile call must create exactly one foreign context and release
//! it, on success and failure alike. Counts are per thread, so these tests
//! do not observe each other.

use std::fs;
use std::path::PathBuf;

use sass_bindings::{CompileOptions, SassError, compile_dir, compile_file, compile_source};
use sass_interface::lifecycle::{self, LifecycleCounts};

fn counted<T>(f: impl FnOnce() -> T) -> (T, LifecycleCounts) {
    let before = lifecycle::snapshot();
    let value = f();
    (value, lifecycle::snapshot().since(before))
}

fn assert_one_pair(counts: LifecycleCounts) {
    assert_eq!(counts.created, 1, "contexts created");
    assert_eq!(counts.destroyed, 1, "contexts destroyed");
}

#[test]
fn test_compile_source_releases_context() {
    let (result, counts) = counted(|| compile_source(".a { color: red; }", &CompileOptions::new()));
    assert!(result.is_ok());
    assert_one_pair(counts);

    let (result, counts) = counted(|| compile_source(".a {", &CompileOptions::new()));
    assert!(result.is_err());
    assert_one_pair(counts);
}

#[test]
fn test_compile_file_releases_context() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.scss");
    fs::write(&good, ".good { color: green; }").unwrap();

    let (result, counts) = counted(|| compile_file(&good, &CompileOptions::new()));
    assert!(result.is_ok());
    assert_one_pair(counts);

    let missing = dir.path().join("missing.scss");
    let (result, counts) = counted(|| compile_file(&missing, &CompileOptions::new()));
    assert!(result.is_err());
    assert_one_pair(counts);
}

#[test]
fn test_compile_dir_releases_context() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    fs::write(input.path().join("a.scss"), ".a { color: red; }").unwrap();

    let (result, counts) =
        counted(|| compile_dir(input.path(), output.path(), &CompileOptions::new()));
    assert!(result.is_ok());
    assert_one_pair(counts);

    let (result, counts) = counted(|| {
        compile_dir(
            input.path().join("nope"),
            output.path(),
            &CompileOptions::new(),
        )
    });
    assert!(result.is_err());
    assert_one_pair(counts);
}

#[test]
fn test_marshaling_failure_creates_no_context() {
    let (result, counts) = counted(|| compile_source("a\0b", &CompileOptions::new()));
    assert!(matches!(result, Err(SassError::InvalidInput(_))));
    assert_eq!(counts, LifecycleCounts::default());

    let options = CompileOptions::new().with_image_path("img\0dir");
    let (result, counts) = counted(|| compile_source(".a { color: red; }", &options));
    assert!(matches!(result, Err(SassError::InvalidInput(_))));
    assert_eq!(counts, LifecycleCounts::default());

    let (result, counts) =
        counted(|| compile_file(PathBuf::from("in\0valid.scss"), &CompileOptions::new()));
    assert!(matches!(result, Err(SassError::InvalidInput(_))));
    assert_eq!(counts, LifecycleCounts::default());
}

#[test]
fn test_repeated_calls_leave_nothing_live() {
    let (_, counts) = counted(|| {
        for i in 0..25 {
            let source = if i % 2 == 0 {
                format!(".item-{i} {{ width: {i}px; }}")
            } else {
                format!(".item-{i} {{ width: $w{i}; }}")
            };
            let _ = compile_source(&source, &CompileOptions::new());
        }
    });
    assert_eq!(counts.created, 25);
    assert_eq!(counts.live(), 0);
}
