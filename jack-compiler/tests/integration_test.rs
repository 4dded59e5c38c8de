use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn get_project_root() -> PathBuf {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    PathBuf::from(manifest_dir)
}

fn find_jack_files() -> Vec<PathBuf> {
    let project_root = get_project_root();
    let test_dir = project_root.join("test_data");
    if !test_dir.exists() {
        return Vec::new();
    }

    let mut jack_files = Vec::new();
    for entry in fs::read_dir(&test_dir).expect("test_data is readable") {
        let dir = entry.expect("directory entry is readable").path();
        if !dir.is_dir() {
            continue;
        }
        for file in fs::read_dir(&dir).expect("test case directory is readable") {
            let path = file.expect("directory entry is readable").path();
            if path.extension().and_then(|s| s.to_str()) == Some("jack") {
                jack_files.push(path);
            }
        }
    }
    jack_files.sort();
    jack_files
}

/// Runs the compiler on a copy of `jack_file` so the real `.jack` fixture is
/// never touched, returning the path to the generated `.vm` output.
fn run_compiler_to_temp(jack_file: &Path) -> Result<PathBuf, String> {
    let project_root = get_project_root();
    let temp_jack = jack_file.with_extension("temp.jack");
    fs::copy(jack_file, &temp_jack)
        .map_err(|e| format!("failed to create temp jack file: {e}"))?;

    let output = Command::new("cargo")
        .arg("run")
        .arg("--release")
        .arg("--quiet")
        .arg("--")
        .arg(&temp_jack)
        .current_dir(&project_root)
        .output()
        .map_err(|e| format!("failed to run compiler: {e}"))?;

    fs::remove_file(&temp_jack).ok();

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("compiler failed: {stderr}"));
    }

    let generated_vm = temp_jack.with_extension("vm");
    if !generated_vm.exists() {
        return Err(format!("output file not created: {generated_vm:?}"));
    }

    let temp_vm = jack_file.with_extension("temp.vm");
    fs::rename(&generated_vm, &temp_vm).map_err(|e| format!("failed to rename output: {e}"))?;
    Ok(temp_vm)
}

fn compare_files(actual: &Path, expected: &Path) -> Result<(), String> {
    let actual_content =
        fs::read_to_string(actual).map_err(|e| format!("failed to read actual file: {e}"))?;
    let expected_content =
        fs::read_to_string(expected).map_err(|e| format!("failed to read expected file: {e}"))?;

    if actual_content == expected_content {
        Ok(())
    } else {
        Err(format!(
            "files differ:\n--- expected ---\n{expected_content}\n--- actual ---\n{actual_content}"
        ))
    }
}

fn cleanup_temp_files() {
    for jack_file in find_jack_files() {
        for ext in ["temp.jack", "temp.vm"] {
            let path = jack_file.with_extension(ext);
            if path.exists() {
                fs::remove_file(&path).ok();
            }
        }
    }
}

#[test]
fn test_all_jack_files() {
    let jack_files = find_jack_files();
    assert!(
        !jack_files.is_empty(),
        "no .jack test files found in test_data/"
    );

    let mut failures = Vec::new();

    for jack_file in &jack_files {
        let expected_file = jack_file.with_extension("expected.vm");
        if !expected_file.exists() {
            continue;
        }

        match run_compiler_to_temp(jack_file) {
            Ok(temp_vm) => {
                if let Err(e) = compare_files(&temp_vm, &expected_file) {
                    failures.push(format!("{}: {e}", jack_file.display()));
                }
                fs::remove_file(&temp_vm).ok();
            }
            Err(e) => failures.push(format!("{}: {e}", jack_file.display())),
        }
    }

    cleanup_temp_files();

    assert!(failures.is_empty(), "failures:\n{}", failures.join("\n"));
}

#[test]
fn rejects_a_lexically_invalid_file() {
    let project_root = get_project_root();
    let bad_file = project_root.join("test_data").join("bad_input.temp.jack");
    fs::write(&bad_file, "class Main { int x = $; }").unwrap();

    let output = Command::new("cargo")
        .arg("run")
        .arg("--release")
        .arg("--quiet")
        .arg("--")
        .arg(&bad_file)
        .current_dir(&project_root)
        .output()
        .expect("failed to run compiler");

    fs::remove_file(&bad_file).ok();
    fs::remove_file(bad_file.with_extension("vm")).ok();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains('$'));
}
