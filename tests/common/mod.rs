#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const SHOP_YAML: &str = r#"ServiceName: shop
ImportPath: example.com/shop
Endpoints:
  - Name: "GetElem"
    Method: "GET"
    URL: "/api/elem/{id}"
  - Name: "SetElem"
    Method: "POST"
    URL: "/api/elem/{id}"
"#;

/// Write `content` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Executable shell script standing in for a toolchain binary.
#[cfg(unix)]
pub fn stub_binary(dir: &Path, name: &str, script: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let stub = write_file(dir, name, script);
    let mut perms = fs::metadata(&stub).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&stub, perms).unwrap();
    stub
}

/// Sorted file names directly under `dir`.
pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
