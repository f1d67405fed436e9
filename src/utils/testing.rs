//! Stand-in executables for tests that drive external tools

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Install an executable `sh` script named `name` in `dir`.
///
/// A child `sh` writes the file, so this process never holds a writable fd
/// to it that a concurrently forked test child could inherit (ETXTBSY on exec).
pub fn stub_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(r#"cat > "$0" && chmod 755 "$0""#)
        .arg(&path)
        .stdin(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(format!("#!/bin/sh\n{}\n", body).as_bytes())
        .unwrap();
    assert!(child.wait().unwrap().success());
    path
}
