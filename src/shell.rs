use std::path::Path;
use std::process::Command;
use anyhow::{bail, Context, Result};

/// The line printed on stdout for the calling shell to evaluate.
///
/// ```
/// use std::path::Path;
/// use zig_setup::path_export_line;
///
/// let line = path_export_line(Path::new("/home/dev/.zig/current"));
/// assert_eq!(line, r#"export PATH="/home/dev/.zig/current:$PATH""#);
/// ```
pub fn path_export_line(current: &Path) -> String {
    format!("export PATH=\"{}:$PATH\"", current.display())
}

/// Asks an installed compiler for its version (`zig version`).
pub fn zig_version(zig: &Path) -> Result<String> {
    let output = Command::new(zig)
        .arg("version")
        .output()
        .with_context(|| format!("Could not run {}", zig.display()))?;
    if !output.status.success() {
        bail!("{} version exited with {}", zig.display(), output.status);
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
