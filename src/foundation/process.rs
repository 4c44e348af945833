use std::{
    path::Path,
    process::{Command, Stdio},
};

use anyhow::Context as _;

use crate::foundation::error::ReelResult;

/// `true` when `<program> -version` (or `--version`) runs successfully.
pub fn is_tool_on_path(program: &str) -> bool {
    ["-version", "--version"].iter().any(|flag| {
        Command::new(program)
            .arg(flag)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    })
}

pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Shell-ish rendering of a command for logs and dry runs.
pub fn display_command(cmd: &Command) -> String {
    let mut out = quote_arg(&cmd.get_program().to_string_lossy());
    for arg in cmd.get_args() {
        out.push(' ');
        out.push_str(&quote_arg(&arg.to_string_lossy()));
    }
    out
}

fn quote_arg(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=+,@%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/process.rs"]
mod tests;
