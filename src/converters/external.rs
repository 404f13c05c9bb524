//! Runs external converter executables.

use crate::error::{ConvertError, Result};
use log::debug;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::process::Command;

/// Creates a command for `program` that never opens a console window.
pub fn background_command(program: impl AsRef<OsStr>) -> Command {
    let mut command = Command::new(program);
    hide_console(&mut command);
    command
}

#[cfg(target_os = "windows")]
fn hide_console(command: &mut Command) {
    use std::os::windows::process::CommandExt;
    use windows::Win32::System::Threading::CREATE_NO_WINDOW;

    command.creation_flags(CREATE_NO_WINDOW.0);
}

#[cfg(not(target_os = "windows"))]
fn hide_console(_command: &mut Command) {}

/// Name of the program a command will run, for messages.
fn tool_name(command: &Command) -> String {
    command.get_program().to_string_lossy().into_owned()
}

/// Runs `command` to completion.
///
/// A program that cannot be found becomes [`ConvertError::ToolNotFound`];
/// a non-zero exit becomes [`ConvertError::ToolFailed`] with the trimmed stderr.
pub fn run_tool(command: &mut Command) -> Result<()> {
    let tool = tool_name(command);
    debug!("Running {:?}", command);

    let output = command.output().map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConvertError::ToolNotFound(tool.clone()),
        _ => ConvertError::Io(format!("Failed to start {}: {}", tool, e)),
    })?;

    if output.status.success() {
        return Ok(());
    }

    Err(ConvertError::ToolFailed {
        tool,
        status: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}
