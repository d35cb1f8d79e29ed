//! Host platform detection and shell selection.

pub mod os;

use os::Os;

/// Split a shell override into program and leading arguments.
///
/// Mirrors how the platform default is used: the command string is appended
/// after these arguments. When the override names a known shell without a
/// flag, the flag it needs is added.
pub fn parse_shell(shell: &str) -> (String, Vec<String>) {
  let mut parts = shell.split_whitespace().map(str::to_string);
  let program = parts.next().unwrap_or_default();
  let mut args: Vec<String> = parts.collect();

  if args.is_empty() {
    let lower = program.to_ascii_lowercase();
    if lower.contains("powershell") || lower.contains("pwsh") {
      args = vec!["-NoProfile".to_string(), "-Command".to_string()];
    } else if lower.ends_with("cmd") || lower.ends_with("cmd.exe") {
      args = vec!["/C".to_string()];
    } else {
      args = vec!["-c".to_string()];
    }
  }

  (program, args)
}

/// Shell used to run build commands.
///
/// An explicit override wins. Otherwise the platform shell is used, falling
/// back to the POSIX shell on unrecognized hosts.
pub fn shell_for(override_shell: Option<&str>) -> (String, Vec<String>) {
  if let Some(shell) = override_shell {
    return parse_shell(shell);
  }

  let (program, args) = Os::current().unwrap_or(Os::Linux).shell();
  (program.to_string(), args.iter().map(|a| a.to_string()).collect())
}
