/// Operating systems with a known shell and viewer launchers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
  Linux,
  MacOs,
  Windows,
}

impl Os {
  /// Detect the current operating system at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::OS {
      "linux" => Some(Self::Linux),
      "macos" => Some(Self::MacOs),
      "windows" => Some(Self::Windows),
      _ => None,
    }
  }

  /// Shell binary and the flag that makes it run a command string
  pub fn shell(&self) -> (&'static str, &'static [&'static str]) {
    match self {
      Self::Linux | Self::MacOs => ("/bin/sh", &["-c"]),
      Self::Windows => ("cmd.exe", &["/C"]),
    }
  }
}
