//! Names and defaults shared by the library and the CLI.

/// Config file looked up at the repository root.
pub const CONFIG_FILE_NAME: &str = "docbuild.toml";

/// Environment variable overriding the repository root.
pub const ROOT_ENV: &str = "DOCBUILD_ROOT";

pub const DEFAULT_LIBS: &[&str] = &["libs/OPD-metadata-lib", "libs/OPD-settings-lib"];
pub const DEFAULT_DOCS: &str = "docs-generator/typedoc";
pub const DEFAULT_OUTPUT: &str = "docs/index.html";
pub const DEFAULT_COMMAND: &str = "npm run build";
