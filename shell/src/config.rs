use serde::{Deserialize, Serialize};
use setlist_config::{ConfigBackend, ConfigError, TomlConfigBackend, CONFIG_BACKEND};
use setlist_core::domain::SortBy;
use setlist_core::services::share::DEFAULT_SHARE_BASE_URL;

const SECTION: &str = "shell";

/// `[shell]` section of setlist.toml.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ShellConfig {
  /// Sort used by `songs` when `--sort` is not given.
  pub default_sort: SortBy,
  /// Messaging deep link; the setlist text is appended percent-encoded.
  pub share_base_url: String,
  /// When false, `share` prints the link instead of launching a browser.
  pub open_browser: bool,
  pub prompt: String,
}

impl Default for ShellConfig {
  fn default() -> Self {
    ShellConfig {
      default_sort: SortBy::Name,
      share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
      open_browser: true,
      prompt: "setlist> ".to_string(),
    }
  }
}

impl ShellConfig {
  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(&CONFIG_BACKEND)
  }

  pub fn load_from(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    let cfg: Self = backend.load_section_with_default(SECTION)?;
    backend.save_section(SECTION, &cfg)?;
    Ok(cfg)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use setlist_config::SetlistPaths;
  use tempfile::tempdir;

  #[test]
  fn partial_section_keeps_defaults_for_the_rest() {
    let tmp = tempdir().unwrap();
    let paths = SetlistPaths::from_base(tmp.path()).unwrap();
    std::fs::write(paths.config_file(), "[shell]\ndefault_sort = \"key\"\nopen_browser = false\n").unwrap();

    let cfg = ShellConfig::load_from(&TomlConfigBackend::new(paths)).unwrap();
    assert_eq!(cfg.default_sort, SortBy::Key);
    assert!(!cfg.open_browser);
    assert_eq!(cfg.share_base_url, DEFAULT_SHARE_BASE_URL);
  }
}
