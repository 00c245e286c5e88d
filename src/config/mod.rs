use std::env;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;

pub const DEFAULT_BASE_URL: &str = "https://localhost:9000";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(alias = "url")]
    pub base_url: Option<String>,
    pub timeout: Option<u64>,
    pub proxy: Option<String>,
    #[serde(alias = "insecure")]
    pub accept_invalid_certs: Option<bool>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub no_color: Option<bool>,
    pub sort: Option<String>,
    pub search: Option<String>,
}

fn home_dir() -> Option<PathBuf> {
    ["HOME", "USERPROFILE"]
        .into_iter()
        .filter_map(env::var_os)
        .find(|home| !home.is_empty())
        .map(PathBuf::from)
}

pub fn default_config_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".tinyca").join("config.yml"))
}

/// Replaces a leading `~` component with the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let raw = Path::new(path);
    let mut components = raw.components();
    match (components.next(), home_dir()) {
        (Some(Component::Normal(first)), Some(home)) if first == "~" => {
            home.join(components.as_path())
        }
        _ => raw.to_path_buf(),
    }
}

pub fn parse_config(contents: &str, origin: &Path) -> Result<ConfigFile, String> {
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str::<ConfigFile>(contents)
        .map_err(|e| format!("failed to parse config '{}': {e}", origin.display()))
}

/// Where settings are read from. A path given on the command line must
/// exist; the default location is optional.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Default(PathBuf),
    Unavailable,
}

impl ConfigSource {
    pub fn resolve(explicit: Option<&str>) -> Self {
        match explicit {
            Some(raw) => Self::Explicit(expand_tilde(raw)),
            None => default_config_path().map_or(Self::Unavailable, Self::Default),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(path) | Self::Default(path) => Some(path),
            Self::Unavailable => None,
        }
    }

    pub fn load(&self) -> Result<ConfigFile, String> {
        let Some(path) = self.path() else {
            return Ok(ConfigFile::default());
        };
        match fs::read_to_string(path) {
            Ok(contents) => parse_config(&contents, path),
            Err(e) if e.kind() == ErrorKind::NotFound => match self {
                Self::Default(_) => Ok(ConfigFile::default()),
                _ => Err(format!("config file not found '{}'", path.display())),
            },
            Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
        }
    }
}

pub fn default_config_yaml() -> String {
    r#"# TinyCA dashboard config
#
# Location (default):
#   ~/.tinyca/config.yml

# CA endpoint
base_url: https://localhost:9000
timeout: 10
# proxy: http://127.0.0.1:8080
# step-ca roots are usually not in the system trust store
accept_invalid_certs: false

# View
sort: desc
# search: lan

# Output (optional)
# output: ./certificates.html
# output_format: html
no_color: false
"#
    .to_string()
}

/// Writes the commented default config unless a file is already there.
/// Returns whether a new file was created.
pub fn write_default_config(path: &Path) -> Result<bool, String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            format!(
                "failed to create config directory '{}': {e}",
                parent.display()
            )
        })?;
    }
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(format!("failed to create config file '{}': {e}", path.display())),
    };
    file.write_all(default_config_yaml().as_bytes())
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(true)
}
