use crate::core::data::TableKind;
use crate::utils::error::{AppError, AppResult};
use clap::ValueEnum;
use ini::Ini;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

pub const CONFIG_FILE_NAME: &str = "app.ini";
pub const TOML_CONFIG_FILE_NAME: &str = "app.toml";
pub const DEFAULT_SECTION: &str = "mysql";
const APP_SECTION: &str = "app";

/// Loaded configuration: where to connect and how the client behaves
#[derive(Debug, Clone)]
pub struct Config {
    pub connection: ConnectionSettings,
    pub app: AppSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub table: TableKind,
    pub color: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            table: TableKind::default(),
            color: true,
        }
    }
}

impl AppSettings {
    fn from_options(path: &Path, options: &HashMap<String, String>) -> AppResult<Self> {
        let invalid = |key: &str, value: &str| {
            AppError::Config(format!(
                "Invalid {} '{}' in the [app] section of {}",
                key,
                value,
                path.display()
            ))
        };

        let mut settings = Self::default();
        if let Some(table) = options.get("table") {
            settings.table = TableKind::from_str(table, true).map_err(|_| invalid("table", table))?;
        }
        if let Some(color) = options.get("color") {
            settings.color = parse_bool(color).ok_or_else(|| invalid("color", color))?;
        }
        Ok(settings)
    }
}

// Accepts the spellings ConfigParser.getboolean does
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Some(true),
        "0" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}

/// A parsed configuration file.
///
/// Files ending in `.ini` are read as INI. Anything else is tried as TOML
/// first and read as INI when that fails, so an unquoted `host = localhost`
/// still loads.
enum Document {
    Toml(toml::Table),
    Ini(Ini),
}

impl Document {
    fn read(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> AppResult<Self> {
        let parse_ini = |content: &str| {
            Ini::load_from_str(content)
                .map(Document::Ini)
                .map_err(|e| AppError::Config(format!("Failed to parse {}: {}", path.display(), e)))
        };

        if path.extension().is_some_and(|ext| ext == "ini") {
            return parse_ini(content);
        }
        match toml::from_str::<toml::Table>(content) {
            Ok(table) => Ok(Document::Toml(table)),
            Err(toml_err) => parse_ini(content).map_err(|_| {
                AppError::Config(format!("Failed to parse {}: {}", path.display(), toml_err))
            }),
        }
    }

    /// Options of `[section]` as name → string value, `None` when absent
    fn section(&self, section: &str) -> Option<HashMap<String, String>> {
        match self {
            Document::Toml(document) => {
                let Some(toml::Value::Table(entries)) = document.get(section) else {
                    return None;
                };
                Some(
                    entries
                        .iter()
                        .map(|(key, value)| {
                            let value = match value {
                                toml::Value::String(s) => s.clone(),
                                other => other.to_string(),
                            };
                            (key.clone(), value)
                        })
                        .collect(),
                )
            }
            // ConfigParser lowercases option names
            Document::Ini(document) => document.section(Some(section)).map(|properties| {
                properties
                    .iter()
                    .map(|(key, value)| (key.to_lowercase(), value.to_string()))
                    .collect()
            }),
        }
    }

    fn required_section(&self, path: &Path, section: &str) -> AppResult<HashMap<String, String>> {
        self.section(section).ok_or_else(|| {
            AppError::Config(format!(
                "{} section not found in the {} file",
                section,
                path.display()
            ))
        })
    }
}

/// Read one `[section]` of the configuration file as option name → string value.
///
/// Values are not validated here.
pub fn read_section(path: &Path, section: &str) -> AppResult<HashMap<String, String>> {
    Document::read(path)?.required_section(path, section)
}

impl Config {
    /// Load connection settings from `section` and the optional `[app]` section.
    pub fn load(path: &Path, section: &str) -> AppResult<Self> {
        let document = Document::read(path)?;
        let connection = ConnectionSettings::from_section(document.required_section(path, section)?);
        let app = match document.section(APP_SECTION) {
            Some(options) => AppSettings::from_options(path, &options)?,
            None => AppSettings::default(),
        };

        Ok(Self { connection, app })
    }

    /// The first of `app.ini`, `app.toml` in the working directory, then in
    /// the per-user config directory. Falls back to the per-user `app.ini`.
    pub fn config_file_path() -> PathBuf {
        let user_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recordstore");

        [PathBuf::from("."), user_dir.clone()]
            .iter()
            .flat_map(|dir| [dir.join(CONFIG_FILE_NAME), dir.join(TOML_CONFIG_FILE_NAME)])
            .find(|candidate| candidate.exists())
            .unwrap_or_else(|| user_dir.join(CONFIG_FILE_NAME))
    }
}

/// Connection options taken verbatim from the config section
#[derive(Clone)]
pub struct ConnectionSettings {
    options: HashMap<String, String>,
}

impl ConnectionSettings {
    pub fn from_section(options: HashMap<String, String>) -> Self {
        Self { options }
    }

    fn option(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .find_map(|name| self.options.get(*name))
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Driver URL for these settings.
    ///
    /// An explicit `url` option is used as given. Otherwise a `mysql://` URL
    /// is assembled from `host`, `port`, `user`, `password` and `database`,
    /// accepting the MySQL connector aliases (`username`, `passwd`, `db`).
    pub fn url(&self) -> AppResult<String> {
        if let Some(url) = self.option(&["url"]) {
            return Ok(url.to_string());
        }

        let host = self.option(&["host"]).unwrap_or("localhost");
        let invalid = |what: &str| AppError::Config(format!("Invalid {} in connection settings", what));

        let mut url = Url::parse(&format!("mysql://{}", host)).map_err(|_| invalid("host"))?;
        if let Some(port) = self.option(&["port"]) {
            let port = port.parse::<u16>().map_err(|_| invalid("port"))?;
            url.set_port(Some(port)).map_err(|_| invalid("port"))?;
        }
        if let Some(user) = self.option(&["user", "username"]) {
            url.set_username(user).map_err(|_| invalid("user"))?;
        }
        if let Some(password) = self.option(&["password", "passwd"]) {
            url.set_password(Some(password)).map_err(|_| invalid("password"))?;
        }
        if let Some(database) = self.option(&["database", "db"]) {
            url.set_path(&format!("/{}", database.trim_start_matches('/')));
        }

        Ok(url.to_string())
    }

    /// The connection URL with any password masked, for logs
    pub fn redacted_url(&self) -> String {
        let Ok(raw) = self.url() else {
            return "<invalid connection settings>".to_string();
        };
        match Url::parse(&raw) {
            Ok(mut url) if url.password().is_some() => {
                let _ = url.set_password(Some("***"));
                url.to_string()
            }
            _ => raw,
        }
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("url", &self.redacted_url())
            .finish()
    }
}
