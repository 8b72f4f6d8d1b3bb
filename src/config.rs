//! Configuration for the anima curator.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (applied by the CLI on top of the resolved value)
//! 2. Environment variables (ANIMA_LIBRARY, ANIMA_OUTPUT, ANIMA_SITE_URL, GNEWS_API_KEY)
//! 3. Config file (.anima/config.yaml)
//! 4. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .anima/config.yaml
//! - Relative paths are resolved against the project root (the directory
//!   containing .anima/)
//!
//! Settings are resolved once and handed to each component explicitly.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub site: Option<SiteConfig>,
    #[serde(default)]
    pub news: Option<NewsConfig>,
    #[serde(default)]
    pub scheduler: Option<SchedulerConfig>,
    #[serde(default)]
    pub ingest: Option<IngestConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Master library JSON
    pub library: Option<String>,
    /// Rendered front-end data file
    pub output: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub url: Option<String>,
    pub html: Option<String>,
    pub rss: Option<String>,
    pub social: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    pub interval_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    pub input: Option<String>,
    pub output: Option<String>,
    pub request_delay_ms: Option<u64>,
    pub timeout_seconds: Option<u64>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Settings {
    /// Master library JSON
    pub library: PathBuf,
    /// Rendered front-end data file
    pub output: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    pub site: SiteSettings,
    pub news: NewsSettings,
    pub scheduler: SchedulerSettings,
    pub ingest: IngestSettings,
}

/// Public site and the marketing files derived from each edition
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub url: String,
    pub html_file: PathBuf,
    pub rss_file: PathBuf,
    pub social_file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct NewsSettings {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    pub interval_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub request_delay_ms: u64,
    pub timeout_seconds: u64,
}

pub const DEFAULT_LIBRARY: &str = "master_library.json";
pub const DEFAULT_OUTPUT: &str = "js/data.js";
pub const DEFAULT_SITE_URL: &str = "https://linsonlukose-bit.github.io/DailyMuse";

impl NewsSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl SchedulerSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

impl IngestSettings {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Settings {
    /// Defaults with paths relative to `base`
    pub fn defaults(base: &Path) -> Self {
        Self {
            library: base.join(DEFAULT_LIBRARY),
            output: base.join(DEFAULT_OUTPUT),
            config_file: None,
            site: SiteSettings {
                url: DEFAULT_SITE_URL.to_string(),
                html_file: base.join("index.html"),
                rss_file: base.join("feed.xml"),
                social_file: base.join("daily_share.txt"),
            },
            news: NewsSettings {
                api_key: None,
                endpoint: crate::adapters::gnews::DEFAULT_ENDPOINT.to_string(),
                timeout_seconds: 10,
            },
            scheduler: SchedulerSettings {
                interval_seconds: 30,
            },
            ingest: IngestSettings {
                input: base.join("ingest.txt"),
                output: base.join("new_entries.json"),
                request_delay_ms: 500,
                timeout_seconds: 15,
            },
        }
    }

    /// Load settings from the discovered config file and the process environment
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to determine current directory")?;
        let config_file = find_config_file(&cwd);
        Self::resolve(&cwd, config_file.as_deref(), |key| std::env::var(key).ok())
    }

    /// Resolve settings from an optional config file and an environment lookup
    pub fn resolve<F>(cwd: &Path, config_file: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match config_file {
            Some(config_path) => {
                let config = load_config_file(config_path)?;

                // Project root is the parent of .anima/
                let base_dir = config_path
                    .parent()
                    .and_then(|p| p.parent())
                    .unwrap_or(cwd)
                    .to_path_buf();

                let mut settings = Self::defaults(&base_dir);
                settings.apply_file(&base_dir, config);
                settings.config_file = Some(config_path.to_path_buf());
                settings
            }
            None => Self::defaults(cwd),
        };

        if let Some(library) = env("ANIMA_LIBRARY") {
            settings.library = PathBuf::from(library);
        }
        if let Some(output) = env("ANIMA_OUTPUT") {
            settings.output = PathBuf::from(output);
        }
        if let Some(url) = env("ANIMA_SITE_URL") {
            settings.site.url = url;
        }
        if let Some(key) = env("GNEWS_API_KEY").filter(|k| !k.trim().is_empty()) {
            settings.news.api_key = Some(key);
        }

        Ok(settings)
    }

    fn apply_file(&mut self, base: &Path, config: ConfigFile) {
        if let Some(ref library) = config.paths.library {
            self.library = resolve_path(base, library);
        }
        if let Some(ref output) = config.paths.output {
            self.output = resolve_path(base, output);
        }

        if let Some(site) = config.site {
            if let Some(url) = site.url {
                self.site.url = url;
            }
            if let Some(ref html) = site.html {
                self.site.html_file = resolve_path(base, html);
            }
            if let Some(ref rss) = site.rss {
                self.site.rss_file = resolve_path(base, rss);
            }
            if let Some(ref social) = site.social {
                self.site.social_file = resolve_path(base, social);
            }
        }

        if let Some(news) = config.news {
            self.news.api_key = news.api_key.or(self.news.api_key.take());
            if let Some(endpoint) = news.endpoint {
                self.news.endpoint = endpoint;
            }
            if let Some(timeout) = news.timeout_seconds {
                self.news.timeout_seconds = timeout;
            }
        }

        if let Some(interval) = config.scheduler.and_then(|s| s.interval_seconds) {
            self.scheduler.interval_seconds = interval;
        }

        if let Some(ingest) = config.ingest {
            if let Some(ref input) = ingest.input {
                self.ingest.input = resolve_path(base, input);
            }
            if let Some(ref output) = ingest.output {
                self.ingest.output = resolve_path(base, output);
            }
            if let Some(delay) = ingest.request_delay_ms {
                self.ingest.request_delay_ms = delay;
            }
            if let Some(timeout) = ingest.timeout_seconds {
                self.ingest.timeout_seconds = timeout;
            }
        }
    }
}

/// Find config file by searching `start` and its parents
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".anima").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(root: &Path, yaml: &str) -> PathBuf {
        let anima_dir = root.join(".anima");
        std::fs::create_dir_all(&anima_dir).unwrap();
        let path = anima_dir.join("config.yaml");
        std::fs::write(&path, yaml).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_file() {
        let cwd = PathBuf::from("/srv/anima");
        let settings = Settings::resolve(&cwd, None, no_env).unwrap();

        assert_eq!(settings.library, cwd.join("master_library.json"));
        assert_eq!(settings.output, cwd.join("js/data.js"));
        assert_eq!(settings.site.url, DEFAULT_SITE_URL);
        assert_eq!(settings.scheduler.interval(), Duration::from_secs(30));
        assert!(settings.news.api_key.is_none());
        assert!(settings.config_file.is_none());
    }

    #[test]
    fn test_config_file_relative_to_project_root() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            temp.path(),
            r#"
paths:
  library: backend/master_library.json
  output: /var/www/js/data.js
site:
  url: https://example.org/muse
  rss: public/feed.xml
news:
  timeout_seconds: 3
scheduler:
  interval_seconds: 86400
"#,
        );

        let settings = Settings::resolve(temp.path(), Some(&config_path), no_env).unwrap();
        assert_eq!(settings.library, temp.path().join("backend/master_library.json"));
        assert_eq!(settings.output, PathBuf::from("/var/www/js/data.js"));
        assert_eq!(settings.site.url, "https://example.org/muse");
        assert_eq!(settings.site.rss_file, temp.path().join("public/feed.xml"));
        assert_eq!(settings.site.html_file, temp.path().join("index.html"));
        assert_eq!(settings.news.timeout(), Duration::from_secs(3));
        assert_eq!(settings.scheduler.interval_seconds, 86400);
        assert_eq!(settings.config_file.as_deref(), Some(config_path.as_path()));
    }

    #[test]
    fn test_env_overrides_file() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            temp.path(),
            "paths:\n  library: lib.json\nnews:\n  api_key: from-file\n",
        );
        let env: HashMap<&str, &str> = [
            ("ANIMA_LIBRARY", "/data/library.json"),
            ("GNEWS_API_KEY", "from-env"),
        ]
        .into_iter()
        .collect();

        let settings = Settings::resolve(temp.path(), Some(&config_path), |k| {
            env.get(k).map(|v| v.to_string())
        })
        .unwrap();

        assert_eq!(settings.library, PathBuf::from("/data/library.json"));
        assert_eq!(settings.news.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_find_config_file_in_parent() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(temp.path(), "paths: {}\n");
        let nested = temp.path().join("backend").join("jobs");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config_file(&nested), Some(config_path));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(temp.path(), "paths: [unclosed\n");

        assert!(Settings::resolve(temp.path(), Some(&config_path), no_env).is_err());
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(resolve_path(&base, "./subdir"), PathBuf::from("/home/user/project/./subdir"));
        assert_eq!(resolve_path(&base, "/absolute/path"), PathBuf::from("/absolute/path"));
    }
}
