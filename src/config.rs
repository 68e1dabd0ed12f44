use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Env var naming an optional YAML config file.
pub const CONFIG_ENV: &str = "FILESERVE_CONFIG";

/// Startup configuration, built once and shared read-only by every
/// connection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// How long a connection may sit without a request line before it is closed
    pub idle_timeout_ms: u64,
    /// Value of the `Server` response header
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Document root, without a trailing `/`
    pub root: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            idle_timeout_ms: 3000,
            name: "MyWebServer/1.0".to_string(),
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: ".".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

impl Config {
    /// Loads configuration from defaults, the YAML file named by
    /// `FILESERVE_CONFIG`, then the `LISTEN` and `ROOT` env vars.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = listen_addr;
        }
        if let Ok(root) = std::env::var("ROOT") {
            cfg.static_files.root = root;
        }

        Ok(cfg.normalized())
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;

        Self::from_yaml(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(text)?;
        Ok(cfg.normalized())
    }

    /// Applies the positional `<port> <rootPath>` arguments, if given.
    ///
    /// The port binds every interface.
    pub fn with_args(mut self, args: &[String]) -> anyhow::Result<Self> {
        match args {
            [] => return Ok(self),
            [port, root, ..] => {
                let port: u16 = port
                    .parse()
                    .with_context(|| format!("invalid port {port:?}"))?;
                self.server.listen_addr = format!("0.0.0.0:{port}");
                self.static_files.root = root.clone();
            }
            [_] => anyhow::bail!("usage: fileserve <port> <rootPath>"),
        }

        Ok(self.normalized())
    }

    fn normalized(mut self) -> Self {
        let home = std::env::var("HOME").ok();
        self.static_files.root = normalize_root(&self.static_files.root, home.as_deref());
        self
    }
}

/// Expands a leading `~` to `home` and strips one trailing `/`.
///
/// # Example
///
/// ```
/// # use fileserve::config::normalize_root;
/// assert_eq!(normalize_root("~/site/", Some("/home/ann")), "/home/ann/site");
/// assert_eq!(normalize_root("/srv/www", None), "/srv/www");
/// ```
pub fn normalize_root(root: &str, home: Option<&str>) -> String {
    let mut root = match (root.strip_prefix('~'), home) {
        (Some(rest), Some(home)) => format!("{home}{rest}"),
        _ => root.to_string(),
    };

    if root.ends_with('/') {
        root.pop();
    }

    root
}
