//! Loader for harvest configuration with YAML + environment overlays.
//!
//! The schema covers the remote grid endpoint and credentials, the translation
//! service, harvest tunables, and the ordered list of browser/device targets.
//! Credentials are normally injected as `${VAR}` references expanded at load
//! time, so the file itself stays safe to commit.
use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use hemero_common::BrowserTarget;
use serde::Deserialize;
use serde_json::Value;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Deserialize)]
pub struct HarvestConfig {
    pub version: Option<String>,
    #[serde(default)]
    pub grid: GridSettings,
    pub translator: TranslatorSettings,
    #[serde(default)]
    pub harvest: HarvestSettings,
    pub targets: Vec<BrowserTarget>,
}

/// Remote WebDriver endpoint. Without credentials the loader still succeeds
/// and the grid client issues plain capability requests (local drivers).
#[derive(Debug, Deserialize)]
pub struct GridSettings {
    #[serde(default = "default_hub_url")]
    pub hub_url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub access_key: Option<String>,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            hub_url: default_hub_url(),
            username: None,
            access_key: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TranslatorSettings {
    pub api_key: String,
    #[serde(default = "default_translator_host")]
    pub api_host: String,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
}

#[derive(Debug, Deserialize)]
pub struct HarvestSettings {
    /// Directory lead images are written into; shared across sessions.
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,
    /// Upper bound on concurrently running sessions.
    #[serde(default = "default_max_parallel_sessions")]
    pub max_parallel_sessions: usize,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            image_dir: default_image_dir(),
            max_parallel_sessions: default_max_parallel_sessions(),
        }
    }
}

fn default_hub_url() -> String {
    "https://hub-cloud.browserstack.com/wd/hub".into()
}
fn default_translator_host() -> String {
    "rapid-translate-multi-traduction.p.rapidapi.com".into()
}
fn default_source_lang() -> String {
    "es".into()
}
fn default_target_lang() -> String {
    "en".into()
}
fn default_image_dir() -> PathBuf {
    PathBuf::from("images")
}
fn default_max_parallel_sessions() -> usize {
    5
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct HarvestConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for HarvestConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl HarvestConfigLoader {
    /// Start with sensible defaults: YAML file + `HEMERO`-prefixed env
    /// overrides (keys separated by `__`, e.g.
    /// `HEMERO__TRANSLATOR__API_HOST`).
    ///
    /// ```
    /// use hemero_config::HarvestConfigLoader;
    /// use hemero_common::BrowserTarget;
    ///
    /// let config = HarvestConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// version: "1"
    /// translator:
    ///   api_key: "k"
    /// targets:
    ///   - kind: desktop
    ///     browser: Chrome
    ///     os: Windows
    ///     os_version: "10"
    /// "#,
    ///     )
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.grid.hub_url, "https://hub-cloud.browserstack.com/wd/hub");
    /// assert_eq!(config.translator.source_lang, "es");
    /// assert!(matches!(config.targets[0], BrowserTarget::Desktop { .. }));
    /// ```
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(Environment::with_prefix("HEMERO").separator("__"));
        Self { builder }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            // FIXME: support optional config files so grid-less smoke runs can rely purely on environment variables.
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// `${VAR}` placeholders anywhere in the merged tree are expanded before
    /// the strongly typed structs materialise, so secrets can live in the
    /// environment while the file stays declarative.
    ///
    /// ```
    /// use hemero_config::HarvestConfigLoader;
    ///
    /// unsafe { std::env::set_var("GRID_KEY", "injected-from-env"); }
    ///
    /// let config = HarvestConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// grid:
    ///   username: "someone"
    ///   access_key: "${GRID_KEY}"
    /// translator:
    ///   api_key: "k"
    /// targets:
    ///   - kind: device
    ///     browser: Safari
    ///     device: "iPhone 13"
    ///     os_version: "15"
    /// "#,
    ///     )
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.grid.access_key.as_deref(), Some("injected-from-env"));
    ///
    /// unsafe { std::env::remove_var("GRID_KEY"); }
    /// ```
    pub fn load(self) -> Result<HarvestConfig, ConfigError> {
        let cfg = self.builder.build()?;

        // Expand ${VAR} references on the loose value tree, then materialise.
        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: HarvestConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}
