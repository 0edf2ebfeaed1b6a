use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use steering_power::LoadMode;

/// Default config template created when no config exists
const DEFAULT_CONFIG: &str = r#"
[powers]
# Each entry is either a power directory or a directory of powers
directories = ["~/.steering/powers", ".steering/powers", "powers"]
load_mode = "lazy"  # or "eager"

[logging]
level = "info"  # trace, debug, info, warn, error
"#;

#[derive(Debug, Deserialize, Clone)]
pub struct PowersConfig {
    pub directories: Vec<String>,
    #[serde(default)]
    pub load_mode: LoadMode,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub powers: PowersConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Get the global config path: ~/.steering/steering.toml
    fn global_config_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(".steering").join("steering.toml"))
            .ok_or_else(|| anyhow!("Could not find home directory"))
    }

    /// Ensure global config directory and file exist, creating defaults if needed
    fn ensure_global_config() -> Result<PathBuf> {
        let config_path = Self::global_config_path()?;

        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)?;
                eprintln!("Created config directory: {}", config_dir.display());
            }
        }

        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG.trim())?;
            eprintln!("Created default config: {}", config_path.display());
        }

        Ok(config_path)
    }

    /// Built-in defaults; every later layer overrides them
    fn defaults() -> config::ConfigBuilder<config::builder::DefaultState> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
    }

    /// Load configuration with layered approach:
    /// 1. Global config: ~/.steering/steering.toml (auto-created if missing)
    /// 2. Local override: ./steering.toml (workspace, optional)
    /// 3. Environment variables (highest priority)
    pub fn load() -> Result<Self> {
        // Load .env file from current directory
        dotenvy::dotenv().ok();

        let global_config_path = Self::ensure_global_config()?;

        // Later sources override earlier ones
        let mut config_builder = Self::defaults()
            .add_source(config::File::from(global_config_path))
            .add_source(config::File::with_name("steering").required(false))
            .add_source(Self::environment("STEERING"));

        // Convenience env var overrides
        if let Ok(level) = env::var("STEERING_LOG_LEVEL") {
            config_builder = config_builder.set_override("logging.level", level)?;
        }

        if let Ok(dir) = env::var("STEERING_POWERS_DIR") {
            config_builder = config_builder.set_override("powers.directories", vec![dir])?;
        }

        Self::from_builder(config_builder)
    }

    /// Environment layer: `<PREFIX>__SECTION__KEY`, with comma-separated
    /// values for `powers.directories`
    fn environment(prefix: &str) -> config::Environment {
        config::Environment::with_prefix(prefix)
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("powers.directories")
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Configured power directories with `~` expanded to the home directory
    pub fn power_directories(&self) -> Vec<PathBuf> {
        let home = dirs::home_dir();
        self.powers
            .directories
            .iter()
            .map(|dir| expand_home(dir, home.as_deref()))
            .collect()
    }
}

fn expand_home(dir: &str, home: Option<&Path>) -> PathBuf {
    match (dir.strip_prefix('~'), home) {
        (Some(rest), Some(home)) => home.join(rest.trim_start_matches(['/', '\\'])),
        _ => PathBuf::from(dir),
    }
}
