use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: Default::default(),
            output: Default::default(),
            logging: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model: String,
    pub api_base_url: String,
    /// Literal key. Leave empty to read it from `api_key_env` instead.
    pub api_key: String,
    pub api_key_env: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
    pub retry_count: u32,
    pub retry_delay_seconds: u64,
    pub timeout_seconds: u64,
}
impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".into(),
            api_base_url: "https://generativelanguage.googleapis.com/v1beta/models".into(),
            api_key: "".into(),
            api_key_env: "GEMINI_API_KEY".into(),
            temperature: 0.5,
            max_output_tokens: 32648,
            top_p: 0.8,
            top_k: 40,
            retry_count: 5,
            retry_delay_seconds: 5,
            timeout_seconds: 600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub out_dir: String,
    pub report_filename: String,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            out_dir: "data".into(),
            report_filename: "jobs-daily.md".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: true,
            file_path: "".into(),
        }
    }
}
