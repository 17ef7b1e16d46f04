use crate::cli::{ExtractArgs, InspectArgs, PackArgs, DEFAULT_EXTENSIONS};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Defaults shared by the mask tools, read from a JSON file.
///
/// Each tool picks the keys it understands; unknown keys are ignored.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    pub extensions: Option<String>,
    pub strict: Option<bool>,
    pub output_dir: Option<String>,
    pub verbose: Option<bool>,
}

impl ToolConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

// Command-line values take precedence: config values only fill options that
// are still at their defaults.

impl InspectArgs {
    pub fn load_and_merge_config(&mut self) -> Result<()> {
        if let Some(config_path) = self.config_file.clone() {
            let config = ToolConfig::load(&config_path)?;
            self.merge_from_config(config);

            if self.verbose {
                eprintln!("Loaded configuration from: {:?}", config_path);
            }
        }
        Ok(())
    }

    fn merge_from_config(&mut self, config: ToolConfig) {
        if self.extensions_str == DEFAULT_EXTENSIONS {
            if let Some(ext) = config.extensions {
                self.extensions_str = ext;
            }
        }

        if !self.strict {
            self.strict = config.strict.unwrap_or(false);
        }

        if !self.verbose {
            self.verbose = config.verbose.unwrap_or(false);
        }
    }
}

impl ExtractArgs {
    pub fn load_and_merge_config(&mut self) -> Result<()> {
        if let Some(config_path) = self.config_file.clone() {
            let config = ToolConfig::load(&config_path)?;
            self.merge_from_config(config);

            if self.verbose {
                eprintln!("Loaded configuration from: {:?}", config_path);
            }
        }
        Ok(())
    }

    fn merge_from_config(&mut self, config: ToolConfig) {
        if self.output_dir.is_none() {
            self.output_dir = config.output_dir.map(PathBuf::from);
        }

        if !self.verbose {
            self.verbose = config.verbose.unwrap_or(false);
        }
    }
}

impl PackArgs {
    pub fn load_and_merge_config(&mut self) -> Result<()> {
        if let Some(config_path) = self.config_file.clone() {
            let config = ToolConfig::load(&config_path)?;
            if !self.verbose {
                self.verbose = config.verbose.unwrap_or(false);
            }

            if self.verbose {
                eprintln!("Loaded configuration from: {:?}", config_path);
            }
        }
        Ok(())
    }
}
