//! glb2stl.toml configuration
//!
//! Holds converter defaults and, optionally, a list of conversion jobs for
//! the `build` command.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::container::DecodeOptions;
use crate::convert::ConvertOptions;
use crate::stl::{StlEncoding, StlOptions, DEFAULT_HEADER, DEFAULT_SOLID_NAME};

/// Default manifest file name
pub const DEFAULT_CONFIG_FILE: &str = "glb2stl.toml";

/// glb2stl.toml structure
#[derive(Debug, Default, Deserialize)]
pub struct BatchConfig {
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub decode: DecodeSection,
    #[serde(default)]
    pub jobs: Vec<JobEntry>,
}

/// STL output defaults
#[derive(Debug, Deserialize)]
pub struct OutputSection {
    /// Write ASCII instead of binary STL.
    /// Default: false
    #[serde(default)]
    pub ascii: bool,

    /// Binary STL header text (max 80 bytes)
    #[serde(default = "default_header")]
    pub header: String,

    /// ASCII STL solid name
    #[serde(default = "default_solid_name")]
    pub solid_name: String,
}

fn default_header() -> String {
    DEFAULT_HEADER.to_string()
}

fn default_solid_name() -> String {
    DEFAULT_SOLID_NAME.to_string()
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            ascii: false,
            header: default_header(),
            solid_name: default_solid_name(),
        }
    }
}

/// Container decoding policy
#[derive(Debug, Default, Deserialize)]
pub struct DecodeSection {
    /// Reject container versions other than 2.
    /// Default: false (warn and continue)
    #[serde(default)]
    pub strict_version: bool,
}

/// Single conversion job
#[derive(Debug, Deserialize)]
pub struct JobEntry {
    pub input: String,
    /// Defaults to the input path with an `.stl` extension
    #[serde(default)]
    pub output: Option<String>,
    /// Per-job override of `output.ascii`
    #[serde(default)]
    pub ascii: Option<bool>,
}

impl BatchConfig {
    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Parse config from string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse glb2stl.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config fields
    pub fn validate(&self) -> Result<()> {
        self.convert_options()
            .stl
            .validate()
            .context("Invalid [output] section")?;
        for (i, job) in self.jobs.iter().enumerate() {
            if job.input.trim().is_empty() {
                anyhow::bail!("jobs[{}] has an empty input path", i);
            }
        }
        Ok(())
    }

    /// Converter options from the config defaults
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            decode: DecodeOptions {
                strict_version: self.decode.strict_version,
            },
            stl: StlOptions {
                encoding: if self.output.ascii {
                    StlEncoding::Ascii
                } else {
                    StlEncoding::Binary
                },
                header: self.output.header.clone(),
                solid_name: self.output.solid_name.clone(),
            },
        }
    }
}

impl JobEntry {
    /// Resolve input/output paths against `base_dir`
    pub fn paths(&self, base_dir: &Path) -> (PathBuf, PathBuf) {
        let input = base_dir.join(&self.input);
        let output = match &self.output {
            Some(output) => base_dir.join(output),
            None => crate::convert::default_output_path(&input),
        };
        (input, output)
    }
}
