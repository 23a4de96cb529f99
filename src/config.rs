//! Configuration file support
//!
//! Looked up in the project root as `lintconstraints.toml`,
//! `.lintconstraints.toml`, `.lintconstraints.yml` or
//! `.lintconstraints.yaml`:
//!
//! ```toml
//! target_sdk = 33
//!
//! [restrictions]
//! source = "hiddenapi-flags.txt"
//! data_version = "34.0.0"
//! exclude = ['\$\$Lambda\$']
//! ```

use crate::error::{Error, Result};
use crate::report::ReportFormat;
use crate::restriction::{RestrictionCache, RestrictionParser};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_LOCATIONS: &[&str] = &[
    "lintconstraints.toml",
    ".lintconstraints.toml",
    ".lintconstraints.yml",
    ".lintconstraints.yaml",
];

pub const DEFAULT_TARGET_SDK: u32 = 34;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Target SDK of the app being checked
    pub target_sdk: u32,

    /// Default report format
    pub format: ReportFormat,

    pub restrictions: RestrictionConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RestrictionConfig {
    /// Text restriction data (`owner,member->SEVERITY` lines)
    pub source: Option<PathBuf>,

    /// Where the binary database is cached
    pub cache_dir: Option<PathBuf>,

    /// Identifies the source data; derived from the file when unset
    pub data_version: Option<String>,

    /// Owner patterns to skip; replaces the built-in lambda exclusions
    pub exclude: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_sdk: DEFAULT_TARGET_SDK,
            format: ReportFormat::default(),
            restrictions: RestrictionConfig::default(),
        }
    }
}

impl Config {
    /// Loads a TOML or YAML file, chosen by extension. Relative paths in
    /// the file are resolved against the file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config_error = |message: String| Error::Config {
            path: path.to_path_buf(),
            message,
        };

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let mut config: Config = match extension {
            "toml" => toml::from_str(&content).map_err(|e| config_error(e.to_string()))?,
            "yml" | "yaml" => serde_yaml::from_str(&content).map_err(|e| config_error(e.to_string()))?,
            other => return Err(config_error(format!("unsupported config format `{}`", other))),
        };

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Loads the first config file found in `root`, or the defaults
    pub fn from_default_locations(root: &Path) -> Result<Self> {
        for name in DEFAULT_LOCATIONS {
            let candidate = root.join(name);
            if candidate.is_file() {
                return Self::from_file(&candidate);
            }
        }
        Ok(Self::default())
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut Option<PathBuf>| {
            if let Some(p) = path {
                if p.is_relative() {
                    *p = base.join(&*p);
                }
            }
        };
        resolve(&mut self.restrictions.source);
        resolve(&mut self.restrictions.cache_dir);
    }

    pub fn restriction_parser(&self) -> Result<RestrictionParser> {
        match &self.restrictions.exclude {
            Some(patterns) => RestrictionParser::with_exclusions(patterns.as_slice()),
            None => Ok(RestrictionParser::new()),
        }
    }

    /// Cache for the configured restriction source
    pub fn restriction_cache(&self) -> Result<RestrictionCache> {
        let source = self.restrictions.source.clone().ok_or(Error::MissingSource)?;
        let cache_dir = self
            .restrictions
            .cache_dir
            .clone()
            .or_else(RestrictionCache::default_cache_dir)
            .unwrap_or_else(|| std::env::temp_dir().join("lintconstraints"));

        let mut cache = RestrictionCache::new(cache_dir, source).with_parser(self.restriction_parser()?);
        if let Some(version) = &self.restrictions.data_version {
            cache = cache.with_data_version(version.clone());
        }
        Ok(cache)
    }
}
