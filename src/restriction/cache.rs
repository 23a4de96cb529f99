//! On-disk cache of the binary restriction database.
//!
//! The cache file lives in `~/.cache/lintconstraints/` by default and its
//! name carries both the format version and the data version, so a new
//! source or a new layout never reuses an old file.

use super::database::{write_database, PrivateApiLookup, FORMAT_VERSION};
use super::parser::RestrictionParser;
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct RestrictionCache {
    cache_dir: PathBuf,
    source: PathBuf,
    /// Configured data version; derived from the source contents when unset
    data_version: Option<String>,
    parser: RestrictionParser,
}

impl RestrictionCache {
    pub fn new(cache_dir: impl Into<PathBuf>, source: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            source: source.into(),
            data_version: None,
            parser: RestrictionParser::new(),
        }
    }

    pub fn with_data_version(mut self, version: impl Into<String>) -> Self {
        self.data_version = Some(version.into());
        self
    }

    pub fn with_parser(mut self, parser: RestrictionParser) -> Self {
        self.parser = parser;
        self
    }

    /// Per-user cache directory, if the platform has one
    pub fn default_cache_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "lintconstraints").map(|dirs| dirs.cache_dir().to_path_buf())
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Version string identifying the current source data
    pub fn data_version(&self) -> Result<String> {
        match &self.data_version {
            Some(version) => Ok(sanitize(version)),
            None => {
                let bytes = fs::read(&self.source).map_err(|e| Error::io(&self.source, e))?;
                let hash = blake3::hash(&bytes).to_hex();
                Ok(format!("{:x}-{}", bytes.len(), &hash.as_str()[..16]))
            }
        }
    }

    pub fn cache_path(&self) -> Result<PathBuf> {
        Ok(self.cache_dir.join(format!(
            "private-apis-v{}-{}.bin",
            FORMAT_VERSION,
            self.data_version()?
        )))
    }

    /// Loads the cached database, rebuilding it from the source when the
    /// file is missing, empty, unreadable or from another version
    pub fn load(&self) -> Result<PrivateApiLookup> {
        let version = self.data_version()?;
        let path = self.cache_path()?;

        match fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => debug!("Cache file {} is empty", path.display()),
            Ok(bytes) => match PrivateApiLookup::from_bytes(bytes) {
                Ok(lookup) if lookup.data_version() == version => {
                    debug!("Using cached restrictions from {}", path.display());
                    return Ok(lookup);
                }
                Ok(lookup) => debug!(
                    "Cache file {} has data version {}, expected {}",
                    path.display(),
                    lookup.data_version(),
                    version
                ),
                Err(e) => debug!("Discarding cache file {}: {}", path.display(), e),
            },
            Err(e) => debug!("No usable cache at {}: {}", path.display(), e),
        }

        self.rebuild()
    }

    /// Parses the source and atomically replaces the cache file.
    ///
    /// The database is written to a temporary file in the cache directory
    /// and renamed into place, so concurrent readers see either the old
    /// file or the complete new one.
    pub fn rebuild(&self) -> Result<PrivateApiLookup> {
        let version = self.data_version()?;
        let path = self.cache_path()?;

        let table = self.parser.parse_file(&self.source)?;
        let bytes = write_database(&table, &version)?;

        fs::create_dir_all(&self.cache_dir).map_err(|e| Error::io(&self.cache_dir, e))?;
        let mut temp = tempfile::NamedTempFile::new_in(&self.cache_dir).map_err(|e| Error::io(&self.cache_dir, e))?;
        temp.write_all(&bytes).map_err(|e| Error::io(temp.path(), e))?;
        temp.persist(&path).map_err(|e| Error::io(&path, e.error))?;

        let stats = table.stats();
        info!(
            "Built restriction database {} ({} entries, {} skipped, {} excluded)",
            path.display(),
            stats.entries,
            stats.skipped,
            stats.excluded
        );
        PrivateApiLookup::from_bytes(bytes)
    }

    /// Like [`RestrictionCache::load`], but degrades to a lookup that
    /// answers `Unknown` for everything
    pub fn load_or_unknown(&self) -> PrivateApiLookup {
        match self.load() {
            Ok(lookup) => lookup,
            Err(e) => {
                warn!("Restriction data unavailable, treating all members as unknown: {}", e);
                PrivateApiLookup::empty()
            }
        }
    }
}

/// Keeps configured versions safe to embed in a file name
fn sanitize(version: &str) -> String {
    version
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
