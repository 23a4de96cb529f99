//! Restriction source ingestion
//!
//! Reads lines of the form
//!
//! ```text
//! Landroid/app/Activity;,mCalled:Z->GREY
//! Landroid/app/Activity;,dispatchActivityPostCreated(Landroid/os/Bundle;)V->BLACK
//! ```
//!
//! and groups them container → class → member. Lines that do not parse,
//! are not valid UTF-8, carry an unknown severity or name an excluded
//! (synthetic) class are skipped; a name used as both a package and a class
//! aborts ingestion.

use super::{member_key, normalize_owner, split_owner, Restriction};
use crate::error::{Error, Result};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

/// Owners matching these are never stored: synthetic lambda and
/// interface-companion classes generated by desugaring
pub const DEFAULT_EXCLUSIONS: &[&str] = &[r"\$\$Lambda\$", r"\$-CC$"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Package,
    Class,
}

impl ContainerKind {
    pub(crate) fn code(&self) -> u8 {
        match self {
            ContainerKind::Package => 0,
            ContainerKind::Class => 1,
        }
    }
}

/// Members of one container, keyed by simple class name then member key
#[derive(Debug, Clone)]
pub struct ContainerEntry {
    pub kind: ContainerKind,
    pub classes: BTreeMap<String, BTreeMap<String, Restriction>>,
}

/// Counters collected while parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub entries: usize,
    pub skipped: usize,
    pub excluded: usize,
}

/// Parsed restriction data, sorted and ready to be written out
#[derive(Debug, Clone, Default)]
pub struct RestrictionTable {
    containers: BTreeMap<String, ContainerEntry>,
    stats: ParseStats,
}

impl RestrictionTable {
    pub fn containers(&self) -> impl Iterator<Item = (&String, &ContainerEntry)> {
        self.containers.iter()
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    pub fn class_count(&self) -> usize {
        self.containers.values().map(|c| c.classes.len()).sum()
    }

    pub fn member_count(&self) -> usize {
        self.containers
            .values()
            .flat_map(|c| c.classes.values())
            .map(|members| members.len())
            .sum()
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// In-memory lookup, mostly useful for checking a freshly parsed table
    pub fn get(&self, owner: &str, member: &str, descriptor: Option<&str>) -> Restriction {
        let owner = normalize_owner(owner);
        let (container, class, _) = split_owner(&owner);
        self.containers
            .get(container)
            .and_then(|c| c.classes.get(class))
            .and_then(|members| members.get(&member_key(member, descriptor)))
            .copied()
            .unwrap_or(Restriction::Unknown)
    }
}

/// Parser for the restriction text format
#[derive(Debug, Clone)]
pub struct RestrictionParser {
    exclusions: Vec<Regex>,
}

impl RestrictionParser {
    pub fn new() -> Self {
        let exclusions = DEFAULT_EXCLUSIONS
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect();
        Self { exclusions }
    }

    /// Replace the default exclusions with custom patterns
    pub fn with_exclusions<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let exclusions = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern.as_ref()).map_err(|source| Error::InvalidPattern {
                    pattern: pattern.as_ref().to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { exclusions })
    }

    fn is_excluded(&self, owner: &str) -> bool {
        self.exclusions.iter().any(|re| re.is_match(owner))
    }

    pub fn parse_file(&self, path: &Path) -> Result<RestrictionTable> {
        let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        self.parse_bytes(&bytes)
    }

    pub fn parse(&self, text: &str) -> Result<RestrictionTable> {
        self.parse_bytes(text.as_bytes())
    }

    /// Parses raw source bytes. A line that is not valid UTF-8 is skipped
    /// like any other malformed line.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<RestrictionTable> {
        let mut table = RestrictionTable::default();
        let mut claims: HashMap<String, (ContainerKind, usize)> = HashMap::new();

        for (index, raw) in bytes.split(|&b| b == b'\n').enumerate() {
            let line_number = index + 1;
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let Ok(text) = std::str::from_utf8(raw) else {
                debug!("Skipping restriction line {}: not valid UTF-8", line_number);
                table.stats.skipped += 1;
                continue;
            };
            let line = text.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((owner, key, restriction)) = parse_line(line) else {
                debug!("Skipping restriction line {}: {}", line_number, line);
                table.stats.skipped += 1;
                continue;
            };
            if self.is_excluded(&owner) {
                table.stats.excluded += 1;
                continue;
            }

            let (container, class, kind) = split_owner(&owner);
            claim(&mut claims, container, kind, line_number)?;
            claim(&mut claims, &owner, ContainerKind::Class, line_number)?;

            let entry = table
                .containers
                .entry(container.to_string())
                .or_insert_with(|| ContainerEntry {
                    kind,
                    classes: BTreeMap::new(),
                });
            let previous = entry
                .classes
                .entry(class.to_string())
                .or_default()
                .insert(key, restriction);
            if previous.is_some() {
                debug!("Duplicate restriction for {} on line {}", owner, line_number);
            }
            table.stats.entries += 1;
        }

        debug!(
            "Parsed {} restriction entries ({} skipped, {} excluded)",
            table.stats.entries, table.stats.skipped, table.stats.excluded
        );
        Ok(table)
    }
}

impl Default for RestrictionParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Records that `name` is used as a container of `kind`; the default
/// package ("") never conflicts
fn claim(
    claims: &mut HashMap<String, (ContainerKind, usize)>,
    name: &str,
    kind: ContainerKind,
    line: usize,
) -> Result<()> {
    if name.is_empty() {
        return Ok(());
    }
    match claims.get(name) {
        Some((existing, _)) if *existing != kind => Err(Error::ConflictingContainer {
            name: name.to_string(),
            line,
        }),
        Some(_) => Ok(()),
        None => {
            claims.insert(name.to_string(), (kind, line));
            Ok(())
        }
    }
}

/// Splits `owner,member->SEVERITY` into normalized owner, member key and
/// severity
fn parse_line(line: &str) -> Option<(String, String, Restriction)> {
    if line.contains('\0') {
        return None;
    }
    let (left, severity) = line.rsplit_once("->")?;
    let restriction = severity.parse::<Restriction>().ok()?;
    if restriction == Restriction::Unknown {
        return None;
    }
    let (owner, member) = left.split_once(',')?;
    let owner = normalize_owner(owner);
    let member = member.trim();
    if owner.is_empty() || member.is_empty() || member.starts_with('(') || member.starts_with(':') {
        return None;
    }
    Some((owner, member_key(member, None), restriction))
}
