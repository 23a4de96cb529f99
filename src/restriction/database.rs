//! Binary restriction database
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! magic     "LNTPRIV\0"
//! format    u32
//! version   u16 length + UTF-8 data version
//! count     u32 containers
//! offsets   count × u32, containers sorted by name
//! container kind u8, name\0, u32 count, count × u32 class offsets
//! class     simple name\0, u32 count, count × u32 member offsets
//! member    key\0, severity u8
//! ```
//!
//! Every level is sorted bytewise so lookups are three binary searches
//! over the raw buffer. Reads are bounds-checked; a truncated or garbled
//! record answers `Unknown` instead of panicking.

use super::parser::RestrictionTable;
use super::{member_key, normalize_owner, split_owner, MemberRef, Restriction};
use crate::error::{Error, Result};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::sync::Arc;

/// Bumped whenever the layout above changes
pub const FORMAT_VERSION: u32 = 1;

const MAGIC: &[u8; 8] = b"LNTPRIV\0";

/// Serializes a parsed table into the binary layout
pub fn write_database(table: &RestrictionTable, data_version: &str) -> Result<Vec<u8>> {
    let mut writer = Writer::default();
    writer.bytes(MAGIC);
    writer.u32(FORMAT_VERSION);
    let version = data_version.as_bytes();
    let version_len = u16::try_from(version.len()).map_err(|_| Error::DatabaseTooLarge {
        size: version.len(),
    })?;
    writer.buf.extend_from_slice(&version_len.to_le_bytes());
    writer.bytes(version);

    let containers: Vec<_> = table.containers().collect();
    writer.u32(containers.len() as u32);
    let container_table = writer.reserve(containers.len());

    for (i, (name, entry)) in containers.iter().enumerate() {
        writer.patch(container_table + 4 * i)?;
        writer.buf.push(entry.kind.code());
        writer.cstr(name);
        writer.u32(entry.classes.len() as u32);
        let class_table = writer.reserve(entry.classes.len());

        for (j, (class, members)) in entry.classes.iter().enumerate() {
            writer.patch(class_table + 4 * j)?;
            writer.cstr(class);
            writer.u32(members.len() as u32);
            let member_table = writer.reserve(members.len());

            for (k, (key, restriction)) in members.iter().enumerate() {
                writer.patch(member_table + 4 * k)?;
                writer.cstr(key);
                writer.buf.push(restriction.code());
            }
        }
    }

    if u32::try_from(writer.buf.len()).is_err() {
        return Err(Error::DatabaseTooLarge {
            size: writer.buf.len(),
        });
    }
    Ok(writer.buf)
}

#[derive(Default)]
struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    fn bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    fn u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    fn cstr(&mut self, text: &str) {
        self.buf.extend_from_slice(text.as_bytes());
        self.buf.push(0);
    }

    /// Reserves `count` offset slots and returns the position of the first
    fn reserve(&mut self, count: usize) -> usize {
        let start = self.buf.len();
        self.buf.resize(start + 4 * count, 0);
        start
    }

    /// Points the offset slot at `slot` to the current end of the buffer
    fn patch(&mut self, slot: usize) -> Result<()> {
        let offset = u32::try_from(self.buf.len()).map_err(|_| Error::DatabaseTooLarge {
            size: self.buf.len(),
        })?;
        self.buf[slot..slot + 4].copy_from_slice(&offset.to_le_bytes());
        Ok(())
    }
}

/// Read-only view over a binary restriction database.
///
/// Cloning is cheap and lookups take `&self`, so one instance can be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct PrivateApiLookup {
    data: Arc<[u8]>,
    containers_start: usize,
    container_count: usize,
    data_version: String,
}

impl PrivateApiLookup {
    /// A lookup that answers `Unknown` for everything
    pub fn empty() -> Self {
        Self {
            data: Arc::from(Vec::new()),
            containers_start: 0,
            container_count: 0,
            data_version: String::new(),
        }
    }

    pub fn from_table(table: &RestrictionTable, data_version: &str) -> Result<Self> {
        Self::from_bytes(write_database(table, data_version)?)
    }

    /// Validates the header and wraps the buffer.
    ///
    /// A different format version is reported as stale rather than corrupt
    /// so callers know a rebuild will fix it.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.len() < MAGIC.len() || &data[..MAGIC.len()] != MAGIC {
            return Err(Error::CorruptDatabase("missing magic header".to_string()));
        }
        let format = read_u32(&data, 8).ok_or_else(|| truncated("format version"))?;
        if format != FORMAT_VERSION {
            return Err(Error::StaleDatabase {
                expected: format!("format {}", FORMAT_VERSION),
                found: format!("format {}", format),
            });
        }

        let version_len = data
            .get(12..14)
            .map(|b| u16::from_le_bytes([b[0], b[1]]) as usize)
            .ok_or_else(|| truncated("data version"))?;
        let version_bytes = data
            .get(14..14 + version_len)
            .ok_or_else(|| truncated("data version"))?;
        let data_version = std::str::from_utf8(version_bytes)
            .map_err(|_| Error::CorruptDatabase("data version is not UTF-8".to_string()))?
            .to_string();

        let count_at = 14 + version_len;
        let container_count = read_u32(&data, count_at).ok_or_else(|| truncated("container count"))? as usize;
        let containers_start = count_at + 4;
        let table_end = container_count
            .checked_mul(4)
            .and_then(|len| len.checked_add(containers_start))
            .ok_or_else(|| truncated("container table"))?;
        if table_end > data.len() {
            return Err(truncated("container table"));
        }

        Ok(Self {
            data: Arc::from(data),
            containers_start,
            container_count,
            data_version,
        })
    }

    pub fn data_version(&self) -> &str {
        &self.data_version
    }

    pub fn container_count(&self) -> usize {
        self.container_count
    }

    pub fn is_empty(&self) -> bool {
        self.container_count == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Restriction of `member` in `owner`; `descriptor` is `None` for
    /// fields. Owners may be dotted, internal or descriptor names.
    pub fn restriction(&self, owner: &str, member: &str, descriptor: Option<&str>) -> Restriction {
        let owner = normalize_owner(owner);
        let (container, class, _) = split_owner(&owner);
        let key = member_key(member, descriptor);
        self.find(container, class, &key).unwrap_or(Restriction::Unknown)
    }

    pub fn field_restriction(&self, owner: &str, name: &str) -> Restriction {
        self.restriction(owner, name, None)
    }

    pub fn method_restriction(&self, owner: &str, name: &str, descriptor: &str) -> Restriction {
        self.restriction(owner, name, Some(descriptor))
    }

    /// Looks up a batch of members in parallel, preserving order
    pub fn lookup_all(&self, members: &[MemberRef]) -> Vec<Restriction> {
        members
            .par_iter()
            .map(|m| self.restriction(&m.owner, &m.name, m.descriptor.as_deref()))
            .collect()
    }

    fn find(&self, container: &str, class: &str, key: &str) -> Option<Restriction> {
        let data = &self.data[..];

        // Container records start with the kind byte
        let container_at = search(data, self.containers_start, self.container_count, 1, container.as_bytes())?;
        let (_, after_name) = read_cstr(data, container_at + 1)?;
        let class_count = read_u32(data, after_name)? as usize;

        let class_at = search(data, after_name + 4, class_count, 0, class.as_bytes())?;
        let (_, after_class) = read_cstr(data, class_at)?;
        let member_count = read_u32(data, after_class)? as usize;

        let member_at = search(data, after_class + 4, member_count, 0, key.as_bytes())?;
        let (_, after_key) = read_cstr(data, member_at)?;
        data.get(after_key).map(|code| Restriction::from_code(*code))
    }
}

impl Default for PrivateApiLookup {
    fn default() -> Self {
        Self::empty()
    }
}

fn truncated(what: &str) -> Error {
    Error::CorruptDatabase(format!("truncated {}", what))
}

fn read_u32(data: &[u8], at: usize) -> Option<u32> {
    let bytes = data.get(at..at.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// NUL-terminated string at `at`, and the position just past the NUL
fn read_cstr(data: &[u8], at: usize) -> Option<(&[u8], usize)> {
    let rest = data.get(at..)?;
    let len = rest.iter().position(|b| *b == 0)?;
    Some((&rest[..len], at + len + 1))
}

/// Binary search over an offset table of `count` entries starting at
/// `table`. Each record's name starts `skip` bytes after its offset.
/// Returns the offset of the matching record.
fn search(data: &[u8], table: usize, count: usize, skip: usize, needle: &[u8]) -> Option<usize> {
    let (mut low, mut high) = (0, count);
    while low < high {
        let mid = low + (high - low) / 2;
        let record = read_u32(data, table + 4 * mid)? as usize;
        let (name, _) = read_cstr(data, record + skip)?;
        match name.cmp(needle) {
            Ordering::Less => low = mid + 1,
            Ordering::Greater => high = mid,
            Ordering::Equal => return Some(record),
        }
    }
    None
}
