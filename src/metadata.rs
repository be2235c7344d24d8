//! Metadata Store
//!
//! A small typed property bag persisted to a side file next to the data file.
//! The file store keeps its key counter (`recentKey`) and slot width
//! (`objectSize`) here.
//!
//! ## File Format
//! ```text
//! ┌──────────┬─────────────┬──────────┬──────────┬─────────────────────┐
//! │Magic (4) │ Version (2) │ CRC (4)  │ Len (4)  │ Payload (Len bytes) │
//! │ "SKVM"   │     u16     │ of data  │   u32    │ bincode(properties) │
//! └──────────┴─────────────┴──────────┴──────────┴─────────────────────┘
//! ```
//! All integers little-endian.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IoContext, Result, SlotError};

/// Magic bytes identifying a SlotKV metadata file
const MAGIC: &[u8; 4] = b"SKVM";

/// Current metadata format version
const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + CRC (4) + Len (4) = 14 bytes
const HEADER_SIZE: usize = 14;

/// A typed property value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Property {
    Int(i32),
    Long(i64),
}

/// Named, typed container properties
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaData {
    properties: BTreeMap<String, Property>,
}

impl MetaData {
    /// Create an empty property set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_int_property(&mut self, name: impl Into<String>, value: i32) {
        self.properties.insert(name.into(), Property::Int(value));
    }

    pub fn set_long_property(&mut self, name: impl Into<String>, value: i64) {
        self.properties.insert(name.into(), Property::Long(value));
    }

    /// Read an int property, or `default` if missing or out of `i32` range
    pub fn get_int_property(&self, name: &str, default: i32) -> i32 {
        match self.properties.get(name) {
            Some(Property::Int(v)) => *v,
            Some(Property::Long(v)) => i32::try_from(*v).unwrap_or(default),
            None => default,
        }
    }

    /// Read a long property, or `default` if missing
    pub fn get_long_property(&self, name: &str, default: i64) -> i64 {
        match self.properties.get(name) {
            Some(Property::Long(v)) => *v,
            Some(Property::Int(v)) => i64::from(*v),
            None => default,
        }
    }

    /// Raw property lookup
    pub fn property(&self, name: &str) -> Option<Property> {
        self.properties.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterate properties in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Property)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Durably write all properties to `path`, replacing any previous file
    ///
    /// Writes a sibling temp file, syncs it, then renames it into place.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let payload = bincode::serialize(&self.properties).map_err(|e| {
            SlotError::IllegalState(format!("Failed to encode metadata: {}", e))
        })?;
        let payload_len = u32::try_from(payload.len()).map_err(|_| {
            SlotError::IllegalState(format!("Metadata too large: {} bytes", payload.len()))
        })?;

        let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&VERSION.to_le_bytes());
        buf.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        buf.extend_from_slice(&payload_len.to_le_bytes());
        buf.extend_from_slice(&payload);

        let tmp_path = path.with_extension("tmp");
        {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp_path)
                .context(|| format!("creating {}", tmp_path.display()))?;
            file.write_all(&buf)
                .context(|| format!("writing {}", tmp_path.display()))?;
            file.sync_all()
                .context(|| format!("syncing {}", tmp_path.display()))?;
        }
        fs::rename(&tmp_path, path).context(|| format!("replacing {}", path.display()))?;

        // Make the rename itself durable; not every platform allows opening a directory
        if let Some(dir) = path.parent() {
            if let Ok(dir) = File::open(dir) {
                let _ = dir.sync_all();
            }
        }

        debug!(path = %path.display(), properties = self.len(), "metadata written");
        Ok(())
    }

    /// Replace all in-memory properties with the content of `path`
    ///
    /// On error the in-memory state is left untouched.
    pub fn read_from(&mut self, path: &Path) -> Result<()> {
        let bytes = fs::read(path).context(|| format!("reading {}", path.display()))?;
        let corrupt = |reason: String| SlotError::MetadataCorrupt {
            path: path.to_path_buf(),
            reason,
        };

        if bytes.len() < HEADER_SIZE {
            return Err(corrupt(format!("file too short: {} bytes", bytes.len())));
        }
        if &bytes[0..4] != MAGIC {
            return Err(corrupt(format!("invalid magic {:?}", &bytes[0..4])));
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(corrupt(format!("unsupported version {}", version)));
        }

        let stored_crc = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]);
        let len = u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]) as usize;
        let payload = &bytes[HEADER_SIZE..];
        if payload.len() != len {
            return Err(corrupt(format!(
                "expected {} payload bytes, found {}",
                len,
                payload.len()
            )));
        }

        let crc = crc32fast::hash(payload);
        if crc != stored_crc {
            return Err(corrupt(format!(
                "checksum mismatch: stored {:#010x}, computed {:#010x}",
                stored_crc, crc
            )));
        }

        let properties: BTreeMap<String, Property> =
            bincode::deserialize(payload).map_err(|e| corrupt(e.to_string()))?;

        self.properties = properties;
        debug!(path = %path.display(), properties = self.len(), "metadata read");
        Ok(())
    }
}
