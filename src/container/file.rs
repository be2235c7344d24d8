//! Fixed-slot file container
//!
//! Disk-backed [`Container`] storing every value in a fixed-width slot.
//!
//! ## Files
//! ```text
//! {directory}/{prefix}_data.dat    slot 0 | slot 1 | slot 2 | ...
//! {directory}/{prefix}_meta.dat    recentKey, objectSize
//! ```
//!
//! The data file has no header. The slot count is bounded by `recentKey`
//! from the side file, which is written on first open and on every close.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use bytes::{Bytes, BytesMut};
use tracing::{debug, info, trace, warn};

use crate::config::{ContainerConfig, SyncPolicy};
use crate::error::{IoContext, Result, SlotError};
use crate::metadata::MetaData;
use crate::serializer::FixedSizeSerializer;

use super::slot::{Liveness, SlotCodec};
use super::{Container, Key, OBJECT_SIZE, RECENT_KEY};

/// Disk-backed container with fixed-width slots and tombstone deletion
///
/// ## Key policy
/// Keys come from a monotonic counter (`recent_key`). Removing a key only
/// flips its marker to `DELETED`; the slot is never reused and the file
/// never shrinks.
pub struct SlotFileContainer<V, S> {
    /// Directory, prefix and durability settings
    config: ContainerConfig,

    /// `{prefix}_data.dat`
    data_path: PathBuf,

    /// `{prefix}_meta.dat`
    meta_path: PathBuf,

    /// Value codec; fixes the slot width
    serializer: S,

    /// Slot geometry derived from the serializer
    codec: SlotCodec,

    /// Next key to issue (authoritative while open)
    recent_key: Key,

    /// Properties mirrored to the side file
    metadata: MetaData,

    /// Data file handle, present only while open
    data_file: Option<File>,

    _value: PhantomData<fn() -> V>,
}

impl<V, S: FixedSizeSerializer<V>> SlotFileContainer<V, S> {
    /// Create a closed container
    ///
    /// Fails with `InvalidArgument` for an empty prefix or a serializer whose
    /// width cannot form a slot.
    pub fn new(config: ContainerConfig, serializer: S) -> Result<Self> {
        if config.prefix.is_empty() {
            return Err(SlotError::InvalidArgument(
                "File name prefix cannot be empty".to_string(),
            ));
        }

        let codec = SlotCodec::new(serializer.serialized_size())?;

        Ok(Self {
            data_path: config.data_path(),
            meta_path: config.meta_path(),
            config,
            serializer,
            codec,
            recent_key: 0,
            metadata: MetaData::new(),
            data_file: None,
            _value: PhantomData,
        })
    }

    /// Create a closed container in `directory` with default settings
    pub fn with_prefix(
        directory: impl Into<PathBuf>,
        prefix: impl Into<String>,
        serializer: S,
    ) -> Result<Self> {
        let config = ContainerConfig::builder()
            .directory(directory)
            .prefix(prefix)
            .build();
        Self::new(config, serializer)
    }

    /// Find the slot for a live key
    ///
    /// Returns the slot offset; `deleted` is the reason reported when the
    /// slot carries a tombstone.
    fn live_slot(&mut self, key: Key, deleted: &'static str) -> Result<u64> {
        let file = self.data_file.as_mut().ok_or_else(SlotError::closed)?;

        if key >= self.recent_key {
            return Err(SlotError::not_found(key, "has not been reserved"));
        }

        let position = self.codec.offset(key)?;
        let len = file
            .metadata()
            .context(|| format!("reading length of {}", self.data_path.display()))?
            .len();
        if position >= len {
            return Err(SlotError::not_found(key, "does not exist"));
        }

        let mut marker = [0u8; 1];
        file.seek(SeekFrom::Start(position))
            .and_then(|_| file.read_exact(&mut marker))
            .context(|| format!("reading marker of key {}", key))?;

        match Liveness::from_byte(marker[0], key)? {
            Liveness::Active => Ok(position),
            Liveness::Deleted => Err(SlotError::not_found(key, deleted)),
        }
    }
}

impl<V, S> SlotFileContainer<V, S> {
    /// The container configuration
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Path of the slot data file
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Path of the metadata side file
    pub fn meta_path(&self) -> &Path {
        &self.meta_path
    }

    /// Slot width in bytes, marker included
    pub fn object_size(&self) -> i32 {
        self.codec.object_size()
    }

    /// Next key `reserve` would issue
    pub fn recent_key(&self) -> Key {
        self.recent_key
    }

    /// Metadata with the live counter folded in
    fn snapshot(&self) -> MetaData {
        let mut metadata = self.metadata.clone();
        // recent_key never exceeds i64::MAX, see `reserve`
        metadata.set_long_property(RECENT_KEY, self.recent_key as i64);
        metadata.set_int_property(OBJECT_SIZE, self.codec.object_size());
        metadata
    }

    /// Sync the data file if the policy asks for it after each write
    fn sync_write(&mut self, key: Key) -> Result<()> {
        if self.config.sync_policy != SyncPolicy::EveryWrite {
            return Ok(());
        }
        if let Some(file) = self.data_file.as_mut() {
            file.sync_data()
                .context(|| format!("syncing write of key {}", key))?;
        }
        Ok(())
    }

    /// Persist metadata and release the data file
    ///
    /// On error the container stays open.
    fn flush_and_release(&mut self) -> Result<()> {
        let file = self.data_file.as_mut().ok_or_else(SlotError::closed)?;

        file.flush()
            .context(|| format!("flushing {}", self.data_path.display()))?;
        if self.config.sync_policy != SyncPolicy::Never {
            file.sync_all()
                .context(|| format!("syncing {}", self.data_path.display()))?;
        }

        self.metadata = self.snapshot();
        self.metadata.write_to(&self.meta_path)?;
        self.data_file = None;

        info!(
            data = %self.data_path.display(),
            recent_key = self.recent_key,
            "container closed"
        );
        Ok(())
    }
}

impl<V, S: FixedSizeSerializer<V>> Container<V> for SlotFileContainer<V, S> {
    fn open(&mut self) -> Result<()> {
        if self.data_file.is_some() {
            return Err(SlotError::IllegalState(
                "Container is already open".to_string(),
            ));
        }

        fs::create_dir_all(self.config.directory())
            .context(|| format!("creating {}", self.config.directory().display()))?;

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&self.data_path)
            .context(|| format!("opening {}", self.data_path.display()))?;

        let object_size = self.codec.object_size();

        if self.meta_path.exists() {
            let mut metadata = MetaData::new();
            metadata.read_from(&self.meta_path)?;

            let stored_size = metadata.get_int_property(OBJECT_SIZE, -1);
            if stored_size != object_size {
                warn!(
                    meta = %self.meta_path.display(),
                    stored_size,
                    object_size,
                    "slot width mismatch"
                );
                return Err(SlotError::Integrity(format!(
                    "Stored object size {} does not match current serializer size {}",
                    stored_size, object_size
                )));
            }

            let stored_key = metadata.get_long_property(RECENT_KEY, 0);
            let recent_key = Key::try_from(stored_key).map_err(|_| SlotError::MetadataCorrupt {
                path: self.meta_path.clone(),
                reason: format!("negative {} {}", RECENT_KEY, stored_key),
            })?;

            self.recent_key = recent_key;
            self.metadata = metadata;
            debug!(recent_key, object_size, "metadata restored");
        } else {
            let len = file
                .metadata()
                .context(|| format!("reading length of {}", self.data_path.display()))?
                .len();
            if len > 0 {
                warn!(
                    data = %self.data_path.display(),
                    len,
                    "data file without metadata, starting key counter at 0"
                );
            }

            self.recent_key = 0;
            self.metadata = MetaData::new();
            self.metadata.set_long_property(RECENT_KEY, 0);
            self.metadata.set_int_property(OBJECT_SIZE, object_size);
            self.metadata.write_to(&self.meta_path)?;
            debug!(object_size, "metadata initialized");
        }

        self.data_file = Some(file);
        info!(
            data = %self.data_path.display(),
            recent_key = self.recent_key,
            slot_width = self.codec.slot_width(),
            "container opened"
        );
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.flush_and_release()
    }

    fn is_open(&self) -> bool {
        self.data_file.is_some()
    }

    fn reserve(&mut self) -> Result<Key> {
        let file = self.data_file.as_mut().ok_or_else(SlotError::closed)?;

        let key = self.recent_key;
        if key >= i64::MAX as Key {
            return Err(SlotError::IllegalState("Key counter exhausted".to_string()));
        }

        let position = self.codec.offset(key)?;
        let end = self.codec.end(key)?;

        let len = file
            .metadata()
            .context(|| format!("reading length of {}", self.data_path.display()))?
            .len();
        if len < end {
            file.set_len(end)
                .context(|| format!("extending {} for key {}", self.data_path.display(), key))?;
        }

        file.seek(SeekFrom::Start(position))
            .and_then(|_| file.write_all(&self.codec.empty_slot()))
            .context(|| format!("reserving key {}", key))?;

        self.recent_key = key + 1;
        self.sync_write(key)?;

        trace!(key, position, "key reserved");
        Ok(key)
    }

    fn get(&mut self, key: Key) -> Result<V> {
        let position = self.live_slot(key, "has been deleted")?;
        let width = self.codec.payload_width();
        let file = self.data_file.as_mut().ok_or_else(SlotError::closed)?;

        // Marker was just read, so the cursor sits on the payload
        let mut payload = Vec::with_capacity(width);
        file.take(width as u64)
            .read_to_end(&mut payload)
            .context(|| format!("reading value of key {}", key))?;

        if payload.len() != width {
            return Err(SlotError::Integrity(format!(
                "Failed to read complete record for key {}: {} of {} bytes",
                key,
                payload.len(),
                width
            )));
        }

        trace!(key, position, "value read");
        self.serializer.deserialize(&mut Bytes::from(payload))
    }

    fn update(&mut self, key: Key, value: V) -> Result<()> {
        let position = self.live_slot(key, "has been deleted")?;

        let mut payload = BytesMut::with_capacity(self.codec.payload_width());
        self.serializer.serialize(&value, &mut payload);
        let slot = self.codec.live_slot(&payload)?;

        let file = self.data_file.as_mut().ok_or_else(SlotError::closed)?;
        file.seek(SeekFrom::Start(position))
            .and_then(|_| file.write_all(&slot))
            .context(|| format!("updating value of key {}", key))?;
        self.sync_write(key)?;

        trace!(key, position, "value updated");
        Ok(())
    }

    fn remove(&mut self, key: Key) -> Result<()> {
        let position = self.live_slot(key, "has already been deleted")?;

        let file = self.data_file.as_mut().ok_or_else(SlotError::closed)?;
        file.seek(SeekFrom::Start(position))
            .and_then(|_| file.write_all(&[Liveness::Deleted.as_byte()]))
            .context(|| format!("removing key {}", key))?;
        self.sync_write(key)?;

        debug!(key, position, "key tombstoned");
        Ok(())
    }

    fn metadata(&self) -> Result<MetaData> {
        if self.data_file.is_none() {
            return Err(SlotError::closed());
        }
        Ok(self.snapshot())
    }
}

impl<V, S> Drop for SlotFileContainer<V, S> {
    fn drop(&mut self) {
        if self.data_file.is_some() {
            if let Err(e) = self.flush_and_release() {
                warn!(data = %self.data_path.display(), error = %e, "failed to close container on drop");
            }
        }
    }
}
