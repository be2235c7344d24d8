//! In-memory reference container
//!
//! BTreeMap-backed [`Container`] with no persistence, used as a behavioral
//! reference for the file store in tests.
//!
//! Unlike [`SlotFileContainer`](super::SlotFileContainer), removal deletes
//! the entry outright and new keys are numbered by the current map size. A
//! key issued after a removal can therefore collide with a live key.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{Result, SlotError};
use crate::metadata::MetaData;

use super::{Container, Key, SIZE};

/// Non-persistent container mapping keys to optional values
#[derive(Debug, Default)]
pub struct MapContainer<V> {
    /// `None` marks a reserved key that was never updated
    entries: BTreeMap<Key, Option<V>>,
    open: bool,
}

impl<V> MapContainer<V> {
    /// Create an empty, closed container
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            open: false,
        }
    }

    /// Number of reserved entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_open(&self) -> Result<()> {
        if !self.open {
            return Err(SlotError::closed());
        }
        Ok(())
    }

    fn entry_mut(&mut self, key: Key) -> Result<&mut Option<V>> {
        self.check_open()?;
        self.entries
            .get_mut(&key)
            .ok_or_else(|| SlotError::not_found(key, "has not been reserved"))
    }
}

impl<V: Clone> MapContainer<V> {
    /// Value of a reserved key, `None` if it was never updated
    pub fn get_optional(&self, key: Key) -> Result<Option<V>> {
        self.check_open()?;
        self.entries
            .get(&key)
            .cloned()
            .ok_or_else(|| SlotError::not_found(key, "has not been reserved"))
    }
}

impl<V: Clone + Default> Container<V> for MapContainer<V> {
    fn open(&mut self) -> Result<()> {
        if self.open {
            return Err(SlotError::IllegalState(
                "Container is already open".to_string(),
            ));
        }
        self.open = true;
        debug!("map container opened");
        Ok(())
    }

    /// Nothing survives a close
    fn close(&mut self) -> Result<()> {
        self.check_open()?;
        self.entries.clear();
        self.open = false;
        debug!("map container closed");
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn reserve(&mut self) -> Result<Key> {
        self.check_open()?;
        let key = self.entries.len() as Key;
        self.entries.insert(key, None);
        Ok(key)
    }

    /// Never-updated keys read as `V::default()`; see [`get_optional`]
    ///
    /// [`get_optional`]: MapContainer::get_optional
    fn get(&mut self, key: Key) -> Result<V> {
        Ok(self.get_optional(key)?.unwrap_or_default())
    }

    fn update(&mut self, key: Key, value: V) -> Result<()> {
        *self.entry_mut(key)? = Some(value);
        Ok(())
    }

    fn remove(&mut self, key: Key) -> Result<()> {
        self.check_open()?;
        self.entries
            .remove(&key)
            .map(|_| ())
            .ok_or_else(|| SlotError::not_found(key, "has not been reserved"))
    }

    fn metadata(&self) -> Result<MetaData> {
        self.check_open()?;
        let mut metadata = MetaData::new();
        metadata.set_int_property(SIZE, i32::try_from(self.entries.len()).unwrap_or(i32::MAX));
        Ok(metadata)
    }
}
