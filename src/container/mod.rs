//! Container Module
//!
//! The storage capability every backend implements, and its two backends.
//!
//! ## Responsibilities
//! - Issue keys strictly in increasing order starting at 0
//! - Map each reserved key to one value
//! - Tombstone (file store) or drop (in-memory store) removed keys
//! - Expose geometry and counters as [`MetaData`]
//!
//! ## Backends
//! - [`SlotFileContainer`]: fixed-width slots in a data file, metadata in a
//!   side file, keys never reused
//! - [`MapContainer`]: non-persistent map used as a reference in tests; it
//!   counts keys by map size, so keys *can* repeat after a removal
//!
//! ## Concurrency
//! Single-threaded. Every call blocks until its I/O completes and mutating
//! calls take `&mut self`; callers sharing a container across threads must
//! provide their own exclusion.

mod file;
mod memory;
pub(crate) mod slot;

pub use file::SlotFileContainer;
pub use memory::MapContainer;

use crate::error::Result;
use crate::metadata::MetaData;

/// Container key: issued from 0 upwards, never negative
pub type Key = u64;

/// Metadata property: one past the highest key ever reserved (long)
pub const RECENT_KEY: &str = "recentKey";

/// Metadata property: slot width in bytes, marker included (int)
pub const OBJECT_SIZE: &str = "objectSize";

/// Metadata property: live entry count of a [`MapContainer`] (int)
pub const SIZE: &str = "size";

/// Key/value storage capability
///
/// A container is created closed. Every operation except [`open`] fails
/// with an `IllegalState` error while closed, and [`open`] fails if the
/// container is already open.
///
/// [`open`]: Container::open
pub trait Container<V> {
    /// Acquire storage and restore or initialize metadata
    fn open(&mut self) -> Result<()>;

    /// Flush durable state and release storage
    fn close(&mut self) -> Result<()>;

    /// Whether the container is between `open` and `close`
    fn is_open(&self) -> bool;

    /// Allocate the next key with an empty value
    fn reserve(&mut self) -> Result<Key>;

    /// Current value of a reserved, live key
    fn get(&mut self, key: Key) -> Result<V>;

    /// Overwrite the value of a reserved, live key
    fn update(&mut self, key: Key, value: V) -> Result<()>;

    /// Remove a reserved, live key
    fn remove(&mut self, key: Key) -> Result<()>;

    /// Snapshot of the container's current properties
    fn metadata(&self) -> Result<MetaData>;
}
