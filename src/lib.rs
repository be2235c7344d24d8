//! # SlotKV
//!
//! A minimal persistent key-value record store with:
//! - Fixed-width slots addressed directly by key
//! - Monotonic integer keys that are never reused
//! - Tombstone deletion (one liveness byte per slot)
//! - A metadata side file for consistent reopen
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Container (trait)                         │
//! │        open / reserve / get / update / remove / close        │
//! └───────────────┬─────────────────────────────┬───────────────┘
//!                 │                             │
//!                 ▼                             ▼
//!   ┌───────────────────────────┐   ┌───────────────────────────┐
//!   │    SlotFileContainer      │   │      MapContainer         │
//!   │   (fixed slots on disk)   │   │  (in-memory reference)    │
//!   └──────┬─────────────┬──────┘   └───────────────────────────┘
//!          │             │
//!          ▼             ▼
//!   ┌─────────────┐ ┌─────────────┐
//!   │ Serializer  │ │  MetaData   │
//!   │(fixed width)│ │ (side file) │
//!   └─────────────┘ └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use slotkv::{Container, FixedStringSerializer, SlotFileContainer};
//!
//! # fn main() -> slotkv::Result<()> {
//! let mut store: SlotFileContainer<String, _> =
//!     SlotFileContainer::with_prefix("./data", "names", FixedStringSerializer::new(10))?;
//! store.open()?;
//! let key = store.reserve()?;
//! store.update(key, "hello".to_string())?;
//! assert_eq!(store.get(key)?, "hello");
//! store.close()?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod serializer;
pub mod metadata;
pub mod container;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ErrorKind, Result, SlotError};
pub use config::{ContainerConfig, SyncPolicy};
pub use container::{Container, Key, MapContainer, SlotFileContainer};
pub use metadata::{MetaData, Property};
pub use serializer::{FixedSizeSerializer, FixedStringSerializer, IntSerializer, LongSerializer};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SlotKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
