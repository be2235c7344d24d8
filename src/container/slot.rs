//! Slot codec
//!
//! Centralizes slot geometry: offset arithmetic, bounds checks and the
//! liveness marker byte.
//!
//! ```text
//! offset = key × slot_width
//! ┌────────────┬──────────────────────────────┐
//! │ Marker (1) │ Payload (payload_width)      │
//! └────────────┴──────────────────────────────┘
//! ```

use crate::container::Key;
use crate::error::{Result, SlotError};

/// Liveness marker stored in the first byte of every slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Liveness {
    Deleted,
    Active,
}

impl Liveness {
    pub(crate) const DELETED: u8 = 0;
    pub(crate) const ACTIVE: u8 = 1;

    pub(crate) fn from_byte(byte: u8, key: Key) -> Result<Self> {
        match byte {
            Self::DELETED => Ok(Liveness::Deleted),
            Self::ACTIVE => Ok(Liveness::Active),
            other => Err(SlotError::Integrity(format!(
                "Invalid liveness marker {:#04x} for key {}",
                other, key
            ))),
        }
    }

    pub(crate) fn as_byte(self) -> u8 {
        match self {
            Liveness::Deleted => Self::DELETED,
            Liveness::Active => Self::ACTIVE,
        }
    }
}

/// Fixed slot geometry for one data file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SlotCodec {
    payload_width: usize,
    slot_width: u64,
}

impl SlotCodec {
    /// Geometry for payloads of `payload_width` bytes
    pub(crate) fn new(payload_width: usize) -> Result<Self> {
        if payload_width == 0 {
            return Err(SlotError::InvalidArgument(
                "Serializer must produce at least one byte".to_string(),
            ));
        }

        // objectSize is persisted as an i32
        let slot_width = payload_width
            .checked_add(1)
            .filter(|w| i32::try_from(*w).is_ok())
            .ok_or_else(|| {
                SlotError::InvalidArgument(format!(
                    "Serialized size {} is too large for a slot",
                    payload_width
                ))
            })?;

        Ok(Self {
            payload_width,
            slot_width: slot_width as u64,
        })
    }

    pub(crate) fn payload_width(&self) -> usize {
        self.payload_width
    }

    pub(crate) fn slot_width(&self) -> u64 {
        self.slot_width
    }

    /// Slot width as stored in the `objectSize` property
    pub(crate) fn object_size(&self) -> i32 {
        // Bounded to i32 in `new`
        self.slot_width as i32
    }

    /// Byte offset of the slot for `key`
    pub(crate) fn offset(&self, key: Key) -> Result<u64> {
        key.checked_mul(self.slot_width).ok_or_else(|| {
            SlotError::IllegalState(format!("Offset of key {} overflows the data file", key))
        })
    }

    /// Byte offset just past the slot for `key`
    pub(crate) fn end(&self, key: Key) -> Result<u64> {
        self.offset(key)?
            .checked_add(self.slot_width)
            .ok_or_else(|| {
                SlotError::IllegalState(format!("Offset of key {} overflows the data file", key))
            })
    }

    /// Bytes of a freshly reserved slot: live marker, zero payload
    pub(crate) fn empty_slot(&self) -> Vec<u8> {
        let mut slot = vec![0u8; self.slot_width as usize];
        slot[0] = Liveness::Active.as_byte();
        slot
    }

    /// Bytes of a live slot holding `payload`
    pub(crate) fn live_slot(&self, payload: &[u8]) -> Result<Vec<u8>> {
        if payload.len() != self.payload_width {
            return Err(SlotError::Integrity(format!(
                "Serializer produced {} bytes, expected {}",
                payload.len(),
                self.payload_width
            )));
        }

        let mut slot = Vec::with_capacity(self.slot_width as usize);
        slot.push(Liveness::Active.as_byte());
        slot.extend_from_slice(payload);
        Ok(slot)
    }
}
