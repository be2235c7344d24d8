//! Fixed-Size Serialization
//!
//! Converts values to and from a fixed number of bytes.
//!
//! ## Contract
//! - `serialized_size()` never changes for a given serializer instance
//! - `serialize` appends exactly `serialized_size()` bytes, padding or
//!   truncating the natural encoding as needed
//! - `deserialize` consumes exactly `serialized_size()` bytes
//!
//! An all-zero buffer must decode without error: freshly reserved slots are
//! zero-filled.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, SlotError};

/// A serializer producing a constant number of bytes per value
pub trait FixedSizeSerializer<V> {
    /// Width in bytes of every encoded value
    fn serialized_size(&self) -> usize;

    /// Append the encoding of `value` to `buf`
    fn serialize(&self, value: &V, buf: &mut BytesMut);

    /// Decode one value from the front of `buf`
    fn deserialize(&self, buf: &mut Bytes) -> Result<V>;
}

fn ensure_remaining(buf: &Bytes, needed: usize) -> Result<()> {
    if buf.remaining() < needed {
        return Err(SlotError::Integrity(format!(
            "Expected {} serialized bytes, got {}",
            needed,
            buf.remaining()
        )));
    }
    Ok(())
}

// =============================================================================
// Integer Serializers
// =============================================================================

/// `i32` as 4 big-endian bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct IntSerializer;

impl FixedSizeSerializer<i32> for IntSerializer {
    fn serialized_size(&self) -> usize {
        4
    }

    fn serialize(&self, value: &i32, buf: &mut BytesMut) {
        buf.put_i32(*value);
    }

    fn deserialize(&self, buf: &mut Bytes) -> Result<i32> {
        ensure_remaining(buf, 4)?;
        Ok(buf.get_i32())
    }
}

/// `i64` as 8 big-endian bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct LongSerializer;

impl FixedSizeSerializer<i64> for LongSerializer {
    fn serialized_size(&self) -> usize {
        8
    }

    fn serialize(&self, value: &i64, buf: &mut BytesMut) {
        buf.put_i64(*value);
    }

    fn deserialize(&self, buf: &mut Bytes) -> Result<i64> {
        ensure_remaining(buf, 8)?;
        Ok(buf.get_i64())
    }
}

// =============================================================================
// String Serializer
// =============================================================================

/// UTF-8 string in a fixed byte width
///
/// Longer strings are cut to the longest prefix that fits without splitting
/// a character; shorter ones are padded with zero bytes, which are stripped
/// again on decode. Trailing NULs in the original string are therefore lost.
#[derive(Debug, Clone, Copy)]
pub struct FixedStringSerializer {
    width: usize,
}

impl FixedStringSerializer {
    /// Create a serializer storing strings in `width` bytes
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    /// Longest prefix of `value` that fits in `width` bytes
    fn truncate<'a>(&self, value: &'a str) -> &'a str {
        if value.len() <= self.width {
            return value;
        }
        let mut end = self.width;
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        &value[..end]
    }
}

impl FixedSizeSerializer<String> for FixedStringSerializer {
    fn serialized_size(&self) -> usize {
        self.width
    }

    fn serialize(&self, value: &String, buf: &mut BytesMut) {
        let data = self.truncate(value).as_bytes();
        buf.put_slice(data);
        buf.put_bytes(0, self.width - data.len());
    }

    fn deserialize(&self, buf: &mut Bytes) -> Result<String> {
        ensure_remaining(buf, self.width)?;
        let raw = buf.split_to(self.width);
        let end = raw.iter().rposition(|&b| b != 0).map_or(0, |pos| pos + 1);

        String::from_utf8(raw[..end].to_vec())
            .map_err(|e| SlotError::Integrity(format!("Stored string is not valid UTF-8: {}", e)))
    }
}
