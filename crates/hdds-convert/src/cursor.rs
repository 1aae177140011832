// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read-only cursor over a source buffer.
//!
//! This is the only place plans touch source bytes. Reads are native-endian
//! (source buffers are produced in-process) and tolerate any alignment.
//!
//! The apply contract says the buffer encodes the descriptor the plan was
//! built from. A buffer that is too short breaks that contract; reads then
//! panic instead of reading out of bounds.

/// Generate native-endian read methods for fixed-width scalars.
///
/// Each generated method:
/// 1. Takes `$size` bytes at the cursor position (panics past the end)
/// 2. Converts them via `from_ne_bytes()`
macro_rules! impl_read_ne {
    ($name:ident, $type:ty, $size:expr) => {
        #[inline]
        pub fn $name(self) -> $type {
            <$type>::from_ne_bytes(self.take::<$size>())
        }
    };
}

/// Position inside a source buffer.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    /// Cursor moved `delta` bytes forward.
    #[inline]
    #[must_use]
    pub fn at(self, delta: usize) -> Self {
        Self {
            buffer: self.buffer,
            offset: self.offset + delta,
        }
    }

    #[inline]
    fn take<const N: usize>(self) -> [u8; N] {
        let end = self.offset + N;
        match self.buffer.get(self.offset..end) {
            Some(bytes) => {
                let mut out = [0u8; N];
                out.copy_from_slice(bytes);
                out
            }
            None => truncated(self.offset, N, self.buffer.len()),
        }
    }

    impl_read_ne!(read_u8, u8, 1);
    impl_read_ne!(read_i8, i8, 1);
    impl_read_ne!(read_u16, u16, 2);
    impl_read_ne!(read_i16, i16, 2);
    impl_read_ne!(read_u32, u32, 4);
    impl_read_ne!(read_i32, i32, 4);
    impl_read_ne!(read_u64, u64, 8);
    impl_read_ne!(read_i64, i64, 8);
    impl_read_ne!(read_f32, f32, 4);
    impl_read_ne!(read_f64, f64, 8);

    /// Any non-zero byte reads as `true`.
    #[inline]
    pub fn read_bool(self) -> bool {
        self.read_u8() != 0
    }
}

#[cold]
#[inline(never)]
fn truncated(offset: usize, need: usize, have: usize) -> ! {
    panic!(
        "source buffer does not match its descriptor: need {} bytes at offset {}, buffer holds {}",
        need, offset, have
    )
}
