// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Source buffer helpers shared by integration tests.

#![allow(dead_code)]

use hdds_convert::TypeDescriptor;

/// Zeroed source buffer sized for a descriptor, filled by offset.
pub struct Source {
    bytes: Vec<u8>,
}

impl Source {
    pub fn for_descriptor(desc: &TypeDescriptor) -> Self {
        let size = desc.byte_size().expect("descriptor has a layout");
        Self {
            bytes: vec![0u8; size],
        }
    }

    pub fn with_len(len: usize) -> Self {
        Self {
            bytes: vec![0u8; len],
        }
    }

    /// Write raw native-endian bytes at `offset`.
    pub fn put<const N: usize>(&mut self, offset: usize, value: [u8; N]) -> &mut Self {
        self.bytes[offset..offset + N].copy_from_slice(&value);
        self
    }

    pub fn tag(&mut self, tag: u32) -> &mut Self {
        self.put(0, tag.to_ne_bytes())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
