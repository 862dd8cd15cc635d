//! Page capacity sizing
//!
//! A page's `max_size` is fixed when the page is created: the bytes left
//! after the header divided by the width of one entry. Leaf entries are a
//! key and a value, internal entries a key and a child page id.

use crate::codec::HEADER_SIZE;
use crate::error::{Error, PageId, Result};
use crate::DEFAULT_PAGE_SIZE;
use std::mem::size_of;
use tracing::debug;

/// Smallest capacity a tree page may be given
pub const MIN_MAX_SIZE: usize = 2;

/// Width of a child pointer in an internal page entry
pub const CHILD_POINTER_SIZE: usize = size_of::<PageId>();

/// Page capacity configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityConfig {
    /// Physical page size in bytes
    pub page_size: usize,
    /// Bytes taken by the page header
    pub header_size: usize,
    /// Entry slots held back from `max_size`, used as scratch while splitting
    pub reserved_slots: usize,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            header_size: HEADER_SIZE,
            reserved_slots: 1,
        }
    }
}

impl CapacityConfig {
    /// Create a configuration for the default page size
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the physical page size
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Set the header size, for page layouts with extra per-type fields
    pub fn header_size(mut self, size: usize) -> Self {
        self.header_size = size;
        self
    }

    /// Set the number of reserved slots
    pub fn reserved_slots(mut self, slots: usize) -> Self {
        self.reserved_slots = slots;
        self
    }

    /// Maximum number of entries of `entry_width` bytes a page can hold
    pub fn max_entries(&self, entry_width: usize) -> Result<usize> {
        if entry_width == 0 {
            return Err(Error::PageTooSmall {
                page_size: self.page_size,
                entry_width,
            });
        }
        let usable = self
            .page_size
            .checked_sub(self.header_size)
            .ok_or(Error::InvalidParameter("page header larger than page"))?;

        let max_size = (usable / entry_width).saturating_sub(self.reserved_slots);
        if max_size < MIN_MAX_SIZE {
            return Err(Error::PageTooSmall {
                page_size: self.page_size,
                entry_width,
            });
        }

        debug!(page_size = self.page_size, entry_width, max_size, "computed page capacity");
        Ok(max_size)
    }

    /// Capacity of a leaf page
    pub fn leaf_max_size(&self, key_width: usize, value_width: usize) -> Result<usize> {
        self.max_entries(self.entry_width(key_width, value_width)?)
    }

    /// Capacity of an internal page
    pub fn internal_max_size(&self, key_width: usize) -> Result<usize> {
        self.max_entries(self.entry_width(key_width, CHILD_POINTER_SIZE)?)
    }

    fn entry_width(&self, key_width: usize, payload_width: usize) -> Result<usize> {
        key_width.checked_add(payload_width).ok_or(Error::PageTooSmall {
            page_size: self.page_size,
            entry_width: usize::MAX,
        })
    }
}
