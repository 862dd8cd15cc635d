//! Shared header of B+Tree index pages
//!
//! Every leaf and internal page starts with a [`TreePageHeader`]. The header
//! never sees keys or values. It tracks page identity, position in the tree,
//! occupancy and capacity, and answers the questions split, merge and
//! latch-crabbing code ask before touching a page.
//!
//! The header is not internally synchronized. Callers serialize access
//! through the latch of the owning page: a shared latch for the getters, an
//! exclusive latch for the setters, held across any check-then-mutate
//! sequence such as [`TreePageHeader::is_safe`] followed by an insert.

use crate::error::{Error, Lsn, PageId, PageType, Result};
use std::fmt;
use tracing::trace;

/// Operation a traversal is descending for
///
/// Reads are not listed: a read descent releases each ancestor as soon as
/// the child is latched and never asks whether a page is safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeOp {
    /// One entry will be added to the target leaf
    Insert,
    /// One entry will be removed from the target leaf
    Delete,
}

/// Position of a page in the tree
///
/// Occupancy rules depend on exactly two facts about a page: whether it is
/// the root and whether it is a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageRole {
    /// Root page that is also a leaf (single-page tree)
    RootLeaf,
    /// Root page with children
    RootInternal,
    /// Non-root leaf
    Leaf,
    /// Non-root internal page
    Internal,
}

impl PageRole {
    /// Role of a page of the given type
    pub fn new(page_type: PageType, is_root: bool) -> Self {
        match (page_type, is_root) {
            (PageType::Leaf, true) => PageRole::RootLeaf,
            (PageType::Internal, true) => PageRole::RootInternal,
            (PageType::Leaf, false) => PageRole::Leaf,
            (PageType::Internal, false) => PageRole::Internal,
        }
    }

    /// Whether the role is a root
    #[inline]
    pub fn is_root(self) -> bool {
        matches!(self, PageRole::RootLeaf | PageRole::RootInternal)
    }

    /// Whether the role is a leaf
    #[inline]
    pub fn is_leaf(self) -> bool {
        matches!(self, PageRole::RootLeaf | PageRole::Leaf)
    }

    /// Minimum legal occupancy of a page in this role
    #[inline]
    pub fn min_size(self, max_size: usize) -> usize {
        match self {
            PageRole::Leaf | PageRole::Internal => max_size / 2,
            // A root leaf is never merged, it may drain down to one entry.
            PageRole::RootLeaf => 1,
            // One child pointer and no separator key: the root must collapse.
            PageRole::RootInternal => 2,
        }
    }

    /// Whether one more `op` on a page of this role with `size` entries is
    /// guaranteed not to split, merge or redistribute it
    ///
    /// A safe page absorbs the change locally, so a latch-crabbing descent
    /// may release every ancestor latch above it.
    #[inline]
    pub fn is_safe(self, op: TreeOp, size: usize, max_size: usize) -> bool {
        match op {
            TreeOp::Insert => size < max_size,
            TreeOp::Delete => {
                let threshold = self.min_size(max_size) + 1;
                // Internal pages hold one fewer key than pointers.
                if self.is_leaf() {
                    size >= threshold
                } else {
                    size > threshold
                }
            }
        }
    }
}

impl fmt::Display for PageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageRole::RootLeaf => "root leaf",
            PageRole::RootInternal => "root internal",
            PageRole::Leaf => "leaf",
            PageRole::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// Metadata common to every leaf and internal page of the index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreePageHeader {
    page_type: PageType,
    lsn: Lsn,
    size: usize,
    max_size: usize,
    parent_page_id: PageId,
    page_id: PageId,
}

impl TreePageHeader {
    /// Create the header of a freshly allocated, empty page
    ///
    /// Pass [`PageId::INVALID`] as `parent_page_id` for a root page.
    ///
    /// # Panics
    /// Panics if `max_size` is zero.
    pub fn new(
        page_id: PageId,
        parent_page_id: PageId,
        page_type: PageType,
        max_size: usize,
    ) -> Self {
        assert!(max_size > 0, "page {} created with zero capacity", page_id);
        Self {
            page_type,
            lsn: Lsn::ZERO,
            size: 0,
            max_size,
            parent_page_id,
            page_id,
        }
    }

    /// Reinitialize a recycled page in place
    pub fn init(
        &mut self,
        page_id: PageId,
        parent_page_id: PageId,
        page_type: PageType,
        max_size: usize,
    ) {
        *self = Self::new(page_id, parent_page_id, page_type, max_size);
    }

    /// Get the page type
    pub fn page_type(&self) -> PageType {
        self.page_type
    }

    /// Set the page type
    ///
    /// The type is fixed once the page holds entries; changing it afterwards
    /// is a caller bug, caught only in debug builds.
    pub fn set_page_type(&mut self, page_type: PageType) {
        debug_assert!(
            self.size == 0 || self.page_type == page_type,
            "page {} changed type from {} to {} while holding {} entries",
            self.page_id,
            self.page_type,
            page_type,
            self.size
        );
        self.page_type = page_type;
    }

    /// Whether this is a leaf page
    #[inline]
    pub fn is_leaf_page(&self) -> bool {
        self.page_type == PageType::Leaf
    }

    /// Whether this is the root page, i.e. it has no parent
    #[inline]
    pub fn is_root_page(&self) -> bool {
        !self.parent_page_id.is_valid()
    }

    /// Position of this page in the tree
    #[inline]
    pub fn role(&self) -> PageRole {
        PageRole::new(self.page_type, self.is_root_page())
    }

    /// Number of entries stored on the page
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Set the number of entries
    ///
    /// # Panics
    /// Panics if `size` exceeds `max_size`.
    pub fn set_size(&mut self, size: usize) {
        assert!(
            size <= self.max_size,
            "page {} size {} exceeds max size {}",
            self.page_id,
            size,
            self.max_size
        );
        self.size = size;
    }

    /// Add `delta` (possibly negative) to the number of entries
    ///
    /// # Panics
    /// Panics if the result leaves `[0, max_size]`.
    pub fn increase_size(&mut self, delta: isize) {
        let size = self.size as i64 + delta as i64;
        assert!(
            size >= 0 && size <= self.max_size as i64,
            "page {} size {} out of range 0..={}",
            self.page_id,
            size,
            self.max_size
        );
        self.size = size as usize;
    }

    /// Set the number of entries, rejecting values above `max_size`
    pub fn try_set_size(&mut self, size: usize) -> Result<()> {
        if size > self.max_size {
            return Err(Error::SizeOutOfRange {
                size: size as i64,
                max_size: self.max_size,
            });
        }
        self.size = size;
        Ok(())
    }

    /// Add `delta` to the number of entries and return the new size
    ///
    /// The header is left untouched when the result would leave `[0, max_size]`.
    pub fn try_increase_size(&mut self, delta: isize) -> Result<usize> {
        let size = self.size as i64 + delta as i64;
        if size < 0 || size > self.max_size as i64 {
            return Err(Error::SizeOutOfRange {
                size,
                max_size: self.max_size,
            });
        }
        self.size = size as usize;
        Ok(self.size)
    }

    /// Capacity above which the page must split
    #[inline]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Set the capacity
    ///
    /// # Panics
    /// Panics if `max_size` is zero or below the current size.
    pub fn set_max_size(&mut self, max_size: usize) {
        assert!(
            max_size > 0 && max_size >= self.size,
            "page {} max size {} invalid for size {}",
            self.page_id,
            max_size,
            self.size
        );
        self.max_size = max_size;
    }

    /// Set the capacity, rejecting zero or a value below the current size
    pub fn try_set_max_size(&mut self, max_size: usize) -> Result<()> {
        if max_size == 0 || max_size < self.size {
            return Err(Error::InvalidMaxSize {
                max_size,
                size: self.size,
            });
        }
        self.max_size = max_size;
        Ok(())
    }

    /// Minimum legal occupancy
    ///
    /// Half the capacity for non-root pages, 1 for a root leaf and 2 for a
    /// root internal page.
    #[inline]
    pub fn min_size(&self) -> usize {
        self.role().min_size(self.max_size)
    }

    /// Parent page, [`PageId::INVALID`] for the root
    pub fn parent_page_id(&self) -> PageId {
        self.parent_page_id
    }

    /// Set the parent page
    pub fn set_parent_page_id(&mut self, parent_page_id: PageId) {
        let was_root = self.is_root_page();
        self.parent_page_id = parent_page_id;
        if was_root != self.is_root_page() {
            trace!(
                page_id = %self.page_id,
                parent = %parent_page_id,
                root = !was_root,
                "page root status changed"
            );
        }
    }

    /// This page's id
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Set this page's id
    pub fn set_page_id(&mut self, page_id: PageId) {
        self.page_id = page_id;
    }

    /// Log sequence number of the last logged change
    pub fn lsn(&self) -> Lsn {
        self.lsn
    }

    /// Stamp the log sequence number
    pub fn set_lsn(&mut self, lsn: Lsn) {
        self.lsn = lsn;
    }

    /// Whether one more `op` cannot force a structural change on this page
    #[inline]
    pub fn is_safe(&self, op: TreeOp) -> bool {
        self.role().is_safe(op, self.size, self.max_size)
    }

    /// Whether the page holds `max_size` entries
    pub fn is_full(&self) -> bool {
        self.size >= self.max_size
    }

    /// Whether the page holds fewer entries than its minimum
    pub fn is_underflowed(&self) -> bool {
        self.size < self.min_size()
    }

    /// Whether the page can give one entry to a sibling and stay legal
    pub fn can_lend(&self) -> bool {
        self.size > self.min_size()
    }

    /// Whether the entries of `self` and `other` fit on a single page
    pub fn can_merge_with(&self, other: &TreePageHeader) -> bool {
        self.size + other.size <= self.max_size
    }
}

impl fmt::Display for TreePageHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} page {} (parent {}, lsn {}): {}/{} entries",
            self.role(),
            self.page_id,
            self.parent_page_id,
            self.lsn,
            self.size,
            self.max_size
        )
    }
}
