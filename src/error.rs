//! Error types for bptree-page

use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// The main error type for page header operations
///
/// The occupancy and safety queries never fail. Errors only come out of the
/// checked mutators, the capacity helper and the on-page codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A checked size mutation would leave `[0, max_size]`
    #[error("Size out of range: {size} is outside 0..={max_size}")]
    SizeOutOfRange {
        /// Size the mutation would have produced
        size: i64,
        /// Capacity of the page
        max_size: usize,
    },

    /// A capacity that cannot hold the current entries, or zero
    #[error("Invalid max size {max_size} for a page holding {size} entries")]
    InvalidMaxSize {
        /// Requested capacity
        max_size: usize,
        /// Current occupancy
        size: usize,
    },

    /// Page byte budget cannot hold enough entries of the given width
    #[error("Page of {page_size} bytes is too small for entries of {entry_width} bytes")]
    PageTooSmall {
        /// Physical page size in bytes
        page_size: usize,
        /// Width of one entry in bytes
        entry_width: usize,
    },

    /// Unknown page type code read from a page
    #[error("Invalid page type code: {0}")]
    InvalidPageType(u32),

    /// Decoding error
    #[error("Decoding error: {0}")]
    Decoding(Cow<'static, str>),

    /// Header contents violate an invariant
    #[error("Corruption detected: {details}")]
    Corruption {
        /// Description of the corruption
        details: String,
        /// Page where corruption was detected
        page_id: Option<PageId>,
    },

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(&'static str),
}

/// Result type alias for bptree-page operations
pub type Result<T> = std::result::Result<T, Error>;

/// Page identifier handed out by the page allocator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageId(pub u64);

impl PageId {
    /// Sentinel for "no page": an unassigned page, or the parent of the root
    pub const INVALID: PageId = PageId(u64::MAX);

    /// Whether this id refers to a real page
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.0)
        } else {
            f.write_str("invalid")
        }
    }
}

/// Log sequence number stamped on a page by the recovery layer
///
/// Opaque here: it is stored and reported, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Lsn(pub u64);

impl Lsn {
    /// LSN of a page that has never been logged
    pub const ZERO: Lsn = Lsn(0);
}

impl fmt::Display for Lsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Structural role of an index page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageType {
    /// Leaf page (key/value entries)
    Leaf,
    /// Internal page (separator keys and child pointers)
    Internal,
}

impl PageType {
    /// Code stored in the on-page header
    pub const fn code(self) -> u32 {
        match self {
            PageType::Leaf => 1,
            PageType::Internal => 2,
        }
    }

    /// Parse a stored code
    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            1 => Ok(PageType::Leaf),
            2 => Ok(PageType::Internal),
            other => Err(Error::InvalidPageType(other)),
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageType::Leaf => f.write_str("leaf"),
            PageType::Internal => f.write_str("internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_page_id() {
        assert!(!PageId::INVALID.is_valid());
        assert!(PageId(0).is_valid());
        assert_eq!(PageId::default(), PageId::INVALID);
        assert_eq!(PageId::INVALID.to_string(), "invalid");
        assert_eq!(PageId(42).to_string(), "42");
    }

    #[test]
    fn test_page_type_codes() {
        assert_eq!(PageType::from_code(PageType::Leaf.code()).unwrap(), PageType::Leaf);
        assert_eq!(PageType::from_code(PageType::Internal.code()).unwrap(), PageType::Internal);
        assert_eq!(PageType::from_code(0), Err(Error::InvalidPageType(0)));
        assert_eq!(PageType::from_code(7), Err(Error::InvalidPageType(7)));
    }

    #[test]
    fn test_error_display() {
        let err = Error::SizeOutOfRange {
            size: -1,
            max_size: 4,
        };
        assert_eq!(err.to_string(), "Size out of range: -1 is outside 0..=4");
    }
}
