//! Shared page header and occupancy policy for disk-backed B+Tree indexes
//!
//! Every internal and leaf page of the index embeds a [`TreePageHeader`]. The
//! header carries page identity, the parent link, occupancy, capacity and the
//! page LSN, and it is the single place where two rules live:
//!
//! - the minimum occupancy of a page, which differs between root and non-root
//!   pages and between leaves and internal pages;
//! - the safety predicate a latch-crabbing descent uses to decide whether a
//!   page can absorb one more insert or delete without splitting or merging,
//!   and therefore whether the latches held on its ancestors can be dropped.
//!
//! The crate performs no I/O and no allocation and never looks at keys. The
//! header is not internally synchronized: callers serialize access through
//! the latch of the page that embeds it.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod header;
pub mod codec;
pub mod capacity;
pub mod page;

// Re-exports
pub use error::{Error, Lsn, PageId, PageType, Result};
pub use header::{PageRole, TreeOp, TreePageHeader};
pub use codec::HEADER_SIZE;
pub use capacity::CapacityConfig;
pub use page::TreePage;

/// The default page size (4KB)
pub const DEFAULT_PAGE_SIZE: usize = 4096;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
