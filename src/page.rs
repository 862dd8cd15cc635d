//! Composition seam for concrete leaf and internal pages
//!
//! A concrete page type embeds a [`TreePageHeader`] and implements
//! [`TreePage`]; every occupancy and safety question is then answered by the
//! header through the provided methods.

use crate::error::{Lsn, PageId, PageType};
use crate::header::{PageRole, TreeOp, TreePageHeader};

/// A B+Tree page that carries the shared header
pub trait TreePage {
    /// The embedded header
    fn header(&self) -> &TreePageHeader;

    /// The embedded header, mutably
    fn header_mut(&mut self) -> &mut TreePageHeader;

    /// This page's id
    fn page_id(&self) -> PageId {
        self.header().page_id()
    }

    /// Parent page, [`PageId::INVALID`] for the root
    fn parent_page_id(&self) -> PageId {
        self.header().parent_page_id()
    }

    /// Re-parent the page, e.g. after a split created a new root above it
    fn set_parent_page_id(&mut self, parent_page_id: PageId) {
        self.header_mut().set_parent_page_id(parent_page_id);
    }

    /// Structural role
    fn page_type(&self) -> PageType {
        self.header().page_type()
    }

    /// Whether this is a leaf page
    fn is_leaf_page(&self) -> bool {
        self.header().is_leaf_page()
    }

    /// Whether this is the root page
    fn is_root_page(&self) -> bool {
        self.header().is_root_page()
    }

    /// Position of the page in the tree
    fn role(&self) -> PageRole {
        self.header().role()
    }

    /// Number of entries
    fn size(&self) -> usize {
        self.header().size()
    }

    /// Capacity
    fn max_size(&self) -> usize {
        self.header().max_size()
    }

    /// Minimum legal occupancy
    fn min_size(&self) -> usize {
        self.header().min_size()
    }

    /// Whether one more `op` cannot force a structural change
    fn is_safe(&self, op: TreeOp) -> bool {
        self.header().is_safe(op)
    }

    /// Stamp the log sequence number
    fn set_lsn(&mut self, lsn: Lsn) {
        self.header_mut().set_lsn(lsn);
    }
}

impl TreePage for TreePageHeader {
    fn header(&self) -> &TreePageHeader {
        self
    }

    fn header_mut(&mut self) -> &mut TreePageHeader {
        self
    }
}
