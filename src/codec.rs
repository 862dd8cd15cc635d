//! On-page layout of the tree page header
//!
//! The header occupies the first [`HEADER_SIZE`] bytes of every index page,
//! little-endian:
//!
//! ```text
//! | type (4) | size (4) | max size (4) | reserved (4) |
//! | lsn (8) | parent page id (8) | page id (8) |
//! ```

use crate::error::{Error, Lsn, PageId, PageType, Result};
use crate::header::TreePageHeader;
use crate::DEFAULT_PAGE_SIZE;
use byteorder::{ByteOrder, LittleEndian};
use static_assertions::const_assert;
use tracing::warn;

/// Size of the encoded header in bytes
pub const HEADER_SIZE: usize = 40;

const TYPE_OFFSET: usize = 0;
const SIZE_OFFSET: usize = 4;
const MAX_SIZE_OFFSET: usize = 8;
const RESERVED_OFFSET: usize = 12;
const LSN_OFFSET: usize = 16;
const PARENT_OFFSET: usize = 24;
const PAGE_ID_OFFSET: usize = 32;

const_assert!(PAGE_ID_OFFSET + 8 == HEADER_SIZE);
const_assert!(LSN_OFFSET % 8 == 0);
const_assert!(HEADER_SIZE < DEFAULT_PAGE_SIZE);

impl TreePageHeader {
    /// Write the header into the start of `buf`
    pub fn encode_into(&self, buf: &mut [u8]) -> Result<()> {
        if buf.len() < HEADER_SIZE {
            return Err(Error::InvalidParameter("buffer shorter than page header"));
        }
        let size = u32::try_from(self.size())
            .map_err(|_| Error::InvalidParameter("page size does not fit in 32 bits"))?;
        let max_size = u32::try_from(self.max_size())
            .map_err(|_| Error::InvalidParameter("page max size does not fit in 32 bits"))?;

        LittleEndian::write_u32(&mut buf[TYPE_OFFSET..], self.page_type().code());
        LittleEndian::write_u32(&mut buf[SIZE_OFFSET..], size);
        LittleEndian::write_u32(&mut buf[MAX_SIZE_OFFSET..], max_size);
        LittleEndian::write_u32(&mut buf[RESERVED_OFFSET..], 0);
        LittleEndian::write_u64(&mut buf[LSN_OFFSET..], self.lsn().0);
        LittleEndian::write_u64(&mut buf[PARENT_OFFSET..], self.parent_page_id().0);
        LittleEndian::write_u64(&mut buf[PAGE_ID_OFFSET..], self.page_id().0);
        Ok(())
    }

    /// Encode the header into a fresh array
    pub fn to_bytes(&self) -> Result<[u8; HEADER_SIZE]> {
        let mut bytes = [0u8; HEADER_SIZE];
        self.encode_into(&mut bytes)?;
        Ok(bytes)
    }

    /// Read a header from the start of `buf`
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_SIZE {
            return Err(Error::Decoding(
                format!("need {} bytes for page header, got {}", HEADER_SIZE, buf.len()).into(),
            ));
        }

        let page_id = PageId(LittleEndian::read_u64(&buf[PAGE_ID_OFFSET..]));
        let page_type = PageType::from_code(LittleEndian::read_u32(&buf[TYPE_OFFSET..]))?;
        let size = LittleEndian::read_u32(&buf[SIZE_OFFSET..]) as usize;
        let max_size = LittleEndian::read_u32(&buf[MAX_SIZE_OFFSET..]) as usize;

        if max_size == 0 || size > max_size {
            warn!(%page_id, size, max_size, "corrupt tree page header");
            return Err(Error::Corruption {
                details: format!("page size {} with max size {}", size, max_size),
                page_id: Some(page_id),
            });
        }

        let parent_page_id = PageId(LittleEndian::read_u64(&buf[PARENT_OFFSET..]));
        let mut header = TreePageHeader::new(page_id, parent_page_id, page_type, max_size);
        header.set_size(size);
        header.set_lsn(Lsn(LittleEndian::read_u64(&buf[LSN_OFFSET..])));
        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let mut header = TreePageHeader::new(PageId(9), PageId(2), PageType::Internal, 200);
        header.set_size(17);
        header.set_lsn(Lsn(0x0102_0304));

        let bytes = header.to_bytes().unwrap();
        assert_eq!(&bytes[0..4], &[2, 0, 0, 0]);
        assert_eq!(&bytes[4..8], &[17, 0, 0, 0]);
        assert_eq!(&bytes[8..12], &[200, 0, 0, 0]);
        assert_eq!(&bytes[12..16], &[0, 0, 0, 0]);
        assert_eq!(&bytes[16..20], &[4, 3, 2, 1]);
        assert_eq!(bytes[24], 2);
        assert_eq!(bytes[32], 9);

        assert_eq!(TreePageHeader::decode(&bytes).unwrap(), header);
    }

    #[test]
    fn test_root_parent_sentinel_survives() {
        let header = TreePageHeader::new(PageId(0), PageId::INVALID, PageType::Leaf, 4);
        let mut page = vec![0xAAu8; DEFAULT_PAGE_SIZE];
        header.encode_into(&mut page).unwrap();

        assert_eq!(&page[PARENT_OFFSET..PARENT_OFFSET + 8], &[0xFF; 8]);
        // Bytes past the header are untouched
        assert_eq!(page[HEADER_SIZE], 0xAA);

        let decoded = TreePageHeader::decode(&page).unwrap();
        assert!(decoded.is_root_page());
        assert_eq!(decoded.min_size(), 1);
    }

    #[test]
    fn test_short_buffers() {
        let header = TreePageHeader::new(PageId(1), PageId::INVALID, PageType::Leaf, 4);
        let mut short = [0u8; HEADER_SIZE - 1];
        assert!(matches!(header.encode_into(&mut short), Err(Error::InvalidParameter(_))));
        assert!(matches!(TreePageHeader::decode(&short), Err(Error::Decoding(_))));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_counts_wider_than_page_field() {
        let max_size = u32::MAX as usize + 1;
        let mut header = TreePageHeader::new(PageId(1), PageId::INVALID, PageType::Leaf, max_size);
        assert!(matches!(header.to_bytes(), Err(Error::InvalidParameter(_))));

        header.set_size(max_size);
        let mut page = [0u8; HEADER_SIZE];
        assert!(matches!(header.encode_into(&mut page), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_unknown_page_type() {
        let header = TreePageHeader::new(PageId(1), PageId::INVALID, PageType::Leaf, 4);
        let mut bytes = header.to_bytes().unwrap();
        bytes[0] = 0;
        assert_eq!(TreePageHeader::decode(&bytes), Err(Error::InvalidPageType(0)));
    }

    #[test]
    fn test_size_above_capacity_is_corruption() {
        let header = TreePageHeader::new(PageId(5), PageId(1), PageType::Leaf, 4);
        let mut bytes = header.to_bytes().unwrap();
        LittleEndian::write_u32(&mut bytes[SIZE_OFFSET..], 5);

        match TreePageHeader::decode(&bytes) {
            Err(Error::Corruption { page_id, .. }) => assert_eq!(page_id, Some(PageId(5))),
            other => panic!("expected corruption, got {:?}", other),
        }

        LittleEndian::write_u32(&mut bytes[SIZE_OFFSET..], 0);
        LittleEndian::write_u32(&mut bytes[MAX_SIZE_OFFSET..], 0);
        assert!(matches!(TreePageHeader::decode(&bytes), Err(Error::Corruption { .. })));
    }
}
