//! A page reported safe absorbs one more operation without a structural change

use proptest::prelude::*;

use bptree_page::{PageId, PageType, TreeOp, TreePageHeader};

fn arb_header() -> impl Strategy<Value = TreePageHeader> {
    (2usize..512, any::<bool>(), any::<bool>())
        .prop_flat_map(|(max_size, leaf, root)| {
            (Just(max_size), Just(leaf), Just(root), 0..=max_size)
        })
        .prop_map(|(max_size, leaf, root, size)| {
            let page_type = if leaf { PageType::Leaf } else { PageType::Internal };
            let parent = if root { PageId::INVALID } else { PageId(0) };
            let mut header = TreePageHeader::new(PageId(100), parent, page_type, max_size);
            header.set_size(size);
            header
        })
}

proptest! {
    #[test]
    fn insert_safe_means_no_split(header in arb_header()) {
        prop_assert_eq!(header.is_safe(TreeOp::Insert), !header.is_full());
        if header.is_safe(TreeOp::Insert) {
            let mut after = header;
            after.increase_size(1);
            prop_assert!(after.size() <= after.max_size());
        }
    }

    #[test]
    fn delete_safe_means_no_underflow(header in arb_header()) {
        if header.is_safe(TreeOp::Delete) {
            let mut after = header;
            after.increase_size(-1);
            prop_assert!(!after.is_underflowed());
            if !after.is_leaf_page() {
                // Internal pages keep a spare entry above the minimum
                prop_assert!(after.size() > after.min_size());
            }
        }
    }

    #[test]
    fn delete_unsafe_leaf_sits_at_or_below_minimum(header in arb_header()) {
        prop_assume!(header.is_leaf_page());
        prop_assert_eq!(header.is_safe(TreeOp::Delete), header.can_lend());
    }

    #[test]
    fn safety_matches_pure_role_rule(header in arb_header()) {
        let role = header.role();
        for op in [TreeOp::Insert, TreeOp::Delete] {
            prop_assert_eq!(
                header.is_safe(op),
                role.is_safe(op, header.size(), header.max_size())
            );
        }
    }
}
