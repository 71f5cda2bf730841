use crate::record::{PageId, Rotation};
use crate::sequence::PageSequence;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// What a document writer needs to reproduce the session: surviving pages in
/// output order, non-zero rotations, and the soft-deleted pages.
///
/// `rotations` may name deleted pages; writers ignore entries that are not in
/// `final_order`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub final_order: Vec<PageId>,
    pub rotations: BTreeMap<PageId, Rotation>,
    pub deleted_identities: BTreeSet<PageId>,
}

impl ChangeSet {
    pub fn build(pages: &PageSequence) -> Self {
        let final_order = pages.active_view().map(|record| record.identity()).collect();

        let rotations = pages
            .iter()
            .filter(|record| !record.rotation().is_none())
            .map(|record| (record.identity(), record.rotation()))
            .collect();

        let deleted_identities = pages
            .iter()
            .filter(|record| record.is_deleted())
            .map(|record| record.identity())
            .collect();

        Self { final_order, rotations, deleted_identities }
    }

    pub fn rotation_for(&self, identity: PageId) -> Rotation {
        self.rotations.get(&identity).copied().unwrap_or(Rotation::NONE)
    }

    pub fn is_empty_output(&self) -> bool {
        self.final_order.is_empty()
    }

    /// True when writing this change-set would reproduce a document whose
    /// pages were loaded in `loaded_order`.
    pub fn is_unchanged(&self, loaded_order: &[PageId]) -> bool {
        self.rotations.is_empty()
            && self.deleted_identities.is_empty()
            && self.final_order == loaded_order
    }
}
