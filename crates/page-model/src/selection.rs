use crate::record::PageId;
use crate::sequence::PageSequence;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionSet {
    members: BTreeSet<PageId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `identity` if absent, removes it if present. Returns whether the
    /// page is selected afterwards.
    pub fn toggle(&mut self, identity: PageId) -> bool {
        if self.members.remove(&identity) {
            return false;
        }

        self.members.insert(identity);
        true
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn contains(&self, identity: PageId) -> bool {
        self.members.contains(&identity)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PageId> + '_ {
        self.members.iter().copied()
    }

    /// Drops members that are deleted or missing from `pages`.
    pub fn retain_active(&mut self, pages: &PageSequence) -> usize {
        let before = self.members.len();
        self.members.retain(|identity| pages.is_active(*identity));
        before - self.members.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePlan {
    pub identities: BTreeSet<PageId>,
    pub consumes_selection: bool,
}

/// Deleting a selected page deletes the whole selection and consumes it.
/// Deleting any other page deletes just that page and keeps the selection.
pub fn delete_targets(target: PageId, selection: &SelectionSet) -> DeletePlan {
    if selection.contains(target) {
        return DeletePlan { identities: selection.members.clone(), consumes_selection: true };
    }

    DeletePlan { identities: BTreeSet::from([target]), consumes_selection: false }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection_of(ids: &[u32]) -> SelectionSet {
        let mut selection = SelectionSet::new();
        for id in ids {
            selection.toggle(PageId(*id));
        }
        selection
    }

    #[test]
    fn toggle_is_symmetric() {
        let mut selection = SelectionSet::new();

        assert!(selection.toggle(PageId(3)));
        assert!(selection.contains(PageId(3)));

        assert!(!selection.toggle(PageId(3)));
        assert!(!selection.contains(PageId(3)));
        assert!(selection.is_empty());
    }

    #[test]
    fn iteration_is_in_identity_order() {
        let selection = selection_of(&[7, 2, 5]);

        assert_eq!(selection.iter().collect::<Vec<_>>(), vec![PageId(2), PageId(5), PageId(7)]);
        assert_eq!(selection.len(), 3);
    }

    #[test]
    fn clear_empties_selection() {
        let mut selection = selection_of(&[1, 2]);
        selection.clear();

        assert!(selection.is_empty());
    }

    #[test]
    fn deleting_selected_page_takes_whole_selection() {
        let selection = selection_of(&[2, 4]);

        let plan = delete_targets(PageId(4), &selection);

        assert_eq!(plan.identities, BTreeSet::from([PageId(2), PageId(4)]));
        assert!(plan.consumes_selection);
    }

    #[test]
    fn deleting_unselected_page_leaves_selection_alone() {
        let selection = selection_of(&[2, 4]);

        let plan = delete_targets(PageId(6), &selection);

        assert_eq!(plan.identities, BTreeSet::from([PageId(6)]));
        assert!(!plan.consumes_selection);
    }

    #[test]
    fn deleting_with_empty_selection_targets_single_page() {
        let plan = delete_targets(PageId(1), &SelectionSet::new());

        assert_eq!(plan.identities, BTreeSet::from([PageId(1)]));
        assert!(!plan.consumes_selection);
    }

    #[test]
    fn retain_active_drops_stale_members() {
        let mut pages = PageSequence::with_page_count(4);
        pages.mark_deleted([PageId(3)]);
        let mut selection = selection_of(&[1, 3, 9]);

        let dropped = selection.retain_active(&pages);

        assert_eq!(dropped, 2);
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec![PageId(1)]);
    }
}
