use crate::error::EditError;
use crate::record::PageId;
use crate::sequence::PageSequence;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: PageId,
        over: Option<PageId>,
    },
}

/// Drag gestures act on the active view. The sequence is touched once, on
/// drop; starting, hovering and cancelling never mutate it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragReorder {
    state: DragState,
}

impl DragReorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn source(&self) -> Option<PageId> {
        match self.state {
            DragState::Dragging { source, .. } => Some(source),
            DragState::Idle => None,
        }
    }

    pub fn begin(&mut self, pages: &PageSequence, source: PageId) -> Result<(), EditError> {
        ensure_active(pages, source)?;
        self.state = DragState::Dragging { source, over: None };
        Ok(())
    }

    pub fn hover(&mut self, pages: &PageSequence, target: PageId) -> Result<(), EditError> {
        let DragState::Dragging { source, .. } = self.state else {
            return Err(EditError::NoDragInProgress);
        };
        ensure_active(pages, target)?;

        self.state = DragState::Dragging { source, over: Some(target) };
        Ok(())
    }

    pub fn drop_on(&mut self, pages: &mut PageSequence, target: PageId) -> Result<(), EditError> {
        let DragState::Dragging { source, .. } = self.state else {
            return Err(EditError::NoDragInProgress);
        };

        reorder(pages, source, target)?;
        self.state = DragState::Idle;
        Ok(())
    }

    pub fn drop_at_end(&mut self, pages: &mut PageSequence) -> Result<(), EditError> {
        let DragState::Dragging { source, .. } = self.state else {
            return Err(EditError::NoDragInProgress);
        };
        ensure_active(pages, source)?;

        pages.move_to_end(source)?;
        self.state = DragState::Idle;
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

/// Moves `source` before `target`, both taken from the active view. Identities
/// pass straight through to the full-sequence splice.
pub(crate) fn reorder(
    pages: &mut PageSequence,
    source: PageId,
    target: PageId,
) -> Result<(), EditError> {
    ensure_active(pages, source)?;
    ensure_active(pages, target)?;

    pages.move_before(source, target)
}

fn ensure_active(pages: &PageSequence, identity: PageId) -> Result<(), EditError> {
    if pages.is_active(identity) {
        Ok(())
    } else {
        Err(EditError::NotFound { identity })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(pages: &PageSequence) -> Vec<u32> {
        pages.iter().map(|record| record.identity().get()).collect()
    }

    #[test]
    fn drop_moves_source_before_target() {
        let mut pages = PageSequence::with_page_count(4);
        let mut drag = DragReorder::new();

        drag.begin(&pages, PageId(4)).expect("begin should succeed");
        drag.hover(&pages, PageId(2)).expect("hover should succeed");
        assert_eq!(order(&pages), vec![1, 2, 3, 4]);

        drag.drop_on(&mut pages, PageId(2)).expect("drop should succeed");
        assert_eq!(order(&pages), vec![1, 4, 2, 3]);
        assert_eq!(drag.state(), DragState::Idle);
    }

    #[test]
    fn cancelled_drag_leaves_sequence_alone() {
        let mut pages = PageSequence::with_page_count(3);
        let before = pages.clone();
        let mut drag = DragReorder::new();

        drag.begin(&pages, PageId(1)).expect("begin should succeed");
        drag.hover(&pages, PageId(3)).expect("hover should succeed");
        drag.cancel();

        assert_eq!(pages, before);
        assert_eq!(drag.source(), None);
        let err = drag.drop_on(&mut pages, PageId(3)).expect_err("drag was cancelled");
        assert_eq!(err, EditError::NoDragInProgress);
    }

    #[test]
    fn drop_on_source_is_noop() {
        let mut pages = PageSequence::with_page_count(3);
        let mut drag = DragReorder::new();

        drag.begin(&pages, PageId(2)).expect("begin should succeed");
        drag.drop_on(&mut pages, PageId(2)).expect("drop should succeed");

        assert_eq!(order(&pages), vec![1, 2, 3]);
    }

    #[test]
    fn deleted_pages_cannot_take_part_in_drag() {
        let mut pages = PageSequence::with_page_count(3);
        pages.mark_deleted([PageId(2)]);
        let mut drag = DragReorder::new();

        let err = drag.begin(&pages, PageId(2)).expect_err("deleted source");
        assert_eq!(err, EditError::NotFound { identity: PageId(2) });

        drag.begin(&pages, PageId(3)).expect("begin should succeed");
        let err = drag.drop_on(&mut pages, PageId(2)).expect_err("deleted target");
        assert_eq!(err, EditError::NotFound { identity: PageId(2) });
        assert_eq!(drag.source(), Some(PageId(3)));
        assert_eq!(order(&pages), vec![1, 2, 3]);
    }

    #[test]
    fn drop_past_deleted_page_uses_identity_not_index() {
        let mut pages = PageSequence::with_page_count(5);
        pages.mark_deleted([PageId(1), PageId(3)]);
        let mut drag = DragReorder::new();

        drag.begin(&pages, PageId(5)).expect("begin should succeed");
        drag.drop_on(&mut pages, PageId(4)).expect("drop should succeed");

        let active: Vec<u32> = pages.active_view().map(|r| r.identity().get()).collect();
        assert_eq!(active, vec![2, 5, 4]);
        assert_eq!(order(&pages), vec![1, 2, 3, 5, 4]);
    }

    #[test]
    fn drop_at_end_appends_source() {
        let mut pages = PageSequence::with_page_count(3);
        let mut drag = DragReorder::new();

        drag.begin(&pages, PageId(1)).expect("begin should succeed");
        drag.drop_at_end(&mut pages).expect("drop should succeed");

        assert_eq!(order(&pages), vec![2, 3, 1]);
    }

    #[test]
    fn hover_without_drag_is_rejected() {
        let pages = PageSequence::with_page_count(2);
        let mut drag = DragReorder::new();

        let err = drag.hover(&pages, PageId(1)).expect_err("no drag started");
        assert_eq!(err, EditError::NoDragInProgress);
    }
}
