use crate::error::EditError;
use crate::record::{PageId, PageInfo, PageRecord, Rotation};
use std::collections::BTreeSet;
use std::iter::FusedIterator;
use std::slice;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSequence {
    records: Vec<PageRecord>,
    loaded: Vec<PageId>,
}

impl PageSequence {
    pub fn from_pages(pages: impl IntoIterator<Item = PageInfo>) -> Result<Self, EditError> {
        let mut seen = BTreeSet::new();
        let mut records = Vec::new();

        for info in pages {
            if info.identity.get() == 0 {
                return Err(EditError::InvalidIdentity { identity: info.identity });
            }
            if !seen.insert(info.identity) {
                return Err(EditError::DuplicateIdentity { identity: info.identity });
            }
            if !info.has_valid_geometry() {
                return Err(EditError::InvalidGeometry { identity: info.identity });
            }
            records.push(PageRecord::from_info(info));
        }

        Ok(Self::from_records(records))
    }

    pub fn with_page_count(count: u32) -> Self {
        let records =
            (1..=count).map(|number| PageRecord::from_info(PageInfo::letter(PageId(number))));
        Self::from_records(records.collect())
    }

    fn from_records(records: Vec<PageRecord>) -> Self {
        let loaded = records.iter().map(PageRecord::identity).collect();
        Self { records, loaded }
    }

    /// Identities in the order the loader reported them.
    pub fn loaded_order(&self) -> &[PageId] {
        &self.loaded
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every record, deleted ones included, in sequence order.
    pub fn iter(&self) -> slice::Iter<'_, PageRecord> {
        self.records.iter()
    }

    pub fn get(&self, identity: PageId) -> Option<&PageRecord> {
        self.records.iter().find(|record| record.identity() == identity)
    }

    pub fn contains(&self, identity: PageId) -> bool {
        self.position(identity).is_some()
    }

    pub fn is_active(&self, identity: PageId) -> bool {
        self.get(identity).is_some_and(|record| !record.is_deleted())
    }

    /// Non-deleted records in sequence order. Cloning the view restarts it.
    pub fn active_view(&self) -> ActiveView<'_> {
        ActiveView { records: self.records.iter() }
    }

    pub fn active_len(&self) -> usize {
        self.active_view().count()
    }

    pub fn rotate(&mut self, identity: PageId, delta: i32) -> Result<Rotation, EditError> {
        let index = self.position(identity).ok_or(EditError::NotFound { identity })?;
        let rotation = self.records[index].rotation().rotated_by(delta)?;
        self.records[index].set_rotation(rotation);

        log::debug!("page {identity}: rotated by {delta} to {}", rotation.degrees());
        Ok(rotation)
    }

    /// Soft-deletes every listed page. Identities that are not in the
    /// sequence are skipped; returns how many records matched.
    pub fn mark_deleted(&mut self, identities: impl IntoIterator<Item = PageId>) -> usize {
        let targets: BTreeSet<PageId> = identities.into_iter().collect();
        let mut matched = 0;

        let matching =
            self.records.iter_mut().filter(|record| targets.contains(&record.identity()));
        for record in matching {
            record.mark_deleted();
            matched += 1;
        }

        if matched < targets.len() {
            log::warn!("ignored {} stale page identities on delete", targets.len() - matched);
        }
        log::debug!("marked {matched} pages deleted");

        matched
    }

    /// Moves `source` to sit immediately before `target`. Positions are taken
    /// from the full sequence, deleted records included.
    pub fn move_before(&mut self, source: PageId, target: PageId) -> Result<(), EditError> {
        let from = self.position(source).ok_or(EditError::NotFound { identity: source })?;
        let target_index = self.position(target).ok_or(EditError::NotFound { identity: target })?;

        if source == target {
            return Ok(());
        }

        let record = self.records.remove(from);
        let to = if target_index > from { target_index - 1 } else { target_index };
        self.records.insert(to, record);

        log::debug!("page {source}: moved before page {target}");
        Ok(())
    }

    pub fn move_to_end(&mut self, source: PageId) -> Result<(), EditError> {
        let from = self.position(source).ok_or(EditError::NotFound { identity: source })?;

        let record = self.records.remove(from);
        self.records.push(record);

        log::debug!("page {source}: moved to end");
        Ok(())
    }

    fn position(&self, identity: PageId) -> Option<usize> {
        self.records.iter().position(|record| record.identity() == identity)
    }
}

#[derive(Debug, Clone)]
pub struct ActiveView<'a> {
    records: slice::Iter<'a, PageRecord>,
}

impl<'a> Iterator for ActiveView<'a> {
    type Item = &'a PageRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.by_ref().find(|record| !record.is_deleted())
    }
}

impl FusedIterator for ActiveView<'_> {}
