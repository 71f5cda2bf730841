use crate::tree::{page_rotation, pages_root, push_down_inherited};
use crate::PdfEngineError;
use lopdf::{Document, Object, ObjectId};
use page_model::ChangeSet;
use std::collections::BTreeSet;

/// Rebuilds the page tree as a single `Pages` node listing `final_order`,
/// combines each page's `/Rotate` with its rotation delta, and prunes
/// everything that is no longer reachable.
pub(crate) fn apply_change_set(
    doc: &mut Document,
    change_set: &ChangeSet,
) -> Result<(), PdfEngineError> {
    let pages = doc.get_pages();
    let page_count = pages.len() as u32;

    let mut seen = BTreeSet::new();
    let mut ordered = Vec::with_capacity(change_set.final_order.len());
    for identity in &change_set.final_order {
        if !seen.insert(*identity) {
            return Err(PdfEngineError::DuplicatePage(identity.get()));
        }
        let page_id = pages
            .get(&identity.get())
            .copied()
            .ok_or(PdfEngineError::PageOutOfRange { page: identity.get(), page_count })?;
        ordered.push((*identity, page_id));
    }

    let root_id = pages_root(doc)?;

    for (identity, page_id) in &ordered {
        push_down_inherited(doc, *page_id)?;

        let delta = change_set.rotation_for(*identity);
        let rotation = (page_rotation(doc, *page_id)? + i64::from(delta.degrees())).rem_euclid(360);

        let page = doc.get_object_mut(*page_id).and_then(Object::as_dict_mut)?;
        page.set("Parent", root_id);
        if !delta.is_none() {
            page.set("Rotate", rotation);
        }
    }

    let kids: Vec<ObjectId> = ordered.iter().map(|(_, page_id)| *page_id).collect();
    replace_kids(doc, root_id, &kids)?;

    let pruned = doc.prune_objects();
    log::debug!(
        "rewrote page tree: {} pages kept, {} objects pruned",
        kids.len(),
        pruned.len()
    );

    Ok(())
}

/// Appends every page of the remaining documents to the first one.
pub(crate) fn merge_documents(documents: Vec<Document>) -> Result<Document, PdfEngineError> {
    let mut documents = documents.into_iter();
    let mut primary = documents.next().ok_or(PdfEngineError::NothingToMerge)?;
    let root_id = pages_root(&primary)?;

    let mut kids: Vec<ObjectId> = primary.get_pages().into_values().collect();
    for page_id in &kids {
        push_down_inherited(&mut primary, *page_id)?;
    }

    for mut secondary in documents {
        let secondary_pages: Vec<ObjectId> = secondary.get_pages().into_values().collect();
        for page_id in &secondary_pages {
            push_down_inherited(&mut secondary, *page_id)?;
        }

        secondary.renumber_objects_with(primary.max_id + 1);
        kids.extend(secondary.get_pages().into_values());

        primary.max_id = primary.max_id.max(secondary.max_id);
        primary.objects.extend(secondary.objects);
    }

    for page_id in &kids {
        let page = primary.get_object_mut(*page_id).and_then(Object::as_dict_mut)?;
        page.set("Parent", root_id);
    }

    replace_kids(&mut primary, root_id, &kids)?;
    primary.prune_objects();

    Ok(primary)
}

fn replace_kids(
    doc: &mut Document,
    root_id: ObjectId,
    kids: &[ObjectId],
) -> Result<(), PdfEngineError> {
    let root = doc.get_object_mut(root_id).and_then(Object::as_dict_mut)?;
    root.set("Kids", kids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>());
    root.set("Count", kids.len() as i64);
    Ok(())
}
