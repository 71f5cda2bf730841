use crate::PdfEngineError;
use lopdf::{Document, Object, ObjectId};
use std::collections::BTreeSet;

const DEFAULT_PAGE_SIZE: (f64, f64) = (595.0, 842.0);

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

pub(crate) fn pages_root(doc: &Document) -> Result<ObjectId, PdfEngineError> {
    Ok(doc.catalog()?.get(b"Pages")?.as_reference()?)
}

pub(crate) fn resolve_inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, PdfEngineError> {
    let mut visited = BTreeSet::new();
    let mut current = page_id;

    loop {
        if !visited.insert(current) {
            return Err(PdfEngineError::Backend(format!(
                "page tree cycle at object {} {}",
                current.0, current.1
            )));
        }

        let dict = doc.get_dictionary(current)?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }

        match dict.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent) => current = parent,
            Err(_) => return Ok(None),
        }
    }
}

pub(crate) fn page_size(doc: &Document, page_id: ObjectId) -> Result<(f64, f64), PdfEngineError> {
    let Some(media_box) = resolve_inherited(doc, page_id, b"MediaBox")? else {
        return Ok(DEFAULT_PAGE_SIZE);
    };

    let media_box = match media_box {
        Object::Reference(id) => doc.get_object(*id)?,
        other => other,
    };

    let size = media_box.as_array().ok().and_then(|array| {
        if array.len() != 4 {
            return None;
        }
        let x0 = array[0].as_float().ok()?;
        let y0 = array[1].as_float().ok()?;
        let x1 = array[2].as_float().ok()?;
        let y1 = array[3].as_float().ok()?;
        Some((f64::from((x1 - x0).abs()), f64::from((y1 - y0).abs())))
    });

    Ok(size.filter(|(width, height)| *width > 0.0 && *height > 0.0).unwrap_or(DEFAULT_PAGE_SIZE))
}

pub(crate) fn page_rotation(doc: &Document, page_id: ObjectId) -> Result<i64, PdfEngineError> {
    let rotation = resolve_inherited(doc, page_id, b"Rotate")?
        .and_then(|value| value.as_i64().ok())
        .unwrap_or(0);

    Ok(rotation.rem_euclid(360))
}

/// Copies inherited attributes onto the page itself so it can be re-parented
/// without changing how it renders.
pub(crate) fn push_down_inherited(
    doc: &mut Document,
    page_id: ObjectId,
) -> Result<(), PdfEngineError> {
    let mut inherited = Vec::new();
    for key in INHERITABLE_KEYS {
        if let Some(value) = resolve_inherited(doc, page_id, key)? {
            inherited.push((key, value.clone()));
        }
    }

    let page = doc.get_object_mut(page_id).and_then(Object::as_dict_mut)?;
    for (key, value) in inherited {
        if !page.has(key) {
            page.set(key, value);
        }
    }

    Ok(())
}
