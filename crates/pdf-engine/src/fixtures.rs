//! In-memory PDFs for engine tests. Page `n` of a flat document is
//! `600 + n` points wide so the output order can be read back from geometry.

use crate::tree::{page_rotation, page_size};
use lopdf::{dictionary, Document, Object, ObjectId};

fn finish(mut doc: Document, pages_id: ObjectId) -> Vec<u8> {
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("failed to save test PDF");
    bytes
}

pub(crate) fn flat_document(page_count: u32) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = (1..=page_count)
        .map(|number| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), (600 + number as i64).into(), 800.into()],
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
        }),
    );

    finish(doc, pages_id)
}

/// Three pages under an intermediate node that supplies MediaBox, Resources
/// and `/Rotate 180`.
pub(crate) fn nested_document() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let root_id = doc.new_object_id();
    let middle_id = doc.new_object_id();

    let kids: Vec<Object> = (0..3)
        .map(|_| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => middle_id,
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        middle_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Parent" => root_id,
            "Kids" => kids,
            "Count" => 3,
            "MediaBox" => vec![0.into(), 0.into(), 500.into(), 700.into()],
            "Resources" => dictionary! {},
            "Rotate" => 180,
        }),
    );
    doc.objects.insert(
        root_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(middle_id)],
            "Count" => 3,
        }),
    );

    finish(doc, root_id)
}

pub(crate) fn page_widths(bytes: &[u8]) -> Vec<f64> {
    let doc = Document::load_mem(bytes).expect("output parses");
    doc.get_pages()
        .into_values()
        .map(|page_id| page_size(&doc, page_id).expect("page size").0)
        .collect()
}

pub(crate) fn page_rotations(bytes: &[u8]) -> Vec<i64> {
    let doc = Document::load_mem(bytes).expect("output parses");
    doc.get_pages()
        .into_values()
        .map(|page_id| page_rotation(&doc, page_id).expect("page rotation"))
        .collect()
}
