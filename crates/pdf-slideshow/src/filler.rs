//! Blank filler page used to even out 2-up pairing

use crate::constants::mm_to_pt;
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;

/// Build a one-page document with a blank page of the given size
pub fn blank_document(size: PageSize) -> Result<Document> {
    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(mm_to_pt(size.width_mm)),
        Object::Real(mm_to_pt(size.height_mm)),
    ];

    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let page_id = create_blank_page(&mut doc, &media_box, pages_id)?;

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
        ("Count", Object::Integer(1)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

/// Create a blank page with the given media box
fn create_blank_page(
    doc: &mut Document,
    media_box: &[Object],
    parent_id: ObjectId,
) -> Result<ObjectId> {
    let content_stream = Stream::new(Dictionary::new(), Vec::new());
    let content_id = doc.add_object(content_stream);

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_id));
    page_dict.set("MediaBox", Object::Array(media_box.to_vec()));
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(Dictionary::new()));

    let page_id = doc.add_object(page_dict);
    Ok(page_id)
}

/// Write a blank portrait A4 page to `path`
pub async fn write_blank_a4(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let mut doc = blank_document(PageSize::A4)?;
    let mut writer = Vec::new();
    doc.save_to(&mut writer)?;
    tokio::fs::write(&path, writer).await?;
    Ok(())
}
