//! Document collection: the model owning all open documents.
//!
//! Aggregates every document's pages into one flat, globally-indexed
//! sequence, answers per-page role queries, and notifies observers of
//! structural changes. A monotonic version counter lets caches key on
//! collection identity without holding references into it.

use std::ops::Range;

use log::debug;

use crate::events::{SubscriptionId, Subscribers};
use crate::text::FontSpec;

use super::document::Document;
use super::page::Page;

/// Location of a page inside the collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageId {
    pub doc: usize,
    pub page: usize,
}

/// Data roles a view can ask of a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Page,
    HeaderText,
    HeaderFont,
    Toolbar,
}

/// Role payloads, statically typed per role.
#[derive(Debug)]
pub enum RoleData<'a> {
    Page(&'a Page),
    HeaderText(String),
    HeaderFont(&'a FontSpec),
    /// Reserved; no toolbar resources exist yet.
    Toolbar,
}

/// Structural change notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelEvent {
    DocumentAdded { index: usize, pages: Range<usize> },
    DocumentDeleted { index: usize, pages: Range<usize> },
}

/// Result of a deletion. The document stays alive here so listeners can
/// inspect it during the synchronous purge, then it drops with this value.
#[derive(Debug)]
pub struct RemovedDocument {
    pub document: Document,
    pub index: usize,
    pub pages: Range<usize>,
}

pub struct DocumentModel {
    documents: Vec<Document>,
    flat: Vec<PageId>,
    header_font: FontSpec,
    version: u64,
    observers: Subscribers<ModelEvent>,
}

impl DocumentModel {
    #[must_use]
    pub fn new(header_font: FontSpec) -> Self {
        Self {
            documents: Vec::new(),
            flat: Vec::new(),
            header_font,
            version: 0,
            observers: Subscribers::new(),
        }
    }

    #[must_use]
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn document(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    /// Total page count across all documents.
    #[must_use]
    pub fn total_page_count(&self) -> usize {
        self.flat.len()
    }

    #[must_use]
    pub fn page_id(&self, global: usize) -> Option<PageId> {
        self.flat.get(global).copied()
    }

    #[must_use]
    pub fn page(&self, global: usize) -> Option<&Page> {
        let id = self.page_id(global)?;
        self.documents.get(id.doc)?.page(id.page)
    }

    #[must_use]
    pub fn header_font(&self) -> &FontSpec {
        &self.header_font
    }

    /// Monotonic counter bumped on every structural change; cache keys
    /// embed it so stale layouts cannot be served.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&ModelEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Takes ownership of a document, appends its pages to the flat index,
    /// and notifies observers. Returns the new pages' global index range.
    pub fn add_document(&mut self, document: Document) -> Range<usize> {
        let index = self.documents.len();
        let start = self.flat.len();
        for page in 0..document.page_count() {
            self.flat.push(PageId { doc: index, page });
        }
        debug!(
            "document added: {:?} ({} pages)",
            document.name(),
            document.page_count()
        );
        self.documents.push(document);
        self.version += 1;

        let pages = start..self.flat.len();
        let event = ModelEvent::DocumentAdded {
            index,
            pages: pages.clone(),
        };
        self.observers.emit(&event);
        pages
    }

    /// Removes a document and its flat-index entries. Observers run before
    /// the returned value (and the document inside it) is dropped, so no
    /// stale global index is observable afterwards.
    pub fn delete_document(&mut self, index: usize) -> Option<RemovedDocument> {
        if index >= self.documents.len() {
            return None;
        }
        let start: usize = self.documents[..index]
            .iter()
            .map(Document::page_count)
            .sum();
        let document = self.documents.remove(index);
        let pages = start..start + document.page_count();
        self.rebuild_flat();
        self.version += 1;
        debug!(
            "document deleted: {:?} (global pages {}..{})",
            document.name(),
            pages.start,
            pages.end
        );

        let event = ModelEvent::DocumentDeleted {
            index,
            pages: pages.clone(),
        };
        self.observers.emit(&event);
        Some(RemovedDocument {
            document,
            index,
            pages,
        })
    }

    /// Role dispatch, bounds-checked against the current flat index.
    #[must_use]
    pub fn data(&self, global: usize, role: Role) -> Option<RoleData<'_>> {
        let id = self.page_id(global)?;
        let document = self.documents.get(id.doc)?;
        match role {
            Role::Page => document.page(id.page).map(RoleData::Page),
            Role::HeaderText => Some(RoleData::HeaderText(format!(
                "{} {} of {}",
                document.name(),
                id.page + 1,
                document.page_count()
            ))),
            Role::HeaderFont => Some(RoleData::HeaderFont(&self.header_font)),
            Role::Toolbar => Some(RoleData::Toolbar),
        }
    }

    /// Flat index invariant: always the concatenation of each document's
    /// pages in document order.
    fn rebuild_flat(&mut self) {
        self.flat.clear();
        for (doc, document) in self.documents.iter().enumerate() {
            for page in 0..document.page_count() {
                self.flat.push(PageId { doc, page });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use kurbo::Size;

    use super::*;

    fn doc(name: &str, pages: usize) -> Document {
        Document::new(
            name,
            (0..pages)
                .map(|_| Page::pending(Size::new(100.0, 50.0)))
                .collect(),
        )
    }

    #[test]
    fn flat_index_concatenates_documents_in_order() {
        let mut model = DocumentModel::new(FontSpec::default());
        assert_eq!(model.add_document(doc("a", 2)), 0..2);
        assert_eq!(model.add_document(doc("b", 3)), 2..5);

        assert_eq!(model.total_page_count(), 5);
        assert_eq!(model.page_id(2), Some(PageId { doc: 1, page: 0 }));
        assert_eq!(model.page_id(5), None);
    }

    #[test]
    fn version_bumps_on_every_structural_change() {
        let mut model = DocumentModel::new(FontSpec::default());
        assert_eq!(model.version(), 0);
        model.add_document(doc("a", 1));
        assert_eq!(model.version(), 1);
        model.delete_document(0);
        assert_eq!(model.version(), 2);
    }

    #[test]
    fn delete_reports_range_and_rebuilds_flat_index() {
        let mut model = DocumentModel::new(FontSpec::default());
        model.add_document(doc("a", 2));
        model.add_document(doc("b", 3));
        model.add_document(doc("c", 1));

        let removed = model.delete_document(1).map(|r| (r.index, r.pages));
        assert_eq!(removed, Some((1, 2..5)));

        assert_eq!(model.total_page_count(), 3);
        assert_eq!(model.page_id(2), Some(PageId { doc: 1, page: 0 }));
        assert!(model.delete_document(5).is_none());
    }

    #[test]
    fn header_text_role_names_page_within_document() {
        let mut model = DocumentModel::new(FontSpec::default());
        model.add_document(doc("cats.tiff", 3));

        match model.data(1, Role::HeaderText) {
            Some(RoleData::HeaderText(text)) => assert_eq!(text, "cats.tiff 2 of 3"),
            other => panic!("unexpected role data: {other:?}"),
        }
    }

    #[test]
    fn role_dispatch_bounds_checks_global_index() {
        let mut model = DocumentModel::new(FontSpec::default());
        model.add_document(doc("a", 1));

        assert!(model.data(0, Role::Page).is_some());
        assert!(model.data(1, Role::Page).is_none());
        assert!(matches!(
            model.data(0, Role::HeaderFont),
            Some(RoleData::HeaderFont(_))
        ));
    }

    #[test]
    fn observers_see_add_and_delete() {
        let mut model = DocumentModel::new(FontSpec::default());
        let events = Rc::new(RefCell::new(Vec::new()));

        let sink = events.clone();
        let id = model.subscribe(move |event: &ModelEvent| sink.borrow_mut().push(event.clone()));

        model.add_document(doc("a", 2));
        model.delete_document(0);
        model.unsubscribe(id);
        model.add_document(doc("b", 1));

        assert_eq!(
            *events.borrow(),
            vec![
                ModelEvent::DocumentAdded {
                    index: 0,
                    pages: 0..2
                },
                ModelEvent::DocumentDeleted {
                    index: 0,
                    pages: 0..2
                },
            ]
        );
    }
}
