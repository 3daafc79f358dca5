//! Document: a named ordered group of pages.

use super::page::Page;

/// One opened source (a multi-page image file, a directory of images, or a
/// synthetic in-memory set). Owns its pages.
#[derive(Clone, Debug)]
pub struct Document {
    name: String,
    pages: Vec<Page>,
}

impl Document {
    #[must_use]
    pub fn new(name: impl Into<String>, pages: Vec<Page>) -> Self {
        Self {
            name: name.into(),
            pages,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Identity-based reverse lookup; `None` when the page is not ours.
    #[must_use]
    pub fn index_of(&self, page: &Page) -> Option<usize> {
        self.pages.iter().position(|own| std::ptr::eq(own, page))
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Size;

    use super::*;

    #[test]
    fn index_of_is_identity_based() {
        let doc = Document::new(
            "pics",
            vec![
                Page::pending(Size::new(1.0, 1.0)),
                Page::pending(Size::new(1.0, 1.0)),
            ],
        );

        let second = doc.page(1).map(|page| doc.index_of(page));
        assert_eq!(second, Some(Some(1)));

        let foreign = Page::pending(Size::new(1.0, 1.0));
        assert_eq!(doc.index_of(&foreign), None);
    }

    #[test]
    fn enumeration_matches_page_count() {
        let doc = Document::new("empty", vec![]);
        assert_eq!(doc.page_count(), 0);
        assert!(doc.page(0).is_none());
    }
}
