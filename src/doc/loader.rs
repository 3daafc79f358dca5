//! Blocking disk loader for image documents.
//!
//! The intrinsic size is probed from the file header first, so a page has
//! a usable size even when the full decode later fails; such pages end up
//! `Failed` and still participate in layout.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use kurbo::Size;
use log::{debug, warn};
use walkdir::WalkDir;

use crate::error::FolioError;

use super::document::Document;
use super::page::{Bitmap, Page};

/// Extensions matching the compiled-in decoder set.
const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Loads a single-page document from an image file. The document name is
/// the file name, as shown in page headers.
pub fn document_from_file(path: &Path) -> Result<Document, FolioError> {
    let name = display_name(path);
    let page = load_page(path)?;
    Ok(Document::new(name, vec![page]))
}

/// Loads a multi-page document from a directory: one page per supported
/// image file, in sorted file-name order.
pub fn document_from_dir(path: &Path) -> Result<Document, FolioError> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(path).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|source| FolioError::Io {
            path: path.to_path_buf(),
            source: source
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("walk failed")),
        })?;
        if entry.file_type().is_file() && is_supported(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(FolioError::EmptyDocument {
            path: path.to_path_buf(),
        });
    }

    let mut pages = Vec::with_capacity(files.len());
    for file in &files {
        debug!("loading page from {}", file.display());
        pages.push(load_page(file)?);
    }
    Ok(Document::new(display_name(path), pages))
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn load_page(path: &Path) -> Result<Page, FolioError> {
    let probed = imagesize::size(path).map_err(|_| FolioError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let mut page = Page::pending(Size::new(probed.width as f64, probed.height as f64));

    match image::open(path) {
        Ok(decoded) => {
            let rgba = decoded.into_rgba8();
            let (width, height) = rgba.dimensions();
            page.mark_ready(Arc::new(Bitmap::new(width, height, rgba.into_raw())));
        }
        Err(err) => {
            warn!("failed to decode {}: {err}", path.display());
            page.mark_failed();
        }
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use image::RgbaImage;

    use crate::doc::PageState;

    use super::*;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::new(width, height)
            .save(&path)
            .expect("encode test png");
        path
    }

    #[test]
    fn file_document_has_one_ready_page() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_png(dir.path(), "pic1.png", 3, 7);

        let doc = document_from_file(&path).expect("load");
        assert_eq!(doc.name(), "pic1.png");
        assert_eq!(doc.page_count(), 1);

        let page = doc.page(0).expect("page");
        assert_eq!(page.state(), PageState::Ready);
        assert_eq!(page.size(), Size::new(3.0, 7.0));
        assert!(page.bitmap().is_some());
    }

    #[test]
    fn truncated_file_yields_failed_page_with_probed_size() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_png(dir.path(), "broken.png", 5, 9);

        // Keep the signature and IHDR chunk so the size probe succeeds,
        // drop the rest so decoding cannot.
        let bytes = std::fs::read(&path).expect("read");
        std::fs::write(&path, &bytes[..33]).expect("truncate");

        let doc = document_from_file(&path).expect("load");
        let page = doc.page(0).expect("page");
        assert_eq!(page.state(), PageState::Failed);
        assert_eq!(page.size(), Size::new(5.0, 9.0));
        assert!(page.bitmap().is_none());
    }

    #[test]
    fn junk_file_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("noise.png");
        std::fs::write(&path, b"not an image").expect("write");

        assert!(matches!(
            document_from_file(&path),
            Err(FolioError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn dir_document_collects_supported_files_in_sorted_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_png(dir.path(), "b.png", 2, 2);
        write_png(dir.path(), "a.png", 1, 1);
        std::fs::write(dir.path().join("notes.txt"), b"skip me").expect("write");

        let doc = document_from_dir(dir.path()).expect("load");
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.page(0).map(Page::size), Some(Size::new(1.0, 1.0)));
        assert_eq!(doc.page(1).map(Page::size), Some(Size::new(2.0, 2.0)));
    }

    #[test]
    fn empty_dir_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(matches!(
            document_from_dir(dir.path()),
            Err(FolioError::EmptyDocument { .. })
        ));
    }
}
