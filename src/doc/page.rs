//! Page: one displayable bitmap unit with intrinsic size and readiness state.

use std::sync::Arc;

use kurbo::Size;

/// Decode state of a page bitmap.
///
/// State and size are independent: the size may be probed from a file
/// header long before the bitmap is decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageState {
    Loading,
    Ready,
    Failed,
}

/// Opaque pixel container handed to the (external) renderer.
///
/// The core never inspects pixels; it only hands the container out while
/// the owning page is `Ready`.
#[derive(Clone)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// `data` is tightly packed RGBA8, row-major.
    #[must_use]
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize * 4);
        Self {
            width,
            height,
            data,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// One page of a document.
#[derive(Clone, Debug)]
pub struct Page {
    size: Size,
    state: PageState,
    bitmap: Option<Arc<Bitmap>>,
}

impl Page {
    /// A page whose size is known but whose bitmap has not arrived yet.
    #[must_use]
    pub fn pending(size: Size) -> Self {
        Self {
            size,
            state: PageState::Loading,
            bitmap: None,
        }
    }

    /// A fully decoded page; the intrinsic size comes from the bitmap.
    #[must_use]
    pub fn ready(bitmap: Arc<Bitmap>) -> Self {
        let mut page = Self::pending(Size::ZERO);
        page.mark_ready(bitmap);
        page
    }

    #[must_use]
    pub fn state(&self) -> PageState {
        self.state
    }

    /// Intrinsic size in device-independent units. Valid in every state;
    /// layout uses this and never the bitmap.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Renderable bitmap, only while `Ready`.
    #[must_use]
    pub fn bitmap(&self) -> Option<&Arc<Bitmap>> {
        match self.state {
            PageState::Ready => self.bitmap.as_ref(),
            PageState::Loading | PageState::Failed => None,
        }
    }

    /// Attach the decoded bitmap and flip to `Ready`; the intrinsic size
    /// is corrected to the decoded dimensions.
    pub fn mark_ready(&mut self, bitmap: Arc<Bitmap>) {
        self.size = Size::new(f64::from(bitmap.width()), f64::from(bitmap.height()));
        self.bitmap = Some(bitmap);
        self.state = PageState::Ready;
    }

    /// Record a failed decode. The probed size is kept so the page still
    /// occupies layout space; any previous bitmap is dropped.
    pub fn mark_failed(&mut self) {
        self.bitmap = None;
        self.state = PageState::Failed;
    }
}
