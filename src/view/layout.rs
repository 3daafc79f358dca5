//! Page layout over the virtual canvas.
//!
//! Converts the ordered page sequence into positioned rectangles under one
//! of four alignment strategies, and memoizes the result keyed by the
//! layout parameters and the collection version. Only `HorizontalFlow`
//! reads the viewport size, so width changes under the other strategies
//! are cache hits.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

use crate::text::{FontSpec, TextMeasure};

/// Layout strategy for the page sequence.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    /// Vertical stack, left edges at the page margin.
    #[default]
    AlignLeft,
    /// Vertical stack, right edges pinned to the widest page.
    AlignRight,
    /// Vertical stack, centered within the widest page.
    AlignHCenter,
    /// Left-to-right rows wrapping at the viewport width.
    HorizontalFlow,
}

/// Immutable inputs of one layout computation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParams {
    /// Effective viewport size in canvas units (render size / zoom).
    /// Read only under `HorizontalFlow`.
    pub viewport: Size,
    /// Margin applied on every side of a page.
    pub margin: f64,
    /// Extra distance between consecutive page footprints. May be
    /// negative to pull margins together.
    pub spacing: f64,
    pub alignment: Alignment,
}

/// One page to lay out: intrinsic size plus optional header text.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutItem {
    pub size: Size,
    pub header: Option<String>,
}

/// A placed page: rectangles in canvas coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct PageSlot {
    pub page_index: usize,
    pub page_rect: Rect,
    /// Header box sitting directly above the page rect, when present.
    pub text_rect: Option<Rect>,
}

/// The laid-out canvas.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PagesLayout {
    pub canvas: Size,
    pub slots: Vec<PageSlot>,
}

impl PagesLayout {
    /// First slot whose page rect contains `point`, in layout order.
    /// Strategies place pages without overlap, so first match wins.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<usize> {
        self.slots
            .iter()
            .find(|slot| slot.page_rect.contains(point))
            .map(|slot| slot.page_index)
    }
}

/// Value-comparable cache key. Float parameters enter as bit patterns;
/// the viewport width participates only under `HorizontalFlow`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LayoutKey {
    alignment: Alignment,
    margin_bits: u64,
    spacing_bits: u64,
    flow_width_bits: Option<u64>,
    version: u64,
}

impl LayoutKey {
    fn new(params: &LayoutParams, version: u64) -> Self {
        Self {
            alignment: params.alignment,
            margin_bits: params.margin.to_bits(),
            spacing_bits: params.spacing.to_bits(),
            flow_width_bits: (params.alignment == Alignment::HorizontalFlow)
                .then(|| params.viewport.width.to_bits()),
            version,
        }
    }
}

/// Running fold state, kept with the cached layout so appended pages can
/// continue where the last computation stopped.
#[derive(Clone, Copy, Debug, Default)]
struct Cursor {
    /// Horizontal offset within the current row (`HorizontalFlow` only).
    x: f64,
    /// Total stacked extent so far (top of the current row under flow).
    y: f64,
    /// Tallest footprint in the current row (`HorizontalFlow` only).
    row_height: f64,
    /// Widest row extent reached (`HorizontalFlow` only).
    max_extent: f64,
    /// Widest page seen (vertical strategies).
    max_page_width: f64,
}

struct CachedLayout {
    key: LayoutKey,
    layout: PagesLayout,
    cursor: Cursor,
}

/// Memoizing layout engine.
#[derive(Default)]
pub struct LayoutEngine {
    cached: Option<CachedLayout>,
    recomputes: u64,
}

impl LayoutEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Full recomputations performed so far. Cache hits and incremental
    /// appends leave it untouched.
    #[must_use]
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    /// Drops the cached layout; the next request recomputes.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Returns the layout for `items`, recomputing only when the key
    /// (params plus collection version) differs from the cached one.
    pub fn get_or_layout(
        &mut self,
        items: &[LayoutItem],
        params: LayoutParams,
        version: u64,
        measure: &dyn TextMeasure,
        font: &FontSpec,
    ) -> &PagesLayout {
        let key = LayoutKey::new(&params, version);
        if self.cached.as_ref().is_none_or(|cached| cached.key != key) {
            let mut layout = PagesLayout::default();
            let mut cursor = Cursor::default();
            {
                let mut fold = LayoutFold {
                    params: &params,
                    measure,
                    font,
                    layout: &mut layout,
                    cursor: &mut cursor,
                };
                for (index, item) in items.iter().enumerate() {
                    fold.push(index, item);
                }
            }
            self.recomputes += 1;
            self.cached = Some(CachedLayout {
                key,
                layout,
                cursor,
            });
        }
        &cached_ref(&self.cached).layout
    }

    /// Incremental path for trailing appends: continues the saved fold
    /// over the last `appended` items instead of recomputing everything.
    /// Falls back to a full recomputation when the cached layout does not
    /// line up with the request. The result always equals
    /// [`get_or_layout`](Self::get_or_layout) over the full slice.
    pub fn append(
        &mut self,
        items: &[LayoutItem],
        appended: usize,
        params: LayoutParams,
        version: u64,
        measure: &dyn TextMeasure,
        font: &FontSpec,
    ) -> &PagesLayout {
        let resumable = self.cached.as_ref().is_some_and(|cached| {
            LayoutKey::new(&params, cached.key.version) == cached.key
                && cached.layout.slots.len() + appended == items.len()
        });
        if !resumable {
            return self.get_or_layout(items, params, version, measure, font);
        }

        let cached = cached_mut(&mut self.cached);
        let start = items.len() - appended;
        let mut fold = LayoutFold {
            params: &params,
            measure,
            font,
            layout: &mut cached.layout,
            cursor: &mut cached.cursor,
        };
        for (index, item) in items.iter().enumerate().skip(start) {
            fold.push(index, item);
        }
        cached.key = LayoutKey::new(&params, version);
        &cached.layout
    }
}

// Callers fill the cache before reaching for these.
fn cached_ref(cached: &Option<CachedLayout>) -> &CachedLayout {
    match cached {
        Some(cached) => cached,
        None => unreachable!("layout cache populated before access"),
    }
}

fn cached_mut(cached: &mut Option<CachedLayout>) -> &mut CachedLayout {
    match cached {
        Some(cached) => cached,
        None => unreachable!("layout cache populated before access"),
    }
}

struct LayoutFold<'a> {
    params: &'a LayoutParams,
    measure: &'a dyn TextMeasure,
    font: &'a FontSpec,
    layout: &'a mut PagesLayout,
    cursor: &'a mut Cursor,
}

impl LayoutFold<'_> {
    fn push(&mut self, index: usize, item: &LayoutItem) {
        let margin = self.params.margin;
        let spacing = self.params.spacing;

        // Headers are wrapped at the page width, so a long title never
        // widens the canvas.
        let (text_w, text_h) = match &item.header {
            Some(text) => {
                let metrics = self.measure.measure(self.font, text, item.size.width);
                (metrics.width.min(item.size.width), metrics.height)
            }
            None => (0.0, 0.0),
        };
        let page_w = item.size.width;
        let page_h = item.size.height;
        let footprint_w = page_w + 2.0 * margin;
        let footprint_h = text_h + page_h + 2.0 * margin;

        match self.params.alignment {
            Alignment::AlignLeft | Alignment::AlignRight | Alignment::AlignHCenter => {
                let max_before = self.cursor.max_page_width;
                if page_w > max_before {
                    self.cursor.max_page_width = page_w;
                    self.repin(page_w);
                }
                let top = if self.layout.slots.is_empty() {
                    0.0
                } else {
                    self.cursor.y + spacing
                };
                let left = self.page_left(page_w);
                let page_rect = Rect::new(
                    left,
                    top + margin + text_h,
                    left + page_w,
                    top + margin + text_h + page_h,
                );
                let text_rect = item
                    .header
                    .as_ref()
                    .map(|_| self.text_rect_above(page_rect, text_w, text_h));

                self.cursor.y = top + footprint_h;
                self.layout.canvas =
                    Size::new(self.cursor.max_page_width + 2.0 * margin, self.cursor.y);
                self.layout.slots.push(PageSlot {
                    page_index: index,
                    page_rect,
                    text_rect,
                });
            }
            Alignment::HorizontalFlow => {
                // Wrap when this footprint would cross the viewport width,
                // unless the row is empty (a page wider than the viewport
                // still gets a row of its own).
                if self.cursor.x > 0.0 && self.cursor.x + footprint_w > self.params.viewport.width {
                    self.cursor.y += self.cursor.row_height + spacing;
                    self.cursor.x = 0.0;
                    self.cursor.row_height = 0.0;
                }
                let left = self.cursor.x + margin;
                let top = self.cursor.y;
                let page_rect = Rect::new(
                    left,
                    top + margin + text_h,
                    left + page_w,
                    top + margin + text_h + page_h,
                );
                let text_rect = item
                    .header
                    .as_ref()
                    .map(|_| self.text_rect_above(page_rect, text_w, text_h));

                self.cursor.row_height = self.cursor.row_height.max(footprint_h);
                self.cursor.max_extent = self.cursor.max_extent.max(self.cursor.x + footprint_w);
                self.cursor.x += footprint_w + spacing;
                self.layout.canvas = Size::new(
                    self.cursor.max_extent,
                    self.cursor.y + self.cursor.row_height,
                );
                self.layout.slots.push(PageSlot {
                    page_index: index,
                    page_rect,
                    text_rect,
                });
            }
        }
    }

    /// Left edge of a page under the current vertical strategy.
    fn page_left(&self, page_w: f64) -> f64 {
        let margin = self.params.margin;
        let max_w = self.cursor.max_page_width;
        match self.params.alignment {
            Alignment::AlignRight => max_w + margin - page_w,
            Alignment::AlignHCenter => margin + (max_w - page_w) / 2.0,
            Alignment::AlignLeft | Alignment::HorizontalFlow => margin,
        }
    }

    /// Header box directly above the page rect. Right-aligned strategies
    /// pin the text to the page's right edge, the rest to its left.
    fn text_rect_above(&self, page_rect: Rect, text_w: f64, text_h: f64) -> Rect {
        let top = page_rect.y0 - text_h;
        match self.params.alignment {
            Alignment::AlignRight => {
                Rect::new(page_rect.x1 - text_w, top, page_rect.x1, top + text_h)
            }
            _ => Rect::new(page_rect.x0, top, page_rect.x0 + text_w, top + text_h),
        }
    }

    /// A new widest page moved the pinning edge; shift every placed slot
    /// to its new horizontal position. Headers keep their page-relative
    /// edge, so they shift by the same delta.
    fn repin(&mut self, max_page_width: f64) {
        let margin = self.params.margin;
        let shift = |slot: &mut PageSlot, new_left: f64| {
            let delta = Vec2::new(new_left - slot.page_rect.x0, 0.0);
            slot.page_rect = slot.page_rect + delta;
            if let Some(text) = &mut slot.text_rect {
                *text = *text + delta;
            }
        };
        match self.params.alignment {
            Alignment::AlignRight => {
                for slot in &mut self.layout.slots {
                    shift(slot, max_page_width + margin - slot.page_rect.width());
                }
            }
            Alignment::AlignHCenter => {
                for slot in &mut self.layout.slots {
                    shift(slot, margin + (max_page_width - slot.page_rect.width()) / 2.0);
                }
            }
            Alignment::AlignLeft | Alignment::HorizontalFlow => {}
        }
    }
}
