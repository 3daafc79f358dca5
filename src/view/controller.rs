//! Viewer façade driven by the (external) window layer.
//!
//! Owns the document model, layout engine, viewport, and selection, and
//! keeps them consistent: every mutation re-derives the layout through
//! the cache and re-clamps the viewport, and document deletion purges the
//! selection before the removed document is dropped.

use kurbo::{Point, Size, Vec2};
use log::info;

use crate::config::ViewerConfig;
use crate::doc::{Document, DocumentModel, RemovedDocument, Role, RoleData};
use crate::text::TextMeasure;

use super::layout::{Alignment, LayoutEngine, LayoutItem, LayoutParams, PagesLayout};
use super::selection::{SelectionMode, SelectionModel};
use super::viewport::{ScrollBarRects, Viewport};

pub struct Viewer {
    model: DocumentModel,
    engine: LayoutEngine,
    viewport: Viewport,
    selection: SelectionModel,
    measure: Box<dyn TextMeasure>,
    margin: f64,
    spacing: f64,
    alignment: Alignment,
    /// Layout inputs derived from the model; kept in sync by the
    /// structural mutators so pure reads stay O(1) on cache hits.
    items: Vec<LayoutItem>,
}

impl Viewer {
    #[must_use]
    pub fn new(config: &ViewerConfig, measure: Box<dyn TextMeasure>) -> Self {
        Self {
            model: DocumentModel::new(config.header_font.clone()),
            engine: LayoutEngine::new(),
            viewport: Viewport::default(),
            selection: SelectionModel::new(),
            measure,
            margin: config.margin,
            spacing: config.spacing,
            alignment: config.alignment,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn model(&self) -> &DocumentModel {
        &self.model
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Exposes the engine's recompute counter, mostly for tests and
    /// diagnostics.
    #[must_use]
    pub fn layout_recompute_count(&self) -> u64 {
        self.engine.recompute_count()
    }

    // ---- documents ----------------------------------------------------

    /// Takes ownership of a document and lays its pages out incrementally
    /// behind the existing ones.
    pub fn add_document(&mut self, document: Document) {
        let pages = self.model.add_document(document);
        let appended = pages.len();
        for global in pages {
            self.items.push(self.layout_item(global));
        }
        let params = self.layout_params();
        let version = self.model.version();
        let canvas = self
            .engine
            .append(
                &self.items,
                appended,
                params,
                version,
                self.measure.as_ref(),
                self.model.header_font(),
            )
            .canvas;
        self.viewport.clamp(canvas);
    }

    /// Deletes a document; the selection purge runs while the removed
    /// document is still alive, so no stale index is observable.
    pub fn delete_document(&mut self, index: usize) -> Option<RemovedDocument> {
        let removed = self.model.delete_document(index)?;
        self.selection.on_pages_removed(removed.pages.clone());
        self.rebuild_items();
        self.engine.invalidate();
        self.sync();
        info!(
            "closed {:?}, {} pages remain",
            removed.document.name(),
            self.model.total_page_count()
        );
        Some(removed)
    }

    // ---- viewport -----------------------------------------------------

    pub fn set_render_target_size(&mut self, size: Size) {
        self.viewport.set_render_size(size);
        self.sync();
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.viewport.set_zoom(zoom);
        self.sync();
    }

    pub fn add_zoom(&mut self, delta: f64) {
        self.viewport.add_zoom(delta);
        self.sync();
    }

    pub fn set_scroll(&mut self, h_scroll: f64, v_scroll: f64) {
        self.viewport.set_scroll(h_scroll, v_scroll);
        self.sync();
    }

    pub fn add_scroll(&mut self, h_delta: f64, v_delta: f64) {
        self.viewport.add_scroll(h_delta, v_delta);
        self.sync();
    }

    /// Translation to apply before drawing the canvas.
    pub fn viewport_offset(&mut self) -> Vec2 {
        let canvas = self.layout().canvas;
        self.viewport.offset(canvas)
    }

    pub fn scrollbar_rects(&mut self) -> ScrollBarRects {
        let canvas = self.layout().canvas;
        self.viewport.scrollbar_rects(canvas)
    }

    /// Global index of the page under a pointer position in render-target
    /// pixels, if any.
    pub fn hit_test(&mut self, point: Point) -> Option<usize> {
        let params = self.layout_params();
        let version = self.model.version();
        let layout = self.engine.get_or_layout(
            &self.items,
            params,
            version,
            self.measure.as_ref(),
            self.model.header_font(),
        );
        let canvas_point = self.viewport.to_canvas(point, layout.canvas);
        layout.hit_test(canvas_point)
    }

    // ---- layout parameters --------------------------------------------

    pub fn set_margin(&mut self, margin: f64) {
        self.margin = margin;
        self.engine.invalidate();
        self.sync();
    }

    pub fn set_spacing(&mut self, spacing: f64) {
        self.spacing = spacing;
        self.engine.invalidate();
        self.sync();
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
        self.sync();
    }

    /// The current layout, computed through the cache.
    pub fn layout(&mut self) -> &PagesLayout {
        let params = self.layout_params();
        let version = self.model.version();
        self.engine.get_or_layout(
            &self.items,
            params,
            version,
            self.measure.as_ref(),
            self.model.header_font(),
        )
    }

    // ---- selection ----------------------------------------------------

    pub fn select(&mut self, index: usize, mode: SelectionMode) {
        self.selection.select(index, mode);
    }

    pub fn deselect(&mut self, index: usize, mode: SelectionMode) {
        self.selection.deselect(index, mode);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ---- internals ----------------------------------------------------

    /// Effective layout viewport: render size divided by zoom, so
    /// `HorizontalFlow` reflows when either changes.
    fn layout_params(&self) -> LayoutParams {
        let render = self.viewport.render_size();
        let zoom = self.viewport.zoom();
        LayoutParams {
            viewport: Size::new(render.width / zoom, render.height / zoom),
            margin: self.margin,
            spacing: self.spacing,
            alignment: self.alignment,
        }
    }

    fn layout_item(&self, global: usize) -> LayoutItem {
        let size = self
            .model
            .page(global)
            .map(crate::doc::Page::size)
            .unwrap_or_default();
        let header = match self.model.data(global, Role::HeaderText) {
            Some(RoleData::HeaderText(text)) => Some(text),
            _ => None,
        };
        LayoutItem { size, header }
    }

    fn rebuild_items(&mut self) {
        self.items = (0..self.model.total_page_count())
            .map(|global| self.layout_item(global))
            .collect();
    }

    /// Re-derives the layout through the cache and re-clamps scroll.
    fn sync(&mut self) {
        let params = self.layout_params();
        let version = self.model.version();
        let canvas = self
            .engine
            .get_or_layout(
                &self.items,
                params,
                version,
                self.measure.as_ref(),
                self.model.header_font(),
            )
            .canvas;
        self.viewport.clamp(canvas);
    }
}
