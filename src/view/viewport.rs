//! Zoom and scroll state over the laid-out canvas.
//!
//! Scroll values are non-positive fractions of the content scrolled past
//! the viewport origin; their legal range depends on the content/viewport
//! ratio, so every mutation is followed by [`Viewport::clamp`] with the
//! current canvas size (the controller does this).

use kurbo::{Point, Rect, Size, Vec2};

/// Scrollbar track rectangles in render-target coordinates. An axis whose
/// content fits entirely gets no bar.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScrollBarRects {
    pub horizontal: Option<Rect>,
    pub vertical: Option<Rect>,
}

/// Zoom/scroll state of the view over the canvas.
#[derive(Clone, Debug)]
pub struct Viewport {
    zoom: f64,
    h_scroll: f64,
    v_scroll: f64,
    render_size: Size,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            h_scroll: 0.0,
            v_scroll: 0.0,
            render_size: Size::ZERO,
        }
    }
}

impl Viewport {
    /// Minimum zoom factor; prevents degenerate inversion of the
    /// zoom-divided viewport.
    pub const MIN_ZOOM: f64 = 0.1;
    /// Scrollbar thickness in render-target units.
    pub const SCROLLBAR_THICKNESS: f64 = 5.0;

    #[must_use]
    pub fn new(render_size: Size) -> Self {
        Self {
            render_size,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn h_scroll(&self) -> f64 {
        self.h_scroll
    }

    #[must_use]
    pub fn v_scroll(&self) -> f64 {
        self.v_scroll
    }

    #[must_use]
    pub fn render_size(&self) -> Size {
        self.render_size
    }

    pub fn set_render_size(&mut self, size: Size) {
        self.render_size = size;
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = clamp_zoom(zoom);
    }

    pub fn add_zoom(&mut self, delta: f64) {
        self.set_zoom(self.zoom + delta);
    }

    pub fn set_scroll(&mut self, h_scroll: f64, v_scroll: f64) {
        self.h_scroll = h_scroll;
        self.v_scroll = v_scroll;
    }

    pub fn add_scroll(&mut self, h_delta: f64, v_delta: f64) {
        self.h_scroll += h_delta;
        self.v_scroll += v_delta;
    }

    /// Clamps both scroll axes to the content/viewport ratio. An axis with
    /// zero canvas extent is skipped: no scrollbar, no clamp, and no
    /// division by zero.
    pub fn clamp(&mut self, canvas: Size) {
        self.zoom = clamp_zoom(self.zoom);
        if canvas.width > 0.0 {
            let visible_to_total = self.render_size.width / (canvas.width * self.zoom);
            self.h_scroll = self
                .h_scroll
                .clamp((-1.0 + visible_to_total).min(0.0), 0.0);
        }
        if canvas.height > 0.0 {
            let visible_to_total = self.render_size.height / (canvas.height * self.zoom);
            self.v_scroll = self
                .v_scroll
                .clamp((-1.0 + visible_to_total).min(0.0), 0.0);
        }
    }

    /// Translation applied before drawing: `canvas * zoom * scroll` per
    /// axis. Non-positive components.
    #[must_use]
    pub fn offset(&self, canvas: Size) -> Vec2 {
        Vec2::new(
            canvas.width * self.zoom * self.h_scroll,
            canvas.height * self.zoom * self.v_scroll,
        )
    }

    /// Scrollbar tracks for every axis whose content overflows the view.
    /// Track length is proportional to the visible share; the bar is
    /// pinned to the far edge of the opposite axis.
    #[must_use]
    pub fn scrollbar_rects(&self, canvas: Size) -> ScrollBarRects {
        let mut rects = ScrollBarRects::default();

        if canvas.width > 0.0 {
            let visible_to_total = self.render_size.width / (canvas.width * self.zoom);
            if visible_to_total < 1.0 {
                let length = self.render_size.width * visible_to_total;
                let left = -self.render_size.width * self.h_scroll;
                let top = self.render_size.height - Self::SCROLLBAR_THICKNESS;
                rects.horizontal = Some(Rect::new(
                    left,
                    top,
                    left + length,
                    top + Self::SCROLLBAR_THICKNESS,
                ));
            }
        }
        if canvas.height > 0.0 {
            let visible_to_total = self.render_size.height / (canvas.height * self.zoom);
            if visible_to_total < 1.0 {
                let length = self.render_size.height * visible_to_total;
                let top = -self.render_size.height * self.v_scroll;
                let left = self.render_size.width - Self::SCROLLBAR_THICKNESS;
                rects.vertical = Some(Rect::new(
                    left,
                    top,
                    left + Self::SCROLLBAR_THICKNESS,
                    top + length,
                ));
            }
        }
        rects
    }

    /// Converts a pointer position in render-target pixels to canvas
    /// coordinates, inverting the zoom and the viewport translation.
    #[must_use]
    pub fn to_canvas(&self, point: Point, canvas: Size) -> Point {
        let offset = self.offset(canvas);
        Point::new(
            point.x / self.zoom - offset.x / self.zoom,
            point.y / self.zoom - offset.y / self.zoom,
        )
    }
}

/// Floors the factor at [`Viewport::MIN_ZOOM`], mapping NaN/Inf back to 1.
fn clamp_zoom(zoom: f64) -> f64 {
    if !zoom.is_finite() {
        1.0
    } else {
        zoom.max(Viewport::MIN_ZOOM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(Size::new(100.0, 100.0))
    }

    #[test]
    fn scroll_clamps_to_visible_ratio() {
        let canvas = Size::new(200.0, 400.0);
        let mut vp = viewport();

        vp.add_scroll(-2.0, -2.0);
        vp.clamp(canvas);

        // visible/total: h = 100/200 = 0.5, v = 100/400 = 0.25
        assert_eq!(vp.h_scroll(), -0.5);
        assert_eq!(vp.v_scroll(), -0.75);

        vp.add_scroll(1.0, 2.0);
        vp.clamp(canvas);
        assert_eq!(vp.h_scroll(), 0.0);
        assert_eq!(vp.v_scroll(), 0.0);
    }

    #[test]
    fn fitting_content_forces_scroll_to_zero() {
        let mut vp = viewport();
        vp.set_scroll(-0.4, -0.4);
        vp.clamp(Size::new(50.0, 80.0));

        assert_eq!(vp.h_scroll(), 0.0);
        assert_eq!(vp.v_scroll(), 0.0);
        assert_eq!(vp.scrollbar_rects(Size::new(50.0, 80.0)), ScrollBarRects::default());
    }

    #[test]
    fn zero_canvas_axis_is_skipped() {
        let mut vp = viewport();
        vp.set_scroll(-0.5, -0.5);
        vp.clamp(Size::ZERO);

        // No clamp and no bars on degenerate axes.
        assert_eq!(vp.h_scroll(), -0.5);
        assert_eq!(vp.v_scroll(), -0.5);
        assert_eq!(vp.scrollbar_rects(Size::ZERO), ScrollBarRects::default());
    }

    #[test]
    fn zoom_is_floored_and_nan_resets() {
        let mut vp = viewport();
        vp.set_zoom(0.01);
        assert_eq!(vp.zoom(), Viewport::MIN_ZOOM);

        vp.add_zoom(-10.0);
        assert_eq!(vp.zoom(), Viewport::MIN_ZOOM);

        vp.set_zoom(f64::NAN);
        assert_eq!(vp.zoom(), 1.0);
    }

    #[test]
    fn zooming_out_relaxes_the_clamp_range() {
        let canvas = Size::new(400.0, 400.0);
        let mut vp = viewport();

        vp.set_scroll(0.0, -0.75);
        vp.clamp(canvas);
        assert_eq!(vp.v_scroll(), -0.75);

        // At zoom 0.25 the whole canvas fits; the scroll snaps home.
        vp.set_zoom(0.25);
        vp.clamp(canvas);
        assert_eq!(vp.v_scroll(), 0.0);
    }

    #[test]
    fn offset_is_canvas_times_zoom_times_scroll() {
        let mut vp = viewport();
        vp.set_zoom(2.0);
        vp.set_scroll(-0.25, -0.5);

        let offset = vp.offset(Size::new(200.0, 400.0));
        assert_eq!(offset, Vec2::new(-100.0, -400.0));
    }

    #[test]
    fn scrollbar_geometry_tracks_scroll_position() {
        let canvas = Size::new(200.0, 400.0);
        let mut vp = viewport();
        vp.set_scroll(-0.25, -0.5);
        vp.clamp(canvas);

        let rects = vp.scrollbar_rects(canvas);
        assert_eq!(rects.horizontal, Some(Rect::new(25.0, 95.0, 75.0, 100.0)));
        assert_eq!(rects.vertical, Some(Rect::new(95.0, 50.0, 100.0, 75.0)));
    }

    #[test]
    fn to_canvas_inverts_zoom_and_translation() {
        let canvas = Size::new(200.0, 400.0);
        let mut vp = viewport();
        vp.set_zoom(0.5);
        vp.set_scroll(-0.25, -0.5);

        // offset = (-25, -100); canvas point = p/zoom - offset/zoom
        let point = vp.to_canvas(Point::new(50.0, 50.0), canvas);
        assert_eq!(point, Point::new(150.0, 300.0));
    }
}
