//! Drawing surfaces and the host-side registry that binds them to chart ids.
//!
//! A chart never holds a surface directly. At draw time it asks a
//! [`SurfaceHost`] for the surface registered under its id, so a surface can
//! disappear (layout change, teardown) and come back without the chart
//! noticing anything beyond skipped paints.

use std::collections::HashMap;

/// Pixel-space coordinate. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A 2D target a chart paints on.
pub trait Surface {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Erase everything painted so far.
    fn clear(&mut self);

    /// Straight segment from `from` to `to`.
    fn draw_line(&mut self, from: Point, to: Point);

    /// Single dot.
    fn draw_point(&mut self, at: Point);

    /// A surface with a zero dimension cannot be painted on.
    fn is_drawable(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }
}

/// Resolves chart ids to surfaces. Implemented by whatever owns the surfaces.
pub trait SurfaceHost {
    /// Surface bound to `id`, if one is reachable right now.
    fn surface_mut(&mut self, id: &str) -> Option<&mut dyn Surface>;

    /// Drop the binding for `id`. Returns whether one existed.
    fn release(&mut self, id: &str) -> bool;
}

// ---------------------------------------------------------------------------
// SurfaceRegistry
// ---------------------------------------------------------------------------

/// Map of chart id → surface.
#[derive(Debug)]
pub struct SurfaceRegistry<S> {
    surfaces: HashMap<String, S>,
}

impl<S> Default for SurfaceRegistry<S> {
    fn default() -> Self {
        Self {
            surfaces: HashMap::new(),
        }
    }
}

impl<S: Surface> SurfaceRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `surface` to `id`, returning whatever was bound before.
    pub fn attach(&mut self, id: impl Into<String>, surface: S) -> Option<S> {
        self.surfaces.insert(id.into(), surface)
    }

    /// Unbind and return the surface for `id`.
    pub fn detach(&mut self, id: &str) -> Option<S> {
        self.surfaces.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&S> {
        self.surfaces.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut S> {
        self.surfaces.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.surfaces.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl<S: Surface> SurfaceHost for SurfaceRegistry<S> {
    fn surface_mut(&mut self, id: &str) -> Option<&mut dyn Surface> {
        self.surfaces.get_mut(id).map(|s| s as &mut dyn Surface)
    }

    fn release(&mut self, id: &str) -> bool {
        self.surfaces.remove(id).is_some()
    }
}

// ---------------------------------------------------------------------------
// DisplayList
// ---------------------------------------------------------------------------

/// One recorded draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawOp {
    Line(Point, Point),
    Point(Point),
}

/// Surface that records draw calls instead of rasterizing them.
///
/// Terminal hosts replay the ops onto their own canvas; tests inspect them
/// to check exact geometry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    /// Change the logical size. Recorded ops are kept until the next clear.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Number of line segments recorded since the last clear.
    pub fn line_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Line(..)))
            .count()
    }
}

impl Surface for DisplayList {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.clear();
    }

    fn draw_line(&mut self, from: Point, to: Point) {
        self.ops.push(DrawOp::Line(from, to));
    }

    fn draw_point(&mut self, at: Point) {
        self.ops.push(DrawOp::Point(at));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_attach_detach() {
        let mut reg = SurfaceRegistry::new();
        assert!(reg.attach("a", DisplayList::new(10, 10)).is_none());
        assert!(reg.contains("a"));
        assert_eq!(reg.len(), 1);
        assert!(reg.surface_mut("a").is_some());
        assert!(reg.surface_mut("b").is_none());
        assert!(reg.detach("a").is_some());
        assert!(reg.is_empty());
    }

    #[test]
    fn registry_release_reports_presence() {
        let mut reg = SurfaceRegistry::new();
        reg.attach("a", DisplayList::new(1, 1));
        assert!(reg.release("a"));
        assert!(!reg.release("a"));
    }

    #[test]
    fn display_list_records_and_clears() {
        let mut dl = DisplayList::new(4, 4);
        dl.draw_line(Point::new(0.0, 0.0), Point::new(4.0, 4.0));
        dl.draw_point(Point::new(1.0, 1.0));
        assert_eq!(dl.ops().len(), 2);
        assert_eq!(dl.line_count(), 1);
        dl.clear();
        assert!(dl.ops().is_empty());
    }

    #[test]
    fn zero_sized_surface_is_not_drawable() {
        assert!(!DisplayList::new(0, 10).is_drawable());
        assert!(!DisplayList::new(10, 0).is_drawable());
        assert!(DisplayList::new(1, 1).is_drawable());
    }
}
