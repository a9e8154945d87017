//! Clip-region engine
//!
//! Intersects a candidate drawable rectangle with the active one. Clip
//! rectangles are snapped to whole pixels (truncated toward zero) because they
//! end up programmed as a GPU scissor.

use crate::geometry::Rect;

/// Intersect `inner` with the active clip `current`.
///
/// Returns `None` when the overlap has no area; the caller must then skip the
/// whole subtree. The operation is commutative, and intersecting a
/// pixel-aligned rectangle with itself returns it unchanged.
pub fn intersect(current: &Rect, inner: &Rect) -> Option<Rect> {
    let x = current.left().max(inner.left()).trunc();
    let y = current.top().max(inner.top()).trunc();
    let width = current.right().min(inner.right()).trunc() - x;
    let height = current.bottom().min(inner.bottom()).trunc() - y;

    if width <= 0.0 || height <= 0.0 {
        return None;
    }

    Some(Rect::new(x, y, width, height))
}

/// Like [`intersect`] but returns the canonical empty rect and a visibility flag
pub fn intersect_or_zero(current: &Rect, inner: &Rect) -> (Rect, bool) {
    match intersect(current, inner) {
        Some(rect) => (rect, true),
        None => (Rect::ZERO, false),
    }
}

/// Scoped stack of drawable rectangles.
///
/// The bottom entry is the root clip and is never popped. Every push is the
/// intersection with the current top, so the stack only ever narrows.
#[derive(Debug, Clone)]
pub struct ClipStack {
    stack: Vec<Rect>,
}

impl ClipStack {
    pub fn new(root: Rect) -> Self {
        Self { stack: vec![root] }
    }

    /// The active drawable rectangle
    pub fn current(&self) -> Rect {
        // The root entry is never removed.
        self.stack[self.stack.len() - 1]
    }

    /// Narrow the active clip to `inner`. Nothing is pushed when occluded.
    pub fn push(&mut self, inner: &Rect) -> Option<Rect> {
        let rect = intersect(&self.current(), inner)?;
        self.stack.push(rect);
        Some(rect)
    }

    /// Restore the previous clip, returning the one that is active afterwards
    pub fn pop(&mut self) -> Option<Rect> {
        if self.stack.len() <= 1 {
            return None;
        }
        self.stack.pop();
        Some(self.current())
    }

    /// Number of pushes above the root
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(rect: &Rect) -> f32 {
        rect.width * rect.height
    }

    #[test]
    fn test_intersect_self_is_identity() {
        let rects = [
            Rect::new(0.0, 0.0, 200.0, 50.0),
            Rect::new(-20.0, 10.0, 5.0, 7.0),
            Rect::new(13.0, 99.0, 1.0, 1.0),
        ];
        for rect in rects {
            assert_eq!(intersect(&rect, &rect), Some(rect));
        }
    }

    #[test]
    fn test_intersect_is_commutative() {
        let a = Rect::new(0.0, 0.0, 200.0, 50.0);
        let b = Rect::new(180.0, -10.0, 50.0, 30.0);
        assert_eq!(intersect(&a, &b), intersect(&b, &a));
    }

    #[test]
    fn test_intersect_never_grows() {
        let a = Rect::new(0.0, 0.0, 200.0, 50.0);
        let b = Rect::new(30.0, 20.0, 300.0, 10.0);
        let result = intersect(&a, &b).unwrap();
        assert!(result.width <= a.width.min(b.width));
        assert!(result.height <= a.height.min(b.height));
        assert!(area(&result) <= area(&a).min(area(&b)));
        assert!(a.contains_rect(&result));
        assert!(b.contains_rect(&result));
    }

    #[test]
    fn test_child_overhanging_parent() {
        let parent = Rect::new(0.0, 0.0, 200.0, 50.0);
        let child = Rect::new(180.0, 0.0, 50.0, 50.0);
        assert_eq!(
            intersect(&parent, &child),
            Some(Rect::new(180.0, 0.0, 20.0, 50.0))
        );
    }

    #[test]
    fn test_disjoint_rects_are_not_visible() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let far = Rect::new(1000.0, 1000.0, 5000.0, 5000.0);
        let touching = Rect::new(10.0, 0.0, 10.0, 10.0);
        for other in [far, touching] {
            assert_eq!(intersect(&a, &other), None);
            assert_eq!(intersect(&other, &a), None);
            assert_eq!(intersect_or_zero(&a, &other), (Rect::ZERO, false));
        }
    }

    #[test]
    fn test_fractional_edges_snap_to_pixels() {
        let a = Rect::new(0.5, 0.5, 100.0, 100.0);
        let b = Rect::new(10.7, 3.2, 20.0, 20.0);
        assert_eq!(intersect(&a, &b), Some(Rect::new(10.0, 3.0, 20.0, 20.0)));
    }

    #[test]
    fn test_sub_pixel_overlap_is_occluded() {
        let a = Rect::new(0.0, 0.0, 10.4, 10.0);
        let b = Rect::new(10.2, 0.0, 10.0, 10.0);
        assert_eq!(intersect(&a, &b), None);
    }

    #[test]
    fn test_clip_stack_push_pop() {
        let mut clips = ClipStack::new(Rect::new(0.0, 0.0, 200.0, 50.0));
        assert_eq!(clips.depth(), 0);

        let child = clips.push(&Rect::new(180.0, 0.0, 50.0, 50.0)).unwrap();
        assert_eq!(child, Rect::new(180.0, 0.0, 20.0, 50.0));
        assert_eq!(clips.depth(), 1);

        // Occluded pushes leave the stack untouched
        assert!(clips.push(&Rect::new(0.0, 0.0, 10.0, 10.0)).is_none());
        assert_eq!(clips.current(), child);

        assert_eq!(clips.pop(), Some(Rect::new(0.0, 0.0, 200.0, 50.0)));
        assert_eq!(clips.pop(), None);
        assert_eq!(clips.depth(), 0);
    }
}
