//! Per-frame anchor measurement.

use crate::geometry::AnchorRect;

/// Measures the anchor element; queried once per frame, never cached.
///
/// `None` means the element could not be measured and the driver falls
/// back to a default rectangle.
pub trait AnchorSource {
    fn anchor_rect(&mut self) -> Option<AnchorRect>;
}

/// A fixed anchor.
impl AnchorSource for AnchorRect {
    fn anchor_rect(&mut self) -> Option<AnchorRect> {
        Some(*self)
    }
}

impl<F> AnchorSource for F
where
    F: FnMut() -> Option<AnchorRect>,
{
    fn anchor_rect(&mut self) -> Option<AnchorRect> {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_source_is_queried_each_time() {
        let mut calls = 0;
        let mut source = || {
            calls += 1;
            Some(AnchorRect::new(calls as f32, 0.0, 10.0, 10.0))
        };
        assert_eq!(source.anchor_rect().map(|r| r.left), Some(1.0));
        assert_eq!(source.anchor_rect().map(|r| r.left), Some(2.0));
    }

    #[test]
    fn test_fixed_rect_source() {
        let mut rect = AnchorRect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(rect.anchor_rect(), Some(rect));
    }
}
