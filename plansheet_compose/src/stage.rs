// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// The base image fitted into its container.
///
/// The base is scaled uniformly so it fits inside the container, but never
/// above its natural size, and is centered in whatever room is left. All
/// layers and region polygons share this mapping.
///
/// A stage only exists once the base image has been measured: [`Stage::fit`]
/// returns `None` for an empty or unknown base size, and for an empty
/// container. Recompute it whenever either size changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stage {
    base: Size,
    container: Size,
    scale: f64,
    offset: Vec2,
}

impl Stage {
    /// Fits `base` (natural pixel size) into `container`.
    #[must_use]
    pub fn fit(base: Size, container: Size) -> Option<Self> {
        if !is_positive(base) || !is_positive(container) {
            return None;
        }
        let sx = container.width / base.width;
        let sy = container.height / base.height;
        let scale = sx.min(sy).min(1.0);
        let shown = base * scale;
        let offset = Vec2::new(
            (container.width - shown.width) * 0.5,
            (container.height - shown.height) * 0.5,
        );
        Some(Self {
            base,
            container,
            scale,
            offset,
        })
    }

    /// Natural size of the base image.
    #[must_use]
    pub fn base_size(&self) -> Size {
        self.base
    }

    /// Size of the display area.
    #[must_use]
    pub fn container_size(&self) -> Size {
        self.container
    }

    /// Uniform scale from base pixels to view pixels, at most `1.0`.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The base pixel rectangle, `(0, 0)` to its natural size.
    #[must_use]
    pub fn base_rect(&self) -> Rect {
        self.base.to_rect()
    }

    /// Where the base image lands inside the container.
    #[must_use]
    pub fn display_rect(&self) -> Rect {
        Rect::from_origin_size(self.offset.to_point(), self.base * self.scale)
    }

    /// Affine map from base pixels to container pixels.
    #[must_use]
    pub fn base_to_view(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Converts a container point into base pixels.
    #[must_use]
    pub fn view_to_base(&self, pt: Point) -> Point {
        Point::new(
            (pt.x - self.offset.x) / self.scale,
            (pt.y - self.offset.y) / self.scale,
        )
    }
}

fn is_positive(size: Size) -> bool {
    size.is_finite() && size.width > 0.0 && size.height > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_base_is_centered_at_natural_size() {
        let stage = Stage::fit(Size::new(200.0, 100.0), Size::new(800.0, 600.0)).unwrap();
        assert_eq!(stage.scale(), 1.0);
        assert_eq!(
            stage.display_rect(),
            Rect::new(300.0, 250.0, 500.0, 350.0)
        );
    }

    #[test]
    fn large_base_shrinks_to_the_tighter_axis() {
        let stage = Stage::fit(Size::new(2000.0, 1000.0), Size::new(800.0, 600.0)).unwrap();
        assert_eq!(stage.scale(), 0.4);
        let rect = stage.display_rect();
        assert_eq!(rect.width(), 800.0);
        assert_eq!(rect.height(), 400.0);
        assert_eq!(rect.y0, 100.0);
    }

    #[test]
    fn conversions_invert_each_other() {
        let stage = Stage::fit(Size::new(2000.0, 1000.0), Size::new(800.0, 600.0)).unwrap();
        let base = Point::new(1000.0, 500.0);
        let view = stage.base_to_view() * base;
        assert_eq!(view, Point::new(400.0, 300.0));
        let back = stage.view_to_base(view);
        assert!((back - base).hypot() < 1e-9);
    }

    #[test]
    fn unmeasured_base_has_no_stage() {
        assert!(Stage::fit(Size::ZERO, Size::new(800.0, 600.0)).is_none());
        assert!(Stage::fit(Size::new(10.0, 10.0), Size::ZERO).is_none());
        assert!(Stage::fit(Size::new(f64::NAN, 10.0), Size::new(1.0, 1.0)).is_none());
    }
}
