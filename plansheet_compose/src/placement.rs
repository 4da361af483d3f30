// Copyright 2025 the Plansheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Rect, Size};
use plansheet_catalog::Transform;

/// How one layer image sits over the base image, in base pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayerPlacement {
    /// The layer's registration applies: the map from the layer's own pixels
    /// into base pixels.
    Registered(Affine),
    /// The registration was authored against another base, so the layer is
    /// stretched over this rectangle instead.
    Stretched(Rect),
}

impl LayerPlacement {
    /// Places a layer registered by `transform` over `base_image`.
    ///
    /// A missing transform is the identity. A transform naming a different
    /// reference image is not applied at all: the layer covers `base_size`
    /// exactly.
    #[must_use]
    pub fn resolve(transform: Option<&Transform>, base_image: &str, base_size: Size) -> Self {
        let transform = transform.unwrap_or(&Transform::IDENTITY);
        if transform.registered_against(base_image) {
            Self::Registered(transform.to_affine())
        } else {
            Self::Stretched(base_size.to_rect())
        }
    }

    /// Returns `true` for [`LayerPlacement::Registered`].
    #[must_use]
    pub fn is_registered(&self) -> bool {
        matches!(self, Self::Registered(_))
    }

    /// The map from the layer's own pixels into base pixels, given the layer
    /// image's natural size.
    ///
    /// Stretching needs that size; an unmeasured layer yields `None`.
    #[must_use]
    pub fn layer_to_base(&self, natural: Size) -> Option<Affine> {
        match *self {
            Self::Registered(affine) => Some(affine),
            Self::Stretched(rect) => {
                if !(natural.width > 0.0 && natural.height > 0.0) {
                    return None;
                }
                Some(
                    Affine::translate(rect.origin().to_vec2())
                        * Affine::scale_non_uniform(
                            rect.width() / natural.width,
                            rect.height() / natural.height,
                        ),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;

    use super::*;

    #[test]
    fn mismatched_reference_is_stretched() {
        let t = Transform::new(10.0, 20.0, 2.0, 0.0).relative_to("X.png");
        let placement = LayerPlacement::resolve(Some(&t), "Y.png", Size::new(640.0, 480.0));
        assert_eq!(
            placement,
            LayerPlacement::Stretched(Rect::new(0.0, 0.0, 640.0, 480.0))
        );
        let affine = placement.layer_to_base(Size::new(320.0, 240.0)).unwrap();
        assert_eq!(affine * Point::new(320.0, 240.0), Point::new(640.0, 480.0));
    }

    #[test]
    fn matching_reference_is_registered() {
        let t = Transform::new(10.0, 20.0, 2.0, 0.0).relative_to("plans/Y.png");
        let placement = LayerPlacement::resolve(Some(&t), "Y.png", Size::new(640.0, 480.0));
        let affine = placement.layer_to_base(Size::ZERO).unwrap();
        assert_eq!(affine * Point::new(5.0, 5.0), Point::new(20.0, 30.0));
    }

    #[test]
    fn missing_transform_is_identity() {
        let placement = LayerPlacement::resolve(None, "Y.png", Size::new(1.0, 1.0));
        assert_eq!(placement, LayerPlacement::Registered(Affine::IDENTITY));
    }

    #[test]
    fn rotation_turns_about_the_corner() {
        let t = Transform::new(100.0, 0.0, 1.0, core::f64::consts::FRAC_PI_2);
        let affine = LayerPlacement::resolve(Some(&t), "Y.png", Size::new(1.0, 1.0))
            .layer_to_base(Size::ZERO)
            .unwrap();
        let p = affine * Point::new(10.0, 0.0);
        assert!((p - Point::new(100.0, 10.0)).hypot() < 1e-9);
    }
}
