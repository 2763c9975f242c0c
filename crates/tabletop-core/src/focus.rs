//! Focus geometry: the area covered by a set of items and locations, and
//! the zoom that fits it into a viewport.

use serde::{Deserialize, Serialize};

use crate::context::MaterialContext;
use crate::error::PlacementError;
use crate::location::{Location, MaterialType};
use crate::material::Size;
use crate::placement::{displayed_items, displayed_locations, item_pose};
use crate::settings::EngineSettings;
use crate::transform::{Coordinates, Pose};

/// Axis-aligned bounds on the table plane, em.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocusBounds {
    pub min: Coordinates,
    pub max: Coordinates,
}

/// Zoom factor and table point to center the viewport on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zoom {
    pub zoom: f32,
    pub center: Coordinates,
}

impl FocusBounds {
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Coordinates {
        self.min.lerp(self.max, 0.5)
    }

    /// Grows the bounds by `margin` on every side.
    pub fn expand(self, margin: f32) -> Self {
        let margin = Coordinates::xy(margin, margin);
        Self {
            min: self.min.sub(margin),
            max: self.max.add(margin),
        }
    }

    fn union(self, other: FocusBounds) -> Self {
        Self {
            min: Coordinates::xy(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Coordinates::xy(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Bounds of a `size` rectangle centered on `pose`, rotated by its Z angle.
    pub fn of_pose(pose: &Pose, size: Option<Size>) -> Self {
        let (half_w, half_h) = size.map_or((0.0, 0.0), |s| {
            (s.width * pose.scale / 2.0, s.height * pose.scale / 2.0)
        });
        let (sin, cos) = pose.rotate_z.to_radians().sin_cos();
        let extent_x = half_w * cos.abs() + half_h * sin.abs();
        let extent_y = half_w * sin.abs() + half_h * cos.abs();
        let center = pose.translation;
        Self {
            min: Coordinates::xy(center.x - extent_x, center.y - extent_y),
            max: Coordinates::xy(center.x + extent_x, center.y + extent_y),
        }
    }

    /// Zoom fitting the bounds into a `viewport` measured in em at zoom 1.
    ///
    /// Empty extents never limit the zoom; the result stays within the
    /// settings' zoom range.
    pub fn fit_zoom(&self, viewport: Size, settings: &EngineSettings) -> Zoom {
        let fit = |available: f32, extent: f32| {
            if extent > 0.0 {
                available / extent
            } else {
                f32::INFINITY
            }
        };
        let zoom = fit(viewport.width, self.width()).min(fit(viewport.height, self.height()));
        let zoom = if zoom.is_finite() {
            zoom.clamp(settings.min_zoom, settings.max_zoom)
        } else {
            settings.max_zoom
        };
        Zoom {
            zoom,
            center: self.center(),
        }
    }
}

/// Collects items and locations to focus on.
#[derive(Debug, Clone, Default)]
pub struct Focus {
    margin: f32,
    bounds: Option<FocusBounds>,
}

impl Focus {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            margin: settings.focus_margin,
            bounds: None,
        }
    }

    /// Everything the display pass shows.
    pub fn displayed(ctx: &MaterialContext<'_>, settings: &EngineSettings) -> Self {
        let mut focus = Self::new(settings);
        for item in displayed_items(ctx) {
            focus.include(FocusBounds::of_pose(&item.pose(), ctx.materials.size(item.kind)));
        }
        for location in displayed_locations(ctx) {
            let size = ctx.materials.location_size(location.location.kind);
            focus.include(FocusBounds::of_pose(&Pose::from_ops(&location.ops), size));
        }
        focus
    }

    pub fn include(&mut self, bounds: FocusBounds) {
        self.bounds = Some(self.bounds.map_or(bounds, |current| current.union(bounds)));
    }

    /// Adds every piece of item `kind#index`.
    pub fn item(
        mut self,
        ctx: &MaterialContext<'_>,
        kind: MaterialType,
        index: usize,
    ) -> Result<Self, PlacementError> {
        let item = ctx
            .snapshot
            .item(kind, index)
            .ok_or(PlacementError::MissingItem { kind, index })?;
        let size = ctx.materials.size(kind);
        for display_index in 0..item.quantity() as usize {
            let pose = item_pose(ctx, kind, index, display_index)?;
            self.include(FocusBounds::of_pose(&pose, size));
        }
        Ok(self)
    }

    pub fn location(
        mut self,
        ctx: &MaterialContext<'_>,
        location: &Location,
    ) -> Result<Self, PlacementError> {
        let pose = ctx.locators.location_pose(location, ctx)?;
        let size = ctx.materials.location_size(location.kind);
        self.include(FocusBounds::of_pose(&pose, size));
        Ok(self)
    }

    /// Collected bounds with the margin, `None` when nothing was added.
    pub fn bounds(&self) -> Option<FocusBounds> {
        self.bounds.map(|bounds| bounds.expand(self.margin))
    }

    pub fn fit_zoom(&self, viewport: Size, settings: &EngineSettings) -> Option<Zoom> {
        let zoom = self.bounds()?.fit_zoom(viewport, settings);
        tracing::debug!(zoom = zoom.zoom, x = zoom.center.x, y = zoom.center.y, "[focus] fit");
        Some(zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::MaterialItem;
    use crate::locator::{ListLocator, LocatorSetup};
    use crate::material::{MaterialDescription, SizeSpec};
    use crate::test_utils::Fixture;
    use crate::transform::PartialCoordinates;

    const EPS: f32 = 1e-4;

    fn settings() -> EngineSettings {
        EngineSettings {
            focus_margin: 1.0,
            ..EngineSettings::default()
        }
    }

    #[test]
    fn test_rotated_bounds() {
        let pose = Pose {
            rotate_z: 90.0,
            ..Pose::IDENTITY
        };
        let bounds = FocusBounds::of_pose(&pose, Some(Size { width: 6.0, height: 2.0 }));
        assert!((bounds.width() - 2.0).abs() < EPS);
        assert!((bounds.height() - 6.0).abs() < EPS);
    }

    #[test]
    fn test_focus_on_a_line_of_cards() {
        let mut fixture = Fixture::new();
        fixture.locators.register(
            1,
            ListLocator::new(PartialCoordinates::x(8.0)).at(Coordinates::xy(10.0, 5.0)),
        );
        fixture
            .materials
            .register(7, MaterialDescription::new(SizeSpec::new(6.0, 9.0)))
            .unwrap();
        for _ in 0..3 {
            fixture.snapshot.push(7, MaterialItem::new(Location::new(1)));
        }
        let ctx = fixture.context();
        let focus = Focus::displayed(&ctx, &settings());
        let bounds = focus.bounds().unwrap();
        // centers at x = 2, 10, 18; half width 3, margin 1
        assert!((bounds.min.x + 2.0).abs() < EPS);
        assert!((bounds.max.x - 22.0).abs() < EPS);
        assert!((bounds.height() - 11.0).abs() < EPS);
        assert_eq!(bounds.center(), Coordinates::xy(10.0, 5.0));

        let single = Focus::new(&settings()).item(&ctx, 7, 0).unwrap();
        assert!((single.bounds().unwrap().width() - 8.0).abs() < EPS);
        assert_eq!(
            Focus::new(&settings()).item(&ctx, 7, 5).unwrap_err(),
            PlacementError::MissingItem { kind: 7, index: 5 }
        );
    }

    #[test]
    fn test_fit_zoom_is_clamped() {
        let bounds = FocusBounds {
            min: Coordinates::xy(0.0, 0.0),
            max: Coordinates::xy(20.0, 10.0),
        };
        let zoom = bounds.fit_zoom(Size { width: 40.0, height: 40.0 }, &settings());
        assert!((zoom.zoom - 2.0).abs() < EPS);
        assert_eq!(zoom.center, Coordinates::xy(10.0, 5.0));

        let tiny = bounds.fit_zoom(Size { width: 1.0, height: 1.0 }, &settings());
        assert!((tiny.zoom - settings().min_zoom).abs() < EPS);

        let point = FocusBounds {
            min: Coordinates::ZERO,
            max: Coordinates::ZERO,
        };
        let zoom = point.fit_zoom(Size { width: 10.0, height: 10.0 }, &settings());
        assert!((zoom.zoom - settings().max_zoom).abs() < EPS);
    }

    #[test]
    fn test_empty_focus() {
        let focus = Focus::new(&settings());
        assert!(focus.bounds().is_none());
        assert!(focus.fit_zoom(Size { width: 10.0, height: 10.0 }, &settings()).is_none());
    }
}
