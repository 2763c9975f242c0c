//! The display pass: every visible item instance with its transform.

use serde::{Deserialize, Serialize};

use crate::context::MaterialContext;
use crate::error::PlacementError;
use crate::location::{Location, MaterialType};
use crate::transform::{Pose, TransformOp, css_transform};

/// One rendered instance of an item (stacks render one instance per piece).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayedItem {
    pub kind: MaterialType,
    pub index: usize,
    pub display_index: usize,
    pub ops: Vec<TransformOp>,
}

impl DisplayedItem {
    pub fn pose(&self) -> Pose {
        Pose::from_ops(&self.ops)
    }

    /// CSS `transform` value of the instance.
    pub fn css(&self) -> String {
        css_transform(&self.ops)
    }
}

/// A static location of a zone with its transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayedLocation {
    pub location: Location,
    pub ops: Vec<TransformOp>,
}

/// Transform of instance `display_index` of item `kind#index`.
pub fn item_transform(
    ctx: &MaterialContext<'_>,
    kind: MaterialType,
    index: usize,
    display_index: usize,
) -> Result<Vec<TransformOp>, PlacementError> {
    let item_ctx = ctx.item(kind, index, display_index);
    let item = item_ctx.stored_item()?;
    let locator = ctx
        .locators
        .get(item.location.kind)
        .ok_or(PlacementError::UnregisteredLocator(item.location.kind))?;
    locator.place_item(item, &item_ctx)
}

/// Reduced transform of an item instance.
pub fn item_pose(
    ctx: &MaterialContext<'_>,
    kind: MaterialType,
    index: usize,
    display_index: usize,
) -> Result<Pose, PlacementError> {
    item_transform(ctx, kind, index, display_index).map(|ops| Pose::from_ops(&ops))
}

/// Every displayed instance of every item.
///
/// Items without a locator are left out with a warning; so are items whose
/// placement fails (broken or cyclic parent chains). Hidden instances are
/// skipped.
pub fn displayed_items(ctx: &MaterialContext<'_>) -> Vec<DisplayedItem> {
    let mut displayed = Vec::new();
    for (&kind, items) in &ctx.snapshot.items {
        for (index, item) in items.iter().enumerate() {
            let Some(locator) = ctx.locators.get(item.location.kind) else {
                tracing::warn!(
                    kind,
                    index,
                    location_type = item.location.kind,
                    "[placement] no locator registered, item not displayed"
                );
                continue;
            };
            for display_index in 0..item.quantity() as usize {
                let item_ctx = ctx.item(kind, index, display_index);
                if locator.hide(item, &item_ctx) {
                    continue;
                }
                match locator.place_item(item, &item_ctx) {
                    Ok(ops) => displayed.push(DisplayedItem {
                        kind,
                        index,
                        display_index,
                        ops,
                    }),
                    Err(err) => {
                        tracing::warn!(kind, index, error = %err, "[placement] item not displayed");
                        break;
                    }
                }
            }
        }
    }
    displayed
}

/// Static locations of every registered locator.
pub fn displayed_locations(ctx: &MaterialContext<'_>) -> Vec<DisplayedLocation> {
    let mut displayed = Vec::new();
    for (location_type, locator) in ctx.locators.iter() {
        for location in locator.locations(ctx) {
            match locator.place_location(&location, ctx) {
                Ok(ops) => displayed.push(DisplayedLocation { location, ops }),
                Err(err) => {
                    tracing::warn!(location_type, error = %err, "[placement] location not displayed");
                }
            }
        }
    }
    displayed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::{
        ListLocator, Locator, LocatorBase, LocatorRegistry, LocatorSetup, PlaceholderLocator,
    };
    use crate::location::MaterialItem;
    use crate::test_utils::Fixture;
    use crate::transform::{Coordinates, PartialCoordinates};

    const COIN: u32 = 1;
    const CARD: u32 = 2;
    const BANK: u32 = 10;
    const STOCK: u32 = 11;
    const NOWHERE: u32 = 12;
    const SLOTS: u32 = 13;

    #[derive(Debug, Default)]
    struct Slots {
        base: LocatorBase,
    }

    impl Locator for Slots {
        fn base(&self) -> &LocatorBase {
            &self.base
        }

        fn locations(&self, _ctx: &MaterialContext<'_>) -> Vec<Location> {
            (0..3).map(|x| Location::new(SLOTS).x(x)).collect()
        }

        fn location_coordinates(
            &self,
            location: &Location,
            _ctx: &MaterialContext<'_>,
        ) -> Result<Coordinates, PlacementError> {
            Ok(Coordinates::xy(location.x.unwrap_or(0) as f32 * 5.0, 0.0))
        }
    }

    #[test]
    fn test_stacks_expand_and_unregistered_items_are_skipped() {
        let mut fixture = Fixture::new();
        fixture.locators = LocatorRegistry::new()
            .with(BANK, ListLocator::new(PartialCoordinates::x(1.0)).limited(4))
            .with(STOCK, PlaceholderLocator::new());
        fixture.snapshot.push(COIN, MaterialItem::new(Location::new(BANK)).with_quantity(3));
        fixture.snapshot.push(COIN, MaterialItem::new(Location::new(BANK)).with_quantity(2));
        fixture.snapshot.push(COIN, MaterialItem::new(Location::new(NOWHERE)));
        fixture.snapshot.push(CARD, MaterialItem::new(Location::new(STOCK)));

        let displayed = displayed_items(&fixture.context());
        let keys: Vec<(u32, usize, usize)> = displayed
            .iter()
            .map(|d| (d.kind, d.index, d.display_index))
            .collect();
        // 5 coins, limit 4; the placeholder card is hidden
        assert_eq!(keys, vec![(COIN, 0, 0), (COIN, 0, 1), (COIN, 0, 2), (COIN, 1, 0)]);
        assert!((displayed[0].pose().translation.x + 2.0).abs() < 1e-4);
        assert!((displayed[3].pose().translation.x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_explicit_lookup_reports_unregistered_locator() {
        let mut fixture = Fixture::new();
        fixture.snapshot.push(COIN, MaterialItem::new(Location::new(NOWHERE)));
        let result = item_transform(&fixture.context(), COIN, 0, 0);
        assert_eq!(result, Err(PlacementError::UnregisteredLocator(NOWHERE)));
        let missing = item_transform(&fixture.context(), COIN, 4, 0);
        assert_eq!(missing, Err(PlacementError::MissingItem { kind: COIN, index: 4 }));
    }

    #[test]
    fn test_static_locations_are_placed() {
        let mut fixture = Fixture::new();
        fixture.locators = LocatorRegistry::new().with(SLOTS, Slots::default());
        let locations = displayed_locations(&fixture.context());
        assert_eq!(locations.len(), 3);
        assert_eq!(
            css_transform(&locations[2].ops),
            "translate3d(10em, 0em, 0em)"
        );
    }

    #[test]
    fn test_css_of_displayed_item() {
        let mut fixture = Fixture::new();
        fixture.locators = LocatorRegistry::new().with(
            BANK,
            ListLocator::new(PartialCoordinates::x(1.0)).rotated(90.0),
        );
        fixture.snapshot.push(COIN, MaterialItem::new(Location::new(BANK)));
        let displayed = displayed_items(&fixture.context());
        assert_eq!(displayed[0].css(), "translate3d(0em, 0em, 0em) rotateZ(90deg)");
    }
}
