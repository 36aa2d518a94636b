use formatbar_traits::{Point, Size};

/// Where the toolbar goes relative to the selection anchor.
///
/// The toolbar sits above the anchor when there is room for it, below otherwise, and is
/// centred horizontally on the anchor unless that would push it past the left edge.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementPolicy {
    /// Minimum distance kept from the top and left edges of the viewport.
    pub margin: f64,
    /// How far above the anchor the toolbar's top edge goes.
    pub offset_above: f64,
    /// How far below the anchor the toolbar's top edge goes when there is no room above.
    pub offset_below: f64,
    /// Distance from the toolbar's left edge to its horizontal centre.
    pub center_offset: f64,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self::for_toolbar_size(Size::new(100.0, 30.0))
    }
}

impl PlacementPolicy {
    /// Gap between the toolbar's bottom edge and the anchor when placed above.
    pub const GAP_ABOVE: f64 = 25.0;
    /// Offset of the toolbar's top edge from the anchor when placed below, clearing the
    /// selected line.
    pub const OFFSET_BELOW: f64 = 25.0;
    pub const MARGIN: f64 = 5.0;

    /// A policy for a toolbar of the given rendered size.
    pub fn for_toolbar_size(size: Size) -> Self {
        Self {
            margin: Self::MARGIN,
            offset_above: size.height + Self::GAP_ABOVE,
            offset_below: Self::OFFSET_BELOW,
            center_offset: size.width / 2.0,
        }
    }

    /// The toolbar's top-left corner for a selection anchored at `anchor`.
    pub fn place(&self, anchor: Point) -> Point {
        let top = if anchor.y > self.offset_above + self.margin {
            anchor.y - self.offset_above
        } else {
            anchor.y + self.offset_below
        };
        let left = if anchor.x < self.center_offset + self.margin {
            self.margin
        } else {
            anchor.x - self.center_offset
        };
        Point::new(left, top)
    }

    pub(crate) fn is_valid(&self) -> bool {
        [
            self.margin,
            self.offset_above,
            self.offset_below,
            self.center_offset,
        ]
        .iter()
        .all(|value| value.is_finite() && *value >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds() {
        let policy = PlacementPolicy::default();
        // room above: y > 60
        assert_eq!(policy.place(Point::new(100.0, 61.0)).y, 6.0);
        assert_eq!(policy.place(Point::new(100.0, 60.0)).y, 85.0);
        assert_eq!(policy.place(Point::new(100.0, 0.0)).y, 25.0);
        // room on the left: x >= 55
        assert_eq!(policy.place(Point::new(54.9, 100.0)).x, 5.0);
        assert_eq!(policy.place(Point::new(55.0, 100.0)).x, 5.0);
        assert_eq!(policy.place(Point::new(56.0, 100.0)).x, 6.0);
    }

    #[test]
    fn selection_in_the_middle_of_the_page() {
        let placed = PlacementPolicy::default().place(Point::new(100.0, 100.0));
        assert_eq!(placed, Point::new(50.0, 45.0));
    }

    #[test]
    fn selection_near_the_top_left_corner() {
        let placed = PlacementPolicy::default().place(Point::new(30.0, 40.0));
        assert_eq!(placed, Point::new(5.0, 65.0));
    }

    #[test]
    fn measured_toolbar_shifts_the_thresholds() {
        let policy = PlacementPolicy::for_toolbar_size(Size::new(200.0, 40.0));
        assert_eq!(policy.place(Point::new(300.0, 71.0)), Point::new(200.0, 6.0));
        assert_eq!(policy.place(Point::new(104.0, 70.0)), Point::new(5.0, 95.0));
        assert!(policy.is_valid());
    }
}
