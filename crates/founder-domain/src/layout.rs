//! Office layout grid with non-overlapping rectangular placements.
//!
//! The grid is sparse: only occupied cells are stored, each mapped to the
//! placement covering it. A placement succeeds only when its whole
//! footprint is inside the grid and free; removal clears every cell it
//! covered.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A cell coordinate, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl GridPosition {
    /// Create a position.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Size of a placed item in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    /// Columns covered.
    pub width: u32,
    /// Rows covered.
    pub height: u32,
}

impl Footprint {
    /// Create a footprint.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Identifier of a placement, unique within its layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlacementId(pub u64);

/// A decoration item on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Placement id.
    pub id: PlacementId,
    /// Item identifier supplied by the content layer.
    pub item: String,
    /// Top-left cell.
    pub origin: GridPosition,
    /// Cells covered from the origin.
    pub footprint: Footprint,
}

/// Persisted form of an [`OfficeLayout`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    /// Every placement, in id order.
    pub placements: Vec<Placement>,
}

/// Grid of placed items for one office.
#[derive(Debug, Clone)]
pub struct OfficeLayout {
    width: u32,
    height: u32,
    placements: BTreeMap<PlacementId, Placement>,
    cells: BTreeMap<GridPosition, PlacementId>,
    next_id: u64,
}

impl OfficeLayout {
    /// Create an empty `width` x `height` grid.
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            placements: BTreeMap::new(),
            cells: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Grid size as `(width, height)`.
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether `pos` lies inside the grid.
    pub const fn in_bounds(&self, pos: GridPosition) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Whether `pos` is inside the grid and unoccupied.
    pub fn is_free(&self, pos: GridPosition) -> bool {
        self.in_bounds(pos) && !self.cells.contains_key(&pos)
    }

    /// Whether a `footprint`-sized item fits at `origin`.
    pub fn can_place(&self, origin: GridPosition, footprint: Footprint) -> bool {
        self.covered_cells(origin, footprint)
            .is_some_and(|cells| cells.iter().all(|cell| !self.cells.contains_key(cell)))
    }

    /// Cells a placement would cover, or `None` if the footprint is empty
    /// or reaches past the grid edge. Bounds are checked before any cell
    /// is enumerated.
    fn covered_cells(&self, origin: GridPosition, footprint: Footprint) -> Option<Vec<GridPosition>> {
        if footprint.width == 0 || footprint.height == 0 {
            return None;
        }
        let right = origin.x.checked_add(footprint.width)?;
        let bottom = origin.y.checked_add(footprint.height)?;
        if right > self.width || bottom > self.height {
            return None;
        }
        Some(
            (origin.y..bottom)
                .flat_map(|y| (origin.x..right).map(move |x| GridPosition::new(x, y)))
                .collect(),
        )
    }

    /// Place `item` at `origin`. Returns the new placement's id, or `None`
    /// if any covered cell is out of bounds or occupied.
    pub fn try_place(
        &mut self,
        item: impl Into<String>,
        origin: GridPosition,
        footprint: Footprint,
    ) -> Option<PlacementId> {
        let id = PlacementId(self.next_id);
        let placement = Placement {
            id,
            item: item.into(),
            origin,
            footprint,
        };
        self.insert(placement)?;
        self.next_id = self.next_id.saturating_add(1);
        Some(id)
    }

    /// Remove a placement by id, clearing every cell it covered.
    pub fn try_remove(&mut self, id: PlacementId) -> Option<Placement> {
        let placement = self.placements.remove(&id)?;
        self.cells.retain(|_, occupant| *occupant != id);
        Some(placement)
    }

    /// Remove whatever placement covers `pos`.
    pub fn remove_at(&mut self, pos: GridPosition) -> Option<Placement> {
        let id = *self.cells.get(&pos)?;
        self.try_remove(id)
    }

    /// The placement covering `pos`, if any.
    pub fn occupant(&self, pos: GridPosition) -> Option<&Placement> {
        self.cells.get(&pos).and_then(|id| self.placements.get(id))
    }

    /// Every placement, in id order.
    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.placements.values()
    }

    /// Number of occupied cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Capture the layout for persistence.
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            placements: self.placements.values().cloned().collect(),
        }
    }

    /// Rebuild a layout of the given size. Placements that no longer fit
    /// are dropped and returned.
    pub fn from_snapshot(width: u32, height: u32, snapshot: &LayoutSnapshot) -> (Self, Vec<Placement>) {
        let mut layout = Self::new(width, height);
        let mut rejected = Vec::new();
        for placement in &snapshot.placements {
            layout.next_id = layout.next_id.max(placement.id.0.saturating_add(1));
            if layout.placements.contains_key(&placement.id) || layout.insert(placement.clone()).is_none() {
                rejected.push(placement.clone());
            }
        }
        (layout, rejected)
    }

    fn insert(&mut self, placement: Placement) -> Option<()> {
        let cells = self.covered_cells(placement.origin, placement.footprint)?;
        if cells.iter().any(|cell| self.cells.contains_key(cell)) {
            return None;
        }
        for cell in cells {
            self.cells.insert(cell, placement.id);
        }
        self.placements.insert(placement.id, placement);
        Some(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn placement_occupies_whole_footprint() {
        let mut layout = OfficeLayout::new(10, 10);
        let id = layout
            .try_place("desk", GridPosition::new(2, 3), Footprint::new(2, 3))
            .unwrap();
        assert_eq!(layout.occupied_cells(), 6);
        assert_eq!(layout.occupant(GridPosition::new(3, 5)).map(|p| p.id), Some(id));
        assert!(layout.is_free(GridPosition::new(4, 3)));
    }

    #[test]
    fn overlapping_placement_rejected() {
        let mut layout = OfficeLayout::new(10, 10);
        layout
            .try_place("desk", GridPosition::new(0, 0), Footprint::new(2, 2))
            .unwrap();
        assert!(layout
            .try_place("plant", GridPosition::new(1, 1), Footprint::new(1, 1))
            .is_none());
        assert_eq!(layout.occupied_cells(), 4);
    }

    #[test]
    fn out_of_bounds_placement_rejected() {
        let mut layout = OfficeLayout::new(5, 5);
        assert!(layout
            .try_place("sofa", GridPosition::new(4, 0), Footprint::new(2, 1))
            .is_none());
        assert!(layout
            .try_place("sofa", GridPosition::new(u32::MAX, 0), Footprint::new(2, 1))
            .is_none());
        assert!(layout
            .try_place("nothing", GridPosition::new(0, 0), Footprint::new(0, 1))
            .is_none());
        assert_eq!(layout.occupied_cells(), 0);
    }

    #[test]
    fn oversized_footprint_rejected_without_enumerating() {
        let mut layout = OfficeLayout::new(10, 10);
        assert!(!layout.can_place(GridPosition::new(0, 0), Footprint::new(u32::MAX, u32::MAX)));
        assert!(layout
            .try_place("warehouse", GridPosition::new(0, 0), Footprint::new(8_000, 8_000))
            .is_none());
        assert!(layout
            .try_place("hallway", GridPosition::new(0, 9), Footprint::new(1, 2))
            .is_none());
        assert!(layout.can_place(GridPosition::new(0, 0), Footprint::new(10, 10)));
        assert_eq!(layout.occupied_cells(), 0);
    }

    #[test]
    fn removal_clears_every_cell() {
        let mut layout = OfficeLayout::new(10, 10);
        layout
            .try_place("desk", GridPosition::new(0, 0), Footprint::new(3, 1))
            .unwrap();
        let removed = layout.remove_at(GridPosition::new(2, 0)).unwrap();
        assert_eq!(removed.item, "desk");
        assert_eq!(layout.occupied_cells(), 0);
        assert!(layout
            .try_place("plant", GridPosition::new(1, 0), Footprint::new(1, 1))
            .is_some());
    }

    #[test]
    fn snapshot_drops_placements_that_no_longer_fit() {
        let mut layout = OfficeLayout::new(10, 10);
        layout
            .try_place("desk", GridPosition::new(0, 0), Footprint::new(1, 1))
            .unwrap();
        layout
            .try_place("sofa", GridPosition::new(8, 8), Footprint::new(2, 2))
            .unwrap();

        let (restored, rejected) = OfficeLayout::from_snapshot(6, 6, &layout.snapshot());
        assert_eq!(restored.placements().count(), 1);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].item, "sofa");

        let mut restored = restored;
        let id = restored
            .try_place("lamp", GridPosition::new(3, 3), Footprint::new(1, 1))
            .unwrap();
        assert_eq!(id, PlacementId(3));
    }
}
