//! Active chunk set
//!
//! The active set is every chunk column whose horizontal distance from
//! the observer's column is at most the streaming radius, crossed with
//! the full vertical extent of the world. It only changes when the
//! observer crosses a column boundary, so recomputation is keyed on the
//! observer's column rather than the raw position.

use std::collections::HashSet;

use crate::world::chunk::ChunkCoord;

/// The set of chunk coordinates that should be resident and meshed
pub struct ActiveRegion {
    radius: i32,
    /// Observer column (y is always 0) the set was last computed for
    center: Option<ChunkCoord>,
    coords: Vec<ChunkCoord>,
    set: HashSet<ChunkCoord>,
}

impl ActiveRegion {
    pub fn new(radius: i32) -> Self {
        Self {
            radius: radius.max(0),
            center: None,
            coords: Vec::new(),
            set: HashSet::new(),
        }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Change the streaming radius. Takes effect on the next update.
    pub fn set_radius(&mut self, radius: i32) {
        self.radius = radius.max(0);
        self.center = None;
    }

    /// Column the set is currently centered on, if it has been computed
    pub fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    /// Recompute the set for the observer's chunk. Returns true when the
    /// set actually changed, which only happens when the observer moved
    /// to a different column (or `force` is set).
    pub fn update(&mut self, observer: ChunkCoord, max_chunk_y: i32, force: bool) -> bool {
        let column = ChunkCoord::new(observer.x, 0, observer.z);
        if !force && self.center == Some(column) {
            return false;
        }

        self.coords.clear();
        self.set.clear();
        let r2 = self.radius * self.radius;
        for dz in -self.radius..=self.radius {
            for dx in -self.radius..=self.radius {
                if dx * dx + dz * dz > r2 {
                    continue;
                }
                for cy in 0..=max_chunk_y {
                    let coord = ChunkCoord::new(column.x + dx, cy, column.z + dz);
                    self.coords.push(coord);
                    self.set.insert(coord);
                }
            }
        }
        self.center = Some(column);
        true
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.set.contains(&coord)
    }

    pub fn iter(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.coords.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_two_column_count() {
        let mut region = ActiveRegion::new(2);
        region.update(ChunkCoord::new(0, 1, 0), 3, false);
        // 13 columns satisfy dx^2 + dz^2 <= 4, each 4 chunks tall
        assert_eq!(region.len(), 13 * 4);
        assert!(region.contains(ChunkCoord::new(0, 0, 0)));
        assert!(region.contains(ChunkCoord::new(2, 3, 0)));
        assert!(region.contains(ChunkCoord::new(0, 2, -2)));
        // Corners of the bounding square are outside the circle
        assert!(!region.contains(ChunkCoord::new(2, 0, 2)));
        assert!(!region.contains(ChunkCoord::new(-2, 0, -2)));
    }

    #[test]
    fn test_radius_zero_is_single_column() {
        let mut region = ActiveRegion::new(0);
        region.update(ChunkCoord::new(5, 0, -3), 2, false);
        assert_eq!(region.len(), 3);
        assert!(region.contains(ChunkCoord::new(5, 1, -3)));
    }

    #[test]
    fn test_update_is_stable_within_a_column() {
        let mut region = ActiveRegion::new(2);
        assert!(region.update(ChunkCoord::new(0, 0, 0), 3, false));
        // Moving vertically keeps the same column
        assert!(!region.update(ChunkCoord::new(0, 3, 0), 3, false));
        assert!(!region.update(ChunkCoord::new(0, 0, 0), 3, false));
        // Crossing a column boundary recomputes
        assert!(region.update(ChunkCoord::new(1, 0, 0), 3, false));
        assert_eq!(region.center(), Some(ChunkCoord::new(1, 0, 0)));
    }

    #[test]
    fn test_force_recomputes() {
        let mut region = ActiveRegion::new(1);
        region.update(ChunkCoord::new(0, 0, 0), 3, false);
        assert!(region.update(ChunkCoord::new(0, 0, 0), 3, true));
    }

    #[test]
    fn test_set_radius_invalidates() {
        let mut region = ActiveRegion::new(1);
        region.update(ChunkCoord::new(0, 0, 0), 0, false);
        assert_eq!(region.len(), 5);
        region.set_radius(2);
        assert!(region.update(ChunkCoord::new(0, 0, 0), 0, false));
        assert_eq!(region.len(), 13);
    }
}
