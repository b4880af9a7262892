//! Barrier cage around the round origin.
//!
//! Four vertical walls, open at the top and bottom. The geometry is a pure
//! function of the origin block, so building, clearing and rebuilding at
//! the same origin always touches the same four regions.

use std::fmt;

use tracing::debug;

use crate::geometry::{BlockPos, Position, Region};
use crate::host::{Block, WorldEdit};

use super::rules::{CAGE_HALF_EXTENT, CAGE_HEIGHT};

/// Cage wall faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    /// Lowest z
    North,
    /// Highest z
    South,
    /// Lowest x
    West,
    /// Highest x
    East,
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::North => write!(f, "north"),
            Self::South => write!(f, "south"),
            Self::West => write!(f, "west"),
            Self::East => write!(f, "east"),
        }
    }
}

/// A cage anchored at one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cage {
    anchor: BlockPos,
}

impl Cage {
    /// Cage around the block containing `origin`.
    #[must_use]
    pub fn around(origin: &Position) -> Self {
        Self {
            anchor: origin.block(),
        }
    }

    /// Block the cage is centred on.
    #[must_use]
    pub const fn anchor(&self) -> BlockPos {
        self.anchor
    }

    /// The four wall regions.
    #[must_use]
    pub fn walls(&self) -> [(Face, Region); 4] {
        let a = self.anchor;
        let (min_x, max_x) = (a.x - CAGE_HALF_EXTENT, a.x + CAGE_HALF_EXTENT);
        let (min_y, max_y) = (a.y, a.y + CAGE_HEIGHT);
        let (min_z, max_z) = (a.z - CAGE_HALF_EXTENT, a.z + CAGE_HALF_EXTENT);

        [
            (
                Face::North,
                Region::new(
                    BlockPos::new(min_x, min_y, min_z),
                    BlockPos::new(max_x, max_y, min_z),
                ),
            ),
            (
                Face::South,
                Region::new(
                    BlockPos::new(min_x, min_y, max_z),
                    BlockPos::new(max_x, max_y, max_z),
                ),
            ),
            (
                Face::West,
                Region::new(
                    BlockPos::new(min_x, min_y, min_z),
                    BlockPos::new(min_x, max_y, max_z),
                ),
            ),
            (
                Face::East,
                Region::new(
                    BlockPos::new(max_x, min_y, min_z),
                    BlockPos::new(max_x, max_y, max_z),
                ),
            ),
        ]
    }

    /// Issues four barrier fills. Does not wait for them to land.
    pub fn build<W: WorldEdit + ?Sized>(&self, world: &mut W) {
        debug!(anchor = %self.anchor, "building cage");
        self.fill(world, Block::Barrier);
    }

    /// Issues four air fills over the same regions.
    pub fn clear<W: WorldEdit + ?Sized>(&self, world: &mut W) {
        debug!(anchor = %self.anchor, "clearing cage");
        self.fill(world, Block::Air);
    }

    fn fill<W: WorldEdit + ?Sized>(&self, world: &mut W, block: Block) {
        for (_, region) in self.walls() {
            world.fill(region, block);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InMemoryHost;
    use proptest::prelude::*;

    #[test]
    fn test_walls_around_origin() {
        let cage = Cage::around(&Position::new(0.5, 64.0, 0.5));
        let walls = cage.walls();
        assert_eq!(
            walls[0].1,
            Region::new(BlockPos::new(-2, 64, -2), BlockPos::new(2, 67, -2))
        );
        assert_eq!(
            walls[1].1,
            Region::new(BlockPos::new(-2, 64, 2), BlockPos::new(2, 67, 2))
        );
        assert_eq!(
            walls[2].1,
            Region::new(BlockPos::new(-2, 64, -2), BlockPos::new(-2, 67, 2))
        );
        assert_eq!(
            walls[3].1,
            Region::new(BlockPos::new(2, 64, -2), BlockPos::new(2, 67, 2))
        );
    }

    #[test]
    fn test_anchor_cell_is_inside_walls() {
        let cage = Cage::around(&Position::new(10.2, 70.0, -4.9));
        let inside = cage.anchor();
        for (face, region) in cage.walls() {
            assert!(!region.contains(inside), "{face} wall covers the anchor");
        }
    }

    #[test]
    fn test_build_and_clear_issue_four_fills_each() {
        let mut host = InMemoryHost::new();
        let cage = Cage::around(&Position::new(0.0, 64.0, 0.0));
        cage.build(&mut host);
        cage.clear(&mut host);
        let fills = host.fills();
        assert_eq!(fills.len(), 8);
        assert!(fills[..4].iter().all(|f| f.block == Block::Barrier));
        assert!(fills[4..].iter().all(|f| f.block == Block::Air));
        for i in 0..4 {
            assert_eq!(fills[i].region, fills[i + 4].region);
        }
    }

    #[test]
    fn test_clear_then_rebuild_is_identical() {
        let mut host = InMemoryHost::new();
        let cage = Cage::around(&Position::new(3.0, 80.0, 3.0));
        cage.clear(&mut host);
        cage.build(&mut host);
        let fills = host.fills();
        let cleared: Vec<Region> = fills[..4].iter().map(|f| f.region).collect();
        let rebuilt: Vec<Region> = fills[4..].iter().map(|f| f.region).collect();
        assert_eq!(cleared, rebuilt);
    }

    proptest! {
        #[test]
        fn prop_walls_depend_only_on_origin_block(
            x in -10_000i32..10_000, y in -64i32..300, z in -10_000i32..10_000,
            fx in 0.0f64..0.999, fz in 0.0f64..0.999,
        ) {
            let a = Cage::around(&Position::new(f64::from(x), f64::from(y), f64::from(z)));
            let b = Cage::around(&Position::new(f64::from(x) + fx, f64::from(y), f64::from(z) + fz));
            prop_assert_eq!(a.walls(), b.walls());
        }
    }
}
