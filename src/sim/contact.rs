//! Entity-level collision queries
//!
//! Moves each entity's shapes from anchor-relative offsets into world space
//! and tests every active shape of one side against every active shape of
//! the other, stopping at the first overlap.

use super::collision::overlaps;
use super::entity::Entity;
use super::shape::{Primitive, ShapeId};

/// One side of a collision
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeHit {
    /// Position of the shape in its owner's shape set
    pub index: usize,
    pub id: ShapeId,
    /// The shape as it was tested, in world space
    pub primitive: Primitive,
}

/// The first pair of shapes found overlapping
#[derive(Debug, Clone, PartialEq)]
pub struct CollidedPair {
    pub first: ShapeHit,
    pub second: ShapeHit,
}

fn active(shapes: &[Primitive]) -> impl Iterator<Item = (usize, &Primitive)> {
    shapes.iter().enumerate().filter(|(_, p)| p.is_active())
}

/// First overlapping pair between two world-space shape sets, in insertion
/// order of `a` then `b`. Inactive shapes are skipped on both sides.
pub fn first_overlap(a: &[Primitive], b: &[Primitive]) -> Option<CollidedPair> {
    let active_b: Vec<(usize, &Primitive)> = active(b).collect();

    for (i, pa) in active(a) {
        for &(j, pb) in &active_b {
            if overlaps(pa, pb) {
                return Some(CollidedPair {
                    first: ShapeHit {
                        index: i,
                        id: pa.id(),
                        primitive: pa.clone(),
                    },
                    second: ShapeHit {
                        index: j,
                        id: pb.id(),
                        primitive: pb.clone(),
                    },
                });
            }
        }
    }
    None
}

/// Collision between two entities, either of which may be missing
pub fn entity_collision(a: Option<&Entity>, b: Option<&Entity>) -> Option<CollidedPair> {
    let (a, b) = (a?, b?);
    let hit = first_overlap(&a.offset_collision_bodies(), &b.offset_collision_bodies());
    if let Some(pair) = &hit {
        log::debug!(
            "'{}' {} #{} hit '{}' {} #{}",
            a.name(),
            pair.first.primitive.kind().as_str(),
            pair.first.index,
            b.name(),
            pair.second.primitive.kind().as_str(),
            pair.second.index,
        );
    }
    hit
}

/// Collision between two bare shape sets
///
/// Each set is handed to a throwaway entity so the same offset and test path
/// is used as for real entities. A default entity's anchor is the origin, so
/// the shapes are tested where they are.
pub fn shapes_collision(a: &[Primitive], b: &[Primitive]) -> Option<CollidedPair> {
    let mut holder_a = Entity::default();
    let mut holder_b = Entity::default();
    holder_a.set_collision_bodies(a.to_vec());
    holder_b.set_collision_bodies(b.to_vec());
    entity_collision(Some(&holder_a), Some(&holder_b))
}

impl Entity {
    /// Collision between this entity and `other`
    pub fn collides_with(&self, other: &Entity) -> Option<CollidedPair> {
        entity_collision(Some(self), Some(other))
    }
}
