//! Entity simulation
//!
//! Everything that moves or collides lives here:
//! - Fixed timestep only; `dt` comes from the host's frame loop
//! - Collision queries are read-only and return their result
//! - No rendering or platform dependencies

pub mod collision;
pub mod contact;
pub mod entity;
pub mod shape;
pub mod sprite;
pub mod tick;

pub use collision::{aabb_aabb, aabb_circle, circle_circle, obb_circle, obb_obb, overlaps};
pub use contact::{CollidedPair, ShapeHit, entity_collision, first_overlap, shapes_collision};
pub use entity::Entity;
pub use shape::{CapsuleParts, Primitive, Rect, Shape, ShapeId, ShapeKind};
pub use sprite::{AttachedShape, EntityTag, Sprite, SpriteAnimation};
pub use tick::tick;
