//! Collision shape primitives
//!
//! Shapes are stored relative to the owning entity's anchor (the bottom-left
//! corner of its sprite). The coordinator translates them into world space
//! before any overlap test runs.

use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec2;
use serde::{Deserialize, Deserializer, Serialize};

use crate::rotate_degrees;

static NEXT_SHAPE_ID: AtomicU64 = AtomicU64::new(1);

/// Stable handle identifying one logical shape.
///
/// Clones of a [`Primitive`] share the handle, so an entity can tell whether a
/// shape it is given is one it already owns. Loading a handle moves the
/// allocator past it, so freshly built shapes never reuse a loaded one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ShapeId(u64);

impl ShapeId {
    pub(crate) fn next() -> Self {
        Self(NEXT_SHAPE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for ShapeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = u64::deserialize(deserializer)?;
        NEXT_SHAPE_ID.fetch_max(id.saturating_add(1), Ordering::Relaxed);
        Ok(Self(id))
    }
}

/// Axis-aligned rectangle given by an origin and a size.
///
/// Whether `origin` is the bottom-left corner or the centre depends on the
/// caller; see [`Rect::from_centre`] and the `use_centre` flag of
/// [`obb_obb`](super::collision::obb_obb).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Corner-anchored rect whose centre is `centre`
    pub fn from_centre(centre: Vec2, size: Vec2) -> Self {
        Self {
            origin: centre - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    #[inline]
    pub fn centre(&self) -> Vec2 {
        self.origin + self.size / 2.0
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }
}

/// Numeric discriminator of each shape variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Aabb,
    Obb,
    Circle,
    Capsule,
}

impl ShapeKind {
    /// Stable numeric code for the variant
    pub fn id(self) -> u8 {
        match self {
            ShapeKind::Aabb => 1,
            ShapeKind::Obb => 2,
            ShapeKind::Circle => 3,
            ShapeKind::Capsule => 5,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(ShapeKind::Aabb),
            2 => Some(ShapeKind::Obb),
            3 => Some(ShapeKind::Circle),
            5 => Some(ShapeKind::Capsule),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Aabb => "aabb",
            ShapeKind::Obb => "obb",
            ShapeKind::Circle => "circle",
            ShapeKind::Capsule => "capsule",
        }
    }
}

/// Shape-specific extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned box; position is the min corner
    Aabb { width: f32, height: f32 },
    /// Oriented box; position is the unrotated corner, rotation (degrees)
    /// is about the box centre
    Obb { width: f32, height: f32, rotation: f32 },
    /// Circle; position is the centre
    Circle { radius: f32 },
    /// Rectangle with semicircular caps at both ends; position is the centre.
    /// `rect_width` is the distance between the two cap centres.
    Capsule { rect_width: f32, radius: f32, rotation: f32 },
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Aabb { .. } => ShapeKind::Aabb,
            Shape::Obb { .. } => ShapeKind::Obb,
            Shape::Circle { .. } => ShapeKind::Circle,
            Shape::Capsule { .. } => ShapeKind::Capsule,
        }
    }
}

/// A collision shape owned by an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    id: ShapeId,
    /// Offset from the owner's anchor (or absolute, once offset)
    pub position: Vec2,
    /// Inactive shapes never take part in collision tests
    pub active: bool,
    pub shape: Shape,
}

impl Primitive {
    /// Create a new active shape with a fresh handle
    pub fn new(position: Vec2, shape: Shape) -> Self {
        Self {
            id: ShapeId::next(),
            position,
            active: true,
            shape,
        }
    }

    pub fn aabb(position: Vec2, width: f32, height: f32) -> Self {
        Self::new(position, Shape::Aabb { width, height })
    }

    pub fn obb(position: Vec2, width: f32, height: f32, rotation: f32) -> Self {
        Self::new(
            position,
            Shape::Obb {
                width,
                height,
                rotation,
            },
        )
    }

    pub fn circle(centre: Vec2, radius: f32) -> Self {
        Self::new(centre, Shape::Circle { radius })
    }

    pub fn capsule(centre: Vec2, rect_width: f32, radius: f32, rotation: f32) -> Self {
        Self::new(
            centre,
            Shape::Capsule {
                rect_width,
                radius,
                rotation,
            },
        )
    }

    #[inline]
    pub fn id(&self) -> ShapeId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Copy of this shape moved by `offset`; keeps the handle and active flag
    pub fn offset_by(&self, offset: Vec2) -> Self {
        Self {
            position: self.position + offset,
            ..self.clone()
        }
    }

    /// Rectangle of an AABB or OBB (corner anchored, unrotated)
    pub fn rect(&self) -> Option<Rect> {
        match self.shape {
            Shape::Aabb { width, height } | Shape::Obb { width, height, .. } => Some(Rect {
                origin: self.position,
                size: Vec2::new(width, height),
            }),
            _ => None,
        }
    }

    /// Rotation in degrees (zero for shapes without one)
    pub fn rotation_degrees(&self) -> f32 {
        match self.shape {
            Shape::Obb { rotation, .. } | Shape::Capsule { rotation, .. } => rotation,
            _ => 0.0,
        }
    }

    #[inline]
    pub fn rotation_radians(&self) -> f32 {
        self.rotation_degrees().to_radians()
    }
}

/// A capsule split into its collision parts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleParts {
    /// Body rectangle (corner anchored, rotated about its centre)
    pub body: Rect,
    /// Body rotation in radians
    pub rotation: f32,
    pub cap1: Vec2,
    pub cap2: Vec2,
    pub radius: f32,
}

impl CapsuleParts {
    pub fn new(centre: Vec2, rect_width: f32, radius: f32, rotation_deg: f32) -> Self {
        let half_axis = rotate_degrees(Vec2::new(rect_width / 2.0, 0.0), rotation_deg);
        Self {
            body: Rect::from_centre(centre, Vec2::new(rect_width, radius * 2.0)),
            rotation: rotation_deg.to_radians(),
            cap1: centre - half_axis,
            cap2: centre + half_axis,
            radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_ids_are_unique_and_shared_by_clones() {
        let a = Primitive::circle(Vec2::ZERO, 1.0);
        let b = Primitive::circle(Vec2::ZERO, 1.0);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }

    #[test]
    fn test_loaded_handle_is_never_reallocated() {
        let fresh = Primitive::circle(Vec2::ZERO, 1.0);
        let ahead = fresh.id().get() + 5;
        let json = format!(
            r#"{{ "id": {ahead}, "position": [0.0, 0.0], "active": true, "shape": {{ "Circle": {{ "radius": 2.0 }} }} }}"#
        );
        let loaded: Primitive = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.id().get(), ahead);

        let next = Primitive::aabb(Vec2::ZERO, 1.0, 1.0);
        assert!(next.id().get() > ahead);
    }

    #[test]
    fn test_kind_codes() {
        for kind in [ShapeKind::Aabb, ShapeKind::Obb, ShapeKind::Circle, ShapeKind::Capsule] {
            assert_eq!(ShapeKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(ShapeKind::from_id(4), None);
        assert_eq!(Primitive::capsule(Vec2::ZERO, 4.0, 1.0, 0.0).kind().id(), 5);
    }

    #[test]
    fn test_offset_keeps_identity_and_active() {
        let mut p = Primitive::aabb(Vec2::new(1.0, 2.0), 3.0, 4.0);
        p.set_active(false);
        let moved = p.offset_by(Vec2::new(10.0, 10.0));
        assert_eq!(moved.position, Vec2::new(11.0, 12.0));
        assert_eq!(moved.id(), p.id());
        assert!(!moved.is_active());
    }

    #[test]
    fn test_capsule_parts() {
        let parts = CapsuleParts::new(Vec2::new(10.0, 10.0), 8.0, 2.0, 0.0);
        assert_eq!(parts.cap1, Vec2::new(6.0, 10.0));
        assert_eq!(parts.cap2, Vec2::new(14.0, 10.0));
        assert_eq!(parts.body.origin, Vec2::new(6.0, 8.0));
        assert_eq!(parts.body.size, Vec2::new(8.0, 4.0));

        // Standing upright
        let parts = CapsuleParts::new(Vec2::ZERO, 8.0, 2.0, 90.0);
        assert!((parts.cap1 - Vec2::new(0.0, -4.0)).length() < 1e-4);
        assert!((parts.cap2 - Vec2::new(0.0, 4.0)).length() < 1e-4);
    }

    #[test]
    fn test_box_rect_and_rotation() {
        let obb = Primitive::obb(Vec2::new(1.0, 2.0), 3.0, 4.0, 90.0);
        assert_eq!(obb.rect(), Some(Rect::new(1.0, 2.0, 3.0, 4.0)));
        assert!((obb.rotation_radians() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);

        let circle = Primitive::circle(Vec2::ZERO, 1.0);
        assert_eq!(circle.rect(), None);
        assert_eq!(circle.rotation_degrees(), 0.0);
    }

    #[test]
    fn test_rect_helpers() {
        let r = Rect::from_centre(Vec2::new(5.0, 5.0), Vec2::new(10.0, 4.0));
        assert_eq!(r.min(), Vec2::new(0.0, 3.0));
        assert_eq!(r.max(), Vec2::new(10.0, 7.0));
        assert_eq!(r.centre(), Vec2::new(5.0, 5.0));
    }
}
