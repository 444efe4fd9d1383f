//! Narrow-phase overlap tests
//!
//! Pure predicates on shapes that are already in world space. Touching
//! counts as a collision for every pair. [`overlaps`] is total over the
//! variant pairs: mirrored pairs call the same predicate with the arguments
//! swapped, so `overlaps(a, b) == overlaps(b, a)`.

use glam::Vec2;

use super::shape::{CapsuleParts, Primitive, Rect, Shape};

/// Circle against circle
#[inline]
pub fn circle_circle(c1: Vec2, r1: f32, c2: Vec2, r2: f32) -> bool {
    let reach = r1 + r2;
    c1.distance_squared(c2) <= reach * reach
}

/// Box against box, both given by their min and max corners
#[inline]
pub fn aabb_aabb(a_min: Vec2, a_max: Vec2, b_min: Vec2, b_max: Vec2) -> bool {
    a_min.x <= b_max.x && a_max.x >= b_min.x && a_min.y <= b_max.y && a_max.y >= b_min.y
}

/// Box against circle: the point of the box nearest the centre must lie
/// within the radius
pub fn aabb_circle(rect: &Rect, centre: Vec2, radius: f32) -> bool {
    let nearest = centre.clamp(rect.min(), rect.max());
    nearest.distance_squared(centre) <= radius * radius
}

/// Corners of a rectangle rotated by `rotation` radians about its centre
fn box_corners(rect: &Rect, rotation: f32, use_centre: bool) -> [Vec2; 4] {
    let half = rect.size / 2.0;
    let centre = if use_centre { rect.origin } else { rect.centre() };
    let rot = Vec2::from_angle(rotation);
    [
        Vec2::new(-half.x, -half.y),
        Vec2::new(half.x, -half.y),
        Vec2::new(half.x, half.y),
        Vec2::new(-half.x, half.y),
    ]
    .map(|corner| centre + rot.rotate(corner))
}

fn project(corners: &[Vec2; 4], axis: Vec2) -> (f32, f32) {
    corners
        .iter()
        .map(|c| c.dot(axis))
        .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p), hi.max(p)))
}

/// Oriented box against oriented box (separating axis test)
///
/// Each box rotates about its own centre by its own angle in radians. When
/// `use_centre` is true the rect origins are the box centres, otherwise they
/// are the bottom-left corners of the unrotated boxes.
pub fn obb_obb(a: &Rect, rot_a: f32, b: &Rect, rot_b: f32, use_centre: bool) -> bool {
    let corners_a = box_corners(a, rot_a, use_centre);
    let corners_b = box_corners(b, rot_b, use_centre);

    let axes = [
        Vec2::from_angle(rot_a),
        Vec2::from_angle(rot_a).perp(),
        Vec2::from_angle(rot_b),
        Vec2::from_angle(rot_b).perp(),
    ];

    axes.iter().all(|&axis| {
        let (min_a, max_a) = project(&corners_a, axis);
        let (min_b, max_b) = project(&corners_b, axis);
        max_a >= min_b && max_b >= min_a
    })
}

/// Oriented box (corner anchored) against circle
///
/// The circle centre is moved into the box's local frame, where the test
/// reduces to the clamped-point check of [`aabb_circle`].
pub fn obb_circle(rect: &Rect, rotation: f32, centre: Vec2, radius: f32) -> bool {
    let half = rect.size / 2.0;
    let local = Vec2::from_angle(-rotation).rotate(centre - rect.centre());
    let nearest = local.clamp(-half, half);
    nearest.distance_squared(local) <= radius * radius
}

/// World-space geometry of a primitive, stripped of identity
#[derive(Debug, Clone, Copy)]
enum Solid {
    Aabb(Rect),
    Obb(Rect, f32),
    Circle(Vec2, f32),
    Capsule(CapsuleParts),
}

impl Solid {
    fn of(prim: &Primitive) -> Self {
        match prim.shape {
            Shape::Aabb { width, height } => {
                Solid::Aabb(Rect::new(prim.position.x, prim.position.y, width, height))
            }
            Shape::Obb {
                width,
                height,
                rotation,
            } => Solid::Obb(
                Rect::new(prim.position.x, prim.position.y, width, height),
                rotation.to_radians(),
            ),
            Shape::Circle { radius } => Solid::Circle(prim.position, radius),
            Shape::Capsule {
                rect_width,
                radius,
                rotation,
            } => Solid::Capsule(CapsuleParts::new(prim.position, rect_width, radius, rotation)),
        }
    }

    /// Body and end caps of a capsule
    fn capsule_pieces(parts: &CapsuleParts) -> [Solid; 3] {
        [
            Solid::Obb(parts.body, parts.rotation),
            Solid::Circle(parts.cap1, parts.radius),
            Solid::Circle(parts.cap2, parts.radius),
        ]
    }
}

fn solid_overlap(a: &Solid, b: &Solid) -> bool {
    match (a, b) {
        (Solid::Capsule(parts), other) | (other, Solid::Capsule(parts)) => {
            Solid::capsule_pieces(parts)
                .iter()
                .any(|piece| solid_overlap(piece, other))
        }

        (Solid::Aabb(ra), Solid::Aabb(rb)) => aabb_aabb(ra.min(), ra.max(), rb.min(), rb.max()),
        (Solid::Circle(ca, ra), Solid::Circle(cb, rb)) => circle_circle(*ca, *ra, *cb, *rb),

        (Solid::Aabb(rect), Solid::Circle(c, r)) | (Solid::Circle(c, r), Solid::Aabb(rect)) => {
            aabb_circle(rect, *c, *r)
        }

        (Solid::Aabb(rect), Solid::Obb(obb, rot)) | (Solid::Obb(obb, rot), Solid::Aabb(rect)) => {
            obb_obb(rect, 0.0, obb, *rot, false)
        }

        (Solid::Obb(ra, rot_a), Solid::Obb(rb, rot_b)) => obb_obb(ra, *rot_a, rb, *rot_b, false),

        (Solid::Obb(rect, rot), Solid::Circle(c, r)) | (Solid::Circle(c, r), Solid::Obb(rect, rot)) => {
            obb_circle(rect, *rot, *c, *r)
        }
    }
}

/// Whether two world-space shapes overlap
///
/// Ignores the `active` flag; filtering inactive shapes is the
/// coordinator's job.
pub fn overlaps(a: &Primitive, b: &Primitive) -> bool {
    solid_overlap(&Solid::of(a), &Solid::of(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_circle_circle() {
        let a = Primitive::circle(Vec2::ZERO, 5.0);
        assert!(overlaps(&a, &Primitive::circle(Vec2::new(9.0, 0.0), 5.0)));
        assert!(!overlaps(&a, &Primitive::circle(Vec2::new(11.0, 0.0), 5.0)));
        // Touching
        assert!(overlaps(&a, &Primitive::circle(Vec2::new(10.0, 0.0), 5.0)));
    }

    #[test]
    fn test_aabb_aabb() {
        let a = Primitive::aabb(Vec2::ZERO, 10.0, 10.0);
        assert!(overlaps(&a, &Primitive::aabb(Vec2::new(10.0, 0.0), 10.0, 10.0)));
        assert!(!overlaps(&a, &Primitive::aabb(Vec2::new(11.0, 0.0), 9.0, 10.0)));
        assert!(!overlaps(&a, &Primitive::aabb(Vec2::new(0.0, 10.5), 10.0, 10.0)));
    }

    #[test]
    fn test_aabb_circle() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Centre inside
        assert!(aabb_circle(&rect, Vec2::new(5.0, 5.0), 1.0));
        // Touching the right edge
        assert!(aabb_circle(&rect, Vec2::new(13.0, 5.0), 3.0));
        // Near the corner but outside the radius
        assert!(!aabb_circle(&rect, Vec2::new(13.0, 13.0), 4.0));
        assert!(aabb_circle(&rect, Vec2::new(13.0, 13.0), 4.3));
    }

    #[test]
    fn test_obb_obb_rotation_matters() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Diamond whose tip reaches past the gap only when rotated
        let b = Rect::new(11.0, 0.0, 10.0, 10.0);
        assert!(!obb_obb(&a, 0.0, &b, 0.0, false));
        assert!(obb_obb(&a, 0.0, &b, std::f32::consts::FRAC_PI_4, false));
    }

    #[test]
    fn test_obb_obb_use_centre() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(12.0, 0.0, 10.0, 10.0);
        // Corner anchored: [0,10] vs [12,22] apart
        assert!(!obb_obb(&a, 0.0, &b, 0.0, false));
        // Centre anchored: [-5,5] vs [7,17] still apart, but [-5,5] vs [4,14] overlaps
        assert!(!obb_obb(&a, 0.0, &b, 0.0, true));
        let c = Rect::new(9.0, 0.0, 10.0, 10.0);
        assert!(obb_obb(&a, 0.0, &c, 0.0, true));
    }

    #[test]
    fn test_obb_circle() {
        let rect = Rect::new(0.0, 0.0, 20.0, 2.0);
        let rot = std::f32::consts::FRAC_PI_2;
        // Standing upright the bar spans x in [9, 11], y in [-9, 11]
        assert!(obb_circle(&rect, rot, Vec2::new(12.0, 5.0), 1.5));
        assert!(!obb_circle(&rect, 0.0, Vec2::new(12.0, 5.0), 1.5));
        assert!(!obb_circle(&rect, rot, Vec2::new(12.0, 18.0), 1.5));
    }

    #[test]
    fn test_capsule_against_others() {
        // Horizontal capsule centred at origin: caps at x = ±10, radius 3
        let cap = Primitive::capsule(Vec2::ZERO, 20.0, 3.0, 0.0);

        // Hits the right cap only
        assert!(overlaps(&cap, &Primitive::circle(Vec2::new(14.0, 0.0), 1.5)));
        // Hits the body
        assert!(overlaps(&cap, &Primitive::aabb(Vec2::new(-1.0, 2.5), 2.0, 2.0)));
        // Beyond the cap's reach
        assert!(!overlaps(&cap, &Primitive::circle(Vec2::new(15.0, 0.0), 1.5)));
        // Above the body
        assert!(!overlaps(&cap, &Primitive::aabb(Vec2::new(-1.0, 4.0), 2.0, 2.0)));
    }

    #[test]
    fn test_capsule_capsule() {
        let a = Primitive::capsule(Vec2::ZERO, 20.0, 3.0, 0.0);
        // Upright capsule whose lower cap dips into a's body
        let b = Primitive::capsule(Vec2::new(0.0, 14.0), 20.0, 3.0, 90.0);
        assert!(overlaps(&a, &b));
        let far = Primitive::capsule(Vec2::new(0.0, 20.0), 20.0, 3.0, 90.0);
        assert!(!overlaps(&a, &far));
    }

    #[test]
    fn test_mixed_kinds_dispatch() {
        let aabb = Primitive::aabb(Vec2::ZERO, 10.0, 10.0);
        let obb = Primitive::obb(Vec2::new(9.0, 0.0), 10.0, 10.0, 30.0);
        let circle = Primitive::circle(Vec2::new(-2.0, 5.0), 2.5);
        assert!(overlaps(&aabb, &obb));
        assert!(overlaps(&obb, &aabb));
        assert!(overlaps(&aabb, &circle));
        assert!(overlaps(&circle, &aabb));
        assert!(!overlaps(&circle, &obb));
    }

    fn arb_primitive() -> impl Strategy<Value = Primitive> {
        let pos = (-30.0f32..30.0, -30.0f32..30.0).prop_map(|(x, y)| Vec2::new(x, y));
        prop_oneof![
            (pos.clone(), 1.0f32..20.0, 1.0f32..20.0).prop_map(|(p, w, h)| Primitive::aabb(p, w, h)),
            (pos.clone(), 1.0f32..20.0, 1.0f32..20.0, -180.0f32..180.0)
                .prop_map(|(p, w, h, r)| Primitive::obb(p, w, h, r)),
            (pos.clone(), 0.5f32..15.0).prop_map(|(p, r)| Primitive::circle(p, r)),
            (pos, 1.0f32..20.0, 0.5f32..8.0, -180.0f32..180.0)
                .prop_map(|(p, w, r, rot)| Primitive::capsule(p, w, r, rot)),
        ]
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(a in arb_primitive(), b in arb_primitive()) {
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }

        #[test]
        fn prop_shape_overlaps_itself(a in arb_primitive()) {
            prop_assert!(overlaps(&a, &a));
        }
    }
}
