//! Entity state
//!
//! An entity owns its sprite, its animations and an ordered set of collision
//! shapes, plus the motion parameters the integrator works on. Setters for
//! motion parameters silently ignore values that would break an invariant.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shape::{Primitive, Rect, ShapeId};
use super::sprite::{EntityTag, Sprite, SpriteAnimation};
use crate::consts::*;
use crate::rotate_degrees;

/// A physical element of the game world (player, enemy, tile, weapon, item)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    description: String,
    sprite: Sprite,
    animations: Vec<SpriteAnimation>,
    current_animation: Option<usize>,
    collision_bodies: Vec<Primitive>,
    /// Whether attached shapes are drawn for debugging
    #[serde(default)]
    shapes_visible: bool,

    mass: f32,
    pub(crate) velocity: Vec2,
    max_velocity: Vec2,
    decelerate: Vec2,
    force_stop: Vec2,
    pub(crate) force: Vec2,
    const_velocity: bool,
    anti_gravity: bool,
    rotate_accel: bool,
    /// Seconds the entity has existed for
    pub(crate) age: f32,
}

impl Default for Entity {
    fn default() -> Self {
        Self::new("", 0.0)
    }
}

impl Entity {
    pub fn new(texture: impl Into<String>, global_z_order: f32) -> Self {
        Self {
            description: String::new(),
            sprite: Sprite::new(texture, global_z_order),
            animations: Vec::new(),
            current_animation: None,
            collision_bodies: Vec::new(),
            shapes_visible: false,
            mass: DEFAULT_MASS,
            velocity: Vec2::ZERO,
            max_velocity: DEFAULT_MAX_VELOCITY,
            decelerate: DEFAULT_DECELERATE,
            force_stop: DEFAULT_FORCE_STOP,
            force: Vec2::ZERO,
            const_velocity: false,
            anti_gravity: true,
            rotate_accel: false,
            age: 0.0,
        }
    }

    /// Create an entity at `position`
    pub fn with_position(texture: impl Into<String>, position: Vec2, global_z_order: f32) -> Self {
        let mut entity = Self::new(texture, global_z_order);
        entity.set_position(position);
        entity
    }

    // === Identity ===

    pub fn name(&self) -> &str {
        &self.sprite.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.sprite.name = name.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn tag(&self) -> EntityTag {
        self.sprite.tag
    }

    pub fn set_tag(&mut self, tag: EntityTag) {
        self.sprite.tag = tag;
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    // === Sprite ===

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    pub fn texture_path(&self) -> &str {
        &self.sprite.texture
    }

    pub fn set_texture(&mut self, texture: impl Into<String>) {
        self.sprite.texture = texture.into();
    }

    pub fn texture_rect(&self) -> Rect {
        self.sprite.texture_rect
    }

    pub fn set_texture_rect(&mut self, rect: Rect) {
        self.sprite.texture_rect = rect;
    }

    /// Set the cropped area of the texture. With `use_centre`, `(x, y)` is
    /// the centre of the area rather than its corner.
    pub fn set_texture_rect_from(&mut self, x: f32, y: f32, width: f32, height: f32, use_centre: bool) {
        let rect = if use_centre {
            Rect::from_centre(Vec2::new(x, y), Vec2::new(width, height))
        } else {
            Rect::new(x, y, width, height)
        };
        self.set_texture_rect(rect);
    }

    pub fn set_anchor_point(&mut self, anchor_point: Vec2) {
        self.sprite.anchor_point = anchor_point;
    }

    /// Point the collision shapes are positioned relative to
    pub fn anchor(&self) -> Vec2 {
        self.sprite.bottom_left()
    }

    pub fn position(&self) -> Vec2 {
        self.sprite.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.sprite.position = position;
    }

    pub fn position_x(&self) -> f32 {
        self.sprite.position.x
    }

    pub fn set_position_x(&mut self, x: f32) {
        self.sprite.position.x = x;
    }

    pub fn position_y(&self) -> f32 {
        self.sprite.position.y
    }

    pub fn set_position_y(&mut self, y: f32) {
        self.sprite.position.y = y;
    }

    pub fn rotation_degrees(&self) -> f32 {
        self.sprite.rotation
    }

    /// Positive angles turn counter-clockwise; negate clockwise level data.
    pub fn set_rotation_degrees(&mut self, theta: f32) {
        self.sprite.rotation = theta;
    }

    pub fn rotation_radians(&self) -> f32 {
        self.sprite.rotation.to_radians()
    }

    pub fn set_rotation_radians(&mut self, theta: f32) {
        self.sprite.rotation = theta.to_degrees();
    }

    /// Turn the entity by `theta` degrees and return `acceleration` pointed
    /// along the new facing.
    pub fn rotate_entity(&mut self, theta: f32, acceleration: Vec2) -> Vec2 {
        self.sprite.rotation += theta;
        rotate_degrees(acceleration, self.sprite.rotation)
    }

    /// Opacity as a fraction of full opacity
    pub fn opacity(&self) -> f32 {
        self.sprite.opacity as f32 / 255.0
    }

    /// Set opacity from a fraction, clamped to [0, 1]
    pub fn set_opacity(&mut self, opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        self.sprite.opacity = (opacity * 255.0).round() as u8;
    }

    // === Flipping ===

    /// Flip the sprite on x; with `animations_too` every animation gets the same flip
    pub fn set_flipped_x(&mut self, flipped: bool, animations_too: bool) {
        self.sprite.flipped_x = flipped;
        if animations_too {
            for anim in &mut self.animations {
                anim.flipped_x = flipped;
            }
        }
    }

    /// Invert the current x flip (and each animation's own flip if asked)
    pub fn flip_x(&mut self, animations_too: bool) {
        self.sprite.flipped_x = !self.sprite.flipped_x;
        if animations_too {
            for anim in &mut self.animations {
                anim.flipped_x = !anim.flipped_x;
            }
        }
    }

    pub fn flipped_x(&self) -> bool {
        self.sprite.flipped_x
    }

    /// True when every animation is flipped on x
    pub fn animations_flipped_x(&self) -> bool {
        self.animations.iter().all(|a| a.flipped_x)
    }

    pub fn set_flipped_y(&mut self, flipped: bool, animations_too: bool) {
        self.sprite.flipped_y = flipped;
        if animations_too {
            for anim in &mut self.animations {
                anim.flipped_y = flipped;
            }
        }
    }

    pub fn flip_y(&mut self, animations_too: bool) {
        self.sprite.flipped_y = !self.sprite.flipped_y;
        if animations_too {
            for anim in &mut self.animations {
                anim.flipped_y = !anim.flipped_y;
            }
        }
    }

    pub fn flipped_y(&self) -> bool {
        self.sprite.flipped_y
    }

    pub fn animations_flipped_y(&self) -> bool {
        self.animations.iter().all(|a| a.flipped_y)
    }

    // === Motion parameters ===

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Set the mass; non-positive values are ignored
    pub fn set_mass(&mut self, mass: f32) {
        if mass > 0.0 {
            self.mass = mass;
        } else {
            log::trace!("ignoring non-positive mass {mass} for '{}'", self.name());
        }
    }

    pub fn force(&self) -> Vec2 {
        self.force
    }

    pub fn force_x(&self) -> f32 {
        self.force.x
    }

    pub fn force_y(&self) -> f32 {
        self.force.y
    }

    pub fn set_force(&mut self, force: Vec2) {
        self.force = force;
    }

    /// Add to the force applied this tick
    pub fn add_force(&mut self, force: Vec2) {
        self.force += force;
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub fn zero_velocity(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    pub fn zero_velocity_x(&mut self) {
        self.velocity.x = 0.0;
    }

    pub fn zero_velocity_y(&mut self) {
        self.velocity.y = 0.0;
    }

    pub fn max_velocity(&self) -> Vec2 {
        self.max_velocity
    }

    /// Both components must be positive
    pub fn set_max_velocity(&mut self, max_velocity: Vec2) {
        if max_velocity.cmpgt(Vec2::ZERO).all() {
            self.max_velocity = max_velocity;
        } else {
            log::trace!("ignoring max velocity {max_velocity} for '{}'", self.name());
        }
    }

    pub fn decelerate(&self) -> Vec2 {
        self.decelerate
    }

    /// Both components must lie strictly between 0 and 1
    pub fn set_decelerate(&mut self, decelerate: Vec2) {
        if decelerate.cmpgt(Vec2::ZERO).all() && decelerate.cmplt(Vec2::ONE).all() {
            self.decelerate = decelerate;
        } else {
            log::trace!("ignoring deceleration {decelerate} for '{}'", self.name());
        }
    }

    pub fn force_stop(&self) -> Vec2 {
        self.force_stop
    }

    /// Both components must be positive
    pub fn set_force_stop(&mut self, force_stop: Vec2) {
        if force_stop.cmpgt(Vec2::ZERO).all() {
            self.force_stop = force_stop;
        } else {
            log::trace!("ignoring force stop {force_stop} for '{}'", self.name());
        }
    }

    pub fn const_velocity(&self) -> bool {
        self.const_velocity
    }

    /// With constant velocity the entity moves only on ticks where force is applied
    pub fn set_const_velocity(&mut self, const_velocity: bool) {
        self.const_velocity = const_velocity;
    }

    pub fn toggle_const_velocity(&mut self) {
        self.const_velocity = !self.const_velocity;
    }

    /// True when the entity ignores gravity
    pub fn anti_gravity(&self) -> bool {
        self.anti_gravity
    }

    pub fn set_anti_gravity(&mut self, anti_gravity: bool) {
        self.anti_gravity = anti_gravity;
    }

    pub fn toggle_anti_gravity(&mut self) {
        self.anti_gravity = !self.anti_gravity;
    }

    pub fn rotate_acceleration(&self) -> bool {
        self.rotate_accel
    }

    /// Rotate applied acceleration by the sprite's rotation during update
    pub fn set_rotate_acceleration(&mut self, rotate: bool) {
        self.rotate_accel = rotate;
    }

    // === Collision bodies ===

    pub fn collision_bodies(&self) -> &[Primitive] {
        &self.collision_bodies
    }

    /// Replace the shape set; the old shapes are detached from the sprite first
    pub fn set_collision_bodies(&mut self, bodies: Vec<Primitive>) {
        self.sprite.detach_all();
        self.collision_bodies = bodies;
        for body in &self.collision_bodies {
            self.sprite.attach(body.id(), self.shapes_visible);
        }
    }

    /// Add a shape unless one with the same handle is already present
    pub fn add_collision_body(&mut self, body: Primitive) {
        if self.collision_bodies.iter().any(|b| b.id() == body.id()) {
            return;
        }
        self.sprite.attach(body.id(), self.shapes_visible);
        self.collision_bodies.push(body);
    }

    /// Remove the shape with handle `id`; returns it if it was present
    pub fn remove_collision_body(&mut self, id: ShapeId) -> Option<Primitive> {
        let index = self.collision_bodies.iter().position(|b| b.id() == id)?;
        self.sprite.detach(id);
        Some(self.collision_bodies.remove(index))
    }

    pub fn collision_body_mut(&mut self, id: ShapeId) -> Option<&mut Primitive> {
        self.collision_bodies.iter_mut().find(|b| b.id() == id)
    }

    pub fn set_active_collision_bodies(&mut self, active: bool) {
        for body in &mut self.collision_bodies {
            body.set_active(active);
        }
    }

    pub fn enable_collision_bodies(&mut self) {
        self.set_active_collision_bodies(true);
    }

    pub fn disable_collision_bodies(&mut self) {
        self.set_active_collision_bodies(false);
    }

    /// Shapes moved from anchor-relative offsets into the sprite's parent space
    pub fn offset_collision_bodies(&self) -> Vec<Primitive> {
        let anchor = self.anchor();
        self.collision_bodies
            .iter()
            .map(|b| b.offset_by(anchor))
            .collect()
    }

    /// Show or hide the attached shapes when debug drawing
    pub fn set_shapes_visible(&mut self, visible: bool) {
        self.shapes_visible = visible;
        let ids: Vec<ShapeId> = self.collision_bodies.iter().map(Primitive::id).collect();
        self.sprite.detach_all();
        for id in ids {
            self.sprite.attach(id, visible);
        }
    }

    /// Detach every shape from the sprite and drop them
    pub fn release(&mut self) {
        self.sprite.detach_all();
        self.collision_bodies.clear();
    }

    // === Animations ===

    pub fn animations(&self) -> &[SpriteAnimation] {
        &self.animations
    }

    pub fn add_animation(&mut self, animation: SpriteAnimation) {
        self.animations.push(animation);
    }

    pub fn animation_by_index(&self, index: usize) -> Option<&SpriteAnimation> {
        self.animations.get(index)
    }

    /// First animation carrying `tag`
    pub fn animation_by_tag(&self, tag: i32) -> Option<&SpriteAnimation> {
        self.animations.iter().find(|a| a.tag == tag)
    }

    /// Index of the first animation carrying `tag`
    pub fn animation_index(&self, tag: i32) -> Option<usize> {
        self.animations.iter().position(|a| a.tag == tag)
    }

    pub fn current_animation(&self) -> Option<&SpriteAnimation> {
        self.current_animation.and_then(|i| self.animations.get(i))
    }

    pub(crate) fn current_animation_mut(&mut self) -> Option<&mut SpriteAnimation> {
        self.current_animation.and_then(|i| self.animations.get_mut(i))
    }

    /// Stop the current animation and run the one at `index`.
    /// Out-of-range indices leave everything unchanged.
    pub fn run_animation_by_index(&mut self, index: usize) {
        if index >= self.animations.len() {
            return;
        }
        if let Some(current) = self.current_animation_mut() {
            current.stop();
        }
        self.current_animation = Some(index);
        self.animations[index].run();
    }

    pub fn run_animation_by_tag(&mut self, tag: i32) {
        if let Some(index) = self.animation_index(tag) {
            self.run_animation_by_index(index);
        }
    }

    pub fn running_animation(&self) -> bool {
        self.current_animation().is_some_and(SpriteAnimation::is_running)
    }
}
