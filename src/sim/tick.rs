//! Per-entity motion integrator
//!
//! Advances one entity by one frame: force to acceleration, acceleration to
//! velocity, velocity to position. Velocity is clamped to the entity's
//! maximum, decays on axes without applied force and snaps to rest once it
//! falls below the force-stop threshold.

use glam::Vec2;

use super::entity::Entity;
use crate::rotate_degrees;
use crate::settings::WorldParams;

/// Clamp one velocity component so that `|v * dt| <= max`
#[inline]
fn clamp_axis(v: f32, max: f32, dt: f32) -> f32 {
    if (v * dt).abs() > max {
        if v > 0.0 { max / dt } else { -max / dt }
    } else {
        v
    }
}

/// Advance `entity` by `dt` seconds under `world`
pub fn tick(entity: &mut Entity, world: &WorldParams, dt: f32) {
    let force = entity.force();
    let mass = entity.mass();

    let mut acceleration = force / mass;
    if entity.rotate_acceleration() {
        acceleration = rotate_degrees(acceleration, entity.rotation_degrees());
    }
    if !entity.anti_gravity() {
        acceleration.y -= world.gravity / mass;
    }

    let mut velocity = entity.velocity + acceleration * dt;

    let max = entity.max_velocity();
    velocity.x = clamp_axis(velocity.x, max.x, dt);
    velocity.y = clamp_axis(velocity.y, max.y, dt);

    // Coast on axes that had no force this tick
    let decelerate = entity.decelerate();
    if velocity.x != 0.0 && force.x == 0.0 {
        velocity.x *= decelerate.x;
    }
    if velocity.y != 0.0 && force.y == 0.0 {
        velocity.y *= decelerate.y;
    }

    if !entity.const_velocity() {
        let stop = entity.force_stop();
        if force.x == 0.0 && velocity.x != 0.0 && (velocity.x * dt).abs() < stop.x {
            velocity.x = 0.0;
        }
        if force.y == 0.0 && velocity.y != 0.0 && (velocity.y * dt).abs() < stop.y {
            velocity.y = 0.0;
        }
    }

    let position = entity.position() + velocity * dt;
    entity.set_position(position);
    entity.force = Vec2::ZERO;

    entity.velocity = if entity.const_velocity() {
        Vec2::ZERO
    } else {
        velocity
    };

    if let Some(animation) = entity.current_animation_mut() {
        animation.update(dt);
    }

    entity.age += dt;
}

impl Entity {
    /// Advance this entity by one frame; see [`tick`]
    pub fn update(&mut self, world: &WorldParams, dt: f32) {
        tick(self, world, dt);
    }
}
