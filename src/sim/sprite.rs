//! Visual representation of an entity
//!
//! The simulation does not draw anything. `Sprite` is the scene-graph node a
//! renderer reads from: the entity commits its position, rotation, opacity
//! and flips here, and attaches its collision shapes as children so they move
//! with it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shape::{Rect, ShapeId};

/// Identification tag used by gameplay logic to tell entities apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EntityTag {
    #[default]
    Tile,
    Player,
    Enemy,
    Weapon,
    Item,
}

impl EntityTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityTag::Tile => "tile",
            EntityTag::Player => "player",
            EntityTag::Enemy => "enemy",
            EntityTag::Weapon => "weapon",
            EntityTag::Item => "item",
        }
    }
}

/// A collision shape attached to a sprite for debug drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedShape {
    pub id: ShapeId,
    pub visible: bool,
}

/// Scene-graph node owned by an entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprite {
    pub name: String,
    pub tag: EntityTag,
    pub texture: String,
    /// Cropped area of the texture; its size is the sprite's size
    pub texture_rect: Rect,
    /// Normalized point of the texture rect that `position` refers to
    pub anchor_point: Vec2,
    pub position: Vec2,
    /// Rotation in degrees
    pub rotation: f32,
    /// Opacity out of 255
    pub opacity: u8,
    pub global_z_order: f32,
    pub flipped_x: bool,
    pub flipped_y: bool,
    children: Vec<AttachedShape>,
}

impl Sprite {
    pub fn new(texture: impl Into<String>, global_z_order: f32) -> Self {
        Self {
            name: String::new(),
            tag: EntityTag::default(),
            texture: texture.into(),
            texture_rect: Rect::default(),
            anchor_point: Vec2::splat(0.5),
            position: Vec2::ZERO,
            rotation: 0.0,
            opacity: u8::MAX,
            global_z_order,
            flipped_x: false,
            flipped_y: false,
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.texture_rect.size
    }

    /// Bottom-left corner of the sprite in its parent's space.
    /// Child positions are relative to this point.
    pub fn bottom_left(&self) -> Vec2 {
        self.position - self.anchor_point * self.size()
    }

    /// Attach a shape for drawing (no-op if already attached)
    pub fn attach(&mut self, id: ShapeId, visible: bool) {
        if !self.children.iter().any(|c| c.id == id) {
            self.children.push(AttachedShape { id, visible });
        }
    }

    /// Detach a shape; returns whether it was attached
    pub fn detach(&mut self, id: ShapeId) -> bool {
        let before = self.children.len();
        self.children.retain(|c| c.id != id);
        self.children.len() != before
    }

    pub fn detach_all(&mut self) {
        self.children.clear();
    }

    pub fn children(&self) -> &[AttachedShape] {
        &self.children
    }
}

/// Sprite-sheet animation driven by elapsed time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteAnimation {
    pub tag: i32,
    pub frame_count: usize,
    /// Seconds each frame is shown
    pub frame_duration: f32,
    pub looping: bool,
    pub flipped_x: bool,
    pub flipped_y: bool,
    running: bool,
    elapsed: f32,
    frame: usize,
}

impl SpriteAnimation {
    pub fn new(tag: i32, frame_count: usize, frame_duration: f32) -> Self {
        Self {
            tag,
            frame_count: frame_count.max(1),
            frame_duration,
            looping: true,
            flipped_x: false,
            flipped_y: false,
            running: false,
            elapsed: 0.0,
            frame: 0,
        }
    }

    /// Start (or restart) the animation from its first frame
    pub fn run(&mut self) {
        self.running = true;
        self.elapsed = 0.0;
        self.frame = 0;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Advance by `dt` seconds, stepping over as many whole frames as elapsed
    pub fn update(&mut self, dt: f32) {
        if !self.running
            || self.frame_count == 0
            || !dt.is_finite()
            || !self.frame_duration.is_normal()
            || self.frame_duration < 0.0
        {
            return;
        }
        self.elapsed += dt;
        if self.elapsed < self.frame_duration {
            return;
        }
        let steps = (self.elapsed / self.frame_duration).floor();
        self.elapsed %= self.frame_duration;

        let last = self.frame_count - 1;
        if self.looping {
            let advance = (steps % self.frame_count as f32) as usize;
            self.frame = (self.frame + advance) % self.frame_count;
        } else if steps > last.saturating_sub(self.frame) as f32 {
            self.frame = last;
            self.running = false;
            self.elapsed = 0.0;
        } else {
            self.frame += steps as usize;
        }
    }
}
