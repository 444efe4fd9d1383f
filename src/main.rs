//! Mashadeau headless demo
//!
//! Drops a player onto a seeded row of tiles and logs each first contact.
//! Pass a settings JSON path as the first argument to override defaults.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use mashadeau::Settings;
use mashadeau::sim::{Entity, EntityTag, Primitive, Rect, SpriteAnimation};

const SEED: u64 = 0x6d61_7368;
const TILE_COUNT: usize = 8;
const TILE_SIZE: f32 = 32.0;
const DEMO_SECONDS: f32 = 6.0;
/// Rendered frame time the demo pretends to run at
const FRAME_DT: f32 = 1.0 / 30.0;

fn spawn_tiles(rng: &mut Pcg32, settings: &Settings) -> Vec<Entity> {
    (0..TILE_COUNT)
        .map(|i| {
            let height = rng.random_range(0..3) as f32 * TILE_SIZE / 2.0;
            let position = Vec2::new(i as f32 * TILE_SIZE + TILE_SIZE / 2.0, height);
            let mut tile = Entity::with_position("tiles/stone.png", position, 0.0);
            tile.set_name(format!("tile_{i}"));
            tile.set_tag(EntityTag::Tile);
            tile.set_texture_rect(Rect::new(0.0, 0.0, TILE_SIZE, TILE_SIZE));
            tile.set_shapes_visible(settings.show_collision_shapes);
            tile.add_collision_body(Primitive::aabb(Vec2::ZERO, TILE_SIZE, TILE_SIZE));
            tile
        })
        .collect()
}

fn spawn_player(settings: &Settings) -> Entity {
    let mut player = Entity::with_position("player/idle.png", Vec2::new(20.0, 200.0), 1.0);
    player.set_name("player");
    player.set_description("Falls, then walks right along the tiles");
    player.set_tag(EntityTag::Player);
    player.set_texture_rect(Rect::new(0.0, 0.0, 24.0, 48.0));
    player.set_anti_gravity(false);
    player.set_mass(1.0);
    player.set_max_velocity(Vec2::new(4.0, 8.0));
    player.set_shapes_visible(settings.show_collision_shapes);
    // Feet, body and head
    player.set_collision_bodies(vec![
        Primitive::aabb(Vec2::new(4.0, 0.0), 16.0, 6.0),
        Primitive::capsule(Vec2::new(12.0, 24.0), 24.0, 8.0, 90.0),
        Primitive::circle(Vec2::new(12.0, 42.0), 6.0),
    ]);
    player.add_animation(SpriteAnimation::new(0, 6, 0.1));
    player.run_animation_by_tag(0);
    player
}

/// Log first contacts and keep the player standing on top of tiles
fn land_on_tiles(player: &mut Entity, tiles: &[Entity], touched: &mut [bool], step: u32) {
    for (i, tile) in tiles.iter().enumerate() {
        let Some(pair) = player.collides_with(tile) else {
            continue;
        };
        if !touched[i] {
            touched[i] = true;
            log::info!(
                "step {step}: {} touched {} ({} vs {}) at {}",
                player.name(),
                tile.name(),
                pair.first.primitive.kind().as_str(),
                pair.second.primitive.kind().as_str(),
                player.position(),
            );
        }
        let top = tile.anchor().y + tile.texture_rect().height();
        if player.velocity().y < 0.0 && player.anchor().y < top {
            let lift = top - player.anchor().y;
            player.set_position_y(player.position_y() + lift);
            player.zero_velocity_y();
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Mashadeau demo starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    // Demo scale: pixels per second squared
    let mut world = settings.world;
    world.gravity *= 600.0;

    let mut rng = Pcg32::seed_from_u64(SEED);
    let tiles = spawn_tiles(&mut rng, &settings);
    let mut player = spawn_player(&settings);

    let mut touched = vec![false; tiles.len()];
    let frames = (DEMO_SECONDS / FRAME_DT) as u32;
    let mut accumulator = 0.0;
    let mut step = 0u32;

    for _ in 0..frames {
        accumulator += FRAME_DT;
        let mut substeps = 0;
        while accumulator >= settings.fixed_dt && substeps < settings.max_substeps {
            accumulator -= settings.fixed_dt;
            substeps += 1;
            step += 1;

            player.add_force(Vec2::new(120.0, 0.0));
            player.update(&world, settings.fixed_dt);
            land_on_tiles(&mut player, &tiles, &mut touched, step);
        }
    }

    let count = touched.iter().filter(|t| **t).count();
    log::info!(
        "Demo finished after {:.2}s: {count}/{} tiles touched, player at {}",
        player.age(),
        tiles.len(),
        player.position()
    );
}
