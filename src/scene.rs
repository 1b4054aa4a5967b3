#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow precision loss when casting row distances to f32 since they never exceed the board height
    clippy::cast_precision_loss
)]

//! Presentation entities. Every visible block is an entity with a
//! `Transform` and an `Appearance`; the simulation only drives them through
//! the create/destroy/translate/set-position/visibility calls below.

use bevy_ecs::prelude::*;
use log::{trace, warn};
use ratatui::style::Color;

use crate::board::{Board, SceneRequest};
use crate::components::{Rules, Vec2};
use crate::game::{BOARD_HEIGHT, BOARD_WIDTH, HOLD_ORIGIN, PREVIEW_ORIGIN};
use crate::pieces::{ActivePiece, Ghost, PIECE_CELLS};
use crate::spawn::SpawnQueue;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec2,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appearance {
    pub color: Color,
    pub visible: bool,
}

/// What a sprite depicts, which also decides draw order
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SpriteLayer {
    Locked,
    Ghost,
    Active,
    Preview,
    Held,
}

/// Declarative description of a sprite to create
#[derive(Debug, Clone, Copy)]
pub struct EntityConfig {
    pub position: Vec2,
    pub color: Color,
    pub visible: bool,
    pub layer: SpriteLayer,
}

pub fn create_entity(world: &mut World, config: EntityConfig) -> Entity {
    world
        .spawn((
            Transform {
                translation: config.position,
            },
            Appearance {
                color: config.color,
                visible: config.visible,
            },
            config.layer,
        ))
        .id()
}

pub fn destroy_entity(world: &mut World, entity: Entity) {
    if !world.despawn(entity) {
        warn!("Tried to destroy missing sprite {entity:?}");
    }
}

pub fn translate(world: &mut World, entity: Entity, delta: Vec2) {
    if let Some(mut transform) = world.get_mut::<Transform>(entity) {
        transform.translation = transform.translation + delta;
    }
}

pub fn set_position(world: &mut World, entity: Entity, position: Vec2) {
    if let Some(mut transform) = world.get_mut::<Transform>(entity) {
        transform.translation = position;
    }
}

pub fn set_visible(world: &mut World, entity: Entity, visible: bool) {
    if let Some(mut appearance) = world.get_mut::<Appearance>(entity) {
        appearance.visible = visible;
    }
}

pub fn set_color(world: &mut World, entity: Entity, color: Color) {
    if let Some(mut appearance) = world.get_mut::<Appearance>(entity) {
        appearance.color = color;
    }
}

/// Sprite of every locked block, indexed like the board
#[derive(Resource, Debug, Clone, Default)]
pub struct BoardSprites {
    cells: [[Option<Entity>; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl BoardSprites {
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<Entity> {
        self.cells.get(row).and_then(|cells| cells.get(col).copied().flatten())
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.cells.iter().flatten().filter(|e| e.is_some()).count()
    }
}

fn cell_position(row: usize, col: usize) -> Vec2 {
    Vec2::from(Board::cell_center(row, col))
}

/// Carries out the board's pending scene requests
pub fn apply_board_requests(world: &mut World) {
    let requests = world.resource_mut::<Board>().take_requests();
    if requests.is_empty() {
        return;
    }
    trace!("Applying {} scene requests", requests.len());

    let mut sprites = world.remove_resource::<BoardSprites>().unwrap_or_default();
    for request in requests {
        match request {
            SceneRequest::Create { row, col, color } => {
                if let Some(stale) = sprites.cells[row][col].take() {
                    destroy_entity(world, stale);
                }
                sprites.cells[row][col] = Some(create_entity(
                    world,
                    EntityConfig {
                        position: cell_position(row, col),
                        color,
                        visible: true,
                        layer: SpriteLayer::Locked,
                    },
                ));
            }
            SceneRequest::Destroy { row, col } => {
                if let Some(entity) = sprites.cells[row][col].take() {
                    destroy_entity(world, entity);
                }
            }
            SceneRequest::ShiftRow { src, dst } => {
                let delta = Vec2::new(0.0, dst as f32 - src as f32);
                for col in 0..BOARD_WIDTH {
                    // Blocks the board refused to move keep their sprite
                    if sprites.cells[dst][col].is_some() {
                        continue;
                    }
                    let Some(entity) = sprites.cells[src][col].take() else {
                        continue;
                    };
                    translate(world, entity, delta);
                    sprites.cells[dst][col] = Some(entity);
                }
            }
            SceneRequest::Recolor { row, col, color } => {
                if let Some(entity) = sprites.cells[row][col] {
                    set_color(world, entity, color);
                }
            }
            SceneRequest::ClearAll => {
                for entity in sprites.cells.iter_mut().flatten().filter_map(Option::take) {
                    destroy_entity(world, entity);
                }
            }
        }
    }
    world.insert_resource(sprites);
}

/// Fixed pools of sprites for the pieces that are not on the board. They are
/// created once and afterwards only moved and shown or hidden.
#[derive(Resource, Debug, Clone)]
pub struct PieceSprites {
    active: [Entity; PIECE_CELLS],
    ghost: [Entity; PIECE_CELLS],
    preview: [Entity; PIECE_CELLS],
    held: [Entity; PIECE_CELLS],
}

impl PieceSprites {
    fn create(world: &mut World) -> Self {
        let mut pool = |layer: SpriteLayer| {
            [(); PIECE_CELLS].map(|()| {
                create_entity(
                    world,
                    EntityConfig {
                        position: Vec2::default(),
                        color: Color::Reset,
                        visible: false,
                        layer,
                    },
                )
            })
        };
        Self {
            active: pool(SpriteLayer::Active),
            ghost: pool(SpriteLayer::Ghost),
            preview: pool(SpriteLayer::Preview),
            held: pool(SpriteLayer::Held),
        }
    }
}

fn show_cells(
    world: &mut World,
    pool: [Entity; PIECE_CELLS],
    cells: Option<([Vec2; PIECE_CELLS], Color)>,
) {
    match cells {
        Some((positions, color)) => {
            for (entity, position) in pool.into_iter().zip(positions) {
                set_position(world, entity, position);
                set_color(world, entity, color);
                set_visible(world, entity, true);
            }
        }
        None => {
            for entity in pool {
                set_visible(world, entity, false);
            }
        }
    }
}

/// Moves the active, ghost, preview and held sprites to match the simulation
pub fn sync_piece_sprites(world: &mut World) {
    let sprites = match world.get_resource::<PieceSprites>() {
        Some(sprites) => sprites.clone(),
        None => {
            let sprites = PieceSprites::create(world);
            world.insert_resource(sprites.clone());
            sprites
        }
    };

    let rules = *world.resource::<Rules>();
    let active = world
        .query::<(&ActivePiece, &Ghost)>()
        .iter(world)
        .next()
        .map(|(piece, ghost)| {
            let color = piece.piece_type.color();
            ((piece.cells(), color), (ghost.cells(piece), color))
        });
    let (preview, held) = {
        let queue = world.resource::<SpawnQueue>();
        (queue.preview(), queue.held())
    };

    show_cells(world, sprites.active, active.map(|(cells, _)| cells));
    show_cells(
        world,
        sprites.ghost,
        active
            .filter(|_| rules.ghost_enabled)
            .map(|(_, ghost)| ghost),
    );
    show_cells(
        world,
        sprites.preview,
        preview.map(|piece_type| {
            let parked = ActivePiece::at(piece_type, Vec2::from(PREVIEW_ORIGIN));
            (parked.cells(), piece_type.color())
        }),
    );

    // The held piece waits off the board, out of sight
    if let Some(piece_type) = held {
        let parked = ActivePiece::at(piece_type, Vec2::from(HOLD_ORIGIN));
        for (entity, position) in sprites.held.into_iter().zip(parked.cells()) {
            set_position(world, entity, position);
            set_color(world, entity, piece_type.color());
        }
    }
    for entity in sprites.held {
        set_visible(world, entity, false);
    }
}
