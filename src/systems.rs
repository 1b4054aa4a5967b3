use bevy_ecs::prelude::*;
use log::{debug, info, trace};

use crate::board::Board;
use crate::components::{DropKind, Input, Rules, Session};
use crate::gravity::GravityClock;
use crate::line_clear::LineClear;
use crate::pieces::{ActivePiece, FallOutcome, Ghost, PieceType};
use crate::scoring::ScoreState;
use crate::screenshake::{trigger_hard_drop_shake, trigger_line_clear_shake, update_screen_shake};
use crate::sound::{AudioState, SoundCue};
use crate::spawn::{HoldOutcome, SpawnQueue};

/// The falling piece, if one is in play
pub fn active_piece(world: &mut World) -> Option<(Entity, ActivePiece)> {
    let mut query = world.query::<(Entity, &ActivePiece)>();
    query
        .iter(world)
        .next()
        .map(|(entity, piece)| (entity, piece.clone()))
}

fn play(world: &mut World, cue: SoundCue) {
    world.resource_mut::<AudioState>().play_sound(cue);
}

/// Draws the next piece from the queue and puts it at the spawn point.
/// Returns false when it overlaps the stack, which ends the game.
pub fn spawn_piece(world: &mut World) -> bool {
    let piece_type = world.resource_mut::<SpawnQueue>().advance();
    place_piece(world, ActivePiece::spawn(piece_type))
}

fn place_piece(world: &mut World, piece: ActivePiece) -> bool {
    if piece.overlaps(world.resource::<Board>()) {
        info!("{} cannot spawn, the stack is topped out", piece.piece_type.name());
        world.resource_mut::<Session>().topped_out = true;
        return false;
    }

    let mut ghost = Ghost::default();
    ghost.refresh(&piece, world.resource::<Board>());
    world.resource_mut::<GravityClock>().reset_accumulator();
    world.spawn((piece, ghost));
    true
}

pub fn input_system(world: &mut World) {
    let input = world.resource::<Input>().clone();

    let Some((entity, mut piece)) = active_piece(world) else {
        return;
    };

    // The soft drop run ends as soon as the key is let go
    if !input.soft_drop {
        piece.soft_drop_distance = 0;
    }

    // Hard drop wins over everything else this frame
    if input.hard_drop {
        handle_hard_drop(world, entity, piece);
        return;
    }

    if input.hold && try_hold(world, entity, &piece) {
        return;
    }

    {
        let board = world.resource::<Board>();
        let rotation = input.rotation();
        if rotation != 0 {
            piece.try_rotate(board, rotation);
        } else {
            piece.try_shift(board, input.horizontal());
        }
    }

    world.entity_mut(entity).insert(piece);
}

// Separate function for hard drop to keep the borrows short
fn handle_hard_drop(world: &mut World, entity: Entity, mut piece: ActivePiece) {
    let rows = piece.hard_drop(world.resource::<Board>());
    debug!("Hard drop of {rows} rows");

    world.resource_mut::<ScoreState>().award_hard_drop(rows);
    play(world, SoundCue::HardDrop);
    trigger_hard_drop_shake(world, rows);

    lock_piece(world, entity, &piece, DropKind::HardDrop);
}

fn try_hold(world: &mut World, entity: Entity, piece: &ActivePiece) -> bool {
    if !world.resource::<Rules>().hold_enabled || !piece.can_hold {
        trace!("Hold ignored");
        return false;
    }

    let next = match world.resource_mut::<SpawnQueue>().hold() {
        HoldOutcome::Empty => return false,
        HoldOutcome::Stored => world.resource_mut::<SpawnQueue>().advance(),
        HoldOutcome::Swapped(previous) => previous,
    };
    debug!("Holding {}, playing {}", piece.piece_type.name(), next.name());

    world.despawn(entity);
    play(world, SoundCue::Hold);
    place_piece(world, held_replacement(next));
    true
}

// A piece brought in by hold cannot be held again before it locks
fn held_replacement(piece_type: PieceType) -> ActivePiece {
    let mut piece = ActivePiece::spawn(piece_type);
    piece.can_hold = false;
    piece
}

/// Gravity. Suspended while a line clear is pending.
pub fn gravity_system(world: &mut World, delta_seconds: f32) {
    if world.resource::<LineClear>().is_active() {
        return;
    }

    let soft_drop = world.resource::<Input>().soft_drop;
    if !world
        .resource_mut::<GravityClock>()
        .advance(delta_seconds, soft_drop)
    {
        return;
    }

    let Some((entity, mut piece)) = active_piece(world) else {
        return;
    };

    match piece.fall(world.resource::<Board>()) {
        FallOutcome::Moved => {
            if soft_drop {
                piece.soft_drop_distance += 1;
                world.resource_mut::<ScoreState>().award_soft_drop(1);
            }
            world.entity_mut(entity).insert(piece);
        }
        FallOutcome::Landed => {
            let kind = if soft_drop {
                DropKind::SoftDrop
            } else {
                DropKind::Gravity
            };
            lock_piece(world, entity, &piece, kind);
        }
    }
}

/// Writes the piece into the board, removes it and either starts a line
/// clear or brings in the next piece
pub fn lock_piece(world: &mut World, entity: Entity, piece: &ActivePiece, kind: DropKind) {
    debug!("Locking {} ({kind:?})", piece.piece_type.name());

    {
        let mut board = world.resource_mut::<Board>();
        let color = piece.piece_type.color();
        for (row, col) in piece.grid_cells() {
            board.place(row, col, color);
        }
    }
    world.despawn(entity);

    // Locking above the board ends the game, whatever the next spawn does
    let above_board = piece.grid_cells().iter().any(|&(row, _)| row < 0);
    {
        let mut session = world.resource_mut::<Session>();
        session.last_drop = Some(kind);
        session.pieces_locked += 1;
        if above_board {
            session.topped_out = true;
        }
    }
    play(world, SoundCue::Lock);
    if above_board {
        info!("{} locked above the board", piece.piece_type.name());
        return;
    }

    let rows = world.resource_scope(|world, mut line_clear: Mut<LineClear>| {
        line_clear.begin(&mut world.resource_mut::<Board>())
    });
    if rows == 0 {
        spawn_piece(world);
    }
}

/// Runs the flash pause and, once it is over, scores the cleared rows and
/// spawns the next piece
pub fn line_clear_system(world: &mut World, delta_seconds: f32) {
    let cleared = world.resource_scope(|world, mut line_clear: Mut<LineClear>| {
        line_clear.advance(&mut world.resource_mut::<Board>(), delta_seconds)
    });
    let Some(rows) = cleared else {
        return;
    };

    let (award, level) = {
        let mut score = world.resource_mut::<ScoreState>();
        (score.award_lines(rows), score.level)
    };
    trace!("Clear of {rows} rows worth {} points", award.points);

    play(
        world,
        if rows >= 4 {
            SoundCue::FourRowClear
        } else {
            SoundCue::RowClear
        },
    );
    if award.leveled_up {
        world.resource_mut::<GravityClock>().set_level(level);
        play(world, SoundCue::LevelUp);
    }
    trigger_line_clear_shake(world, rows);

    spawn_piece(world);
}

/// Keeps every ghost in step with its piece
pub fn ghost_system(world: &mut World) {
    world.resource_scope(|world, board: Mut<Board>| {
        let mut query = world.query::<(&ActivePiece, &mut Ghost)>();
        for (piece, mut ghost) in query.iter_mut(world) {
            ghost.refresh(piece, &board);
        }
    });
}

/// One frame of play
pub fn playing_frame(world: &mut World, delta_seconds: f32) {
    trace!("Game tick with delta: {delta_seconds}");

    input_system(world);
    line_clear_system(world, delta_seconds);
    gravity_system(world, delta_seconds);
    ghost_system(world);
    update_screen_shake(world, delta_seconds);
}
