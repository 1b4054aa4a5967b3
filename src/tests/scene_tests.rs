#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::board::Board;
    use crate::components::{Rules, Vec2};
    use crate::pieces::{ActivePiece, PieceType};
    use crate::scene::{
        Appearance, BoardSprites, EntityConfig, SpriteLayer, Transform, apply_board_requests,
        create_entity, destroy_entity, set_position, set_visible, sync_piece_sprites, translate,
    };
    use crate::spawn::SpawnQueue;
    use crate::systems::ghost_system;
    use crate::tests::test_utils::{create_test_world, fill_row_except, spawn_test_piece};
    use bevy_ecs::prelude::*;
    use ratatui::style::Color;

    fn visible_in_layer(world: &mut World, layer: SpriteLayer) -> usize {
        world
            .query::<(&Appearance, &SpriteLayer)>()
            .iter(world)
            .filter(|(appearance, l)| appearance.visible && **l == layer)
            .count()
    }

    fn translation(world: &World, entity: Entity) -> Option<Vec2> {
        world.get::<Transform>(entity).map(|t| t.translation)
    }

    #[test]
    fn test_entity_primitives() {
        let mut world = World::new();
        let entity = create_entity(
            &mut world,
            EntityConfig {
                position: Vec2::new(1.0, 2.0),
                color: Color::Red,
                visible: true,
                layer: SpriteLayer::Locked,
            },
        );

        translate(&mut world, entity, Vec2::new(0.0, 3.0));
        assert_eq!(translation(&world, entity), Some(Vec2::new(1.0, 5.0)));

        set_position(&mut world, entity, Vec2::new(-2.0, 0.0));
        assert_eq!(translation(&world, entity), Some(Vec2::new(-2.0, 0.0)));

        set_visible(&mut world, entity, false);
        assert_eq!(
            world.get::<Appearance>(entity).map(|a| a.visible),
            Some(false)
        );

        destroy_entity(&mut world, entity);
        assert!(translation(&world, entity).is_none());

        // A second destroy is only logged
        destroy_entity(&mut world, entity);
    }

    #[test]
    fn test_placed_blocks_get_sprites() {
        let mut world = create_test_world();
        world.resource_mut::<Board>().place(19, 0, Color::Red);
        apply_board_requests(&mut world);

        let sprites = world.resource::<BoardSprites>().clone();
        assert_eq!(sprites.count(), 1);
        let entity = sprites.get(19, 0).expect("sprite for the locked block");
        assert_eq!(
            translation(&world, entity),
            Some(Vec2::from(Board::cell_center(19, 0)))
        );
        assert_eq!(
            world.get::<Appearance>(entity).copied(),
            Some(Appearance {
                color: Color::Red,
                visible: true
            })
        );

        // Requests are consumed
        assert!(world.resource_mut::<Board>().take_requests().is_empty());
    }

    #[test]
    fn test_shifted_rows_move_their_sprites() {
        let mut world = create_test_world();
        world.resource_mut::<Board>().place(17, 3, Color::Blue);
        apply_board_requests(&mut world);
        let entity = world
            .resource::<BoardSprites>()
            .get(17, 3)
            .expect("sprite");

        world.resource_mut::<Board>().shift_row_down(17, 19);
        apply_board_requests(&mut world);

        let sprites = world.resource::<BoardSprites>();
        assert_eq!(sprites.get(17, 3), None);
        assert_eq!(sprites.get(19, 3), Some(entity));
        assert_eq!(
            translation(&world, entity),
            Some(Vec2::from(Board::cell_center(19, 3)))
        );
    }

    #[test]
    fn test_blocked_shift_keeps_both_sprites() {
        let mut world = create_test_world();
        {
            let mut board = world.resource_mut::<Board>();
            board.place(18, 3, Color::Red);
            board.place(19, 3, Color::Blue);
        }
        apply_board_requests(&mut world);
        let (upper, lower) = {
            let sprites = world.resource::<BoardSprites>();
            (sprites.get(18, 3), sprites.get(19, 3))
        };

        world.resource_mut::<Board>().shift_row_down(18, 19);
        apply_board_requests(&mut world);

        let sprites = world.resource::<BoardSprites>();
        assert_eq!(sprites.get(18, 3), upper);
        assert_eq!(sprites.get(19, 3), lower);
        assert_eq!(sprites.count(), 2);
        let upper = upper.expect("sprite");
        assert_eq!(
            translation(&world, upper),
            Some(Vec2::from(Board::cell_center(18, 3)))
        );
    }

    #[test]
    fn test_flash_and_clear_follow_the_board() {
        let mut world = create_test_world();
        fill_row_except(&mut world.resource_mut::<Board>(), 19, &[]);
        world.resource_mut::<Board>().place(18, 2, Color::Green);
        apply_board_requests(&mut world);
        assert_eq!(world.resource::<BoardSprites>().count(), 11);

        {
            let mut board = world.resource_mut::<Board>();
            board.mark_full_rows();
            board.flash_marked_rows(0.0, 0.25);
        }
        apply_board_requests(&mut world);
        let flashed = world.resource::<BoardSprites>().get(19, 4).expect("sprite");
        let board_color = world.resource::<Board>().cell(19, 4).map(|cell| cell.color);
        assert_eq!(
            world.get::<Appearance>(flashed).map(|a| a.color),
            board_color
        );
        assert_ne!(board_color, Some(Color::Gray));

        world.resource_mut::<Board>().collapse_marked_rows();
        apply_board_requests(&mut world);
        let sprites = world.resource::<BoardSprites>().clone();
        assert_eq!(sprites.count(), 1);
        assert!(sprites.get(19, 2).is_some());
        assert!(translation(&world, flashed).is_none());
    }

    #[test]
    fn test_board_clear_removes_all_sprites() {
        let mut world = create_test_world();
        fill_row_except(&mut world.resource_mut::<Board>(), 19, &[0]);
        apply_board_requests(&mut world);
        let entity = world.resource::<BoardSprites>().get(19, 5).expect("sprite");

        world.resource_mut::<Board>().clear();
        apply_board_requests(&mut world);
        assert_eq!(world.resource::<BoardSprites>().count(), 0);
        assert!(translation(&world, entity).is_none());
    }

    #[test]
    fn test_piece_sprites_follow_the_pieces() {
        let mut world = create_test_world();
        spawn_test_piece(&mut world, ActivePiece::spawn(PieceType::Square));
        ghost_system(&mut world);
        world
            .resource_mut::<SpawnQueue>()
            .advance_with(|| PieceType::Line);

        sync_piece_sprites(&mut world);
        assert_eq!(visible_in_layer(&mut world, SpriteLayer::Active), 4);
        assert_eq!(visible_in_layer(&mut world, SpriteLayer::Ghost), 4);
        assert_eq!(visible_in_layer(&mut world, SpriteLayer::Preview), 4);
        assert_eq!(visible_in_layer(&mut world, SpriteLayer::Held), 0);

        // Ghost sprites sit on the floor
        let lowest_ghost = world
            .query::<(&Transform, &SpriteLayer)>()
            .iter(&world)
            .filter(|(_, layer)| **layer == SpriteLayer::Ghost)
            .map(|(t, _)| Board::row_index(t.translation.y))
            .max();
        assert_eq!(lowest_ghost, Some(19));

        // Pools are created once
        sync_piece_sprites(&mut world);
        assert_eq!(world.query::<&SpriteLayer>().iter(&world).count(), 16);
    }

    #[test]
    fn test_ghost_sprites_hidden_when_disabled() {
        let mut world = create_test_world();
        spawn_test_piece(&mut world, ActivePiece::spawn(PieceType::T));
        ghost_system(&mut world);
        world.insert_resource(Rules {
            ghost_enabled: false,
            hold_enabled: true,
        });

        sync_piece_sprites(&mut world);
        assert_eq!(visible_in_layer(&mut world, SpriteLayer::Active), 4);
        assert_eq!(visible_in_layer(&mut world, SpriteLayer::Ghost), 0);
    }

    #[test]
    fn test_held_piece_stays_hidden() {
        let mut world = create_test_world();
        {
            let mut queue = world.resource_mut::<SpawnQueue>();
            queue.advance_with(|| PieceType::Z);
            queue.hold();
        }

        sync_piece_sprites(&mut world);
        assert_eq!(visible_in_layer(&mut world, SpriteLayer::Held), 0);
        assert_eq!(visible_in_layer(&mut world, SpriteLayer::Active), 0);
        assert_eq!(visible_in_layer(&mut world, SpriteLayer::Preview), 4);
    }
}
