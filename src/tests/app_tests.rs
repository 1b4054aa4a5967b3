#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::Time;
    use crate::app::App;
    use crate::board::Board;
    use crate::components::{GamePhase, Rules};
    use crate::config::Config;
    use crate::config::loader::load_config_from;
    use crate::gravity::{GravityClock, interval_for_level};
    use crate::highscores::{HighScoreEntry, HighScoreStore, NameEntry, Ruleset};
    use crate::input::{Key, KeyBindings, KeyState};
    use crate::scoring::ScoreState;
    use crate::sound::SoundCue;
    use crate::spawn::SpawnQueue;
    use crate::tests::test_utils::{active, active_count, fill_row_except};
    use tempfile::tempdir;

    const FRAME: f32 = 0.016;

    fn new_app() -> App {
        App::with_store(Config::default(), None, HighScoreStore::in_memory())
    }

    fn press(app: &mut App, key: Key) {
        app.advance(FRAME, &KeyState::new().press(key));
    }

    fn idle(app: &mut App, delta_seconds: f32) {
        app.advance(delta_seconds, &KeyState::new());
    }

    // Main menu -> Start -> Level 0
    fn start_level_zero(app: &mut App) {
        press(app, Key::Enter);
        press(app, Key::Enter);
    }

    // Leaves no room for the next piece: the current one cannot fall and
    // every shape spawns over (1, 5)
    fn top_out(app: &mut App) {
        fill_row_except(&mut app.world.resource_mut::<Board>(), 2, &[0]);
        press(app, Key::Space);
    }

    #[test]
    fn test_menu_starts_game() {
        let mut app = new_app();
        assert_eq!(app.phase(), GamePhase::Menu);

        start_level_zero(&mut app);
        assert_eq!(app.phase(), GamePhase::Playing);
        assert_eq!(active_count(&mut app.world), 1);
        assert!(app.world.resource::<SpawnQueue>().preview().is_some());
        assert_eq!(*app.world.resource::<ScoreState>(), ScoreState::new(0));
    }

    #[test]
    fn test_starting_level_sets_gravity() {
        let mut app = new_app();
        press(&mut app, Key::Enter);
        for _ in 0..3 {
            press(&mut app, Key::Down);
        }
        press(&mut app, Key::Enter);

        assert_eq!(app.phase(), GamePhase::Playing);
        assert_eq!(app.world.resource::<ScoreState>().level, 3);
        assert!(
            (app.world.resource::<GravityClock>().interval() - interval_for_level(3)).abs()
                < f32::EPSILON
        );
    }

    #[test]
    fn test_pause_and_cooldown() {
        let mut app = new_app();
        start_level_zero(&mut app);

        press(&mut app, Key::Esc);
        assert_eq!(app.phase(), GamePhase::Paused);

        // Nothing moves while paused
        let origin = active(&mut app.world).origin;
        idle(&mut app, 5.0);
        assert_eq!(active(&mut app.world).origin, origin);

        press(&mut app, Key::Char('p'));
        assert_eq!(app.phase(), GamePhase::Playing);

        // Pausing again right away is refused
        press(&mut app, Key::Esc);
        assert_eq!(app.phase(), GamePhase::Playing);

        idle(&mut app, 0.5);
        press(&mut app, Key::Esc);
        assert_eq!(app.phase(), GamePhase::Paused);
    }

    #[test]
    fn test_play_time_stops_while_paused() {
        let mut app = new_app();
        start_level_zero(&mut app);

        idle(&mut app, 0.5);
        press(&mut app, Key::Esc);
        idle(&mut app, 1.0);

        assert!((app.world.resource::<Time>().elapsed_seconds() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_top_out_enters_name_entry() {
        let mut app = new_app();
        start_level_zero(&mut app);
        app.drain_sound_cues();

        top_out(&mut app);
        assert_eq!(app.phase(), GamePhase::HighScore);
        assert!(app.world.resource::<NameEntry>().is_capturing());
        assert!(app.drain_sound_cues().contains(&SoundCue::GameOver));

        // Back is ignored until a name is committed
        press(&mut app, Key::Esc);
        assert_eq!(app.phase(), GamePhase::HighScore);

        app.advance(
            FRAME,
            &KeyState::new()
                .press(Key::Char('a'))
                .press(Key::Char('b'))
                .press(Key::Enter),
        );
        let name_entry = app.world.resource::<NameEntry>();
        assert!(name_entry.is_committed());
        assert_eq!(app.phase(), GamePhase::HighScore);

        let table = app
            .world
            .resource::<HighScoreStore>()
            .table(Ruleset::GhostHold);
        assert_eq!(table.len(), 1);
        assert_eq!(table.entries()[0].name, "ab");
        assert!(!table.entries()[0].unsaved);

        press(&mut app, Key::Enter);
        assert_eq!(app.phase(), GamePhase::Menu);
    }

    #[test]
    fn test_low_score_goes_to_game_over() {
        let mut store = HighScoreStore::in_memory();
        for i in 0..10 {
            store.insert(
                Ruleset::GhostHold,
                HighScoreEntry::new("pro", 1000 + i, 10, 1),
            );
        }
        let mut app = App::with_store(Config::default(), None, store);
        start_level_zero(&mut app);

        top_out(&mut app);
        assert_eq!(app.phase(), GamePhase::GameOver);
        assert!(!app.world.resource::<NameEntry>().is_capturing());

        press(&mut app, Key::Esc);
        assert_eq!(app.phase(), GamePhase::Menu);
    }

    #[test]
    fn test_return_to_menu_resets_the_game() {
        let mut app = new_app();
        start_level_zero(&mut app);
        press(&mut app, Key::Char('c'));
        assert!(app.world.resource::<SpawnQueue>().held().is_some());
        idle(&mut app, 0.5);

        app.return_to_menu();
        idle(&mut app, FRAME);

        assert_eq!(app.phase(), GamePhase::Menu);
        assert_eq!(active_count(&mut app.world), 0);
        assert_eq!(app.world.resource::<Board>().occupied_count(), 0);
        let queue = app.world.resource::<SpawnQueue>();
        assert!(queue.held().is_none());
        assert!(queue.preview().is_none());
        assert_eq!(*app.world.resource::<ScoreState>(), ScoreState::new(0));
        assert!(app.world.resource::<Time>().elapsed_seconds().abs() < f32::EPSILON);
        assert!(!app.world.resource::<NameEntry>().is_capturing());

        // A fresh game starts cleanly afterwards
        start_level_zero(&mut app);
        assert_eq!(app.phase(), GamePhase::Playing);
        assert_eq!(active_count(&mut app.world), 1);
    }

    #[test]
    fn test_toggle_persists_config() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("config.toml");
        let mut app = App::with_store(
            Config::default(),
            Some(path.clone()),
            HighScoreStore::in_memory(),
        );

        // Options -> Ghost piece
        press(&mut app, Key::Down);
        press(&mut app, Key::Enter);
        press(&mut app, Key::Enter);

        assert!(!app.world.resource::<Rules>().ghost_enabled);
        assert!(!app.config().rules.ghost_enabled);
        assert_eq!(app.ruleset(), Ruleset::Hold);

        let saved = load_config_from(&path).expect("Failed to load saved config");
        assert!(!saved.rules.ghost_enabled);
        assert!(saved.rules.hold_enabled);
    }

    #[test]
    fn test_remap_from_controls_menu() {
        let mut app = new_app();
        // Options -> Controls -> Move left
        press(&mut app, Key::Down);
        press(&mut app, Key::Enter);
        press(&mut app, Key::Down);
        press(&mut app, Key::Down);
        press(&mut app, Key::Enter);
        press(&mut app, Key::Enter);
        press(&mut app, Key::Char('j'));

        let bindings = app.world.resource::<KeyBindings>();
        assert_eq!(bindings.move_left, vec![Key::Char('j')]);
        assert_eq!(app.config().bindings.move_left, vec![Key::Char('j')]);
    }

    #[test]
    fn test_quit_from_menu() {
        let mut app = new_app();
        press(&mut app, Key::Up);
        assert!(!app.should_quit);
        press(&mut app, Key::Enter);
        assert!(app.should_quit);
    }
}
