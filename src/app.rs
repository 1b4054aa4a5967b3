#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::{debug, error, info};
use std::path::PathBuf;

use crate::Time;
use crate::board::Board;
use crate::components::{GamePhase, Input, Rules, ScreenShake, Session};
use crate::config::Config;
use crate::config::loader::save_config_to;
use crate::gravity::GravityClock;
use crate::highscores::{HighScoreEntry, HighScoreStore, NameEntry, Ruleset};
use crate::input::{KeyBindings, KeyState};
use crate::line_clear::LineClear;
use crate::menu::{MenuCommand, Menus, ToggleTarget};
use crate::pieces::ActivePiece;
use crate::scene::{BoardSprites, apply_board_requests, sync_piece_sprites};
use crate::scoring::ScoreState;
use crate::sound::{AudioState, SoundCue};
use crate::spawn::SpawnQueue;
use crate::systems::{playing_frame, spawn_piece};

/// Owns the simulation world and sequences the game phases. The frame driver
/// calls `advance` once per frame.
pub struct App {
    pub world: World,
    pub should_quit: bool,
    config: Config,
    config_path: Option<PathBuf>,
}

impl App {
    /// Builds the app from a loaded config, reading the high score tables
    /// from the configured directory
    pub fn new(config: Config, config_path: Option<PathBuf>) -> Self {
        let store = HighScoreStore::load(config.highscore_dir());
        Self::with_store(config, config_path, store)
    }

    pub fn with_store(config: Config, config_path: Option<PathBuf>, store: HighScoreStore) -> Self {
        let mut world = World::new();
        world.insert_resource(Time::new());
        world.insert_resource(AudioState::new());
        world.insert_resource(Input::default());
        world.insert_resource(GamePhase::default());
        world.insert_resource(ScreenShake::default());
        world.insert_resource(Board::new());
        world.insert_resource(BoardSprites::default());
        world.insert_resource(SpawnQueue::new());
        world.insert_resource(ScoreState::default());
        world.insert_resource(GravityClock::new(0, config.timing.soft_drop_interval));
        world.insert_resource(LineClear::new(config.timing.clear_pause));
        world.insert_resource(Session::default());
        world.insert_resource(config.rules);
        world.insert_resource(config.bindings.clone());
        world.insert_resource(Menus::new());
        world.insert_resource(NameEntry::default());
        world.insert_resource(store);

        Self {
            world,
            should_quit: false,
            config,
            config_path,
        }
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        *self.world.resource::<GamePhase>()
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The high score table for the current feature toggles
    #[must_use]
    pub fn ruleset(&self) -> Ruleset {
        Ruleset::from(*self.world.resource::<Rules>())
    }

    fn set_phase(&mut self, phase: GamePhase) {
        let mut current = self.world.resource_mut::<GamePhase>();
        if *current != phase {
            debug!("Game phase {:?} -> {phase:?}", *current);
            *current = phase;
        }
    }

    /// Runs one frame: resolves the key snapshot, routes it to the current
    /// phase and brings the sprites up to date
    pub fn advance(&mut self, delta_seconds: f32, keys: &KeyState) {
        self.world.resource_mut::<Time>().update(delta_seconds);
        let input = self.world.resource::<KeyBindings>().resolve(keys);
        self.world.insert_resource(input.clone());

        match self.phase() {
            GamePhase::Menu => self.update_menu(&input, keys),
            GamePhase::Playing => self.update_playing(&input, delta_seconds),
            GamePhase::Paused => self.update_paused(&input),
            GamePhase::GameOver => self.update_game_over(&input),
            GamePhase::HighScore => self.update_high_score(&input, keys),
        }

        apply_board_requests(&mut self.world);
        sync_piece_sprites(&mut self.world);
    }

    /// Sound cues raised since the last call
    pub fn drain_sound_cues(&mut self) -> Vec<SoundCue> {
        self.world.resource_mut::<AudioState>().drain()
    }

    fn update_menu(&mut self, input: &Input, keys: &KeyState) {
        let command = self.world.resource_mut::<Menus>().handle(input, keys);
        match command {
            MenuCommand::None => {}
            MenuCommand::StartGame(level) => self.start_game(level),
            MenuCommand::Toggle(target) => {
                let rules = {
                    let mut rules = self.world.resource_mut::<Rules>();
                    match target {
                        ToggleTarget::Ghost => rules.ghost_enabled = !rules.ghost_enabled,
                        ToggleTarget::Hold => rules.hold_enabled = !rules.hold_enabled,
                    }
                    *rules
                };
                info!(
                    "Ghost piece {}, hold piece {}",
                    on_off(rules.ghost_enabled),
                    on_off(rules.hold_enabled)
                );
                self.config.rules = rules;
                self.persist_config();
            }
            MenuCommand::Remap(request) => {
                info!("Binding {} to {}", request.action.label(), request.key);
                let bindings = {
                    let mut bindings = self.world.resource_mut::<KeyBindings>();
                    bindings.apply(request);
                    bindings.clone()
                };
                self.config.bindings = bindings;
                self.persist_config();
            }
            MenuCommand::Quit => {
                info!("Quit selected");
                self.should_quit = true;
            }
        }
    }

    fn persist_config(&self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(err) = save_config_to(path, &self.config) {
            error!("Failed to save config to {}: {err}", path.display());
        }
    }

    fn start_game(&mut self, level: u32) {
        info!("Starting a game at level {level} ({})", self.ruleset().title());
        *self.world.resource_mut::<ScoreState>() = ScoreState::new(level);
        {
            let mut clock = self.world.resource_mut::<GravityClock>();
            clock.set_level(level);
            clock.reset_accumulator();
        }
        self.world.resource_mut::<Session>().reset();
        self.world.resource_mut::<Time>().reset();
        self.set_phase(GamePhase::Playing);
        spawn_piece(&mut self.world);
    }

    fn update_playing(&mut self, input: &Input, delta_seconds: f32) {
        let can_pause = {
            let mut session = self.world.resource_mut::<Session>();
            session.pause_cooldown = (session.pause_cooldown - delta_seconds).max(0.0);
            session.pause_cooldown <= 0.0
        };
        if input.pause && can_pause {
            self.set_phase(GamePhase::Paused);
            return;
        }

        self.world.resource_mut::<Time>().accumulate_play_time();
        playing_frame(&mut self.world, delta_seconds);

        if self.world.resource::<Session>().topped_out {
            self.finish_game();
        }
    }

    fn update_paused(&mut self, input: &Input) {
        if input.pause {
            self.world.resource_mut::<Session>().pause_cooldown = self.config.timing.pause_cooldown;
            self.set_phase(GamePhase::Playing);
        }
    }

    // The stack reached the spawn point
    fn finish_game(&mut self) {
        let score = self.world.resource::<ScoreState>().clone();
        let ruleset = self.ruleset();
        info!(
            "Game over with {} points, {} lines, level {}",
            score.score, score.lines, score.level
        );
        self.world
            .resource_mut::<AudioState>()
            .play_sound(SoundCue::GameOver);
        self.world.insert_resource(ScreenShake::default());

        let position = {
            let mut store = self.world.resource_mut::<HighScoreStore>();
            if store.qualifies(ruleset, score.score) {
                store.insert(
                    ruleset,
                    HighScoreEntry::new("", score.score, score.lines, score.level),
                )
            } else {
                None
            }
        };

        match position {
            Some(position) => {
                info!("New high score at place {} in {}", position + 1, ruleset.title());
                self.world
                    .resource_mut::<NameEntry>()
                    .begin(ruleset, position);
                self.set_phase(GamePhase::HighScore);
            }
            None => self.set_phase(GamePhase::GameOver),
        }
    }

    fn update_game_over(&mut self, input: &Input) {
        if input.back || input.confirm {
            self.return_to_menu();
        }
    }

    fn update_high_score(&mut self, input: &Input, keys: &KeyState) {
        if self.world.resource::<NameEntry>().is_capturing() {
            let committed = self.world.resource_mut::<NameEntry>().capture(keys);
            if let Some(name) = committed {
                if let Some((ruleset, position)) = self.world.resource::<NameEntry>().target() {
                    self.world
                        .resource_mut::<HighScoreStore>()
                        .commit_name(ruleset, position, &name);
                }
            }
            return;
        }

        if input.back || input.confirm {
            self.return_to_menu();
        }
    }

    /// Clears the board and every per-game counter, discarding the active,
    /// preview and held pieces
    pub fn return_to_menu(&mut self) {
        info!("Returning to the menu");
        self.world.resource_mut::<Board>().clear();

        let pieces: Vec<Entity> = self
            .world
            .query_filtered::<Entity, With<ActivePiece>>()
            .iter(&self.world)
            .collect();
        for entity in pieces {
            self.world.despawn(entity);
        }

        self.world.resource_mut::<ScoreState>().reset();
        self.world.resource_mut::<SpawnQueue>().clear();
        self.world.resource_mut::<LineClear>().reset();
        *self.world.resource_mut::<GravityClock>() =
            GravityClock::new(0, self.config.timing.soft_drop_interval);
        self.world.resource_mut::<Session>().reset();
        self.world.resource_mut::<Time>().reset();
        self.world.resource_mut::<NameEntry>().reset();
        self.world.insert_resource(ScreenShake::default());
        self.world.resource_mut::<Menus>().reset_to_main();
        self.set_phase(GamePhase::Menu);
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}
