#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::Input;
use crate::game::SELECTABLE_LEVELS;
use crate::input::{Action, KeyState, RemapRequest};

/// Index of a page in the menu arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleTarget {
    Ghost,
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuNodeKind {
    StartGame { level: u32 },
    Open(MenuId),
    Toggle(ToggleTarget),
    Remap(Action),
    Back,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuNode {
    pub label: String,
    pub kind: MenuNodeKind,
}

impl MenuNode {
    fn new(label: impl Into<String>, kind: MenuNodeKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuPage {
    pub title: String,
    pub nodes: Vec<MenuNode>,
    pub selected: usize,
    pub parent: Option<MenuId>,
}

/// What the state machine has to do after a menu frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    None,
    StartGame(u32),
    Toggle(ToggleTarget),
    Remap(RemapRequest),
    Quit,
}

#[derive(Resource, Debug, Clone)]
pub struct Menus {
    pages: Vec<MenuPage>,
    current: MenuId,
    main: MenuId,
    scores: MenuId,
    awaiting_key: Option<Action>,
}

impl Default for Menus {
    fn default() -> Self {
        Self::new()
    }
}

impl Menus {
    #[must_use]
    pub fn new() -> Self {
        let mut menus = Self {
            pages: Vec::new(),
            current: MenuId(0),
            main: MenuId(0),
            scores: MenuId(0),
            awaiting_key: None,
        };

        let main = menus.add_page("Falling Blocks", None);
        let level_select = menus.add_page("Starting Level", Some(main));
        let options = menus.add_page("Options", Some(main));
        let controls = menus.add_page("Controls", Some(options));
        let scores = menus.add_page("High Scores", Some(main));

        menus.pages[main.0].nodes = vec![
            MenuNode::new("Start", MenuNodeKind::Open(level_select)),
            MenuNode::new("Options", MenuNodeKind::Open(options)),
            MenuNode::new("High Scores", MenuNodeKind::Open(scores)),
            MenuNode::new("Quit", MenuNodeKind::Quit),
        ];

        let mut levels: Vec<MenuNode> = (0..SELECTABLE_LEVELS)
            .map(|level| {
                MenuNode::new(format!("Level {level}"), MenuNodeKind::StartGame { level })
            })
            .collect();
        levels.push(MenuNode::new("Back", MenuNodeKind::Back));
        menus.pages[level_select.0].nodes = levels;

        menus.pages[options.0].nodes = vec![
            MenuNode::new("Ghost piece", MenuNodeKind::Toggle(ToggleTarget::Ghost)),
            MenuNode::new("Hold piece", MenuNodeKind::Toggle(ToggleTarget::Hold)),
            MenuNode::new("Controls", MenuNodeKind::Open(controls)),
            MenuNode::new("Back", MenuNodeKind::Back),
        ];

        let mut remaps: Vec<MenuNode> = Action::ALL
            .iter()
            .map(|&action| MenuNode::new(action.label(), MenuNodeKind::Remap(action)))
            .collect();
        remaps.push(MenuNode::new("Back", MenuNodeKind::Back));
        menus.pages[controls.0].nodes = remaps;

        menus.pages[scores.0].nodes = vec![MenuNode::new("Back", MenuNodeKind::Back)];

        menus.main = main;
        menus.scores = scores;
        menus.current = main;
        menus
    }

    fn add_page(&mut self, title: &str, parent: Option<MenuId>) -> MenuId {
        self.pages.push(MenuPage {
            title: title.to_string(),
            nodes: Vec::new(),
            selected: 0,
            parent,
        });
        MenuId(self.pages.len() - 1)
    }

    #[must_use]
    pub fn current(&self) -> MenuId {
        self.current
    }

    #[must_use]
    pub fn page(&self, id: MenuId) -> &MenuPage {
        &self.pages[id.0]
    }

    #[must_use]
    pub fn current_page(&self) -> &MenuPage {
        self.page(self.current)
    }

    #[must_use]
    pub fn selected_node(&self) -> Option<&MenuNode> {
        let page = self.current_page();
        page.nodes.get(page.selected)
    }

    /// True while the high score viewer is open
    #[must_use]
    pub fn is_showing_scores(&self) -> bool {
        self.current == self.scores
    }

    /// The action waiting for its new key, if any
    #[must_use]
    pub fn awaiting_key(&self) -> Option<Action> {
        self.awaiting_key
    }

    pub fn open(&mut self, id: MenuId) {
        if id.0 < self.pages.len() {
            debug!("Opening menu page {:?}", self.pages[id.0].title);
            self.current = id;
            self.pages[id.0].selected = 0;
        }
    }

    fn go_back(&mut self) {
        if let Some(parent) = self.current_page().parent {
            self.current = parent;
        }
    }

    pub fn reset_to_main(&mut self) {
        self.awaiting_key = None;
        for page in &mut self.pages {
            page.selected = 0;
        }
        self.current = self.main;
    }

    fn move_selection(&mut self, forward: bool) {
        let page = &mut self.pages[self.current.0];
        let count = page.nodes.len();
        if count == 0 {
            return;
        }
        page.selected = if forward {
            (page.selected + 1) % count
        } else {
            (page.selected + count - 1) % count
        };
    }

    /// Navigates with the resolved input. While a remap is pending the next
    /// raw key press becomes the new binding instead.
    pub fn handle(&mut self, input: &Input, keys: &KeyState) -> MenuCommand {
        if let Some(action) = self.awaiting_key {
            return match keys.pressed().first() {
                Some(&key) => {
                    self.awaiting_key = None;
                    MenuCommand::Remap(RemapRequest { action, key })
                }
                None => MenuCommand::None,
            };
        }

        if input.menu_up {
            self.move_selection(false);
        }
        if input.menu_down {
            self.move_selection(true);
        }
        if input.back {
            self.go_back();
            return MenuCommand::None;
        }
        if !input.confirm {
            return MenuCommand::None;
        }

        let Some(kind) = self.selected_node().map(|node| node.kind) else {
            return MenuCommand::None;
        };
        match kind {
            MenuNodeKind::StartGame { level } => MenuCommand::StartGame(level),
            MenuNodeKind::Open(id) => {
                self.open(id);
                MenuCommand::None
            }
            MenuNodeKind::Toggle(target) => MenuCommand::Toggle(target),
            MenuNodeKind::Remap(action) => {
                debug!("Waiting for a key for {}", action.label());
                self.awaiting_key = Some(action);
                MenuCommand::None
            }
            MenuNodeKind::Back => {
                self.go_back();
                MenuCommand::None
            }
            MenuNodeKind::Quit => MenuCommand::Quit,
        }
    }
}
