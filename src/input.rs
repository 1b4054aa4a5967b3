#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::components::Input;

/// A physical key as reported by the frame driver. Serialized as its name
/// ("Left", "Space") or as the bare character for printable keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Key {
    Char(char),
    Left,
    Right,
    Up,
    Down,
    Enter,
    Space,
    Backspace,
    Delete,
    Esc,
    Tab,
}

impl Key {
    /// Letters are stored lowercase so bindings ignore shift
    #[must_use]
    pub fn normalized(self) -> Self {
        match self {
            Key::Char(' ') => Key::Space,
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Left => write!(f, "Left"),
            Key::Right => write!(f, "Right"),
            Key::Up => write!(f, "Up"),
            Key::Down => write!(f, "Down"),
            Key::Enter => write!(f, "Enter"),
            Key::Space => write!(f, "Space"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Delete => write!(f, "Delete"),
            Key::Esc => write!(f, "Esc"),
            Key::Tab => write!(f, "Tab"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey(pub String);

impl fmt::Display for UnknownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key name {:?}", self.0)
    }
}

impl FromStr for Key {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s {
            "Left" => Key::Left,
            "Right" => Key::Right,
            "Up" => Key::Up,
            "Down" => Key::Down,
            "Enter" => Key::Enter,
            "Space" => Key::Space,
            "Backspace" => Key::Backspace,
            "Delete" => Key::Delete,
            "Esc" => Key::Esc,
            "Tab" => Key::Tab,
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => return Err(UnknownKey(s.to_string())),
                }
            }
        };
        Ok(key.normalized())
    }
}

impl TryFrom<String> for Key {
    type Error = UnknownKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.to_string()
    }
}

/// Raw key snapshot for one frame: keys pressed this frame, keys currently
/// held down and the shift modifier.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    pressed: Vec<Key>,
    held: Vec<Key>,
    shift: bool,
}

impl KeyState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key that went down this frame (typed order is kept)
    #[must_use]
    pub fn press(mut self, key: Key) -> Self {
        self.pressed.push(key);
        self
    }

    /// Records a key that is being held down
    #[must_use]
    pub fn hold(mut self, key: Key) -> Self {
        self.held.push(key);
        self
    }

    #[must_use]
    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    #[must_use]
    pub fn is_pressed(&self, key: Key) -> bool {
        let key = key.normalized();
        self.pressed.iter().any(|k| k.normalized() == key)
    }

    /// Held or pressed this frame
    #[must_use]
    pub fn is_down(&self, key: Key) -> bool {
        let key = key.normalized();
        self.is_pressed(key) || self.held.iter().any(|k| k.normalized() == key)
    }

    #[must_use]
    pub fn shift(&self) -> bool {
        self.shift
    }

    /// Keys pressed this frame, in order
    #[must_use]
    pub fn pressed(&self) -> &[Key] {
        &self.pressed
    }

    /// Pressed keys translated for text capture
    pub fn typed(&self) -> impl Iterator<Item = TypedKey> + '_ {
        self.pressed.iter().filter_map(|key| match *key {
            Key::Char(c) if self.shift => Some(TypedKey::Char(c.to_ascii_uppercase())),
            Key::Char(c) => Some(TypedKey::Char(c)),
            Key::Space => Some(TypedKey::Char(' ')),
            Key::Backspace | Key::Delete => Some(TypedKey::Erase),
            Key::Enter => Some(TypedKey::Commit),
            _ => None,
        })
    }
}

/// A keystroke as seen by text capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypedKey {
    Char(char),
    Erase,
    Commit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    RotateLeft,
    RotateRight,
    SoftDrop,
    HardDrop,
    Hold,
    Pause,
    MenuUp,
    MenuDown,
    Confirm,
    Back,
}

impl Action {
    pub const ALL: [Action; 12] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::RotateLeft,
        Action::RotateRight,
        Action::SoftDrop,
        Action::HardDrop,
        Action::Hold,
        Action::Pause,
        Action::MenuUp,
        Action::MenuDown,
        Action::Confirm,
        Action::Back,
    ];

    /// Gameplay actions share keys with menu actions freely, but not with
    /// each other
    #[must_use]
    pub fn is_gameplay(self) -> bool {
        !matches!(
            self,
            Action::MenuUp | Action::MenuDown | Action::Confirm | Action::Back
        )
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Action::MoveLeft => "Move left",
            Action::MoveRight => "Move right",
            Action::RotateLeft => "Rotate left",
            Action::RotateRight => "Rotate right",
            Action::SoftDrop => "Soft drop",
            Action::HardDrop => "Hard drop",
            Action::Hold => "Hold",
            Action::Pause => "Pause",
            Action::MenuUp => "Menu up",
            Action::MenuDown => "Menu down",
            Action::Confirm => "Confirm",
            Action::Back => "Back",
        }
    }
}

/// Request to bind `key` to `action`, produced by the controls menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemapRequest {
    pub action: Action,
    pub key: Key,
}

#[derive(Resource, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub move_left: Vec<Key>,
    pub move_right: Vec<Key>,
    pub rotate_left: Vec<Key>,
    pub rotate_right: Vec<Key>,
    pub soft_drop: Vec<Key>,
    pub hard_drop: Vec<Key>,
    pub hold: Vec<Key>,
    pub pause: Vec<Key>,
    pub menu_up: Vec<Key>,
    pub menu_down: Vec<Key>,
    pub confirm: Vec<Key>,
    pub back: Vec<Key>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec![Key::Left, Key::Char('a')],
            move_right: vec![Key::Right, Key::Char('d')],
            rotate_left: vec![Key::Char('s'), Key::Char('z')],
            rotate_right: vec![Key::Up, Key::Char('w')],
            soft_drop: vec![Key::Down],
            hard_drop: vec![Key::Space],
            hold: vec![Key::Char('c'), Key::Tab],
            pause: vec![Key::Esc, Key::Char('p')],
            menu_up: vec![Key::Up, Key::Char('w')],
            menu_down: vec![Key::Down, Key::Char('s')],
            confirm: vec![Key::Enter, Key::Space],
            back: vec![Key::Esc, Key::Backspace],
        }
    }
}

impl KeyBindings {
    #[must_use]
    pub fn keys(&self, action: Action) -> &[Key] {
        match action {
            Action::MoveLeft => &self.move_left,
            Action::MoveRight => &self.move_right,
            Action::RotateLeft => &self.rotate_left,
            Action::RotateRight => &self.rotate_right,
            Action::SoftDrop => &self.soft_drop,
            Action::HardDrop => &self.hard_drop,
            Action::Hold => &self.hold,
            Action::Pause => &self.pause,
            Action::MenuUp => &self.menu_up,
            Action::MenuDown => &self.menu_down,
            Action::Confirm => &self.confirm,
            Action::Back => &self.back,
        }
    }

    fn keys_mut(&mut self, action: Action) -> &mut Vec<Key> {
        match action {
            Action::MoveLeft => &mut self.move_left,
            Action::MoveRight => &mut self.move_right,
            Action::RotateLeft => &mut self.rotate_left,
            Action::RotateRight => &mut self.rotate_right,
            Action::SoftDrop => &mut self.soft_drop,
            Action::HardDrop => &mut self.hard_drop,
            Action::Hold => &mut self.hold,
            Action::Pause => &mut self.pause,
            Action::MenuUp => &mut self.menu_up,
            Action::MenuDown => &mut self.menu_down,
            Action::Confirm => &mut self.confirm,
            Action::Back => &mut self.back,
        }
    }

    /// Makes `key` the only binding of the action and unbinds it from the
    /// other actions of the same group
    pub fn apply(&mut self, request: RemapRequest) {
        let key = request.key.normalized();
        for action in Action::ALL {
            if action != request.action && action.is_gameplay() == request.action.is_gameplay() {
                self.keys_mut(action).retain(|k| k.normalized() != key);
            }
        }
        *self.keys_mut(request.action) = vec![key];
    }

    fn pressed(&self, keys: &KeyState, action: Action) -> bool {
        self.keys(action).iter().any(|&key| keys.is_pressed(key))
    }

    fn down(&self, keys: &KeyState, action: Action) -> bool {
        self.keys(action).iter().any(|&key| keys.is_down(key))
    }

    /// Resolves the raw snapshot into logical actions. Soft drop follows the
    /// held state; everything else reacts to presses.
    #[must_use]
    pub fn resolve(&self, keys: &KeyState) -> Input {
        Input {
            move_left: self.pressed(keys, Action::MoveLeft),
            move_right: self.pressed(keys, Action::MoveRight),
            rotate_left: self.pressed(keys, Action::RotateLeft),
            rotate_right: self.pressed(keys, Action::RotateRight),
            soft_drop: self.down(keys, Action::SoftDrop),
            hard_drop: self.pressed(keys, Action::HardDrop),
            hold: self.pressed(keys, Action::Hold),
            pause: self.pressed(keys, Action::Pause),
            menu_up: self.pressed(keys, Action::MenuUp),
            menu_down: self.pressed(keys, Action::MenuDown),
            confirm: self.pressed(keys, Action::Confirm),
            back: self.pressed(keys, Action::Back),
        }
    }
}
