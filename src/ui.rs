#![allow(
    // Allow truncation when casting cell indices to u16 since they are bounded by the board size
    clippy::cast_possible_truncation,
    // Allow sign loss when casting cell indices since they are bounds checked first
    clippy::cast_sign_loss
)]

use bevy_ecs::world::World;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::App;
use crate::board::Board;
use crate::components::{GamePhase, Rules, ScreenShake};
use crate::game::{BOARD_HEIGHT, BOARD_WIDTH, PREVIEW_ORIGIN};
use crate::highscores::{HighScoreStore, HighScoreTable, NameEntry};
use crate::input::{Action, KeyBindings};
use crate::line_clear::LineClear;
use crate::menu::{MenuNodeKind, Menus, ToggleTarget};
use crate::scene::{Appearance, SpriteLayer, Transform};
use crate::scoring::ScoreState;
use crate::spawn::SpawnQueue;

const CELL_WIDTH: u16 = 2; // Each cell is 2 characters wide
const BOARD_PIXEL_WIDTH: u16 = BOARD_WIDTH as u16 * CELL_WIDTH + 2; // +2 for borders
const BOARD_PIXEL_HEIGHT: u16 = BOARD_HEIGHT as u16 + 2;
const INFO_WIDTH: u16 = 24;

// The preview box is 4 cells wide and 2 tall around its parking spot
const PREVIEW_COLUMNS: u16 = 4;
const PREVIEW_ROWS: u16 = 2;

struct Sprite {
    position: (f32, f32),
    color: Color,
    layer: SpriteLayer,
}

pub fn render(f: &mut Frame, app: &mut App) {
    let min_width = BOARD_PIXEL_WIDTH + INFO_WIDTH;
    let min_height = BOARD_PIXEL_HEIGHT + 2;

    if f.area().width < min_width || f.area().height < min_height {
        let warning_text = Paragraph::new(
            "Terminal too small!\nPlease resize your terminal\nto continue playing.",
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Falling Blocks"),
        );
        f.render_widget(warning_text, centered_rect(50, 30, f.area()));
        return;
    }

    match app.phase() {
        GamePhase::Menu => render_menu(f, app),
        phase => render_game(f, app, phase),
    }
}

fn render_menu(f: &mut Frame, app: &App) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        "FALLING BLOCKS",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let menus = app.world.resource::<Menus>();
    let page = menus.current_page();
    let rules = app.world.resource::<Rules>();
    let bindings = app.world.resource::<KeyBindings>();

    let mut lines = vec![
        Line::from(Span::styled(
            page.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::default(),
    ];

    if menus.is_showing_scores() {
        let store = app.world.resource::<HighScoreStore>();
        let ruleset = app.ruleset();
        lines.push(Line::from(ruleset.title()));
        lines.extend(score_lines(store.table(ruleset), None));
        lines.push(Line::default());
    }

    for (i, node) in page.nodes.iter().enumerate() {
        let label = match node.kind {
            MenuNodeKind::Toggle(ToggleTarget::Ghost) => {
                format!("{}: {}", node.label, on_off(rules.ghost_enabled))
            }
            MenuNodeKind::Toggle(ToggleTarget::Hold) => {
                format!("{}: {}", node.label, on_off(rules.hold_enabled))
            }
            MenuNodeKind::Remap(action) if menus.awaiting_key() == Some(action) => {
                format!("{}: press a key...", node.label)
            }
            MenuNodeKind::Remap(action) => {
                format!("{}: {}", node.label, key_list(bindings, action))
            }
            _ => node.label.clone(),
        };
        let style = if i == page.selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(label, style)));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, chunks[1]);
}

fn render_game(f: &mut Frame, app: &mut App, phase: GamePhase) {
    // Get screen shake offset if active
    let (shake_x, shake_y) = app.world.resource::<ScreenShake>().current_offset;
    let area = f.area();
    let shake_area = Rect {
        x: offset(area.x, shake_x),
        y: offset(area.y, shake_y),
        width: area.width.saturating_sub(shake_x.unsigned_abs()),
        height: area.height.saturating_sub(shake_y.unsigned_abs()),
    };

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BOARD_PIXEL_WIDTH),
            Constraint::Min(INFO_WIDTH),
        ])
        .split(shake_area);

    let board_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(BOARD_PIXEL_HEIGHT),
            Constraint::Fill(1),
        ])
        .split(main_layout[0]);

    let sprites = collect_sprites(&mut app.world);
    let board_area = board_layout[1];
    render_board(f, &sprites, board_area);
    render_info(f, app, &sprites, main_layout[1]);

    let inner = Block::default().borders(Borders::ALL).inner(board_area);
    match phase {
        GamePhase::Paused => {
            render_banner(f, inner, "PAUSED", Color::Yellow);
        }
        GamePhase::GameOver => {
            render_banner(f, inner, "GAME OVER", Color::Red);
        }
        GamePhase::HighScore => render_name_entry(f, app, centered_rect(80, 60, area)),
        _ => {}
    }
}

fn offset(origin: u16, shift: i16) -> u16 {
    origin.saturating_add_signed(shift)
}

fn collect_sprites(world: &mut World) -> Vec<Sprite> {
    let mut sprites: Vec<Sprite> = world
        .query::<(&Transform, &Appearance, &SpriteLayer)>()
        .iter(world)
        .filter(|(_, appearance, _)| appearance.visible)
        .map(|(transform, appearance, layer)| Sprite {
            position: (transform.translation.x, transform.translation.y),
            color: appearance.color,
            layer: *layer,
        })
        .collect();
    sprites.sort_by_key(|sprite| sprite.layer);
    sprites
}

fn set_block(f: &mut Frame, x: u16, y: u16, symbol: &str, color: Color) {
    for dx in 0..CELL_WIDTH {
        if let Some(cell) = f.buffer_mut().cell_mut((x + dx, y)) {
            cell.set_symbol(symbol);
            cell.set_fg(color);
            cell.set_bg(Color::Black);
        }
    }
}

fn render_board(f: &mut Frame, sprites: &[Sprite], area: Rect) {
    let inner_area = Block::default().borders(Borders::ALL).inner(area);
    f.render_widget(Block::default().borders(Borders::ALL), area);

    for sprite in sprites {
        let symbol = match sprite.layer {
            SpriteLayer::Locked | SpriteLayer::Active => "█",
            SpriteLayer::Ghost => "░",
            SpriteLayer::Preview | SpriteLayer::Held => continue,
        };
        let row = Board::row_index(sprite.position.1);
        let col = Board::column_index(sprite.position.0);
        if !Board::is_row_in_bounds(row) || !Board::is_column_in_bounds(col) {
            continue;
        }
        let x = inner_area.left() + col as u16 * CELL_WIDTH;
        let y = inner_area.top() + row as u16;
        if x < inner_area.right() && y < inner_area.bottom() {
            set_block(f, x, y, symbol, sprite.color);
        }
    }
}

fn render_preview(f: &mut Frame, sprites: &[Sprite], area: Rect) {
    for sprite in sprites.iter().filter(|s| s.layer == SpriteLayer::Preview) {
        let col = (sprite.position.0 - PREVIEW_ORIGIN.0 + 2.0).floor();
        let row = (sprite.position.1 - PREVIEW_ORIGIN.1 + 1.0).floor();
        if col < 0.0 || row < 0.0 {
            continue;
        }
        let (col, row) = (col as u16, row as u16);
        if col >= PREVIEW_COLUMNS || row >= PREVIEW_ROWS {
            continue;
        }
        let x = area.left() + col * CELL_WIDTH;
        let y = area.top() + row;
        if x + 1 < area.right() && y < area.bottom() {
            set_block(f, x, y, "█", sprite.color);
        }
    }
}

fn render_info(f: &mut Frame, app: &App, sprites: &[Sprite], area: Rect) {
    let info_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),                // Title
            Constraint::Length(5),                // Score
            Constraint::Length(PREVIEW_ROWS + 2), // Next piece
            Constraint::Length(3),                // Hold and rules
            Constraint::Min(5),                   // Controls
        ])
        .split(area);

    let info_title = Paragraph::new("FALLING BLOCKS")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(info_title, info_layout[0]);

    let score = app.world.resource::<ScoreState>();
    let elapsed = app.world.resource::<crate::Time>().elapsed_seconds();
    let mut stats = format!(
        "Score: {}\nLevel: {}\nLines: {}\nTime:  {:.0}s",
        score.score, score.level, score.lines, elapsed
    );
    let clearing = app.world.resource::<LineClear>().pending_rows();
    if clearing > 0 {
        stats.push_str(&format!("  Clear x{clearing}"));
    }
    f.render_widget(
        Paragraph::new(stats).wrap(Wrap { trim: true }),
        info_layout[1],
    );

    let next_block = Block::default().borders(Borders::ALL).title("Next");
    let next_area = next_block.inner(info_layout[2]);
    f.render_widget(next_block, info_layout[2]);
    render_preview(f, sprites, next_area);

    let rules = app.world.resource::<Rules>();
    let held = app
        .world
        .resource::<SpawnQueue>()
        .held()
        .map_or("-", |piece| piece.name());
    let hold_text = if rules.hold_enabled {
        format!("Hold: {held}\n{}", app.ruleset().title())
    } else {
        format!("Hold: off\n{}", app.ruleset().title())
    };
    f.render_widget(Paragraph::new(hold_text), info_layout[3]);

    let bindings = app.world.resource::<KeyBindings>();
    let controls: Vec<Line> = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::RotateLeft,
        Action::RotateRight,
        Action::SoftDrop,
        Action::HardDrop,
        Action::Hold,
        Action::Pause,
    ]
    .iter()
    .map(|&action| Line::from(format!("{}: {}", action.label(), key_list(bindings, action))))
    .collect();
    let controls = Paragraph::new(Text::from(controls))
        .block(Block::default().borders(Borders::TOP).title("Controls"))
        .wrap(Wrap { trim: true });
    f.render_widget(controls, info_layout[4]);
}

fn render_banner(f: &mut Frame, area: Rect, text: &str, color: Color) {
    let width = (text.len() as u16 + 2).min(area.width);
    let banner_area = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height / 2,
        width,
        height: 1,
    };
    let banner = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD));
    f.render_widget(Clear, banner_area);
    f.render_widget(banner, banner_area);
}

fn render_name_entry(f: &mut Frame, app: &App, area: Rect) {
    let name_entry = app.world.resource::<NameEntry>();
    let store = app.world.resource::<HighScoreStore>();
    let Some((ruleset, position)) = name_entry.target() else {
        return;
    };

    let prompt = if name_entry.is_capturing() {
        "New high score! Type your name and press Enter"
    } else {
        "Saved. Press Enter to return to the menu"
    };
    let editing = name_entry
        .is_capturing()
        .then(|| (position, format!("{}_", name_entry.name())));

    let mut lines = vec![Line::from(prompt), Line::default()];
    lines.extend(score_lines(store.table(ruleset), editing));

    let popup = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(ruleset.title()),
        );
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn score_lines(table: &HighScoreTable, editing: Option<(usize, String)>) -> Vec<Line<'static>> {
    if table.is_empty() {
        return vec![Line::from("No scores yet")];
    }
    table
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let name = match &editing {
                Some((position, typed)) if *position == i => typed.clone(),
                _ => entry.name.clone(),
            };
            let text = format!(
                "{:>2}. {:<11} {:>7} {:>4} {:>3}",
                i + 1,
                name,
                entry.score,
                entry.lines,
                entry.level
            );
            if entry.unsaved {
                Line::from(Span::styled(text, Style::default().fg(Color::Yellow)))
            } else {
                Line::from(text)
            }
        })
        .collect()
}

fn key_list(bindings: &KeyBindings, action: Action) -> String {
    let keys: Vec<String> = bindings.keys(action).iter().map(ToString::to_string).collect();
    if keys.is_empty() {
        "unbound".to_string()
    } else {
        keys.join("/")
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

/// Helper function to create a centered rect using up certain percentage of the available rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
