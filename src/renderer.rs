use std::time::Duration;

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::config::{DifficultyLevel, GridSize, GRID};
use crate::game::{GameOverReason, GameSession, Phase};
use crate::power_up::PowerUpKind;
use crate::snake::Position;
use crate::ui::hud::{power_up_glyph, render_hud, HudInfo};
use crate::ui::menu::{render_game_over_menu, render_start_menu};

/// Terminal columns per logical cell, so cells look roughly square.
const CELL_WIDTH: u16 = 2;

const GLYPH_SNAKE_HEAD: &str = "██";
const GLYPH_SNAKE_BODY: &str = "▓▓";
const GLYPH_FOOD: &str = "()";

/// Everything the front-end needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub phase: Phase,
    pub session: Option<&'a GameSession>,
    pub high_score: u32,
    pub selected_level: DifficultyLevel,
    pub outcome: Option<(GameOverReason, bool)>,
    pub now: Duration,
}

/// Renders the full game frame from immutable state.
pub fn render(frame: &mut Frame<'_>, scene: &Scene<'_>) {
    let area = frame.area();
    let hud_area = play_field_rect(area);
    let play_area = render_hud(
        frame,
        hud_area,
        &HudInfo {
            session: scene.session,
            high_score: scene.high_score,
            now: scene.now,
        },
    );

    let shielded = scene
        .session
        .is_some_and(|session| session.effects.active().has_shield());
    let border_color = if shielded { power_up_color(PowerUpKind::Shield) } else { Color::Green };
    let block = Block::bordered().border_style(Style::new().fg(border_color));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    if let Some(session) = scene.session {
        render_food(frame, inner, session);
        render_power_up(frame, inner, session);
        render_snake(frame, inner, session, scene.now);
    }

    match scene.phase {
        Phase::NotStarted => {
            render_start_menu(frame, play_area, scene.high_score, scene.selected_level);
        }
        Phase::GameOver => {
            let (reason, new_high_score) = scene
                .outcome
                .map_or((None, false), |(reason, new_high)| (Some(reason), new_high));
            render_game_over_menu(
                frame,
                play_area,
                scene.session.map_or(0, |session| session.score),
                scene.high_score,
                reason,
                new_high_score,
            );
        }
        Phase::Playing => {}
    }
}

/// Display color for each power-up kind.
#[must_use]
pub fn power_up_color(kind: PowerUpKind) -> Color {
    match kind {
        PowerUpKind::Speed => Color::Yellow,
        PowerUpKind::Slow => Color::LightBlue,
        PowerUpKind::Points => Color::LightMagenta,
        PowerUpKind::Shield => Color::Magenta,
    }
}

/// Centers a field sized for the grid plus border and two HUD rows.
fn play_field_rect(area: Rect) -> Rect {
    let width = GRID.width * CELL_WIDTH + 2;
    let height = GRID.height + 2 + 2;

    let [_, column, _] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(width),
        Constraint::Min(0),
    ])
    .areas(area);
    let [_, field, _] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(height),
        Constraint::Min(0),
    ])
    .areas(column);

    field
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, session: &GameSession) {
    let Some((x, y)) = logical_to_terminal(inner, GRID, session.food) else {
        return;
    };

    frame
        .buffer_mut()
        .set_string(x, y, GLYPH_FOOD, Style::new().fg(Color::Red).add_modifier(Modifier::BOLD));
}

fn render_power_up(frame: &mut Frame<'_>, inner: Rect, session: &GameSession) {
    let Some(power_up) = session.power_up else {
        return;
    };
    let Some((x, y)) = logical_to_terminal(inner, GRID, power_up.position) else {
        return;
    };

    let glyph = power_up_glyph(power_up.kind);
    frame.buffer_mut().set_string(
        x,
        y,
        format!("{glyph}{glyph}"),
        Style::new()
            .fg(power_up_color(power_up.kind))
            .add_modifier(Modifier::BOLD),
    );
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, session: &GameSession, now: Duration) {
    let head = session.snake.head();
    // Blink at 10Hz while the shield's collision signal is raised.
    let dim_head = session.effects.is_blinking() && (now.as_millis() / 100) % 2 == 0;

    let buffer = frame.buffer_mut();
    for (index, segment) in session.snake.segments().enumerate() {
        let Some((x, y)) = logical_to_terminal(inner, GRID, *segment) else {
            continue;
        };

        if index == 0 && *segment == head {
            let color = if dim_head { Color::DarkGray } else { Color::LightGreen };
            buffer.set_string(
                x,
                y,
                GLYPH_SNAKE_HEAD,
                Style::new().fg(color).add_modifier(Modifier::BOLD),
            );
            continue;
        }

        buffer.set_string(x, y, GLYPH_SNAKE_BODY, Style::new().fg(Color::Green));
    }
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
