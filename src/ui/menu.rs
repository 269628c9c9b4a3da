use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};
use ratatui::Frame;

use crate::config::DifficultyLevel;
use crate::game::GameOverReason;

/// Draws the start screen with the difficulty picker as a centered popup.
pub fn render_start_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    high_score: u32,
    selected: DifficultyLevel,
) {
    let popup = centered_popup(area, 80, 60);
    frame.render_widget(Clear, popup);

    let [title_row, body_row, footer_row] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(6),
        Constraint::Length(2),
    ])
    .areas(popup);

    frame.render_widget(
        Paragraph::new(Line::from("POWER SNAKE"))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        title_row,
    );

    let mut body = vec![
        Line::from(format!("High score: {high_score}")),
        Line::from(""),
    ];
    body.extend(DifficultyLevel::ALL.into_iter().enumerate().map(|(index, level)| {
        difficulty_line(index, level, level == selected)
    }));
    body.push(Line::from(""));
    body.push(Line::from("[Enter]/[Space] Start   [Q] Quit"));

    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" start ")),
        body_row,
    );

    frame.render_widget(
        Paragraph::new(Line::from("Arrows/WASD to steer, 1-3 or ←/→ to pick"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        footer_row,
    );
}

fn difficulty_line(index: usize, level: DifficultyLevel, selected: bool) -> Line<'static> {
    let settings = level.settings();
    let text = format!(
        "{} {}  {}ms, {}% power-ups",
        index + 1,
        level.key().to_uppercase(),
        settings.base_speed_ms,
        (settings.power_up_spawn_chance * 100.0).round()
    );

    if selected {
        Line::from(Span::styled(
            format!("> {text} <"),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(text, Style::default().fg(Color::Gray)))
    }
}

/// Draws the game-over screen as a centered popup.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    score: u32,
    high_score: u32,
    reason: Option<GameOverReason>,
    new_high_score: bool,
) {
    let popup = centered_popup(area, 70, 45);
    frame.render_widget(Clear, popup);

    let cause = reason.map_or_else(String::new, |reason| format!("You {reason}"));
    let lines = vec![
        Line::from("GAME OVER"),
        Line::from(""),
        Line::from(cause),
        Line::from(format!("Score: {score}")),
        Line::from(format!("High score: {high_score}")),
        Line::from(if new_high_score { "New high score!" } else { "" }),
        Line::from(""),
        Line::from("[Enter]/[Space] Restart"),
        Line::from("[Q] Quit"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
