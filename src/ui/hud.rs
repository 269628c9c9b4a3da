use std::time::Duration;

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::game::GameSession;
use crate::power_up::PowerUpKind;
use crate::renderer::power_up_color;

const SEPARATOR: &str = " │ ";

/// Values the HUD shows besides the session itself.
#[derive(Debug, Clone, Copy)]
pub struct HudInfo<'a> {
    pub session: Option<&'a GameSession>,
    pub high_score: u32,
    pub now: Duration,
}

/// Renders the two-line HUD and returns the remaining play area above it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, info: &HudInfo<'_>) -> Rect {
    let [play_area, stats_area, effects_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let Some(session) = info.session else {
        frame.render_widget(
            Paragraph::new(Line::from(format!("Hi: {}", info.high_score)))
                .alignment(Alignment::Right)
                .style(Style::default().fg(Color::DarkGray)),
            stats_area,
        );
        return play_area;
    };

    frame.render_widget(
        Paragraph::new(stats_line(session, info.high_score, usize::from(stats_area.width)))
            .alignment(Alignment::Right)
            .style(Style::default().fg(Color::DarkGray)),
        stats_area,
    );
    frame.render_widget(
        Paragraph::new(effects_line(session, info.now, usize::from(effects_area.width)))
            .alignment(Alignment::Right),
        effects_area,
    );

    play_area
}

fn stats_line(session: &GameSession, high_score: u32, available_width: usize) -> Line<'static> {
    let full = [
        ("Length", session.snake.len().to_string()),
        ("Score", session.score.to_string()),
        ("Hi", high_score.max(session.score).to_string()),
        ("Tick", format!("{}ms", session.tick_interval.as_millis())),
        ("Mode", session.level.to_string()),
    ];
    let compact = line_width(&full) > available_width;

    let mut spans = Vec::with_capacity(full.len() * 3);
    for (index, (label, value)) in full.into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(SEPARATOR));
        }
        let label = if compact { &label[..1] } else { label };
        spans.push(Span::raw(format!("{label}: ")));
        let highlight = index == 1 && session.score > high_score;
        let style = if highlight {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(value, style));
    }

    Line::from(spans)
}

fn effects_line(session: &GameSession, now: Duration, available_width: usize) -> Line<'static> {
    let mut spans = Vec::new();

    for kind in session.effects.active().iter() {
        spans.push(Span::styled(
            format!("[{}]", kind.label()),
            Style::default()
                .fg(power_up_color(kind))
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }

    if let Some(notification) = session.effects.notification() {
        let remaining = notification.expires_at.saturating_sub(now);
        let text = fit(notification.message, available_width.saturating_sub(12));
        spans.push(Span::styled(
            text,
            Style::default().fg(power_up_color(notification.kind)),
        ));
        spans.push(Span::styled(
            format!(" {:.1}s", remaining.as_secs_f32()),
            Style::default().fg(Color::DarkGray),
        ));
    } else if session.effects.active().is_empty() {
        spans.push(Span::styled(
            legend(),
            Style::default().fg(Color::DarkGray),
        ));
    }

    Line::from(spans)
}

fn legend() -> String {
    PowerUpKind::ALL
        .iter()
        .map(|kind| format!("{}={}", power_up_glyph(*kind), kind.label().to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Single-character marker used for a power-up on the board and in the legend.
#[must_use]
pub fn power_up_glyph(kind: PowerUpKind) -> &'static str {
    match kind {
        PowerUpKind::Speed => "»",
        PowerUpKind::Slow => "«",
        PowerUpKind::Points => "◆",
        PowerUpKind::Shield => "◊",
    }
}

fn line_width(fields: &[(&str, String)]) -> usize {
    let separators = SEPARATOR.width() * fields.len().saturating_sub(1);
    fields
        .iter()
        .map(|(label, value)| label.width() + 2 + value.width())
        .sum::<usize>()
        + separators
}

/// Truncates `text` to at most `max_width` display columns.
fn fit(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_owned();
    }

    let mut fitted = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width + 1 > max_width {
            break;
        }
        width += ch_width;
        fitted.push(ch);
    }
    fitted.push('…');
    fitted
}

#[cfg(test)]
mod tests {
    use super::{fit, line_width};

    #[test]
    fn fit_keeps_short_text() {
        assert_eq!(fit("Shield up!", 20), "Shield up!");
    }

    #[test]
    fn fit_truncates_with_ellipsis() {
        assert_eq!(fit("Slowed down!", 6), "Slowe…");
    }

    #[test]
    fn line_width_counts_labels_values_and_separators() {
        let fields = [("Score", "10".to_owned()), ("Hi", "120".to_owned())];
        // "Score: 10 │ Hi: 120"
        assert_eq!(line_width(&fields), 19);
    }
}
