use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::Theme;

/// Bottom status line: key hints on the left, current state on the right.
pub struct StatusBar {
    hints: Vec<(String, String)>,
    state_text: String,
}

impl StatusBar {
    pub fn new(hints: Vec<(String, String)>) -> Self {
        Self {
            hints,
            state_text: String::new(),
        }
    }

    pub fn set_state_text(&mut self, text: impl Into<String>) {
        self.state_text = text.into();
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let key_style = Style::default()
            .fg(theme.peach)
            .add_modifier(Modifier::BOLD);
        let hint_style = Style::default().fg(theme.subtext0);

        let mut spans = Vec::new();
        for (i, (key, description)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", hint_style));
            }
            spans.push(Span::styled(format!("[{key}]"), key_style));
            spans.push(Span::styled(format!(" {description}"), hint_style));
        }
        if !self.state_text.is_empty() {
            spans.push(Span::styled("  ·  ", hint_style));
            spans.push(Span::styled(
                self.state_text.clone(),
                Style::default().fg(theme.lavender),
            ));
        }

        let paragraph =
            Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.mantle));
        frame.render_widget(paragraph, area);
    }
}
