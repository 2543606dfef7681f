//! Two-step confirmation button widget.
//!
//! The widget is the rendering half of [`ConfirmController`]: it maps the
//! controller's phase and progress fraction to colors, label text and the
//! shrinking countdown overlay, and turns key presses and mouse clicks into
//! controller clicks. All lifecycle decisions stay in the controller.

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Theme;
use crate::confirm::{ConfirmController, Phase};
use crate::config::key::KeyBinding;
use crate::ui::{Component, Handled, Result};

const PROMPT_LABEL: &str = "Confirm?";
const SUCCESS_LABEL: &str = "✓";
const COMPLETED_LABEL: &str = "Done";
const MIN_CONTENT_WIDTH: u16 = 12;

/// Severity of the action behind the button.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    /// Neutral accent while idle.
    #[default]
    Normal,
    /// Red warning accent while idle, for destructive actions.
    Danger,
}

pub struct ConfirmButton {
    controller: ConfirmController,
    idle_label: String,
    style: ButtonStyle,
    press: KeyBinding,
    /// Area occupied by the last render, for mouse hit-testing.
    last_area: Option<Rect>,
}

impl ConfirmButton {
    pub fn new(
        controller: ConfirmController,
        idle_label: impl Into<String>,
        press: KeyBinding,
    ) -> Self {
        Self {
            controller,
            idle_label: idle_label.into(),
            style: ButtonStyle::default(),
            press,
            last_area: None,
        }
    }

    /// Label shown while idle. Takes effect on the next render.
    pub fn set_idle_label(&mut self, label: impl Into<String>) {
        self.idle_label = label.into();
    }

    pub fn set_style(&mut self, style: ButtonStyle) {
        self.style = style;
    }

    /// Cancel any pending deadline in the underlying controller.
    pub fn dispose(&mut self) {
        self.controller.dispose();
    }

    fn press_and_report(&mut self) -> Handled<Phase> {
        self.controller.handle_click();
        self.controller.phase().into()
    }

    fn label(&self) -> &str {
        match self.controller.phase() {
            Phase::Initial => &self.idle_label,
            Phase::Prompted => PROMPT_LABEL,
            Phase::Success => SUCCESS_LABEL,
            Phase::Completed => COMPLETED_LABEL,
        }
    }

    /// Remaining-window bar width: starts at the full interior and shrinks
    /// linearly to zero as the confirmation window elapses.
    fn countdown_width(inner_width: u16, progress: f64) -> u16 {
        let remaining = (1.0 - progress).clamp(0.0, 1.0);
        (f64::from(inner_width) * remaining).round() as u16
    }

    fn hit(&self, column: u16, row: u16) -> bool {
        self.last_area
            .is_some_and(|area| area.contains(Position { x: column, y: row }))
    }
}

impl Component for ConfirmButton {
    /// The phase the press landed on.
    type Output = Phase;

    fn handle_key(&mut self, key: KeyEvent) -> Result<Handled<Self::Output>> {
        if self.press.matches(&key) {
            return Ok(self.press_and_report());
        }
        Ok(Handled::Ignored)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<Handled<Self::Output>> {
        if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left))
            && self.hit(mouse.column, mouse.row)
        {
            return Ok(self.press_and_report());
        }
        Ok(Handled::Ignored)
    }

    fn on_tick(&mut self) {
        self.controller.poll();
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let phase = self.controller.phase();

        // Wide enough for the longest label of the cycle, never narrower
        // than the idle label.
        let content_width = (self.idle_label.chars().count() as u16)
            .max(PROMPT_LABEL.len() as u16)
            .max(MIN_CONTENT_WIDTH);
        let width = (content_width + 6).min(area.width);

        let [button_area] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(area);
        let [button_area] = Layout::vertical([Constraint::Length(3)])
            .flex(Flex::Center)
            .areas(button_area);
        self.last_area = Some(button_area);

        let idle_accent = match self.style {
            ButtonStyle::Normal => theme.blue,
            ButtonStyle::Danger => theme.red,
        };
        let (background, label_color) = match phase {
            Phase::Initial => (idle_accent, theme.crust),
            Phase::Prompted => (theme.surface1, theme.text),
            Phase::Success => (theme.green, theme.crust),
            Phase::Completed => (theme.teal, theme.crust),
        };

        frame.render_widget(Clear, button_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(background))
            .style(Style::default().bg(background));
        let inner = block.inner(button_area);
        frame.render_widget(block, button_area);

        if phase == Phase::Prompted {
            let bar_width = Self::countdown_width(inner.width, self.controller.progress_fraction());
            if bar_width > 0 {
                let bar = Rect {
                    width: bar_width,
                    ..inner
                };
                frame.render_widget(Block::default().style(Style::default().bg(theme.peach)), bar);
            }
        }

        let label = Paragraph::new(self.label())
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(label_color)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(label, inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_width_shrinks_with_progress() {
        assert_eq!(ConfirmButton::countdown_width(20, 0.0), 20);
        assert_eq!(ConfirmButton::countdown_width(20, 0.5), 10);
        assert_eq!(ConfirmButton::countdown_width(20, 1.0), 0);
    }

    #[test]
    fn test_countdown_width_clamps_out_of_range_progress() {
        assert_eq!(ConfirmButton::countdown_width(20, -1.0), 20);
        assert_eq!(ConfirmButton::countdown_width(20, 2.0), 0);
    }
}
