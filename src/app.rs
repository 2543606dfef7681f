//! Demo page hosting a single confirmation button.
//!
//! The page mirrors a subscribe/unsubscribe toggle: confirming the button
//! flips the subscription flag, which in turn swaps the idle label. The
//! confirmed action reaches the page through the command channel, so the
//! controller never learns what it triggers.

use crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::Block;
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::Theme;
use crate::confirm::{ConfirmConfig, ConfirmController, Phase};
use crate::config::{AppConfig, KeybindingsConfig};
use crate::tui::{Event, Tui};
use crate::ui::{ButtonStyle, Component, ConfirmButton, StatusBar};

const SUBSCRIBE_LABEL: &str = "Subscribe";
const UNSUBSCRIBE_LABEL: &str = "Unsubscribe";

const FRAME_RATE: f64 = 30.0;
const TICK_RATE: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    ToggleSubscribed,
    Quit,
    Suspend,
}

pub struct App {
    button: ConfirmButton,
    status_bar: StatusBar,
    phase_rx: UnboundedReceiver<Phase>,
    command_tx: UnboundedSender<Command>,
    command_rx: UnboundedReceiver<Command>,
    keybindings: KeybindingsConfig,
    theme: Theme,
    subscribed: bool,
    should_quit: bool,
    should_suspend: bool,
}

impl App {
    pub fn new(config: &AppConfig, confirm: ConfirmConfig, theme: Theme) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let action_tx = command_tx.clone();
        let mut controller = ConfirmController::with_config(
            move || {
                let _ = action_tx.send(Command::ToggleSubscribed);
            },
            confirm,
        );
        let phase_rx = controller.subscribe();

        let button = ConfirmButton::new(
            controller,
            SUBSCRIBE_LABEL,
            config.keybindings.press.clone(),
        );

        let mut status_bar = StatusBar::new(vec![
            (config.keybindings.press.display(), "press".to_string()),
            (config.keybindings.quit.display(), "quit".to_string()),
        ]);
        status_bar.set_state_text("not subscribed");

        Self {
            button,
            status_bar,
            phase_rx,
            command_tx,
            command_rx,
            keybindings: config.keybindings.clone(),
            theme,
            subscribed: false,
            should_quit: false,
            should_suspend: false,
        }
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = Tui::new(FRAME_RATE, TICK_RATE)?;
        tui.enter()?;

        loop {
            self.handle_events(&mut tui).await?;
            self.handle_commands()?;
            if self.should_suspend {
                self.should_suspend = false;
                tui.suspend()?;
                tui.resume()?;
                tui.clear()?;
            } else if self.should_quit {
                break;
            }
        }

        self.button.dispose();
        tui.exit()?;
        Ok(())
    }

    async fn handle_events(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        let Some(event) = tui.next_event().await else {
            return Ok(());
        };

        match event {
            Event::Init => {}
            Event::Quit => self.command_tx.send(Command::Quit)?,
            Event::Error(message) => warn!(%message, "event loop error"),
            Event::Tick => {
                self.button.on_tick();
                self.drain_phase_changes();
            }
            Event::Render => self.render(tui)?,
            Event::Resize(width, height) => {
                tui.resize(Rect::new(0, 0, width, height))?;
                self.render(tui)?;
            }
            Event::Key(key) => self.handle_key_event(key)?,
            Event::Mouse(mouse) => {
                if let Some(phase) = self.button.handle_mouse(mouse)?.event() {
                    debug!(?phase, "button clicked");
                }
            }
        }

        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> color_eyre::Result<()> {
        // The button gets first refusal; global bindings only see what it
        // ignored.
        let handled = self.button.handle_key(key)?;
        let consumed = handled.is_consumed();
        if let Some(phase) = handled.event() {
            debug!(?phase, "button pressed");
        }
        if consumed {
            return Ok(());
        }

        if self.keybindings.quit.matches(&key) {
            self.command_tx.send(Command::Quit)?;
        } else if self.keybindings.suspend.matches(&key) {
            self.command_tx.send(Command::Suspend)?;
        }
        Ok(())
    }

    fn drain_phase_changes(&mut self) {
        while let Ok(phase) = self.phase_rx.try_recv() {
            debug!(?phase, "confirmation phase changed");
        }
    }

    fn handle_commands(&mut self) -> color_eyre::Result<()> {
        while let Ok(command) = self.command_rx.try_recv() {
            debug!(?command, "handling command");
            match command {
                Command::Quit => self.should_quit = true,
                Command::Suspend => self.should_suspend = true,
                Command::ToggleSubscribed => self.toggle_subscribed(),
            }
        }
        Ok(())
    }

    fn toggle_subscribed(&mut self) {
        self.subscribed = !self.subscribed;
        if self.subscribed {
            // Unsubscribing is the destructive direction.
            self.button.set_idle_label(UNSUBSCRIBE_LABEL);
            self.button.set_style(ButtonStyle::Danger);
            self.status_bar.set_state_text("subscribed");
        } else {
            self.button.set_idle_label(SUBSCRIBE_LABEL);
            self.button.set_style(ButtonStyle::Normal);
            self.status_bar.set_state_text("not subscribed");
        }
    }

    fn render(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        let theme = self.theme;
        let button = &mut self.button;
        let status_bar = &self.status_bar;
        tui.draw(|frame| {
            let [page, status] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
            frame.render_widget(
                Block::default().style(Style::default().bg(theme.base)),
                frame.area(),
            );
            button.render(frame, page, &theme);
            status_bar.render(frame, status, &theme);
        })?;
        Ok(())
    }
}
