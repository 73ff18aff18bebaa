//! Main application state and logic

use std::time::{Duration, Instant};

use iced::widget::{button, column, container, horizontal_rule, row, text, vertical_space};
use iced::{Element, Length, Subscription, Task, Theme};
use match_core::{
    ClockEpoch, CozyRules, Effect, EngineCommand, FlashId, MatchConfig, Phase, Side,
    TurnCoordinator, format_clock,
};
use tracing::{info, warn};

use crate::board::{BoardMessage, BoardModel, BoardWidget};
use crate::engine::{self, EngineEvent, EngineHandle};
use crate::styles::{self, PANEL_WIDTH};

/// Main application state
pub struct ChessApp {
    coordinator: TurnCoordinator<CozyRules, BoardModel>,
    config: MatchConfig,
    /// Command queue of the engine worker, once it has connected
    engine: Option<EngineHandle>,
    /// Commands produced before the worker connected
    outbox: Vec<EngineCommand>,
    board_flipped: bool,
}

/// Application messages
#[derive(Debug, Clone)]
pub enum Message {
    // Board interaction
    Board(BoardMessage),

    // Match controls
    Restart,
    RetryEngine,
    FlipBoard,

    // Timers
    Tick(ClockEpoch),
    FlashExpired(FlashId),

    // Engine worker
    Engine(EngineEvent),
}

impl ChessApp {
    pub fn new(config: MatchConfig) -> (Self, Task<Message>) {
        let mut coordinator = TurnCoordinator::new(CozyRules::new(), BoardModel::new(), &config);
        let effects = coordinator.start(Instant::now());
        let board_flipped = coordinator.seating().color_of(Side::Human) == cozy_chess::Color::Black;

        let mut app = Self {
            coordinator,
            config,
            engine: None,
            outbox: Vec::new(),
            board_flipped,
        };
        let task = app.run_effects(effects);
        (app, task)
    }

    pub fn title(&self) -> String {
        match self.coordinator.bridge().engine_name() {
            Some(name) => format!("Chess vs {name}"),
            None => "Chess vs Engine".to_string(),
        }
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let engine = Subscription::run_with_id(
            "engine-worker",
            engine::worker(self.config.engine.clone()),
        )
        .map(Message::Engine);

        // Keyed by epoch so a restart replaces the timer instead of adding one.
        let clock = match self.coordinator.clock().epoch() {
            Some(epoch) => iced::time::every(Duration::from_secs(1))
                .with(epoch)
                .map(|(epoch, _)| Message::Tick(epoch)),
            None => Subscription::none(),
        };

        Subscription::batch([engine, clock])
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        let now = Instant::now();
        let effects = match message {
            Message::Board(BoardMessage::SquareClicked(square)) => {
                self.coordinator.on_square_clicked(square, now)
            }
            Message::Restart => self.coordinator.restart(now),
            Message::RetryEngine => self.coordinator.retry_engine(now),
            Message::FlipBoard => {
                self.board_flipped = !self.board_flipped;
                Vec::new()
            }
            Message::Tick(epoch) => self.coordinator.on_tick(epoch, now),
            Message::FlashExpired(flash) => {
                self.coordinator.expire_flash(flash);
                Vec::new()
            }
            Message::Engine(EngineEvent::Connected(handle)) => {
                info!(queued = self.outbox.len(), "engine worker connected");
                for command in self.outbox.drain(..) {
                    handle.send(command);
                }
                self.engine = Some(handle);
                Vec::new()
            }
            Message::Engine(EngineEvent::Line(line)) => self.coordinator.on_engine_line(&line, now),
            Message::Engine(EngineEvent::Exited(reason)) => {
                self.engine = None;
                self.outbox.clear();
                self.coordinator.on_engine_disconnected(&reason)
            }
        };
        self.run_effects(effects)
    }

    fn run_effects(&mut self, effects: Vec<Effect>) -> Task<Message> {
        let mut tasks = Vec::new();
        for effect in effects {
            match effect {
                Effect::Send(command) => self.dispatch(command),
                Effect::ExpireFlash { flash, after } => tasks.push(Task::perform(
                    tokio::time::sleep(after),
                    move |_| Message::FlashExpired(flash),
                )),
                // Shown through `coordinator.alert()` in the panel.
                Effect::Alert(alert) => warn!(%alert, "match alert"),
            }
        }
        Task::batch(tasks)
    }

    fn dispatch(&mut self, command: EngineCommand) {
        match &self.engine {
            Some(handle) => {
                if !handle.send(command) {
                    warn!("engine worker stopped; command dropped");
                }
            }
            None => self.outbox.push(command),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let board = BoardWidget::new(self.coordinator.board(), self.board_flipped)
            .view()
            .map(Message::Board);

        row![
            board,
            container(self.control_panel())
                .width(PANEL_WIDTH)
                .height(Length::Fill)
                .padding(15),
        ]
        .spacing(20)
        .padding(20)
        .into()
    }

    /// Render the control panel
    fn control_panel(&self) -> Element<'_, Message> {
        let restart_btn = button(text("Restart"))
            .on_press(Message::Restart)
            .style(button::primary)
            .width(Length::Fill);

        let flip_btn = button(text("Flip Board"))
            .on_press(Message::FlipBoard)
            .style(button::secondary)
            .width(Length::Fill);

        let retry_btn = button(text("Ask engine to move"))
            .on_press_maybe(
                self.coordinator
                    .can_retry_engine()
                    .then_some(Message::RetryEngine),
            )
            .style(button::secondary)
            .width(Length::Fill);

        let engine_name = self
            .coordinator
            .bridge()
            .engine_name()
            .unwrap_or("connecting...")
            .to_string();

        let outcome = self.coordinator.outcome();
        let status = if outcome.is_terminal() {
            outcome.to_string()
        } else {
            match self.coordinator.phase() {
                Phase::EngineTurn => "Engine thinking...".to_string(),
                _ if self.coordinator.side_to_move() == Side::Human => "Your move".to_string(),
                _ => "Waiting for engine".to_string(),
            }
        };

        let alert = self
            .coordinator
            .alert()
            .map(ToString::to_string)
            .unwrap_or_default();

        column![
            restart_btn,
            flip_btn,
            retry_btn,
            vertical_space().height(20),
            text(format!("Engine: {engine_name}")).size(14),
            vertical_space().height(10),
            self.clock_line("Engine", Side::Engine),
            self.clock_line("You", Side::Human),
            vertical_space().height(20),
            horizontal_rule(1),
            vertical_space().height(10),
            text(status).size(16),
            text(alert).size(14).color(styles::ALERT_TEXT),
        ]
        .spacing(5)
        .into()
    }

    fn clock_line(&self, label: &str, side: Side) -> Element<'_, Message> {
        let clock = self.coordinator.clock();
        let color = if clock.is_running() && clock.active() == side {
            styles::CLOCK_ACTIVE
        } else {
            styles::CLOCK_IDLE
        };
        text(format!("{label}: {}", format_clock(clock.remaining(side))))
            .size(22)
            .color(color)
            .into()
    }
}
