//! Main application struct and run loop.
//!
//! This module provides the `App` struct which owns the layout, the state
//! and timers of every placed widget, and the optional screen store. It
//! turns messages into layout operations and renders the result.

use std::collections::HashMap;

use gmscreen_config::ScreenStore;
use gmscreen_config::store::{export_screen, generate_screen_id, suggested_export_filename};
use gmscreen_grid::GridController;
use gmscreen_protocol::{
    CellIndex, DiceResult, Direction, InstanceId, MAX_GRID_DIMENSION, Message, ScreenDocument,
    ScreenSettings, Span as CellSpan, WidgetInstance, WidgetKind,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    AppState, Focus,
    event::{event_to_message, key_to_selector_message, poll_event},
    layout::{
        HEADER_HEIGHT, MIN_HEIGHT, MIN_HEIGHT_WITH_HEADER, MIN_WIDTH, STATUS_BAR_HEIGHT, cell_at,
    },
    notify::DiceNotifier,
    registry::{ClockReading, WidgetRegistry},
    terminal::AppTerminal,
    timers::{Countdown, ElapsedClock},
    widgets::{
        GridView, StatusMessage, render_dice_overlay, render_grid, render_help_overlay,
        render_selector, render_status_bar,
    },
};

/// Name given to screens that were never saved under another one.
pub const DEFAULT_SCREEN_NAME: &str = "Untitled Screen";

/// Directory under the data directory that exports are written to.
const EXPORT_DIR: &str = "exports";

/// The live timer behind a timer or clock widget.
#[derive(Debug)]
enum Ticker {
    Countdown(Countdown),
    Clock(ElapsedClock),
}

impl Ticker {
    /// Creates the ticker for `kind`, restoring it from `state` if given.
    fn for_kind(kind: WidgetKind, state: Option<&Value>) -> Option<Self> {
        match (kind, state) {
            (WidgetKind::Timer, Some(state)) => Some(Self::Countdown(Countdown::from_state(state))),
            (WidgetKind::Timer, None) => Some(Self::Countdown(Countdown::new())),
            (WidgetKind::Clock, Some(state)) => Some(Self::Clock(ElapsedClock::from_state(state))),
            (WidgetKind::Clock, None) => Some(Self::Clock(ElapsedClock::new())),
            _ => None,
        }
    }

    fn reading(&self) -> ClockReading {
        match self {
            Self::Countdown(timer) => ClockReading::Countdown(timer.snapshot()),
            Self::Clock(clock) => ClockReading::Elapsed(clock.snapshot()),
        }
    }

    fn to_state(&self) -> Value {
        match self {
            Self::Countdown(timer) => timer.to_state(),
            Self::Clock(clock) => clock.to_state(),
        }
    }
}

/// The main application struct.
///
/// Manages the screen and provides the main event loop.
#[derive(Debug)]
pub struct App {
    state: AppState,
    grid: GridController,
    settings: ScreenSettings,
    screen_id: String,
    screen_name: String,
    store: Option<ScreenStore>,
    registry: WidgetRegistry,
    notifier: DiceNotifier,
    /// Persisted state per placed instance.
    instance_states: HashMap<InstanceId, Value>,
    /// Running or paused timers, keyed by the instance they belong to.
    tickers: HashMap<InstanceId, Ticker>,
    status: Option<StatusMessage>,
    should_quit: bool,
    /// Last known terminal area, used for click hit-testing.
    last_area: Rect,
    /// Whether the header was shown in the last render (affects click hit-testing).
    header_visible: bool,
}

impl App {
    /// Creates an application with an empty screen.
    ///
    /// # Errors
    ///
    /// Returns an error if `settings` asks for a zero-sized grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use gmscreen_protocol::ScreenSettings;
    /// use gmscreen_tui::App;
    ///
    /// let app = App::new(ScreenSettings::default()).unwrap();
    /// assert_eq!(app.grid().state().cols(), 5);
    /// ```
    pub fn new(settings: ScreenSettings) -> gmscreen_grid::Result<Self> {
        let grid = GridController::new(settings.rows, settings.columns)?;
        Ok(Self::assemble(grid, settings, DEFAULT_SCREEN_NAME.to_string()))
    }

    /// Creates an application showing a saved screen.
    ///
    /// Every widget gets a fresh instance id; the state saved with it in the
    /// document becomes the new instance's state. Timers start paused.
    ///
    /// # Errors
    ///
    /// Returns an error if any component of the document cannot be placed.
    pub fn from_document(document: &ScreenDocument) -> gmscreen_grid::Result<Self> {
        let (grid, restored) = GridController::from_document(document)?;
        let mut app = Self::assemble(grid, document.settings.clone(), document.name.clone());
        for (instance, state) in restored {
            if let Some(ticker) = instance
                .kind()
                .and_then(|kind| Ticker::for_kind(kind, Some(&state)))
            {
                app.tickers.insert(instance.id, ticker);
            }
            app.instance_states.insert(instance.id, state);
        }
        Ok(app)
    }

    fn assemble(grid: GridController, settings: ScreenSettings, screen_name: String) -> Self {
        Self {
            state: AppState::new(),
            grid,
            notifier: DiceNotifier::from_settings(&settings),
            settings,
            screen_id: generate_screen_id(),
            screen_name,
            store: None,
            registry: WidgetRegistry::with_builtin(),
            instance_states: HashMap::new(),
            tickers: HashMap::new(),
            status: None,
            should_quit: false,
            last_area: Rect::default(),
            header_visible: true,
        }
    }

    /// Attaches a store and the id the screen is saved under.
    ///
    /// The state of every current instance is written to the store, so a
    /// screen opened from a document has its instance store seeded.
    #[must_use]
    pub fn with_store(mut self, store: ScreenStore, screen_id: impl Into<String>) -> Self {
        self.screen_id = screen_id.into();
        for (id, state) in &self.instance_states {
            if let Err(err) = store.save_instance_state(*id, state) {
                warn!(%id, error = %err, "failed to seed instance state");
            }
        }
        self.store = Some(store);
        self
    }

    /// Replaces the widget registry.
    #[must_use]
    pub fn with_registry(mut self, registry: WidgetRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Returns the layout controller.
    #[must_use]
    pub fn grid(&self) -> &GridController {
        &self.grid
    }

    /// Returns the UI state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Returns the screen's display settings.
    #[must_use]
    pub fn settings(&self) -> &ScreenSettings {
        &self.settings
    }

    /// Returns the name the screen is saved under.
    #[must_use]
    pub fn screen_name(&self) -> &str {
        &self.screen_name
    }

    /// Renames the screen. The new name applies from the next save.
    pub fn set_screen_name(&mut self, name: impl Into<String>) {
        self.screen_name = name.into();
    }

    /// Returns the message currently in the status bar.
    #[must_use]
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    /// Returns `true` once the user has asked to quit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Returns the saved state of an instance, including live timer state.
    #[must_use]
    pub fn instance_state(&self, id: InstanceId) -> Option<Value> {
        match self.tickers.get(&id) {
            Some(ticker) => Some(ticker.to_state()),
            None => self.instance_states.get(&id).cloned(),
        }
    }

    /// Replaces the saved state of an instance and writes it to the store.
    pub fn set_instance_state(&mut self, id: InstanceId, state: Value) {
        if let Some(store) = &self.store
            && let Err(err) = store.save_instance_state(id, &state)
        {
            warn!(%id, error = %err, "failed to save instance state");
        }
        self.instance_states.insert(id, state);
    }

    /// Shows a dice result on the overlay.
    ///
    /// Returns `false` if the overlay is disabled for this screen. Must be
    /// called from within a Tokio runtime.
    pub fn publish_dice_result(&mut self, result: DiceResult) -> bool {
        self.notifier.publish(result)
    }

    /// Handles a message and updates state accordingly.
    ///
    /// # Arguments
    ///
    /// * `msg` - The message to handle.
    pub fn update(&mut self, msg: Message) {
        // When help is visible, most keys dismiss it
        if self.state.help_visible {
            match msg {
                Message::Quit => self.should_quit = true,
                Message::ToggleHelp => self.state.toggle_help(),
                _ => {
                    let _ = self.state.dismiss_help();
                }
            }
            return;
        }

        if self.state.focus == Focus::Selector {
            self.update_selector(msg);
            return;
        }

        match msg {
            Message::Quit => self.should_quit = true,
            Message::ToggleHelp => self.state.toggle_help(),
            Message::NavigateLeft => self.navigate(Direction::Left),
            Message::NavigateRight => self.navigate(Direction::Right),
            Message::NavigateUp => self.navigate(Direction::Up),
            Message::NavigateDown => self.navigate(Direction::Down),
            Message::Select => self.activate(),
            Message::Escape => {
                if self.state.carrying.take().is_some() {
                    self.status = Some(StatusMessage::info("Move cancelled"));
                } else {
                    self.status = None;
                }
            }
            Message::ClickAt { column, row } => self.handle_click(column, row),
            Message::Delete => self.delete_at_cursor(),
            // Resizing would re-anchor a carried widget under the drop preview
            Message::Expand { .. } | Message::Shrink { .. } if self.state.carrying.is_some() => {}
            Message::Expand { direction } => self.expand_at_cursor(direction),
            Message::Shrink { direction } => self.shrink_at_cursor(direction),
            Message::ToggleMove => self.toggle_move(),
            Message::AddRow => self.resize_grid(1, 0),
            Message::RemoveRow => self.resize_grid(-1, 0),
            Message::AddColumn => self.resize_grid(0, 1),
            Message::RemoveColumn => self.resize_grid(0, -1),
            Message::ToggleTitles => {
                self.settings.hide_titles = !self.settings.hide_titles;
            }
            Message::Save => self.save(),
            Message::Export => self.export(),
            Message::ToggleTimer | Message::ResetTimer | Message::AddTime { .. } => {
                self.control_timer(&msg);
            }
            Message::SelectorNavigate { .. }
            | Message::SelectorConfirm
            | Message::SelectorCancel => {}
        }
    }

    fn update_selector(&mut self, msg: Message) {
        match msg {
            Message::Quit => self.should_quit = true,
            Message::SelectorNavigate { delta } => {
                if let Some(selector) = self.state.selector.as_mut() {
                    selector.navigate(delta);
                }
            }
            Message::SelectorConfirm => {
                if let Some(selector) = self.state.close_selector()
                    && let Some(kind) = selector.selected_kind()
                {
                    self.add_widget(selector.target, kind);
                }
            }
            Message::SelectorCancel | Message::Escape => {
                let _ = self.state.close_selector();
            }
            _ => {}
        }
    }

    fn navigate(&mut self, direction: Direction) {
        self.state.navigate(self.grid.state(), direction);
    }

    /// Activates the cell under the cursor.
    ///
    /// Drops a carried widget, or opens the selector on a free cell.
    fn activate(&mut self) {
        if self.state.carrying.is_some() {
            self.toggle_move();
        } else if self.grid.state().is_free(self.state.cursor) {
            self.state.open_selector();
        }
    }

    /// Places a new widget of `kind` at `anchor`.
    fn add_widget(&mut self, anchor: CellIndex, kind: WidgetKind) {
        let mut instance = WidgetInstance::new(kind);
        if kind == WidgetKind::InitiativeTracker {
            let trackers = self
                .grid
                .state()
                .widgets()
                .filter(|(_, existing, _)| existing.kind() == Some(WidgetKind::InitiativeTracker))
                .count();
            instance = instance.with_default_name(format!("Initiative {}", trackers + 1));
        }
        let id = instance.id;

        match self.grid.place_instance(anchor, instance, CellSpan::UNIT) {
            Ok(()) => {
                if let Some(ticker) = Ticker::for_kind(kind, None) {
                    self.tickers.insert(id, ticker);
                }
                self.status = Some(StatusMessage::info(format!(
                    "Added {}",
                    kind.display_name()
                )));
            }
            Err(err) => self.status = Some(StatusMessage::error(err.to_string())),
        }
    }

    fn delete_at_cursor(&mut self) {
        let Some(anchor) = self.grid.state().anchor_covering(self.state.cursor) else {
            return;
        };
        let Some(instance) = self.grid.remove(anchor) else {
            return;
        };
        if self.state.carrying == Some(anchor) {
            self.state.carrying = None;
        }
        self.tickers.remove(&instance.id);
        self.instance_states.remove(&instance.id);
        if let Some(store) = &self.store
            && let Err(err) = store.delete_instance_state(instance.id)
        {
            warn!(id = %instance.id, error = %err, "failed to delete instance state");
        }
        self.state.cursor = anchor;
        self.status = Some(StatusMessage::info(format!("Removed {}", instance.title())));
    }

    fn expand_at_cursor(&mut self, direction: Direction) {
        let Some(anchor) = self.grid.state().anchor_covering(self.state.cursor) else {
            return;
        };
        if let Err(err) = self.grid.expand(anchor, direction, 1) {
            self.status = Some(StatusMessage::error(err.to_string()));
        }
    }

    fn shrink_at_cursor(&mut self, direction: Direction) {
        let Some(anchor) = self.grid.state().anchor_covering(self.state.cursor) else {
            return;
        };
        match self.grid.shrink(anchor, direction) {
            Ok(new_anchor) => {
                if self.grid.state().anchor_covering(self.state.cursor) != Some(new_anchor) {
                    self.state.cursor = new_anchor;
                }
            }
            Err(err) => self.status = Some(StatusMessage::error(err.to_string())),
        }
    }

    /// Picks up the widget under the cursor, or drops the carried one.
    fn toggle_move(&mut self) {
        let cursor = self.state.cursor;
        match self.state.carrying {
            Some(from) if from == cursor => {
                self.state.carrying = None;
            }
            Some(from) => {
                if self.grid.move_widget(from, cursor) {
                    self.state.carrying = None;
                    self.status = Some(StatusMessage::info("Widget moved"));
                } else {
                    self.status = Some(StatusMessage::error(format!(
                        "Cannot move widget to cell {cursor}"
                    )));
                }
            }
            None => {
                let Some(anchor) = self.grid.state().anchor_covering(cursor) else {
                    return;
                };
                self.state.carrying = Some(anchor);
                self.state.cursor = anchor;
                self.status = None;
            }
        }
    }

    /// Adds or removes one row or column.
    fn resize_grid(&mut self, row_delta: isize, col_delta: isize) {
        let old = self.grid.state();
        let (old_rows, old_cols) = (old.rows(), old.cols());
        let rows = old_rows.saturating_add_signed(row_delta);
        let cols = old_cols.saturating_add_signed(col_delta);
        if rows > MAX_GRID_DIMENSION || cols > MAX_GRID_DIMENSION {
            self.status = Some(StatusMessage::error(format!(
                "Grid is limited to {MAX_GRID_DIMENSION} rows and columns"
            )));
            return;
        }

        // A carried anchor would be stale after columns change
        self.state.carrying = None;
        let result = if rows == old_rows {
            self.grid.set_cols(cols)
        } else {
            self.grid.set_rows(rows)
        };
        match result {
            Ok(()) => {
                self.settings.rows = rows;
                self.settings.columns = cols;
                self.state.readdress_cursor(self.grid.state(), old_cols);
            }
            Err(err) => self.status = Some(StatusMessage::error(err.to_string())),
        }
    }

    /// Applies a timer message to the timer or clock under the cursor.
    fn control_timer(&mut self, msg: &Message) {
        let Some(anchor) = self.grid.state().anchor_covering(self.state.cursor) else {
            return;
        };
        let Some(id) = self.grid.state().instance_at(anchor).map(|i| i.id) else {
            return;
        };
        let Some(ticker) = self.tickers.get_mut(&id) else {
            self.status = Some(StatusMessage::error("No timer under the cursor"));
            return;
        };

        match (ticker, msg) {
            (Ticker::Countdown(timer), Message::ToggleTimer) => {
                if !timer.toggle() && timer.snapshot().remaining_secs == 0 {
                    self.status = Some(StatusMessage::error("Add time before starting"));
                }
            }
            (Ticker::Countdown(timer), Message::ResetTimer) => timer.reset(),
            (Ticker::Countdown(timer), Message::AddTime { seconds }) => timer.add_time(*seconds),
            (Ticker::Clock(clock), Message::ToggleTimer) => {
                let _ = clock.toggle();
            }
            (Ticker::Clock(clock), Message::ResetTimer) => clock.reset(),
            (Ticker::Clock(_), Message::AddTime { .. }) => {
                self.status = Some(StatusMessage::error("Clocks count up; time cannot be added"));
                return;
            }
            _ => return,
        }
        self.persist_ticker(id);
    }

    fn persist_ticker(&mut self, id: InstanceId) {
        if let Some(state) = self.tickers.get(&id).map(Ticker::to_state) {
            self.set_instance_state(id, state);
        }
    }

    /// Builds the document for the current screen.
    #[must_use]
    pub fn capture_document(&self) -> ScreenDocument {
        self.grid
            .capture_document(&self.screen_name, self.settings.clone(), |instance| {
                self.instance_state(instance.id)
            })
    }

    /// Saves the screen to the attached store.
    fn save(&mut self) {
        let Some(store) = &self.store else {
            self.status = Some(StatusMessage::error("No data directory; cannot save"));
            return;
        };
        let document = self.capture_document();
        match store.save_screen(&self.screen_id, &document) {
            Ok(summary) => {
                info!(id = %summary.id, name = %summary.name, "screen saved");
                self.status = Some(StatusMessage::info(format!("Saved \"{}\"", summary.name)));
            }
            Err(err) => self.status = Some(StatusMessage::error(err.to_string())),
        }
    }

    /// Writes the screen to `<data dir>/exports/`.
    fn export(&mut self) {
        let Some(store) = &self.store else {
            self.status = Some(StatusMessage::error("No data directory; cannot export"));
            return;
        };
        let path = store
            .root()
            .join(EXPORT_DIR)
            .join(suggested_export_filename(&self.screen_name));
        match export_screen(&self.capture_document(), &path) {
            Ok(()) => {
                self.status = Some(StatusMessage::info(format!("Exported to {}", path.display())));
            }
            Err(err) => self.status = Some(StatusMessage::error(err.to_string())),
        }
    }

    /// Splits the terminal area into header, grid and status bar.
    fn areas(area: Rect, show_header: bool) -> (Option<Rect>, Rect, Rect) {
        if show_header {
            let [header, grid, status] = Layout::vertical([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(STATUS_BAR_HEIGHT),
            ])
            .areas(area);
            (Some(header), grid, status)
        } else {
            let [grid, status] =
                Layout::vertical([Constraint::Min(0), Constraint::Length(STATUS_BAR_HEIGHT)])
                    .areas(area);
            (None, grid, status)
        }
    }

    /// Handles a mouse click at the given terminal coordinates.
    ///
    /// A click moves the cursor to the clicked cell. It then drops a carried
    /// widget there, or opens the selector if the cell is free.
    fn handle_click(&mut self, column: u16, row: u16) {
        let (_, grid_area, _) = Self::areas(self.last_area, self.header_visible);
        let grid = self.grid.state();
        let Some(cell) = cell_at(grid_area, grid.rows(), grid.cols(), column, row) else {
            debug!(column, row, "click outside the grid");
            return;
        };
        self.state.cursor = cell;
        self.activate();
    }

    /// Renders the application to the terminal frame.
    ///
    /// # Arguments
    ///
    /// * `frame` - The frame to render into.
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.last_area = area;

        // Check if terminal is too small for any useful rendering
        if area.height < MIN_HEIGHT || area.width < MIN_WIDTH {
            self.header_visible = false;
            Self::render_terminal_too_small(frame, area);
            return;
        }

        // Compact mode hides the header to reclaim space
        let show_header = area.height >= MIN_HEIGHT_WITH_HEADER;
        self.header_visible = show_header;
        let (header_area, grid_area, status_area) = Self::areas(area, show_header);

        if let Some(header_area) = header_area {
            self.render_header(frame, header_area);
        }

        let clocks: HashMap<InstanceId, ClockReading> = self
            .tickers
            .iter()
            .map(|(id, ticker)| (*id, ticker.reading()))
            .collect();
        let last_roll = self.notifier.current();
        let view = GridView {
            grid: self.grid.state(),
            registry: &self.registry,
            states: &self.instance_states,
            clocks: &clocks,
            last_roll: last_roll.as_ref(),
            cursor: self.state.cursor,
            carrying: self.state.carrying,
            hide_titles: self.settings.hide_titles,
        };
        let buf = frame.buffer_mut();
        render_grid(&view, grid_area, buf);
        render_status_bar(
            self.status.as_ref(),
            self.state.carrying.is_some(),
            status_area,
            buf,
        );

        if let Some(result) = &last_roll {
            render_dice_overlay(result, grid_area, buf);
        }
        if let Some(selector) = &self.state.selector {
            render_selector(selector, area, buf);
        }
        if self.state.help_visible {
            render_help_overlay(area, buf);
        }
    }

    /// Renders a message indicating the terminal is too small.
    fn render_terminal_too_small(frame: &mut Frame, area: Rect) {
        let message = format!(
            "Terminal too small ({}×{})\nMinimum: {}×{} (w×h)",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );

        let paragraph = Paragraph::new(message)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false });

        // Center the message vertically
        let vertical_offset = area.height.saturating_sub(2) / 2;
        let centered_area = Rect {
            x: area.x,
            y: area.y + vertical_offset,
            width: area.width,
            height: area.height.saturating_sub(vertical_offset),
        };

        frame.render_widget(paragraph, centered_area);
    }

    /// Renders the header bar with the screen name and help cue.
    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [title_area, help_area] = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(17), // "Press ? for help" = 16 chars + padding
        ])
        .areas(inner);

        let grid = self.grid.state();
        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                "gmscreen",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" - "),
            Span::styled(self.screen_name.as_str(), Style::default().fg(Color::White)),
            Span::styled(
                format!("  {}×{}", grid.rows(), grid.cols()),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        frame.render_widget(title, title_area);

        let help_cue = Paragraph::new(Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::styled(" for help", Style::default().fg(Color::DarkGray)),
        ]))
        .alignment(Alignment::Right);
        frame.render_widget(help_cue, help_area);
    }

    /// Runs the main application loop.
    ///
    /// This function blocks until the user quits the application.
    /// It polls for events, updates state, and renders the UI.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal operations fail.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gmscreen_protocol::ScreenSettings;
    /// use gmscreen_tui::{App, terminal};
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let mut terminal = terminal::setup_terminal()?;
    ///     let mut app = App::new(ScreenSettings::default())?;
    ///     app.run(&mut terminal).await?;
    ///     terminal::restore_terminal(&mut terminal)?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn run(&mut self, terminal: &mut AppTerminal) -> anyhow::Result<()> {
        use crossterm::event::Event;

        loop {
            terminal.draw(|frame| self.view(frame))?;

            if let Some(event) = poll_event()? {
                let msg = match (&event, self.state.focus) {
                    (Event::Key(key), Focus::Selector) => key_to_selector_message(*key),
                    _ => event_to_message(&event),
                };
                if let Some(msg) = msg {
                    self.update(msg);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use gmscreen_protocol::ComponentEntry;
    use ratatui::{Terminal, backend::TestBackend};
    use serde_json::json;

    use super::*;
    use crate::test_utils::buffer_to_string;
    use crate::widgets::StatusLevel;

    fn app(rows: usize, columns: usize) -> App {
        App::new(ScreenSettings {
            rows,
            columns,
            ..ScreenSettings::default()
        })
        .expect("app")
    }

    fn place(app: &mut App, cell: usize, kind: WidgetKind) {
        app.state.cursor = cell;
        app.update(Message::Select);
        let index = crate::SelectorState::entries()
            .iter()
            .position(|k| *k == kind)
            .expect("kind in selector");
        for _ in 0..index {
            app.update(Message::SelectorNavigate { delta: 1 });
        }
        app.update(Message::SelectorConfirm);
    }

    fn render(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
        terminal.draw(|frame| app.view(frame)).expect("draw");
        buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn app_quit_message_sets_should_quit() {
        let mut app = app(2, 4);

        assert!(!app.should_quit());
        app.update(Message::Quit);
        assert!(app.should_quit());
    }

    #[test]
    fn select_on_free_cell_opens_selector() {
        let mut app = app(2, 4);

        app.update(Message::Select);
        assert_eq!(app.state.focus, Focus::Selector);

        app.update(Message::SelectorCancel);
        assert_eq!(app.state.focus, Focus::Grid);
        assert!(app.grid().state().is_empty());
    }

    #[test]
    fn selector_confirm_places_widget() {
        let mut app = app(2, 4);

        place(&mut app, 5, WidgetKind::Notes);

        let instance = app.grid().state().instance_at(5).expect("placed");
        assert_eq!(instance.kind(), Some(WidgetKind::Notes));
        assert_eq!(app.state.focus, Focus::Grid);
    }

    #[test]
    fn initiative_trackers_get_numbered_names() {
        let mut app = app(2, 4);

        place(&mut app, 0, WidgetKind::InitiativeTracker);
        place(&mut app, 1, WidgetKind::InitiativeTracker);

        let grid = app.grid().state();
        assert_eq!(grid.instance_at(0).map(|i| i.title()), Some("Initiative 1"));
        assert_eq!(grid.instance_at(1).map(|i| i.title()), Some("Initiative 2"));
    }

    #[test]
    fn select_on_widget_does_not_open_selector() {
        let mut app = app(2, 4);
        place(&mut app, 0, WidgetKind::Notes);

        app.state.cursor = 0;
        app.update(Message::Select);
        assert_eq!(app.state.focus, Focus::Grid);
    }

    #[test]
    fn expand_and_shrink_follow_cursor_widget() {
        let mut app = app(2, 4);
        place(&mut app, 0, WidgetKind::Notes);

        app.update(Message::Expand {
            direction: Direction::Right,
        });
        assert_eq!(app.grid().state().covered_cells(0), vec![0, 1]);

        app.update(Message::Shrink {
            direction: Direction::Left,
        });
        assert_eq!(app.grid().state().covered_cells(1), vec![1]);
        assert_eq!(app.state.cursor, 1);
    }

    #[test]
    fn rejected_expand_reports_in_status_bar() {
        let mut app = app(2, 4);
        place(&mut app, 0, WidgetKind::Notes);
        place(&mut app, 1, WidgetKind::Clock);

        app.state.cursor = 0;
        app.update(Message::Expand {
            direction: Direction::Right,
        });

        assert_eq!(app.grid().state().covered_cells(0), vec![0]);
        let status = app.status().expect("status");
        assert_eq!(status.level, StatusLevel::Error);
        assert!(status.text.contains("cell 1"));
    }

    #[test]
    fn move_picks_up_and_drops() {
        let mut app = app(2, 4);
        place(&mut app, 0, WidgetKind::Notes);

        app.state.cursor = 0;
        app.update(Message::ToggleMove);
        assert_eq!(app.state.carrying, Some(0));

        app.update(Message::NavigateDown);
        app.update(Message::NavigateRight);
        app.update(Message::ToggleMove);

        assert_eq!(app.state.carrying, None);
        assert!(app.grid().state().is_anchor(5));
        assert!(app.grid().state().is_free(0));
    }

    #[test]
    fn move_onto_other_widget_keeps_carrying() {
        let mut app = app(2, 4);
        place(&mut app, 0, WidgetKind::Notes);
        place(&mut app, 1, WidgetKind::Clock);

        app.state.cursor = 0;
        app.update(Message::ToggleMove);
        app.update(Message::NavigateRight);
        app.update(Message::ToggleMove);

        assert_eq!(app.state.carrying, Some(0));
        assert!(app.grid().state().is_anchor(0));

        app.update(Message::Escape);
        assert_eq!(app.state.carrying, None);
    }

    #[test]
    fn delete_removes_widget_under_cursor() {
        let mut app = app(2, 4);
        place(&mut app, 0, WidgetKind::Notes);
        app.update(Message::Expand {
            direction: Direction::Down,
        });

        app.state.cursor = 4;
        app.update(Message::Delete);

        assert!(app.grid().state().is_empty());
        assert_eq!(app.state.cursor, 0);
    }

    #[test]
    fn remove_column_rejected_when_widget_in_last_column() {
        let mut app = app(2, 4);
        place(&mut app, 3, WidgetKind::Notes);

        app.update(Message::RemoveColumn);

        assert_eq!(app.grid().state().cols(), 4);
        assert_eq!(app.status().map(|s| s.level), Some(StatusLevel::Error));
    }

    #[test]
    fn add_column_readdresses_cursor_and_widgets() {
        let mut app = app(2, 4);
        place(&mut app, 5, WidgetKind::Notes);

        app.update(Message::AddColumn);

        let grid = app.grid().state();
        assert_eq!(grid.cols(), 5);
        assert!(grid.is_anchor(6));
        assert_eq!(app.state.cursor, 6);
        assert_eq!(app.settings().columns, 5);
    }

    #[test]
    fn document_with_overflowing_span_is_rejected() {
        let doc = ScreenDocument::new(
            "Wide",
            ScreenSettings {
                rows: 2,
                columns: 4,
                ..ScreenSettings::default()
            },
            vec![ComponentEntry::new(1, "notes", CellSpan::new(usize::MAX, 1))],
        );
        assert!(App::from_document(&doc).is_err());
    }

    #[test]
    fn grid_growth_stops_at_limit() {
        let mut app = app(MAX_GRID_DIMENSION, 2);

        app.update(Message::AddRow);

        assert_eq!(app.grid().state().rows(), MAX_GRID_DIMENSION);
        assert_eq!(app.status().map(|s| s.level), Some(StatusLevel::Error));
    }

    #[test]
    fn toggle_titles_flips_setting() {
        let mut app = app(2, 4);

        app.update(Message::ToggleTitles);
        assert!(app.settings().hide_titles);
    }

    #[test]
    fn help_blocks_other_messages() {
        let mut app = app(2, 4);

        app.update(Message::ToggleHelp);
        app.update(Message::NavigateRight);

        assert!(!app.state.help_visible);
        assert_eq!(app.state.cursor, 0);
    }

    #[test]
    fn save_without_store_reports_error() {
        let mut app = app(2, 4);

        app.update(Message::Save);
        assert_eq!(app.status().map(|s| s.level), Some(StatusLevel::Error));
    }

    #[test]
    fn save_writes_screen_to_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ScreenStore::open(dir.path()).expect("store");
        let mut app = app(2, 4).with_store(store.clone(), "screen_test");
        app.set_screen_name("Crypt");
        place(&mut app, 0, WidgetKind::Notes);

        app.update(Message::Save);

        assert_eq!(app.status().map(|s| s.level), Some(StatusLevel::Info));
        let document = store.load_screen("screen_test").expect("load");
        assert_eq!(document.name, "Crypt");
        assert_eq!(document.components.len(), 1);
        assert_eq!(document.components[0].component_type, "notes");
    }

    #[test]
    fn export_writes_importable_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ScreenStore::open(dir.path()).expect("store");
        let mut app = app(2, 4).with_store(store, "screen_test");
        app.set_screen_name("Dragon's Lair");
        place(&mut app, 2, WidgetKind::Checklist);

        app.update(Message::Export);

        let exports: Vec<_> = std::fs::read_dir(dir.path().join(EXPORT_DIR))
            .expect("exports dir")
            .map(|entry| entry.expect("entry").path())
            .collect();
        assert_eq!(exports.len(), 1);
        let document = gmscreen_config::store::import_screen(&exports[0]).expect("import");
        assert_eq!(document.name, "Dragon's Lair");
        assert_eq!(document.components[0].cell_id, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn add_time_starts_countdown_and_persists_state() {
        let mut app = app(2, 4);
        place(&mut app, 0, WidgetKind::Timer);
        let id = app.grid().state().instance_at(0).expect("timer").id;

        app.update(Message::AddTime { seconds: 60 });

        let Some(Ticker::Countdown(timer)) = app.tickers.get(&id) else {
            panic!("expected countdown");
        };
        assert!(timer.snapshot().running);
        assert_eq!(
            app.instance_state(id),
            Some(json!({ "timeRemaining": 60, "isRunning": false }))
        );
    }

    #[test]
    fn timer_keys_without_timer_report_error() {
        let mut app = app(2, 4);
        place(&mut app, 0, WidgetKind::Notes);

        app.update(Message::ToggleTimer);
        assert_eq!(app.status().map(|s| s.level), Some(StatusLevel::Error));
    }

    #[test]
    fn from_document_restores_layout_and_state() {
        let mut notes = ComponentEntry::new(0, "notes", CellSpan::new(2, 1));
        notes.state = json!({ "content": "Secret door" });
        let mut timer = ComponentEntry::new(6, "timer", CellSpan::UNIT);
        timer.state = json!({ "timeRemaining": 90, "isRunning": true });
        let document = ScreenDocument::new(
            "Crypt",
            ScreenSettings {
                rows: 2,
                columns: 4,
                ..ScreenSettings::default()
            },
            vec![notes, timer],
        );

        let app = App::from_document(&document).expect("load");

        let grid = app.grid().state();
        assert_eq!(grid.covered_cells(0), vec![0, 1]);
        let notes_id = grid.instance_at(0).expect("notes").id;
        assert_eq!(
            app.instance_state(notes_id),
            Some(json!({ "content": "Secret door" }))
        );
        let timer_id = grid.instance_at(6).expect("timer").id;
        assert_eq!(
            app.instance_state(timer_id),
            Some(json!({ "timeRemaining": 90, "isRunning": false }))
        );
    }

    #[test]
    fn view_renders_header_grid_and_status() {
        let mut app = app(2, 4);
        place(&mut app, 0, WidgetKind::Notes);

        let content = render(&mut app, 80, 24);

        assert!(content.contains("gmscreen"));
        assert!(content.contains(DEFAULT_SCREEN_NAME));
        assert!(content.contains("Notes"));
        assert!(content.contains("Quit"));
    }

    #[test]
    fn view_shows_too_small_message() {
        let mut app = app(2, 4);

        let content = render(&mut app, 30, 8);
        assert!(content.contains("Terminal too small"));
    }

    #[test]
    fn view_shows_selector_popup() {
        let mut app = app(2, 4);
        app.update(Message::Select);

        let content = render(&mut app, 80, 40);
        assert!(content.contains("Add Widget"));
    }

    #[tokio::test(start_paused = true)]
    async fn view_shows_published_dice_result() {
        let mut app = app(2, 4);
        assert!(app.publish_dice_result(DiceResult::new("2d6", vec![3, 4], 0)));

        let content = render(&mut app, 80, 24);
        assert!(content.contains("2d6: 3 4 = 7"));
    }

    #[test]
    fn click_moves_cursor_and_opens_selector() {
        let mut app = app(2, 4);
        let _ = render(&mut app, 80, 24);

        // Header takes 3 rows; the grid spans rows 3..21 with two rows of cells
        app.update(Message::ClickAt { column: 70, row: 18 });

        assert_eq!(app.state.cursor, 7);
        assert_eq!(app.state.focus, Focus::Selector);
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        fn arb_message() -> impl Strategy<Value = Message> {
            let direction = prop_oneof![
                Just(Direction::Left),
                Just(Direction::Right),
                Just(Direction::Up),
                Just(Direction::Down),
            ];
            prop_oneof![
                Just(Message::NavigateLeft),
                Just(Message::NavigateRight),
                Just(Message::NavigateUp),
                Just(Message::NavigateDown),
                Just(Message::Select),
                Just(Message::Escape),
                Just(Message::Delete),
                Just(Message::ToggleMove),
                Just(Message::AddRow),
                Just(Message::RemoveRow),
                Just(Message::AddColumn),
                Just(Message::RemoveColumn),
                (-3i32..4).prop_map(|delta| Message::SelectorNavigate { delta }),
                Just(Message::SelectorConfirm),
                direction.clone().prop_map(|direction| Message::Expand { direction }),
                direction.prop_map(|direction| Message::Shrink { direction }),
            ]
        }

        proptest! {
            /// Tests that no key sequence breaks the layout or strands the cursor.
            #[test]
            fn messages_keep_layout_valid(msgs in proptest::collection::vec(arb_message(), 1..80)) {
                let mut app = app(2, 3);
                for msg in &msgs {
                    app.update(msg.clone());
                    let grid = app.grid().state();
                    prop_assert_eq!(grid.invariant_violation(), None, "after {:?}", msg);
                    prop_assert!(grid.contains(app.state.cursor), "cursor out of bounds after {:?}", msg);
                    if let Some(anchor) = app.state.carrying {
                        prop_assert!(grid.is_anchor(anchor));
                    }
                    prop_assert_eq!(app.settings().rows, grid.rows());
                    prop_assert_eq!(app.settings().columns, grid.cols());
                }
            }
        }
    }
}
