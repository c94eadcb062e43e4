//! Console session
//!
//! The console keeps a transcript and a prompt looking like one scrolling
//! terminal even though committed output and the live input line take
//! different paths to the surface. Key events, host prints and prompt
//! requests all funnel through [`Console`].

use std::time::Instant;

use crossterm::event::KeyEvent;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use super::alert::AlertTimer;
use super::control::{self, ControlAction};
use super::history::{CommandHistory, Direction};
use super::metrics::{Geometry, GlyphCell};
use super::surface::DisplaySurface;
use crate::config::{ConsoleConfig, ScrollAnchor};
use crate::ui::keymapper::{KeyAction, KeyInterpreter};

/// Console errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("No input handler attached to the console")]
    MissingHandler,

    #[error("Console has been unmounted")]
    Detached,

    #[error("Input handler is already running")]
    HandlerBusy,
}

/// Receives what the user submits.
///
/// Both callbacks get the console back so they can print a response and
/// show the next prompt.
pub trait InputHandler<S: DisplaySurface> {
    /// A line was submitted. The prompt stays hidden until the handler
    /// calls [`Console::prompt`] or [`Console::prompt_with`].
    fn on_submit(&mut self, console: &mut Console<S>, line: &str);

    /// Tab was pressed with `input` in the field
    fn on_suggest(&mut self, _console: &mut Console<S>, _input: &str) {}
}

/// Result of feeding a key event to the console
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The console acted on the key
    Handled,
    /// Default editing of the input field should apply
    PassThrough,
    /// Not a keystroke, nothing happened
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Mounted,
    Unmounted,
}

/// Line-oriented console session
pub struct Console<S: DisplaySurface> {
    surface: S,
    config: ConsoleConfig,
    handler: Option<Box<dyn InputHandler<S>>>,
    /// Handler is checked out for a callback
    dispatching: bool,
    history: CommandHistory,
    prompt_active: bool,
    focused: bool,
    geometry: Geometry,
    alert: AlertTimer,
    /// Whether the view was at the end before the first transcript change
    scrolled_to_end: Option<bool>,
    lifecycle: Lifecycle,
}

impl<S: DisplaySurface> Console<S> {
    /// Create a console drawing on `surface`. The prompt starts hidden.
    pub fn new(mut surface: S, config: ConsoleConfig) -> Self {
        surface.set_prompt_visible(false);
        surface.set_prompt_label(&config.prompt_label);
        Self {
            surface,
            config,
            handler: None,
            dispatching: false,
            history: CommandHistory::new(),
            prompt_active: false,
            focused: false,
            geometry: Geometry::default(),
            alert: AlertTimer::new(),
            scrolled_to_end: None,
            lifecycle: Lifecycle::Created,
        }
    }

    /// Attach the handler that receives submitted lines
    pub fn set_handler<H>(&mut self, handler: H)
    where
        H: InputHandler<S> + 'static,
    {
        self.handler = Some(Box::new(handler));
    }

    /// Builder form of [`Console::set_handler`]
    pub fn with_handler<H>(mut self, handler: H) -> Self
    where
        H: InputHandler<S> + 'static,
    {
        self.set_handler(handler);
        self
    }

    /// Bring the console up.
    ///
    /// Measures the surface once, applies the prompt label and buffer cap,
    /// prints the greeting and shows the prompt. Fails if no handler is
    /// attached.
    pub fn mount(&mut self) -> Result<(), ConsoleError> {
        if self.lifecycle == Lifecycle::Unmounted {
            return Err(ConsoleError::Detached);
        }
        if self.handler.is_none() {
            return Err(ConsoleError::MissingHandler);
        }

        let (w, h) = self.surface.measure_glyph_cell();
        let cell = GlyphCell::sanitize(w, h);
        let scrollbar = self.surface.scrollbar_width();
        self.geometry = Geometry::new(cell, scrollbar, self.config.padding);
        debug!(
            "Glyph cell {}x{} (probe {}x{}), scrollbar {}",
            cell.width, cell.height, w, h, scrollbar
        );

        let label = self.config.prompt_label.clone();
        self.set_prompt_label(&label);
        self.set_max_buffer_lines(self.config.max_buffer_lines);
        self.lifecycle = Lifecycle::Mounted;

        let greeting = self.config.greeting.clone();
        self.print(&greeting);
        self.prompt();
        if self.config.initial_scroll_anchor == ScrollAnchor::Top {
            self.surface.scroll_to_top();
        }

        info!("Console mounted");
        Ok(())
    }

    /// Detach the handler; no more lines are accepted afterwards
    pub fn unmount(&mut self) {
        if self.lifecycle == Lifecycle::Unmounted {
            return;
        }
        self.handler = None;
        self.lifecycle = Lifecycle::Unmounted;
        if self.alert.is_active() {
            self.alert.cancel();
            self.surface.clear_alert();
        }
        info!("Console unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    fn ensure_attached(&self) -> Result<(), ConsoleError> {
        if self.lifecycle == Lifecycle::Unmounted {
            Err(ConsoleError::Detached)
        } else {
            Ok(())
        }
    }

    // --- Keyboard ---

    /// Feed a key event.
    ///
    /// Every keystroke shows the prompt first, so typing after a host print
    /// brings the input line back.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Result<KeyOutcome, ConsoleError> {
        self.ensure_attached()?;
        let input_is_empty = self.surface.input_value().is_empty();
        let action = KeyInterpreter::classify(event, input_is_empty);
        if action == KeyAction::Ignore {
            return Ok(KeyOutcome::Ignored);
        }

        self.set_prompt_active(true);

        match action {
            KeyAction::Submit => self.submit()?,
            KeyAction::HistoryBrowse(direction) => self.browse_history(direction),
            KeyAction::SuggestionRequest => self.suggest()?,
            KeyAction::Bell => self.bell(),
            KeyAction::Control(ch) => self.handle_control_char(ch.key())?,
            KeyAction::PassThrough | KeyAction::Ignore => return Ok(KeyOutcome::PassThrough),
        }
        Ok(KeyOutcome::Handled)
    }

    /// Run the action bound to a Ctrl character. Unknown characters ring
    /// the bell.
    pub fn handle_control_char(&mut self, ch: char) -> Result<(), ConsoleError> {
        match control::action_for(ch) {
            ControlAction::Bell => self.bell(),
            ControlAction::Submit => self.submit()?,
            ControlAction::FormFeed => self.form_feed(),
            ControlAction::InsertTab => self.insert_tab(),
        }
        Ok(())
    }

    // --- Submit and suggestions ---

    /// Commit the current input.
    ///
    /// Echoes `label + line` when configured, records non-empty lines in
    /// history and hands the line to the handler. If no handler is attached
    /// the echo and history still happen and `MissingHandler` is returned.
    pub fn submit(&mut self) -> Result<(), ConsoleError> {
        self.ensure_attached()?;
        let raw = self.surface.input_value();
        let line = if self.config.trim_input_on_submit {
            raw.trim().to_string()
        } else {
            raw
        };

        if self.config.echo_on_submit {
            self.set_prompt_active(false);
            let echo = format!("{}{}", self.config.prompt_label, line);
            self.print(&echo);
        }
        if self.history.add(&line) {
            debug!("History entry #{}: {:?}", self.history.len(), line);
        }

        self.dispatch(|handler, console| handler.on_submit(console, &line))
    }

    /// Ask the handler to suggest a completion for the current input
    pub fn suggest(&mut self) -> Result<(), ConsoleError> {
        self.ensure_attached()?;
        let input = self.surface.input_value();
        self.dispatch(|handler, console| handler.on_suggest(console, &input))
    }

    /// Check the handler out, run `f`, and put it back unless the callback
    /// replaced it or unmounted the console.
    fn dispatch<F>(&mut self, f: F) -> Result<(), ConsoleError>
    where
        F: FnOnce(&mut Box<dyn InputHandler<S>>, &mut Self),
    {
        let mut handler = match self.handler.take() {
            Some(handler) => handler,
            None if self.dispatching => return Err(ConsoleError::HandlerBusy),
            None => {
                warn!("Input dropped: no handler attached");
                return Err(ConsoleError::MissingHandler);
            }
        };

        self.dispatching = true;
        f(&mut handler, self);
        self.dispatching = false;

        if self.handler.is_none() && self.lifecycle != Lifecycle::Unmounted {
            self.handler = Some(handler);
        }
        Ok(())
    }

    /// Same as a carriage return
    pub fn line_feed(&mut self) -> Result<(), ConsoleError> {
        self.submit()
    }

    // --- History ---

    /// Show the previous or next history entry, or a blank line past
    /// either end
    pub fn browse_history(&mut self, direction: Direction) {
        match self.history.browse(direction).map(str::to_string) {
            Some(entry) => self.prompt_with(&entry),
            None => self.prompt(),
        }
    }

    /// Seed history from an earlier session.
    ///
    /// Only works once: does nothing if history already has entries or
    /// `entries` is empty. Seeded commands are replayed into the transcript
    /// as already committed lines, without reaching the handler. When no
    /// buffer cap is set, the entry count becomes the cap.
    pub fn add_previous_history<I, T>(&mut self, entries: I) -> bool
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        if !self.history.seed(entries.iter().cloned()) {
            return false;
        }
        if self.config.max_buffer_lines == 0 {
            self.config.max_buffer_lines = self.history.len();
        }

        self.set_prompt_active(false);
        for command in &entries {
            let line = format!("{}{}", self.config.prompt_label, command);
            self.print(&line);
        }
        self.set_prompt_active(true);
        self.surface.scroll_to_end();
        true
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    // --- Output ---

    /// Print text to the transcript
    pub fn print(&mut self, text: &str) {
        self.print_styled(text, None);
    }

    /// Print text followed by a line break
    pub fn println(&mut self, text: &str) {
        self.print_styled(&format!("{}\n", text), None);
    }

    /// Print text followed by a line break, tagged with a style class
    pub fn println_styled(&mut self, text: &str, style: Option<&str>) {
        self.print_styled(&format!("{}\n", text), style);
    }

    /// Print text tagged with a style class.
    ///
    /// If the prompt is showing, its label and the live input are folded in
    /// front of the text and the prompt is hidden, so nothing the user typed
    /// disappears from view. Printing empty text with an empty input does
    /// nothing.
    pub fn print_styled(&mut self, text: &str, style: Option<&str>) {
        self.capture_scroll_state();

        if text.is_empty() && self.surface.input_value().is_empty() {
            return;
        }
        let mut text = text.replace('\t', &self.config.tab_expansion);
        if self.prompt_active {
            self.set_prompt_active(false);
            text = format!("{}{}", self.effective_content(), text);
        }

        for line in split_lines(&text) {
            self.surface.append_output_line(line, style);
        }
        self.enforce_buffer_cap();
    }

    /// Prompt label followed by the live input
    pub fn effective_content(&self) -> String {
        format!("{}{}", self.config.prompt_label, self.surface.input_value())
    }

    /// Evict the oldest transcript lines until the cap holds
    pub fn enforce_buffer_cap(&mut self) {
        let cap = self.config.max_buffer_lines;
        if cap == 0 {
            return;
        }
        while self.surface.output_line_count() > cap {
            self.surface.evict_oldest_output_line();
            trace!("Evicted oldest line, cap {}", cap);
        }
    }

    /// Remove every transcript line
    pub fn clear_buffer(&mut self) {
        self.surface.clear_output();
    }

    /// Clear the transcript, print the greeting and show a fresh prompt.
    /// Configuration and history are kept.
    pub fn reset(&mut self) {
        self.capture_scroll_state();
        self.set_prompt_active(false);
        self.clear_buffer();
        let greeting = self.config.greeting.clone();
        self.print(&greeting);
        self.prompt();
    }

    /// Scroll to the end and re-apply the buffer cap
    pub fn form_feed(&mut self) {
        self.surface.scroll_to_end();
        self.enforce_buffer_cap();
    }

    /// Append the tab expansion to the input
    pub fn insert_tab(&mut self) {
        let input = self.surface.input_value() + &self.config.tab_expansion;
        self.prompt_with(&input);
    }

    // --- Prompt ---

    /// Show an empty prompt
    pub fn prompt(&mut self) {
        self.prompt_with("");
    }

    /// Show the prompt with `text` in the input field
    pub fn prompt_with(&mut self, text: &str) {
        self.set_prompt_active(true);
        self.surface.set_prompt_label(&self.config.prompt_label);
        self.set_input(text);
        self.surface.scroll_to_end();
    }

    /// Re-show the prompt if focused and bring it into view
    pub fn focus_input(&mut self) {
        if self.focused {
            self.set_prompt_active(true);
        }
        self.surface.scroll_to_end();
        self.surface.set_prompt_label(&self.config.prompt_label);
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.focused = focused;
        if focused {
            self.surface.focus_input_at_end();
        }
    }

    fn set_input(&mut self, text: &str) {
        self.surface.set_input_value(text);
        if self.focused {
            self.surface.focus_input_at_end();
        }
    }

    fn set_prompt_active(&mut self, active: bool) {
        if self.prompt_active != active {
            self.prompt_active = active;
            self.surface.set_prompt_visible(active);
        }
    }

    pub fn is_prompt_active(&self) -> bool {
        self.prompt_active
    }

    /// Current input text
    pub fn input(&self) -> String {
        self.surface.input_value()
    }

    pub fn prompt_label(&self) -> &str {
        &self.config.prompt_label
    }

    pub fn set_prompt_label(&mut self, label: &str) {
        self.config.prompt_label = label.to_string();
        self.surface.set_prompt_label(label);
    }

    // --- Configuration ---

    pub fn max_buffer_lines(&self) -> usize {
        self.config.max_buffer_lines
    }

    /// Change the buffer cap (0 = unbounded) and apply it right away
    pub fn set_max_buffer_lines(&mut self, max: usize) {
        self.config.max_buffer_lines = max;
        self.enforce_buffer_cap();
    }

    pub fn tab_expansion(&self) -> &str {
        &self.config.tab_expansion
    }

    pub fn set_tab_expansion(&mut self, tabs: &str) {
        self.config.tab_expansion = tabs.to_string();
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    // --- Alert ---

    /// Flash the alert look. Ringing while an alert is showing restarts
    /// the revert timer instead of stacking.
    pub fn bell(&mut self) {
        if self.alert.is_active() {
            self.alert.cancel();
            self.surface.clear_alert();
        }
        self.surface.trigger_alert();
        self.alert.restart(Instant::now());
        trace!("Bell");
    }

    /// Advance timers; reverts the alert once its deadline passes
    pub fn tick(&mut self, now: Instant) {
        if self.alert.poll(now) {
            self.surface.clear_alert();
        }
    }

    /// When [`Console::tick`] next needs to run, if at all
    pub fn next_deadline(&self) -> Option<Instant> {
        self.alert.deadline()
    }

    // --- Geometry ---

    /// Recompute rows and columns for a new outer size
    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        if !self.geometry.resize(width, height) {
            return false;
        }
        self.surface
            .set_text_area(self.geometry.cols, self.geometry.rows);
        debug!("Resize: {}x{} cells", self.geometry.cols, self.geometry.rows);
        true
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn rows(&self) -> u16 {
        self.geometry.rows
    }

    pub fn cols(&self) -> u16 {
        self.geometry.cols
    }

    /// Whether the view was at the end of the transcript right before the
    /// first change to it, or `None` if nothing has changed yet
    pub fn scrolled_to_end(&self) -> Option<bool> {
        self.scrolled_to_end
    }

    fn capture_scroll_state(&mut self) {
        if self.scrolled_to_end.is_none() {
            self.scrolled_to_end = Some(self.surface.is_scrolled_to_end());
        }
    }

    // --- Surface access ---

    pub fn output_line_count(&self) -> usize {
        self.surface.output_line_count()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

/// Split printed text into transcript lines.
///
/// A trailing line break ends the last line instead of opening an empty
/// one, and a `\r` before a line break is dropped.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();
    if lines.len() > 1 && lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}
