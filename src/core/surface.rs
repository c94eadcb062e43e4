//! Display surface abstraction
//!
//! The console never draws anything itself. It instructs a surface to
//! append transcript lines, show or hide the prompt, move the caret and
//! so on. The surface also owns the input field the user types into.

use std::collections::VecDeque;

/// A committed transcript line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLine {
    pub text: String,
    /// Style class tag, resolved to colors by the surface
    pub style: Option<String>,
}

impl OutputLine {
    pub fn new(text: impl Into<String>, style: Option<&str>) -> Self {
        Self {
            text: text.into(),
            style: style.map(str::to_string),
        }
    }
}

/// Operations the console needs from whatever renders it
pub trait DisplaySurface {
    /// Append one line to the transcript
    fn append_output_line(&mut self, text: &str, style: Option<&str>);

    /// Remove the oldest transcript line, if any
    fn evict_oldest_output_line(&mut self);

    /// Remove every transcript line
    fn clear_output(&mut self);

    /// Number of lines currently rendered in the transcript
    fn output_line_count(&self) -> usize;

    fn set_prompt_visible(&mut self, visible: bool);

    fn set_prompt_label(&mut self, label: &str);

    fn set_input_value(&mut self, text: &str);

    fn input_value(&self) -> String;

    /// Focus the input field with the caret after the last character
    fn focus_input_at_end(&mut self);

    fn scroll_to_end(&mut self);

    fn scroll_to_top(&mut self);

    /// Whether the view currently shows the end of the transcript
    fn is_scrolled_to_end(&self) -> bool;

    /// Raw `(width, height)` of one glyph cell as measured by a probe
    fn measure_glyph_cell(&mut self) -> (i32, i32);

    fn scrollbar_width(&mut self) -> u16;

    /// Text area size in cells, for wrapping and paging
    fn set_text_area(&mut self, _cols: u16, _rows: u16) {}

    /// Switch to the alert look
    fn trigger_alert(&mut self);

    /// Revert the alert look
    fn clear_alert(&mut self);
}

/// Headless surface that keeps everything in memory.
///
/// Useful for embedding the console where rendering happens elsewhere,
/// and for inspecting console behavior.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    lines: VecDeque<OutputLine>,
    prompt_visible: bool,
    prompt_label: String,
    input: String,
    caret: usize,
    scrolled_to_end: bool,
    alert: bool,
    alert_count: usize,
    glyph: (i32, i32),
    scrollbar: u16,
    text_area: (u16, u16),
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    pub fn new() -> Self {
        Self {
            lines: VecDeque::new(),
            prompt_visible: false,
            prompt_label: String::new(),
            input: String::new(),
            caret: 0,
            scrolled_to_end: true,
            alert: false,
            alert_count: 0,
            glyph: (1, 1),
            scrollbar: 0,
            text_area: (0, 0),
        }
    }

    /// Report these raw values from the glyph probe
    pub fn with_glyph_probe(mut self, width: i32, height: i32) -> Self {
        self.glyph = (width, height);
        self
    }

    pub fn with_scrollbar_width(mut self, width: u16) -> Self {
        self.scrollbar = width;
        self
    }

    /// Simulate the user typing at the caret
    pub fn type_text(&mut self, text: &str) {
        let at = byte_index(&self.input, self.caret);
        self.input.insert_str(at, text);
        self.caret += text.chars().count();
    }

    /// Transcript lines, oldest first
    pub fn lines(&self) -> impl Iterator<Item = &OutputLine> {
        self.lines.iter()
    }

    /// Transcript text, oldest first
    pub fn transcript(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.text.clone()).collect()
    }

    pub fn prompt_visible(&self) -> bool {
        self.prompt_visible
    }

    pub fn prompt_label(&self) -> &str {
        &self.prompt_label
    }

    /// Caret position in characters
    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn alert_active(&self) -> bool {
        self.alert
    }

    /// How many times the alert was triggered
    pub fn alert_count(&self) -> usize {
        self.alert_count
    }

    /// Last `(cols, rows)` pushed by the console
    pub fn text_area(&self) -> (u16, u16) {
        self.text_area
    }

    /// Pretend the user scrolled away from (or back to) the end
    pub fn set_scrolled_to_end(&mut self, at_end: bool) {
        self.scrolled_to_end = at_end;
    }
}

impl DisplaySurface for MemorySurface {
    fn append_output_line(&mut self, text: &str, style: Option<&str>) {
        self.lines.push_back(OutputLine::new(text, style));
    }

    fn evict_oldest_output_line(&mut self) {
        self.lines.pop_front();
    }

    fn clear_output(&mut self) {
        self.lines.clear();
    }

    fn output_line_count(&self) -> usize {
        self.lines.len()
    }

    fn set_prompt_visible(&mut self, visible: bool) {
        self.prompt_visible = visible;
    }

    fn set_prompt_label(&mut self, label: &str) {
        self.prompt_label = label.to_string();
    }

    fn set_input_value(&mut self, text: &str) {
        self.input = text.to_string();
        self.caret = self.caret.min(self.input.chars().count());
    }

    fn input_value(&self) -> String {
        self.input.clone()
    }

    fn focus_input_at_end(&mut self) {
        self.caret = self.input.chars().count();
    }

    fn scroll_to_end(&mut self) {
        self.scrolled_to_end = true;
    }

    fn scroll_to_top(&mut self) {
        self.scrolled_to_end = self.lines.is_empty();
    }

    fn is_scrolled_to_end(&self) -> bool {
        self.scrolled_to_end
    }

    fn measure_glyph_cell(&mut self) -> (i32, i32) {
        self.glyph
    }

    fn scrollbar_width(&mut self) -> u16 {
        self.scrollbar
    }

    fn set_text_area(&mut self, cols: u16, rows: u16) {
        self.text_area = (cols, rows);
    }

    fn trigger_alert(&mut self) {
        self.alert = true;
        self.alert_count += 1;
    }

    fn clear_alert(&mut self) {
        self.alert = false;
    }
}

/// Byte offset of the `chars`-th character in `s`
pub(crate) fn byte_index(s: &str, chars: usize) -> usize {
    s.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
