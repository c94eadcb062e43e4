//! Terminal surface using crossterm
//!
//! Keeps the transcript, prompt and input field in memory and draws them
//! bottom-anchored on the alternate screen. Long lines wrap at the current
//! column count.

use std::collections::VecDeque;
use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{KeyCode, KeyEvent},
    execute, queue,
    style::{
        Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use unicode_width::UnicodeWidthChar;

use super::keymapper::Modifiers;
use crate::config::{Color, ColorScheme, ConsoleConfig};
use crate::core::surface::{byte_index, DisplaySurface, OutputLine};

/// What a visual row belongs to
#[derive(Clone, Copy, Debug, PartialEq)]
enum RowKind {
    Output(Option<Color>),
    Prompt,
}

/// Crossterm-backed display surface
pub struct TerminalSurface {
    lines: VecDeque<OutputLine>,
    prompt_visible: bool,
    prompt_label: String,
    input: String,
    /// Caret position in characters
    caret: usize,
    /// Visual rows scrolled up from the bottom
    scroll_offset: usize,
    alert: bool,
    size: (u16, u16),
    scheme: ColorScheme,
    config: ConsoleConfig,
    /// Whether the terminal has been initialized
    initialized: bool,
}

impl TerminalSurface {
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            lines: VecDeque::new(),
            prompt_visible: false,
            prompt_label: String::new(),
            input: String::new(),
            caret: 0,
            scroll_offset: 0,
            alert: false,
            size: (80, 24),
            scheme: config.get_color_scheme(),
            config: config.clone(),
            initialized: false,
        }
    }

    /// Initialize the terminal for rendering
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            DisableLineWrap,
            Clear(ClearType::All),
            MoveTo(0, 0)
        )?;
        self.size = terminal::size()?;
        self.initialized = true;
        Ok(())
    }

    /// Cleanup the terminal
    pub fn cleanup(&mut self) -> io::Result<()> {
        if !self.initialized {
            return Ok(());
        }
        self.initialized = false;

        let mut stdout = io::stdout();
        let _ = execute!(stdout, ResetColor, SetAttribute(Attribute::Reset));
        let _ = execute!(stdout, Show, EnableLineWrap, LeaveAlternateScreen);
        let _ = stdout.flush();

        // Disable raw mode - this is the most important part
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Apply default editing for a key the console passed through.
    ///
    /// Returns `true` if the input field or the view changed.
    pub fn edit(&mut self, event: &KeyEvent) -> bool {
        let mods = Modifiers::from(event.modifiers);
        let len = self.input.chars().count();

        match event.code {
            KeyCode::Char(ch) if !mods.intersects(Modifiers::CTRL | Modifiers::ALT) => {
                let at = byte_index(&self.input, self.caret);
                self.input.insert(at, ch);
                self.caret += 1;
                self.scroll_offset = 0;
            }
            KeyCode::Backspace if self.caret > 0 => {
                let at = byte_index(&self.input, self.caret - 1);
                self.input.remove(at);
                self.caret -= 1;
            }
            KeyCode::Delete if self.caret < len => {
                let at = byte_index(&self.input, self.caret);
                self.input.remove(at);
            }
            KeyCode::Left if self.caret > 0 => self.caret -= 1,
            KeyCode::Right if self.caret < len => self.caret += 1,
            KeyCode::Home => self.caret = 0,
            KeyCode::End => self.caret = len,
            KeyCode::PageUp => self.scroll_view_up(self.page()),
            KeyCode::PageDown => self.scroll_view_down(self.page()),
            _ => return false,
        }
        true
    }

    /// Insert pasted text at the caret, dropping line breaks
    pub fn paste(&mut self, text: &str) {
        let clean: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        let at = byte_index(&self.input, self.caret);
        self.input.insert_str(at, &clean);
        self.caret += clean.chars().count();
        self.scroll_offset = 0;
    }

    fn page(&self) -> usize {
        (self.size.1 as usize).saturating_sub(1).max(1)
    }

    pub fn scroll_view_up(&mut self, rows: usize) {
        self.scroll_offset = (self.scroll_offset + rows).min(self.max_scroll());
    }

    pub fn scroll_view_down(&mut self, rows: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(rows);
    }

    fn max_scroll(&self) -> usize {
        self.build_rows()
            .len()
            .saturating_sub(self.size.1 as usize)
    }

    /// Number of visual rows a line takes at the current width
    fn wrapped_height(&self, text: &str) -> usize {
        wrap(text, self.size.0 as usize).len()
    }

    /// All visual rows, oldest first, prompt last
    fn build_rows(&self) -> Vec<(String, RowKind)> {
        let width = self.size.0 as usize;
        let mut rows = Vec::new();
        for line in &self.lines {
            let color = line
                .style
                .as_deref()
                .and_then(|class| self.config.style_color(class));
            for row in wrap(&line.text, width) {
                rows.push((row, RowKind::Output(color)));
            }
        }
        if self.prompt_visible {
            let prompt = format!("{}{}", self.prompt_label, self.input);
            for row in wrap(&prompt, width) {
                rows.push((row, RowKind::Prompt));
            }
        }
        rows
    }

    /// Caret cell relative to the first prompt row
    fn caret_cell(&self) -> (u16, u16) {
        let width = (self.size.0 as usize).max(1);
        let before: usize = self
            .prompt_label
            .chars()
            .chain(self.input.chars().take(self.caret))
            .map(|c| c.width().unwrap_or(0))
            .sum();
        ((before % width) as u16, (before / width) as u16)
    }

    /// Render the console to stdout
    pub fn render(&mut self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut stdout = io::BufWriter::with_capacity(65536, stdout.lock());

        // Begin synchronized update (reduces flicker)
        write!(stdout, "\x1b[?2026h")?;
        self.draw(&mut stdout)?;
        // End synchronized update
        write!(stdout, "\x1b[?2026l")?;
        stdout.flush()
    }

    /// Draw the visible window of rows
    pub fn draw<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let (cols, height) = (self.size.0, self.size.1 as usize);
        let rows = self.build_rows();
        let end = rows.len().saturating_sub(self.scroll_offset);
        let start = end.saturating_sub(height);

        queue!(out, Hide)?;
        if self.alert {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }

        let mut prompt_top = None;
        for screen_row in 0..height {
            queue!(out, MoveTo(0, screen_row as u16), Clear(ClearType::UntilNewLine))?;
            let Some((text, kind)) = rows.get(start + screen_row) else {
                continue;
            };
            let fg = match kind {
                RowKind::Output(Some(color)) => *color,
                RowKind::Output(None) => self.scheme.output_fg,
                RowKind::Prompt => {
                    prompt_top.get_or_insert(screen_row as u16);
                    self.scheme.prompt_fg
                }
            };
            queue!(
                out,
                SetBackgroundColor(self.scheme.output_bg.to_crossterm()),
                SetForegroundColor(fg.to_crossterm()),
                Print(text)
            )?;
        }

        // Show scroll indicator if scrolled
        if self.scroll_offset > 0 {
            queue!(
                out,
                MoveTo(0, 0),
                SetForegroundColor(self.scheme.indicator_fg.to_crossterm()),
                Print(format!("[↑ {} lines]", self.scroll_offset))
            )?;
        }

        queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;

        if let Some(top) = prompt_top {
            let (col, row) = self.caret_cell();
            let row = top.saturating_add(row);
            if (row as usize) < height && col < cols {
                queue!(out, MoveTo(col, row), Show)?;
            }
        }
        Ok(())
    }

    /// Get terminal size
    pub fn size() -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

impl DisplaySurface for TerminalSurface {
    fn append_output_line(&mut self, text: &str, style: Option<&str>) {
        // Keep the view still while the user is scrolled back
        if self.scroll_offset > 0 {
            self.scroll_offset += self.wrapped_height(text);
        }
        self.lines.push_back(OutputLine::new(text, style));
    }

    fn evict_oldest_output_line(&mut self) {
        if self.lines.pop_front().is_some() {
            self.scroll_offset = self.scroll_offset.min(self.max_scroll());
        }
    }

    fn clear_output(&mut self) {
        self.lines.clear();
        self.scroll_offset = 0;
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
        self.scroll_offset = 0;
    }

    fn scroll_to_top(&mut self) {
        self.scroll_offset = self.max_scroll();
    }

    fn is_scrolled_to_end(&self) -> bool {
        self.scroll_offset == 0
    }

    fn measure_glyph_cell(&mut self) -> (i32, i32) {
        // Terminal geometry is already counted in cells
        (1, 1)
    }

    fn scrollbar_width(&mut self) -> u16 {
        0
    }

    fn set_text_area(&mut self, cols: u16, rows: u16) {
        self.size = (cols, rows);
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    fn trigger_alert(&mut self) {
        self.alert = true;
    }

    fn clear_alert(&mut self) {
        self.alert = false;
    }
}

/// Wrap text into rows no wider than `width` columns.
///
/// Always yields at least one row. Wide characters never straddle a row
/// boundary.
fn wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    let mut rows = Vec::new();
    let mut row = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width && !row.is_empty() {
            rows.push(std::mem::take(&mut row));
            used = 0;
        }
        row.push(ch);
        used += w;
    }
    rows.push(row);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn surface(cols: u16, rows: u16) -> TerminalSurface {
        let mut s = TerminalSurface::new(&ConsoleConfig::default());
        s.set_text_area(cols, rows);
        s
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("", 4), vec![""]);
        assert_eq!(wrap("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(wrap("abcd", 4), vec!["abcd"]);
        // Wide characters take two columns
        assert_eq!(wrap("日本語", 4), vec!["日本", "語"]);
        assert_eq!(wrap("a日本", 4), vec!["a日", "本"]);
    }

    #[test]
    fn test_edit_inserts_and_moves_caret() {
        let mut s = surface(20, 5);
        assert!(s.edit(&key(KeyCode::Char('a'))));
        assert!(s.edit(&key(KeyCode::Char('c'))));
        assert!(s.edit(&key(KeyCode::Left)));
        assert!(s.edit(&key(KeyCode::Char('b'))));
        assert_eq!(s.input_value(), "abc");
        assert!(s.edit(&key(KeyCode::Home)));
        assert!(s.edit(&key(KeyCode::Delete)));
        assert_eq!(s.input_value(), "bc");
        assert!(s.edit(&key(KeyCode::End)));
        assert!(s.edit(&key(KeyCode::Backspace)));
        assert_eq!(s.input_value(), "b");
    }

    #[test]
    fn test_edit_ignores_ctrl_chars() {
        let mut s = surface(20, 5);
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(!s.edit(&event));
        assert!(!s.edit(&key(KeyCode::Backspace)));
        assert_eq!(s.input_value(), "");
    }

    #[test]
    fn test_paste_drops_newlines() {
        let mut s = surface(20, 5);
        s.paste("ls\n-la");
        assert_eq!(s.input_value(), "ls-la");
    }

    #[test]
    fn test_rows_include_prompt_when_visible() {
        let mut s = surface(6, 5);
        s.append_output_line("hello world", Some("error"));
        s.set_prompt_label("> ");
        s.set_input_value("abc");
        assert_eq!(s.build_rows().len(), 2);
        s.set_prompt_visible(true);
        let rows = s.build_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].0, "hello ");
        assert_eq!(rows[0].1, RowKind::Output(Color::by_name("red")));
        assert_eq!(rows[2], ("> abc".to_string(), RowKind::Prompt));
    }

    #[test]
    fn test_caret_cell_wraps() {
        let mut s = surface(4, 5);
        s.set_prompt_label("> ");
        s.set_input_value("abcd");
        s.focus_input_at_end();
        assert_eq!(s.caret_cell(), (2, 1));
    }

    #[test]
    fn test_scrolling() {
        let mut s = surface(10, 2);
        for i in 0..5 {
            s.append_output_line(&format!("line {}", i), None);
        }
        assert!(s.is_scrolled_to_end());
        s.scroll_to_top();
        assert_eq!(s.scroll_offset, 3);
        // New output does not move a scrolled-back view
        s.append_output_line("line 5", None);
        assert_eq!(s.scroll_offset, 4);
        s.scroll_view_down(10);
        assert!(s.is_scrolled_to_end());
    }

    #[test]
    fn test_draw_writes_visible_rows() {
        let mut s = surface(20, 3);
        s.append_output_line("first", None);
        s.append_output_line("second", None);
        s.set_prompt_label("$ ");
        s.set_prompt_visible(true);
        let mut out = Vec::new();
        s.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("first"));
        assert!(text.contains("second"));
        assert!(text.contains("$ "));
    }
}
