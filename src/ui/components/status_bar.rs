// 상태바: 커서 항목 정보, 마킹 요약, 진행 중인 작업 수

use crate::models::Entry;
use crate::ui::theme::Theme;
use crate::utils::formatter::{format_date, format_file_size, pluralize};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

pub struct StatusBar<'a> {
    entry: Option<&'a Entry>,
    /// 커서가 ".." 행에 있음
    parent_row: bool,
    /// 디렉토리 요약 (디렉토리 수, 파일 수, 파일 크기 합)
    totals: Option<(usize, usize, u64)>,
    marked_count: usize,
    marked_size: u64,
    running: usize,
    /// 설정되면 항목 정보 대신 표시
    message: Option<&'a str>,
    bg_color: Color,
    fg_color: Color,
    accent_color: Color,
}

impl Default for StatusBar<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> StatusBar<'a> {
    pub fn new() -> Self {
        Self {
            entry: None,
            parent_row: false,
            totals: None,
            marked_count: 0,
            marked_size: 0,
            running: 0,
            message: None,
            bg_color: Color::Reset,
            fg_color: Color::Gray,
            accent_color: Color::Yellow,
        }
    }

    pub fn entry(mut self, entry: Option<&'a Entry>) -> Self {
        self.entry = entry;
        self
    }

    pub fn parent_row(mut self, parent_row: bool) -> Self {
        self.parent_row = parent_row;
        self
    }

    pub fn totals(mut self, dirs: usize, files: usize, size: u64) -> Self {
        self.totals = Some((dirs, files, size));
        self
    }

    pub fn marked(mut self, count: usize, size: u64) -> Self {
        self.marked_count = count;
        self.marked_size = size;
        self
    }

    pub fn running(mut self, count: usize) -> Self {
        self.running = count;
        self
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }

    /// 테마 적용
    pub fn theme(mut self, theme: &Theme) -> Self {
        self.bg_color = theme.status_bar_bg.to_color();
        self.fg_color = theme.status_bar_fg.to_color();
        self.accent_color = theme.accent.to_color();
        self
    }

    fn left_text(&self) -> String {
        if let Some(message) = self.message {
            return format!(" {}", message);
        }
        match self.entry {
            Some(entry) => {
                let size = if entry.is_dir() {
                    "<DIR>".to_string()
                } else {
                    format_file_size(entry.size)
                };
                let modified = entry.modified.map(format_date).unwrap_or_default();
                format!(
                    " {} | {} | {} | {}",
                    entry.name,
                    size,
                    entry.permissions(),
                    modified
                )
            }
            None if self.parent_row => " Parent Directory".to_string(),
            None => " (empty)".to_string(),
        }
    }

    fn right_text(&self) -> String {
        let mut parts = Vec::new();
        if self.marked_count > 0 {
            parts.push(format!(
                "{} marked ({})",
                self.marked_count,
                format_file_size(self.marked_size)
            ));
        } else if let Some((dirs, files, size)) = self.totals {
            parts.push(format!(
                "{}, {} ({})",
                pluralize(dirs, "dir", "dirs"),
                pluralize(files, "file", "files"),
                format_file_size(size)
            ));
        }
        if self.running > 0 {
            parts.push(format!(
                "{} running",
                pluralize(self.running, "operation", "operations")
            ));
        }
        if parts.is_empty() {
            String::new()
        } else {
            format!("{} ", parts.join(" | "))
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(self.bg_color));

        let left = self.left_text();
        let right = self.right_text();
        let padding = (area.width as usize).saturating_sub(left.width() + right.width());

        let line = Line::from(vec![
            Span::styled(left, Style::default().fg(self.fg_color)),
            Span::raw(" ".repeat(padding)),
            Span::styled(right, Style::default().fg(self.accent_color)),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}
