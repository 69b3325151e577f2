// 파일 패널 컴포넌트
//
// 디렉토리 스냅샷 하나를 그린다. ".." 행, 커서, 마킹, 테두리, 스크롤바.

use crate::models::{DirectoryModel, Entry, EntryKind};
use crate::ui::theme::Theme;
use crate::utils::formatter::{format_date, format_file_size};
use crate::utils::path_display::{truncate_name, truncate_path};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use unicode_width::UnicodeWidthStr;

/// 패널 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelStatus {
    #[default]
    Inactive,
    Active,
}

pub struct Panel<'a> {
    model: Option<&'a DirectoryModel>,
    status: PanelStatus,
    active_border_color: Color,
    inactive_border_color: Color,
    bg_color: Color,
    fg_color: Color,
    header_color: Color,
    cursor_fg: Color,
    cursor_bg: Color,
    marked_color: Color,
    directory_color: Color,
    executable_color: Color,
    symlink_color: Color,
}

impl Default for Panel<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Panel<'a> {
    pub fn new() -> Self {
        let theme = Theme::default();
        Self {
            model: None,
            status: PanelStatus::default(),
            active_border_color: theme.panel_active_border.to_color(),
            inactive_border_color: theme.panel_inactive_border.to_color(),
            bg_color: theme.panel_bg.to_color(),
            fg_color: theme.panel_fg.to_color(),
            header_color: theme.header_fg.to_color(),
            cursor_fg: theme.cursor_fg.to_color(),
            cursor_bg: theme.cursor_bg.to_color(),
            marked_color: theme.marked.to_color(),
            directory_color: theme.directory.to_color(),
            executable_color: theme.executable.to_color(),
            symlink_color: theme.symlink.to_color(),
        }
    }

    pub fn model(mut self, model: &'a DirectoryModel) -> Self {
        self.model = Some(model);
        self
    }

    pub fn status(mut self, status: PanelStatus) -> Self {
        self.status = status;
        self
    }

    pub fn active(mut self) -> Self {
        self.status = PanelStatus::Active;
        self
    }

    /// 테마 적용
    pub fn theme(mut self, theme: &Theme) -> Self {
        self.active_border_color = theme.panel_active_border.to_color();
        self.inactive_border_color = theme.panel_inactive_border.to_color();
        self.bg_color = theme.panel_bg.to_color();
        self.fg_color = theme.panel_fg.to_color();
        self.header_color = theme.header_fg.to_color();
        self.cursor_fg = theme.cursor_fg.to_color();
        self.cursor_bg = theme.cursor_bg.to_color();
        self.marked_color = theme.marked.to_color();
        self.directory_color = theme.directory.to_color();
        self.executable_color = theme.executable.to_color();
        self.symlink_color = theme.symlink.to_color();
        self
    }

    fn border_color(&self) -> Color {
        match self.status {
            PanelStatus::Active => self.active_border_color,
            PanelStatus::Inactive => self.inactive_border_color,
        }
    }

    fn entry_color(&self, entry: &Entry) -> Color {
        match entry.kind {
            EntryKind::Directory => self.directory_color,
            EntryKind::Symlink if entry.link_to_dir => self.directory_color,
            EntryKind::Symlink => self.symlink_color,
            _ if entry.executable => self.executable_color,
            _ => self.fg_color,
        }
    }
}

/// 표시 이름. 디렉토리는 `/`, 링크는 `@`, 실행 파일은 `*` 접두.
fn decorated_name(entry: &Entry) -> String {
    let prefix = match entry.kind {
        EntryKind::Directory => "/",
        EntryKind::Symlink => "@",
        _ if entry.executable => "*",
        _ => " ",
    };
    format!("{}{}", prefix, entry.name)
}

/// 크기 컬럼 텍스트. 디렉토리는 크기 대신 표식.
fn size_column(entry: &Entry) -> String {
    if entry.is_dir() {
        if entry.kind == EntryKind::Symlink {
            "<LINK>".to_string()
        } else {
            "<DIR>".to_string()
        }
    } else {
        format_file_size(entry.size)
    }
}

/// 컬럼 폭: (이름, 크기, 날짜). 좁으면 날짜부터 뺀다.
fn column_widths(width: usize) -> (usize, usize, usize) {
    let size_width = 9;
    let date_width = 16;
    match width {
        w if w >= 50 => (w - size_width - date_width - 3, size_width, date_width),
        w if w >= 24 => (w - size_width - 2, size_width, 0),
        w => (w.saturating_sub(1), 0, 0),
    }
}

impl Panel<'_> {
    fn render_header(&self, inner: Rect, buf: &mut Buffer, widths: (usize, usize, usize)) {
        let style = Style::default()
            .fg(self.header_color)
            .add_modifier(Modifier::BOLD);
        let (name_w, size_w, date_w) = widths;

        let mut spans = vec![Span::styled(
            format!(" {:<width$}", "Name", width = name_w),
            style,
        )];
        if size_w > 0 {
            spans.push(Span::styled(
                format!(" {:>width$}", "Size", width = size_w),
                style,
            ));
        }
        if date_w > 0 {
            spans.push(Span::styled(
                format!(" {:<width$}", "Modified", width = date_w),
                style,
            ));
        }
        buf.set_line(inner.x, inner.y, &Line::from(spans), inner.width);
    }

    fn render_entry(
        &self,
        entry: &Entry,
        is_cursor: bool,
        is_marked: bool,
        widths: (usize, usize, usize),
        area: Rect,
        buf: &mut Buffer,
    ) {
        let (name_w, size_w, date_w) = widths;
        let fg = if is_marked {
            self.marked_color
        } else if is_cursor {
            self.cursor_fg
        } else {
            self.entry_color(entry)
        };
        let mut style = Style::default().fg(fg);
        if is_cursor {
            style = style.bg(self.cursor_bg);
        }
        if is_marked {
            style = style.add_modifier(Modifier::BOLD);
        }

        let marker = if is_marked { "+" } else { " " };
        let name = truncate_name(&decorated_name(entry), name_w);
        let padding = name_w.saturating_sub(name.width());

        let mut spans = vec![
            Span::styled(marker, style),
            Span::styled(name, style),
            Span::styled(" ".repeat(padding), style),
        ];
        if size_w > 0 {
            spans.push(Span::styled(
                format!(" {:>width$}", size_column(entry), width = size_w),
                style,
            ));
        }
        if date_w > 0 {
            let date = entry.modified.map(format_date).unwrap_or_default();
            spans.push(Span::styled(
                format!(" {:<width$}", date, width = date_w),
                style,
            ));
        }

        // 커서 행은 끝까지 배경을 채운다
        let used: usize = spans.iter().map(|s| s.content.width()).sum();
        let rest = (area.width as usize).saturating_sub(used);
        if rest > 0 {
            spans.push(Span::styled(" ".repeat(rest), style));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }

    /// ".." 행
    fn render_parent_row(&self, is_cursor: bool, area: Rect, buf: &mut Buffer) {
        let style = if is_cursor {
            Style::default().fg(self.cursor_fg).bg(self.cursor_bg)
        } else {
            Style::default().fg(self.directory_color)
        };
        let text = " /..";
        let padding = (area.width as usize).saturating_sub(text.len());
        let line = Line::from(vec![
            Span::styled(text, style),
            Span::styled(" ".repeat(padding), style),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }

    fn render_scrollbar(&self, model: &DirectoryModel, track: Rect, buf: &mut Buffer) {
        let total = model.row_count();
        let height = track.height as usize;
        if height == 0 || total <= height {
            return;
        }
        let thumb_height = (height * height / total).max(1);
        let max_scroll = total - height;
        let thumb_pos = model.scroll_offset().min(max_scroll) * (height - thumb_height) / max_scroll;

        let track_style = Style::default().fg(self.inactive_border_color);
        let thumb_style = Style::default().fg(self.header_color);
        for i in 0..height {
            let (symbol, style) = if i >= thumb_pos && i < thumb_pos + thumb_height {
                ("┃", thumb_style)
            } else {
                ("│", track_style)
            };
            buf.set_string(track.x, track.y + i as u16, symbol, style);
        }
    }
}

impl Widget for Panel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let Some(model) = self.model else {
            return;
        };

        let title = truncate_path(model.path(), (area.width as usize).saturating_sub(4));
        let title_style = match self.status {
            PanelStatus::Active => Style::default()
                .fg(self.fg_color)
                .add_modifier(Modifier::BOLD),
            PanelStatus::Inactive => Style::default().fg(self.fg_color),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color()))
            .title(Span::styled(format!(" {} ", title), title_style))
            .style(Style::default().bg(self.bg_color));

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height < 2 || inner.width < 4 {
            return;
        }

        let rows = (inner.height - 1) as usize;
        let has_scrollbar = model.row_count() > rows;
        let list_width = inner.width as usize - usize::from(has_scrollbar);
        let widths = column_widths(list_width.saturating_sub(1));

        self.render_header(inner, buf, widths);

        let parent_rows = usize::from(model.has_parent());
        let start = model
            .scroll_offset()
            .min(model.row_count().saturating_sub(1));
        let end = (start + rows).min(model.row_count());
        for (line, row) in (start..end).enumerate() {
            let is_cursor = self.status == PanelStatus::Active && row == model.cursor();
            let line_area = Rect::new(inner.x, inner.y + 1 + line as u16, list_width as u16, 1);
            if row < parent_rows {
                self.render_parent_row(is_cursor, line_area, buf);
                continue;
            }
            let index = row - parent_rows;
            self.render_entry(
                &model.entries()[index],
                is_cursor,
                model.is_marked(index),
                widths,
                line_area,
                buf,
            );
        }

        let shown = end.saturating_sub(start);
        if model.is_empty() && shown < rows {
            buf.set_string(
                inner.x,
                inner.y + 1 + shown as u16,
                " (empty)",
                Style::default().fg(self.inactive_border_color),
            );
        }

        if has_scrollbar {
            let track = Rect::new(inner.x + inner.width - 1, inner.y + 1, 1, rows as u16);
            self.render_scrollbar(model, track, buf);
        }
    }
}
