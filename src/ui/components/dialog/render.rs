use super::kind::{DialogKind, DialogNode};
use super::DialogStack;
use crate::models::operation::OperationProgress;
use crate::ui::theme::Theme;
use crate::utils::formatter::format_file_size;
use crate::utils::path_display::truncate_name;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

/// border 안쪽 좌우 여백
const DIALOG_H_PADDING: u16 = 2;
/// border 아래 여백
const DIALOG_V_PADDING: u16 = 1;

/// 스택 전체를 아래에서 위로 그리는 위젯
pub struct DialogView<'a> {
    stack: &'a DialogStack,
    bg_color: Color,
    fg_color: Color,
    border_color: Color,
    error_color: Color,
    title_color: Color,
    button_bg: Color,
    button_fg: Color,
    button_selected_bg: Color,
    button_selected_fg: Color,
    input_bg: Color,
    progress_filled: Color,
    progress_unfilled: Color,
}

impl<'a> DialogView<'a> {
    pub fn new(stack: &'a DialogStack) -> Self {
        Self {
            stack,
            bg_color: Color::Gray,
            fg_color: Color::Black,
            border_color: Color::Black,
            error_color: Color::Red,
            title_color: Color::Blue,
            button_bg: Color::Gray,
            button_fg: Color::Black,
            button_selected_bg: Color::Cyan,
            button_selected_fg: Color::Black,
            input_bg: Color::Cyan,
            progress_filled: Color::Blue,
            progress_unfilled: Color::DarkGray,
        }
    }

    /// 테마 적용
    pub fn theme(mut self, theme: &Theme) -> Self {
        self.bg_color = theme.dialog_bg.to_color();
        self.fg_color = theme.dialog_fg.to_color();
        self.border_color = theme.dialog_border.to_color();
        self.error_color = theme.error.to_color();
        self.title_color = theme.accent.to_color();
        self.button_bg = theme.dialog_bg.to_color();
        self.button_fg = theme.dialog_fg.to_color();
        self.button_selected_bg = theme.button_selected_bg.to_color();
        self.button_selected_fg = theme.button_selected_fg.to_color();
        self.input_bg = theme.panel_bg.to_color();
        self.progress_filled = theme.accent.to_color();
        self.progress_unfilled = theme.panel_inactive_border.to_color();
        self
    }

    /// 화면 중앙 영역. 메시지 줄 수에 맞춰 높이를 정한다.
    fn calculate_area(node: &DialogNode, screen: Rect) -> Rect {
        let sw = screen.width;
        let sh = screen.height;
        let message_lines = node.message.lines().count().max(1) as u16;

        let (width, height) = match node.kind {
            DialogKind::Input => (50u16.min(sw.saturating_sub(4)).max(30), 8u16),
            DialogKind::Progress => (54u16.min(sw.saturating_sub(4)).max(30), 10u16),
            DialogKind::Confirm => {
                let w = if node.responses.len() > 2 { 64u16 } else { 50 };
                (w.min(sw.saturating_sub(4)).max(30), 5 + message_lines)
            }
            DialogKind::ErrorReport | DialogKind::Info => {
                let longest = node.message.lines().map(|l| l.width()).max().unwrap_or(0) as u16;
                let w = (longest + 6).clamp(40, 76);
                (w, 5 + message_lines)
            }
        };

        let width = width.min(sw.saturating_sub(2));
        let height = height.min(sh.saturating_sub(2));
        Rect {
            x: screen.x + sw.saturating_sub(width) / 2,
            y: screen.y + sh.saturating_sub(height) / 2,
            width,
            height,
        }
    }

    fn frame(&self, node: &DialogNode, area: Rect, buf: &mut Buffer) -> Rect {
        Clear.render(area, buf);
        let accent = match node.kind {
            DialogKind::ErrorReport => self.error_color,
            _ => self.border_color,
        };
        let title_color = match node.kind {
            DialogKind::ErrorReport => self.error_color,
            _ => self.title_color,
        };
        Block::default()
            .title(format!(" {} ", node.title))
            .title_style(Style::default().fg(title_color).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(self.bg_color).fg(self.fg_color))
            .render(area, buf);

        Rect {
            x: area.x + DIALOG_H_PADDING,
            y: area.y + DIALOG_V_PADDING,
            width: area.width.saturating_sub(DIALOG_H_PADDING * 2),
            height: area.height.saturating_sub(DIALOG_V_PADDING * 2),
        }
    }

    fn render_button(&self, buf: &mut Buffer, x: u16, y: u16, label: &str, selected: bool) -> u16 {
        let (bg, fg) = if selected {
            (self.button_selected_bg, self.button_selected_fg)
        } else {
            (self.button_bg, self.button_fg)
        };
        let text = format!("[ {} ]", label);
        let width = text.width() as u16;
        buf.set_string(x, y, &text, Style::default().fg(fg).bg(bg));
        width
    }

    /// 버튼 줄을 가운데 정렬해서 그린다
    fn render_buttons(&self, node: &DialogNode, inner: Rect, y: u16, buf: &mut Buffer) {
        let total: u16 = node
            .responses
            .iter()
            .map(|r| r.label().width() as u16 + 5)
            .sum::<u16>()
            .saturating_sub(1);
        let mut x = inner.x + inner.width.saturating_sub(total) / 2;
        for (i, response) in node.responses.iter().enumerate() {
            x += self.render_button(buf, x, y, response.label(), i == node.selected) + 1;
        }
    }

    fn render_message_dialog(&self, node: &DialogNode, inner: Rect, buf: &mut Buffer) {
        let text_area = Rect {
            height: inner.height.saturating_sub(2),
            ..inner
        };
        Paragraph::new(node.message.as_str())
            .style(Style::default().fg(self.fg_color).bg(self.bg_color))
            .wrap(Wrap { trim: false })
            .render(text_area, buf);
        let button_y = inner.y + inner.height.saturating_sub(1);
        self.render_buttons(node, inner, button_y, buf);
    }

    fn render_input(&self, node: &DialogNode, inner: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(self.fg_color).bg(self.bg_color);
        buf.set_string(inner.x, inner.y, &node.message, style);

        let field_y = inner.y + 2;
        let field_style = Style::default().fg(self.fg_color).bg(self.input_bg);
        buf.set_string(inner.x, field_y, " ".repeat(inner.width as usize), field_style);

        if let Some(editor) = &node.input {
            let width = inner.width.saturating_sub(2) as usize;
            let (visible, cursor_col) = editor.visible(width);
            buf.set_stringn(inner.x + 1, field_y, visible, width, field_style);

            let cursor_x = inner.x + 1 + cursor_col as u16;
            if let Some(cell) = buf.cell_mut((cursor_x, field_y)) {
                cell.set_style(Style::default().fg(self.input_bg).bg(self.fg_color));
            }
        }

        self.render_buttons(node, inner, inner.y + inner.height.saturating_sub(1), buf);
    }

    fn render_progress(&self, node: &DialogNode, inner: Rect, buf: &mut Buffer) {
        let Some((progress, cancelling)) = node.progress_state() else {
            return;
        };
        let style = Style::default().fg(self.fg_color).bg(self.bg_color);
        let current = truncate_name(&progress.current, inner.width as usize);
        buf.set_string(inner.x, inner.y, current, style);

        let percent = progress.percentage();
        Gauge::default()
            .ratio(f64::from(percent) / 100.0)
            .gauge_style(
                Style::default()
                    .fg(self.progress_filled)
                    .bg(self.progress_unfilled),
            )
            .label(format!("{}%", percent))
            .render(
                Rect {
                    x: inner.x,
                    y: inner.y + 2,
                    width: inner.width,
                    height: 1,
                },
                buf,
            );

        buf.set_string(inner.x, inner.y + 4, progress_counts(progress), style);

        let hint = if cancelling {
            "Cancelling after the current item..."
        } else {
            "Esc: cancel   b: background"
        };
        buf.set_string(
            inner.x,
            inner.y + inner.height.saturating_sub(1),
            hint,
            style.add_modifier(Modifier::DIM),
        );
    }
}

/// "2 / 5 items, 1.0 MB / 3.0 MB"
fn progress_counts(progress: &OperationProgress) -> String {
    let items = format!("{} / {} items", progress.items_done, progress.total_items);
    if progress.total_bytes == 0 {
        return items;
    }
    format!(
        "{}, {} / {}",
        items,
        format_file_size(progress.bytes_done),
        format_file_size(progress.total_bytes)
    )
}

impl Widget for DialogView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for node in self.stack.iter() {
            let dialog_area = Self::calculate_area(node, area);
            if dialog_area.width < 6 || dialog_area.height < 4 {
                continue;
            }
            let inner = self.frame(node, dialog_area, buf);
            match node.kind {
                DialogKind::Progress => self.render_progress(node, inner, buf),
                DialogKind::Input => self.render_input(node, inner, buf),
                DialogKind::Confirm | DialogKind::ErrorReport | DialogKind::Info => {
                    self.render_message_dialog(node, inner, buf)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::operation::Verb;
    use crate::ui::components::buffer_text;
    use std::path::PathBuf;

    fn render(stack: &DialogStack) -> String {
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        DialogView::new(stack).render(area, &mut buf);
        buffer_text(&buf)
    }

    #[test]
    fn test_confirm_dialog_shows_message_and_buttons() {
        let mut stack = DialogStack::new();
        stack.push(DialogNode::confirm_quit(0));
        let text = render(&stack);
        assert!(text.contains(" Quit "));
        assert!(text.contains("Do you really want to quit?"));
        assert!(text.contains("[ Yes ] [ No ]"));
    }

    #[test]
    fn test_topmost_dialog_drawn_last() {
        let mut stack = DialogStack::new();
        stack.push(DialogNode::progress(1, Verb::Copy, 4));
        stack.push(DialogNode::error_report("Copy failed", "[NotFound] /x: gone"));
        let text = render(&stack);
        assert!(text.contains("[NotFound] /x: gone"));
        assert!(text.contains("[ OK ]"));
    }

    #[test]
    fn test_progress_dialog() {
        let mut stack = DialogStack::new();
        stack.push(DialogNode::progress(3, Verb::Copy, 4));
        let mut progress = OperationProgress::new(Verb::Copy, 4, 2048);
        progress.current = "big.iso".to_string();
        progress.items_done = 1;
        progress.bytes_done = 1024;
        stack.update_progress(3, progress);

        let text = render(&stack);
        assert!(text.contains("big.iso"));
        assert!(text.contains("50%"));
        assert!(text.contains("1 / 4 items, 1.0 KB / 2.0 KB"));
        assert!(text.contains("Esc: cancel"));
    }

    #[test]
    fn test_input_dialog() {
        let mut stack = DialogStack::new();
        stack.push(DialogNode::mkdir(PathBuf::from("/work")));
        let text = render(&stack);
        assert!(text.contains("Create directory in /work:"));
        assert!(text.contains("[ OK ] [ Cancel ]"));
    }

    #[test]
    fn test_progress_counts_without_bytes() {
        let progress = OperationProgress::new(Verb::Delete, 3, 0);
        assert_eq!(progress_counts(&progress), "0 / 3 items");
    }
}
