use super::*;
use crate::ui::components::{
    CommandBar, DialogView, Panel, PanelStatus, StatusBar, WarningScreen,
};
use crate::ui::LayoutMode;
use crate::utils::path_display::truncate_path;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

impl App {
    /// 화면 전체 렌더링
    pub fn render(&mut self, frame: &mut Frame<'_>) {
        let size = frame.area();
        self.layout.update(size, self.panels.active_side());

        if self.layout.mode() == LayoutMode::TooSmall {
            let (width, height) = self.layout.terminal_size();
            let warning = WarningScreen::new()
                .current_size(width, height)
                .theme(&self.theme);
            frame.render_widget(warning, size);
            return;
        }

        self.sync_viewport();
        let areas = self.layout.areas().clone();

        self.render_title_bar(frame, areas.title_bar);
        for side in [Side::Left, Side::Right] {
            let area = self.layout.panel_area(side);
            if area.width == 0 || area.height == 0 {
                continue;
            }
            let status = if side == self.panels.active_side() {
                PanelStatus::Active
            } else {
                PanelStatus::Inactive
            };
            let panel = Panel::new()
                .model(self.panels.panel(side))
                .status(status)
                .theme(&self.theme);
            frame.render_widget(panel, area);
        }

        self.render_command_line(frame, areas.command_line);

        let active = self.panels.active();
        let status_bar = StatusBar::new()
            .entry(active.current())
            .parent_row(active.is_parent_row())
            .totals(active.dir_count(), active.file_count(), active.total_size())
            .marked(active.marked_count(), active.marked_size())
            .running(self.engine.running_count())
            .message(self.status.as_deref())
            .theme(&self.theme);
        frame.render_widget(status_bar, areas.status_bar);

        frame.render_widget(CommandBar::new().theme(&self.theme), areas.command_bar);

        if !self.dialogs.is_empty() {
            frame.render_widget(DialogView::new(&self.dialogs).theme(&self.theme), size);
        }
    }

    fn render_title_bar(&self, frame: &mut Frame<'_>, area: Rect) {
        let style = Style::default()
            .fg(self.theme.title_bar_fg.to_color())
            .bg(self.theme.title_bar_bg.to_color());
        let mut spans = vec![Span::styled(
            format!(" twincmd {}", env!("CARGO_PKG_VERSION")),
            style.add_modifier(Modifier::BOLD),
        )];
        if self.is_escape_pending() {
            spans.push(Span::styled("  [Esc] F-key: press 0-9", style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)).style(style), area);
    }

    /// `<경로> $ <입력>` 한 줄. 커서 위치에 터미널 커서를 둔다.
    fn render_command_line(&self, frame: &mut Frame<'_>, area: Rect) {
        let prompt_budget = (area.width as usize / 2).max(8);
        let prompt = format!("{} $ ", truncate_path(self.active_path(), prompt_budget));
        let prompt_width = prompt.width() as u16;
        let input_width = area.width.saturating_sub(prompt_width) as usize;
        let (visible, cursor_col) = self.command_line.editor().visible(input_width);

        let style = Style::default()
            .fg(self.theme.command_line_fg.to_color())
            .bg(self.theme.panel_bg.to_color());
        let line = Line::from(vec![
            Span::styled(prompt, style.add_modifier(Modifier::BOLD)),
            Span::styled(visible.to_string(), style),
        ]);
        frame.render_widget(Paragraph::new(line).style(style), area);

        if self.dialogs.is_empty() && !self.command_line.is_empty() {
            let x = area.x + prompt_width + cursor_col as u16;
            frame.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
        }
    }
}
