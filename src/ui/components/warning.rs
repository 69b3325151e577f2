// 터미널이 너무 작을 때 패널 대신 표시하는 화면

use crate::ui::layout::{MIN_HEIGHT, MIN_WIDTH};
use crate::ui::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub struct WarningScreen {
    current_size: (u16, u16),
    warning_color: Color,
    bg_color: Color,
    fg_color: Color,
    error_color: Color,
    success_color: Color,
}

impl Default for WarningScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl WarningScreen {
    pub fn new() -> Self {
        Self {
            current_size: (0, 0),
            warning_color: Color::Yellow,
            bg_color: Color::Reset,
            fg_color: Color::Gray,
            error_color: Color::Red,
            success_color: Color::Green,
        }
    }

    pub fn current_size(mut self, width: u16, height: u16) -> Self {
        self.current_size = (width, height);
        self
    }

    /// 테마 적용
    pub fn theme(mut self, theme: &Theme) -> Self {
        self.warning_color = theme.warning.to_color();
        self.bg_color = theme.panel_bg.to_color();
        self.fg_color = theme.panel_fg.to_color();
        self.error_color = theme.error.to_color();
        self.success_color = theme.success.to_color();
        self
    }
}

impl Widget for WarningScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(self.bg_color));

        let bold = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);
        let (width, height) = self.current_size;
        let lines = vec![
            Line::from(Span::styled("Terminal too small", bold(self.warning_color))),
            Line::from(""),
            Line::from(vec![
                Span::styled("Current: ", Style::default().fg(self.fg_color)),
                Span::styled(format!("{}x{}", width, height), bold(self.error_color)),
            ]),
            Line::from(vec![
                Span::styled("Required: ", Style::default().fg(self.fg_color)),
                Span::styled(
                    format!("{}x{}", MIN_WIDTH, MIN_HEIGHT),
                    bold(self.success_color),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Resize the terminal or press F10 to quit",
                Style::default().fg(self.fg_color).add_modifier(Modifier::DIM),
            )),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.warning_color)),
            )
            .render(area, buf);
    }
}
