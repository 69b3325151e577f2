// 하단 F키 안내 줄

use crate::core::actions::generate_command_bar_items;
use crate::ui::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

/// 커맨드 항목
#[derive(Debug, Clone)]
pub struct CommandItem {
    /// 단축키 (F1, F3, ...)
    pub key: String,
    pub label: String,
    pub enabled: bool,
}

impl CommandItem {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            enabled: true,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

pub struct CommandBar {
    commands: Vec<CommandItem>,
    bg_color: Color,
    key_fg_color: Color,
    label_fg_color: Color,
    disabled_color: Color,
}

impl Default for CommandBar {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBar {
    pub fn new() -> Self {
        Self {
            commands: generate_command_bar_items(),
            bg_color: Color::Cyan,
            key_fg_color: Color::White,
            label_fg_color: Color::Black,
            disabled_color: Color::DarkGray,
        }
    }

    pub fn commands(mut self, commands: Vec<CommandItem>) -> Self {
        self.commands = commands;
        self
    }

    /// 테마 적용
    pub fn theme(mut self, theme: &Theme) -> Self {
        self.bg_color = theme.command_bar_bg.to_color();
        self.key_fg_color = theme.command_key_fg.to_color();
        self.label_fg_color = theme.command_bar_fg.to_color();
        self
    }
}

impl Widget for CommandBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(self.bg_color));

        let mut spans = Vec::with_capacity(self.commands.len() * 3);
        for cmd in &self.commands {
            let (key_style, label_style) = if cmd.enabled {
                (
                    Style::default()
                        .fg(self.key_fg_color)
                        .add_modifier(Modifier::BOLD),
                    Style::default().fg(self.label_fg_color),
                )
            } else {
                let dim = Style::default().fg(self.disabled_color);
                (dim, dim)
            };
            spans.push(Span::styled(format!(" {}", cmd.key), key_style));
            spans.push(Span::styled(format!(" {} ", cmd.label), label_style));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::components::buffer_text;

    #[test]
    fn test_default_lists_function_keys() {
        let bar = CommandBar::new();
        let keys: Vec<&str> = bar.commands.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["F1", "F3", "F4", "F5", "F6", "F7", "F8", "F10"]);
    }

    #[test]
    fn test_render() {
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        CommandBar::new()
            .commands(vec![
                CommandItem::new("F5", "Copy"),
                CommandItem::new("F8", "Delete").enabled(false),
            ])
            .render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.starts_with(" F5 Copy  F8 Delete"));
    }
}
