use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 색상 테마
///
/// 기본 제공 테마(classic, dark, light) 외에 설정 디렉토리의
/// `themes/<이름>.toml` 파일로 사용자 테마를 정의할 수 있다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    // 패널
    pub panel_bg: ColorDef,
    pub panel_fg: ColorDef,
    pub panel_active_border: ColorDef,
    pub panel_inactive_border: ColorDef,
    pub header_fg: ColorDef,

    // 파일 리스트
    pub cursor_fg: ColorDef,
    pub cursor_bg: ColorDef,
    pub marked: ColorDef,
    pub directory: ColorDef,
    pub executable: ColorDef,
    pub symlink: ColorDef,

    // 바
    pub title_bar_bg: ColorDef,
    pub title_bar_fg: ColorDef,
    pub status_bar_bg: ColorDef,
    pub status_bar_fg: ColorDef,
    pub command_bar_bg: ColorDef,
    pub command_bar_fg: ColorDef,
    pub command_key_fg: ColorDef,
    pub command_line_fg: ColorDef,

    // 다이얼로그
    pub dialog_bg: ColorDef,
    pub dialog_fg: ColorDef,
    pub dialog_border: ColorDef,
    pub button_selected_bg: ColorDef,
    pub button_selected_fg: ColorDef,

    // 강조
    pub accent: ColorDef,
    pub warning: ColorDef,
    pub error: ColorDef,
    pub success: ColorDef,
}

/// Hex 문자열("#1e1e1e") 또는 색상 이름("Blue")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorDef {
    Hex(String),
    Named(String),
}

impl ColorDef {
    pub fn to_color(&self) -> Color {
        match self {
            ColorDef::Hex(hex) => parse_hex_color(hex),
            ColorDef::Named(name) => parse_named_color(name),
        }
    }
}

impl From<&str> for ColorDef {
    fn from(s: &str) -> Self {
        if s.starts_with('#') {
            ColorDef::Hex(s.to_string())
        } else {
            ColorDef::Named(s.to_string())
        }
    }
}

fn parse_hex_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return Color::Reset;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(0);
    Color::Rgb(channel(0..2), channel(2..4), channel(4..6))
}

fn parse_named_color(name: &str) -> Color {
    match name.to_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightcyan" => Color::LightCyan,
        "white" => Color::White,
        _ => Color::Reset,
    }
}

impl Theme {
    /// 파란 패널의 전통적인 2패널 관리자 색 구성 (기본)
    pub fn classic() -> Self {
        Theme {
            panel_bg: "blue".into(),
            panel_fg: "white".into(),
            panel_active_border: "white".into(),
            panel_inactive_border: "gray".into(),
            header_fg: "yellow".into(),

            cursor_fg: "black".into(),
            cursor_bg: "cyan".into(),
            marked: "yellow".into(),
            directory: "white".into(),
            executable: "lightgreen".into(),
            symlink: "lightcyan".into(),

            title_bar_bg: "cyan".into(),
            title_bar_fg: "black".into(),
            status_bar_bg: "cyan".into(),
            status_bar_fg: "black".into(),
            command_bar_bg: "cyan".into(),
            command_bar_fg: "black".into(),
            command_key_fg: "white".into(),
            command_line_fg: "white".into(),

            dialog_bg: "gray".into(),
            dialog_fg: "black".into(),
            dialog_border: "white".into(),
            button_selected_bg: "cyan".into(),
            button_selected_fg: "black".into(),

            accent: "cyan".into(),
            warning: "yellow".into(),
            error: "red".into(),
            success: "green".into(),
        }
    }

    pub fn dark() -> Self {
        Theme {
            panel_bg: "#1e1e1e".into(),
            panel_fg: "#d4d4d4".into(),
            panel_active_border: "#0078d4".into(),
            panel_inactive_border: "#3c3c3c".into(),
            header_fg: "#dcdcaa".into(),

            cursor_fg: "#ffffff".into(),
            cursor_bg: "#0078d4".into(),
            marked: "#ffd700".into(),
            directory: "#569cd6".into(),
            executable: "#4ec9b0".into(),
            symlink: "#ce9178".into(),

            title_bar_bg: "#2d2d30".into(),
            title_bar_fg: "#ffffff".into(),
            status_bar_bg: "#007acc".into(),
            status_bar_fg: "#ffffff".into(),
            command_bar_bg: "#2d2d30".into(),
            command_bar_fg: "#cccccc".into(),
            command_key_fg: "#ffffff".into(),
            command_line_fg: "#d4d4d4".into(),

            dialog_bg: "#252526".into(),
            dialog_fg: "#d4d4d4".into(),
            dialog_border: "#0078d4".into(),
            button_selected_bg: "#0078d4".into(),
            button_selected_fg: "#ffffff".into(),

            accent: "#0078d4".into(),
            warning: "#ffa500".into(),
            error: "#f44747".into(),
            success: "#4ec9b0".into(),
        }
    }

    pub fn light() -> Self {
        Theme {
            panel_bg: "#ffffff".into(),
            panel_fg: "#1e1e1e".into(),
            panel_active_border: "#0078d4".into(),
            panel_inactive_border: "#cccccc".into(),
            header_fg: "#795e26".into(),

            cursor_fg: "#000000".into(),
            cursor_bg: "#add6ff".into(),
            marked: "#af00db".into(),
            directory: "#0066cc".into(),
            executable: "#008080".into(),
            symlink: "#a65e2b".into(),

            title_bar_bg: "#0078d4".into(),
            title_bar_fg: "#ffffff".into(),
            status_bar_bg: "#0078d4".into(),
            status_bar_fg: "#ffffff".into(),
            command_bar_bg: "#f3f3f3".into(),
            command_bar_fg: "#1e1e1e".into(),
            command_key_fg: "#0078d4".into(),
            command_line_fg: "#1e1e1e".into(),

            dialog_bg: "#f3f3f3".into(),
            dialog_fg: "#1e1e1e".into(),
            dialog_border: "#0078d4".into(),
            button_selected_bg: "#0078d4".into(),
            button_selected_fg: "#ffffff".into(),

            accent: "#0078d4".into(),
            warning: "#ff8c00".into(),
            error: "#e51400".into(),
            success: "#107c10".into(),
        }
    }

    /// 이름으로 테마 조회. 기본 제공 테마가 아니면 `themes_dir/<이름>.toml`을 읽는다.
    pub fn by_name(name: &str, themes_dir: Option<&Path>) -> Option<Self> {
        match name {
            "classic" => Some(Self::classic()),
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            custom => {
                let path = themes_dir?.join(format!("{}.toml", custom));
                match Self::from_file(&path) {
                    Ok(theme) => Some(theme),
                    Err(err) => {
                        tracing::warn!(theme = custom, error = %err, "failed to load theme file");
                        None
                    }
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let content = fs::read_to_string(path)?;
        let theme: Theme = toml::from_str(&content)?;
        Ok(theme)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
