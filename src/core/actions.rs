//! 액션 레지스트리
//!
//! 키 바인딩, 하단 F키 바, 도움말 내용이 모두 이 테이블을 참조한다.

use crate::ui::components::command_bar::CommandItem;
use crossterm::event::{KeyCode, KeyModifiers};
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Navigation
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    TogglePanel,
    EnterSelected,
    GoToParent,
    // File Operations
    View,
    Edit,
    Copy,
    Move,
    MakeDirectory,
    Delete,
    // Selection
    ToggleMark,
    MarkAllFiles,
    ClearMarks,
    // System
    ToggleHidden,
    Refresh,
    ShowHelp,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    Navigation,
    FileOperation,
    Selection,
    System,
}

impl ActionCategory {
    pub fn title(&self) -> &'static str {
        match self {
            ActionCategory::Navigation => "Navigation",
            ActionCategory::FileOperation => "File Operations",
            ActionCategory::Selection => "Selection",
            ActionCategory::System => "System",
        }
    }
}

/// 하단 F키 바 표시 정보
pub struct CommandBarEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub priority: u8,
}

pub struct ActionDef {
    pub action: Action,
    pub id: &'static str,
    pub label: &'static str,
    pub category: ActionCategory,
    pub shortcut_display: Option<&'static str>,
    pub command_bar: Option<CommandBarEntry>,
}

pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: Option<KeyModifiers>, // None = any modifier
    pub action: Action,
}

const fn def(
    action: Action,
    id: &'static str,
    label: &'static str,
    category: ActionCategory,
    shortcut_display: Option<&'static str>,
    command_bar: Option<CommandBarEntry>,
) -> ActionDef {
    ActionDef {
        action,
        id,
        label,
        category,
        shortcut_display,
        command_bar,
    }
}

const fn bar(key: &'static str, label: &'static str, priority: u8) -> Option<CommandBarEntry> {
    Some(CommandBarEntry {
        key,
        label,
        priority,
    })
}

pub static ACTION_DEFS: &[ActionDef] = &[
    // Navigation
    def(Action::MoveUp, "move_up", "Cursor up", ActionCategory::Navigation, Some("Up / Down"), None),
    def(Action::MoveDown, "move_down", "Cursor down", ActionCategory::Navigation, None, None),
    def(Action::PageUp, "page_up", "Page up / down", ActionCategory::Navigation, Some("PgUp / PgDn"), None),
    def(Action::PageDown, "page_down", "Page down", ActionCategory::Navigation, None, None),
    def(Action::GoToTop, "go_top", "First / last entry", ActionCategory::Navigation, Some("Home / End"), None),
    def(Action::GoToBottom, "go_bottom", "Last entry", ActionCategory::Navigation, None, None),
    def(Action::TogglePanel, "toggle_panel", "Switch panel", ActionCategory::Navigation, Some("Tab"), None),
    def(Action::EnterSelected, "enter", "Open directory / run", ActionCategory::Navigation, Some("Enter"), None),
    def(Action::GoToParent, "go_parent", "Parent directory", ActionCategory::Navigation, Some("Backspace"), None),
    // File Operations
    def(Action::View, "view", "View file", ActionCategory::FileOperation, Some("F3"), bar("F3", "View", 3)),
    def(Action::Edit, "edit", "Edit file", ActionCategory::FileOperation, Some("F4"), bar("F4", "Edit", 4)),
    def(Action::Copy, "copy", "Copy to other panel", ActionCategory::FileOperation, Some("F5"), bar("F5", "Copy", 5)),
    def(Action::Move, "move", "Move to other panel", ActionCategory::FileOperation, Some("F6"), bar("F6", "Move", 6)),
    def(Action::MakeDirectory, "mkdir", "Make directory", ActionCategory::FileOperation, Some("F7"), bar("F7", "Mkdir", 7)),
    def(Action::Delete, "delete", "Delete", ActionCategory::FileOperation, Some("F8"), bar("F8", "Delete", 8)),
    // Selection
    def(Action::ToggleMark, "toggle_mark", "Mark / unmark", ActionCategory::Selection, Some("Ins / ^T"), None),
    def(Action::MarkAllFiles, "mark_all", "Mark all files", ActionCategory::Selection, Some("^A"), None),
    def(Action::ClearMarks, "clear_marks", "Clear marks", ActionCategory::Selection, Some("^X"), None),
    // System
    def(Action::ToggleHidden, "toggle_hidden", "Show / hide dotfiles", ActionCategory::System, Some("Alt-."), None),
    def(Action::Refresh, "refresh", "Reload panels", ActionCategory::System, Some("^R"), None),
    def(Action::ShowHelp, "help", "Help", ActionCategory::System, Some("F1"), bar("F1", "Help", 1)),
    def(Action::Quit, "quit", "Quit", ActionCategory::System, Some("F10"), bar("F10", "Quit", 10)),
];

fn bind(code: KeyCode, modifiers: Option<KeyModifiers>, action: Action) -> KeyBinding {
    KeyBinding {
        code,
        modifiers,
        action,
    }
}

fn build_key_bindings() -> Vec<KeyBinding> {
    let ctrl = Some(KeyModifiers::CONTROL);
    vec![
        // 탐색
        bind(KeyCode::Up, None, Action::MoveUp),
        bind(KeyCode::Down, None, Action::MoveDown),
        bind(KeyCode::PageUp, None, Action::PageUp),
        bind(KeyCode::PageDown, None, Action::PageDown),
        bind(KeyCode::Home, None, Action::GoToTop),
        bind(KeyCode::End, None, Action::GoToBottom),
        bind(KeyCode::Tab, None, Action::TogglePanel),
        bind(KeyCode::BackTab, None, Action::TogglePanel),
        bind(KeyCode::Enter, Some(KeyModifiers::NONE), Action::EnterSelected),
        bind(KeyCode::Backspace, None, Action::GoToParent),
        // F키
        bind(KeyCode::F(1), None, Action::ShowHelp),
        bind(KeyCode::F(3), None, Action::View),
        bind(KeyCode::F(4), None, Action::Edit),
        bind(KeyCode::F(5), None, Action::Copy),
        bind(KeyCode::F(6), None, Action::Move),
        bind(KeyCode::F(7), None, Action::MakeDirectory),
        bind(KeyCode::F(8), None, Action::Delete),
        bind(KeyCode::Delete, None, Action::Delete),
        bind(KeyCode::F(10), None, Action::Quit),
        // 마크
        bind(KeyCode::Insert, None, Action::ToggleMark),
        bind(KeyCode::Char('t'), ctrl, Action::ToggleMark),
        bind(KeyCode::Char('a'), ctrl, Action::MarkAllFiles),
        bind(KeyCode::Char('x'), ctrl, Action::ClearMarks),
        // 시스템
        bind(KeyCode::Char('.'), Some(KeyModifiers::ALT), Action::ToggleHidden),
        bind(KeyCode::Char('r'), ctrl, Action::Refresh),
        bind(KeyCode::Char('c'), ctrl, Action::Quit),
    ]
}

static KEY_BINDINGS: LazyLock<Vec<KeyBinding>> = LazyLock::new(build_key_bindings);

pub fn key_bindings() -> &'static [KeyBinding] {
    KEY_BINDINGS.as_slice()
}

/// 키 입력으로 액션 조회
pub fn find_action(modifiers: KeyModifiers, code: KeyCode) -> Option<Action> {
    key_bindings()
        .iter()
        .find(|binding| {
            binding.code == code
                && match binding.modifiers {
                    None => true,
                    Some(required) => modifiers == required,
                }
        })
        .map(|binding| binding.action)
}

/// Esc 다음 숫자 → F키 (F키가 없는 터미널용). '0'은 F10.
pub fn escape_digit_key(c: char) -> Option<KeyCode> {
    match c {
        '1'..='9' => c.to_digit(10).map(|n| KeyCode::F(n as u8)),
        '0' => Some(KeyCode::F(10)),
        _ => None,
    }
}

impl Action {
    pub fn from_id(id: &str) -> Option<Action> {
        ACTION_DEFS.iter().find(|d| d.id == id).map(|d| d.action)
    }
}

/// F키 바 항목 (priority 순)
pub fn generate_command_bar_items() -> Vec<CommandItem> {
    let mut entries: Vec<&CommandBarEntry> = ACTION_DEFS
        .iter()
        .filter_map(|def| def.command_bar.as_ref())
        .collect();
    entries.sort_by_key(|cb| cb.priority);
    entries
        .into_iter()
        .map(|cb| CommandItem::new(cb.key, cb.label))
        .collect()
}

/// 도움말 다이얼로그용 (카테고리명, [(단축키, 설명)])
pub fn generate_help_entries() -> Vec<(&'static str, Vec<(&'static str, &'static str)>)> {
    [
        ActionCategory::Navigation,
        ActionCategory::FileOperation,
        ActionCategory::Selection,
        ActionCategory::System,
    ]
    .iter()
    .map(|cat| {
        let items = ACTION_DEFS
            .iter()
            .filter(|d| d.category == *cat)
            .filter_map(|d| d.shortcut_display.map(|key| (key, d.label)))
            .collect();
        (cat.title(), items)
    })
    .collect()
}

/// 도움말 본문
pub fn help_text() -> String {
    let mut lines = Vec::new();
    for (category, items) in generate_help_entries() {
        lines.push(format!("{}:", category));
        for (key, label) in items {
            lines.push(format!("  {:<12} {}", key, label));
        }
    }
    lines.push(String::new());
    lines.push("Typing text enters a shell command; Enter runs it.".to_string());
    lines.push("Esc followed by a digit acts as the F-key.".to_string());
    lines.join("\n")
}
