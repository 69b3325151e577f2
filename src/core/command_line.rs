//! 명령줄
//!
//! 패널 아래의 자유 입력 줄. 글자를 치면 여기로 들어가고 Enter로 실행한다.
//! `cd`는 셸을 띄우지 않고 활성 패널을 옮긴다.

use crate::core::line_editor::LineEditor;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::{Component, Path, PathBuf};

/// 명령줄 키 처리 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLineAction {
    /// 명령줄이 관여하지 않음. 패널로 넘긴다.
    Passthrough,
    Consumed,
    Run(ShellCommand),
}

/// 실행할 명령
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// `cd [dir]`. 인자가 없으면 홈.
    ChangeDir(Option<String>),
    Exec(String),
}

impl ShellCommand {
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(words) = shlex::split(trimmed) {
            if words.first().map(String::as_str) == Some("cd") && words.len() <= 2 {
                return Some(ShellCommand::ChangeDir(words.get(1).cloned()));
            }
        }
        Some(ShellCommand::Exec(trimmed.to_string()))
    }
}

#[derive(Debug, Default)]
pub struct CommandLine {
    editor: LineEditor,
}

impl CommandLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }

    pub fn is_empty(&self) -> bool {
        self.editor.is_empty()
    }

    pub fn clear(&mut self) {
        self.editor.clear();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> CommandLineAction {
        let ctrl_or_alt = key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

        if self.editor.is_empty() {
            // 빈 줄에서는 인쇄 가능한 글자만 받는다
            return match key.code {
                KeyCode::Char(c) if !ctrl_or_alt && !c.is_control() => {
                    self.editor.insert_char(c);
                    CommandLineAction::Consumed
                }
                _ => CommandLineAction::Passthrough,
            };
        }

        match key.code {
            KeyCode::Enter => {
                let text = self.editor.take();
                match ShellCommand::parse(&text) {
                    Some(command) => CommandLineAction::Run(command),
                    None => CommandLineAction::Consumed,
                }
            }
            KeyCode::Esc => {
                self.editor.clear();
                CommandLineAction::Consumed
            }
            _ if self.editor.handle_key(&key) => CommandLineAction::Consumed,
            _ => CommandLineAction::Passthrough,
        }
    }
}

/// `cd` 인자를 `base` 기준 절대 경로로 푼다
///
/// 인자 없음과 `~`는 홈, `~/x`는 홈 아래. `.`과 `..`는 어휘적으로 정리한다.
pub fn resolve_dir(base: &Path, arg: Option<&str>, home: Option<&Path>) -> PathBuf {
    let home = home.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("/"));
    let raw = match arg {
        None | Some("~") => home,
        Some(arg) => match arg.strip_prefix("~/") {
            Some(rest) => home.join(rest),
            None => base.join(arg),
        },
    };
    normalize(&raw)
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push("/");
    }
    out
}
