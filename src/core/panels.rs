//! 패널 쌍 컨트롤러
//!
//! 두 디렉토리 모델과 활성 패널을 단독으로 소유한다. 렌더러, 입력 라우팅,
//! 작업 트리거는 모두 여기서 활성 패널을 읽어 간다.

use crate::core::actions::{find_action, Action};
use crate::models::{DirectoryModel, OperationRequest, Verb};
use crate::system::filesystem::FileSystem;
use crate::utils::error::{Result, TwinError};
use crossterm::event::KeyEvent;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Left,
    Right,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// 외부 프로그램으로 여는 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchKind {
    View,
    Edit,
}

/// 키 처리 결과
#[derive(Debug)]
pub enum PanelAction {
    NoOp,
    Navigated,
    RequestOperation(Verb),
    /// 진입/상위 이동 실패. 패널은 이전 스냅샷 그대로다.
    DescendFailed(TwinError),
    /// 실행 파일에서 Enter
    Execute(PathBuf),
    Launch(LaunchKind, PathBuf),
    /// 패널 밖에서 처리할 액션 (종료, 도움말)
    Unhandled(Action),
}

#[derive(Debug)]
pub struct PanelPair {
    left: DirectoryModel,
    right: DirectoryModel,
    active: Side,
    page_size: usize,
}

impl PanelPair {
    pub fn new(left: DirectoryModel, right: DirectoryModel) -> Self {
        Self {
            left,
            right,
            active: Side::Left,
            page_size: 10,
        }
    }

    pub fn open(
        fs: &dyn FileSystem,
        left: &Path,
        right: &Path,
        show_hidden: bool,
    ) -> Result<Self> {
        Ok(Self::new(
            DirectoryModel::load(fs, left, show_hidden)?,
            DirectoryModel::load(fs, right, show_hidden)?,
        ))
    }

    pub fn active_side(&self) -> Side {
        self.active
    }

    pub fn set_active_side(&mut self, side: Side) {
        self.active = side;
    }

    pub fn panel(&self, side: Side) -> &DirectoryModel {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn panel_mut(&mut self, side: Side) -> &mut DirectoryModel {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn active(&self) -> &DirectoryModel {
        self.panel(self.active)
    }

    pub fn active_mut(&mut self) -> &mut DirectoryModel {
        self.panel_mut(self.active)
    }

    pub fn other(&self) -> &DirectoryModel {
        self.panel(self.active.other())
    }

    /// PgUp/PgDn 이동 폭 (패널에 보이는 행 수)
    pub fn set_page_size(&mut self, rows: usize) {
        self.page_size = rows.max(1);
    }

    pub fn handle_key(&mut self, key: KeyEvent, fs: &dyn FileSystem) -> PanelAction {
        match find_action(key.modifiers, key.code) {
            Some(action) => self.apply(action, fs),
            None => PanelAction::NoOp,
        }
    }

    pub fn apply(&mut self, action: Action, fs: &dyn FileSystem) -> PanelAction {
        let page = self.page_size as isize;
        match action {
            Action::MoveUp => self.cursor(|m| m.move_cursor(-1)),
            Action::MoveDown => self.cursor(|m| m.move_cursor(1)),
            Action::PageUp => self.cursor(|m| m.move_cursor(-page)),
            Action::PageDown => self.cursor(|m| m.move_cursor(page)),
            Action::GoToTop => self.cursor(|m| m.go_top()),
            Action::GoToBottom => self.cursor(|m| m.go_bottom()),
            Action::TogglePanel => {
                self.active = self.active.other();
                PanelAction::Navigated
            }
            Action::EnterSelected => self.enter(fs),
            Action::GoToParent => self.ascend(fs),
            Action::View | Action::Edit => match self.active().current() {
                Some(entry) if !entry.is_dir() => {
                    let kind = if action == Action::View {
                        LaunchKind::View
                    } else {
                        LaunchKind::Edit
                    };
                    PanelAction::Launch(kind, entry.path.clone())
                }
                _ => PanelAction::NoOp,
            },
            Action::Copy => self.request(Verb::Copy),
            Action::Move => self.request(Verb::Move),
            Action::Delete => self.request(Verb::Delete),
            Action::MakeDirectory => PanelAction::RequestOperation(Verb::Mkdir),
            Action::ToggleMark => self.cursor(|m| {
                if let Some(index) = m.entry_index() {
                    m.toggle_mark(index);
                }
                m.move_cursor(1);
            }),
            Action::MarkAllFiles => self.cursor(|m| m.mark_all(|e| !e.is_dir())),
            Action::ClearMarks => self.cursor(|m| m.clear_marks()),
            Action::ToggleHidden => {
                let show = !self.active().show_hidden();
                match self.active().reload_with(fs, show) {
                    Ok(next) => {
                        *self.active_mut() = next;
                        PanelAction::Navigated
                    }
                    Err(err) => PanelAction::DescendFailed(err),
                }
            }
            Action::Refresh => {
                self.reload_all(fs);
                PanelAction::Navigated
            }
            Action::ShowHelp | Action::Quit => PanelAction::Unhandled(action),
        }
    }

    fn cursor<F>(&mut self, f: F) -> PanelAction
    where
        F: FnOnce(&mut DirectoryModel),
    {
        f(self.active_mut());
        PanelAction::Navigated
    }

    fn request(&self, verb: Verb) -> PanelAction {
        if self.active().selected_paths().is_empty() {
            PanelAction::NoOp
        } else {
            PanelAction::RequestOperation(verb)
        }
    }

    fn enter(&mut self, fs: &dyn FileSystem) -> PanelAction {
        if self.active().is_parent_row() {
            return self.ascend(fs);
        }
        let Some(entry) = self.active().current() else {
            return PanelAction::NoOp;
        };
        if entry.is_dir() {
            let path = entry.path.clone();
            return match self.navigate(self.active, &path, None, fs) {
                Ok(()) => PanelAction::Navigated,
                Err(err) => PanelAction::DescendFailed(err),
            };
        }
        if entry.executable {
            PanelAction::Execute(entry.path.clone())
        } else {
            PanelAction::Launch(LaunchKind::View, entry.path.clone())
        }
    }

    /// 상위 디렉토리로 이동하고 커서를 떠나온 디렉토리에 둔다
    pub fn ascend(&mut self, fs: &dyn FileSystem) -> PanelAction {
        let current = self.active().path().to_path_buf();
        let Some(parent) = current.parent() else {
            return PanelAction::NoOp;
        };
        let child = current
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        match self.navigate(self.active, parent, child.as_deref(), fs) {
            Ok(()) => PanelAction::Navigated,
            Err(err) => PanelAction::DescendFailed(err),
        }
    }

    /// 한 패널을 다른 경로로 옮긴다. 실패하면 기존 스냅샷을 유지한다.
    pub fn navigate(
        &mut self,
        side: Side,
        path: &Path,
        focus: Option<&str>,
        fs: &dyn FileSystem,
    ) -> Result<()> {
        let show_hidden = self.panel(side).show_hidden();
        let mut next = DirectoryModel::load(fs, path, show_hidden).inspect_err(|err| {
            tracing::debug!(path = %path.display(), error = %err, "navigation failed");
        })?;
        if let Some(name) = focus {
            next.focus_name(name);
        }
        *self.panel_mut(side) = next;
        Ok(())
    }

    /// 경로가 같은 패널만 다시 읽는다. 다시 읽은 패널 수를 돌려준다.
    ///
    /// 디렉토리가 사라졌으면 아직 존재하는 가장 가까운 상위로 옮긴다.
    pub fn refresh_matching(&mut self, dirs: &[PathBuf], fs: &dyn FileSystem) -> usize {
        let mut refreshed = 0;
        for side in [Side::Left, Side::Right] {
            if dirs.iter().any(|d| d.as_path() == self.panel(side).path()) {
                self.reload_side(side, fs);
                refreshed += 1;
            }
        }
        refreshed
    }

    pub fn reload_all(&mut self, fs: &dyn FileSystem) {
        self.reload_side(Side::Left, fs);
        self.reload_side(Side::Right, fs);
    }

    fn reload_side(&mut self, side: Side, fs: &dyn FileSystem) {
        match self.panel(side).reload(fs) {
            Ok(next) => *self.panel_mut(side) = next,
            Err(err) => {
                tracing::warn!(error = %err, "panel directory vanished, moving up");
                let mut candidate = self.panel(side).path().parent().map(Path::to_path_buf);
                while let Some(dir) = candidate {
                    if self.navigate(side, &dir, None, fs).is_ok() {
                        break;
                    }
                    candidate = dir.parent().map(Path::to_path_buf);
                }
            }
        }
    }

    /// 활성 패널 선택 항목으로 작업 요청 생성 (Mkdir 제외)
    ///
    /// Copy/Move의 대상은 반대쪽 패널 경로다.
    pub fn build_request(&self, verb: Verb) -> Option<OperationRequest> {
        let sources = self.active().selected_paths();
        if sources.is_empty() {
            return None;
        }
        let destination = self.other().path().to_path_buf();
        match verb {
            Verb::Copy => Some(OperationRequest::copy(sources, destination)),
            Verb::Move => Some(OperationRequest::move_to(sources, destination)),
            Verb::Delete => Some(OperationRequest::delete(sources)),
            Verb::Mkdir => None,
        }
    }
}
