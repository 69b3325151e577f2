use crate::core::actions::escape_digit_key;
use crate::core::command_line::{CommandLine, CommandLineAction};
use crate::core::engine::{EngineEvent, OperationEngine};
use crate::core::panels::{PanelAction, PanelPair, Side};
use crate::system::{Config, FileSystem};
use crate::ui::components::dialog::RouteResult;
use crate::ui::{DialogStack, LayoutManager, Theme};
use crate::utils::error::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;

mod dialogs;
mod launch;
mod operations;
mod render;

/// Esc 다음 숫자를 F키로 받는 시간
const ESCAPE_PREFIX_WINDOW: Duration = Duration::from_millis(500);

/// 메인 루프가 터미널을 넘겨주고 실행할 외부 프로세스
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// 종료 후 Enter를 기다린다 (셸 명령, 실행 파일)
    pub pause_after: bool,
}

/// 앱 상태
pub struct App {
    /// 종료 플래그
    pub should_quit: bool,
    /// 레이아웃 매니저
    pub layout: LayoutManager,
    pub panels: PanelPair,
    pub dialogs: DialogStack,
    pub command_line: CommandLine,
    pub config: Config,
    pub theme: Theme,
    fs: Arc<dyn FileSystem>,
    engine: OperationEngine,
    events: UnboundedReceiver<EngineEvent>,
    /// 상태 줄 메시지. 다음 키 입력에서 지워진다.
    status: Option<String>,
    /// Esc 입력 시각 (F키 대체 입력 대기)
    pending_escape: Option<Instant>,
    /// 메인 루프에서 처리할 실행 요청
    pending_launch: Option<LaunchRequest>,
}

impl App {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        config: Config,
        theme: Theme,
        left: &Path,
        right: &Path,
        runtime: Handle,
    ) -> Result<Self> {
        let panels = PanelPair::open(fs.as_ref(), left, right, config.show_hidden)?;
        let (engine, events) = OperationEngine::new(Arc::clone(&fs), runtime);
        Ok(Self {
            should_quit: false,
            layout: LayoutManager::new(),
            panels,
            dialogs: DialogStack::new(),
            command_line: CommandLine::new(),
            config,
            theme,
            fs,
            engine,
            events,
            status: None,
            pending_escape: None,
            pending_launch: None,
        })
    }

    /// 종료 상태 확인
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn running_operations(&self) -> usize {
        self.engine.running_count()
    }

    /// Esc 입력 후 숫자를 기다리는 중인지
    pub fn is_escape_pending(&self) -> bool {
        self.pending_escape.is_some()
    }

    pub fn active_path(&self) -> &Path {
        self.panels.active().path()
    }

    /// 키 하나를 다이얼로그, 명령줄, 패널 순서로 라우팅한다
    pub fn handle_key(&mut self, key: KeyEvent) {
        let Some(key) = self.translate_escape(key) else {
            return;
        };

        match self.dialogs.route_key(key) {
            RouteResult::Consumed(Some(outcome)) => {
                self.handle_dialog_outcome(outcome);
                return;
            }
            RouteResult::Consumed(None) => return,
            RouteResult::Passthrough => {}
        }

        self.status = None;

        match self.command_line.handle_key(key) {
            CommandLineAction::Passthrough => {}
            CommandLineAction::Consumed => return,
            CommandLineAction::Run(command) => {
                self.run_command(command);
                return;
            }
        }

        let action = self.panels.handle_key(key, self.fs.as_ref());
        self.handle_panel_action(action);
    }

    /// Esc+숫자를 F키로 바꾼다. 대기 상태로 들어가면 None.
    fn translate_escape(&mut self, key: KeyEvent) -> Option<KeyEvent> {
        if let Some(at) = self.pending_escape.take() {
            if at.elapsed() <= ESCAPE_PREFIX_WINDOW {
                if let KeyCode::Char(c) = key.code {
                    if let Some(code) = escape_digit_key(c) {
                        return Some(KeyEvent::new(code, KeyModifiers::NONE));
                    }
                }
            }
        }

        let bare_escape = key.code == KeyCode::Esc && key.modifiers.is_empty();
        if bare_escape && self.dialogs.is_empty() && self.command_line.is_empty() {
            self.pending_escape = Some(Instant::now());
            return None;
        }
        Some(key)
    }

    fn handle_panel_action(&mut self, action: PanelAction) {
        match action {
            PanelAction::NoOp | PanelAction::Navigated => {}
            PanelAction::RequestOperation(verb) => self.request_operation(verb),
            PanelAction::DescendFailed(err) => {
                self.show_error("Cannot open directory", &err.to_string());
            }
            PanelAction::Execute(path) => self.queue_execute(&path),
            PanelAction::Launch(kind, path) => self.queue_open(kind, &path),
            PanelAction::Unhandled(action) => self.handle_global_action(action),
        }
    }

    /// 주기 작업: 엔진 이벤트 수거, Esc 대기 만료
    pub fn tick(&mut self) {
        self.drain_events();
        if self
            .pending_escape
            .is_some_and(|at| at.elapsed() > ESCAPE_PREFIX_WINDOW)
        {
            self.pending_escape = None;
        }
    }

    /// 레이아웃 크기가 바뀌면 페이지 폭과 스크롤을 맞춘다
    pub fn sync_viewport(&mut self) {
        let rows = self.layout.visible_rows(self.panels.active_side());
        self.panels.set_page_size(rows);
        for side in [Side::Left, Side::Right] {
            let rows = self.layout.visible_rows(side);
            if rows > 0 {
                self.panels.panel_mut(side).adjust_scroll(rows);
            }
        }
    }
}

#[cfg(test)]
mod tests;
