use super::*;
use crate::models::{OperationRequest, OperationSummary, Verb};
use crate::ui::components::DialogNode;
use tokio::sync::mpsc::error::TryRecvError;

impl App {
    // === 작업 요청 ===

    /// F5/F6/F7/F8. 설정에 따라 확인 다이얼로그를 거친다.
    pub(super) fn request_operation(&mut self, verb: Verb) {
        if verb == Verb::Mkdir {
            let parent = self.active_path().to_path_buf();
            self.dialogs.push(DialogNode::mkdir(parent));
            return;
        }

        let Some(request) = self.panels.build_request(verb) else {
            return;
        };
        let confirm = match verb {
            Verb::Copy => self.config.confirm_copy,
            Verb::Move => self.config.confirm_move,
            Verb::Delete => self.config.confirm_delete,
            Verb::Mkdir => false,
        };
        if confirm {
            self.dialogs.push(DialogNode::confirm_operation(request));
        } else {
            self.submit_request(request);
        }
    }

    /// 새 디렉토리 이름 검증 후 제출
    pub(super) fn request_mkdir(&mut self, parent: PathBuf, name: &str) {
        if name == "." || name == ".." || name.contains(std::path::MAIN_SEPARATOR) {
            self.show_error("Make directory", &format!("Invalid directory name: {}", name));
            return;
        }
        self.submit_request(OperationRequest::mkdir(parent, name));
    }

    /// 엔진에 넘긴다. Busy면 오류 다이얼로그만 띄우고 아무것도 시작하지 않는다.
    pub(super) fn submit_request(&mut self, request: OperationRequest) {
        let verb = request.verb;
        let total = request.items.len();
        match self.engine.submit(request) {
            Ok(handle) => {
                if verb != Verb::Mkdir {
                    self.dialogs
                        .push(DialogNode::progress(handle.id(), verb, total));
                }
                // 완료는 이벤트로 받으므로 핸들은 버린다
            }
            Err(err) => {
                let title = format!("{} rejected", verb.name());
                self.show_error(&title, &err.to_string());
            }
        }
    }

    pub(super) fn cancel_operation(&mut self, id: crate::models::OperationId) {
        if self.engine.cancel(id) {
            tracing::info!(id, "cancel requested");
        }
    }

    // === 엔진 이벤트 ===

    /// 쌓인 엔진 이벤트를 모두 처리한다
    pub fn drain_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(event) => self.handle_engine_event(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Progress { id, progress } => {
                self.dialogs.update_progress(id, progress);
            }
            EngineEvent::Conflict {
                id,
                source,
                target,
                reply,
            } => {
                tracing::debug!(id, target = %target.display(), "conflict prompt");
                self.dialogs.push(DialogNode::conflict(source, target, reply));
            }
            EngineEvent::Finished(summary) => self.finish_operation(summary),
        }
    }

    /// 종결된 작업: 진행 다이얼로그 제거, 같은 경로의 패널만 다시 읽기, 결과 표시
    fn finish_operation(&mut self, summary: OperationSummary) {
        self.dialogs.remove_bound(summary.id);
        let refreshed = self
            .panels
            .refresh_matching(&summary.refresh_dirs, self.fs.as_ref());
        tracing::debug!(id = summary.id, refreshed, "panels refreshed");

        if summary.failed_count() > 0 {
            let title = format!("{} errors", summary.verb.name());
            self.dialogs
                .push(DialogNode::error_report(title, summary.failure_report()));
        }
        self.status = Some(summary.headline());
    }
}
