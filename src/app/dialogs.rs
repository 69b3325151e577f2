use super::*;
use crate::core::actions::{help_text, Action};
use crate::ui::components::{DialogNode, DialogOutcome};

impl App {
    // === 다이얼로그 결과 처리 ===

    pub(super) fn handle_dialog_outcome(&mut self, outcome: DialogOutcome) {
        match outcome {
            DialogOutcome::Submit(request) => self.submit_request(*request),
            DialogOutcome::Quit => self.quit(),
            DialogOutcome::Mkdir { parent, name } => self.request_mkdir(parent, &name),
            DialogOutcome::CancelOperation(id) => self.cancel_operation(id),
            DialogOutcome::Background(id) => {
                self.status = Some(format!("Operation #{} continues in the background", id));
            }
            DialogOutcome::Answered(resolution) => {
                tracing::debug!(?resolution, "conflict answered");
            }
            DialogOutcome::Dismissed => {}
        }
    }

    /// 패널이 처리하지 않는 전역 액션
    pub(super) fn handle_global_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.request_quit(),
            Action::ShowHelp => self.dialogs.push(DialogNode::info("Help", help_text())),
            _ => {}
        }
    }

    /// F10. 설정이 꺼져 있으면 바로 종료한다.
    pub(super) fn request_quit(&mut self) {
        if self.config.confirm_quit {
            let running = self.engine.running_count();
            self.dialogs.push(DialogNode::confirm_quit(running));
        } else {
            self.quit();
        }
    }

    /// 종료. 진행 중인 작업은 모두 취소한다.
    pub fn quit(&mut self) {
        if self.engine.running_count() > 0 {
            tracing::info!(running = self.engine.running_count(), "cancelling on quit");
            self.engine.cancel_all();
        }
        self.should_quit = true;
    }

    pub(super) fn show_error(&mut self, title: &str, message: &str) {
        self.dialogs.push(DialogNode::error_report(title, message));
    }
}
