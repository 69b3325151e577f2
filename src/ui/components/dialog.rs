//! 모달 다이얼로그 스택
//!
//! 스택이 비어 있지 않으면 모든 키는 맨 위 다이얼로그가 가져간다.
//! 인식하지 못한 키도 삼킨다. 응답이 확정되면 다이얼로그를 꺼내고
//! 기다리는 쪽(충돌이면 oneshot)을 풀어 준다.

mod kind;
mod render;

pub use kind::{DialogKind, DialogNode, DialogOutcome, DialogPurpose, Response};
pub use render::DialogView;

use crate::models::operation::{OperationId, OperationProgress};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// 키 라우팅 결과
#[derive(Debug)]
pub enum RouteResult {
    /// 스택이 비어 있음
    Passthrough,
    /// 다이얼로그가 키를 가져감. 닫혔으면 결과가 붙는다.
    Consumed(Option<DialogOutcome>),
}

#[derive(Debug, Default)]
pub struct DialogStack {
    nodes: Vec<DialogNode>,
}

impl DialogStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: DialogNode) {
        tracing::debug!(kind = ?node.kind, title = %node.title, "dialog pushed");
        self.nodes.push(node);
    }

    pub fn pop(&mut self) -> Option<DialogNode> {
        self.nodes.pop()
    }

    pub fn top(&self) -> Option<&DialogNode> {
        self.nodes.last()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// 아래에서 위 순서 (렌더링 순서)
    pub fn iter(&self) -> impl Iterator<Item = &DialogNode> {
        self.nodes.iter()
    }

    /// 작업에 묶인 진행 다이얼로그 갱신
    pub fn update_progress(&mut self, id: OperationId, update: OperationProgress) {
        for node in &mut self.nodes {
            if let DialogPurpose::Progress {
                id: bound,
                progress,
                ..
            } = &mut node.purpose
            {
                if *bound == id {
                    *progress = update;
                    return;
                }
            }
        }
    }

    /// 작업이 끝나면 그 진행 다이얼로그를 스택 어디에 있든 걷어낸다
    pub fn remove_bound(&mut self, id: OperationId) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|node| node.bound_operation() != Some(id));
        before != self.nodes.len()
    }

    pub fn route_key(&mut self, key: KeyEvent) -> RouteResult {
        let Some(top) = self.nodes.last_mut() else {
            return RouteResult::Passthrough;
        };

        let kind = top.kind;
        let outcome = match kind {
            DialogKind::Progress => {
                let outcome = Self::progress_key(top, key);
                if matches!(outcome, Some(DialogOutcome::Background(_))) {
                    self.nodes.pop();
                }
                outcome
            }
            DialogKind::Input => match Self::input_key(top, key) {
                Some(response) => Some(self.respond(response)),
                None => None,
            },
            _ => match Self::button_key(top, key) {
                Some(response) => Some(self.respond(response)),
                None => None,
            },
        };
        RouteResult::Consumed(outcome)
    }

    fn progress_key(node: &mut DialogNode, key: KeyEvent) -> Option<DialogOutcome> {
        let DialogPurpose::Progress { id, cancelling, .. } = &mut node.purpose else {
            return None;
        };
        match key.code {
            KeyCode::Esc => {
                *cancelling = true;
                Some(DialogOutcome::CancelOperation(*id))
            }
            KeyCode::Char('b') | KeyCode::Char('B') => Some(DialogOutcome::Background(*id)),
            _ => None,
        }
    }

    fn input_key(node: &mut DialogNode, key: KeyEvent) -> Option<Response> {
        match key.code {
            KeyCode::Esc => return Some(Response::Cancel),
            KeyCode::Enter => return node.responses.get(node.selected).copied(),
            KeyCode::Tab | KeyCode::BackTab => {
                node.selected = (node.selected + 1) % node.responses.len().max(1);
                return None;
            }
            _ => {}
        }
        if let Some(editor) = node.input.as_mut() {
            editor.handle_key(&key);
        }
        None
    }

    fn button_key(node: &mut DialogNode, key: KeyEvent) -> Option<Response> {
        let count = node.responses.len().max(1);
        match key.code {
            KeyCode::Left | KeyCode::BackTab => {
                node.selected = (node.selected + count - 1) % count;
                None
            }
            KeyCode::Right | KeyCode::Tab => {
                node.selected = (node.selected + 1) % count;
                None
            }
            KeyCode::Enter => node.responses.get(node.selected).copied(),
            KeyCode::Esc => node.dismiss_response(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let c = c.to_ascii_lowercase();
                let index = node.responses.iter().position(|r| r.hotkey() == Some(c))?;
                let response = node.responses[index];
                if response.is_destructive() {
                    node.selected = index;
                    return None;
                }
                Some(response)
            }
            _ => None,
        }
    }

    /// 맨 위 다이얼로그를 꺼내 응답을 적용한다
    fn respond(&mut self, response: Response) -> DialogOutcome {
        let Some(node) = self.nodes.pop() else {
            return DialogOutcome::Dismissed;
        };
        let accepted = matches!(response, Response::Yes | Response::Ok);

        match node.purpose {
            DialogPurpose::ConfirmOperation(request) if accepted => DialogOutcome::Submit(request),
            DialogPurpose::ConfirmQuit if accepted => DialogOutcome::Quit,
            DialogPurpose::Conflict(reply) => {
                let resolution = response
                    .resolution()
                    .unwrap_or(crate::models::operation::ConflictResolution::Abort);
                // 태스크가 이미 끝났으면 보낼 곳이 없다
                let _ = reply.send(resolution);
                DialogOutcome::Answered(resolution)
            }
            DialogPurpose::Mkdir { parent } if accepted => {
                let name = node
                    .input
                    .map(|editor| editor.value().trim().to_string())
                    .unwrap_or_default();
                if name.is_empty() {
                    DialogOutcome::Dismissed
                } else {
                    DialogOutcome::Mkdir { parent, name }
                }
            }
            _ => DialogOutcome::Dismissed,
        }
    }
}
