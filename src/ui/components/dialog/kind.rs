use crate::core::line_editor::LineEditor;
use crate::models::operation::{
    ConflictResolution, OperationId, OperationProgress, OperationRequest, Verb,
};
use std::path::PathBuf;
use tokio::sync::oneshot;

/// 다이얼로그 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Confirm,
    Progress,
    ErrorReport,
    Input,
    /// 도움말 같은 안내문
    Info,
}

/// 선택 가능한 응답 (버튼)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Yes,
    No,
    Ok,
    Cancel,
    Overwrite,
    Skip,
    OverwriteAll,
    SkipAll,
    Abort,
}

impl Response {
    pub fn label(&self) -> &'static str {
        match self {
            Response::Yes => "Yes",
            Response::No => "No",
            Response::Ok => "OK",
            Response::Cancel => "Cancel",
            Response::Overwrite => "Overwrite",
            Response::Skip => "Skip",
            Response::OverwriteAll => "All",
            Response::SkipAll => "Skip all",
            Response::Abort => "Abort",
        }
    }

    /// 단축 글자
    pub fn hotkey(&self) -> Option<char> {
        match self {
            Response::Yes => Some('y'),
            Response::No => Some('n'),
            Response::Overwrite => Some('o'),
            Response::Skip => Some('s'),
            Response::OverwriteAll => Some('a'),
            Response::SkipAll => Some('k'),
            Response::Abort => Some('b'),
            Response::Ok | Response::Cancel => None,
        }
    }

    /// 대상을 지우는 응답. 단축 글자로는 선택만 하고 Enter로 확정한다.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Response::Overwrite | Response::OverwriteAll)
    }

    pub fn resolution(&self) -> Option<ConflictResolution> {
        match self {
            Response::Overwrite => Some(ConflictResolution::Overwrite),
            Response::Skip => Some(ConflictResolution::Skip),
            Response::OverwriteAll => Some(ConflictResolution::OverwriteAll),
            Response::SkipAll => Some(ConflictResolution::SkipAll),
            Response::Abort => Some(ConflictResolution::Abort),
            _ => None,
        }
    }
}

/// 다이얼로그가 닫힐 때 무엇을 해결하는지
#[derive(Debug)]
pub enum DialogPurpose {
    /// 확인 후 제출할 작업
    ConfirmOperation(Box<OperationRequest>),
    ConfirmQuit,
    /// 엔진 태스크가 기다리는 충돌 응답
    Conflict(oneshot::Sender<ConflictResolution>),
    Mkdir {
        parent: PathBuf,
    },
    Progress {
        id: OperationId,
        progress: OperationProgress,
        cancelling: bool,
    },
    /// 닫기만 하면 되는 안내
    Notice,
}

/// 다이얼로그 하나
#[derive(Debug)]
pub struct DialogNode {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
    pub responses: Vec<Response>,
    pub selected: usize,
    pub input: Option<LineEditor>,
    pub purpose: DialogPurpose,
}

impl DialogNode {
    fn new(kind: DialogKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            responses: Vec::new(),
            selected: 0,
            input: None,
            purpose: DialogPurpose::Notice,
        }
    }

    fn responses(mut self, responses: &[Response]) -> Self {
        self.responses = responses.to_vec();
        self
    }

    fn purpose(mut self, purpose: DialogPurpose) -> Self {
        self.purpose = purpose;
        self
    }

    /// 작업 제출 전 확인
    pub fn confirm_operation(request: OperationRequest) -> Self {
        let count = request.items.len();
        let what = if count == 1 {
            format!("\"{}\"", request.items[0].display_name())
        } else {
            format!("{} items", count)
        };
        let message = match (request.verb, request.destination()) {
            (Verb::Delete, _) => format!("Delete {}?\nThis cannot be undone.", what),
            (verb, Some(dest)) => format!("{} {} to\n{}?", verb.name(), what, dest.display()),
            (verb, None) => format!("{} {}?", verb.name(), what),
        };
        let title = request.verb.name();
        Self::new(DialogKind::Confirm, title, message)
            .responses(&[Response::Yes, Response::No])
            .purpose(DialogPurpose::ConfirmOperation(Box::new(request)))
    }

    pub fn confirm_quit(running: usize) -> Self {
        let message = if running > 0 {
            format!(
                "{} still running.\nQuitting cancels them. Do you really want to quit?",
                crate::utils::formatter::pluralize(running, "operation is", "operations are")
            )
        } else {
            "Do you really want to quit?".to_string()
        };
        Self::new(DialogKind::Confirm, "Quit", message)
            .responses(&[Response::Yes, Response::No])
            .purpose(DialogPurpose::ConfirmQuit)
    }

    pub fn conflict(
        source: PathBuf,
        target: PathBuf,
        reply: oneshot::Sender<ConflictResolution>,
    ) -> Self {
        let message = format!(
            "Target already exists:\n{}\nSource:\n{}",
            target.display(),
            source.display()
        );
        let mut node = Self::new(DialogKind::Confirm, "File exists", message)
            .responses(&[
                Response::Overwrite,
                Response::Skip,
                Response::OverwriteAll,
                Response::SkipAll,
                Response::Abort,
            ])
            .purpose(DialogPurpose::Conflict(reply));
        // 다른 입력 도중 떠도 Enter 한 번으로 덮어쓰지 않는다
        node.selected = 1;
        node
    }

    pub fn mkdir(parent: PathBuf) -> Self {
        let mut node = Self::new(
            DialogKind::Input,
            "Make directory",
            format!("Create directory in {}:", parent.display()),
        )
        .responses(&[Response::Ok, Response::Cancel])
        .purpose(DialogPurpose::Mkdir { parent });
        node.input = Some(LineEditor::new());
        node
    }

    pub fn progress(id: OperationId, verb: Verb, total_items: usize) -> Self {
        Self::new(DialogKind::Progress, verb.progressive(), "").purpose(DialogPurpose::Progress {
            id,
            progress: OperationProgress::new(verb, total_items, 0),
            cancelling: false,
        })
    }

    pub fn error_report(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DialogKind::ErrorReport, title, message).responses(&[Response::Ok])
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DialogKind::Info, title, message).responses(&[Response::Ok])
    }

    /// 진행 다이얼로그에 묶인 작업
    pub fn bound_operation(&self) -> Option<OperationId> {
        match &self.purpose {
            DialogPurpose::Progress { id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn progress_state(&self) -> Option<(&OperationProgress, bool)> {
        match &self.purpose {
            DialogPurpose::Progress {
                progress,
                cancelling,
                ..
            } => Some((progress, *cancelling)),
            _ => None,
        }
    }

    /// Esc에 해당하는 응답
    pub(super) fn dismiss_response(&self) -> Option<Response> {
        [Response::No, Response::Cancel, Response::Abort, Response::Ok]
            .into_iter()
            .find(|r| self.responses.contains(r))
    }
}

/// 스택이 닫힌 다이얼로그로부터 돌려주는 결과
#[derive(Debug)]
pub enum DialogOutcome {
    /// 확인된 작업 제출
    Submit(Box<OperationRequest>),
    Quit,
    Mkdir { parent: PathBuf, name: String },
    /// 충돌 응답을 엔진에 전달함
    Answered(ConflictResolution),
    /// 진행 중 Esc
    CancelOperation(OperationId),
    /// 진행 다이얼로그만 닫고 작업은 계속
    Background(OperationId),
    Dismissed,
}
