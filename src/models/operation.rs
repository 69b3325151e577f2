//! 파일 작업 모델
//!
//! 작업 요청, 항목별 상태, 충돌 응답, 진행 상태, 완료 요약.

use crate::utils::error::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

pub type OperationId = u64;

static NEXT_OPERATION_ID: AtomicU64 = AtomicU64::new(1);

/// 작업 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Copy,
    Move,
    Delete,
    Mkdir,
}

impl Verb {
    pub fn name(&self) -> &'static str {
        match self {
            Verb::Copy => "Copy",
            Verb::Move => "Move",
            Verb::Delete => "Delete",
            Verb::Mkdir => "Mkdir",
        }
    }

    /// 진행형 표기 (진행 다이얼로그 제목)
    pub fn progressive(&self) -> &'static str {
        match self {
            Verb::Copy => "Copying",
            Verb::Move => "Moving",
            Verb::Delete => "Deleting",
            Verb::Mkdir => "Creating",
        }
    }
}

/// 항목 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Pending,
    InProgress,
    Done,
    Failed(ErrorKind),
    Skipped,
}

impl ItemStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ItemStatus::Done | ItemStatus::Failed(_) | ItemStatus::Skipped
        )
    }
}

/// 작업 전체 상태. 종결 상태로는 한 번만 전이한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationStatus {
    Pending,
    InProgress,
    Done,
    Failed,
    Cancelled,
}

impl OperationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OperationStatus::Done | OperationStatus::Failed | OperationStatus::Cancelled
        )
    }
}

/// 충돌 응답
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictResolution {
    Overwrite,
    Skip,
    OverwriteAll,
    SkipAll,
    Abort,
}

impl ConflictResolution {
    /// "All" 응답이면 배치 나머지에 적용할 단일 응답
    pub fn remembered(&self) -> Option<ConflictResolution> {
        match self {
            ConflictResolution::OverwriteAll => Some(ConflictResolution::Overwrite),
            ConflictResolution::SkipAll => Some(ConflictResolution::Skip),
            _ => None,
        }
    }
}

/// 협력적 취소 플래그. 작업 태스크는 항목 사이에서만 확인한다.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 작업 대상 한 항목
#[derive(Debug, Clone)]
pub struct OperationItem {
    pub source: PathBuf,
    /// Delete는 None
    pub target: Option<PathBuf>,
    pub status: ItemStatus,
    pub error: Option<String>,
}

impl OperationItem {
    pub fn display_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

/// 작업 요청
///
/// 소스 목록은 생성 시점에 고정되고 이후 바뀌지 않는다.
#[derive(Debug)]
pub struct OperationRequest {
    pub id: OperationId,
    pub verb: Verb,
    sources: Vec<PathBuf>,
    destination: Option<PathBuf>,
    pub items: Vec<OperationItem>,
    pub status: OperationStatus,
    cancel: CancelToken,
}

impl OperationRequest {
    fn new(verb: Verb, sources: Vec<PathBuf>, destination: Option<PathBuf>) -> Self {
        let items = sources
            .iter()
            .map(|source| OperationItem {
                source: source.clone(),
                target: destination
                    .as_deref()
                    .map(|dest| target_path(dest, source)),
                status: ItemStatus::Pending,
                error: None,
            })
            .collect();

        Self {
            id: NEXT_OPERATION_ID.fetch_add(1, Ordering::Relaxed),
            verb,
            sources,
            destination,
            items,
            status: OperationStatus::Pending,
            cancel: CancelToken::new(),
        }
    }

    pub fn copy(sources: Vec<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self::new(Verb::Copy, sources, Some(destination.into()))
    }

    pub fn move_to(sources: Vec<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self::new(Verb::Move, sources, Some(destination.into()))
    }

    pub fn delete(sources: Vec<PathBuf>) -> Self {
        Self::new(Verb::Delete, sources, None)
    }

    /// `parent` 아래에 `name` 디렉토리 생성
    pub fn mkdir(parent: impl Into<PathBuf>, name: &str) -> Self {
        Self::new(Verb::Mkdir, vec![PathBuf::from(name)], Some(parent.into()))
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// 작업 후 다시 읽어야 할 디렉토리: 대상 경로와 각 소스의 부모
    pub fn affected_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        if let Some(dest) = &self.destination {
            dirs.push(dest.clone());
        }
        if self.verb != Verb::Mkdir {
            for source in &self.sources {
                if let Some(parent) = source.parent() {
                    if !dirs.iter().any(|d| d == parent) {
                        dirs.push(parent.to_path_buf());
                    }
                }
            }
        }
        dirs
    }

    /// 항목 상태로부터 종결 상태 계산
    pub fn resolve_status(&self, cancelled: bool) -> OperationStatus {
        if cancelled {
            OperationStatus::Cancelled
        } else if self
            .items
            .iter()
            .any(|item| matches!(item.status, ItemStatus::Failed(_)))
        {
            OperationStatus::Failed
        } else {
            OperationStatus::Done
        }
    }

    /// 아직 처리되지 않은 항목을 Skipped로 바꾼다
    pub fn skip_remaining(&mut self) {
        for item in &mut self.items {
            if !item.status.is_terminal() {
                item.status = ItemStatus::Skipped;
            }
        }
    }

    /// 요청을 소비하고 요약을 만든다
    pub fn into_summary(self) -> OperationSummary {
        let refresh_dirs = self.affected_dirs();
        OperationSummary {
            id: self.id,
            verb: self.verb,
            status: self.status,
            items: self.items,
            refresh_dirs,
        }
    }
}

/// `dest` + 소스 파일 이름
pub fn target_path(dest: &Path, source: &Path) -> PathBuf {
    match source.file_name() {
        Some(name) => dest.join(name),
        None => dest.join(source),
    }
}

/// 진행 상태
#[derive(Debug, Clone, PartialEq)]
pub struct OperationProgress {
    pub verb: Verb,
    pub current: String,
    pub items_done: usize,
    pub total_items: usize,
    pub bytes_done: u64,
    pub total_bytes: u64,
}

impl OperationProgress {
    pub fn new(verb: Verb, total_items: usize, total_bytes: u64) -> Self {
        Self {
            verb,
            current: String::new(),
            items_done: 0,
            total_items,
            bytes_done: 0,
            total_bytes,
        }
    }

    /// 진행률 (0-100). 바이트 기준이 없으면 항목 수 기준.
    pub fn percentage(&self) -> u8 {
        let ratio = if self.total_bytes > 0 {
            self.bytes_done as f64 / self.total_bytes as f64
        } else if self.total_items > 0 {
            self.items_done as f64 / self.total_items as f64
        } else {
            1.0
        };
        (ratio.clamp(0.0, 1.0) * 100.0) as u8
    }
}

/// 완료된 작업 요약. 다이얼로그 스택에 넘겨진 뒤 버려진다.
#[derive(Debug, Clone)]
pub struct OperationSummary {
    pub id: OperationId,
    pub verb: Verb,
    pub status: OperationStatus,
    pub items: Vec<OperationItem>,
    pub refresh_dirs: Vec<PathBuf>,
}

impl OperationSummary {
    pub fn count(&self, status: ItemStatus) -> usize {
        self.items.iter().filter(|i| i.status == status).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &OperationItem> {
        self.items
            .iter()
            .filter(|i| matches!(i.status, ItemStatus::Failed(_)))
    }

    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }

    /// 한 줄 결과 (상태바 표시용)
    pub fn headline(&self) -> String {
        let done = self.count(ItemStatus::Done);
        let skipped = self.count(ItemStatus::Skipped);
        let failed = self.failed_count();
        let state = match self.status {
            OperationStatus::Done => "completed",
            OperationStatus::Failed => "completed with errors",
            OperationStatus::Cancelled => "cancelled",
            OperationStatus::Pending | OperationStatus::InProgress => "running",
        };
        format!(
            "{} {}: {} done, {} skipped, {} failed",
            self.verb.name(),
            state,
            done,
            skipped,
            failed
        )
    }

    /// 실패 항목 전체 목록 (오류 보고 다이얼로그 본문)
    pub fn failure_report(&self) -> String {
        let mut lines = vec![self.headline(), String::new()];
        for item in self.failed() {
            let kind = match item.status {
                ItemStatus::Failed(kind) => kind.label(),
                _ => "",
            };
            let detail = item.error.as_deref().unwrap_or("");
            lines.push(format!("[{}] {}: {}", kind, item.source.display(), detail));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_request_targets() {
        let request = OperationRequest::copy(
            vec![PathBuf::from("/src/a.txt"), PathBuf::from("/src/dir")],
            "/dst",
        );
        assert_eq!(request.verb, Verb::Copy);
        assert_eq!(request.status, OperationStatus::Pending);
        assert_eq!(
            request.items[0].target.as_deref(),
            Some(Path::new("/dst/a.txt"))
        );
        assert_eq!(request.items[1].target.as_deref(), Some(Path::new("/dst/dir")));
        assert!(request
            .items
            .iter()
            .all(|i| i.status == ItemStatus::Pending));
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = OperationRequest::delete(vec![PathBuf::from("/x")]);
        let b = OperationRequest::delete(vec![PathBuf::from("/x")]);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_mkdir_request() {
        let request = OperationRequest::mkdir("/home/u", "new");
        assert_eq!(
            request.items[0].target.as_deref(),
            Some(Path::new("/home/u/new"))
        );
        assert_eq!(request.affected_dirs(), vec![PathBuf::from("/home/u")]);
    }

    #[test]
    fn test_affected_dirs_dedup() {
        let request = OperationRequest::move_to(
            vec![PathBuf::from("/src/a"), PathBuf::from("/src/b")],
            "/dst",
        );
        assert_eq!(
            request.affected_dirs(),
            vec![PathBuf::from("/dst"), PathBuf::from("/src")]
        );
    }

    #[test]
    fn test_resolve_status() {
        let mut request = OperationRequest::delete(vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        request.items[0].status = ItemStatus::Done;
        request.items[1].status = ItemStatus::Skipped;
        assert_eq!(request.resolve_status(false), OperationStatus::Done);

        request.items[1].status = ItemStatus::Failed(ErrorKind::PermissionDenied);
        assert_eq!(request.resolve_status(false), OperationStatus::Failed);
        assert_eq!(request.resolve_status(true), OperationStatus::Cancelled);
    }

    #[test]
    fn test_skip_remaining_keeps_terminal() {
        let mut request = OperationRequest::delete(vec![
            PathBuf::from("/a"),
            PathBuf::from("/b"),
            PathBuf::from("/c"),
        ]);
        request.items[0].status = ItemStatus::Done;
        request.skip_remaining();
        assert_eq!(request.items[0].status, ItemStatus::Done);
        assert_eq!(request.items[1].status, ItemStatus::Skipped);
        assert_eq!(request.items[2].status, ItemStatus::Skipped);
    }

    #[test]
    fn test_cancel_token_shared() {
        let request = OperationRequest::delete(vec![PathBuf::from("/a")]);
        let token = request.cancel_token();
        assert!(!token.is_cancelled());
        request.cancel_token().cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_progress_percentage() {
        let mut progress = OperationProgress::new(Verb::Copy, 4, 1000);
        assert_eq!(progress.percentage(), 0);
        progress.bytes_done = 500;
        assert_eq!(progress.percentage(), 50);

        let mut by_items = OperationProgress::new(Verb::Delete, 4, 0);
        by_items.items_done = 1;
        assert_eq!(by_items.percentage(), 25);

        assert_eq!(OperationProgress::new(Verb::Mkdir, 0, 0).percentage(), 100);
    }

    #[test]
    fn test_summary_report_lists_failures() {
        let mut request = OperationRequest::delete(vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        request.items[0].status = ItemStatus::Done;
        request.items[1].status = ItemStatus::Failed(ErrorKind::PermissionDenied);
        request.items[1].error = Some("Permission denied: /b".to_string());
        request.status = OperationStatus::Failed;

        let summary = request.into_summary();
        assert_eq!(summary.failed_count(), 1);
        let report = summary.failure_report();
        assert!(report.starts_with("Delete completed with errors: 1 done, 0 skipped, 1 failed"));
        assert!(report.contains("[PermissionDenied] /b"));
    }

    #[test]
    fn test_conflict_remembered() {
        assert_eq!(
            ConflictResolution::SkipAll.remembered(),
            Some(ConflictResolution::Skip)
        );
        assert_eq!(ConflictResolution::Overwrite.remembered(), None);
    }
}
