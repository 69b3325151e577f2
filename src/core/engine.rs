//! 파일 작업 엔진
//!
//! 작업 하나가 tokio 태스크 하나다. 항목별 I/O는 `spawn_blocking`으로 돌리고,
//! 진행 상태와 충돌 질문은 이벤트 채널로 전경 루프에 보낸다.
//! 충돌 응답은 oneshot으로 받으며 기다리는 동안 멈추는 것은 해당 태스크뿐이다.

use crate::models::operation::{
    CancelToken, ConflictResolution, ItemStatus, OperationId, OperationProgress,
    OperationRequest, OperationStatus, OperationSummary, Verb,
};
use crate::models::EntryKind;
use crate::system::filesystem::FileSystem;
use crate::utils::error::{Result, TwinError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// 진행 이벤트 최소 간격
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(50);

/// 엔진이 전경 루프로 보내는 이벤트
#[derive(Debug)]
pub enum EngineEvent {
    Progress {
        id: OperationId,
        progress: OperationProgress,
    },
    /// 대상이 이미 있음. `reply`를 버리면 Abort로 간주한다.
    Conflict {
        id: OperationId,
        source: PathBuf,
        target: PathBuf,
        reply: oneshot::Sender<ConflictResolution>,
    },
    Finished(OperationSummary),
}

/// 제출된 작업 핸들
#[derive(Debug)]
pub struct OperationHandle {
    id: OperationId,
    cancel: CancelToken,
    join: JoinHandle<OperationSummary>,
}

impl OperationHandle {
    pub fn id(&self) -> OperationId {
        self.id
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// 작업이 종결 상태가 될 때까지 기다린다
    pub async fn wait(self) -> Result<OperationSummary> {
        self.join.await.map_err(join_error)
    }
}

struct InFlight {
    scope: Vec<PathBuf>,
    cancel: CancelToken,
}

type InFlightMap = Arc<Mutex<HashMap<OperationId, InFlight>>>;

pub struct OperationEngine {
    fs: Arc<dyn FileSystem>,
    runtime: Handle,
    events: mpsc::UnboundedSender<EngineEvent>,
    in_flight: InFlightMap,
}

impl OperationEngine {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        runtime: Handle,
    ) -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let engine = Self {
            fs,
            runtime,
            events,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        };
        (engine, rx)
    }

    /// 작업을 백그라운드로 넘기고 바로 돌아온다
    ///
    /// 잠금 범위가 진행 중인 작업과 겹치면 태스크를 만들지 않고 `Busy`.
    pub fn submit(&self, mut request: OperationRequest) -> Result<OperationHandle> {
        let scope = lock_scope(&request);
        {
            let mut in_flight = lock(&self.in_flight);
            for running in in_flight.values() {
                if let Some(path) = overlapping(&scope, &running.scope) {
                    tracing::info!(id = request.id, path = %path.display(), "operation rejected: busy");
                    return Err(TwinError::Busy { path });
                }
            }
            in_flight.insert(
                request.id,
                InFlight {
                    scope,
                    cancel: request.cancel_token(),
                },
            );
        }

        request.status = OperationStatus::InProgress;
        let id = request.id;
        let cancel = request.cancel_token();
        tracing::info!(
            id,
            verb = request.verb.name(),
            items = request.items.len(),
            "operation submitted"
        );

        let worker = Worker {
            fs: Arc::clone(&self.fs),
            events: self.events.clone(),
        };
        let in_flight = Arc::clone(&self.in_flight);
        let join = self.runtime.spawn(async move {
            let summary = worker.run(request).await;
            lock(&in_flight).remove(&summary.id);
            tracing::info!(id = summary.id, status = ?summary.status, "operation finished");
            let _ = worker.events.send(EngineEvent::Finished(summary.clone()));
            summary
        });

        Ok(OperationHandle { id, cancel, join })
    }

    /// 취소 플래그 설정. 진행 중인 작업이 없으면 false.
    pub fn cancel(&self, id: OperationId) -> bool {
        match lock(&self.in_flight).get(&id) {
            Some(running) => {
                running.cancel.cancel();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        for running in lock(&self.in_flight).values() {
            running.cancel.cancel();
        }
    }

    pub fn running_count(&self) -> usize {
        lock(&self.in_flight).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// 작업이 점유하는 경로: 대상 디렉토리, Delete는 소스 경로
fn lock_scope(request: &OperationRequest) -> Vec<PathBuf> {
    match (request.verb, request.destination()) {
        (Verb::Delete, _) | (_, None) => request.sources().to_vec(),
        (_, Some(dest)) => vec![dest.to_path_buf()],
    }
}

/// 한쪽이 다른 쪽의 접두 경로이면 겹친다
fn overlapping(a: &[PathBuf], b: &[PathBuf]) -> Option<PathBuf> {
    a.iter()
        .find(|pa| b.iter().any(|pb| pa.starts_with(pb) || pb.starts_with(pa)))
        .cloned()
}

/// 진행 이벤트 빈도 제한
struct Throttle {
    last: Option<Instant>,
}

impl Throttle {
    fn new() -> Self {
        Self { last: None }
    }

    fn ready(&mut self) -> bool {
        let now = Instant::now();
        match self.last {
            Some(last) if now.duration_since(last) < PROGRESS_INTERVAL => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// 충돌 처리 후 항목을 어떻게 할지
enum ConflictStep {
    Proceed { overwrite: bool },
    Skip,
    Abort,
}

struct Worker {
    fs: Arc<dyn FileSystem>,
    events: mpsc::UnboundedSender<EngineEvent>,
}

impl Worker {
    async fn run(&self, mut request: OperationRequest) -> OperationSummary {
        let id = request.id;
        let verb = request.verb;
        let cancel = request.cancel_token();

        let total_bytes = match verb {
            Verb::Copy | Verb::Move => {
                let fs = Arc::clone(&self.fs);
                let sources = request.sources().to_vec();
                tokio::task::spawn_blocking(move || {
                    sources.iter().map(|s| fs.measure(s)).sum::<u64>()
                })
                .await
                .unwrap_or(0)
            }
            Verb::Delete | Verb::Mkdir => 0,
        };

        let mut progress = OperationProgress::new(verb, request.items.len(), total_bytes);
        let mut remembered: Option<ConflictResolution> = None;
        let mut cancelled = false;

        for index in 0..request.items.len() {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let source = request.items[index].source.clone();
            let target = request.items[index].target.clone();
            request.items[index].status = ItemStatus::InProgress;
            progress.current = request.items[index].display_name();
            self.emit_progress(id, &progress);

            let outcome = match (verb, target) {
                (Verb::Delete, _) => {
                    let fs = Arc::clone(&self.fs);
                    blocking(move || fs.delete_entry(&source, true).map(|_| 0)).await
                }
                (Verb::Mkdir, Some(target)) => {
                    let fs = Arc::clone(&self.fs);
                    blocking(move || fs.mkdir(&target).map(|_| 0)).await
                }
                (Verb::Copy | Verb::Move, Some(target)) => {
                    match self
                        .resolve_conflict(id, &source, &target, &mut remembered)
                        .await
                    {
                        Ok(ConflictStep::Proceed { overwrite }) => {
                            let (result, updated) = self
                                .transfer(id, verb, source, target, overwrite, progress.clone())
                                .await;
                            progress = updated;
                            result
                        }
                        Ok(ConflictStep::Skip) => {
                            request.items[index].status = ItemStatus::Skipped;
                            progress.items_done += 1;
                            continue;
                        }
                        Ok(ConflictStep::Abort) => {
                            tracing::info!(id, "operation aborted at conflict");
                            cancelled = true;
                            break;
                        }
                        Err(err) => Err(err),
                    }
                }
                (_, None) => Err(TwinError::NotFound { path: source }),
            };

            let item = &mut request.items[index];
            match outcome {
                Ok(_) => item.status = ItemStatus::Done,
                Err(err) => {
                    tracing::warn!(id, source = %item.source.display(), error = %err, "item failed");
                    item.status = ItemStatus::Failed(err.kind());
                    item.error = Some(err.to_string());
                }
            }
            progress.items_done += 1;
        }

        if cancelled {
            request.skip_remaining();
        }
        request.status = request.resolve_status(cancelled);
        self.emit(EngineEvent::Progress { id, progress });
        request.into_summary()
    }

    /// 대상 존재 여부를 확인하고 필요하면 사용자에게 묻는다
    async fn resolve_conflict(
        &self,
        id: OperationId,
        source: &Path,
        target: &Path,
        remembered: &mut Option<ConflictResolution>,
    ) -> Result<ConflictStep> {
        let exists = {
            let fs = Arc::clone(&self.fs);
            let (source, target) = (source.to_path_buf(), target.to_path_buf());
            blocking(move || {
                check_paths(fs.as_ref(), &source, &target)?;
                Ok(fs.exists(&target))
            })
            .await?
        };
        if !exists {
            return Ok(ConflictStep::Proceed { overwrite: false });
        }

        let answer = match *remembered {
            Some(answer) => answer,
            None => self.ask(id, source, target).await,
        };
        if let Some(all) = answer.remembered() {
            *remembered = Some(all);
        }
        tracing::debug!(id, target = %target.display(), ?answer, "conflict resolved");

        Ok(match answer {
            ConflictResolution::Overwrite | ConflictResolution::OverwriteAll => {
                ConflictStep::Proceed { overwrite: true }
            }
            ConflictResolution::Skip | ConflictResolution::SkipAll => ConflictStep::Skip,
            ConflictResolution::Abort => ConflictStep::Abort,
        })
    }

    async fn ask(&self, id: OperationId, source: &Path, target: &Path) -> ConflictResolution {
        let (reply, answer) = oneshot::channel();
        let event = EngineEvent::Conflict {
            id,
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            reply,
        };
        if self.events.send(event).is_err() {
            return ConflictResolution::Abort;
        }
        answer.await.unwrap_or(ConflictResolution::Abort)
    }

    /// 복사 또는 이동 한 항목. 갱신된 진행 상태를 함께 돌려준다.
    async fn transfer(
        &self,
        id: OperationId,
        verb: Verb,
        source: PathBuf,
        target: PathBuf,
        overwrite: bool,
        mut progress: OperationProgress,
    ) -> (Result<u64>, OperationProgress) {
        let fs = Arc::clone(&self.fs);
        let events = self.events.clone();
        let fallback = progress.clone();

        let joined = tokio::task::spawn_blocking(move || {
            let mut throttle = Throttle::new();
            let mut moved = 0u64;
            let mut on_progress = |n: u64| {
                moved += n;
                progress.bytes_done += n;
                if throttle.ready() {
                    let _ = events.send(EngineEvent::Progress {
                        id,
                        progress: progress.clone(),
                    });
                }
            };

            let result = (|| -> Result<()> {
                if overwrite {
                    clear_target(fs.as_ref(), &source, &target)?;
                }
                match verb {
                    Verb::Move => fs.move_entry(&source, &target, &mut on_progress),
                    _ => fs.copy_entry(&source, &target, &mut on_progress).map(|_| ()),
                }
            })();
            drop(on_progress);
            (result.map(|_| moved), progress)
        })
        .await;

        match joined {
            Ok(pair) => pair,
            Err(e) => (Err(join_error(e)), fallback),
        }
    }

    fn emit_progress(&self, id: OperationId, progress: &OperationProgress) {
        self.emit(EngineEvent::Progress {
            id,
            progress: progress.clone(),
        });
    }

    fn emit(&self, event: EngineEvent) {
        // 수신자가 없으면 UI가 이미 종료된 것
        let _ = self.events.send(event);
    }
}

/// 같은 경로, 자기 자신 안으로, 자신을 품은 상위 위로의 복사/이동 금지
///
/// 대상이 소스의 상위이면 덮어쓰기 전 정리 단계가 소스까지 지운다.
fn check_paths(fs: &dyn FileSystem, source: &Path, target: &Path) -> Result<()> {
    if source == target {
        return Err(TwinError::SameSourceAndDest {
            path: source.to_path_buf(),
        });
    }
    if source.starts_with(target) {
        return Err(TwinError::TargetContainsSource {
            src: source.to_path_buf(),
            dest: target.to_path_buf(),
        });
    }
    let source_entry = fs.stat(source)?;
    if source_entry.kind == EntryKind::Directory && target.starts_with(source) {
        return Err(TwinError::RecursiveTarget {
            src: source.to_path_buf(),
            dest: target.to_path_buf(),
        });
    }
    Ok(())
}

/// 덮어쓰기 준비. 파일→파일은 제자리에서 덮어쓰고, 그 밖에는 기존 대상을 지운다.
fn clear_target(fs: &dyn FileSystem, source: &Path, target: &Path) -> Result<()> {
    let source_kind = fs.stat(source)?.kind;
    let target_kind = match fs.stat(target) {
        Ok(entry) => entry.kind,
        Err(TwinError::NotFound { .. }) => return Ok(()),
        Err(err) => return Err(err),
    };
    if source_kind == EntryKind::File && target_kind == EntryKind::File {
        return Ok(());
    }
    fs.delete_entry(target, true)
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(join_error)?
}

/// 런타임 종료로 태스크가 버려졌으면 Cancelled
fn join_error(err: tokio::task::JoinError) -> TwinError {
    if err.is_cancelled() {
        TwinError::Cancelled
    } else {
        TwinError::Io(std::io::Error::other(err.to_string()))
    }
}
