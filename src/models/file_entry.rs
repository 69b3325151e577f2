use crate::utils::formatter::format_mode;
use std::path::PathBuf;
use std::time::SystemTime;

/// 엔트리 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    /// 소켓, FIFO, 디바이스 등
    Other,
}

/// 디렉토리 목록의 한 항목
///
/// 마크 여부는 엔트리가 아니라 소유한 `DirectoryModel`의 마크 집합에 있다.
#[derive(Debug, Clone)]
pub struct Entry {
    /// 부모 목록 안에서 유일한 이름
    pub name: String,
    /// 전체 경로
    pub path: PathBuf,
    pub kind: EntryKind,
    /// 바이트 단위 크기 (디렉토리는 0)
    pub size: u64,
    pub modified: Option<SystemTime>,
    /// Unix 모드 비트 (하위 9비트 사용)
    pub mode: Option<u32>,
    /// 심볼릭 링크가 디렉토리를 가리키는지
    pub link_to_dir: bool,
    pub executable: bool,
}

impl Entry {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
            size: 0,
            modified: None,
            mode: None,
            link_to_dir: false,
            executable: false,
        }
    }

    /// 진입 가능한 디렉토리인지 (디렉토리를 가리키는 링크 포함)
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory || (self.kind == EntryKind::Symlink && self.link_to_dir)
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    /// 권한 요약 (예: "-rw-r--r--")
    pub fn permissions(&self) -> String {
        format_mode(self.kind, self.mode)
    }
}
