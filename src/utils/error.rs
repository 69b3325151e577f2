use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 사용자에게 보여주는 오류 분류
///
/// 배치 요약 다이얼로그와 네비게이션 오류 표시는 모두 이 분류를 기준으로 한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    PermissionDenied,
    NotADirectory,
    AlreadyExists,
    Io,
    Busy,
    Cancelled,
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NotFound",
            ErrorKind::PermissionDenied => "PermissionDenied",
            ErrorKind::NotADirectory => "NotADirectory",
            ErrorKind::AlreadyExists => "AlreadyExists",
            ErrorKind::Io => "IOError",
            ErrorKind::Busy => "Busy",
            ErrorKind::Cancelled => "Cancelled",
        }
    }
}

#[derive(Error, Debug)]
pub enum TwinError {
    #[error("No such file or directory: {path}")]
    NotFound { path: PathBuf },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Already exists: {path}")]
    AlreadyExists { path: PathBuf },

    #[error("I/O error on {path}: {source}")]
    PathIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Another operation is already running on {path}")]
    Busy { path: PathBuf },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Source and destination are the same: {path}")]
    SameSourceAndDest { path: PathBuf },

    #[error("Cannot copy or move {src} into itself ({dest})")]
    RecursiveTarget { src: PathBuf, dest: PathBuf },

    #[error("Cannot replace {dest}: it contains the source {src}")]
    TargetContainsSource { src: PathBuf, dest: PathBuf },

    #[error("Failed to launch '{command}': {reason}")]
    Launch { command: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TwinError {
    /// io::Error를 경로 정보와 함께 분류된 오류로 변환
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => TwinError::NotFound { path },
            io::ErrorKind::PermissionDenied => TwinError::PermissionDenied { path },
            io::ErrorKind::AlreadyExists => TwinError::AlreadyExists { path },
            _ => TwinError::PathIo { path, source: err },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TwinError::NotFound { .. } => ErrorKind::NotFound,
            TwinError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            TwinError::NotADirectory { .. } => ErrorKind::NotADirectory,
            TwinError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            TwinError::Busy { .. } => ErrorKind::Busy,
            TwinError::Cancelled => ErrorKind::Cancelled,
            TwinError::Io(e) => match e.kind() {
                io::ErrorKind::NotFound => ErrorKind::NotFound,
                io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
                io::ErrorKind::AlreadyExists => ErrorKind::AlreadyExists,
                _ => ErrorKind::Io,
            },
            TwinError::PathIo { .. }
            | TwinError::SameSourceAndDest { .. }
            | TwinError::RecursiveTarget { .. }
            | TwinError::TargetContainsSource { .. }
            | TwinError::Launch { .. }
            | TwinError::Config(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, TwinError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_io_maps_kinds() {
        let path = Path::new("/tmp/x");
        let err = TwinError::from_io(io::Error::from(io::ErrorKind::NotFound), path);
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = TwinError::from_io(io::Error::from(io::ErrorKind::PermissionDenied), path);
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);

        let err = TwinError::from_io(io::Error::from(io::ErrorKind::AlreadyExists), path);
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);

        let err = TwinError::from_io(io::Error::other("disk on fire"), path);
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_display_contains_path() {
        let err = TwinError::NotADirectory {
            path: PathBuf::from("/etc/passwd"),
        };
        assert_eq!(err.to_string(), "Not a directory: /etc/passwd");
    }

    #[test]
    fn test_plain_io_kind() {
        let err: TwinError = io::Error::from(io::ErrorKind::PermissionDenied).into();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(ErrorKind::Io.label(), "IOError");
        assert_eq!(ErrorKind::Busy.label(), "Busy");
    }
}
