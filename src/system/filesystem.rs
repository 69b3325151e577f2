use crate::models::file_entry::{Entry, EntryKind};
use crate::utils::error::{Result, TwinError};
use std::fs::{self, File, Metadata};
use std::io::{Read, Write};
use std::path::Path;

/// 스트리밍 복사 버퍼 크기
pub const COPY_CHUNK_SIZE: usize = 64 * 1024;

/// 파일 시스템 협력자
///
/// 작업 엔진과 디렉토리 모델은 이 트레이트에만 의존한다.
/// 필수 메서드는 단일 엔트리 단위의 원시 연산이고, 트리 단위 연산은
/// 기본 구현으로 제공된다.
pub trait FileSystem: Send + Sync {
    /// 디렉토리 목록 (정렬되지 않음)
    fn list_dir(&self, path: &Path) -> Result<Vec<Entry>>;

    /// 링크를 따라가지 않는 단일 엔트리 조회
    fn stat(&self, path: &Path) -> Result<Entry>;

    /// 일반 파일 하나를 청크 단위로 복사한다. 대상이 있으면 덮어쓴다.
    /// `on_progress`는 청크마다 이번에 쓴 바이트 수로 호출된다.
    fn copy_bytes(&self, src: &Path, dst: &Path, on_progress: &mut dyn FnMut(u64))
        -> Result<u64>;

    /// 심볼릭 링크 자체를 복제
    fn copy_link(&self, src: &Path, dst: &Path) -> Result<()>;

    fn rename(&self, src: &Path, dst: &Path) -> Result<()>;

    fn delete_entry(&self, path: &Path, recursive: bool) -> Result<()>;

    fn mkdir(&self, path: &Path) -> Result<()>;

    fn exists(&self, path: &Path) -> bool {
        self.stat(path).is_ok()
    }

    /// 파일, 링크, 디렉토리 트리를 복사
    fn copy_entry(
        &self,
        src: &Path,
        dst: &Path,
        on_progress: &mut dyn FnMut(u64),
    ) -> Result<u64> {
        let entry = self.stat(src)?;
        match entry.kind {
            EntryKind::Directory => {
                if !self.exists(dst) {
                    self.mkdir(dst)?;
                }
                let mut total = 0;
                for child in self.list_dir(src)? {
                    total += self.copy_entry(&child.path, &dst.join(&child.name), on_progress)?;
                }
                Ok(total)
            }
            EntryKind::Symlink => {
                self.copy_link(src, dst)?;
                Ok(0)
            }
            EntryKind::File | EntryKind::Other => self.copy_bytes(src, dst, on_progress),
        }
    }

    /// rename을 먼저 시도하고, 실패하면 복사 후 원본을 삭제한다.
    fn move_entry(&self, src: &Path, dst: &Path, on_progress: &mut dyn FnMut(u64)) -> Result<()> {
        let entry = self.stat(src)?;
        if self.rename(src, dst).is_ok() {
            on_progress(self.measure(dst));
            return Ok(());
        }
        tracing::debug!(src = %src.display(), dst = %dst.display(), "rename failed, copying");
        self.copy_entry(src, dst, on_progress)?;
        self.delete_entry(src, entry.kind == EntryKind::Directory)
    }

    /// 경로 아래 일반 파일 크기의 합
    fn measure(&self, path: &Path) -> u64 {
        let Ok(entry) = self.stat(path) else {
            return 0;
        };
        match entry.kind {
            EntryKind::Directory => self
                .list_dir(path)
                .map(|children| children.iter().map(|c| self.measure(&c.path)).sum())
                .unwrap_or(0),
            EntryKind::File => entry.size,
            _ => 0,
        }
    }
}

/// 로컬 디스크 구현
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }

    fn entry_from_metadata(path: &Path, name: String, link_meta: &Metadata) -> Entry {
        let file_type = link_meta.file_type();
        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };

        // 링크는 대상 메타데이터로 크기와 시간을 보여준다
        let target_meta = if kind == EntryKind::Symlink {
            fs::metadata(path).ok()
        } else {
            None
        };
        let display_meta = target_meta.as_ref().unwrap_or(link_meta);

        let mut entry = Entry::new(name, path, kind);
        entry.link_to_dir = target_meta.as_ref().is_some_and(|m| m.is_dir());
        entry.size = if display_meta.is_file() {
            display_meta.len()
        } else {
            0
        };
        entry.modified = display_meta.modified().ok();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = display_meta.permissions().mode();
            entry.mode = Some(mode & 0o777);
            entry.executable = display_meta.is_file() && mode & 0o111 != 0;
        }

        entry
    }
}

impl FileSystem for LocalFileSystem {
    fn list_dir(&self, path: &Path) -> Result<Vec<Entry>> {
        let meta = fs::metadata(path).map_err(|e| TwinError::from_io(e, path))?;
        if !meta.is_dir() {
            return Err(TwinError::NotADirectory {
                path: path.to_path_buf(),
            });
        }

        let read_dir = fs::read_dir(path).map_err(|e| TwinError::from_io(e, path))?;
        let mut entries = Vec::new();
        for dir_entry in read_dir {
            // 나열 도중 사라진 항목은 건너뛴다
            let Ok(dir_entry) = dir_entry else { continue };
            let entry_path = dir_entry.path();
            let Ok(link_meta) = fs::symlink_metadata(&entry_path) else {
                continue;
            };
            let name = dir_entry.file_name().to_string_lossy().into_owned();
            entries.push(Self::entry_from_metadata(&entry_path, name, &link_meta));
        }
        Ok(entries)
    }

    fn stat(&self, path: &Path) -> Result<Entry> {
        let meta = fs::symlink_metadata(path).map_err(|e| TwinError::from_io(e, path))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::entry_from_metadata(path, name, &meta))
    }

    fn copy_bytes(
        &self,
        src: &Path,
        dst: &Path,
        on_progress: &mut dyn FnMut(u64),
    ) -> Result<u64> {
        if src == dst {
            return Err(TwinError::SameSourceAndDest {
                path: src.to_path_buf(),
            });
        }

        let mut reader = File::open(src).map_err(|e| TwinError::from_io(e, src))?;
        let permissions = reader.metadata().ok().map(|m| m.permissions());
        let mut writer = File::create(dst).map_err(|e| TwinError::from_io(e, dst))?;

        let mut buf = vec![0u8; COPY_CHUNK_SIZE];
        let mut total = 0u64;
        loop {
            let n = reader.read(&mut buf).map_err(|e| TwinError::from_io(e, src))?;
            if n == 0 {
                break;
            }
            writer
                .write_all(&buf[..n])
                .map_err(|e| TwinError::from_io(e, dst))?;
            total += n as u64;
            on_progress(n as u64);
        }
        writer.flush().map_err(|e| TwinError::from_io(e, dst))?;

        if let Some(permissions) = permissions {
            // 권한 복사 실패는 복사 실패가 아니다
            let _ = fs::set_permissions(dst, permissions);
        }
        Ok(total)
    }

    fn copy_link(&self, src: &Path, dst: &Path) -> Result<()> {
        let target = fs::read_link(src).map_err(|e| TwinError::from_io(e, src))?;
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(&target, dst).map_err(|e| TwinError::from_io(e, dst))
        }
        #[cfg(not(unix))]
        {
            let _ = target;
            fs::copy(src, dst)
                .map(|_| ())
                .map_err(|e| TwinError::from_io(e, dst))
        }
    }

    fn rename(&self, src: &Path, dst: &Path) -> Result<()> {
        if src == dst {
            return Err(TwinError::SameSourceAndDest {
                path: src.to_path_buf(),
            });
        }
        fs::rename(src, dst).map_err(|e| TwinError::from_io(e, src))
    }

    fn delete_entry(&self, path: &Path, recursive: bool) -> Result<()> {
        let meta = fs::symlink_metadata(path).map_err(|e| TwinError::from_io(e, path))?;
        let result = if meta.is_dir() {
            if recursive {
                fs::remove_dir_all(path)
            } else {
                fs::remove_dir(path)
            }
        } else {
            fs::remove_file(path)
        };
        result.map_err(|e| TwinError::from_io(e, path))
    }

    fn mkdir(&self, path: &Path) -> Result<()> {
        if fs::symlink_metadata(path).is_ok() {
            return Err(TwinError::AlreadyExists {
                path: path.to_path_buf(),
            });
        }
        fs::create_dir(path).map_err(|e| TwinError::from_io(e, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorKind;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_list_dir_reads_kinds() {
        let temp = TempDir::new().unwrap();
        write(&temp.path().join("a.txt"), "hello");
        fs::create_dir(temp.path().join("sub")).unwrap();

        let fs_impl = LocalFileSystem::new();
        let entries = fs_impl.list_dir(temp.path()).unwrap();
        assert_eq!(entries.len(), 2);

        let file = entries.iter().find(|e| e.name == "a.txt").unwrap();
        assert_eq!(file.kind, EntryKind::File);
        assert_eq!(file.size, 5);
        assert!(file.modified.is_some());

        let dir = entries.iter().find(|e| e.name == "sub").unwrap();
        assert_eq!(dir.kind, EntryKind::Directory);
        assert_eq!(dir.size, 0);
    }

    #[test]
    fn test_list_dir_not_found() {
        let result = LocalFileSystem::new().list_dir(&PathBuf::from("/nonexistent/path/12345"));
        match result {
            Err(TwinError::NotFound { .. }) => {}
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_list_dir_on_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain.txt");
        write(&file, "x");

        let result = LocalFileSystem::new().list_dir(&file);
        match result {
            Err(TwinError::NotADirectory { .. }) => {}
            other => panic!("Expected NotADirectory, got {:?}", other),
        }
    }

    #[test]
    fn test_copy_bytes_streams_in_chunks() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("big.bin");
        let data: Vec<u8> = (0..(COPY_CHUNK_SIZE * 3 + 17))
            .map(|i| (i % 251) as u8)
            .collect();
        fs::write(&src, &data).unwrap();

        let dst = temp.path().join("copy.bin");
        let mut calls = 0;
        let mut seen = 0u64;
        let copied = LocalFileSystem::new()
            .copy_bytes(&src, &dst, &mut |n| {
                calls += 1;
                seen += n;
            })
            .unwrap();

        assert_eq!(copied, data.len() as u64);
        assert_eq!(seen, data.len() as u64);
        assert!(calls >= 4);
        assert_eq!(fs::read(&dst).unwrap(), data);
    }

    #[test]
    fn test_copy_bytes_overwrites_existing() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.txt");
        let dst = temp.path().join("b.txt");
        write(&src, "new");
        write(&dst, "much older content");

        LocalFileSystem::new()
            .copy_bytes(&src, &dst, &mut |_| {})
            .unwrap();
        assert_eq!(fs::read_to_string(&dst).unwrap(), "new");
    }

    #[test]
    fn test_copy_entry_directory_tree() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("tree");
        fs::create_dir_all(src.join("inner/deeper")).unwrap();
        write(&src.join("top.txt"), "top");
        write(&src.join("inner/deeper/leaf.txt"), "leaf");

        let dst = temp.path().join("tree_copy");
        let copied = LocalFileSystem::new()
            .copy_entry(&src, &dst, &mut |_| {})
            .unwrap();

        assert_eq!(copied, 7);
        assert_eq!(fs::read_to_string(dst.join("top.txt")).unwrap(), "top");
        assert_eq!(
            fs::read_to_string(dst.join("inner/deeper/leaf.txt")).unwrap(),
            "leaf"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_entry_keeps_symlink() {
        let temp = TempDir::new().unwrap();
        write(&temp.path().join("target.txt"), "t");
        let link = temp.path().join("link");
        std::os::unix::fs::symlink("target.txt", &link).unwrap();

        let dst = temp.path().join("link_copy");
        LocalFileSystem::new()
            .copy_entry(&link, &dst, &mut |_| {})
            .unwrap();
        assert_eq!(fs::read_link(&dst).unwrap(), PathBuf::from("target.txt"));
    }

    #[test]
    fn test_move_entry_renames() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("from.txt");
        write(&src, "payload");
        let dst = temp.path().join("to.txt");

        let mut reported = 0;
        LocalFileSystem::new()
            .move_entry(&src, &dst, &mut |n| reported += n)
            .unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dst).unwrap(), "payload");
        assert_eq!(reported, 7);
    }

    #[test]
    fn test_move_entry_missing_source() {
        let temp = TempDir::new().unwrap();
        let result = LocalFileSystem::new().move_entry(
            &temp.path().join("ghost"),
            &temp.path().join("dest"),
            &mut |_| {},
        );
        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_delete_entry() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("full");
        fs::create_dir(&dir).unwrap();
        write(&dir.join("f.txt"), "x");

        let fs_impl = LocalFileSystem::new();
        assert!(fs_impl.delete_entry(&dir, false).is_err());
        fs_impl.delete_entry(&dir, true).unwrap();
        assert!(!dir.exists());

        let result = fs_impl.delete_entry(&dir, true);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_mkdir() {
        let temp = TempDir::new().unwrap();
        let fs_impl = LocalFileSystem::new();
        let new_dir = temp.path().join("new_folder");

        fs_impl.mkdir(&new_dir).unwrap();
        assert!(new_dir.is_dir());

        match fs_impl.mkdir(&new_dir) {
            Err(TwinError::AlreadyExists { .. }) => {}
            other => panic!("Expected AlreadyExists, got {:?}", other),
        }
    }

    #[test]
    fn test_measure() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("d")).unwrap();
        write(&temp.path().join("d/one"), "1");
        write(&temp.path().join("d/three"), "333");
        assert_eq!(LocalFileSystem::new().measure(&temp.path().join("d")), 4);
    }
}
