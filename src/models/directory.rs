use crate::models::file_entry::Entry;
use crate::system::filesystem::FileSystem;
use crate::utils::error::Result;
use std::cmp::Ordering as CmpOrdering;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// 한 패널의 디렉토리 스냅샷
///
/// 목록을 다시 읽을 때는 항상 새 값을 만들어 통째로 교체한다.
/// 기존 스냅샷의 엔트리는 제자리에서 바뀌지 않는다.
///
/// 상위 디렉토리가 있으면 목록 맨 위에 ".." 행이 붙는다. 커서는 ".."를
/// 포함한 행 인덱스이고, 마크 관련 인덱스는 엔트리 인덱스다.
#[derive(Debug, Clone)]
pub struct DirectoryModel {
    path: PathBuf,
    entries: Vec<Entry>,
    /// ".." 행 포함 여부
    has_parent: bool,
    cursor: usize,
    marks: BTreeSet<String>,
    generation: u64,
    scroll_offset: usize,
    show_hidden: bool,
}

impl DirectoryModel {
    /// 디렉토리를 읽어 새 스냅샷을 만든다. 커서는 0.
    pub fn load(fs: &dyn FileSystem, path: &Path, show_hidden: bool) -> Result<Self> {
        let entries = read_sorted(fs, path, show_hidden)?;
        Ok(Self {
            path: path.to_path_buf(),
            entries,
            has_parent: path.parent().is_some(),
            cursor: 0,
            marks: BTreeSet::new(),
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
            scroll_offset: 0,
            show_hidden,
        })
    }

    /// 같은 경로를 다시 읽는다
    ///
    /// 커서 아래 이름이 남아 있으면 그 위치를 유지하고, 아직 존재하는
    /// 항목의 마크는 보존한다.
    pub fn reload(&self, fs: &dyn FileSystem) -> Result<Self> {
        self.reload_with(fs, self.show_hidden)
    }

    /// 숨김 파일 표시 여부를 바꿔 다시 읽는다
    pub fn reload_with(&self, fs: &dyn FileSystem, show_hidden: bool) -> Result<Self> {
        let mut next = Self::load(fs, &self.path, show_hidden)?;

        next.marks = self
            .marks
            .iter()
            .filter(|name| next.entries.iter().any(|e| &e.name == *name))
            .cloned()
            .collect();

        match self.current().map(|e| e.name.as_str()) {
            Some(name) if next.focus_name(name) => {}
            _ => next.set_cursor(self.cursor),
        }
        next.scroll_offset = self.scroll_offset;
        Ok(next)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 커서 행 (".." 포함)
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn has_parent(&self) -> bool {
        self.has_parent
    }

    fn parent_rows(&self) -> usize {
        usize::from(self.has_parent)
    }

    /// 화면에 보이는 행 수 (".." 포함)
    pub fn row_count(&self) -> usize {
        self.entries.len() + self.parent_rows()
    }

    /// 커서가 ".." 행에 있는지
    pub fn is_parent_row(&self) -> bool {
        self.has_parent && self.cursor == 0
    }

    /// 커서 아래 엔트리의 인덱스. ".." 행이면 None.
    pub fn entry_index(&self) -> Option<usize> {
        self.cursor
            .checked_sub(self.parent_rows())
            .filter(|&index| index < self.entries.len())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    /// 커서 아래 엔트리
    pub fn current(&self) -> Option<&Entry> {
        self.entry_index().and_then(|index| self.entries.get(index))
    }

    /// 커서를 delta만큼 옮기고 범위 안으로 자른다. 행이 없으면 아무것도 안 한다.
    pub fn move_cursor(&mut self, delta: isize) {
        let rows = self.row_count();
        if rows == 0 {
            return;
        }
        let last = rows - 1;
        let target = if delta.is_negative() {
            self.cursor.saturating_sub(delta.unsigned_abs())
        } else {
            self.cursor.saturating_add(delta as usize)
        };
        self.cursor = target.min(last);
    }

    pub fn set_cursor(&mut self, index: usize) {
        self.cursor = index.min(self.row_count().saturating_sub(1));
    }

    pub fn go_top(&mut self) {
        self.set_cursor(0);
    }

    pub fn go_bottom(&mut self) {
        self.set_cursor(usize::MAX);
    }

    /// 이름으로 커서 이동. 찾으면 true.
    pub fn focus_name(&mut self, name: &str) -> bool {
        match self.entries.iter().position(|e| e.name == name) {
            Some(index) => {
                self.cursor = index + self.parent_rows();
                true
            }
            None => false,
        }
    }

    /// 엔트리 인덱스 기준 마크 토글
    pub fn toggle_mark(&mut self, index: usize) {
        let Some(entry) = self.entries.get(index) else {
            return;
        };
        if !self.marks.remove(&entry.name) {
            self.marks.insert(entry.name.clone());
        }
    }

    pub fn mark_all<F>(&mut self, predicate: F)
    where
        F: Fn(&Entry) -> bool,
    {
        for entry in self.entries.iter().filter(|e| predicate(e)) {
            self.marks.insert(entry.name.clone());
        }
    }

    pub fn clear_marks(&mut self) {
        self.marks.clear();
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.entries
            .get(index)
            .is_some_and(|e| self.marks.contains(&e.name))
    }

    pub fn marked_count(&self) -> usize {
        self.marks.len()
    }

    pub fn marked_size(&self) -> u64 {
        self.entries
            .iter()
            .filter(|e| self.marks.contains(&e.name))
            .map(|e| e.size)
            .sum()
    }

    /// 작업 대상 경로
    ///
    /// 마크가 있으면 마크된 엔트리(목록 순서), 없으면 커서 아래 엔트리 하나.
    pub fn selected_paths(&self) -> Vec<PathBuf> {
        if self.marks.is_empty() {
            return self.current().map(|e| e.path.clone()).into_iter().collect();
        }
        self.entries
            .iter()
            .filter(|e| self.marks.contains(&e.name))
            .map(|e| e.path.clone())
            .collect()
    }

    /// 커서가 보이도록 스크롤 오프셋 조정
    pub fn adjust_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + visible_height {
            self.scroll_offset = self.cursor + 1 - visible_height;
        }
        let max_offset = self.row_count().saturating_sub(visible_height);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    pub fn file_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_dir()).count()
    }

    pub fn dir_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_dir()).count()
    }

    /// 파일 크기 합계. 디렉토리 내용은 세지 않는다.
    pub fn total_size(&self) -> u64 {
        self.entries
            .iter()
            .filter(|e| !e.is_dir())
            .map(|e| e.size)
            .sum()
    }
}

fn read_sorted(fs: &dyn FileSystem, path: &Path, show_hidden: bool) -> Result<Vec<Entry>> {
    let mut entries = fs.list_dir(path)?;
    if !show_hidden {
        entries.retain(|e| !e.is_hidden());
    }
    entries.sort_by(compare_entries);
    Ok(entries)
}

/// 디렉토리 먼저, 그다음 대소문자 무시 이름순. 동률은 원래 이름으로 가른다.
pub fn compare_entries(a: &Entry, b: &Entry) -> CmpOrdering {
    b.is_dir()
        .cmp(&a.is_dir())
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}
