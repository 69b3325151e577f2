//! 한 줄 텍스트 편집 버퍼
//!
//! 명령줄과 입력 다이얼로그가 함께 쓴다. 커서는 바이트 인덱스이며
//! 항상 문자 경계에 있다.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    value: String,
    cursor: usize,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 내용을 채우고 커서를 끝에 둔다
    pub fn with_text(text: impl Into<String>) -> Self {
        let value = text.into();
        let cursor = value.len();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// 내용을 꺼내고 비운다
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    pub fn insert_char(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = self.prev_char_start(self.cursor);
        self.value.remove(prev);
        self.cursor = prev;
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.prev_char_start(self.cursor);
    }

    pub fn right(&mut self) {
        if let Some(c) = self.value[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    /// 커서 왼쪽 단어 삭제 (Ctrl+W)
    pub fn delete_prev_word(&mut self) {
        let original = self.cursor;
        let mut pos = original;

        // 구분자를 먼저 건너뛰고 단어 시작까지 간다
        while pos > 0 && self.char_before(pos).is_some_and(is_word_delimiter) {
            pos = self.prev_char_start(pos);
        }
        while pos > 0 && !self.char_before(pos).is_some_and(is_word_delimiter) {
            pos = self.prev_char_start(pos);
        }

        self.value.replace_range(pos..original, "");
        self.cursor = pos;
    }

    /// 편집 키 처리. 처리했으면 true.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('w') if ctrl => self.delete_prev_word(),
            KeyCode::Char('u') if ctrl => self.clear(),
            KeyCode::Char(c)
                if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) && !c.is_control() =>
            {
                self.insert_char(c)
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.left(),
            KeyCode::Right => self.right(),
            KeyCode::Home => self.home(),
            KeyCode::End => self.end(),
            _ => return false,
        }
        true
    }

    /// 폭 `width` 칸에 보일 부분과 그 안의 커서 열
    ///
    /// 커서가 넘치면 커서가 오른쪽 끝에 오도록 앞부분을 잘라낸다.
    pub fn visible(&self, width: usize) -> (&str, usize) {
        let cursor_col = self.value[..self.cursor].width();
        if width == 0 || cursor_col < width {
            return (&self.value, cursor_col);
        }

        let skip = cursor_col + 1 - width;
        let mut skipped = 0;
        for (i, c) in self.value.char_indices() {
            if skipped >= skip {
                return (&self.value[i..], cursor_col - skipped);
            }
            skipped += c.width().unwrap_or(0);
        }
        ("", 0)
    }

    fn prev_char_start(&self, pos: usize) -> usize {
        self.value[..pos]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn char_before(&self, pos: usize) -> Option<char> {
        self.value[..pos].chars().next_back()
    }
}

fn is_word_delimiter(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '/' | '\\' | ':' | ';' | ',' | '.' | '|' | '=')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_backspace_delete_on_char_boundaries() {
        let mut line = LineEditor::with_text("\u{AC00}\u{B098}");
        line.left();
        line.insert_char('\u{B2E4}');
        assert_eq!(line.value(), "\u{AC00}\u{B2E4}\u{B098}");
        assert_eq!(line.cursor(), "\u{AC00}\u{B2E4}".len());

        line.backspace();
        assert_eq!(line.value(), "\u{AC00}\u{B098}");

        line.home();
        line.delete();
        assert_eq!(line.value(), "\u{B098}");
        assert_eq!(line.cursor(), 0);

        line.backspace();
        assert_eq!(line.value(), "\u{B098}");
    }

    #[test]
    fn test_cursor_movement() {
        let mut line = LineEditor::with_text("a\u{AC00}b");
        line.left();
        assert_eq!(line.cursor(), "a\u{AC00}".len());
        line.left();
        line.left();
        line.left();
        assert_eq!(line.cursor(), 0);
        line.right();
        assert_eq!(line.cursor(), 1);
        line.end();
        line.right();
        assert_eq!(line.cursor(), line.value().len());
    }

    #[test]
    fn test_delete_prev_word() {
        let mut line = LineEditor::with_text("cp /tmp/some file/");
        line.delete_prev_word();
        assert_eq!(line.value(), "cp /tmp/some ");
        line.delete_prev_word();
        assert_eq!(line.value(), "cp /tmp/");
    }

    #[test]
    fn test_handle_key() {
        let mut line = LineEditor::new();
        assert!(line.handle_key(&KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE)));
        assert!(line.handle_key(&KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT)));
        assert_eq!(line.value(), "lS");
        assert!(!line.handle_key(&KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)));
        assert!(!line.handle_key(&KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE)));
        assert!(line.handle_key(&KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)));
        assert!(line.is_empty());
    }

    #[test]
    fn test_visible_scrolls_to_cursor() {
        let line = LineEditor::with_text("abcdefghij");
        assert_eq!(line.visible(20), ("abcdefghij", 10));
        assert_eq!(line.visible(5), ("ghij", 4));

        let mut line = line;
        line.home();
        assert_eq!(line.visible(5), ("abcdefghij", 0));
    }

    #[test]
    fn test_take_empties() {
        let mut line = LineEditor::with_text("ls -l");
        assert_eq!(line.take(), "ls -l");
        assert!(line.is_empty());
        assert_eq!(line.cursor(), 0);
    }
}
