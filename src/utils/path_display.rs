use std::path::Path;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// 이름을 너비에 맞춰 뒤쪽을 `~`로 자른다 (패널 행 표시용)
pub fn truncate_name(name: &str, max_width: usize) -> String {
    if name.width() <= max_width {
        return name.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = take_prefix(name, max_width - 1);
    out.push('~');
    out
}

/// 경로를 너비에 맞춰 축약한다.
/// HOME 아래 경로는 `~`로 시작하고, 넘치면 앞쪽을 `...`으로 생략한다.
pub fn truncate_path(path: &Path, max_width: usize) -> String {
    let display = shorten_home(path);
    if display.width() <= max_width {
        return display;
    }
    if max_width <= ELLIPSIS.len() {
        return take_prefix(&display, max_width);
    }

    let budget = max_width - ELLIPSIS.len();
    let mut tail: Vec<char> = Vec::new();
    let mut width = 0;
    for ch in display.chars().rev() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(1);
        if width + w > budget {
            break;
        }
        tail.push(ch);
        width += w;
    }
    tail.reverse();
    format!("{}{}", ELLIPSIS, tail.into_iter().collect::<String>())
}

fn shorten_home(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if path == home {
            return "~".to_string();
        }
        if let Ok(rest) = path.strip_prefix(&home) {
            return format!("~/{}", rest.display());
        }
    }
    path.display().to_string()
}

fn take_prefix(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(1);
        if width + w > max_width {
            break;
        }
        out.push(ch);
        width += w;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("short.txt", 20), "short.txt");
        assert_eq!(truncate_name("a_very_long_name.txt", 8), "a_very_~");
        assert_eq!(truncate_name("abc", 0), "");
    }

    #[test]
    fn test_truncate_name_wide_chars() {
        let truncated = truncate_name("가나다라마바사", 7);
        assert!(truncated.width() <= 7);
        assert!(truncated.ends_with('~'));
    }

    #[test]
    fn test_truncate_path_keeps_tail() {
        let path = Path::new("/var/lib/some/deeply/nested/directory/tree");
        let truncated = truncate_path(path, 20);
        assert!(truncated.starts_with("..."));
        assert!(truncated.ends_with("tree"));
        assert!(truncated.width() <= 20);
    }

    #[test]
    fn test_truncate_path_short() {
        assert_eq!(truncate_path(Path::new("/tmp"), 20), "/tmp");
    }
}
