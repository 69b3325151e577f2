use crate::utils::error::{Result, TwinError};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "twincmd";
const CONFIG_ENV: &str = "TWINCMD_CONFIG";

/// 사용자 설정 (`config.toml`)
///
/// 모든 필드는 생략 가능하며 없으면 기본값을 쓴다.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub show_hidden: bool,
    pub confirm_copy: bool,
    pub confirm_move: bool,
    pub confirm_delete: bool,
    pub confirm_quit: bool,
    /// 뷰어 명령 (없으면 $PAGER, 그다음 less)
    pub pager: Option<String>,
    /// 편집기 명령 (없으면 $VISUAL, $EDITOR, 그다음 vi)
    pub editor: Option<String>,
    pub theme: String,
    /// tracing 필터 지시어 (예: "twincmd=debug")
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_hidden: true,
            confirm_copy: true,
            confirm_move: true,
            confirm_delete: true,
            confirm_quit: true,
            pager: None,
            editor: None,
            theme: "classic".to_string(),
            log_level: None,
        }
    }
}

impl Config {
    /// 기본 위치에서 설정 로드
    ///
    /// 파일이 없으면 기본값, 파싱 실패는 `Config` 오류로 돌려준다.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(TwinError::from_io(e, path)),
        };
        Self::parse(&content).map_err(|e| TwinError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 뷰어 명령줄 (프로그램, 인자)
    pub fn pager_command(&self) -> Vec<String> {
        let raw = self
            .pager
            .clone()
            .or_else(|| env::var("PAGER").ok())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "less".to_string());
        split_command(&raw, "less")
    }

    pub fn editor_command(&self) -> Vec<String> {
        let raw = self
            .editor
            .clone()
            .or_else(|| env::var("VISUAL").ok())
            .filter(|s| !s.trim().is_empty())
            .or_else(|| env::var("EDITOR").ok())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "vi".to_string());
        split_command(&raw, "vi")
    }
}

/// shlex로 분리하고, 실패하거나 비어 있으면 fallback 하나만 쓴다
fn split_command(raw: &str, fallback: &str) -> Vec<String> {
    match shlex::split(raw) {
        Some(parts) if !parts.is_empty() => parts,
        _ => vec![fallback.to_string()],
    }
}

pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

pub fn themes_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("themes"))
}

/// 로그 파일 위치 (`TWINCMD_LOG`, 없으면 캐시 디렉토리)
pub fn log_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("TWINCMD_LOG") {
        return Some(PathBuf::from(path));
    }
    dirs::cache_dir().map(|dir| dir.join(APP_DIR).join("twincmd.log"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.show_hidden);
        assert!(config.confirm_delete);
        assert_eq!(config.theme, "classic");
    }

    #[test]
    fn test_parse_partial() {
        let config = Config::parse("show_hidden = false\neditor = \"nano -w\"\n").unwrap();
        assert!(!config.show_hidden);
        assert!(config.confirm_copy);
        assert_eq!(config.editor_command(), vec!["nano", "-w"]);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Config::parse("show_hidden = \"maybe\"").is_err());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_bad_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "theme = [").unwrap();
        match Config::load_from(&path) {
            Err(TwinError::Config(msg)) => assert!(msg.contains("config.toml")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_pager_from_config() {
        let config = Config {
            pager: Some("bat --paging=always".to_string()),
            ..Config::default()
        };
        assert_eq!(config.pager_command(), vec!["bat", "--paging=always"]);
    }

    #[test]
    fn test_split_command_fallback() {
        assert_eq!(split_command("\"unterminated", "vi"), vec!["vi"]);
        assert_eq!(split_command("   ", "less"), vec!["less"]);
    }
}
