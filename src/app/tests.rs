use super::*;
use crate::system::{LocalFileSystem, ProcessLauncher};
use crate::ui::components::{buffer_text, DialogKind};
use crate::utils::error::TwinError;
use ratatui::{backend::TestBackend, Terminal};
use std::cell::RefCell;
use std::fs;
use tempfile::TempDir;

struct Fixture {
    _temp: TempDir,
    src: PathBuf,
    dst: PathBuf,
}

fn fixture() -> Fixture {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    let dst = temp.path().join("dst");
    fs::create_dir(&src).unwrap();
    fs::create_dir(&dst).unwrap();
    fs::write(src.join("a.txt"), "alpha").unwrap();
    fs::write(src.join("b.txt"), "beta").unwrap();
    Fixture {
        _temp: temp,
        src,
        dst,
    }
}

fn make_app(fx: &Fixture, config: Config) -> App {
    App::new(
        Arc::new(LocalFileSystem),
        config,
        Theme::default(),
        &fx.src,
        &fx.dst,
        Handle::current(),
    )
    .unwrap()
}

fn press(app: &mut App, code: KeyCode) {
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

/// ".." 행에서 첫 엔트리로 내려간다
fn step_past_parent(app: &mut App) {
    assert!(app.panels.active().is_parent_row());
    press(app, KeyCode::Down);
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

fn names(app: &App, side: Side) -> Vec<String> {
    app.panels
        .panel(side)
        .entries()
        .iter()
        .map(|e| e.name.clone())
        .collect()
}

/// 엔진 이벤트를 수거하면서 조건을 기다린다
async fn wait_until<F>(app: &mut App, cond: F)
where
    F: Fn(&App) -> bool,
{
    for _ in 0..500 {
        app.drain_events();
        if cond(app) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached");
}

fn finished_with(prefix: &'static str) -> impl Fn(&App) -> bool {
    move |app: &App| app.status().is_some_and(|s| s.starts_with(prefix))
}

/// 호출을 기록하고 정해진 결과를 돌려주는 실행기
struct RecordingLauncher {
    calls: RefCell<Vec<(String, Vec<String>, PathBuf)>>,
    exit_code: Option<i32>,
}

impl RecordingLauncher {
    fn exiting(code: i32) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            exit_code: Some(code),
        }
    }

    fn failing() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            exit_code: None,
        }
    }
}

impl ProcessLauncher for RecordingLauncher {
    fn launch(&self, program: &str, args: &[String], cwd: &Path) -> Result<i32> {
        self.calls
            .borrow_mut()
            .push((program.to_string(), args.to_vec(), cwd.to_path_buf()));
        self.exit_code.ok_or_else(|| TwinError::Launch {
            command: program.to_string(),
            reason: "not found".to_string(),
        })
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_copy_with_confirmation_refreshes_destination_panel() {
    let fx = fixture();
    let mut app = make_app(&fx, Config::default());
    step_past_parent(&mut app);

    press(&mut app, KeyCode::F(5));
    let top = app.dialogs.top().unwrap();
    assert_eq!(top.kind, DialogKind::Confirm);
    assert_eq!(top.title, "Copy");

    press(&mut app, KeyCode::Char('y'));
    assert_eq!(app.dialogs.top().unwrap().kind, DialogKind::Progress);

    wait_until(&mut app, finished_with("Copy completed")).await;
    assert!(app.dialogs.is_empty());
    assert_eq!(fs::read_to_string(fx.dst.join("a.txt")).unwrap(), "alpha");
    assert_eq!(names(&app, Side::Right), vec!["a.txt"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_declined_confirmation_submits_nothing() {
    let fx = fixture();
    let mut app = make_app(&fx, Config::default());
    step_past_parent(&mut app);

    press(&mut app, KeyCode::F(5));
    press(&mut app, KeyCode::Char('n'));
    assert!(app.dialogs.is_empty());
    assert_eq!(app.running_operations(), 0);
    assert!(!fx.dst.join("a.txt").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_conflict_prompt_overwrite() {
    let fx = fixture();
    fs::write(fx.dst.join("a.txt"), "old").unwrap();
    let config = Config {
        confirm_copy: false,
        ..Config::default()
    };
    let mut app = make_app(&fx, config);
    step_past_parent(&mut app);

    press(&mut app, KeyCode::F(5));
    wait_until(&mut app, |app| {
        app.dialogs.top().is_some_and(|d| d.title == "File exists")
    })
    .await;

    press(&mut app, KeyCode::Char('o'));
    assert_eq!(app.dialogs.top().unwrap().title, "File exists");
    press(&mut app, KeyCode::Enter);
    wait_until(&mut app, finished_with("Copy completed")).await;
    assert_eq!(fs::read_to_string(fx.dst.join("a.txt")).unwrap(), "alpha");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_marked_files_refreshes_source_only() {
    let fx = fixture();
    let mut app = make_app(&fx, Config::default());
    step_past_parent(&mut app);

    press(&mut app, KeyCode::Insert);
    press(&mut app, KeyCode::Insert);
    assert_eq!(app.panels.active().marked_count(), 2);

    press(&mut app, KeyCode::F(8));
    press(&mut app, KeyCode::Enter);
    wait_until(&mut app, finished_with("Delete completed")).await;

    assert!(names(&app, Side::Left).is_empty());
    assert!(!fx.src.join("a.txt").exists());
    assert!(!fx.src.join("b.txt").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_parent_row_ascends_and_blocks_operations() {
    let fx = fixture();
    let mut app = make_app(&fx, Config::default());

    press(&mut app, KeyCode::F(5));
    press(&mut app, KeyCode::F(8));
    assert!(app.dialogs.is_empty());
    assert_eq!(app.running_operations(), 0);

    press(&mut app, KeyCode::Enter);
    let parent = fx.src.parent().unwrap();
    assert_eq!(app.active_path(), parent);
    assert_eq!(app.panels.active().current().unwrap().name, "src");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_mkdir_through_input_dialog() {
    let fx = fixture();
    let mut app = make_app(&fx, Config::default());

    press(&mut app, KeyCode::F(7));
    assert_eq!(app.dialogs.top().unwrap().kind, DialogKind::Input);
    type_text(&mut app, "newdir");
    press(&mut app, KeyCode::Enter);

    wait_until(&mut app, finished_with("Mkdir completed")).await;
    assert!(fx.src.join("newdir").is_dir());
    assert_eq!(names(&app, Side::Left)[0], "newdir");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_mkdir_rejects_path_separator() {
    let fx = fixture();
    let mut app = make_app(&fx, Config::default());

    press(&mut app, KeyCode::F(7));
    type_text(&mut app, "a/b");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.dialogs.top().unwrap().kind, DialogKind::ErrorReport);
    assert_eq!(app.running_operations(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_escape_digit_acts_as_function_key() {
    let fx = fixture();
    let mut app = make_app(&fx, Config::default());
    step_past_parent(&mut app);

    press(&mut app, KeyCode::Esc);
    assert!(app.is_escape_pending());
    press(&mut app, KeyCode::Char('5'));
    assert_eq!(app.dialogs.top().unwrap().title, "Copy");
    assert!(app.command_line.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_escape_types_digit() {
    let fx = fixture();
    let mut app = make_app(&fx, Config::default());

    app.pending_escape = Instant::now().checked_sub(Duration::from_secs(1));
    press(&mut app, KeyCode::Char('5'));
    assert!(app.dialogs.is_empty());
    assert_eq!(app.command_line.editor().value(), "5");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_command_line_cd_navigates_active_panel() {
    let fx = fixture();
    let mut app = make_app(&fx, Config::default());

    type_text(&mut app, "cd ../dst");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.active_path(), fx.dst.as_path());
    assert!(app.pending_launch().is_none());

    type_text(&mut app, "cd missing");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.dialogs.top().unwrap().kind, DialogKind::ErrorReport);
    assert_eq!(app.active_path(), fx.dst.as_path());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_command_line_runs_shell_and_reports_status() {
    let fx = fixture();
    let mut app = make_app(&fx, Config::default());

    type_text(&mut app, "make test");
    press(&mut app, KeyCode::Enter);
    let request = app.pending_launch().cloned().unwrap();
    assert_eq!(request.args, vec!["-c", "make test"]);
    assert_eq!(request.cwd, fx.src);
    assert!(request.pause_after);

    // 셸이 만든 파일은 복귀 후 다시 읽을 때 보인다
    fs::write(fx.src.join("made.txt"), "").unwrap();
    let launcher = RecordingLauncher::exiting(3);
    assert!(app.run_pending_launch(&launcher));
    assert!(!app.run_pending_launch(&launcher));

    assert_eq!(launcher.calls.borrow().len(), 1);
    assert_eq!(app.status(), Some("Exit status 3"));
    assert!(names(&app, Side::Left).contains(&"made.txt".to_string()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_view_uses_configured_pager() {
    let fx = fixture();
    let config = Config {
        pager: Some("mypager -R".to_string()),
        ..Config::default()
    };
    let mut app = make_app(&fx, config);
    step_past_parent(&mut app);

    press(&mut app, KeyCode::F(3));
    let request = app.pending_launch().cloned().unwrap();
    assert_eq!(request.program, "mypager");
    assert_eq!(
        request.args,
        vec!["-R".to_string(), fx.src.join("a.txt").to_string_lossy().into_owned()]
    );
    assert!(!request.pause_after);

    let launcher = RecordingLauncher::exiting(0);
    app.run_pending_launch(&launcher);
    assert_eq!(app.status(), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_launch_failure_shows_error() {
    let fx = fixture();
    let mut app = make_app(&fx, Config::default());
    step_past_parent(&mut app);

    press(&mut app, KeyCode::F(4));
    app.run_pending_launch(&RecordingLauncher::failing());
    let top = app.dialogs.top().unwrap();
    assert_eq!(top.kind, DialogKind::ErrorReport);
    assert!(top.message.contains("not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_quit_confirmation() {
    let fx = fixture();
    let mut app = make_app(&fx, Config::default());

    press(&mut app, KeyCode::F(10));
    assert_eq!(app.dialogs.top().unwrap().title, "Quit");
    press(&mut app, KeyCode::Esc);
    assert!(!app.should_quit());

    press(&mut app, KeyCode::F(10));
    press(&mut app, KeyCode::Char('y'));
    assert!(app.should_quit());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_quit_without_confirmation() {
    let fx = fixture();
    let config = Config {
        confirm_quit: false,
        ..Config::default()
    };
    let mut app = make_app(&fx, config);
    press(&mut app, KeyCode::F(10));
    assert!(app.should_quit());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_help_dialog() {
    let fx = fixture();
    let mut app = make_app(&fx, Config::default());

    press(&mut app, KeyCode::F(1));
    let top = app.dialogs.top().unwrap();
    assert_eq!(top.kind, DialogKind::Info);
    assert!(top.message.contains("Copy to other panel"));

    press(&mut app, KeyCode::Enter);
    assert!(app.dialogs.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_render_main_screen() {
    let fx = fixture();
    let mut app = make_app(&fx, Config::default());
    type_text(&mut app, "ls");

    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|f| app.render(f)).unwrap();
    let text = buffer_text(terminal.backend().buffer());

    assert!(text.contains(" twincmd"));
    assert!(text.contains("a.txt"));
    assert!(text.contains("$ ls"));
    assert!(text.contains("F5 Copy"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_render_too_small() {
    let fx = fixture();
    let mut app = make_app(&fx, Config::default());

    let mut terminal = Terminal::new(TestBackend::new(30, 10)).unwrap();
    terminal.draw(|f| app.render(f)).unwrap();
    let text = buffer_text(terminal.backend().buffer());
    assert!(text.contains("Terminal too small"));
}
