use anyhow::{bail, Context};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, IsTerminal, Stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use twincmd::app::App;
use twincmd::system::config::{log_path, themes_dir};
use twincmd::system::{Config, LocalFileSystem, SystemLauncher};
use twincmd::ui::Theme;

type Tui = Terminal<CrosstermBackend<Stdout>>;

const USAGE: &str = "Usage: twincmd [LEFT] [RIGHT]

Opens two directory panels. Both default to the home directory;
RIGHT defaults to LEFT when only one path is given.

Options:
  -h, --help       Show this help
  -V, --version    Show version";

/// 명령행 인자로 정한 두 시작 경로
#[derive(Debug)]
struct StartDirs {
    left: PathBuf,
    right: PathBuf,
}

enum Invocation {
    Run(StartDirs),
    Help,
    Version,
}

fn parse_args(args: &[String]) -> anyhow::Result<Invocation> {
    let mut paths = Vec::new();
    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Invocation::Help),
            "-V" | "--version" => return Ok(Invocation::Version),
            flag if flag.starts_with('-') && flag.len() > 1 => {
                bail!("unknown option: {}\n\n{}", flag, USAGE)
            }
            path => paths.push(PathBuf::from(path)),
        }
    }
    if paths.len() > 2 {
        bail!("too many arguments\n\n{}", USAGE);
    }

    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"));
    let left = match paths.first() {
        Some(path) => start_dir(path)?,
        None => home.clone(),
    };
    let right = match paths.get(1) {
        Some(path) => start_dir(path)?,
        None if paths.is_empty() => home,
        None => left.clone(),
    };
    Ok(Invocation::Run(StartDirs { left, right }))
}

fn start_dir(path: &Path) -> anyhow::Result<PathBuf> {
    let resolved = fs::canonicalize(path)
        .with_context(|| format!("cannot open {}", path.display()))?;
    if !resolved.is_dir() {
        bail!("not a directory: {}", path.display());
    }
    Ok(resolved)
}

/// 로그 파일 설정. 파일을 열 수 없으면 로그 없이 계속한다.
fn init_logging(config: &Config) {
    let Some(path) = log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let directive = config.log_level.as_deref().unwrap_or("twincmd=info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();
}

fn setup_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// 패닉 메시지가 대체 화면에 묻히지 않도록 먼저 터미널을 복구한다
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        default_hook(info);
    }));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let start = match parse_args(&args)? {
        Invocation::Run(start) => start,
        Invocation::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        Invocation::Version => {
            println!("twincmd {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
    };

    if !io::stdout().is_terminal() || !io::stdin().is_terminal() {
        bail!("twincmd needs an interactive terminal");
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("warning: {} (using defaults)", err);
            Config::default()
        }
    };
    init_logging(&config);
    tracing::info!(left = %start.left.display(), right = %start.right.display(), "starting");

    let theme = Theme::by_name(&config.theme, themes_dir().as_deref()).unwrap_or_else(|| {
        tracing::warn!(theme = %config.theme, "unknown theme, using default");
        Theme::default()
    });

    let mut app = App::new(
        Arc::new(LocalFileSystem::new()),
        config,
        theme,
        &start.left,
        &start.right,
        tokio::runtime::Handle::current(),
    )
    .context("failed to read start directories")?;

    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let res = run_app(&mut terminal, &mut app);
    restore_terminal()?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal loop failed");
        return Err(err.into());
    }
    tracing::info!("exiting");
    Ok(())
}

fn run_app(terminal: &mut Tui, app: &mut App) -> io::Result<()> {
    let launcher = SystemLauncher;
    loop {
        app.tick();
        terminal.draw(|f| app.render(f))?;

        // 작업이 돌고 있으면 진행률을 자주 그린다
        let poll_timeout = if app.running_operations() > 0 || app.is_escape_pending() {
            Duration::from_millis(30)
        } else {
            Duration::from_millis(100)
        };

        if event::poll(poll_timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if let Some(request) = app.pending_launch() {
            let pause_after = request.pause_after;
            restore_terminal()?;
            app.run_pending_launch(&launcher);
            if pause_after {
                wait_for_enter()?;
            }
            enable_raw_mode()?;
            execute!(io::stdout(), EnterAlternateScreen)?;
            terminal.clear()?;
        }

        if app.should_quit() {
            break;
        }
    }
    Ok(())
}

fn wait_for_enter() -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "\nPress Enter to continue")?;
    stdout.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}
