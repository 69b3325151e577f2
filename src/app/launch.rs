use super::*;
use crate::core::command_line::{resolve_dir, ShellCommand};
use crate::core::panels::LaunchKind;
use crate::system::launcher::{shell_command, ProcessLauncher};

impl App {
    // === 외부 프로세스 ===

    /// F3/F4: 뷰어나 편집기로 파일 열기
    pub(super) fn queue_open(&mut self, kind: LaunchKind, path: &Path) {
        let mut command = match kind {
            LaunchKind::View => self.config.pager_command(),
            LaunchKind::Edit => self.config.editor_command(),
        };
        if command.is_empty() {
            return;
        }
        let program = command.remove(0);
        command.push(path.to_string_lossy().into_owned());
        self.pending_launch = Some(LaunchRequest {
            program,
            args: command,
            cwd: self.active_path().to_path_buf(),
            pause_after: false,
        });
    }

    /// 실행 파일에서 Enter
    pub(super) fn queue_execute(&mut self, path: &Path) {
        self.pending_launch = Some(LaunchRequest {
            program: path.to_string_lossy().into_owned(),
            args: Vec::new(),
            cwd: self.active_path().to_path_buf(),
            pause_after: true,
        });
    }

    /// 명령줄 Enter. `cd`는 셸 없이 활성 패널을 옮긴다.
    pub(super) fn run_command(&mut self, command: ShellCommand) {
        match command {
            ShellCommand::ChangeDir(arg) => {
                let home = dirs::home_dir();
                let target = resolve_dir(self.active_path(), arg.as_deref(), home.as_deref());
                let side = self.panels.active_side();
                if let Err(err) = self.panels.navigate(side, &target, None, self.fs.as_ref()) {
                    self.show_error("cd", &err.to_string());
                }
            }
            ShellCommand::Exec(line) => {
                let (program, args) = shell_command(&line);
                self.pending_launch = Some(LaunchRequest {
                    program,
                    args,
                    cwd: self.active_path().to_path_buf(),
                    pause_after: true,
                });
            }
        }
    }

    pub fn pending_launch(&self) -> Option<&LaunchRequest> {
        self.pending_launch.as_ref()
    }

    /// 대기 중인 실행 요청을 수행한다. 터미널 양도는 호출자 책임이다.
    ///
    /// 요청이 없으면 false.
    pub fn run_pending_launch(&mut self, launcher: &dyn ProcessLauncher) -> bool {
        let Some(request) = self.pending_launch.take() else {
            return false;
        };
        let result = launcher.launch(&request.program, &request.args, &request.cwd);
        self.finish_launch(&request, result);
        true
    }

    /// 외부 프로세스 종료 후: 두 패널을 다시 읽고 결과를 보여준다
    fn finish_launch(&mut self, request: &LaunchRequest, result: Result<i32>) {
        self.panels.reload_all(self.fs.as_ref());
        match result {
            Ok(0) if !request.pause_after => self.status = None,
            Ok(code) => self.status = Some(format!("Exit status {}", code)),
            Err(err) => {
                tracing::warn!(program = %request.program, error = %err, "launch failed");
                self.show_error("Launch failed", &err.to_string());
            }
        }
    }
}
