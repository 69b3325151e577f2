use crate::utils::error::{Result, TwinError};
use std::env;
use std::path::Path;
use std::process::Command;

/// 외부 프로세스 실행 협력자
///
/// 호출자는 실행 동안 터미널을 넘겨주고, 종료 후 화면을 복구한다.
pub trait ProcessLauncher {
    /// 프로그램을 `cwd`에서 실행하고 종료 코드를 돌려준다.
    /// 시그널로 종료되면 -1.
    fn launch(&self, program: &str, args: &[String], cwd: &Path) -> Result<i32>;
}

/// 현재 터미널을 상속해 자식 프로세스를 실행한다
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, program: &str, args: &[String], cwd: &Path) -> Result<i32> {
        tracing::info!(program, ?args, cwd = %cwd.display(), "launching process");
        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .status()
            .map_err(|e| TwinError::Launch {
                command: program.to_string(),
                reason: e.to_string(),
            })?;
        Ok(status.code().unwrap_or(-1))
    }
}

/// 명령줄 입력을 사용자 셸로 실행하기 위한 (프로그램, 인자)
pub fn shell_command(command: &str) -> (String, Vec<String>) {
    let shell = env::var("SHELL")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "/bin/sh".to_string());
    (shell, vec!["-c".to_string(), command.to_string()])
}
