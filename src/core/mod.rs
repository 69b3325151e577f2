//! 입력 해석, 패널 상태, 파일 작업
pub mod actions;
pub mod command_line;
pub mod engine;
pub mod line_editor;
pub mod panels;

pub use actions::{find_action, Action};
pub use command_line::{CommandLine, CommandLineAction, ShellCommand};
pub use engine::{EngineEvent, OperationEngine, OperationHandle};
pub use line_editor::LineEditor;
pub use panels::{LaunchKind, PanelAction, PanelPair, Side};
