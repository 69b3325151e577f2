// UI Components
pub mod command_bar;
pub mod dialog;
pub mod panel;
pub mod status_bar;
pub mod warning;

// Re-export components for convenience
pub use command_bar::{CommandBar, CommandItem};
pub use dialog::{DialogKind, DialogNode, DialogOutcome, DialogStack, DialogView, RouteResult};
pub use panel::{Panel, PanelStatus};
pub use status_bar::StatusBar;
pub use warning::WarningScreen;

/// 버퍼 내용을 줄 단위 문자열로 (렌더링 테스트용)
#[cfg(test)]
pub(crate) fn buffer_text(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            out.push_str(buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "));
        }
        out.push('\n');
    }
    out
}
