// 반응형 레이아웃
//
// 터미널 크기에 따른 레이아웃 모드:
// - 80+ cols: 듀얼 패널 모드
// - 40-79 cols: 싱글 패널 모드 (활성 패널만 표시)
// - 40 cols 또는 15 rows 미만: 경고 메시지 표시

use crate::core::panels::Side;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 15;
pub const DUAL_PANEL_MIN_WIDTH: u16 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    DualPanel,
    SinglePanel,
    TooSmall,
}

/// 레이아웃 영역
#[derive(Debug, Clone, Default)]
pub struct LayoutAreas {
    /// 상단 제목 줄
    pub title_bar: Rect,
    pub left_panel: Rect,
    pub right_panel: Rect,
    /// `<경로> $ ` 프롬프트 줄
    pub command_line: Rect,
    pub status_bar: Rect,
    /// F키 안내 줄
    pub command_bar: Rect,
    /// TooSmall 모드에서만 사용
    pub warning: Rect,
}

#[derive(Debug)]
pub struct LayoutManager {
    mode: LayoutMode,
    terminal_size: (u16, u16),
    areas: LayoutAreas,
}

impl Default for LayoutManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutManager {
    pub fn new() -> Self {
        Self {
            mode: LayoutMode::DualPanel,
            terminal_size: (80, 24),
            areas: LayoutAreas::default(),
        }
    }

    fn determine_mode(width: u16, height: u16) -> LayoutMode {
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            LayoutMode::TooSmall
        } else if width < DUAL_PANEL_MIN_WIDTH {
            LayoutMode::SinglePanel
        } else {
            LayoutMode::DualPanel
        }
    }

    /// 터미널 크기 업데이트 및 레이아웃 재계산
    pub fn update(&mut self, area: Rect, active: Side) {
        self.terminal_size = (area.width, area.height);
        self.mode = Self::determine_mode(area.width, area.height);
        self.areas = match self.mode {
            LayoutMode::TooSmall => LayoutAreas {
                warning: area,
                ..Default::default()
            },
            LayoutMode::SinglePanel | LayoutMode::DualPanel => self.split(area, active),
        };
    }

    fn split(&self, area: Rect, active: Side) -> LayoutAreas {
        // 제목 | 패널 | 명령줄 | 상태바 | 커맨드바
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        let (left_panel, right_panel) = if self.mode == LayoutMode::DualPanel {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(rows[1]);
            (columns[0], columns[1])
        } else {
            match active {
                Side::Left => (rows[1], Rect::default()),
                Side::Right => (Rect::default(), rows[1]),
            }
        };

        LayoutAreas {
            title_bar: rows[0],
            left_panel,
            right_panel,
            command_line: rows[2],
            status_bar: rows[3],
            command_bar: rows[4],
            warning: Rect::default(),
        }
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn areas(&self) -> &LayoutAreas {
        &self.areas
    }

    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    pub fn is_too_small(&self) -> bool {
        self.mode == LayoutMode::TooSmall
    }

    pub fn panel_area(&self, side: Side) -> Rect {
        match side {
            Side::Left => self.areas.left_panel,
            Side::Right => self.areas.right_panel,
        }
    }

    /// 패널 안에 보이는 항목 행 수 (테두리와 헤더 제외)
    pub fn visible_rows(&self, side: Side) -> usize {
        self.panel_area(side).height.saturating_sub(3) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determine_mode() {
        assert_eq!(LayoutManager::determine_mode(80, 24), LayoutMode::DualPanel);
        assert_eq!(
            LayoutManager::determine_mode(120, 30),
            LayoutMode::DualPanel
        );
        assert_eq!(
            LayoutManager::determine_mode(79, 24),
            LayoutMode::SinglePanel
        );
        assert_eq!(
            LayoutManager::determine_mode(40, 24),
            LayoutMode::SinglePanel
        );
        assert_eq!(LayoutManager::determine_mode(39, 24), LayoutMode::TooSmall);
        assert_eq!(LayoutManager::determine_mode(80, 14), LayoutMode::TooSmall);
    }

    #[test]
    fn test_dual_panel_areas() {
        let mut manager = LayoutManager::new();
        manager.update(Rect::new(0, 0, 100, 30), Side::Left);
        let areas = manager.areas();

        assert_eq!(areas.title_bar.height, 1);
        assert_eq!(areas.left_panel.width + areas.right_panel.width, 100);
        assert_eq!(areas.left_panel.height, 26);
        assert_eq!(areas.command_line.y, 27);
        assert_eq!(areas.command_bar.y, 29);
        assert_eq!(manager.visible_rows(Side::Right), 23);
    }

    #[test]
    fn test_single_panel_shows_active_side() {
        let mut manager = LayoutManager::new();
        manager.update(Rect::new(0, 0, 60, 24), Side::Right);
        assert_eq!(manager.mode(), LayoutMode::SinglePanel);
        assert_eq!(manager.areas().left_panel, Rect::default());
        assert_eq!(manager.areas().right_panel.width, 60);
    }

    #[test]
    fn test_too_small_uses_whole_area() {
        let mut manager = LayoutManager::new();
        manager.update(Rect::new(0, 0, 30, 10), Side::Left);
        assert!(manager.is_too_small());
        assert_eq!(manager.areas().warning, Rect::new(0, 0, 30, 10));
        assert_eq!(manager.visible_rows(Side::Left), 0);
    }
}
