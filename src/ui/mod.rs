// UI Layer
pub mod components;
pub mod layout;
pub mod theme;

// Re-export layout types for convenience
pub use layout::{
    LayoutAreas, LayoutManager, LayoutMode, DUAL_PANEL_MIN_WIDTH, MIN_HEIGHT, MIN_WIDTH,
};

// Re-export components
pub use components::{
    CommandBar, CommandItem, DialogStack, DialogView, Panel, PanelStatus, StatusBar,
    WarningScreen,
};
pub use theme::Theme;
