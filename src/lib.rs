//! twincmd: 두 디렉토리를 나란히 보여주는 터미널 파일 관리자

pub mod app;
pub mod core;
pub mod models;
pub mod system;
pub mod ui;
pub mod utils;
