// ============================================
// Systems - Системы поверх формата сохранения
// ============================================

mod save_system;

pub use save_system::{BackgroundLoad, SaveSystem};
