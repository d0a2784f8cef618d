// ============================================
// Voxel Save - Сохранение и загрузка мира
// ============================================
// Составной формат сохранения: директория с метаданными,
// камерой, компонентами, чанками и скриншотом

pub mod core;
pub mod world;
pub mod save;
pub mod systems;

pub use save::{GameData, GameFile, SaveError};
