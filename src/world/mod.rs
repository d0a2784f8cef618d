// ============================================
// World Module - Модели мира для сохранения
// ============================================
// Камера, граф компонентов, координаты чанков и
// живое состояние симуляции, из которого строится сохранение

mod blocks;
mod chunk_id;
mod camera;
mod components;
mod state;

pub use blocks::{BlockType, AIR, STONE, DIRT, GRASS, WATER};
pub use chunk_id::ChunkId;
pub use camera::{CameraMode, CameraState};
pub use components::{ComponentGraph, Entity};
pub use state::SimulationState;
