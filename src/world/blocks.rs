// ============================================
// Block Types - Числовые ID вокселей
// ============================================
// BlockType = u8 (numeric_id). Кодек чанков хранит только ID.

/// BlockType - просто numeric_id блока
pub type BlockType = u8;

pub const AIR: BlockType = 0;
pub const STONE: BlockType = 1;
pub const DIRT: BlockType = 2;
pub const GRASS: BlockType = 3;
pub const WATER: BlockType = 50;
