// ============================================
// Block Palette - Словарь ID вокселей секции
// ============================================
// Секция чанка хранит не сами u8 ID, а номера в этом словаре:
// при 2-16 разных блоках на номер уходит 1-4 бита.
// В файл пишется только список ID, обратная таблица строится после чтения.

use std::collections::HashMap;

use serde::{Serialize, Deserialize};

use crate::world::BlockType;

/// Словарь ID одной секции: номер в списке -> numeric_id блока
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockPalette {
    /// ID блоков в порядке первого появления в секции
    blocks: Vec<BlockType>,
    /// numeric_id -> номер в словаре, не сериализуется
    #[serde(skip)]
    reverse_map: HashMap<BlockType, u16>,
}

impl BlockPalette {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            reverse_map: HashMap::new(),
        }
    }

    /// Номер блока в словаре, новый ID дописывается в конец
    pub fn get_or_insert(&mut self, block: BlockType) -> u16 {
        if let Some(&idx) = self.reverse_map.get(&block) {
            return idx;
        }

        let idx = self.blocks.len() as u16;
        self.blocks.push(block);
        self.reverse_map.insert(block, idx);
        idx
    }

    /// ID блока по номеру (None для номера за концом словаря)
    pub fn get(&self, index: u16) -> Option<BlockType> {
        self.blocks.get(index as usize).copied()
    }

    /// Сколько разных ID встретилось в секции
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Заново построить обратную таблицу после чтения из файла
    pub fn rebuild_reverse_map(&mut self) {
        self.reverse_map.clear();
        for (idx, &block) in self.blocks.iter().enumerate() {
            self.reverse_map.insert(block, idx as u16);
        }
    }

    /// Ширина упакованного номера в битах: 1, 2, 4 или 8
    pub fn bits_per_index(&self) -> u8 {
        let len = self.blocks.len();
        if len <= 2 { 1 }
        else if len <= 4 { 2 }
        else if len <= 16 { 4 }
        else { 8 }
    }
}

impl Default for BlockPalette {
    fn default() -> Self {
        Self::new()
    }
}

// reverse_map - производное от blocks, сравниваем только список
impl PartialEq for BlockPalette {
    fn eq(&self, other: &Self) -> bool {
        self.blocks == other.blocks
    }
}
