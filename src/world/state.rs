// ============================================
// Simulation State - Живое состояние мира
// ============================================
// То, из чего собирается сохранение и во что оно восстанавливается:
// параметры мира, камера, компоненты и плотные массивы вокселей чанков

use std::collections::HashMap;

use ultraviolet::Vec2;

use crate::core::{MAX_CHUNK_HEIGHT, MAX_CHUNK_WIDTH};
use super::blocks::{BlockType, AIR, DIRT, GRASS, STONE};
use super::camera::CameraState;
use super::chunk_id::ChunkId;
use super::components::ComponentGraph;

/// Состояние симуляции
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub world_origin: Vec2,
    pub world_scale: f32,
    /// Время суток (0.0..1.0)
    pub time_of_day: f32,
    pub camera: CameraState,
    pub components: ComponentGraph,

    chunk_width: u32,
    chunk_height: u32,
    /// Воксели чанков: индекс = y * w * w + z * w + x
    chunks: HashMap<ChunkId, Vec<BlockType>>,
    /// Версия изменений (инкрементируется при каждом изменении)
    version: u64,
}

impl SimulationState {
    /// Размеры чанка зажимаются в 1..=MAX_CHUNK_*
    pub fn new(chunk_width: u32, chunk_height: u32) -> Self {
        Self {
            world_origin: Vec2::zero(),
            world_scale: 1.0,
            time_of_day: 0.5,
            camera: CameraState::default(),
            components: ComponentGraph::new(),
            chunk_width: chunk_width.clamp(1, MAX_CHUNK_WIDTH),
            chunk_height: chunk_height.clamp(1, MAX_CHUNK_HEIGHT),
            chunks: HashMap::new(),
            version: 0,
        }
    }

    /// Плоский мир: квадрат (2r+1)x(2r+1) чанков, камень под землёй, трава сверху
    pub fn flat(chunk_width: u32, chunk_height: u32, radius: i32, ground_level: i32) -> Self {
        let mut state = Self::new(chunk_width, chunk_height);
        let w = state.chunk_width as i32;
        let top = ground_level.clamp(0, state.chunk_height as i32 - 1);

        for cz in -radius..=radius {
            for cx in -radius..=radius {
                for z in cz * w..(cz + 1) * w {
                    for x in cx * w..(cx + 1) * w {
                        for y in 0..=top {
                            let block = if y == top { GRASS } else if y + 3 > top { DIRT } else { STONE };
                            state.set_block(x, y, z, block);
                        }
                    }
                }
            }
        }
        state
    }

    pub fn chunk_width(&self) -> u32 {
        self.chunk_width
    }

    pub fn chunk_height(&self) -> u32 {
        self.chunk_height
    }

    /// Объём одного чанка в вокселях
    pub fn chunk_volume(&self) -> usize {
        self.chunk_width as usize * self.chunk_width as usize * self.chunk_height as usize
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Установить блок в мировых координатах
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockType) {
        let id = ChunkId::containing(x, y, z, self.chunk_width, self.chunk_height);
        let index = self.local_index(x, y, z);
        let volume = self.chunk_volume();

        let voxels = self.chunks.entry(id).or_insert_with(|| vec![AIR; volume]);
        voxels[index] = block;
        self.version += 1;
    }

    /// Получить блок (Air если чанка нет)
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockType {
        let id = ChunkId::containing(x, y, z, self.chunk_width, self.chunk_height);
        self.chunks
            .get(&id)
            .map(|voxels| voxels[self.local_index(x, y, z)])
            .unwrap_or(AIR)
    }

    /// Заменить воксели чанка целиком. false если размер не совпадает.
    pub fn insert_chunk(&mut self, id: ChunkId, voxels: Vec<BlockType>) -> bool {
        if voxels.len() != self.chunk_volume() {
            return false;
        }
        self.chunks.insert(id, voxels);
        self.version += 1;
        true
    }

    pub fn chunk(&self, id: ChunkId) -> Option<&[BlockType]> {
        self.chunks.get(&id).map(|v| v.as_slice())
    }

    pub fn chunks(&self) -> impl Iterator<Item = (ChunkId, &[BlockType])> {
        self.chunks.iter().map(|(&id, v)| (id, v.as_slice()))
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    fn local_index(&self, x: i32, y: i32, z: i32) -> usize {
        let w = self.chunk_width as i32;
        let h = self.chunk_height as i32;
        let lx = x.rem_euclid(w) as usize;
        let ly = y.rem_euclid(h) as usize;
        let lz = z.rem_euclid(w) as usize;
        let w = w as usize;
        ly * w * w + lz * w + lx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_block_allocates_chunk() {
        let mut state = SimulationState::new(16, 128);
        state.set_block(-1, 64, 3, STONE);

        assert_eq!(state.chunk_count(), 1);
        assert_eq!(state.get_block(-1, 64, 3), STONE);
        assert_eq!(state.get_block(-2, 64, 3), AIR);
        assert!(state.chunk(ChunkId::new(-1, 0, 0)).is_some());
    }

    #[test]
    fn test_flat_world_layers() {
        let state = SimulationState::flat(8, 32, 1, 10);
        assert_eq!(state.chunk_count(), 9);
        assert_eq!(state.get_block(-8, 10, 15), GRASS);
        assert_eq!(state.get_block(0, 8, 0), DIRT);
        assert_eq!(state.get_block(0, 0, 0), STONE);
        assert_eq!(state.get_block(0, 11, 0), AIR);
    }

    #[test]
    fn test_dimensions_clamped() {
        let state = SimulationState::new(70_000, 0);
        assert_eq!(state.chunk_width(), MAX_CHUNK_WIDTH);
        assert_eq!(state.chunk_height(), 1);
        assert_eq!(state.chunk_volume(), 256 * 256);
    }

    #[test]
    fn test_insert_chunk_checks_volume() {
        let mut state = SimulationState::new(4, 8);
        assert!(!state.insert_chunk(ChunkId::new(0, 0, 0), vec![AIR; 10]));
        assert!(state.insert_chunk(ChunkId::new(0, 0, 0), vec![AIR; 4 * 4 * 8]));
    }
}
