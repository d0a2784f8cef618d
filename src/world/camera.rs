// ============================================
// Camera State - Поза камеры для сохранения
// ============================================
// Сохраняется как есть в Camera.json (без сжатия).
// Математика рендера тут не нужна, только поза и параметры проекции.

use serde::{Serialize, Deserialize};
use ultraviolet::{Mat4, Vec3};

/// Режим камеры
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraMode {
    /// Камера в глазах игрока
    FirstPerson,
    /// Камера сзади игрока
    ThirdPersonBack,
    /// Камера спереди (смотрит в лицо)
    ThirdPersonFront,
    /// Свободная орбита вокруг цели
    Orbit,
}

impl CameraMode {
    /// Переключить на следующий режим
    pub fn next(self) -> Self {
        match self {
            CameraMode::FirstPerson => CameraMode::ThirdPersonBack,
            CameraMode::ThirdPersonBack => CameraMode::ThirdPersonFront,
            CameraMode::ThirdPersonFront => CameraMode::Orbit,
            CameraMode::Orbit => CameraMode::FirstPerson,
        }
    }
}

/// Сохраняемое состояние камеры
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    /// Позиция камеры
    pub position: [f32; 3],
    /// Точка, на которую смотрит камера
    pub target: [f32; 3],
    /// Режим камеры
    pub mode: CameraMode,
    /// Дистанция от цели в режимах 3-го лица
    pub third_person_distance: f32,
    /// Параметры проекции
    pub aspect: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl CameraState {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: [0.0, 50.0, 0.0],
            target: [0.0, 50.0, 1.0],
            mode: CameraMode::FirstPerson,
            third_person_distance: 5.0,
            aspect,
            fov: 70.0_f32.to_radians(),
            near: 0.1,
            far: 2000.0,
        }
    }

    /// Установить позу камеры
    pub fn look_at(&mut self, position: Vec3, target: Vec3) {
        self.position = position.into();
        self.target = target.into();
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    pub fn target(&self) -> Vec3 {
        Vec3::from(self.target)
    }

    /// Направление взгляда (единичный вектор)
    pub fn forward(&self) -> Vec3 {
        let dir = self.target() - self.position();
        if dir.mag_sq() <= f32::EPSILON {
            Vec3::unit_z()
        } else {
            dir.normalized()
        }
    }

    /// View-матрица для восстановления камеры рендера
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position(), self.position() + self.forward(), Vec3::unit_y())
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}
