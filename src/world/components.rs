// ============================================
// Component Graph - Сущности и их компоненты
// ============================================
// Для системы сохранения это непрозрачная полезная нагрузка:
// граф целиком уходит в Components.zcomp

use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};
use serde_json::Value;

/// Одна сущность с именованными компонентами
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Имя компонента -> данные компонента
    #[serde(default)]
    pub components: BTreeMap<String, Value>,
}

/// Все сущности мира
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentGraph {
    next_id: u32,
    entities: BTreeMap<u32, Entity>,
}

impl ComponentGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Создать сущность и вернуть её ID
    pub fn spawn(&mut self, name: impl Into<String>) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.insert(id, Entity {
            name: name.into(),
            ..Entity::default()
        });
        id
    }

    /// Удалить сущность
    pub fn despawn(&mut self, id: u32) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Добавить/заменить компонент. false если сущности нет.
    pub fn insert_component(&mut self, id: u32, component: impl Into<String>, value: Value) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.components.insert(component.into(), value);
                true
            }
            None => false,
        }
    }

    pub fn component(&self, id: u32, component: &str) -> Option<&Value> {
        self.entities.get(&id)?.components.get(component)
    }

    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entities(&self) -> impl Iterator<Item = (u32, &Entity)> {
        self.entities.iter().map(|(&id, e)| (id, e))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ids_not_reused_after_despawn() {
        let mut graph = ComponentGraph::new();
        let a = graph.spawn("dwarf");
        graph.despawn(a);
        let b = graph.spawn("dwarf");
        assert_ne!(a, b);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_insert_component_on_missing_entity() {
        let mut graph = ComponentGraph::new();
        assert!(!graph.insert_component(42, "health", json!(10)));

        let id = graph.spawn("goblin");
        assert!(graph.insert_component(id, "health", json!({ "hp": 7, "max": 10 })));
        assert_eq!(graph.component(id, "health"), Some(&json!({ "hp": 7, "max": 10 })));
    }
}
