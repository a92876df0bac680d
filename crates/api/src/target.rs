//! Target specification for commands.
//!
//! Commands need to specify which layout items they operate on.
//! Targets resolve against the current selection, explicit ids, or whole
//! collections.

use canvas::SceneStore;
use scene::ItemId;
use serde::{Deserialize, Serialize};

/// Specifies which items a command targets.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// The current selection (most common for user actions).
    #[default]
    Selection,

    /// A specific item by id.
    Item(ItemId),

    /// Multiple specific items by id.
    Items(Vec<ItemId>),

    /// Every module.
    Modules,

    /// Every roof.
    Roofs,

    /// Every module and roof.
    All,
}

impl From<ItemId> for Target {
    fn from(id: ItemId) -> Self {
        Self::Item(id)
    }
}

impl From<Vec<ItemId>> for Target {
    fn from(ids: Vec<ItemId>) -> Self {
        Self::Items(ids)
    }
}

impl Target {
    /// Resolve to the ids of existing items, roofs before modules. Ids that
    /// name nothing in the layout are dropped.
    pub fn resolve(&self, store: &SceneStore) -> Vec<ItemId> {
        let layout = store.layout();
        match self {
            Target::Selection => store.selected_ids(),
            Target::Item(id) => {
                if layout.contains(id) {
                    vec![id.clone()]
                } else {
                    Vec::new()
                }
            }
            Target::Items(ids) => {
                let mut resolved: Vec<ItemId> = Vec::new();
                for id in ids {
                    if layout.contains(id) && !resolved.contains(id) {
                        resolved.push(id.clone());
                    }
                }
                resolved
            }
            Target::Modules => layout.modules.iter().map(|m| m.id.clone()).collect(),
            Target::Roofs => layout.roofs.iter().map(|r| r.id.clone()).collect(),
            Target::All => layout
                .roofs
                .iter()
                .map(|r| r.id.clone())
                .chain(layout.modules.iter().map(|m| m.id.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas::EditorConfig;
    use scene::{CanvasPoint, CanvasSize, Module, Roof, RoofKind};

    fn store() -> (SceneStore, ItemId, ItemId) {
        let mut store = SceneStore::new(EditorConfig::default());
        let module = Module::new(CanvasPoint::new(0.0, 0.0), CanvasSize::new(40.0, 60.0));
        let roof = Roof::from_template(RoofKind::Flat, CanvasPoint::new(0.0, 0.0));
        let (module_id, roof_id) = (module.id.clone(), roof.id.clone());
        store.add_module(module);
        store.add_roof(roof);
        (store, module_id, roof_id)
    }

    #[test]
    fn all_lists_roofs_first() {
        let (store, module_id, roof_id) = store();
        assert_eq!(Target::All.resolve(&store), vec![roof_id, module_id]);
    }

    #[test]
    fn unknown_ids_are_dropped() {
        let (store, module_id, _) = store();
        let target = Target::Items(vec![ItemId::from("ghost"), module_id.clone(), module_id.clone()]);
        assert_eq!(target.resolve(&store), vec![module_id]);
        assert!(Target::Item(ItemId::from("ghost")).resolve(&store).is_empty());
    }

    #[test]
    fn serializes_as_snake_case() {
        assert_eq!(serde_json::to_value(Target::Selection).unwrap(), "selection");
        let target: Target = serde_json::from_str(r#"{"item": "m-1"}"#).unwrap();
        assert_eq!(target, Target::Item(ItemId::from("m-1")));
    }
}
