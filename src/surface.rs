use std::collections::BTreeMap;

use crate::foundation::core::{Prop, Value};

/// Write access to a scene's named targets.
///
/// A [`crate::Player`] receives the surface by `&mut` on every call and never stores it,
/// so once a player is disposed it has no way left to reach the targets.
pub trait Surface {
    fn has_target(&self, target: &str) -> bool;

    fn read(&self, target: &str, prop: &Prop) -> Option<Value>;

    fn write(&mut self, target: &str, prop: &Prop, value: Value);
}

/// In-memory target tree owned by a scene host.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct SceneTree {
    targets: BTreeMap<String, BTreeMap<Prop, Value>>,
    #[serde(skip)]
    writes: u64,
}

impl SceneTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(
        mut self,
        name: impl Into<String>,
        props: impl IntoIterator<Item = (Prop, Value)>,
    ) -> Self {
        self.insert_target(name, props);
        self
    }

    pub fn insert_target(
        &mut self,
        name: impl Into<String>,
        props: impl IntoIterator<Item = (Prop, Value)>,
    ) {
        self.targets
            .insert(name.into(), props.into_iter().collect());
    }

    pub fn get(&self, target: &str, prop: &Prop) -> Option<&Value> {
        self.targets.get(target)?.get(prop)
    }

    pub fn num(&self, target: &str, prop: &Prop) -> Option<f64> {
        self.get(target, prop)?.as_num()
    }

    pub fn text(&self, target: &str) -> Option<&str> {
        self.get(target, &Prop::Text)?.as_text()
    }

    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of property writes received since creation.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    pub fn snapshot(&self) -> BTreeMap<String, BTreeMap<Prop, Value>> {
        self.targets.clone()
    }
}

impl Surface for SceneTree {
    fn has_target(&self, target: &str) -> bool {
        self.targets.contains_key(target)
    }

    fn read(&self, target: &str, prop: &Prop) -> Option<Value> {
        self.get(target, prop).cloned()
    }

    fn write(&mut self, target: &str, prop: &Prop, value: Value) {
        let Some(props) = self.targets.get_mut(target) else {
            tracing::trace!(target_name = target, %prop, "write to unknown target ignored");
            return;
        };
        self.writes += 1;
        props.insert(prop.clone(), value);
    }
}
