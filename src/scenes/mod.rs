//! The product mockup scenes shipped with the crate, as plain configuration data.

mod budget;
mod calendar;
mod magic_layout;

use std::collections::BTreeMap;

use crate::{
    foundation::core::{Prop, Value},
    model::{PropMap, SceneDef},
};

pub use budget::budget;
pub use calendar::calendar;
pub use magic_layout::magic_layout;

/// Names accepted by [`by_name`], in presentation order.
pub const NAMES: [&str; 3] = ["budget", "calendar", "magic-layout"];

pub fn all() -> Vec<SceneDef> {
    vec![budget(), calendar(), magic_layout()]
}

pub fn by_name(name: &str) -> Option<SceneDef> {
    match name {
        "budget" => Some(budget()),
        "calendar" => Some(calendar()),
        "magic-layout" | "magic_layout" => Some(magic_layout()),
        _ => None,
    }
}

/// `prefix0`, `prefix1`, ... for the given indices.
pub(crate) fn numbered(prefix: &str, indices: impl IntoIterator<Item = usize>) -> Vec<String> {
    indices.into_iter().map(|i| format!("{prefix}{i}")).collect()
}

/// Accumulates scene targets with their mount-time values.
#[derive(Default)]
pub(crate) struct Targets(BTreeMap<String, PropMap>);

impl Targets {
    pub(crate) fn add<V: Into<Value> + Clone>(
        mut self,
        names: &[String],
        props: &[(Prop, V)],
    ) -> Self {
        for name in names {
            let entry = self.0.entry(name.clone()).or_default();
            for (prop, value) in props {
                entry.insert(prop.clone(), value.clone().into());
            }
        }
        self
    }

    pub(crate) fn one<V: Into<Value> + Clone>(self, name: &str, props: &[(Prop, V)]) -> Self {
        self.add(&[name.to_string()], props)
    }

    pub(crate) fn text(self, name: &str, text: &str) -> Self {
        self.one(name, &[(Prop::Text, text)])
    }

    pub(crate) fn into_map(self) -> BTreeMap<String, PropMap> {
        self.0
    }
}
