//! Latest-value store for facts delivered on the host's fact channel.

use rustc_hash::FxHashMap;

use pl_core::Scalar;

/// Named fact values, overwritten in place by each update.
#[derive(Clone, Debug, Default)]
pub struct FactBase {
    values: FxHashMap<String, Scalar>,
}

impl FactBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `name`.  Returns `true` if the stored value changed.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Scalar>) -> bool {
        let name = name.into();
        let value = value.into();
        if self.values.get(&name) == Some(&value) {
            return false;
        }
        self.values.insert(name, value);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.values.get(name)
    }

    pub fn real(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(Scalar::as_real)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Scalar::as_text)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
