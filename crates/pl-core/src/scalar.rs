//! Predicate parameters and fact values.
//!
//! A [`Scalar`] is either a real number or a piece of text.  [`Parameters`]
//! keeps them in a `BTreeMap`, so the map is ordered and queryable at every
//! point of its life: there is no "insert, then sort before lookup" phase.

use std::collections::BTreeMap;
use std::fmt;

use crate::{PlanError, PlanResult};

// ── Scalar ────────────────────────────────────────────────────────────────────

/// A typed parameter or fact value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Scalar {
    Real(f64),
    Text(String),
}

impl Scalar {
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Scalar::Real(v) => Some(*v),
            Scalar::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            Scalar::Real(_) => None,
        }
    }

    /// `"real"` or `"text"`, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Real(_) => "real",
            Scalar::Text(_) => "text",
        }
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Real(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Real(v as f64)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Real(v) => write!(f, "{v}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

// ── Parameters ────────────────────────────────────────────────────────────────

/// Named, typed parameters attached to a predicate at registration.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Parameters(BTreeMap<String, Scalar>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace `name`, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Option<Scalar> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Scalar> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// The real-valued parameter `name`.
    ///
    /// Fails with [`PlanError::InvalidParameter`] if it is missing or text.
    pub fn real(&self, name: &str) -> PlanResult<f64> {
        match self.0.get(name) {
            Some(Scalar::Real(v)) => Ok(*v),
            Some(other) => Err(PlanError::InvalidParameter {
                name:   name.to_owned(),
                reason: format!("expected real, found {}", other.kind()),
            }),
            None => Err(PlanError::InvalidParameter {
                name:   name.to_owned(),
                reason: "missing".to_owned(),
            }),
        }
    }

    /// The text parameter `name`.
    pub fn text(&self, name: &str) -> PlanResult<&str> {
        match self.0.get(name) {
            Some(Scalar::Text(s)) => Ok(s),
            Some(other) => Err(PlanError::InvalidParameter {
                name:   name.to_owned(),
                reason: format!("expected text, found {}", other.kind()),
            }),
            None => Err(PlanError::InvalidParameter {
                name:   name.to_owned(),
                reason: "missing".to_owned(),
            }),
        }
    }

    /// Like [`real`][Self::real] but falls back to `default` when absent.
    /// A present text value is still an error.
    pub fn real_or(&self, name: &str, default: f64) -> PlanResult<f64> {
        if self.contains(name) { self.real(name) } else { Ok(default) }
    }

    /// Iterate in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
