//! Named-vector configuration: a sorted map from variable name to a dense
//! vector, with the arithmetic an iterative solver applies to it.
//!
//! The operations are instrumented with the gated macros, so they show up in
//! the report only when the crate is built with `enable-timing`.

use std::collections::BTreeMap;

use calltree_core::tic_gated;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("mismatched dimensions for `{key}`: {left} vs {right}")]
    MismatchedDimensions {
        key: String,
        left: usize,
        right: usize,
    },
    #[error("invalid key `{0}`")]
    InvalidKey(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorConfig {
    values: BTreeMap<String, Vec<f64>>,
}

fn check_size(key: &str, left: &[f64], right: &[f64]) -> Result<(), ConfigError> {
    if left.len() == right.len() {
        Ok(())
    } else {
        Err(ConfigError::MismatchedDimensions {
            key: key.to_owned(),
            left: left.len(),
            right: right.len(),
        })
    }
}

fn zip_with(a: &[f64], b: &[f64], f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    a.iter().zip(b).map(|(&x, &y)| f(x, y)).collect()
}

impl VectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing any previous vector.
    pub fn insert(&mut self, name: impl Into<String>, value: Vec<f64>) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Accumulate `value` into `name`. A missing or empty entry takes
    /// `value` as is.
    pub fn add(&mut self, name: &str, value: &[f64]) -> Result<(), ConfigError> {
        tic_gated!(config_add);
        match self.values.get_mut(name) {
            Some(current) if !current.is_empty() => {
                check_size(name, current, value)?;
                current.iter_mut().zip(value).for_each(|(c, v)| *c += v);
            }
            _ => {
                self.values.insert(name.to_owned(), value.to_vec());
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&[f64], ConfigError> {
        self.values
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| ConfigError::InvalidKey(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }

    /// Total number of scalars across all vectors.
    pub fn dim(&self) -> usize {
        self.values.values().map(Vec::len).sum()
    }

    pub fn scale(&self, s: f64) -> Self {
        tic_gated!(config_scale);
        let values = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.iter().map(|x| s * x).collect()))
            .collect();
        Self { values }
    }

    /// Element-wise sum over this config's keys. Every key must exist in
    /// `other` with the same dimension.
    pub fn plus(&self, other: &Self) -> Result<Self, ConfigError> {
        tic_gated!(config_plus);
        self.combine(other, |a, b| a + b)
    }

    pub fn minus(&self, other: &Self) -> Result<Self, ConfigError> {
        tic_gated!(config_minus);
        self.combine(other, |a, b| a - b)
    }

    fn combine(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Result<Self, ConfigError> {
        let mut values = BTreeMap::new();
        for (key, v) in &self.values {
            let w = other.get(key)?;
            check_size(key, v, w)?;
            values.insert(key.clone(), zip_with(v, w, &f));
        }
        Ok(Self { values })
    }

    /// Apply an update given per key. Keys absent from `delta` keep their
    /// current value.
    pub fn exmap(&self, delta: &Self) -> Result<Self, ConfigError> {
        tic_gated!(config_exmap);
        let mut values = BTreeMap::new();
        for (key, v) in &self.values {
            let updated = match delta.values.get(key) {
                Some(d) => {
                    check_size(key, v, d)?;
                    zip_with(v, d, |a, b| a + b)
                }
                None => v.clone(),
            };
            values.insert(key.clone(), updated);
        }
        Ok(Self { values })
    }

    /// Apply an update given as one flat vector, sliced across the keys in
    /// sorted order.
    pub fn exmap_flat(&self, delta: &[f64]) -> Result<Self, ConfigError> {
        tic_gated!(config_exmap_flat);
        if delta.len() != self.dim() {
            return Err(ConfigError::MismatchedDimensions {
                key: "<flat>".to_owned(),
                left: self.dim(),
                right: delta.len(),
            });
        }
        let mut offset = 0;
        let mut values = BTreeMap::new();
        for (key, v) in &self.values {
            let d = &delta[offset..offset + v.len()];
            values.insert(key.clone(), zip_with(v, d, |a, b| a + b));
            offset += v.len();
        }
        Ok(Self { values })
    }

    pub fn dot(&self, other: &Self) -> Result<f64, ConfigError> {
        tic_gated!(config_dot);
        let mut sum = 0.0;
        for (key, v) in &self.values {
            let w = other.get(key)?;
            check_size(key, v, w)?;
            sum += v.iter().zip(w).map(|(a, b)| a * b).sum::<f64>();
        }
        Ok(sum)
    }

    /// Same keys, and every pair of vectors within `tol` element-wise.
    pub fn equals(&self, other: &Self, tol: f64) -> bool {
        self.values.len() == other.values.len()
            && self.values.iter().all(|(key, v)| {
                other.values.get(key).is_some_and(|w| {
                    v.len() == w.len() && v.iter().zip(w).all(|(a, b)| (a - b).abs() <= tol)
                })
            })
    }
}
