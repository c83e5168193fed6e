use std::iter::FromIterator;

use itertools::Itertools;
use url::form_urlencoded;

use crate::param::Param;

/// Base trait for anything that can be turned into query parameters for the
/// static map service.
pub trait QueryLike {
    /// Returns the parameters for this value in canonical emission order.
    /// Fields which are unset must not produce a parameter.
    fn query_params(&self) -> QueryParams;
}

impl<T: QueryLike> QueryLike for &T {
    fn query_params(&self) -> QueryParams {
        (**self).query_params()
    }
}

/// An ordered multi-map of query parameters.
///
/// Insertion order is preserved until the set is canonicalized, at which point
/// keys are sorted and the values of any one key keep their relative order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }
    /// Replaces any existing values for `key` with `value`.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.remove(key);
        self.append(key, value)
    }
    /// Replaces any existing values for `key` with `value`.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }
    /// Adds a value for `key`, keeping any values already present.
    pub fn append(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.pairs.push((key.into(), value.into()));
        self
    }
    /// Sets one of the well-known service parameters.
    pub fn set_param(&mut self, param: Param, value: impl Into<String>) -> &mut Self {
        self.set(param.as_str(), value)
    }
    /// Removes every value for `key`.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.pairs.retain(|(k, _)| k != key);
        self
    }
    /// Returns the first value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
    /// Returns the keys in insertion order, including duplicates.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }
    /// Number of key/value pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }
    /// Returns true if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Compute the canonical query string: keys sorted lexicographically,
    /// values percent-encoded as `application/x-www-form-urlencoded`.
    pub fn canonicalize(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(
                self.pairs
                    .iter()
                    .sorted_by(|a, b| a.0.cmp(&b.0))
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            )
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a QueryParams {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;
    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}
