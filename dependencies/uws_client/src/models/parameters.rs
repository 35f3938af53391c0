//
// (C) Copyright IBM 2025
//
// This code is licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// copyright notice, and modified files need to carry a notice indicating
// that they have been altered from the originals.

use serde::Serialize;

/// Form fields submitted when creating a job.
///
/// Keys may repeat; a SODA job for example takes one `id` field per image.
/// Fields are encoded in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct JobParameters(Vec<(String, String)>);

impl JobParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one field.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.push((key.into(), value.into()));
        self
    }

    /// Appends one field per value, all under `key`.
    pub fn extend<I, V>(&mut self, key: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        for value in values {
            self.0.push((key.to_string(), value.into()));
        }
        self
    }

    /// Replaces every field named `key` with a single value.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.0.retain(|(k, _)| k != key);
        self.0.push((key.to_string(), value.into()));
        self
    }

    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_keys_keep_insertion_order() {
        let mut params = JobParameters::new();
        params
            .extend("id", ["img1", "img2"])
            .push("circle", "10.0 20.0 0.1")
            .set("phase", "RUN");
        assert_eq!(params.get_all("id").collect::<Vec<_>>(), ["img1", "img2"]);
        assert_eq!(params.len(), 4);

        params.set("id", "img3");
        assert_eq!(params.get_all("id").collect::<Vec<_>>(), ["img3"]);
        assert!(params.contains_key("phase"));
        assert!(!params.contains_key("runid"));
    }
}
