//! Response header storage.
//!
//! Names are stored in canonical form (`content-type` becomes `Content-Type`) so
//! lookups are case-insensitive the way HTTP header names are.

use std::collections::BTreeMap;

/// Header names mapped to their values. Values keep the order they were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(BTreeMap<String, Vec<String>>);

impl Headers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` to the values of `name`.
    pub fn add<S: Into<String>>(&mut self, name: &str, value: S) {
        self.0
            .entry(canonical_header_key(name))
            .or_default()
            .push(value.into());
    }

    /// Replaces any values of `name` with the single `value`.
    pub fn set<S: Into<String>>(&mut self, name: &str, value: S) {
        self.0.insert(canonical_header_key(name), vec![value.into()]);
    }

    /// Replaces any values of `name` with `values`.
    pub fn set_all(&mut self, name: &str, values: Vec<String>) {
        self.0.insert(canonical_header_key(name), values);
    }

    /// First value of `name`, if any.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_all(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    #[must_use]
    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        self.0.get(&canonical_header_key(name)).map(Vec::as_slice)
    }

    /// Removes `name`, returning its values.
    pub fn del(&mut self, name: &str) -> Option<Vec<String>> {
        self.0.remove(&canonical_header_key(name))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&canonical_header_key(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.add(name.as_ref(), value);
        }
        headers
    }
}

/// Returns the canonical form of a header name.
///
/// The first letter and any letter following a hyphen are upper-cased, the rest
/// lower-cased. Names holding a byte that is not a valid token character are
/// returned unchanged.
#[must_use]
pub fn canonical_header_key(name: &str) -> String {
    if !name.bytes().all(is_token_byte) {
        return name.to_string();
    }

    let mut upper = true;
    name.chars()
        .map(|c| {
            let mapped = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            mapped
        })
        .collect()
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}
