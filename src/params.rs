//! Request parameters.

use std::collections::BTreeMap;
use std::iter::FromIterator;
use std::slice;

/// Name of the signature protocol parameter.
pub const OAUTH_SIGNATURE: &str = "oauth_signature";
/// Name of the signature method protocol parameter.
pub const OAUTH_SIGNATURE_METHOD: &str = "oauth_signature_method";
/// Name of the consumer key protocol parameter.
pub const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
/// Name of the version protocol parameter.
pub const OAUTH_VERSION: &str = "oauth_version";
/// Name of the timestamp protocol parameter.
pub const OAUTH_TIMESTAMP: &str = "oauth_timestamp";
/// Name of the nonce protocol parameter.
pub const OAUTH_NONCE: &str = "oauth_nonce";
/// Name of the token protocol parameter.
pub const OAUTH_TOKEN: &str = "oauth_token";
/// Name of the verifier protocol parameter.
pub const OAUTH_VERIFIER: &str = "oauth_verifier";

/// A single `name=value` pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter value.
    pub value: String,
}

impl Parameter {
    /// Creates a parameter.
    pub fn new<N, V>(name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Parameter {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An ordered list of parameters. Names may repeat.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParameterList {
    inner: Vec<Parameter>,
}

impl ParameterList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pair, keeping any earlier values of the same name.
    pub fn push<N, V>(&mut self, name: N, value: V)
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.inner.push(Parameter::new(name, value));
    }

    /// Every value recorded under `name`, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.inner
            .iter()
            .filter(move |p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// The first value recorded under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Whether any pair is named `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.iter().any(|p| p.name == name)
    }

    /// Groups the values by name.
    pub fn to_multimap(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut map = BTreeMap::<_, Vec<_>>::new();
        for p in &self.inner {
            map.entry(p.name.as_str()).or_default().push(p.value.as_str());
        }
        map
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the list holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over the pairs in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, Parameter> {
        self.inner.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<'a> IntoIterator for &'a ParameterList {
    type Item = &'a Parameter;
    type IntoIter = slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<N, V> FromIterator<(N, V)> for ParameterList
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        ParameterList {
            inner: iter.into_iter().map(|(n, v)| Parameter::new(n, v)).collect(),
        }
    }
}

impl<N, V> Extend<(N, V)> for ParameterList
where
    N: Into<String>,
    V: Into<String>,
{
    fn extend<T: IntoIterator<Item = (N, V)>>(&mut self, iter: T) {
        self.inner
            .extend(iter.into_iter().map(|(n, v)| Parameter::new(n, v)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_names_kept() {
        let mut list = ParameterList::new();
        list.push("tag", "a");
        list.push("other", "x");
        list.push("tag", "b");

        assert_eq!(list.len(), 3);
        assert_eq!(list.get("tag"), Some("a"));
        assert_eq!(list.get_all("tag").collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(list.get("missing"), None);
    }

    #[test]
    fn multimap_groups_values() {
        let list = vec![("q", "1"), ("p", "0"), ("q", "2")]
            .into_iter()
            .collect::<ParameterList>();
        let map = list.to_multimap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["q"], ["1", "2"]);
        assert_eq!(map["p"], ["0"]);
    }

    #[test]
    fn iteration_keeps_insertion_order() {
        let mut list = ParameterList::new();
        list.extend(vec![("z", "1"), ("a", "2")]);
        let names = list.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["z", "a"]);
        assert!(list.contains("a"));
        list.clear();
        assert!(list.is_empty());
    }
}
