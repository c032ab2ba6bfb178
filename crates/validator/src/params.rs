//! Request parameter snapshots.
//!
//! A request reaches the engine as four independent namespaces of arbitrarily
//! nested JSON: `body`, `query`, `path` and `header`. [`Params`] is an owned
//! deep copy of them, addressed by dotted paths such as `body.user.name` or
//! `query.ids.0`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the synthetic namespace holding fields that have no request path:
/// default-substituted optional fields and custom-check results.
pub const DEFAULT_NAMESPACE: &str = "default";

/// One of the four request namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Query,
    Body,
    Path,
    Header,
}

impl Namespace {
    /// Every namespace, in the default extraction order.
    pub const ALL: [Namespace; 4] = [
        Namespace::Query,
        Namespace::Body,
        Namespace::Path,
        Namespace::Header,
    ];

    /// Key of this namespace inside a [`Params`] tree.
    pub const fn as_str(self) -> &'static str {
        match self {
            Namespace::Query => "query",
            Namespace::Body => "body",
            Namespace::Path => "path",
            Namespace::Header => "header",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request-like bundle the engine can snapshot.
///
/// Each accessor returns an owned value; the engine never holds on to the
/// source, so later mutation of the request cannot reach a validator.
pub trait RequestSource {
    fn body(&self) -> Value;
    fn query(&self) -> Value;
    fn path_params(&self) -> Value;
    fn header(&self) -> Value;
}

/// Plain [`RequestSource`] built from JSON values.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use sieve_validator::RawRequest;
///
/// let request = RawRequest::new()
///     .body(json!({ "username": "ab" }))
///     .query(json!({ "page": "2" }));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRequest {
    body: Value,
    query: Value,
    path: Value,
    header: Value,
}

impl RawRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn query(mut self, query: Value) -> Self {
        self.query = query;
        self
    }

    pub fn path(mut self, path: Value) -> Self {
        self.path = path;
        self
    }

    pub fn header(mut self, header: Value) -> Self {
        self.header = header;
        self
    }
}

impl RequestSource for RawRequest {
    fn body(&self) -> Value {
        self.body.clone()
    }

    fn query(&self) -> Value {
        self.query.clone()
    }

    fn path_params(&self) -> Value {
        self.path.clone()
    }

    fn header(&self) -> Value {
        self.header.clone()
    }
}

/// Owned snapshot of the request namespaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params {
    tree: Map<String, Value>,
}

impl Params {
    /// Deep-copies the four namespaces out of `source`. A missing (null)
    /// namespace becomes an empty object.
    pub fn snapshot<R: RequestSource + ?Sized>(source: &R) -> Self {
        let mut tree = Map::new();
        for (namespace, value) in [
            (Namespace::Body, source.body()),
            (Namespace::Query, source.query()),
            (Namespace::Path, source.path_params()),
            (Namespace::Header, source.header()),
        ] {
            let value = match value {
                Value::Null => Value::Object(Map::new()),
                other => other,
            };
            tree.insert(namespace.as_str().to_owned(), value);
        }
        Self { tree }
    }

    /// The whole tree of one namespace.
    pub fn namespace(&self, namespace: Namespace) -> Option<&Value> {
        self.tree.get(namespace.as_str())
    }

    /// Dotted-path lookup, e.g. `body.username`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let root = self.tree.get(head)?;
        match rest {
            Some(rest) => lookup(root, rest),
            None => Some(root),
        }
    }

    /// Finds `key` at the top level of the first namespace in `order` holding
    /// a truthy value for it.
    pub fn locate(&self, key: &str, order: &[Namespace]) -> Option<(Namespace, &Value)> {
        order.iter().find_map(|&namespace| {
            self.namespace(namespace)
                .and_then(|tree| tree.get(key))
                .filter(|value| is_truthy(value))
                .map(|value| (namespace, value))
        })
    }

    /// Returns the tree as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.tree.clone())
    }

    /// Overwrites `key` in `namespace`. The namespace must be an object, which
    /// holds whenever `locate` found the key there.
    pub(crate) fn set(&mut self, namespace: Namespace, key: &str, value: Value) {
        if let Some(Value::Object(tree)) = self.tree.get_mut(namespace.as_str()) {
            tree.insert(key.to_owned(), value);
        }
    }

    /// Overwrites `key` in `namespace` only where it holds a falsy value.
    pub(crate) fn replace_falsy(&mut self, namespace: Namespace, key: &str, value: &Value) {
        if let Some(Value::Object(tree)) = self.tree.get_mut(namespace.as_str()) {
            if let Some(slot) = tree.get_mut(key).filter(|slot| !is_truthy(slot)) {
                *slot = value.clone();
            }
        }
    }

    /// Writes `key` into the synthetic `default` namespace.
    pub(crate) fn set_default(&mut self, key: &str, value: Value) {
        let slot = self
            .tree
            .entry(DEFAULT_NAMESPACE)
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(tree) = slot {
            tree.insert(key.to_owned(), value);
        }
    }
}

/// Dotted-path lookup inside a JSON value. Numeric segments index arrays.
/// An empty path finds nothing.
pub fn lookup<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.').try_fold(root, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// JavaScript-style truthiness: null, `false`, `0` and `""` are falsy;
/// everything else, including empty arrays and objects, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn request() -> RawRequest {
        RawRequest::new()
            .body(json!({ "name": "body-name", "user": { "tags": ["a", "b"] }, "zero": 0 }))
            .query(json!({ "name": "query-name", "empty": "" }))
            .path(json!({ "id": "7" }))
            .header(json!({ "x-token": "t" }))
    }

    #[test]
    fn snapshot_replaces_null_namespaces() {
        let params = Params::snapshot(&RawRequest::new().body(json!({ "a": 1 })));
        assert_eq!(params.namespace(Namespace::Query), Some(&json!({})));
        assert_eq!(params.get("body.a"), Some(&json!(1)));
    }

    #[test]
    fn snapshot_is_a_deep_copy() {
        let mut source = request();
        let params = Params::snapshot(&source);
        source = source.body(json!({ "name": "mutated" }));
        assert_eq!(params.get("body.name"), Some(&json!("body-name")));
        assert_eq!(source.body, json!({ "name": "mutated" }));
    }

    #[test]
    fn dotted_lookup_walks_objects_and_arrays() {
        let params = Params::snapshot(&request());
        assert_eq!(params.get("body.user.tags.1"), Some(&json!("b")));
        assert_eq!(params.get("body.user.tags.9"), None);
        assert_eq!(params.get("body.user.missing"), None);
        assert_eq!(params.get("nowhere"), None);
        assert_eq!(lookup(&json!({ "a": 1 }), ""), None);
    }

    #[test]
    fn locate_respects_order_and_truthiness() {
        let params = Params::snapshot(&request());
        let (namespace, value) = params.locate("name", &Namespace::ALL).unwrap();
        assert_eq!(namespace, Namespace::Query);
        assert_eq!(value, &json!("query-name"));

        let body_first = [Namespace::Body, Namespace::Query];
        assert_eq!(
            params.locate("name", &body_first).map(|(ns, _)| ns),
            Some(Namespace::Body)
        );

        assert!(params.locate("empty", &Namespace::ALL).is_none());
        assert!(params.locate("zero", &Namespace::ALL).is_none());
        assert_eq!(
            params.locate("id", &Namespace::ALL).map(|(ns, _)| ns),
            Some(Namespace::Path)
        );
    }

    #[test]
    fn set_and_set_default() {
        let mut params = Params::snapshot(&request());
        params.set(Namespace::Path, "id", json!(7));
        params.set_default("page", json!(1));
        assert_eq!(params.get("path.id"), Some(&json!(7)));
        assert_eq!(params.get("default.page"), Some(&json!(1)));
    }

    #[test]
    fn replace_falsy_leaves_truthy_and_missing_keys_alone() {
        let mut params = Params::snapshot(&request());
        params.replace_falsy(Namespace::Body, "zero", &json!(5));
        params.replace_falsy(Namespace::Body, "name", &json!(5));
        params.replace_falsy(Namespace::Body, "missing", &json!(5));
        assert_eq!(params.get("body.zero"), Some(&json!(5)));
        assert_eq!(params.get("body.name"), Some(&json!("body-name")));
        assert_eq!(params.get("body.missing"), None);
    }

    #[test]
    fn truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!("0"), json!([]), json!({})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn namespace_names() {
        assert_eq!(Namespace::Path.to_string(), "path");
        assert_eq!(
            serde_json::from_value::<Namespace>(json!("header")).unwrap(),
            Namespace::Header
        );
    }
}
