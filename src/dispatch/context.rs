//! Per-request resolved context.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Lifecycle of a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    /// Captured path text, unconverted.
    Raw,
    /// Converted by the enclosing handler's descriptor.
    Coerced,
    /// Overwritten with the enclosing handler's return value.
    Resolved,
}

#[derive(Debug, Clone)]
struct Binding {
    name: String,
    value: Value,
    state: BindingState,
}

/// Parameters resolved so far while walking a matched route.
///
/// Created per request and handed to every handler of the chain. Raw values
/// are exposed as JSON strings; once a handler has run, the parameter bound
/// just before it holds the handler's return value.
#[derive(Debug, Clone, Default)]
pub struct Params {
    bindings: Vec<Binding>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind captured path text under `name`.
    pub fn bind_raw(&mut self, name: &str, raw: &str) {
        self.set(name, Value::String(raw.to_string()), BindingState::Raw);
    }

    pub(crate) fn set_coerced(&mut self, name: &str, value: Value) {
        self.set(name, value, BindingState::Coerced);
    }

    /// Overwrite `name` with a handler's return value.
    pub fn resolve(&mut self, name: &str, value: Value) {
        self.set(name, value, BindingState::Resolved);
    }

    fn set(&mut self, name: &str, value: Value, state: BindingState) {
        match self.bindings.iter_mut().find(|b| b.name == name) {
            Some(binding) => {
                binding.value = value;
                binding.state = state;
            }
            None => self.bindings.push(Binding {
                name: name.to_string(),
                value,
                state,
            }),
        }
    }

    fn binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.binding(name).map(|b| &b.value)
    }

    pub fn state(&self, name: &str) -> Option<BindingState> {
        self.binding(name).map(|b| b.state)
    }

    /// The captured text of `name`, if it has not been converted yet.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.binding(name)
            .filter(|b| b.state == BindingState::Raw)
            .and_then(|b| b.value.as_str())
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    /// Deserialize the value bound under `name`.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.get(name)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Parameter names in binding order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_bind_and_resolve() {
        let mut params = Params::new();
        params.bind_raw("publisher_id", "42");
        assert_eq!(params.raw("publisher_id"), Some("42"));
        assert_eq!(params.get_str("publisher_id"), Some("42"));
        assert_eq!(params.state("publisher_id"), Some(BindingState::Raw));

        params.resolve("publisher_id", json!({"name": "Mad Hat"}));
        assert_eq!(params.raw("publisher_id"), None);
        assert_eq!(params.state("publisher_id"), Some(BindingState::Resolved));
        assert_eq!(params.get("publisher_id"), Some(&json!({"name": "Mad Hat"})));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_binding_order_kept_on_overwrite() {
        let mut params = Params::new();
        params.bind_raw("a", "1");
        params.bind_raw("b", "2");
        params.resolve("a", json!(10));

        let names: Vec<&str> = params.names().collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(params.get_i64("a"), Some(10));
    }

    #[test]
    fn test_get_as() {
        #[derive(Deserialize, PartialEq, Debug)]
        struct Publisher {
            name: String,
        }

        let mut params = Params::new();
        params.resolve("publisher_id", json!({"name": "Mad Hat"}));
        assert_eq!(
            params.get_as::<Publisher>("publisher_id"),
            Some(Publisher { name: "Mad Hat".into() })
        );
        assert_eq!(params.get_as::<Publisher>("missing"), None);
    }
}
