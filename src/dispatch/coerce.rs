//! Path parameter coercion.
//!
//! Each handler declares, at registration, which parameters it wants converted
//! and how. Before a handler runs, every declared parameter that is still a raw
//! captured string is converted in place; values an outer handler already
//! resolved are handed over untouched.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Number, Value};

use crate::dispatch::context::Params;
use crate::dispatch::error::DispatchError;
use crate::sitemap::Resource;

type ConvertFn = dyn Fn(&str) -> Result<Value, String> + Send + Sync;

/// Conversion applied to a raw path value.
#[derive(Clone)]
pub enum Coercion {
    /// Signed 64-bit integer.
    Int,
    /// Finite 64-bit float.
    Float,
    /// `true` or `false`.
    Bool,
    /// UUID in any form accepted by `uuid`, normalized to hyphenated lowercase.
    Uuid,
    /// Caller-provided converter.
    Custom(Arc<ConvertFn>),
}

impl Coercion {
    /// Converter from a closure.
    pub fn custom<F>(convert: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        Coercion::Custom(Arc::new(convert))
    }

    /// Converter for any type parsed with `FromStr` and serialized back to a value.
    pub fn parse<T>() -> Self
    where
        T: FromStr + Serialize + 'static,
        T::Err: fmt::Display,
    {
        Coercion::custom(|raw| {
            let parsed = raw.parse::<T>().map_err(|e| e.to_string())?;
            serde_json::to_value(parsed).map_err(|e| e.to_string())
        })
    }

    /// Convert one raw value.
    pub fn apply(&self, raw: &str) -> Result<Value, String> {
        match self {
            Coercion::Int => raw
                .parse::<i64>()
                .map(Value::from)
                .map_err(|e| e.to_string()),
            Coercion::Float => {
                let number = raw.parse::<f64>().map_err(|e| e.to_string())?;
                Number::from_f64(number)
                    .map(Value::Number)
                    .ok_or_else(|| "not a finite number".to_string())
            }
            Coercion::Bool => raw
                .parse::<bool>()
                .map(Value::Bool)
                .map_err(|e| e.to_string()),
            Coercion::Uuid => uuid::Uuid::parse_str(raw)
                .map(|id| Value::String(id.hyphenated().to_string()))
                .map_err(|e| e.to_string()),
            Coercion::Custom(convert) => convert(raw),
        }
    }
}

impl fmt::Debug for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coercion::Int => f.write_str("Int"),
            Coercion::Float => f.write_str("Float"),
            Coercion::Bool => f.write_str("Bool"),
            Coercion::Uuid => f.write_str("Uuid"),
            Coercion::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Coerce the parameters `resource` declares, in place.
pub fn coerce(resource: &Resource, params: &mut Params) -> Result<(), DispatchError> {
    for spec in resource.params() {
        let Some(coercion) = &spec.coercion else {
            continue;
        };
        let Some(raw) = params.raw(&spec.name) else {
            continue;
        };
        let value = coercion
            .apply(raw)
            .map_err(|reason| DispatchError::BadParameter {
                name: spec.name.clone(),
                value: raw.to_string(),
                reason,
            })?;
        params.set_coerced(&spec.name, value);
    }
    Ok(())
}
