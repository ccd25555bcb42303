//! Modeling service adapter
//!
//! The service fits a model to column-oriented data and answers with JSON of
//! no particular shape. A request is a GET:
//!
//! ```text
//! <base>/<kind>?data=<{"name": [values], ...}>&<slot>="<name>"&...
//! ```
//!
//! with every query value percent-encoded. Building the URL is pure and
//! lives here; issuing it needs the `native` feature.

#[cfg(feature = "native")]
pub mod native;

#[cfg(feature = "native")]
pub use native::*;

use serde_json::{Map, Value};

use crate::error::ServiceError;
use crate::state::{Binding, ModelKind, Modeling, Slot};

/// A fully bound fit request
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub kind: ModelKind,
    /// Bound variables, one column per distinct name
    pub data: Vec<(String, Vec<f64>)>,
    /// Slot → variable name, in slot order
    pub bindings: Vec<(Slot, String)>,
}

impl ModelRequest {
    /// Build a request when a model is chosen and every slot is bound
    pub fn from_modeling(modeling: &Modeling) -> Option<Self> {
        let kind = modeling.model?;
        let bound = modeling.complete_bindings()?;

        let mut data: Vec<(String, Vec<f64>)> = Vec::new();
        let mut bindings = Vec::with_capacity(bound.len());
        for var in bound {
            let name = var.name().to_string();
            if !data.iter().any(|(n, _)| *n == name) {
                data.push((name.clone(), var.variable.data.to_vec()));
            }
            if let Binding::Model(slot) = var.binding {
                bindings.push((slot, name));
            }
        }

        Some(Self {
            kind,
            data,
            bindings,
        })
    }

    /// The `data` payload: variable name → array
    ///
    /// Non-finite values have no JSON form and go out as `null`.
    pub fn payload(&self) -> Value {
        let columns: Map<String, Value> = self
            .data
            .iter()
            .map(|(name, values)| (name.clone(), Value::from(values.clone())))
            .collect();
        Value::Object(columns)
    }

    /// Full request URL under `base`
    pub fn url(&self, base: &str) -> Result<String, ServiceError> {
        let base = url::Url::parse(base).map_err(|_| ServiceError::InvalidUrl {
            url: base.to_string(),
        })?;
        let base = base.as_str().trim_end_matches('/');

        let payload = serde_json::to_string(&self.payload())?;
        let mut url = format!(
            "{}/{}?data={}",
            base,
            self.kind,
            urlencoding::encode(&payload)
        );
        for (slot, name) in &self.bindings {
            let quoted = serde_json::to_string(name)?;
            url.push('&');
            url.push_str(slot.variable_name());
            url.push('=');
            url.push_str(&urlencoding::encode(&quoted));
        }
        Ok(url)
    }
}

/// Render a fit result for the model info block
pub fn format_result(result: &Value) -> Result<String, ServiceError> {
    Ok(serde_json::to_string_pretty(result)?)
}
