// File: src/model/mod.rs
// Purpose: Bind typed models from request data and validate them

use crate::request_context::RequestContext;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub mod binders;
pub mod de;
pub mod validation;

pub use binders::{
    BindingData, FormModelBinder, JsonModelBinder, ModelBinder, QueryModelBinder,
};
pub use validation::{Constraint, ModelValidator, PropertiesValidator, PropertyRules};

/// A type that can be bound from request data
///
/// ```
/// use corvid::model::{Model, PropertyRules};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Deserialize, Serialize)]
/// struct Signup {
///     email: String,
///     age: Option<u8>,
/// }
///
/// impl Model for Signup {
///     fn rules() -> Vec<PropertyRules> {
///         vec![PropertyRules::new("email").required().email()]
///     }
/// }
/// ```
pub trait Model: DeserializeOwned + Serialize {
    /// Declarative constraints checked after binding
    fn rules() -> Vec<PropertyRules> {
        Vec::new()
    }
}

#[derive(Debug, Error)]
pub enum ModelBindingError {
    #[error("no model binder recognizes content type {content_type:?}")]
    UnrecognizedContentType { content_type: Option<String> },

    #[error("failed to deserialize model: {message}")]
    Deserialize { message: String },

    #[error("property '{property}' violates {constraint} (value: '{value}')")]
    Constraint {
        property: String,
        constraint: Constraint,
        value: String,
    },

    #[error("invalid rule for property '{property}': {message}")]
    InvalidRule { property: String, message: String },
}

/// Runs the binder strategies and validators for a request
///
/// Binders are tried in order and the first that recognizes the request
/// wins. Every validator then runs over the bound model.
pub struct ModelHandler {
    binders: Vec<Box<dyn ModelBinder>>,
    validators: Vec<Box<dyn ModelValidator>>,
}

impl Default for ModelHandler {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ModelHandler {
    pub fn builder() -> ModelHandlerBuilder {
        ModelHandlerBuilder::default()
    }

    pub fn binder_names(&self) -> Vec<&'static str> {
        self.binders.iter().map(|b| b.name()).collect()
    }

    /// Bind and validate a `T` from the request
    pub fn process<T: Model>(&self, request: &RequestContext) -> Result<T, ModelBindingError> {
        let (binder, data) = self
            .binders
            .iter()
            .find_map(|binder| binder.bind(request).map(|data| (binder.name(), data)))
            .ok_or_else(|| ModelBindingError::UnrecognizedContentType {
                content_type: request.content_type().map(str::to_string),
            })?;

        tracing::debug!(binder, model = std::any::type_name::<T>(), "binding model");

        let model: T = match data {
            BindingData::Fields(fields) => {
                de::from_fields(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                    .map_err(|e| ModelBindingError::Deserialize {
                        message: e.to_string(),
                    })?
            }
            BindingData::Json(json) => {
                serde_json::from_value(json).map_err(|e| ModelBindingError::Deserialize {
                    message: e.to_string(),
                })?
            }
        };

        if !self.validators.is_empty() {
            let snapshot = serde_json::to_value(&model).map_err(|e| {
                ModelBindingError::Deserialize {
                    message: e.to_string(),
                }
            })?;
            let rules = T::rules();
            for validator in &self.validators {
                validator.validate(&snapshot, &rules)?;
            }
        }

        Ok(model)
    }
}

/// Startup-time configuration of a [`ModelHandler`]
pub struct ModelHandlerBuilder {
    binders: Vec<Box<dyn ModelBinder>>,
    validators: Vec<Box<dyn ModelValidator>>,
}

impl Default for ModelHandlerBuilder {
    fn default() -> Self {
        Self {
            binders: vec![
                Box::new(QueryModelBinder),
                Box::new(FormModelBinder),
                Box::new(JsonModelBinder),
            ],
            validators: vec![Box::new(PropertiesValidator)],
        }
    }
}

impl ModelHandlerBuilder {
    /// A builder with no binders and no validators
    pub fn empty() -> Self {
        Self {
            binders: Vec::new(),
            validators: Vec::new(),
        }
    }

    pub fn binder(mut self, binder: impl ModelBinder + 'static) -> Self {
        self.binders.push(Box::new(binder));
        self
    }

    pub fn validator(mut self, validator: impl ModelValidator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn build(self) -> ModelHandler {
        ModelHandler {
            binders: self.binders,
            validators: self.validators,
        }
    }
}
