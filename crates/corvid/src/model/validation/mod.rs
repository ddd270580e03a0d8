// File: src/model/validation/mod.rs
// Purpose: Declarative property constraints and the validators that enforce them

use super::ModelBindingError;
use serde_json::Value as JsonValue;
use std::fmt;

pub mod validators;

/// A single rule attached to a model property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Present and not empty
    Required,
    /// At least this many characters
    MinLength(usize),
    /// At most this many characters
    MaxLength(usize),
    /// Looks like an email address
    Email,
    /// Matches the regular expression
    Regex(String),
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Required => write!(f, "required"),
            Constraint::MinLength(n) => write!(f, "minimum length {}", n),
            Constraint::MaxLength(n) => write!(f, "maximum length {}", n),
            Constraint::Email => write!(f, "email format"),
            Constraint::Regex(pattern) => write!(f, "pattern '{}'", pattern),
        }
    }
}

/// Constraints declared for one property
///
/// ```
/// use corvid::model::PropertyRules;
///
/// let rules = PropertyRules::new("email").required().max_length(64).email();
/// assert_eq!(rules.constraints.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRules {
    pub property: String,
    pub constraints: Vec<Constraint>,
}

impl PropertyRules {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            constraints: Vec::new(),
        }
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn required(self) -> Self {
        self.constraint(Constraint::Required)
    }

    pub fn min_length(self, length: usize) -> Self {
        self.constraint(Constraint::MinLength(length))
    }

    pub fn max_length(self, length: usize) -> Self {
        self.constraint(Constraint::MaxLength(length))
    }

    pub fn email(self) -> Self {
        self.constraint(Constraint::Email)
    }

    pub fn regex(self, pattern: impl Into<String>) -> Self {
        self.constraint(Constraint::Regex(pattern.into()))
    }
}

/// Validates a bound model
///
/// The model is presented in its serialized form so validators stay
/// independent of the concrete model type.
pub trait ModelValidator: Send + Sync {
    fn validate(&self, model: &JsonValue, rules: &[PropertyRules]) -> Result<(), ModelBindingError>;
}

/// Enforces each model's declared [`PropertyRules`]
///
/// `Required` applies to every property kind. Length, email and regex
/// constraints apply to string properties; absent or `null` properties
/// are skipped by them.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertiesValidator;

impl PropertiesValidator {
    fn check(
        property: &str,
        value: Option<&JsonValue>,
        constraint: &Constraint,
    ) -> Result<(), ModelBindingError> {
        let text = value.and_then(JsonValue::as_str);
        let violated = |actual: &str| ModelBindingError::Constraint {
            property: property.to_string(),
            constraint: constraint.clone(),
            value: actual.to_string(),
        };

        match (constraint, value, text) {
            (Constraint::Required, None | Some(JsonValue::Null), _) => Err(violated("")),
            (Constraint::Required, _, Some(s)) if s.is_empty() => Err(violated(s)),
            (Constraint::Required, _, _) => Ok(()),
            (_, _, None) => Ok(()),
            (Constraint::MinLength(min), _, Some(s)) if validators::char_length(s) < *min => {
                Err(violated(s))
            }
            (Constraint::MaxLength(max), _, Some(s)) if validators::char_length(s) > *max => {
                Err(violated(s))
            }
            (Constraint::Email, _, Some(s)) if !validators::is_valid_email(s) => Err(violated(s)),
            (Constraint::Regex(pattern), _, Some(s)) => {
                let regex = validators::cached_regex(pattern).map_err(|e| {
                    ModelBindingError::InvalidRule {
                        property: property.to_string(),
                        message: e.to_string(),
                    }
                })?;
                if regex.is_match(s) {
                    Ok(())
                } else {
                    Err(violated(s))
                }
            }
            _ => Ok(()),
        }
    }
}

impl ModelValidator for PropertiesValidator {
    fn validate(&self, model: &JsonValue, rules: &[PropertyRules]) -> Result<(), ModelBindingError> {
        for rule in rules {
            let value = model.get(&rule.property);
            for constraint in &rule.constraints {
                Self::check(&rule.property, value, constraint)?;
            }
        }
        Ok(())
    }
}
