//! Declarative requirement rules and the validator that enforces them.
//!
//! Four obligation classes are supported, evaluated in a fixed order against
//! the field tree *before* it is sanitized:
//!
//! 1. [`RequirementRule::Required`]: the field must be set.
//! 2. [`RequirementRule::GroupRequired`]: at least one field of the named group must be set.
//! 3. [`RequirementRule::ConditionalRequired`]: once the field is set, all its dependencies must be.
//! 4. [`RequirementRule::OneOfRequired`]: at least one of the listed fields must be set.
//!
//! Validation stops at the first unmet obligation.
//!
//! ```
//! use genesis_core::{
//!     errors::{BlankRequiredField, Error},
//!     requirements::{RequirementRule, Requirements},
//!     types::FieldSet,
//! };
//!
//! let requirements = Requirements::new()
//!     .with(RequirementRule::required("amount"))
//!     .with(RequirementRule::conditional("notification_url", ["return_success_url"]));
//!
//! let fields = FieldSet::new().with("amount", "5000");
//! assert!(requirements.validate(&fields).is_ok());
//!
//! let fields = FieldSet::new().with("currency", "USD");
//! match requirements.validate(&fields) {
//!     Err(Error::BlankRequiredField(BlankRequiredField::Field { name })) => assert_eq!(name, "amount"),
//!     other => panic!("unexpected result: {other:?}"),
//! }
//! ```

use crate::{
    errors::{BlankRequiredField, InvalidParameter, Result},
    types::{FieldSet, FieldValue},
};

/// A single obligation a field tree must satisfy.
///
/// Field names are resolved with [`FieldSet::find`], so nested fields can be
/// named directly or through a dotted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementRule {
    Required(String),
    ConditionalRequired {
        field: String,
        dependencies: Vec<String>,
    },
    GroupRequired {
        group: String,
        fields: Vec<String>,
    },
    OneOfRequired(Vec<String>),
}

impl RequirementRule {
    pub fn required(field: impl Into<String>) -> Self {
        RequirementRule::Required(field.into())
    }

    pub fn conditional<I, S>(field: impl Into<String>, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RequirementRule::ConditionalRequired {
            field: field.into(),
            dependencies: dependencies.into_iter().map(Into::into).collect(),
        }
    }

    pub fn group<I, S>(group: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RequirementRule::GroupRequired {
            group: group.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn one_of<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RequirementRule::OneOfRequired(fields.into_iter().map(Into::into).collect())
    }
}

/// The rules declared by one request type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirements {
    rules: Vec<RequirementRule>,
}

impl Requirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set of plain [`RequirementRule::Required`] rules.
    pub fn required<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        fields.into_iter().map(RequirementRule::required).collect()
    }

    pub fn with(mut self, rule: RequirementRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: RequirementRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[RequirementRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn validate(&self, fields: &FieldSet) -> Result<()> {
        validate(fields, &self.rules)
    }
}

impl FromIterator<RequirementRule> for Requirements {
    fn from_iter<I: IntoIterator<Item = RequirementRule>>(iter: I) -> Self {
        Requirements {
            rules: iter.into_iter().collect(),
        }
    }
}

impl Extend<RequirementRule> for Requirements {
    fn extend<I: IntoIterator<Item = RequirementRule>>(&mut self, iter: I) {
        self.rules.extend(iter);
    }
}

impl IntoIterator for Requirements {
    type Item = RequirementRule;
    type IntoIter = std::vec::IntoIter<RequirementRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}

/// Checks `fields` against `rules`, failing on the first unmet obligation.
///
/// Flat rules are checked first, then groups, then conditional rules, then
/// one-of rules, each class in declaration order. `fields` is never modified.
pub fn validate(fields: &FieldSet, rules: &[RequirementRule]) -> Result<()> {
    check_required(fields, rules)?;
    check_groups(fields, rules)?;
    check_conditional(fields, rules)?;
    check_one_of(fields, rules)?;
    Ok(())
}

fn check_required(fields: &FieldSet, rules: &[RequirementRule]) -> Result<()> {
    for rule in rules {
        match rule {
            RequirementRule::Required(name) if !fields.is_set(name) => {
                return Err(BlankRequiredField::Field { name: name.clone() }.into());
            }
            _ => {}
        }
    }
    Ok(())
}

fn check_groups(fields: &FieldSet, rules: &[RequirementRule]) -> Result<()> {
    for rule in rules {
        match rule {
            RequirementRule::GroupRequired {
                group,
                fields: members,
            } if !members.iter().any(|member| fields.is_set(member)) => {
                return Err(BlankRequiredField::Group {
                    group: group.clone(),
                    fields: members.clone(),
                }
                .into());
            }
            _ => {}
        }
    }
    Ok(())
}

fn check_conditional(fields: &FieldSet, rules: &[RequirementRule]) -> Result<()> {
    for rule in rules {
        let RequirementRule::ConditionalRequired {
            field,
            dependencies,
        } = rule
        else {
            continue;
        };

        if !fields.is_set(field) {
            continue;
        }

        if let Some(missing) = dependencies.iter().find(|dep| !fields.is_set(dep)) {
            return Err(BlankRequiredField::Conditional {
                name: field.clone(),
                dependency: missing.clone(),
            }
            .into());
        }
    }
    Ok(())
}

fn check_one_of(fields: &FieldSet, rules: &[RequirementRule]) -> Result<()> {
    for rule in rules {
        match rule {
            RequirementRule::OneOfRequired(candidates)
                if !candidates.iter().any(|candidate| fields.is_set(candidate)) =>
            {
                return Err(BlankRequiredField::OneOf {
                    fields: candidates.clone(),
                }
                .into());
            }
            _ => {}
        }
    }
    Ok(())
}

/// A format check supplied for a single field, e.g. a card number or date validator.
///
/// Implemented for any `Fn(&str) -> bool`; a `false` result is reported as
/// "has an invalid format".
pub trait FieldValidator {
    fn validate(&self, field: &str, value: &str) -> std::result::Result<(), InvalidParameter>;
}

impl<F> FieldValidator for F
where
    F: Fn(&str) -> bool,
{
    fn validate(&self, field: &str, value: &str) -> std::result::Result<(), InvalidParameter> {
        if self(value) {
            Ok(())
        } else {
            Err(InvalidParameter::new(field, "has an invalid format"))
        }
    }
}

/// Field validators registered by a request type, run in registration order.
#[derive(Default)]
pub struct FieldValidators {
    validators: Vec<(String, Box<dyn FieldValidator>)>,
}

impl FieldValidators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, validator: impl FieldValidator + 'static) -> Self {
        self.validators.push((field.into(), Box::new(validator)));
        self
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Runs every validator over the matching field, if it is set.
    ///
    /// Unset fields are left to the requirement rules. Each element of a
    /// repeated field is checked on its own.
    pub fn validate(&self, fields: &FieldSet) -> Result<()> {
        for (name, validator) in &self.validators {
            if let Some(value) = fields.find(name) {
                check_value(name, value, validator.as_ref())?;
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for FieldValidators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.validators.iter().map(|(name, _)| name))
            .finish()
    }
}

fn check_value(name: &str, value: &FieldValue, validator: &dyn FieldValidator) -> Result<()> {
    match value {
        FieldValue::Text(text) if !text.is_empty() => Ok(validator.validate(name, text)?),
        FieldValue::List(items) => items
            .iter()
            .try_for_each(|item| check_value(name, item, validator)),
        _ => Ok(()),
    }
}
