//! Error types shared by every Genesis request and response operation.

/// Which obligation produced a [`BlankRequiredField`] failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequirementKind {
    /// A plain required field.
    Flat,
    /// A field required because another field was set.
    Conditional,
    /// A named group where at least one member must be set.
    Group,
    /// A request-wide list where at least one member must be set.
    OneOf,
}

/// A required field, group or dependency was left blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlankRequiredField {
    #[error("'{name}' is required and must not be blank")]
    Field { name: String },

    #[error("{name} is depending on field: {dependency}")]
    Conditional { name: String, dependency: String },

    #[error(
        "One of the following group(s) of field(s): {} must be filled in!",
        format_group(.group, .fields)
    )]
    Group { group: String, fields: Vec<String> },

    #[error(
        "You should set at least one of the following fields: {}",
        .fields.join(", ")
    )]
    OneOf { fields: Vec<String> },
}

impl BlankRequiredField {
    /// The obligation class that failed.
    pub fn kind(&self) -> RequirementKind {
        match self {
            BlankRequiredField::Field { .. } => RequirementKind::Flat,
            BlankRequiredField::Conditional { .. } => RequirementKind::Conditional,
            BlankRequiredField::Group { .. } => RequirementKind::Group,
            BlankRequiredField::OneOf { .. } => RequirementKind::OneOf,
        }
    }

    /// The offending field, or the formatted group / candidate list.
    ///
    /// Groups render as `"Groupname (field1, field2)"`.
    pub fn field(&self) -> String {
        match self {
            BlankRequiredField::Field { name } => name.clone(),
            BlankRequiredField::Conditional { dependency, .. } => dependency.clone(),
            BlankRequiredField::Group { group, fields } => format_group(group, fields),
            BlankRequiredField::OneOf { fields } => fields.join(", "),
        }
    }
}

pub(crate) fn format_group(group: &str, fields: &[String]) -> String {
    let mut chars = group.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("{} ({})", capitalized, fields.join(", "))
}

/// A field value was rejected by a format validator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid value for '{field}': {reason}")]
pub struct InvalidParameter {
    pub field: String,
    pub reason: String,
}

impl InvalidParameter {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error types for Genesis core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A requirement rule was not satisfied.
    #[error("Blank required field: {0}")]
    BlankRequiredField(#[from] BlankRequiredField),

    /// A value validator rejected a field.
    #[error(transparent)]
    InvalidParameter(#[from] InvalidParameter),

    /// The inbound payload is not a well-formed document.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A structurally invalid argument was passed to an operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A required collaborator is not available.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// Failures raised by a transport implementation, passed through as-is.
    #[error(transparent)]
    Transport(Box<dyn std::error::Error + Send + Sync>),

    /// JSON serialization/deserialization errors.
    #[error("Serde JSON error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

/// A specialized `Result` type for Genesis core operations.
pub type Result<T> = std::result::Result<T, Error>;
