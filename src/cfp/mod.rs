//! Call-for-papers form engine: validation, draft persistence, the form
//! controller and the submission pipeline.

pub mod controller;
pub mod debounce;
pub mod drafts;
pub mod email;
pub mod preview;
pub mod storage;
pub mod submit;
pub mod types;
pub mod validate;

use std::fmt;

use self::types::Field;

/// Input that the controller refuses to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CfpError {
    UnknownField(String),
    NotATextField(Field),
    InvalidChoice { field: Field, value: String },
    UnknownTopic(String),
    ReadOnly,
}

impl fmt::Display for CfpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CfpError::UnknownField(name) => write!(f, "Unknown field: {name}"),
            CfpError::NotATextField(field) => write!(f, "{} is not a text field", field.as_str()),
            CfpError::InvalidChoice { field, value } => {
                write!(f, "Invalid value for {}: {value:?}", field.as_str())
            }
            CfpError::UnknownTopic(topic) => write!(f, "Unknown topic: {topic}"),
            CfpError::ReadOnly => write!(f, "Form has already been submitted"),
        }
    }
}

impl std::error::Error for CfpError {}
