//! Diagnostic types and message lookup for the type checker.
//!
//! Every diagnostic the checker can produce has a stable numeric code and a
//! message template with `{0}`, `{1}`, ... placeholders. The rendered text is
//! part of the user-visible contract, so tests compare it verbatim.

use crate::span::Span;
use serde::{Deserialize, Serialize};

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

impl DiagnosticCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Message => "message",
        }
    }
}

/// A type-checking diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub span: Span,
    pub category: DiagnosticCategory,
    pub code: u32,
    pub message_text: String,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub fn error(span: Span, message: impl Into<String>, code: u32) -> Self {
        Self {
            span,
            category: DiagnosticCategory::Error,
            code,
            message_text: message.into(),
        }
    }

    /// Create a diagnostic from a registered code, filling the template with
    /// `args`.
    ///
    /// Unknown codes still produce a diagnostic so that a missing table entry
    /// never hides an error; the message is then the joined arguments.
    #[must_use]
    pub fn from_code(span: Span, code: u32, args: &[&str]) -> Self {
        match get_diagnostic_message(code) {
            Some(message) => Self {
                span,
                category: message.category,
                code,
                message_text: format_message(message.message, args),
            },
            None => Self::error(span, args.join(" "), code),
        }
    }

    /// The code as rendered to users, e.g. `LD1001`.
    pub fn code_string(&self) -> String {
        format!("LD{:04}", self.code)
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const INCOMPATIBLE_TYPES: u32 = 1001;
    pub const OPERANDS_MUST_BE_NUMBERS: u32 = 1002;
    pub const OPERANDS_MUST_BE_NUMBERS_OR_STRINGS: u32 = 1003;
    pub const OPERAND_MUST_BE_NUMBER: u32 = 1004;
    pub const UNDEFINED_VARIABLE: u32 = 1005;
    pub const UNDEFINED_PROPERTY: u32 = 1006;
    pub const NOT_CALLABLE: u32 = 1007;
    pub const ARGUMENT_COUNT_MISMATCH: u32 = 1008;
    pub const UNDEFINED_TYPE: u32 = 1009;
    pub const TYPE_NOT_GENERIC: u32 = 1010;
    pub const GENERIC_ARGUMENT_COUNT_MISMATCH: u32 = 1011;
    pub const CANNOT_INFER_GENERIC: u32 = 1012;
    pub const SUPERCLASS_MUST_BE_CLASS: u32 = 1013;
    pub const CLASS_INHERITS_ITSELF: u32 = 1014;
    pub const ONLY_INSTANCES_HAVE_FIELDS: u32 = 1015;
    pub const RETURN_OUTSIDE_FUNCTION: u32 = 1016;
    pub const THIS_OUTSIDE_CLASS: u32 = 1017;
    pub const IMPLICIT_ANY_PARAMETER: u32 = 1018;
    pub const INCOMPATIBLE_RETURN: u32 = 1019;
    pub const NOT_A_TYPE: u32 = 1020;
    pub const CHECK_DEPTH_EXCEEDED: u32 = 1021;
    pub const SUPER_OUTSIDE_CLASS: u32 = 1022;
    pub const SUPER_WITHOUT_SUPERCLASS: u32 = 1023;
    pub const INTERNAL_ERROR: u32 = 9000;
}

use self::diagnostic_codes as codes;

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: codes::INCOMPATIBLE_TYPES,
        category: DiagnosticCategory::Error,
        message: "Type '{0}' is not compatible with type '{1}'.",
    },
    DiagnosticMessage {
        code: codes::OPERANDS_MUST_BE_NUMBERS,
        category: DiagnosticCategory::Error,
        message: "Operands must be numbers.",
    },
    DiagnosticMessage {
        code: codes::OPERANDS_MUST_BE_NUMBERS_OR_STRINGS,
        category: DiagnosticCategory::Error,
        message: "Operands must be two numbers or two strings.",
    },
    DiagnosticMessage {
        code: codes::OPERAND_MUST_BE_NUMBER,
        category: DiagnosticCategory::Error,
        message: "Operand must be a number.",
    },
    DiagnosticMessage {
        code: codes::UNDEFINED_VARIABLE,
        category: DiagnosticCategory::Error,
        message: "Undefined variable '{0}'.",
    },
    DiagnosticMessage {
        code: codes::UNDEFINED_PROPERTY,
        category: DiagnosticCategory::Error,
        message: "Undefined property '{0}' on type '{1}'.",
    },
    DiagnosticMessage {
        code: codes::NOT_CALLABLE,
        category: DiagnosticCategory::Error,
        message: "Can only call functions and classes, not '{0}'.",
    },
    DiagnosticMessage {
        code: codes::ARGUMENT_COUNT_MISMATCH,
        category: DiagnosticCategory::Error,
        message: "Expected {0} arguments but got {1}.",
    },
    DiagnosticMessage {
        code: codes::UNDEFINED_TYPE,
        category: DiagnosticCategory::Error,
        message: "Undefined type '{0}'.",
    },
    DiagnosticMessage {
        code: codes::TYPE_NOT_GENERIC,
        category: DiagnosticCategory::Error,
        message: "Type '{0}' is not generic.",
    },
    DiagnosticMessage {
        code: codes::GENERIC_ARGUMENT_COUNT_MISMATCH,
        category: DiagnosticCategory::Error,
        message: "Expected {0} generic arguments but got {1}.",
    },
    DiagnosticMessage {
        code: codes::CANNOT_INFER_GENERIC,
        category: DiagnosticCategory::Error,
        message: "Unable to infer generic parameter '{0}'.",
    },
    DiagnosticMessage {
        code: codes::SUPERCLASS_MUST_BE_CLASS,
        category: DiagnosticCategory::Error,
        message: "Superclass must be a class.",
    },
    DiagnosticMessage {
        code: codes::CLASS_INHERITS_ITSELF,
        category: DiagnosticCategory::Error,
        message: "A class can't inherit from itself.",
    },
    DiagnosticMessage {
        code: codes::ONLY_INSTANCES_HAVE_FIELDS,
        category: DiagnosticCategory::Error,
        message: "Only instances have fields.",
    },
    DiagnosticMessage {
        code: codes::RETURN_OUTSIDE_FUNCTION,
        category: DiagnosticCategory::Error,
        message: "Can't return from top-level code.",
    },
    DiagnosticMessage {
        code: codes::THIS_OUTSIDE_CLASS,
        category: DiagnosticCategory::Error,
        message: "Can't use 'this' outside of a class.",
    },
    DiagnosticMessage {
        code: codes::IMPLICIT_ANY_PARAMETER,
        category: DiagnosticCategory::Error,
        message: "Parameter '{0}' implicitly has type 'Any'.",
    },
    DiagnosticMessage {
        code: codes::INCOMPATIBLE_RETURN,
        category: DiagnosticCategory::Error,
        message: "Return type '{0}' is not compatible with declared return type '{1}'.",
    },
    DiagnosticMessage {
        code: codes::NOT_A_TYPE,
        category: DiagnosticCategory::Error,
        message: "'{0}' is a value, not a type.",
    },
    DiagnosticMessage {
        code: codes::CHECK_DEPTH_EXCEEDED,
        category: DiagnosticCategory::Error,
        message: "Expression is nested too deeply to check.",
    },
    DiagnosticMessage {
        code: codes::SUPER_OUTSIDE_CLASS,
        category: DiagnosticCategory::Error,
        message: "Can't use 'super' outside of a class.",
    },
    DiagnosticMessage {
        code: codes::SUPER_WITHOUT_SUPERCLASS,
        category: DiagnosticCategory::Error,
        message: "Can't use 'super' in a class with no superclass.",
    },
    DiagnosticMessage {
        code: codes::INTERNAL_ERROR,
        category: DiagnosticCategory::Error,
        message: "Internal type checker error: {0}",
    },
];

/// Look up a diagnostic message definition by code.
///
/// Returns the `DiagnosticMessage` with template string containing `{0}`, `{1}`, etc. placeholders.
/// Use `format_message()` to fill in the placeholders.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod tests;
