//! Declarative field validation for incoming user payloads.
//!
//! The rule set is data, not logic: each field carries an ordered list of
//! [`Rule`] values, and [`Validator::check`] is a pure function that walks
//! the table and reports every violation in declaration order. An empty
//! report signals a valid payload. Validation never fails fatally; callers
//! turn the report into a structured error response.
//!
//! The validator is constructed explicitly at startup and passed to handlers
//! through shared state; there is no global instance.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use super::error::Error;
use super::user::{UserDraft, UserPayload};

/// A single declarative constraint on one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// The field must be present and, for text, non-blank.
    Required,
    /// Trimmed text must be at least this many characters.
    MinLength(usize),
    /// Trimmed text must be at most this many characters.
    MaxLength(usize),
    /// Text must look like an email address.
    Email,
    /// A numeric value must lie within the inclusive bounds.
    Range {
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
}

impl Rule {
    /// Stable identifier reported in violation records.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::MinLength(_) => "min_length",
            Self::MaxLength(_) => "max_length",
            Self::Email => "email",
            Self::Range { .. } => "range",
        }
    }

    /// The rule's parameter rendered for violation records, if it has one.
    pub fn param(&self) -> Option<String> {
        match self {
            Self::Required | Self::Email => None,
            Self::MinLength(n) | Self::MaxLength(n) => Some(n.to_string()),
            Self::Range { min, max } => Some(format!("{min}..={max}")),
        }
    }

    /// Whether `value` satisfies this rule.
    ///
    /// Absence is only an error for [`Rule::Required`]; the other rules pass
    /// on missing values so each failure is reported exactly once.
    fn is_satisfied(&self, value: &FieldValue<'_>) -> bool {
        match (self, value) {
            (Self::Required, FieldValue::Missing) => false,
            (Self::Required, FieldValue::Text(text)) => !text.trim().is_empty(),
            (Self::Required, FieldValue::Number(_)) => true,
            (Self::MinLength(min), FieldValue::Text(text)) => {
                text.trim().chars().count() >= *min
            }
            (Self::MaxLength(max), FieldValue::Text(text)) => {
                text.trim().chars().count() <= *max
            }
            (Self::Email, FieldValue::Text(text)) => email_regex().is_match(text.trim()),
            (Self::Range { min, max }, FieldValue::Number(n)) => (*min..=*max).contains(n),
            // Type-mismatched or absent values are other rules' concern.
            _ => true,
        }
    }
}

/// A field's value as seen by the rule evaluator.
enum FieldValue<'a> {
    Missing,
    Text(&'a str),
    Number(i64),
}

/// One field's ordered rule list.
#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    /// Field name as it appears in the JSON payload.
    pub field: &'static str,
    /// Rules applied in order.
    pub rules: &'static [Rule],
}

/// The user entity's rule table. This is configuration; changing the
/// constraints means editing this table, not the evaluator.
const USER_RULES: &[FieldRules] = &[
    FieldRules {
        field: "name",
        rules: &[Rule::Required, Rule::MinLength(2), Rule::MaxLength(64)],
    },
    FieldRules {
        field: "email",
        rules: &[Rule::Required, Rule::Email, Rule::MaxLength(120)],
    },
    FieldRules {
        field: "age",
        rules: &[Rule::Range { min: 13, max: 130 }],
    },
];

/// A single field/rule failure from validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Violation {
    /// The offending field, as named in the JSON payload.
    #[schema(example = "email")]
    pub field: &'static str,
    /// The rule that failed.
    #[schema(example = "required")]
    pub rule: &'static str,
    /// The rule's parameter, when it has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "64")]
    pub param: Option<String>,
}

/// Stateless validator over a declared rule table.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    rules: &'static [FieldRules],
}

impl Validator {
    /// Validator carrying the user entity's rule table.
    #[must_use]
    pub const fn users() -> Self {
        Self { rules: USER_RULES }
    }

    /// Apply the rule table to `payload`, reporting violations in
    /// declaration order. Empty means valid. Pure; no side effects.
    #[must_use]
    pub fn check(&self, payload: &UserPayload) -> Vec<Violation> {
        let mut violations = Vec::new();
        for field_rules in self.rules {
            let value = field_value(payload, field_rules.field);
            for rule in field_rules.rules {
                if !rule.is_satisfied(&value) {
                    violations.push(Violation {
                        field: field_rules.field,
                        rule: rule.code(),
                        param: rule.param(),
                    });
                }
            }
        }
        violations
    }

    /// Validate and, on success, produce the trimmed draft handed to the
    /// repository.
    ///
    /// # Errors
    ///
    /// Returns the ordered violation list when any rule fails.
    pub fn validate(&self, payload: &UserPayload) -> Result<UserDraft, Vec<Violation>> {
        let violations = self.check(payload);
        if !violations.is_empty() {
            return Err(violations);
        }
        // Required has passed, so the unwrap_or defaults are unreachable in
        // practice; they keep the happy path panic-free regardless.
        Ok(UserDraft {
            name: payload.name.as_deref().unwrap_or_default().trim().to_owned(),
            email: payload
                .email
                .as_deref()
                .unwrap_or_default()
                .trim()
                .to_owned(),
            age: payload.age,
        })
    }
}

/// Turn a violation report into the API error response.
#[must_use]
pub fn violations_error(violations: &[Violation]) -> Error {
    Error::invalid_request("User validation failed")
        .with_details(json!({ "violations": violations }))
}

fn field_value<'a>(payload: &'a UserPayload, field: &str) -> FieldValue<'a> {
    match field {
        "name" => payload
            .name
            .as_deref()
            .map_or(FieldValue::Missing, FieldValue::Text),
        "email" => payload
            .email
            .as_deref()
            .map_or(FieldValue::Missing, FieldValue::Text),
        "age" => payload
            .age
            .map_or(FieldValue::Missing, |age| FieldValue::Number(age.into())),
        _ => FieldValue::Missing,
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        // One non-space local part, one @, a dotted domain. Deliverability is
        // the mail system's problem, not the validator's.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}
