//! Validation gate
//!
//! Runs the `validator` derive rules on incoming payloads and flattens the
//! result into an ordered list of [`Violation`]s. Callers that want a single
//! failure use [`ensure_valid`], which joins the rendered violations with
//! newlines into [`RegistryError::Validation`].

use crate::error::{Entity, RegistryError, RegistryResult};
use crate::models::{CertificateCreate, TagCreate, TagUpdate};
use std::borrow::Cow;
use std::fmt;
use validator::{Validate, ValidationError, ValidationErrors};

/// A payload the gate knows how to attribute to an entity
pub trait Validated: Validate {
    const ENTITY: Entity;
}

impl Validated for CertificateCreate {
    const ENTITY: Entity = Entity::Certificate;
}

impl Validated for TagCreate {
    const ENTITY: Entity = Entity::Tag;
}

impl Validated for TagUpdate {
    const ENTITY: Entity = Entity::Tag;
}

/// One failed rule on one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub entity: Entity,
    pub field: String,
    pub rule: String,
    pub reason: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Key: '{}.{}' Error: Field validation for '{}' failed on the '{}' tag ({})",
            self.entity.type_name(),
            self.field,
            self.field,
            self.rule,
            self.reason
        )
    }
}

/// Validate a payload; an empty list means valid
pub fn validate<T: Validated>(value: &T) -> Vec<Violation> {
    match value.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => collect(T::ENTITY, &errors),
    }
}

/// Validate a payload and fold any violations into one error
pub fn ensure_valid<T: Validated>(value: &T) -> RegistryResult<()> {
    let violations = validate(value);
    if violations.is_empty() {
        return Ok(());
    }
    Err(RegistryError::validation(render(&violations)))
}

/// Newline-joined rendering of a violation list
pub fn render(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rejects any value containing a whitespace character
pub fn validate_no_whitespace(value: &str) -> Result<(), ValidationError> {
    if value.chars().any(char::is_whitespace) {
        return Err(ValidationError::new("no_whitespace")
            .with_message(Cow::Borrowed("must not contain whitespace")));
    }
    Ok(())
}

fn collect(entity: Entity, errors: &ValidationErrors) -> Vec<Violation> {
    let mut violations: Vec<Violation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| Violation {
                entity,
                field: field.to_string(),
                rule: e.code.to_string(),
                reason: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();
    // HashMap order is unstable; keep output deterministic
    violations.sort_by(|a, b| (&a.field, &a.rule).cmp(&(&b.field, &b.rule)));
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cert_payload(fingerprint: &str) -> CertificateCreate {
        CertificateCreate {
            fingerprint: fingerprint.to_string(),
            subject: "CN=leaf".into(),
            issuer: "CN=root".into(),
            serial_number: "1".into(),
            signature_algorithm: "ecdsa-with-SHA256".into(),
            authority_key_id: String::new(),
            subject_key_id: String::new(),
            sans: String::new(),
            ocsp: String::new(),
            crl: String::new(),
            issuing_ca_url: String::new(),
            is_ca: false,
            not_before: 0,
            not_after: 0,
            pem: String::new(),
        }
    }

    #[test]
    fn test_tag_name_with_space_rejected() {
        let violations = validate(&TagCreate::new("prod east"));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "name");
        assert_eq!(violations[0].rule, "no_whitespace");
    }

    #[test]
    fn test_tag_name_with_tab_or_newline_rejected() {
        assert!(!validate(&TagCreate::new("a\tb")).is_empty());
        assert!(!validate(&TagCreate::new("a\nb")).is_empty());
    }

    #[test]
    fn test_tag_name_boundaries() {
        assert!(validate(&TagCreate::new("x".repeat(50))).is_empty());
        assert!(validate(&TagCreate::new("production")).is_empty());

        let too_long = validate(&TagCreate::new("x".repeat(51)));
        assert_eq!(too_long.len(), 1);
        assert_eq!(too_long[0].rule, "length");

        let empty = validate(&TagCreate::new(""));
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].rule, "length");
    }

    #[test]
    fn test_tag_description_limit() {
        let ok = TagCreate::new("db").with_description("d".repeat(100));
        assert!(validate(&ok).is_empty());

        let bad = TagCreate::new("db").with_description("d".repeat(101));
        let violations = validate(&bad);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "description");

        let update = TagUpdate {
            description: Some("d".repeat(101)),
        };
        assert_eq!(validate(&update).len(), 1);
    }

    #[test]
    fn test_certificate_requires_fingerprint() {
        assert!(validate(&cert_payload("ab")).is_empty());
        let violations = validate(&cert_payload(""));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].entity, Entity::Certificate);
        assert_eq!(violations[0].field, "fingerprint");
    }

    #[test]
    fn test_rendering_and_join() {
        let bad = TagCreate::new(format!("{} x", "y".repeat(50))).with_description("d".repeat(101));
        let err = ensure_valid(&bad).unwrap_err();
        let RegistryError::Validation(msg) = err else {
            panic!("expected validation error");
        };
        let lines: Vec<&str> = msg.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Key: 'Tag.description' Error: Field validation for 'description' failed on the 'length' tag"));
        assert_eq!(
            lines[2],
            "Key: 'Tag.name' Error: Field validation for 'name' failed on the 'no_whitespace' tag (must not contain whitespace)"
        );
    }

    #[test]
    fn test_ensure_valid_ok() {
        assert!(ensure_valid(&TagCreate::new("edge")).is_ok());
    }
}
