//! Lead-generation forms posted to the CMS.
//!
//! Forms are validated and normalized locally; a form that fails validation
//! is never sent.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::ValidationError;

pub const MIN_SAMPLE_QUANTITY: u32 = 1;
pub const MAX_SAMPLE_QUANTITY: u32 = 100;
pub const MIN_REQUIREMENTS_CHARS: usize = 10;

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());
static MOBILE_NUMBER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^1[3-9][0-9]{9}$").ok());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    #[default]
    Normal,
    Urgent,
    VeryUrgent,
}

/// Request for product samples.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SampleRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub company: String,
    pub position: String,
    pub sample_name: String,
    pub quantity: u32,
    pub required_date: String,
    pub purpose: String,
    pub requirements: String,
    pub address: String,
    pub urgency: Urgency,
}

impl SampleRequest {
    /// Trimmed, lower-cased-email copy, or the first rule it breaks.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        let normalized = Self {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            company: self.company.trim().to_string(),
            position: self.position.trim().to_string(),
            sample_name: self.sample_name.trim().to_string(),
            quantity: self.quantity,
            required_date: self.required_date.trim().to_string(),
            purpose: self.purpose.trim().to_string(),
            requirements: self.requirements.trim().to_string(),
            address: self.address.trim().to_string(),
            urgency: self.urgency,
        };
        normalized.validate()?;
        Ok(normalized)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&[
            ("name", &self.name),
            ("phone", &self.phone),
            ("email", &self.email),
            ("company", &self.company),
            ("sampleName", &self.sample_name),
            ("requiredDate", &self.required_date),
            ("requirements", &self.requirements),
        ])?;
        check_email(&self.email)?;
        check_phone(&self.phone)?;
        if !(MIN_SAMPLE_QUANTITY..=MAX_SAMPLE_QUANTITY).contains(&self.quantity) {
            return Err(ValidationError::QuantityOutOfRange {
                got: self.quantity,
                min: MIN_SAMPLE_QUANTITY,
                max: MAX_SAMPLE_QUANTITY,
            });
        }
        Ok(())
    }
}

/// Custom engineering inquiry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomRequest {
    pub name: String,
    pub company: String,
    pub phone: String,
    pub email: String,
    pub requirements: String,
    pub budget: String,
    pub timeline: String,
}

impl CustomRequest {
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        let normalized = Self {
            name: self.name.trim().to_string(),
            company: self.company.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            requirements: self.requirements.trim().to_string(),
            budget: self.budget.trim().to_string(),
            timeline: self.timeline.trim().to_string(),
        };
        normalized.validate()?;
        Ok(normalized)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(&[
            ("name", &self.name),
            ("company", &self.company),
            ("phone", &self.phone),
            ("email", &self.email),
            ("requirements", &self.requirements),
        ])?;
        check_email(&self.email)?;
        check_phone(&self.phone)?;
        if self.requirements.chars().count() < MIN_REQUIREMENTS_CHARS {
            return Err(ValidationError::RequirementsTooShort {
                min: MIN_REQUIREMENTS_CHARS,
            });
        }
        Ok(())
    }
}

fn require(fields: &[(&'static str, &String)]) -> Result<(), ValidationError> {
    match fields.iter().find(|(_, value)| value.is_empty()) {
        Some((field, _)) => Err(ValidationError::MissingField(*field)),
        None => Ok(()),
    }
}

fn check_email(email: &str) -> Result<(), ValidationError> {
    if is_email(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

fn check_phone(phone: &str) -> Result<(), ValidationError> {
    if is_mobile_number(phone) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone(phone.to_string()))
    }
}

/// `local@domain.tld`: one `@`, no whitespace, and a dot inside the domain.
pub fn is_email(email: &str) -> bool {
    EMAIL.as_ref().is_some_and(|re| re.is_match(email))
}

/// Mainland China mobile number: `1`, then `3`-`9`, then nine digits.
pub fn is_mobile_number(phone: &str) -> bool {
    MOBILE_NUMBER.as_ref().is_some_and(|re| re.is_match(phone))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn sample() -> SampleRequest {
        SampleRequest {
            name: " Li Wei ".to_string(),
            phone: "13812345678".to_string(),
            email: " Li.Wei@Example.COM ".to_string(),
            company: "Acme Automation".to_string(),
            sample_name: "YX-IPC-3000".to_string(),
            quantity: 2,
            required_date: "2026-11-01".to_string(),
            requirements: "Two units for line trial".to_string(),
            ..SampleRequest::default()
        }
    }

    fn custom() -> CustomRequest {
        CustomRequest {
            name: "Li Wei".to_string(),
            company: "Acme Automation".to_string(),
            phone: "15900001111".to_string(),
            email: "li@example.com".to_string(),
            requirements: "  Fanless box with 6 COM ports  ".to_string(),
            budget: "  ".to_string(),
            ..CustomRequest::default()
        }
    }

    #[test]
    fn test_sample_normalizes() {
        let normalized = sample().normalized().unwrap();
        assert_eq!(normalized.name, "Li Wei");
        assert_eq!(normalized.email, "li.wei@example.com");
        assert_eq!(normalized.urgency, Urgency::Normal);
    }

    #[test]
    fn test_sample_missing_field() {
        let request = SampleRequest {
            sample_name: "   ".to_string(),
            ..sample()
        };
        assert_eq!(
            request.normalized(),
            Err(ValidationError::MissingField("sampleName"))
        );
    }

    #[test]
    fn test_sample_quantity_bounds() {
        for quantity in [0, 101] {
            let request = SampleRequest {
                quantity,
                ..sample()
            };
            assert!(matches!(
                request.normalized(),
                Err(ValidationError::QuantityOutOfRange { .. })
            ));
        }
        for quantity in [1, 100] {
            let request = SampleRequest {
                quantity,
                ..sample()
            };
            assert!(request.normalized().is_ok());
        }
    }

    #[test]
    fn test_sample_wire_format() {
        let request = SampleRequest {
            urgency: Urgency::VeryUrgent,
            ..sample()
        };
        let value = serde_json::to_value(request.normalized().unwrap()).unwrap();
        assert_eq!(value["sampleName"], "YX-IPC-3000");
        assert_eq!(value["requiredDate"], "2026-11-01");
        assert_eq!(value["urgency"], "very_urgent");
    }

    #[test]
    fn test_sample_deserializes_partial_input() {
        let request: SampleRequest =
            serde_json::from_str(r#"{"name": "Li", "urgency": "urgent", "quantity": 3}"#).unwrap();
        assert_eq!(request.urgency, Urgency::Urgent);
        assert_eq!(
            request.normalized(),
            Err(ValidationError::MissingField("phone"))
        );
    }

    #[test]
    fn test_custom_normalizes_optional_fields() {
        let normalized = custom().normalized().unwrap();
        assert_eq!(normalized.requirements, "Fanless box with 6 COM ports");
        assert_eq!(normalized.budget, "");
        assert_eq!(normalized.timeline, "");
    }

    #[test]
    fn test_custom_requirements_too_short() {
        let request = CustomRequest {
            requirements: "  exactly10! ".to_string(),
            ..custom()
        };
        assert!(request.normalized().is_ok());

        let request = CustomRequest {
            requirements: " 太短了 ".to_string(),
            ..custom()
        };
        assert_eq!(
            request.normalized(),
            Err(ValidationError::RequirementsTooShort { min: 10 })
        );
    }

    #[test]
    fn test_patterns_compile() {
        assert!(EMAIL.is_some());
        assert!(MOBILE_NUMBER.is_some());
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_email("a@b.co"));
        assert!(is_email("first.last@sub.example.com"));
        assert!(!is_email("a@b"));
        assert!(!is_email("a@.com"));
        assert!(!is_email("a@com."));
        assert!(!is_email("@b.com"));
        assert!(!is_email("a@@b.com"));
        assert!(!is_email("a b@c.com"));
    }

    #[test]
    fn test_mobile_numbers() {
        assert!(is_mobile_number("13800138000"));
        assert!(is_mobile_number("19912345678"));
        assert!(!is_mobile_number("12800138000"));
        assert!(!is_mobile_number("1380013800"));
        assert!(!is_mobile_number("138001380001"));
        assert!(!is_mobile_number("1380013800a"));
        assert!(!is_mobile_number("+8613800138"));
    }

    #[test]
    fn test_invalid_phone_reported() {
        let request = CustomRequest {
            phone: "010-12345678".to_string(),
            ..custom()
        };
        assert_eq!(
            request.normalized(),
            Err(ValidationError::InvalidPhone("010-12345678".to_string()))
        );
    }
}
