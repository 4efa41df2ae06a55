//! Field validation for console payloads.

use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

mod countries;
pub use countries::{COUNTRIES, CountryDialing, find_country};

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Field name -> first message reported for it.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<S: Into<String>>(&mut self, field: &'static str, message: S) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn check(&mut self, field: &'static str, ok: bool, message: &str) {
        if !ok {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.0.keys().copied().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

static PERSON_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{L}[\p{L}\p{M} .'\-]{1,99}$").expect("valid regex"));
static ORG_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\p{N}][\p{L}\p{M}\p{N} .,'&\-]{1,99}$").expect("valid regex")
});
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("valid regex"));
static E164: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[1-9][0-9]{6,14}$").expect("valid regex"));
static CURRENCY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid regex"));

pub fn is_valid_person_name(name: &str) -> bool {
    PERSON_NAME.is_match(name.trim())
}

/// Company, brand and product names; digits and `&` are allowed.
pub fn is_valid_org_name(name: &str) -> bool {
    ORG_NAME.is_match(name.trim())
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL.is_match(email)
}

pub fn is_valid_country(iso: &str) -> bool {
    find_country(iso).is_some()
}

pub fn is_valid_currency(code: &str) -> bool {
    CURRENCY.is_match(code)
}

/// Strips the separators people type into phone fields.
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect()
}

/// Checks `phone` against E.164 shape and, when `country` is a known ISO code, against that
/// country's dial code and national number length.
pub fn validate_phone(phone: &str, country: Option<&str>) -> Result<(), &'static str> {
    let phone = normalize_phone(phone);
    if !E164.is_match(&phone) {
        return Err("phone must be in international format, e.g. +14155550123");
    }

    let Some(dialing) = country.and_then(find_country) else {
        return Ok(());
    };

    let digits = &phone[1..];
    let Some(national) = digits.strip_prefix(dialing.dial_code) else {
        return Err("phone does not match the country dial code");
    };

    if (dialing.min_len..=dialing.max_len).contains(&national.len()) {
        Ok(())
    } else {
        Err("phone number length is invalid for the country")
    }
}

/// Shared checks for the optional `phone`/`country` pair carried by most payloads.
pub fn check_contact(
    errors: &mut ValidationErrors,
    phone: Option<&str>,
    country: Option<&str>,
) {
    if let Some(country) = country {
        errors.check("country", is_valid_country(country), "unknown country code");
    }
    if let Some(phone) = phone {
        if let Err(msg) = validate_phone(phone, country) {
            errors.add("phone", msg);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn person_names() {
        assert!(is_valid_person_name("Ada Lovelace"));
        assert!(is_valid_person_name("Zoë O'Neill-Smith"));
        assert!(is_valid_person_name("Jürgen"));
        assert!(!is_valid_person_name("A"));
        assert!(!is_valid_person_name("R2D2"));
        assert!(!is_valid_person_name("   "));
        assert!(!is_valid_person_name(&"a".repeat(101)));
    }

    #[test]
    fn org_names() {
        assert!(is_valid_org_name("Acme & Sons Ltd."));
        assert!(is_valid_org_name("3M"));
        assert!(!is_valid_org_name("<script>"));
    }

    #[test]
    fn emails() {
        assert!(is_valid_email("ops@example.com"));
        assert!(!is_valid_email("ops@example"));
        assert!(!is_valid_email("ops example.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn phone_without_country_checks_shape_only() {
        assert!(validate_phone("+44 20 7946 0958", None).is_ok());
        assert!(validate_phone("020 7946 0958", None).is_err());
        assert!(validate_phone("+0123456789", None).is_err());
    }

    #[test]
    fn phone_digits_are_ascii_only() {
        // Arabic-Indic, Devanagari and fullwidth digits
        assert!(validate_phone("+1٢٣٤٥٦٧٨٩", None).is_err());
        assert!(validate_phone("+44२०७९४६०९५८", Some("GB")).is_err());
        assert!(validate_phone("+１４１５５５５０１２３", None).is_err());
        assert!(validate_phone("+14155550123", None).is_ok());
    }

    #[test]
    fn phone_must_match_country() {
        assert!(validate_phone("+1 (415) 555-0123", Some("US")).is_ok());
        assert!(validate_phone("+4915112345678", Some("de")).is_ok());
        assert_eq!(
            validate_phone("+4915112345678", Some("FR")),
            Err("phone does not match the country dial code")
        );
        assert_eq!(
            validate_phone("+1415555012", Some("US")),
            Err("phone number length is invalid for the country")
        );
    }

    #[test]
    fn contact_collects_both_fields() {
        let mut errors = ValidationErrors::new();
        check_contact(&mut errors, Some("12345"), Some("ZZ"));
        assert!(errors.get("country").is_some());
        assert!(errors.get("phone").is_some());
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn currency_codes() {
        assert!(is_valid_currency("EUR"));
        assert!(!is_valid_currency("eur"));
        assert!(!is_valid_currency("EURO"));
    }
}
