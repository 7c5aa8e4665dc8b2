use std::{collections::BTreeMap, fmt};

use shared::{
    domain::{Cents, CustomerId, InvoiceStatus},
    error::FieldErrors,
    protocol::{CustomerPayload, InvoicePayload},
};
use validator::{Validate, ValidationError, ValidationErrors};

/// Untyped form submission: field name to raw string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawForm {
    fields: BTreeMap<String, String>,
}

impl RawForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    fn text(&self, names: &[&str]) -> String {
        names
            .iter()
            .find_map(|name| self.get(name))
            .unwrap_or_default()
            .to_string()
    }
}

impl<K, V> FromIterator<(K, V)> for RawForm
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = RawForm::new();
        for (field, value) in iter {
            form.insert(field, value);
        }
        form
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn known_status(value: &str) -> Result<(), ValidationError> {
    match InvoiceStatus::parse(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("status")),
    }
}

#[derive(Debug, Validate)]
struct InvoiceInput {
    #[validate(custom(function = "not_blank", message = "Please select a customer."))]
    customer_id: String,
    #[validate(
        required(message = "Please enter an amount."),
        range(exclusive_min = 0.0, message = "Please enter an amount greater than $0.")
    )]
    amount: Option<f64>,
    #[validate(custom(function = "known_status", message = "Please select an invoice status."))]
    status: String,
}

#[derive(Debug, Validate)]
struct CustomerInput {
    #[validate(custom(function = "not_blank", message = "Please enter a name."))]
    name: String,
    #[validate(custom(function = "not_blank", message = "Please enter an email."))]
    email: String,
    #[validate(custom(function = "not_blank", message = "Please enter an image url."))]
    image_url: String,
}

/// Email/password pair submitted on the login form.
#[derive(Clone, Validate)]
pub struct Credentials {
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn from_form(form: &RawForm) -> Self {
        Self {
            email: form.text(&["email"]).trim().to_string(),
            password: form.text(&["password"]),
        }
    }

    pub fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(into_field_errors)
    }
}

/// Coerces a form value to a number; blank or unparsable input counts as missing.
fn coerce_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Validates an invoice form into the body sent to the resource API.
///
/// Accepts `customer_id` or the form's `customerId` spelling. The amount is entered in
/// dollars and leaves here in cents.
pub fn validate_invoice(form: &RawForm) -> Result<InvoicePayload, FieldErrors> {
    let input = InvoiceInput {
        customer_id: form.text(&["customer_id", "customerId"]),
        amount: coerce_amount(&form.text(&["amount"])),
        status: form.text(&["status"]),
    };
    input.validate().map_err(into_field_errors)?;

    let (Some(status), Some(dollars)) = (InvoiceStatus::parse(&input.status), input.amount) else {
        return Err(field_error("amount", "required"));
    };
    // The API sees cents, so positivity is checked after rounding.
    let amount = match Cents::from_dollars(dollars) {
        Some(cents) if cents.is_positive() => cents,
        Some(_) => return Err(field_error("amount", "range")),
        None => return Err(field_error("amount", "overflow")),
    };
    Ok(InvoicePayload {
        customer_id: CustomerId::new(input.customer_id.trim()),
        amount,
        status,
    })
}

/// Validates a customer form. Values are trimmed; the email is only checked for presence.
pub fn validate_customer(form: &RawForm) -> Result<CustomerPayload, FieldErrors> {
    let input = CustomerInput {
        name: form.text(&["name"]),
        email: form.text(&["email"]),
        image_url: form.text(&["image_url", "imageUrl"]),
    };
    input.validate().map_err(into_field_errors)?;
    Ok(CustomerPayload {
        name: input.name.trim().to_string(),
        email: input.email.trim().to_string(),
        image_url: input.image_url.trim().to_string(),
    })
}

/// The id of the record an update or delete targets.
pub fn validate_id(id: &str) -> Result<String, FieldErrors> {
    let id = id.trim();
    if id.is_empty() {
        return Err(field_error("id", "blank"));
    }
    Ok(id.to_string())
}

fn into_field_errors(errors: ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map(|message| message.to_string())
                .unwrap_or_else(|| fallback_message(&field, &error.code).to_string());
            out.push(field.to_string(), message);
        }
    }
    out
}

fn field_error(field: &str, code: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.push(field, fallback_message(field, code));
    errors
}

fn fallback_message(field: &str, code: &str) -> &'static str {
    match (field, code) {
        ("customer_id", _) => "Please select a customer.",
        ("amount", "range") => "Please enter an amount greater than $0.",
        ("amount", "overflow") => "Please enter a smaller amount.",
        ("amount", _) => "Please enter an amount.",
        ("status", _) => "Please select an invoice status.",
        ("name", _) => "Please enter a name.",
        ("email", "email") => "Please enter a valid email address.",
        ("email", _) => "Please enter an email.",
        ("image_url", _) => "Please enter an image url.",
        ("password", _) => "Password must be at least 6 characters.",
        ("id", _) => "Missing record id.",
        _ => "Invalid value.",
    }
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
