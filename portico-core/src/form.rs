//! Contact form validation with a simulated send.

use crate::config::FormCfg;
use crate::node::Node;
use once_cell::sync::Lazy;
use regex::Regex;

// WHATWG "valid email address" production.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

/// A form control with built-in validity rules.
pub trait FormField: Node {
    fn check_validity(&self) -> bool;
}

pub trait FormHandle {
    /// Restore every control to its initial value.
    fn reset(&self);
}

/// Blocking confirmation shown to the user.
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Constraint a control carries, mirroring the HTML attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldRule {
    Required,
    RequiredEmail,
    Email,
    Free,
}

impl FieldRule {
    #[must_use]
    pub fn from_attributes(required: bool, input_type: Option<&str>) -> Self {
        let email = input_type.is_some_and(|t| t.eq_ignore_ascii_case("email"));
        match (required, email) {
            (true, true) => Self::RequiredEmail,
            (true, false) => Self::Required,
            (false, true) => Self::Email,
            (false, false) => Self::Free,
        }
    }

    #[must_use]
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Self::Free => true,
            Self::Required => !value.is_empty(),
            Self::Email => value.trim().is_empty() || is_valid_email(value.trim()),
            Self::RequiredEmail => is_valid_email(value.trim()),
        }
    }
}

#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    Rejected { invalid: Vec<String> },
}

/// A configured control; `None` when the page does not carry it.
pub type FormSlot<F> = (String, Option<F>);

pub struct ContactForm<F, H, M> {
    fields: Vec<FormSlot<F>>,
    form: H,
    notifier: M,
    invalid_class: String,
    confirmation: String,
}

impl<F: FormField, H: FormHandle, M: Notifier> ContactForm<F, H, M> {
    pub fn new(fields: Vec<FormSlot<F>>, form: H, notifier: M, cfg: &FormCfg) -> Self {
        Self {
            fields,
            form,
            notifier,
            invalid_class: cfg.invalid_class.clone(),
            confirmation: cfg.confirmation.clone(),
        }
    }

    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Names of configured fields missing from the page.
    #[must_use]
    pub fn absent_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, field)| field.is_none())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Validate every field; when all pass, reset and confirm. A missing
    /// field never passes.
    pub fn submit(&self) -> SubmitOutcome {
        let mut invalid = Vec::new();
        for (name, field) in &self.fields {
            let valid = field.as_ref().is_some_and(|field| {
                let valid = field.check_validity();
                field.set_class(&self.invalid_class, !valid);
                valid
            });
            if !valid {
                invalid.push(name.clone());
            }
        }
        if !invalid.is_empty() {
            log::debug!("contact form rejected: {invalid:?}");
            return SubmitOutcome::Rejected { invalid };
        }
        self.form.reset();
        self.notifier.notify(&self.confirmation);
        SubmitOutcome::Sent
    }
}
