use crate::SubmitError;

/// The forms a user can submit from the portal screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    InsuranceApplication,
    Claim,
    Consultation,
}

impl FormKind {
    #[must_use]
    pub fn success_message(self) -> &'static str {
        match self {
            Self::InsuranceApplication => "Insurance application submitted successfully!",
            Self::Claim => "Claim submitted successfully!",
            Self::Consultation => "Consultation booked successfully!",
        }
    }

    #[must_use]
    pub fn unauthorized_message(self) -> &'static str {
        match self {
            Self::InsuranceApplication => "Please log in to apply for insurance",
            Self::Claim => "Please log in to file a claim",
            Self::Consultation => "Please log in to book consultations",
        }
    }

    #[must_use]
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::InsuranceApplication => "Error submitting application. Please try again.",
            Self::Claim => "Error submitting claim. Please try again.",
            Self::Consultation => "Error booking consultation. Please try again.",
        }
    }
}

/// Non-empty check, the only validation forms perform.
pub fn require(field: &'static str, value: &str) -> Result<(), SubmitError> {
    if value.is_empty() {
        Err(SubmitError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Best-effort numeric coercion of form text.
///
/// Parses the longest numeric prefix after leading whitespace, so
/// `"5 acres"` is `5.0`. Text without a numeric prefix yields `NaN`.
#[must_use]
pub fn coerce_number(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if text[end..].starts_with("Infinity") {
        return if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse().unwrap_or(f64::NAN)
}

/// Numeric value embedded in display text such as `"₹750/acre/year"`.
/// Every character other than digits and `.` is dropped before coercion.
#[must_use]
pub fn numeric_part(text: &str) -> f64 {
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    coerce_number(&digits)
}

/// Like [`coerce_number`] but `NaN` becomes `0.0`.
#[must_use]
pub fn coerce_amount(text: &str) -> f64 {
    let value = coerce_number(text);
    if value.is_nan() {
        0.0
    } else {
        value
    }
}
