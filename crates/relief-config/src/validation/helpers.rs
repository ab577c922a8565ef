//! Shared validation helpers.

/// Push an error if `value` is outside `[min, max]`.
pub(crate) fn validate_range<T>(errors: &mut Vec<String>, name: &str, value: T, min: T, max: T)
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error if `value` is empty or only whitespace.
pub(crate) fn validate_not_blank(errors: &mut Vec<String>, name: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{name} must not be empty"));
    }
}
