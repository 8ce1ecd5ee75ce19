/// Marketplace data models
///
/// # Models
///
/// - `user`: Accounts with an immutable client/provider role
/// - `project`: Work requests and their lifecycle state machine
/// - `quote`: Provider bids on projects
/// - `review`: Post-completion ratings between participants
/// - `rating`: Rating aggregation over received reviews
///
/// Each model module also carries its input type (validated with `validator`),
/// the row data used by the store, and the response projection with
/// read-time joined fields. Inputs are trimmed by their `normalized()` before
/// validation, so whitespace-only text fails the same length rules as empty
/// text.

pub mod project;
pub mod quote;
pub mod rating;
pub mod review;
pub mod user;

/// Trims surrounding whitespace
pub(crate) fn trimmed(value: String) -> String {
    value.trim().to_string()
}

/// Trims an optional field, dropping it when nothing is left
pub(crate) fn trimmed_opt(value: Option<String>) -> Option<String> {
    value.map(trimmed).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed() {
        assert_eq!(trimmed("  Ana ".to_string()), "Ana");
        assert_eq!(trimmed("   ".to_string()), "");
        assert_eq!(trimmed_opt(Some(" \t".to_string())), None);
        assert_eq!(trimmed_opt(Some(" @ana ".to_string())), Some("@ana".to_string()));
    }
}
