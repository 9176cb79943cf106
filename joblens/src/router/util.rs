use joblens_core::{Capability, JoblensError};

/// Key of the report cache for `query`: case- and whitespace-insensitive.
#[must_use]
pub fn report_cache_key(query: &str) -> String {
    format!("analytics:{}", query.trim().to_lowercase())
}

/// Collapse the errors of one unit of work into a single `JoblensError`.
///
/// Rules:
/// - No errors → `Unsupported(capability)`.
/// - Exactly one error → that error.
/// - Else → `AllProvidersFailed(errors)`.
pub fn collapse_errors(capability: Capability, mut errors: Vec<JoblensError>) -> JoblensError {
    match errors.len() {
        0 => JoblensError::unsupported(capability.to_string()),
        1 => errors.remove(0),
        _ => JoblensError::AllProvidersFailed(errors),
    }
}
