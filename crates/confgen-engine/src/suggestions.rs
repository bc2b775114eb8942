//! Fuzzy matching suggestions for template errors
//!
//! MiniJinja phrases its errors in a few different ways, so the helpers
//! here scan every word of the message against the known names instead of
//! relying on one exact wording.

/// Maximum Levenshtein distance to consider for suggestions
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// All registered filters in the engine
pub const AVAILABLE_FILTERS: &[&str] = &[
    // Embedding filters
    "toyaml",
    "tojson",
    "indent",
    "nindent",
    // Built-in MiniJinja filters
    "default",
    "upper",
    "lower",
    "title",
    "capitalize",
    "replace",
    "trim",
    "join",
    "first",
    "last",
    "length",
    "lines",
    "reverse",
    "sort",
    "unique",
    "map",
    "select",
    "reject",
    "items",
    "int",
    "float",
    "string",
    "list",
    "safe",
    "urlencode",
];

/// Functions every engine exposes
pub const AVAILABLE_FUNCTIONS: &[&str] = &[
    "parseToConfigYaml",
    "parseToConfigYamlOpts",
    "parseToOpenApiJson",
    "deleteCurrent",
    // Built-in MiniJinja globals
    "range",
    "dict",
    "namespace",
];

/// Top-level context variables always available in templates
pub const CONTEXT_VARIABLES: &[&str] = &["crd"];

/// Suggestion result
#[derive(Debug, Clone)]
pub struct Suggestion {
    /// The suggested correction
    pub text: String,
    /// Levenshtein distance (lower = better match)
    pub distance: usize,
}

/// Find closest matches from a list of candidates
pub fn find_closest_matches(input: &str, candidates: &[&str], max_results: usize) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = strsim::levenshtein(input, candidate);
            (distance <= MAX_SUGGESTION_DISTANCE && distance > 0).then(|| Suggestion {
                text: candidate.to_string(),
                distance,
            })
        })
        .collect();

    suggestions.sort_by_key(|s| s.distance);
    suggestions.truncate(max_results);
    suggestions
}

/// Best match for any identifier-like word of `message`
///
/// Words that already name a candidate exactly are skipped so the known
/// name in a phrase such as "did you mean" never matches itself.
pub fn closest_in_message(message: &str, candidates: &[&str]) -> Option<Suggestion> {
    message
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| word.len() > 2 && !candidates.contains(word))
        .filter_map(|word| find_closest_matches(word, candidates, 1).into_iter().next())
        .min_by_key(|s| s.distance)
}

/// Suggest a correction for an undefined variable
pub fn suggest_undefined_variable(message: &str) -> Option<String> {
    closest_in_message(message, CONTEXT_VARIABLES).map(|s| format!("Did you mean `{}`?", s.text))
}

/// Suggest a correction for an unknown filter
pub fn suggest_unknown_filter(message: &str) -> Option<String> {
    closest_in_message(message, AVAILABLE_FILTERS).map(|s| {
        format!(
            "Did you mean `{}`? Common filters: nindent, indent, toyaml, tojson",
            s.text
        )
    })
}

/// Suggest a correction for an unknown function
pub fn suggest_unknown_function(message: &str) -> Option<String> {
    match closest_in_message(message, AVAILABLE_FUNCTIONS) {
        Some(s) => Some(format!("Did you mean `{}`?", s.text)),
        None => Some(format!(
            "Available functions: {}",
            AVAILABLE_FUNCTIONS.join(", ")
        )),
    }
}

/// Hint for iterating over something that is not a sequence
pub fn suggest_iteration_fix() -> String {
    "`crd` is plain text. Iterate over `crd | lines` to walk it line by line".to_string()
}
