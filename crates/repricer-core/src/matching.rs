/// Sentinel option in the set selector that disables set filtering
pub const ALL_SETS: &str = "All Set Names";

/// How the set selector should be driven for a requested set label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetChoice {
    /// An option with exactly the requested text exists
    Exact(String),
    /// First option containing the label (or its first word)
    Partial(String),
    /// Nothing matched; search across all sets
    AllSets,
}

impl SetChoice {
    /// Visible option text to select
    pub fn option_text(&self) -> &str {
        match self {
            SetChoice::Exact(text) | SetChoice::Partial(text) => text,
            SetChoice::AllSets => ALL_SETS,
        }
    }
}

/// Pick the set option for `desired` from `options` in displayed order.
///
/// Exact match wins. Otherwise the first non-sentinel option whose text
/// contains the whole label, or the label's first word, case-insensitively.
pub fn choose_set_option<S: AsRef<str>>(options: &[S], desired: &str) -> SetChoice {
    if !desired.is_empty()
        && let Some(exact) = options.iter().find(|o| o.as_ref() == desired)
    {
        return SetChoice::Exact(exact.as_ref().to_string());
    }

    let wanted = desired.trim().to_lowercase();
    let first_token = wanted.split_whitespace().next();

    if let Some(token) = first_token {
        for option in options {
            let text = option.as_ref();
            if text == ALL_SETS {
                continue;
            }

            let lowered = text.to_lowercase();
            if lowered.contains(&wanted) || lowered.contains(token) {
                return SetChoice::Partial(text.to_string());
            }
        }
    }

    SetChoice::AllSets
}
