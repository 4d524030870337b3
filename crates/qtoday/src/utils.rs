use crate::types::DateKey;

/// Builds the ordered list of pages to try for `date`.
///
/// Date-qualified pages come first; the last entry is the undated page, which serves
/// whatever devotional is live on the site at request time. Without a date only the
/// undated page is tried.
pub fn source_candidates(base_url: &str, date: Option<&DateKey>) -> Vec<String> {
    let base_url = base_url.trim_end_matches('/');
    let mut candidates = Vec::with_capacity(3);
    if let Some(date) = date {
        candidates.push(format!("{}/qt/view/bible.asp?qtDate={}", base_url, date));
        candidates.push(format!("{}/qt/view2/bible.asp?qtDate={}", base_url, date));
    }
    candidates.push(format!("{}/qt/view/bible.asp", base_url));
    candidates
}

/// Collapses whitespace runs to single spaces and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
