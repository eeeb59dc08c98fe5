//! Host OS filtering of samples

use super::sample::Sample;

/// Host OS name using the catalog's vocabulary
pub fn host_os() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

/// Keep samples without OS tags, or with a tag matching `host` (case-insensitive)
pub fn filter_on_os(samples: Vec<Sample>, host: &str) -> Vec<Sample> {
    samples
        .into_iter()
        .filter(|s| {
            s.fields.os.is_empty() || s.fields.os.iter().any(|os| os.eq_ignore_ascii_case(host))
        })
        .collect()
}
