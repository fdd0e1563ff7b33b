//! CVE identifier extraction

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// `CVE-<4 digits>-<4-7 digits>`, ASCII digits only
pub const CVE_PATTERN: &str = r"CVE-[0-9]{4}-[0-9]{4,7}";

static CVE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(CVE_PATTERN).expect("valid CVE pattern"));

/// Collect the distinct CVE identifiers mentioned in `text`.
///
/// Returns `None` when nothing matches so callers can store a null rather
/// than an empty set.
pub fn extract_cve_ids(text: &str) -> Option<BTreeSet<String>> {
    let ids: BTreeSet<String> = CVE_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();

    (!ids.is_empty()).then_some(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_identifier() {
        let ids = extract_cve_ids("Report on CVE-2014-0317 Incident").unwrap();
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec!["CVE-2014-0317"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let ids = extract_cve_ids("CVE-2021-44228 and again CVE-2021-44228, plus CVE-2017-11882")
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("CVE-2021-44228"));
        assert!(ids.contains("CVE-2017-11882"));
    }

    #[test]
    fn test_no_identifiers_is_none() {
        assert_eq!(extract_cve_ids("Operation ShadowHammer"), None);
        assert_eq!(extract_cve_ids(""), None);
        assert_eq!(extract_cve_ids("CVE-14-0317 and cve-2014-0317"), None);
    }

    #[test]
    fn test_suffix_is_capped_at_seven_digits() {
        let ids = extract_cve_ids("CVE-2014-031712345").unwrap();
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec!["CVE-2014-0317123"]);
    }

    proptest! {
        #[test]
        fn prop_every_id_matches_pattern_once(text in ".{0,200}", year in 1999u32..2100, seq in 1000u32..9_999_999) {
            let planted = format!("CVE-{year}-{seq}");
            let haystack = format!("{text} {planted} {text} {planted}");
            let anchored = Regex::new(&format!("^{CVE_PATTERN}$")).unwrap();

            let ids = extract_cve_ids(&haystack).unwrap();
            prop_assert!(ids.iter().all(|id| anchored.is_match(id)));

            let as_vec: Vec<&String> = ids.iter().collect();
            let mut deduped = as_vec.clone();
            deduped.dedup();
            prop_assert_eq!(as_vec.len(), deduped.len());
        }
    }
}
