use crate::{
    catalog::{self, Axis},
    config::ProfileSet,
};

// ── Verdicts ──────────────────────────────────────────────────────────────────

/// Outcome of checking one candidate value against an axis catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Passes as-is.
    Accepted,
    /// Passes after alias rewriting; use the payload instead.
    Normalized(String),
    /// Outside the catalog but tolerated; the caller should warn.
    Unlisted(String),
    /// Not allowed. The caller prints the axis catalog.
    Rejected,
}

/// Outcome of checking a comma-separated profile list. One bad token
/// rejects the whole list, naming the first offender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListVerdict {
    Accepted(ProfileSet),
    Rejected { token: String },
}

// ── Checks ────────────────────────────────────────────────────────────────────

/// The single check shape shared by every axis: normalize, then decide
/// between exact membership, tolerated unlisted values, and rejection.
pub fn check_value(axis: Axis, candidate: &str, allow_empty: bool, allow_unlisted: bool) -> Verdict {
    if candidate.is_empty() {
        return if allow_empty { Verdict::Accepted } else { Verdict::Rejected };
    }

    let normalized = match axis {
        Axis::Architecture => catalog::normalize_architecture(candidate),
        _ => candidate,
    };

    if axis.lists(normalized) {
        if normalized == candidate {
            Verdict::Accepted
        } else {
            Verdict::Normalized(normalized.to_string())
        }
    } else if allow_unlisted {
        Verdict::Unlisted(normalized.to_string())
    } else {
        Verdict::Rejected
    }
}

/// Architectures outside the catalog are accepted with a warning; mkosi
/// knows more targets than the curated list shows.
pub fn check_architecture(candidate: &str) -> Verdict {
    check_value(Axis::Architecture, candidate, false, true)
}

/// Distributions are strict: the image definitions only cover the catalog.
pub fn check_distribution(candidate: &str) -> Verdict {
    check_value(Axis::Distribution, candidate, false, false)
}

/// Validates every token of a comma list against the profile catalog.
/// Matching is exact and case-sensitive; blank tokens are ignored; an
/// empty list is a valid "no profiles" choice.
pub fn check_profiles(candidate: &str) -> ListVerdict {
    for token in candidate.split(',').map(str::trim) {
        if token.is_empty() {
            continue;
        }
        if !Axis::Profile.lists(token) {
            return ListVerdict::Rejected { token: token.to_string() };
        }
    }
    ListVerdict::Accepted(ProfileSet::from_list(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_normalize_and_canonicals_pass() {
        assert_eq!(
            check_architecture("amd64"),
            Verdict::Normalized("x86_64".to_string())
        );
        assert_eq!(check_architecture("x86_64"), Verdict::Accepted);
        assert_eq!(check_architecture("aarch64"), Verdict::Accepted);
    }

    #[test]
    fn unknown_architectures_are_tolerated() {
        assert_eq!(
            check_architecture("loongarch64"),
            Verdict::Unlisted("loongarch64".to_string())
        );
        // Empty is never a valid architecture.
        assert_eq!(check_architecture(""), Verdict::Rejected);
    }

    #[test]
    fn distributions_are_strict() {
        assert_eq!(check_distribution("fedora"), Verdict::Accepted);
        assert_eq!(check_distribution("slackware"), Verdict::Rejected);
        assert_eq!(check_distribution("Fedora"), Verdict::Rejected);
        assert_eq!(check_distribution(""), Verdict::Rejected);
    }

    #[test]
    fn profile_lists_keep_order() {
        match check_profiles("desktop,gnome,dev") {
            ListVerdict::Accepted(set) => assert_eq!(set.join(), "desktop,gnome,dev"),
            other => panic!("expected acceptance, got {other:?}"),
        }
    }

    #[test]
    fn profile_matching_is_case_sensitive() {
        match check_profiles("desktop,GNOME") {
            ListVerdict::Rejected { token } => assert_eq!(token, "GNOME"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn one_bad_token_rejects_the_whole_list() {
        match check_profiles("desktop,bogus,gnome") {
            ListVerdict::Rejected { token } => assert_eq!(token, "bogus"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn empty_profile_list_is_valid() {
        match check_profiles("") {
            ListVerdict::Accepted(set) => assert!(set.is_empty()),
            other => panic!("expected acceptance, got {other:?}"),
        }
    }
}
