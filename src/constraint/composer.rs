//! Composer constraint normalization onto semver
//!
//! Advisory feeds and composer.json express constraints in Composer's syntax:
//! `>=8.0,<8.9.20`, `1.5.0 - 1.5.3`, `~1.2`, `^2.0 || ^3.0`, `1.2.*`.
//! The normalizer rewrites each expression into one or more
//! `semver::VersionReq` values. Differences that matter:
//! - Composer `~1.2` allows up to (but excluding) 2.0.0, while semver's tilde
//!   stops at 1.3.0; tilde is therefore expanded by hand.
//! - A bare version is an exact match in Composer, not a caret range.
//! - Hyphen ranges have an inclusive or exclusive upper bound depending on
//!   how many components the right side carries.

use crate::error::ConstraintError;
use regex::Regex;
use semver::{Version, VersionReq};
use std::fmt;
use std::sync::OnceLock;

/// Glues an operator to its version when separated by whitespace (">= 1.2")
fn operator_gap_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(>=|<=|==|!=|[<>^~=])\s+").expect("static regex"))
}

/// A parsed Composer constraint: a union of conjunctive requirements
#[derive(Debug, Clone)]
pub struct ComposerConstraint {
    raw: String,
    alternatives: Vec<VersionReq>,
}

impl ComposerConstraint {
    /// Parse a Composer constraint expression.
    ///
    /// Alternatives are separated by `||` or `|`; each alternative is a
    /// conjunction of comparators separated by commas or whitespace, or a
    /// hyphen range.
    pub fn parse(raw: &str) -> Result<Self, ConstraintError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConstraintError::unparseable(raw, "empty constraint"));
        }

        let mut alternatives = Vec::new();
        for alt in trimmed.replace("||", "|").split('|') {
            let alt = alt.trim();
            if alt.is_empty() {
                continue;
            }
            alternatives.push(normalize_alternative(alt)?);
        }

        if alternatives.is_empty() {
            return Err(ConstraintError::unparseable(raw, "no alternatives"));
        }

        Ok(Self {
            raw: trimmed.to_string(),
            alternatives,
        })
    }

    /// The constraint as originally written (trimmed)
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when `version` satisfies at least one alternative
    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }
}

impl fmt::Display for ComposerConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Normalize one `||`-free alternative into a VersionReq
fn normalize_alternative(alt: &str) -> Result<VersionReq, ConstraintError> {
    // Hyphen ranges need their surrounding spaces, so handle them before
    // whitespace is treated as a conjunction separator.
    if let Some((lo, hi)) = alt.split_once(" - ") {
        return normalize_hyphen_range(alt, lo.trim(), hi.trim());
    }

    let glued = operator_gap_re().replace_all(alt, "$1");
    let mut comparators = Vec::new();
    for atom in glued.split([',', ' ', '\t']) {
        let atom = atom.trim();
        if atom.is_empty() {
            continue;
        }
        comparators.push(normalize_atom(alt, atom)?);
    }

    if comparators.is_empty() {
        return Err(ConstraintError::unparseable(alt, "no comparators"));
    }

    VersionReq::parse(&comparators.join(", "))
        .map_err(|e| ConstraintError::unparseable(alt, e.to_string()))
}

/// Normalize a hyphen range `lo - hi`.
///
/// The lower bound is inclusive. The upper bound is inclusive when fully
/// specified; a partial right side widens to the next minor/major.
fn normalize_hyphen_range(alt: &str, lo: &str, hi: &str) -> Result<VersionReq, ConstraintError> {
    let lo = strip_v(lo);
    let hi = strip_v(hi);
    let lo_parts = numeric_parts(lo).ok_or_else(|| {
        ConstraintError::unparseable(alt, format!("invalid lower bound '{}'", lo))
    })?;
    let hi_parts = numeric_parts(hi).ok_or_else(|| {
        ConstraintError::unparseable(alt, format!("invalid upper bound '{}'", hi))
    })?;

    let lower = format!(">={}", pad_parts(&lo_parts));
    let upper = match hi_parts.len() {
        3 => format!("<={}", pad_parts(&hi_parts)),
        2 => format!("<{}.{}.0", hi_parts[0], hi_parts[1] + 1),
        1 => format!("<{}.0.0", hi_parts[0] + 1),
        _ => {
            return Err(ConstraintError::unparseable(
                alt,
                format!("invalid upper bound '{}'", hi),
            ))
        }
    };

    VersionReq::parse(&format!("{}, {}", lower, upper))
        .map_err(|e| ConstraintError::unparseable(alt, e.to_string()))
}

/// Normalize one comparator atom into semver comparator syntax
fn normalize_atom(alt: &str, atom: &str) -> Result<String, ConstraintError> {
    // Stability suffixes ("^1.2@dev") carry no version information
    let atom = atom.split('@').next().unwrap_or(atom);

    if atom == "*" || atom == "x" || atom == "X" {
        return Ok("*".to_string());
    }

    if let Some(rest) = atom.strip_prefix("!=") {
        let _ = rest;
        return Err(ConstraintError::UnsupportedOperator {
            constraint: alt.to_string(),
        });
    }

    // Caret matches semver's own semantics
    if let Some(rest) = atom.strip_prefix('^') {
        return Ok(format!("^{}", strip_v(rest)));
    }

    // Composer tilde: the last given component may grow
    if let Some(rest) = atom.strip_prefix('~') {
        let rest = strip_v(rest);
        let parts = numeric_parts(rest).ok_or_else(|| {
            ConstraintError::unparseable(alt, format!("invalid tilde version '{}'", rest))
        })?;
        return match parts.len() {
            1 => Ok(format!(">={}.0.0, <{}.0.0", parts[0], parts[0] + 1)),
            2 => Ok(format!(
                ">={}.{}.0, <{}.0.0",
                parts[0],
                parts[1],
                parts[0] + 1
            )),
            3 => Ok(format!(
                ">={}.{}.{}, <{}.{}.0",
                parts[0],
                parts[1],
                parts[2],
                parts[0],
                parts[1] + 1
            )),
            _ => Err(ConstraintError::unparseable(
                alt,
                format!("invalid tilde version '{}'", rest),
            )),
        };
    }

    for op in [">=", "<=", "==", ">", "<", "="] {
        if let Some(rest) = atom.strip_prefix(op) {
            let rest = strip_v(rest.trim());
            if rest.is_empty() {
                return Err(ConstraintError::unparseable(alt, "operator without version"));
            }
            let op = if op == "==" { "=" } else { op };
            return Ok(format!("{}{}", op, rest));
        }
    }

    // Wildcard component: semver understands 1.2.* directly
    if atom.contains('*') || atom.ends_with(".x") || atom.ends_with(".X") {
        return Ok(strip_v(atom).to_string());
    }

    // Bare version: exact match in Composer
    let bare = strip_v(atom);
    let (numeric, suffix) = match bare.split_once('-') {
        Some((n, s)) => (n, Some(s)),
        None => (bare, None),
    };
    let parts = numeric_parts(numeric).ok_or_else(|| {
        ConstraintError::unparseable(alt, format!("unrecognized atom '{}'", atom))
    })?;
    if parts.len() > 3 {
        return Err(ConstraintError::unparseable(
            alt,
            format!("too many version components in '{}'", atom),
        ));
    }
    let padded = pad_parts(&parts);
    match suffix {
        Some(s) => Ok(format!("={}-{}", padded, s)),
        None => Ok(format!("={}", padded)),
    }
}

fn strip_v(s: &str) -> &str {
    s.strip_prefix('v').unwrap_or(s)
}

/// Parse dotted numeric components; None if any component is non-numeric
fn numeric_parts(s: &str) -> Option<Vec<u64>> {
    if s.is_empty() {
        return None;
    }
    s.split('.').map(|p| p.parse::<u64>().ok()).collect()
}

/// Pad to three components: "1.2" -> "1.2.0"
fn pad_parts(parts: &[u64]) -> String {
    let major = parts.first().copied().unwrap_or(0);
    let minor = parts.get(1).copied().unwrap_or(0);
    let patch = parts.get(2).copied().unwrap_or(0);
    format!("{}.{}.{}", major, minor, patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn matches(constraint: &str, version: &str) -> bool {
        ComposerConstraint::parse(constraint)
            .unwrap()
            .matches(&v(version))
    }

    #[test]
    fn test_simple_comparison() {
        assert!(matches("<1.2.0", "1.1.0"));
        assert!(!matches("<1.2.0", "1.2.0"));
        assert!(matches(">=10.0", "10.2.3"));
        assert!(!matches(">=10.0", "9.5.11"));
    }

    #[test]
    fn test_comma_conjunction() {
        assert!(matches(">=8.0,<8.9.20", "8.9.19"));
        assert!(!matches(">=8.0,<8.9.20", "8.9.20"));
        assert!(!matches(">=8.0,<8.9.20", "7.9.0"));
    }

    #[test]
    fn test_space_conjunction() {
        assert!(matches(">=8.0 <8.9.20", "8.5.0"));
        assert!(!matches(">=8.0 <8.9.20", "9.0.0"));
    }

    #[test]
    fn test_operator_separated_by_space() {
        assert!(matches(">= 1.2.0", "1.2.0"));
        assert!(matches("< 2.0", "1.9.9"));
    }

    #[test]
    fn test_hyphen_range_full() {
        assert!(matches("1.5.0 - 1.5.3", "1.5.0"));
        assert!(matches("1.5.0 - 1.5.3", "1.5.3"));
        assert!(!matches("1.5.0 - 1.5.3", "1.5.4"));
        assert!(!matches("1.5.0 - 1.5.3", "1.4.9"));
    }

    #[test]
    fn test_hyphen_range_partial_upper() {
        // "1.0 - 2.0" widens the upper bound to <2.1.0
        assert!(matches("1.0 - 2.0", "2.0.9"));
        assert!(!matches("1.0 - 2.0", "2.1.0"));
        // "1.0 - 2" widens to <3.0.0
        assert!(matches("1.0 - 2", "2.9.9"));
        assert!(!matches("1.0 - 2", "3.0.0"));
    }

    #[test]
    fn test_union_single_pipe() {
        assert!(matches(">=8.0,<8.9.20|>=9.0,<9.5.2", "8.9.0"));
        assert!(matches(">=8.0,<8.9.20|>=9.0,<9.5.2", "9.5.1"));
        assert!(!matches(">=8.0,<8.9.20|>=9.0,<9.5.2", "9.5.2"));
    }

    #[test]
    fn test_union_double_pipe() {
        assert!(matches("^2.0 || ^3.0", "2.5.0"));
        assert!(matches("^2.0 || ^3.0", "3.0.1"));
        assert!(!matches("^2.0 || ^3.0", "4.0.0"));
    }

    #[test]
    fn test_caret() {
        assert!(matches("^1.2.3", "1.9.0"));
        assert!(!matches("^1.2.3", "2.0.0"));
        assert!(!matches("^1.2.3", "1.2.2"));
        // caret on 0.x stays within the minor
        assert!(matches("^0.3", "0.3.9"));
        assert!(!matches("^0.3", "0.4.0"));
    }

    #[test]
    fn test_composer_tilde_two_components() {
        // Composer semantics: ~1.2 allows up to <2.0.0
        assert!(matches("~1.2", "1.2.0"));
        assert!(matches("~1.2", "1.9.9"));
        assert!(!matches("~1.2", "2.0.0"));
        assert!(!matches("~1.2", "1.1.9"));
    }

    #[test]
    fn test_composer_tilde_three_components() {
        assert!(matches("~1.2.3", "1.2.3"));
        assert!(matches("~1.2.3", "1.2.9"));
        assert!(!matches("~1.2.3", "1.3.0"));
    }

    #[test]
    fn test_bare_version_is_exact() {
        assert!(matches("1.2.3", "1.2.3"));
        assert!(!matches("1.2.3", "1.2.4"));
        // padded partial
        assert!(matches("1.2", "1.2.0"));
        assert!(!matches("1.2", "1.2.1"));
    }

    #[test]
    fn test_wildcard() {
        assert!(matches("1.2.*", "1.2.9"));
        assert!(!matches("1.2.*", "1.3.0"));
        assert!(matches("*", "99.0.0"));
    }

    #[test]
    fn test_v_prefix_in_constraint() {
        assert!(matches(">=v1.2.0", "1.2.0"));
        assert!(matches("v1.2.3", "1.2.3"));
    }

    #[test]
    fn test_stability_suffix_ignored() {
        assert!(matches("^1.2@dev", "1.5.0"));
    }

    #[test]
    fn test_unsupported_not_equal() {
        let err = ComposerConstraint::parse("!=1.2.3").unwrap_err();
        assert!(matches!(
            err,
            crate::error::ConstraintError::UnsupportedOperator { .. }
        ));
    }

    #[test]
    fn test_empty_and_garbage_rejected() {
        assert!(ComposerConstraint::parse("").is_err());
        assert!(ComposerConstraint::parse("   ").is_err());
        assert!(ComposerConstraint::parse("dev-main").is_err());
        assert!(ComposerConstraint::parse("not a constraint").is_err());
    }

    #[test]
    fn test_as_str_keeps_original() {
        let c = ComposerConstraint::parse("  >=8.0,<8.9.20 ").unwrap();
        assert_eq!(c.as_str(), ">=8.0,<8.9.20");
    }

    #[test]
    fn test_four_component_exact_rejected() {
        assert!(ComposerConstraint::parse("1.2.3.4").is_err());
    }
}
