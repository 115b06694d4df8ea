//! Generic, data-driven rule matching: [`MatchSpec`], [`ArgPattern`],
//! [`CommandRule`].
//!
//! Unlike the teacher's per-tool hardcoded specs, built-in and user rules
//! here share one evaluation engine so that a `.claude/warden.yaml` file can
//! express arbitrary custom rules with the same power as the defaults.
//!
//! Regex syntax is whatever the `regex` crate accepts: a leftmost-first,
//! RE2-style engine without backreferences or lookaround. All patterns are
//! compiled once, at configuration load time; a malformed pattern is a
//! load-time error (see [`crate::config::ConfigError`]), never a runtime one.

use crate::eval::decision::{Decision, RuleMatch};
use crate::parse::Invocation;
use regex::Regex;

/// Inclusive bounds on argument count.
#[derive(Debug, Clone, Default)]
pub struct ArgCount {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl ArgCount {
    fn matches(&self, len: usize) -> bool {
        self.min.is_none_or(|min| len >= min) && self.max.is_none_or(|max| len <= max)
    }
}

/// A disjunction of independent predicates; all *present* predicates must
/// hold (AND). An empty spec (no predicates, `not = false`) matches
/// unconditionally.
#[derive(Debug, Clone, Default)]
pub struct MatchSpec {
    pub any_arg_matches: Option<Vec<Regex>>,
    pub args_match: Option<Vec<Regex>>,
    pub no_args: Option<bool>,
    pub arg_count: Option<ArgCount>,
    pub not: bool,
}

impl MatchSpec {
    pub fn matches(&self, inv: &Invocation) -> bool {
        let mut any_predicate = false;
        let mut result = true;

        if let Some(patterns) = &self.any_arg_matches {
            any_predicate = true;
            result &= patterns
                .iter()
                .any(|re| inv.args.iter().any(|a| fullmatch(re, a)));
        }
        if let Some(patterns) = &self.args_match {
            any_predicate = true;
            result &= patterns.iter().any(|re| re.is_match(&inv.raw));
        }
        if let Some(expected) = self.no_args {
            any_predicate = true;
            result &= inv.args.is_empty() == expected;
        }
        if let Some(count) = &self.arg_count {
            any_predicate = true;
            result &= count.matches(inv.args.len());
        }

        let outcome = if any_predicate { result } else { true };
        if self.not { !outcome } else { outcome }
    }
}

/// `anyArgMatches` fullmatch semantics: a pattern matches an argument only
/// if it matches the whole string, not a substring of it.
///
/// `regex` has no dedicated fullmatch API, and bounds-checking a `find()`
/// result isn't equivalent to one: the crate's leftmost-first alternation
/// means a pattern like `a|ab` against `"ab"` finds the shorter `a` first
/// and a length check on that match rejects a string the pattern does in
/// fact fullmatch. Every `any_arg_matches` regex that reaches this function
/// is therefore compiled pre-anchored (`^(?:...)$`) — built-in rules anchor
/// their patterns directly (see [`crate::commands::has_subcommand`]), and
/// [`crate::config::compile_match_spec`] anchors user-supplied patterns the
/// same way — so a plain `is_match` is exact fullmatch, not an approximation.
fn fullmatch(re: &Regex, text: &str) -> bool {
    re.is_match(text)
}

/// One arm of a [`CommandRule`]'s `arg_patterns` list.
#[derive(Debug, Clone)]
pub struct ArgPattern {
    pub match_spec: MatchSpec,
    pub decision: Decision,
    pub reason: Option<String>,
    pub description: Option<String>,
}

/// A built-in or user-configured rule for one command name.
#[derive(Debug, Clone)]
pub struct CommandRule {
    pub command: String,
    pub default: Decision,
    pub arg_patterns: Vec<ArgPattern>,
}

impl CommandRule {
    pub fn new(command: impl Into<String>, default: Decision) -> Self {
        Self { command: command.into(), default, arg_patterns: Vec::new() }
    }

    pub fn with_pattern(mut self, pattern: ArgPattern) -> Self {
        self.arg_patterns.push(pattern);
        self
    }

    /// Evaluate this rule against an invocation whose `command` has already
    /// been confirmed to equal `self.command`. Walks `arg_patterns` in
    /// order; the first match wins. Falls back to `default` if none match.
    pub fn evaluate(&self, inv: &Invocation) -> RuleMatch {
        for pattern in &self.arg_patterns {
            if pattern.match_spec.matches(inv) {
                let reason = pattern
                    .reason
                    .clone()
                    .or_else(|| pattern.description.clone())
                    .unwrap_or_else(|| format!("{} matched a configured pattern", self.command));
                return RuleMatch { decision: pattern.decision, reason };
            }
        }
        RuleMatch {
            decision: self.default,
            reason: format!("{} (default: {})", self.command, self.default.as_str()),
        }
    }
}
