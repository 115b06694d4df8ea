//! Built-in `chmod`/`chown` rules: recursive world-writable permission
//! changes deny outright; everything else asks.

use crate::eval::decision::Decision;
use crate::eval::matcher::{ArgPattern, CommandRule, MatchSpec};
use regex::Regex;

pub fn rule() -> CommandRule {
    CommandRule::new("chmod", Decision::Ask).with_pattern(ArgPattern {
        match_spec: MatchSpec {
            any_arg_matches: Some(vec![Regex::new(r"^-[a-zA-Z]*R[a-zA-Z]*$").unwrap()]),
            args_match: Some(vec![Regex::new(r"\b777\b").unwrap()]),
            ..Default::default()
        },
        decision: Decision::Deny,
        reason: Some("recursive world-writable permissions are never allowed".into()),
        description: None,
    })
}

pub fn chown_rule() -> CommandRule {
    CommandRule::new("chown", Decision::Ask).with_pattern(ArgPattern {
        match_spec: MatchSpec {
            any_arg_matches: Some(vec![Regex::new(r"^-[a-zA-Z]*R[a-zA-Z]*$").unwrap()]),
            ..Default::default()
        },
        decision: Decision::Ask,
        reason: Some("recursive ownership change requires confirmation".into()),
        description: None,
    })
}
