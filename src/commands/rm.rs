//! Built-in `rm` rule: plain file removal asks; recursive and/or forced
//! removal still asks (never auto-allowed), but is flagged with a sharper
//! reason so the hook adapter's message makes the risk legible.

use crate::eval::decision::Decision;
use crate::eval::matcher::{ArgPattern, CommandRule, MatchSpec};
use regex::Regex;

pub fn rule() -> CommandRule {
    CommandRule::new("rm", Decision::Ask)
        .with_pattern(ArgPattern {
            match_spec: MatchSpec {
                any_arg_matches: Some(vec![Regex::new(r"^-[a-zA-Z]*r[a-zA-Z]*f[a-zA-Z]*$").unwrap()]),
                ..Default::default()
            },
            decision: Decision::Ask,
            reason: Some("recursive forced delete requires confirmation".into()),
            description: None,
        })
        .with_pattern(ArgPattern {
            match_spec: MatchSpec::default(),
            decision: Decision::Ask,
            reason: Some("rm requires confirmation".into()),
            description: None,
        })
}
