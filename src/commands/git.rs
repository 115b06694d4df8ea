//! Built-in `git` rule: read-only subcommands allow, force-push asks, and
//! anything else falls through to the command's own default.

use regex::Regex;

use crate::commands::has_subcommand;
use crate::eval::decision::Decision;
use crate::eval::matcher::{ArgPattern, CommandRule, MatchSpec};

const READ_ONLY: &[&str] =
    &["status", "log", "diff", "branch", "show", "remote", "fetch", "blame", "reflog", "describe"];

pub fn rule() -> CommandRule {
    let mut rule = CommandRule::new("git", Decision::Ask);

    rule = rule.with_pattern(ArgPattern {
        match_spec: MatchSpec {
            any_arg_matches: Some(vec![has_subcommand("push")]),
            args_match: Some(vec![
                Regex::new(r"--force(-with-lease)?\b").unwrap(),
                Regex::new(r"(^|\s)-f(\s|$)").unwrap(),
            ]),
            ..Default::default()
        },
        decision: Decision::Ask,
        reason: Some("git force-push requires confirmation".into()),
        description: None,
    });

    for sub in READ_ONLY {
        rule = rule.with_pattern(ArgPattern {
            match_spec: MatchSpec { any_arg_matches: Some(vec![has_subcommand(sub)]), ..Default::default() },
            decision: Decision::Allow,
            reason: Some(format!("read-only git {sub}")),
            description: None,
        });
    }

    rule
}
