//! Built-in rules for network-facing tools: `ssh` asks until its target is
//! trusted (see [`crate::eval::Evaluator::trusted_target_override`]);
//! `curl`/`wget` allow plain reads but ask when writing output to disk or
//! invoking a non-GET method.

use crate::eval::decision::Decision;
use crate::eval::matcher::{ArgPattern, CommandRule, MatchSpec};
use regex::Regex;

pub fn ssh_rule() -> CommandRule {
    CommandRule::new("ssh", Decision::Ask)
}

fn fetch_rule(command: &str) -> CommandRule {
    CommandRule::new(command, Decision::Allow).with_pattern(ArgPattern {
        match_spec: MatchSpec {
            any_arg_matches: Some(vec![Regex::new(r"^(-o|-O|--output|-X|--request)$").unwrap()]),
            ..Default::default()
        },
        decision: Decision::Ask,
        reason: Some(format!("{command} writing to disk or using a non-default method")),
        description: None,
    })
}

pub fn curl_rule() -> CommandRule {
    fetch_rule("curl")
}

pub fn wget_rule() -> CommandRule {
    fetch_rule("wget")
}
