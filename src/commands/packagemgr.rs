//! Built-in rule shared by OS package managers (apt, apt-get, yum, dnf,
//! brew, apk): listing/searching allows; installing/removing asks.

use crate::commands::has_subcommand;
use crate::eval::decision::Decision;
use crate::eval::matcher::{ArgPattern, CommandRule, MatchSpec};

const READ_ONLY: &[&str] = &["list", "search", "info", "show", "list-installed"];

fn build(command: &str) -> CommandRule {
    let mut rule = CommandRule::new(command, Decision::Ask);
    for sub in READ_ONLY {
        rule = rule.with_pattern(ArgPattern {
            match_spec: MatchSpec { any_arg_matches: Some(vec![has_subcommand(sub)]), ..Default::default() },
            decision: Decision::Allow,
            reason: Some(format!("{command} {sub}")),
            description: None,
        });
    }
    rule
}

pub fn rule() -> CommandRule {
    build("apt")
}

pub fn apt_get_rule() -> CommandRule {
    build("apt-get")
}

pub fn yum_rule() -> CommandRule {
    build("yum")
}

pub fn dnf_rule() -> CommandRule {
    build("dnf")
}

pub fn brew_rule() -> CommandRule {
    build("brew")
}

pub fn apk_rule() -> CommandRule {
    build("apk")
}
