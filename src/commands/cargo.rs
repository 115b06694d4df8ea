//! Built-in `cargo` rule: safe build/test subcommands allow, install/publish
//! and anything else asks.

use crate::commands::has_subcommand;
use crate::eval::decision::Decision;
use crate::eval::matcher::{ArgPattern, CommandRule, MatchSpec};

const SAFE_SUBCOMMANDS: &[&str] =
    &["build", "check", "test", "clippy", "fmt", "doc", "run", "bench", "tree", "metadata"];

pub fn rule() -> CommandRule {
    let mut rule = CommandRule::new("cargo", Decision::Ask);

    for sub in SAFE_SUBCOMMANDS {
        rule = rule.with_pattern(ArgPattern {
            match_spec: MatchSpec { any_arg_matches: Some(vec![has_subcommand(sub)]), ..Default::default() },
            decision: Decision::Allow,
            reason: Some(format!("cargo {sub}")),
            description: None,
        });
    }

    rule
}
