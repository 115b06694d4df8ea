//! Built-in rule shared by npm/pnpm/yarn/bun: installs and scripts allow,
//! publishing asks.

use crate::commands::has_subcommand;
use crate::eval::decision::Decision;
use crate::eval::matcher::{ArgPattern, CommandRule, MatchSpec};

const SAFE_SUBCOMMANDS: &[&str] =
    &["install", "ci", "run", "test", "build", "start", "list", "ls", "outdated", "audit"];
const ASK_SUBCOMMANDS: &[&str] = &["publish", "deprecate", "owner", "unpublish"];

fn build(command: &str) -> CommandRule {
    let mut rule = CommandRule::new(command, Decision::Ask);

    for sub in SAFE_SUBCOMMANDS {
        rule = rule.with_pattern(ArgPattern {
            match_spec: MatchSpec { any_arg_matches: Some(vec![has_subcommand(sub)]), ..Default::default() },
            decision: Decision::Allow,
            reason: Some(format!("{command} {sub}")),
            description: None,
        });
    }

    for sub in ASK_SUBCOMMANDS {
        rule = rule.with_pattern(ArgPattern {
            match_spec: MatchSpec { any_arg_matches: Some(vec![has_subcommand(sub)]), ..Default::default() },
            decision: Decision::Ask,
            reason: Some(format!("{command} {sub} publishes to a registry")),
            description: None,
        });
    }

    rule
}

pub fn rule() -> CommandRule {
    build("npm")
}

pub fn pnpm_rule() -> CommandRule {
    build("pnpm")
}

pub fn yarn_rule() -> CommandRule {
    build("yarn")
}

pub fn bun_rule() -> CommandRule {
    build("bun")
}
