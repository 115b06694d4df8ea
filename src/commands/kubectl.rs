//! Built-in `kubectl` rule: read-only subcommands allow, mutating
//! subcommands ask unless the target context is on the trusted list (see
//! [`crate::eval::Evaluator::trusted_target_override`]).

use crate::commands::has_subcommand;
use crate::eval::decision::Decision;
use crate::eval::matcher::{ArgPattern, CommandRule, MatchSpec};

const READ_ONLY: &[&str] = &["get", "describe", "logs", "top", "explain", "version", "cluster-info"];

pub fn rule() -> CommandRule {
    let mut rule = CommandRule::new("kubectl", Decision::Ask);

    for sub in READ_ONLY {
        rule = rule.with_pattern(ArgPattern {
            match_spec: MatchSpec { any_arg_matches: Some(vec![has_subcommand(sub)]), ..Default::default() },
            decision: Decision::Allow,
            reason: Some(format!("read-only kubectl {sub}")),
            description: None,
        });
    }

    rule
}
