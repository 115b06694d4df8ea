//! Built-in `terraform` rule: plan/validate/fmt read-only operations allow;
//! apply/destroy and anything else ask.

use crate::commands::has_subcommand;
use crate::eval::decision::Decision;
use crate::eval::matcher::{ArgPattern, CommandRule, MatchSpec};

const READ_ONLY: &[&str] = &["plan", "validate", "fmt", "show", "output", "state"];

pub fn rule() -> CommandRule {
    let mut rule = CommandRule::new("terraform", Decision::Ask);
    for sub in READ_ONLY {
        rule = rule.with_pattern(ArgPattern {
            match_spec: MatchSpec { any_arg_matches: Some(vec![has_subcommand(sub)]), ..Default::default() },
            decision: Decision::Allow,
            reason: Some(format!("terraform {sub}")),
            description: None,
        });
    }
    rule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Invocation;

    fn inv(args: &[&str]) -> Invocation {
        Invocation {
            command: "terraform".into(),
            args: args.iter().map(|s| s.to_string()).collect(),
            env_prefixes: Vec::new(),
            raw: format!("terraform {}", args.join(" ")).trim().to_string(),
        }
    }

    #[test]
    fn plan_allows() {
        assert_eq!(rule().evaluate(&inv(&["plan"])).decision, Decision::Allow);
    }

    #[test]
    fn apply_asks() {
        assert_eq!(rule().evaluate(&inv(&["apply", "-auto-approve"])).decision, Decision::Ask);
    }
}
