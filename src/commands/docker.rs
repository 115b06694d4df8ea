//! Built-in `docker` rule: read-only inspection subcommands allow; `exec`
//! asks unless its target container is trusted (handled upstream by
//! [`crate::eval::Evaluator::trusted_target_override`]); everything else
//! mutating asks.

use crate::commands::has_subcommand;
use crate::eval::decision::Decision;
use crate::eval::matcher::{ArgPattern, CommandRule, MatchSpec};

const READ_ONLY: &[&str] = &["ps", "logs", "images", "inspect", "stats", "version", "top", "diff"];

pub fn rule() -> CommandRule {
    let mut rule = CommandRule::new("docker", Decision::Ask);

    for sub in READ_ONLY {
        rule = rule.with_pattern(ArgPattern {
            match_spec: MatchSpec { any_arg_matches: Some(vec![has_subcommand(sub)]), ..Default::default() },
            decision: Decision::Allow,
            reason: Some(format!("read-only docker {sub}")),
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
            command: "docker".into(),
            args: args.iter().map(|s| s.to_string()).collect(),
            env_prefixes: Vec::new(),
            raw: format!("docker {}", args.join(" ")).trim().to_string(),
        }
    }

    #[test]
    fn allow_ps() {
        assert_eq!(rule().evaluate(&inv(&["ps", "-a"])).decision, Decision::Allow);
    }

    #[test]
    fn exec_asks_by_default() {
        assert_eq!(rule().evaluate(&inv(&["exec", "-it", "web", "bash"])).decision, Decision::Ask);
    }

    #[test]
    fn rm_asks() {
        assert_eq!(rule().evaluate(&inv(&["rm", "-f", "web"])).decision, Decision::Ask);
    }
}
