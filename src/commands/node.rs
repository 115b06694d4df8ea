//! Built-in `node` rule: running a script file allows; `-e`/`--eval` or a
//! bare REPL invocation asks, since both execute arbitrary inline code.

use crate::eval::decision::Decision;
use crate::eval::matcher::{ArgCount, ArgPattern, CommandRule, MatchSpec};

pub fn rule() -> CommandRule {
    CommandRule::new("node", Decision::Ask)
        .with_pattern(ArgPattern {
            match_spec: MatchSpec { no_args: Some(true), ..Default::default() },
            decision: Decision::Ask,
            reason: Some("node with no arguments starts an interactive REPL".into()),
            description: None,
        })
        .with_pattern(ArgPattern {
            match_spec: MatchSpec {
                any_arg_matches: Some(vec![regex::Regex::new(r"^(-e|--eval|-p|--print)$").unwrap()]),
                ..Default::default()
            },
            decision: Decision::Ask,
            reason: Some("node -e evaluates inline code".into()),
            description: None,
        })
        .with_pattern(ArgPattern {
            match_spec: MatchSpec { arg_count: Some(ArgCount { min: Some(1), max: None }), ..Default::default() },
            decision: Decision::Allow,
            reason: Some("node running a script file".into()),
            description: None,
        })
}
