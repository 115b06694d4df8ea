//! Built-in GitHub CLI rule: read-only subcommands (single- and two-word)
//! allow; everything else — `pr create`, `pr merge`, `repo delete`, ... —
//! falls through to the default ask.

use regex::Regex;

use crate::commands::has_subcommand;
use crate::eval::decision::Decision;
use crate::eval::matcher::{ArgPattern, CommandRule, MatchSpec};

const READ_ONLY_SINGLE: &[&str] = &["status", "api"];
const READ_ONLY_PAIRS: &[&str] = &["pr list", "pr view", "pr diff", "pr checks", "repo view", "issue list", "issue view"];

pub fn rule() -> CommandRule {
    let mut rule = CommandRule::new("gh", Decision::Ask);

    for sub in READ_ONLY_SINGLE {
        rule = rule.with_pattern(ArgPattern {
            match_spec: MatchSpec { any_arg_matches: Some(vec![has_subcommand(sub)]), ..Default::default() },
            decision: Decision::Allow,
            reason: Some(format!("read-only gh {sub}")),
            description: None,
        });
    }

    for pair in READ_ONLY_PAIRS {
        let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(pair))).unwrap();
        rule = rule.with_pattern(ArgPattern {
            match_spec: MatchSpec { args_match: Some(vec![pattern]), ..Default::default() },
            decision: Decision::Allow,
            reason: Some(format!("read-only gh {pair}")),
            description: None,
        });
    }

    rule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Invocation;

    fn inv(raw: &str) -> Invocation {
        let mut words = raw.split_whitespace();
        let command = words.next().unwrap().to_string();
        Invocation { command, args: words.map(String::from).collect(), env_prefixes: Vec::new(), raw: raw.to_string() }
    }

    #[test]
    fn allow_pr_list() {
        assert_eq!(rule().evaluate(&inv("gh pr list")).decision, Decision::Allow);
    }

    #[test]
    fn allow_status() {
        assert_eq!(rule().evaluate(&inv("gh status")).decision, Decision::Allow);
    }

    #[test]
    fn ask_pr_create() {
        assert_eq!(rule().evaluate(&inv("gh pr create --title Fix")).decision, Decision::Ask);
    }

    #[test]
    fn ask_repo_delete() {
        assert_eq!(rule().evaluate(&inv("gh repo delete my-repo --yes")).decision, Decision::Ask);
    }
}
