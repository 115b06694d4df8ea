//! Built-in rules for the Python toolchain: running a script file allows;
//! `-c`/inline eval or a bare REPL asks. `pip`/`uv`/`pipx` install commands
//! allow; uninstall and anything else asks.

use crate::eval::decision::Decision;
use crate::eval::matcher::{ArgCount, ArgPattern, CommandRule, MatchSpec};

use crate::commands::has_subcommand;

fn interpreter_rule(command: &str) -> CommandRule {
    CommandRule::new(command, Decision::Ask)
        .with_pattern(ArgPattern {
            match_spec: MatchSpec { no_args: Some(true), ..Default::default() },
            decision: Decision::Ask,
            reason: Some(format!("{command} with no arguments starts an interactive REPL")),
            description: None,
        })
        .with_pattern(ArgPattern {
            match_spec: MatchSpec {
                any_arg_matches: Some(vec![regex::Regex::new(r"^(-c|-m)$").unwrap()]),
                ..Default::default()
            },
            decision: Decision::Ask,
            reason: Some(format!("{command} -c evaluates inline code")),
            description: None,
        })
        .with_pattern(ArgPattern {
            match_spec: MatchSpec { arg_count: Some(ArgCount { min: Some(1), max: None }), ..Default::default() },
            decision: Decision::Allow,
            reason: Some(format!("{command} running a script file")),
            description: None,
        })
}

pub fn rule() -> CommandRule {
    interpreter_rule("python")
}

pub fn python3_rule() -> CommandRule {
    interpreter_rule("python3")
}

fn package_manager_rule(command: &str) -> CommandRule {
    CommandRule::new(command, Decision::Ask)
        .with_pattern(ArgPattern {
            match_spec: MatchSpec { any_arg_matches: Some(vec![has_subcommand("install")]), ..Default::default() },
            decision: Decision::Allow,
            reason: Some(format!("{command} install")),
            description: None,
        })
        .with_pattern(ArgPattern {
            match_spec: MatchSpec { any_arg_matches: Some(vec![has_subcommand("list")]), ..Default::default() },
            decision: Decision::Allow,
            reason: Some(format!("{command} list")),
            description: None,
        })
}

pub fn pip_rule() -> CommandRule {
    package_manager_rule("pip")
}

pub fn uv_rule() -> CommandRule {
    package_manager_rule("uv")
}

pub fn pipx_rule() -> CommandRule {
    package_manager_rule("pipx")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Invocation;

    fn inv(command: &str, args: &[&str]) -> Invocation {
        Invocation {
            command: command.into(),
            args: args.iter().map(|s| s.to_string()).collect(),
            env_prefixes: Vec::new(),
            raw: format!("{command} {}", args.join(" ")).trim().to_string(),
        }
    }

    #[test]
    fn script_allows() {
        assert_eq!(rule().evaluate(&inv("python", &["build.py"])).decision, Decision::Allow);
    }

    #[test]
    fn inline_eval_asks() {
        assert_eq!(rule().evaluate(&inv("python", &["-c", "1+1"])).decision, Decision::Ask);
    }

    #[test]
    fn pip_install_allows() {
        assert_eq!(pip_rule().evaluate(&inv("pip", &["install", "requests"])).decision, Decision::Allow);
    }

    #[test]
    fn pip_uninstall_asks() {
        assert_eq!(pip_rule().evaluate(&inv("pip", &["uninstall", "requests"])).decision, Decision::Ask);
    }
}
