//! Built-in rules for the shell interpreters themselves: `sh -c '...'` and
//! friends are unwrapped transparently by the parser
//! ([`crate::parse::shell::unwrap_shell_wrapper`]), so these rules only
//! ever fire for a direct, interactive invocation — which always asks.

use crate::eval::decision::Decision;
use crate::eval::matcher::CommandRule;

pub fn bash_rule() -> CommandRule {
    CommandRule::new("bash", Decision::Ask)
}

pub fn sh_rule() -> CommandRule {
    CommandRule::new("sh", Decision::Ask)
}

pub fn zsh_rule() -> CommandRule {
    CommandRule::new("zsh", Decision::Ask)
}
