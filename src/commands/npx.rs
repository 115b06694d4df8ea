//! Built-in rule for `npx`/`bunx`: running an arbitrary, possibly
//! never-installed package always asks, since it can execute unreviewed
//! third-party code.

use crate::eval::decision::Decision;
use crate::eval::matcher::CommandRule;

fn build(command: &str) -> CommandRule {
    CommandRule::new(command, Decision::Ask)
}

pub fn rule() -> CommandRule {
    build("npx")
}

pub fn bunx_rule() -> CommandRule {
    build("bunx")
}
