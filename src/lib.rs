//! warden: a PreToolUse hook for an AI coding assistant that gates the
//! shell commands it's about to run.
//!
//! This crate evaluates shell command strings against a layered safety
//! policy and returns one of three decisions: [`eval::Decision::Allow`],
//! [`eval::Decision::Ask`], or [`eval::Decision::Deny`]. A command is
//! parsed into a command graph with tree-sitter-bash, each invocation in
//! that graph is evaluated against the configured [`eval::Evaluator`], and
//! the per-invocation results are combined into one final decision.
//!
//! # Architecture
//!
//! - **[`parse`]** — Shell parsing: tree-sitter-bash AST walker, shlex
//!   tokenizer, the `Invocation`/`ParseResult` data model.
//! - **[`eval`]** — The layered evaluator, decision types, the generic
//!   regex-based rule matcher, the pipeline combiner, and trusted-target
//!   matching.
//! - **[`commands`]** — Built-in rule data: one module per command family.
//! - **[`config`]** — YAML configuration loading and three-way merge.
//! - **[`timeout`]** — Wall-clock guard around evaluation.
//! - **[`logging`]** — Decision logging to `~/.local/share/warden/decisions.log`.

/// Built-in rule data, one module per command family.
pub mod commands;
/// Configuration types, YAML loading, and layered merge logic.
pub mod config;
/// The layered evaluator: decision types, rule matcher, combiner, trusted targets.
pub mod eval;
/// File-based decision logging.
pub mod logging;
/// Shell command parsing: tree-sitter AST walker, shlex tokenizer, data model.
pub mod parse;
/// Wall-clock timeout guard around evaluation.
pub mod timeout;

use config::Configuration;
use eval::{Evaluator, RuleMatch};

/// Evaluate a command string against an already-loaded configuration,
/// guarded by the wall-clock timeout. This is what the hook adapter
/// (`main.rs`) calls, after loading the configuration itself so that a
/// load failure can be handled as the fail-loud "refuse to start" case
/// rather than laundered through a decision.
pub fn evaluate_with_config(config: &Configuration, command: &str) -> RuleMatch {
    let evaluator = Evaluator::new(config.clone());
    timeout::evaluate_with_timeout(&evaluator, command)
}

/// Evaluate a command string against the fully merged configuration
/// (built-in defaults + user + project), guarded by the wall-clock timeout.
///
/// A configuration load failure surfaces as `ask` here, since this
/// convenience entry point has no stderr/exit-code channel of its own to
/// refuse to start through; the hook adapter uses
/// [`evaluate_with_config`] instead so it can fail loud. Tests that want to
/// bypass the filesystem-backed config merge should build an [`Evaluator`]
/// directly from [`config::Configuration::built_in_defaults`].
pub fn evaluate(command: &str) -> RuleMatch {
    match config::Configuration::load() {
        Ok(config) => evaluate_with_config(&config, command),
        Err(e) => RuleMatch::ask(format!("configuration error: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_uses_built_in_defaults_when_no_config_files_exist() {
        // HOME/cwd in the test sandbox have no .claude/warden.yaml, so this
        // exercises the full Configuration::load() path end to end.
        let result = evaluate("ls -la");
        assert_eq!(result.decision, eval::Decision::Allow);
    }
}
