//! Pipeline combiner: reduces per-invocation decisions and subshell taint
//! into one final decision for the original input.

use crate::eval::decision::{Decision, RuleMatch};
use crate::parse::ParseResult;

/// Combine per-invocation decisions with the parse result's taint flag into
/// a single `(decision, reason)` outcome.
///
/// - Deny dominates: any invocation deciding `deny` wins, carrying that
///   invocation's reason.
/// - A parse error forces `ask` regardless of any other signal.
/// - An empty command list with no parse error is a no-op input: `allow`.
/// - Otherwise the strongest per-invocation decision wins; if it's `allow`
///   and the input tainted a subshell while `askOnSubshell` is enabled, it
///   is promoted to `ask`.
pub fn combine(parsed: &ParseResult, per_invocation: &[RuleMatch], ask_on_subshell: bool) -> RuleMatch {
    if parsed.parse_error {
        return RuleMatch::ask("unparseable command");
    }

    if parsed.commands.is_empty() && per_invocation.is_empty() {
        if parsed.has_subshell && ask_on_subshell {
            return RuleMatch::ask("command contains a subshell or substitution");
        }
        return RuleMatch::allow("empty input");
    }

    let mut worst = Decision::Allow;
    let mut reason = String::new();
    for result in per_invocation {
        if result.decision > worst {
            worst = result.decision;
            reason = result.reason.clone();
        } else if reason.is_empty() {
            reason = result.reason.clone();
        }
    }

    if worst == Decision::Allow && parsed.has_subshell && ask_on_subshell {
        return RuleMatch::ask("command contains a subshell or substitution");
    }

    RuleMatch { decision: worst, reason }
}
