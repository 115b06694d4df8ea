//! Wall-clock guard around evaluation: a pathological input (e.g. deeply
//! nested substitutions) must never hang the hook adapter indefinitely.
//!
//! Runs the evaluator on a worker thread and waits up to [`TIMEOUT`] for a
//! result; on expiry, returns `ask` rather than blocking the caller. The
//! worker thread is detached and left to finish (or not) on its own — there
//! is no cooperative cancellation, matching the evaluator's side-effect-free
//! design where an abandoned thread does no harm.

use std::sync::mpsc;
use std::time::Duration;

use crate::eval::{Decision, Evaluator, RuleMatch};

const TIMEOUT: Duration = Duration::from_millis(200);

pub fn evaluate_with_timeout(evaluator: &Evaluator, input: &str) -> RuleMatch {
    let (tx, rx) = mpsc::channel();
    let config = evaluator.config().clone();
    let input = input.to_string();

    std::thread::spawn(move || {
        let evaluator = Evaluator::new(config);
        let _ = tx.send(evaluator.evaluate(&input));
    });

    rx.recv_timeout(TIMEOUT).unwrap_or_else(|_| RuleMatch {
        decision: Decision::Ask,
        reason: "evaluation timeout".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;

    #[test]
    fn completes_well_within_timeout() {
        let evaluator = Evaluator::new(Configuration::built_in_defaults());
        let result = evaluate_with_timeout(&evaluator, "ls -la");
        assert_eq!(result.decision, Decision::Allow);
    }
}
