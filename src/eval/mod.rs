//! Layered evaluator: consults global-deny, always-deny, always-allow,
//! per-command rules, and the default decision, in that fixed order, then
//! combines per-invocation results into one final decision.

pub mod combiner;
pub mod decision;
pub mod matcher;
pub mod trusted;

pub use decision::{Decision, RuleMatch};
pub use matcher::{ArgCount, ArgPattern, CommandRule, MatchSpec};

use crate::config::Configuration;
use crate::parse::{self, Invocation};

/// Evaluates command strings against a merged [`Configuration`].
///
/// Immutable and side-effect-free after construction: every evaluation is a
/// pure function of `(input, configuration)`, safe to call concurrently
/// from multiple threads (e.g. from the wall-clock guard's worker thread).
pub struct Evaluator {
    config: Configuration,
}

impl Evaluator {
    pub fn new(config: Configuration) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Layer 1: global deny patterns, matched against the *original*
    /// pre-parse input string — the only layer that sees it.
    fn check_global_deny(&self, original_input: &str) -> Option<RuleMatch> {
        self.config
            .global_deny
            .iter()
            .find(|gd| gd.pattern.is_match(original_input))
            .map(|gd| RuleMatch::deny(gd.reason.clone()))
    }

    /// Trusted-target extension point (§4.3/§9): ssh, docker exec, and
    /// kubectl default to `ask` until their connection target matches a
    /// configured trust list, at which point the connection step allows.
    fn trusted_target_override(&self, inv: &Invocation) -> Option<RuleMatch> {
        match inv.command.as_str() {
            "ssh" => {
                let target = trusted::ssh_target(&inv.args)?;
                trusted::is_trusted(target, &self.config.trusted_ssh_hosts)
                    .then(|| RuleMatch::allow(format!("trusted ssh target: {target}")))
            }
            "docker" if inv.args.first().map(String::as_str) == Some("exec") => {
                let target = trusted::docker_exec_target(&inv.args)?;
                trusted::is_trusted(target, &self.config.trusted_docker_containers)
                    .then(|| RuleMatch::allow(format!("trusted docker container: {target}")))
            }
            "kubectl" => {
                let context = trusted::kubectl_context(&inv.args)?;
                trusted::is_trusted(context, &self.config.trusted_kubectl_contexts)
                    .then(|| RuleMatch::allow(format!("trusted kubectl context: {context}")))
            }
            "sprite" => {
                let target = inv.args.first()?;
                trusted::is_trusted(target, &self.config.trusted_sprites)
                    .then(|| RuleMatch::allow(format!("trusted sprite target: {target}")))
            }
            _ => None,
        }
    }

    /// Layers 2-5 for a single invocation: always-deny, always-allow,
    /// per-command rules, default.
    pub fn evaluate_invocation(&self, inv: &Invocation) -> RuleMatch {
        if self.config.always_deny.iter().any(|c| c == &inv.command) {
            return RuleMatch::deny(format!("{} is always denied", inv.command));
        }
        if self.config.always_allow.iter().any(|c| c == &inv.command) {
            return RuleMatch::allow(format!("{} is in the always-allow list", inv.command));
        }
        if let Some(result) = self.trusted_target_override(inv) {
            return result;
        }
        if let Some(rule) = self.config.rules.iter().find(|r| r.command == inv.command) {
            return rule.evaluate(inv);
        }
        RuleMatch {
            decision: self.config.default_decision,
            reason: format!("no rule for {}; using default decision", inv.command),
        }
    }

    /// Evaluate a full (possibly compound) command string end to end:
    /// global deny, parse, per-invocation evaluation (recursing into any
    /// extracted subshell commands), and combination.
    pub fn evaluate(&self, input: &str) -> RuleMatch {
        if let Some(denied) = self.check_global_deny(input) {
            return denied;
        }

        let parsed = parse::parse(input);

        let mut results: Vec<RuleMatch> = parsed
            .commands
            .iter()
            .map(|inv| self.evaluate_invocation(inv))
            .collect();

        for subshell_command in &parsed.subshell_commands {
            results.push(self.evaluate(subshell_command));
        }

        combiner::combine(&parsed, &results, self.config.ask_on_subshell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;

    fn evaluator() -> Evaluator {
        Evaluator::new(Configuration::built_in_defaults())
    }

    #[test]
    fn allow_list_scenario() {
        assert_eq!(evaluator().evaluate("ls -la /tmp").decision, Decision::Allow);
    }

    #[test]
    fn always_deny_scenario() {
        assert_eq!(evaluator().evaluate("sudo rm -rf /").decision, Decision::Deny);
    }

    #[test]
    fn force_push_asks() {
        let result = evaluator().evaluate("git status && git push --force origin main");
        assert_eq!(result.decision, Decision::Ask);
    }

    #[test]
    fn pipe_all_allowed_is_allowed() {
        let result = evaluator().evaluate("cat file.txt | grep error | wc -l");
        assert_eq!(result.decision, Decision::Allow);
    }

    #[test]
    fn sh_c_wrapper_transparent_when_inner_allowed() {
        let result = evaluator().evaluate("bash -c 'ls && curl https://example.com'");
        assert_eq!(result.decision, Decision::Allow);
    }

    #[test]
    fn command_substitution_promotes_to_ask() {
        let result = evaluator().evaluate("echo $(whoami)");
        assert_eq!(result.decision, Decision::Ask);
    }

    #[test]
    fn npm_publish_asks() {
        assert_eq!(evaluator().evaluate("npm publish").decision, Decision::Ask);
    }

    #[test]
    fn npm_install_allows() {
        assert_eq!(evaluator().evaluate("npm install lodash").decision, Decision::Allow);
    }

    #[test]
    fn chmod_recursive_777_denies() {
        assert_eq!(evaluator().evaluate("chmod -R 777 /").decision, Decision::Deny);
    }

    #[test]
    fn heredoc_cat_gh_allows() {
        let cmd = "gh pr create --body \"$(cat <<EOF\nhello\nEOF\n)\"";
        assert_eq!(evaluator().evaluate(cmd).decision, Decision::Allow);
    }

    #[test]
    fn trusted_ssh_target_allows() {
        let mut config = Configuration::built_in_defaults();
        config.trusted_ssh_hosts.push("deploy@*.internal.example.com".into());
        let result = Evaluator::new(config).evaluate("ssh deploy@box1.internal.example.com");
        assert_eq!(result.decision, Decision::Allow);
    }

    #[test]
    fn untrusted_ssh_target_asks() {
        assert_eq!(evaluator().evaluate("ssh deploy@unknown.example.com").decision, Decision::Ask);
    }

    #[test]
    fn unparseable_input_asks() {
        // A lone unterminated quote is the simplest thing that can upset
        // the grammar enough to leave an unresolved heredoc/ERROR node.
        let result = evaluator().evaluate("echo <<UNCLOSED");
        assert_eq!(result.decision, Decision::Ask);
    }
}
