//! warden: PreToolUse hook adapter.
//!
//! Reads a single JSON object from stdin shaped like
//! `{"tool_name": "Bash", "tool_input": {"command": "..."}}`, evaluates the
//! command, and reports the decision back to the host via stdout/exit code:
//!
//! - `allow` → `{"decision":"approve"}` on stdout, exit 0
//! - `ask`   → `{"decision":"ask","message":"<reason>"}` on stdout, exit 0
//! - `deny`  → the reason on stderr, exit 2
//!
//! Non-`Bash` tool calls and malformed input are treated as nothing to gate:
//! approved without inspection. `--dump-ast` and `--dump-config` are
//! diagnostic flags for debugging a policy or a parse, not part of the hook
//! protocol.
//!
//! A broken configuration (bad YAML, bad regex) is fail-loud: it is never
//! laundered into an ordinary `ask` decision. The configuration is loaded
//! up front, and a load error prints to stderr and exits nonzero before any
//! command is evaluated.

use std::io::Read;

use serde::{Deserialize, Serialize};

fn main() {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("--dump-ast") => {
            let command = args.collect::<Vec<_>>().join(" ");
            print!("{}", warden::parse::dump_ast(&command));
            return;
        }
        Some("--dump-config") => {
            dump_config();
            return;
        }
        _ => {}
    }

    warden::logging::init();

    let config = match warden::config::Configuration::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("refusing to start: invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() {
        approve();
        return;
    }

    let hook_input: HookInput = match serde_json::from_str(&input) {
        Ok(parsed) => parsed,
        Err(_) => {
            approve();
            return;
        }
    };

    if hook_input.tool_name != "Bash" {
        approve();
        return;
    }

    let command = hook_input.tool_input.command;
    let result = warden::evaluate_with_config(&config, &command);
    warden::logging::log_decision(&command, &result);

    use warden::eval::Decision;
    match result.decision {
        Decision::Allow => approve(),
        Decision::Ask => {
            let output = HookOutput { decision: "ask", message: Some(result.reason) };
            println!("{}", serde_json::to_string(&output).expect("HookOutput always serializes"));
        }
        Decision::Deny => {
            eprintln!("{}", result.reason);
            std::process::exit(2);
        }
    }
}

fn approve() {
    let output = HookOutput { decision: "approve", message: None };
    println!("{}", serde_json::to_string(&output).expect("HookOutput always serializes"));
}

fn dump_config() {
    match warden::config::Configuration::load() {
        Ok(config) => {
            println!("default_decision: {}", config.default_decision.as_str());
            println!("ask_on_subshell: {}", config.ask_on_subshell);
            println!("always_allow: {} commands", config.always_allow.len());
            println!("always_deny: {} commands", config.always_deny.len());
            println!("global_deny: {} patterns", config.global_deny.len());
            println!("rules: {} commands", config.rules.len());
        }
        Err(e) => {
            eprintln!("config error: {e}");
            std::process::exit(1);
        }
    }
}

#[derive(Debug, Deserialize)]
struct HookInput {
    tool_name: String,
    tool_input: ToolInput,
}

#[derive(Debug, Deserialize)]
struct ToolInput {
    command: String,
}

#[derive(Debug, Serialize)]
struct HookOutput {
    decision: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}
