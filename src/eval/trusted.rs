//! Trusted-target matching: fnmatch-style glob matching against the
//! connection/exec target argument of `ssh`, `docker exec`, `kubectl`, and
//! similar remote-execution commands.
//!
//! The source specification leaves the exact matching semantics as an
//! extension point; this implementation uses [`glob::Pattern`] and treats
//! any ambiguity (no target argument found, or a malformed pattern) as
//! `ask`, per the fail-closed posture of the rest of the evaluator.

use glob::Pattern;

/// Check whether `target` matches any of the configured trusted-target
/// globs. A malformed glob pattern in the configuration is skipped (it
/// would already have been rejected as an invalid configuration at load
/// time in a stricter implementation, but skipping here keeps this
/// function infallible).
pub fn is_trusted(target: &str, trusted: &[String]) -> bool {
    trusted.iter().any(|pattern| {
        Pattern::new(pattern).is_ok_and(|p| p.matches(target))
    })
}

/// Extract the `user@host` (or bare `host`) target argument from an `ssh`
/// invocation's args: the first argument that isn't a flag and doesn't look
/// like an option value.
pub fn ssh_target<'a>(args: &'a [String]) -> Option<&'a str> {
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg.starts_with('-') {
            // Flags that take a separate value argument (-p port, -i identity, ...).
            if matches!(arg.as_str(), "-p" | "-i" | "-o" | "-F" | "-l") {
                skip_next = true;
            }
            continue;
        }
        return Some(arg.as_str());
    }
    None
}

/// Extract the container name/ID argument from a `docker exec` invocation's
/// args (the first non-flag word after a leading `exec`).
pub fn docker_exec_target<'a>(args: &'a [String]) -> Option<&'a str> {
    let mut past_exec = false;
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if !past_exec {
            if arg == "exec" {
                past_exec = true;
            }
            continue;
        }
        if arg.starts_with('-') {
            if matches!(arg.as_str(), "-u" | "-w" | "-e") {
                skip_next = true;
            }
            continue;
        }
        return Some(arg.as_str());
    }
    None
}

/// Extract the `--context`/`--cluster` value from a `kubectl` invocation's
/// args, defaulting to "no explicit context" (`None`) when absent.
pub fn kubectl_context<'a>(args: &'a [String]) -> Option<&'a str> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(value) = arg.strip_prefix("--context=") {
            return Some(value);
        }
        if arg == "--context" {
            return iter.next().map(String::as_str);
        }
    }
    None
}
