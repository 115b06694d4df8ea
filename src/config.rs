//! Layered YAML configuration.
//!
//! Three layers are merged, lowest priority first: built-in defaults, the
//! user config at `~/.claude/warden.yaml`, and the project config at
//! `<cwd>/.claude/warden.yaml`. Scalars from a higher layer replace the
//! lower one when present; list fields (`alwaysAllow`, `alwaysDeny`, the
//! `trusted*` lists, `globalDeny`) are unioned and deduplicated; `rules`
//! entries are prepended, so a higher layer's rule for a command shadows a
//! lower layer's rule for the same command wholesale rather than merging
//! their `argPatterns`.
//!
//! A malformed config (bad YAML, bad regex) is a load-time error: we never
//! silently fall back to defaults on a broken user file, since that would
//! hide a misconfigured safety policy from the person who wrote it.

use std::fmt;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Deserialize;

use crate::commands;
use crate::eval::decision::Decision;
use crate::eval::matcher::{ArgCount, ArgPattern, CommandRule, MatchSpec};

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Yaml(PathBuf, serde_yaml::Error),
    BadRegex { pattern: String, source: regex::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "{}: {e}", path.display()),
            ConfigError::Yaml(path, e) => write!(f, "{}: {e}", path.display()),
            ConfigError::BadRegex { pattern, source } => {
                write!(f, "invalid regex `{pattern}`: {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// A compiled global-deny pattern (layer 1: matched against the raw,
/// pre-parse input string).
#[derive(Debug, Clone)]
pub struct GlobalDenyPattern {
    pub pattern: Regex,
    pub reason: String,
}

/// The fully merged, ready-to-evaluate configuration.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub default_decision: Decision,
    pub ask_on_subshell: bool,
    pub always_allow: Vec<String>,
    pub always_deny: Vec<String>,
    pub global_deny: Vec<GlobalDenyPattern>,
    pub trusted_ssh_hosts: Vec<String>,
    pub trusted_docker_containers: Vec<String>,
    pub trusted_kubectl_contexts: Vec<String>,
    pub trusted_sprites: Vec<String>,
    pub rules: Vec<CommandRule>,
}

impl Configuration {
    /// The built-in policy, entirely independent of the filesystem.
    pub fn built_in_defaults() -> Self {
        Self {
            default_decision: Decision::Ask,
            ask_on_subshell: true,
            always_allow: commands::always_allow_list(),
            always_deny: commands::always_deny_list(),
            global_deny: commands::global_deny_defaults(),
            trusted_ssh_hosts: Vec::new(),
            trusted_docker_containers: Vec::new(),
            trusted_kubectl_contexts: Vec::new(),
            trusted_sprites: Vec::new(),
            rules: commands::built_in_rules(),
        }
    }

    /// Resolve built-in defaults merged with the user and project configs,
    /// reading whichever of `~/.claude/warden.yaml` and
    /// `<cwd>/.claude/warden.yaml` exist.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::built_in_defaults();
        if let Some(raw) = read_layer(&user_config_path())? {
            config = merge(config, raw)?;
        }
        if let Some(raw) = read_layer(&project_config_path())? {
            config = merge(config, raw)?;
        }
        Ok(config)
    }
}

fn user_config_path() -> PathBuf {
    let home = std::env::var_os("HOME").unwrap_or_default();
    Path::new(&home).join(".claude/warden.yaml")
}

fn project_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_default()
        .join(".claude/warden.yaml")
}

fn read_layer(path: &Path) -> Result<Option<RawConfig>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ConfigError::Io(path.to_path_buf(), e)),
    };
    let raw: RawConfig = serde_yaml::from_str(&content)
        .map_err(|e| ConfigError::Yaml(path.to_path_buf(), e))?;
    Ok(Some(raw))
}

fn merge(base: Configuration, raw: RawConfig) -> Result<Configuration, ConfigError> {
    let mut merged = base;

    if let Some(default_decision) = raw.default_decision {
        merged.default_decision = default_decision;
    }
    if let Some(ask_on_subshell) = raw.ask_on_subshell {
        merged.ask_on_subshell = ask_on_subshell;
    }

    union_into(&mut merged.always_allow, raw.always_allow.unwrap_or_default());
    union_into(&mut merged.always_deny, raw.always_deny.unwrap_or_default());
    union_into(&mut merged.trusted_ssh_hosts, raw.trusted_ssh_hosts.unwrap_or_default());
    union_into(
        &mut merged.trusted_docker_containers,
        raw.trusted_docker_containers.unwrap_or_default(),
    );
    union_into(
        &mut merged.trusted_kubectl_contexts,
        raw.trusted_kubectl_contexts.unwrap_or_default(),
    );
    union_into(&mut merged.trusted_sprites, raw.trusted_sprites.unwrap_or_default());

    for raw_pattern in raw.global_deny.unwrap_or_default() {
        merged.global_deny.push(compile_global_deny(raw_pattern)?);
    }

    for raw_rule in raw.rules.unwrap_or_default() {
        merged.rules.insert(0, compile_rule(raw_rule)?);
    }

    Ok(merged)
}

fn union_into(existing: &mut Vec<String>, additions: Vec<String>) {
    for item in additions {
        if !existing.contains(&item) {
            existing.push(item);
        }
    }
}

fn compile_global_deny(raw: RawGlobalDeny) -> Result<GlobalDenyPattern, ConfigError> {
    let pattern = Regex::new(&raw.pattern).map_err(|source| ConfigError::BadRegex {
        pattern: raw.pattern.clone(),
        source,
    })?;
    Ok(GlobalDenyPattern { pattern, reason: raw.reason })
}

fn compile_rule(raw: RawRule) -> Result<CommandRule, ConfigError> {
    let mut rule = CommandRule::new(raw.command, raw.default.unwrap_or(Decision::Ask));
    for raw_pattern in raw.arg_patterns.unwrap_or_default() {
        rule = rule.with_pattern(compile_arg_pattern(raw_pattern)?);
    }
    Ok(rule)
}

fn compile_arg_pattern(raw: RawArgPattern) -> Result<ArgPattern, ConfigError> {
    Ok(ArgPattern {
        match_spec: compile_match_spec(raw.match_spec)?,
        decision: raw.decision,
        reason: raw.reason,
        description: raw.description,
    })
}

fn compile_match_spec(raw: RawMatchSpec) -> Result<MatchSpec, ConfigError> {
    Ok(MatchSpec {
        // anyArgMatches is fullmatch semantics (crate::eval::matcher::fullmatch
        // expects its regexes pre-anchored), argsMatch is a substring search
        // over the raw text, so only the former gets wrapped.
        any_arg_matches: raw.any_arg_matches.map(compile_fullmatch_patterns).transpose()?,
        args_match: raw.args_match.map(compile_patterns).transpose()?,
        no_args: raw.no_args,
        arg_count: raw.arg_count.map(|c| ArgCount { min: c.min, max: c.max }),
        not: raw.not.unwrap_or(false),
    })
}

fn compile_patterns(patterns: Vec<String>) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .into_iter()
        .map(|p| {
            Regex::new(&p).map_err(|source| ConfigError::BadRegex { pattern: p, source })
        })
        .collect()
}

/// Wrap each pattern as `^(?:pattern)$` so `anyArgMatches` gets true fullmatch
/// semantics regardless of how the user wrote it (see
/// `crate::eval::matcher::fullmatch`'s doc comment for why bounds-checking a
/// `find()` result isn't a safe substitute for anchoring at compile time).
fn compile_fullmatch_patterns(patterns: Vec<String>) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .into_iter()
        .map(|p| {
            let anchored = format!("^(?:{p})$");
            Regex::new(&anchored).map_err(|source| ConfigError::BadRegex { pattern: p, source })
        })
        .collect()
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    default_decision: Option<Decision>,
    ask_on_subshell: Option<bool>,
    always_allow: Option<Vec<String>>,
    always_deny: Option<Vec<String>>,
    global_deny: Option<Vec<RawGlobalDeny>>,
    trusted_ssh_hosts: Option<Vec<String>>,
    trusted_docker_containers: Option<Vec<String>>,
    trusted_kubectl_contexts: Option<Vec<String>>,
    trusted_sprites: Option<Vec<String>>,
    rules: Option<Vec<RawRule>>,
}

#[derive(Debug, Deserialize)]
struct RawGlobalDeny {
    pattern: String,
    reason: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRule {
    command: String,
    default: Option<Decision>,
    #[serde(default)]
    arg_patterns: Option<Vec<RawArgPattern>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArgPattern {
    #[serde(flatten)]
    match_spec: RawMatchSpec,
    decision: Decision,
    reason: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RawMatchSpec {
    any_arg_matches: Option<Vec<String>>,
    args_match: Option<Vec<String>>,
    no_args: Option<bool>,
    arg_count: Option<RawArgCount>,
    #[serde(rename = "not")]
    not: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawArgCount {
    min: Option<usize>,
    max: Option<usize>,
}
