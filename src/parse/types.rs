//! Types produced by the shell parser and consumed by the eval layer.

/// A single atomic command invocation extracted from a shell AST.
///
/// `command` is always the basename of the executable word (path components
/// stripped). `raw` reconstructs `envPrefixes + [original command word] +
/// args` space-joined, using the *original* (possibly path-qualified) word,
/// so whole-string regex rules still see a literal path when one was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub args: Vec<String>,
    pub env_prefixes: Vec<String>,
    pub raw: String,
}

/// The result of parsing one (possibly compound) command string.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub commands: Vec<Invocation>,
    pub has_subshell: bool,
    pub subshell_commands: Vec<String>,
    pub parse_error: bool,
}

impl ParseResult {
    pub fn empty() -> Self {
        Self {
            commands: Vec::new(),
            has_subshell: false,
            subshell_commands: Vec::new(),
            parse_error: false,
        }
    }
}

/// Placeholder substituted for the `$(cat <<MARKER ... MARKER)` idiom before
/// parsing, so the heredoc body text never reaches the parser or the rules.
pub const HEREDOC_TEXT_PLACEHOLDER: &str = "__HEREDOC_TEXT__";

/// Placeholder substituted for ordinary command/process substitutions
/// (`$()`, backticks, `<()`, `>()`) once their inner text has been collected
/// into [`ParseResult::subshell_commands`].
pub const SUBST_PLACEHOLDER: &str = "__SUBST__";
