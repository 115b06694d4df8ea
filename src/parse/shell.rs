//! Shell command parsing backed by tree-sitter-bash.
//!
//! [`parse`] decomposes a raw command string into a [`ParseResult`]: an
//! ordered list of atomic [`Invocation`]s, a monotonic subshell-taint flag,
//! and the inner text of any command/process substitutions found (for
//! optional recursive evaluation by the caller).
//!
//! # Control flow does not descend
//!
//! Shell keywords (`for`, `if`, `while`, `until`, `case`, function
//! definitions) set the taint flag but are not walked into — their bodies
//! are not statically analyzable in this scope, so no invocations are
//! extracted from them. A bare `for i in *; do rm "$i"; done` therefore
//! yields zero invocations and `has_subshell = true`.
//!
//! # Redirection
//!
//! Output/input redirection tokens never appear in a leaf command's own
//! node span (tree-sitter-bash represents `cmd > file` as a
//! `redirected_statement` wrapping a separate `command` and `file_redirect`
//! child), so redirects are naturally absent from reconstructed segment
//! text and never affect `args`. Heredoc redirects are the one exception
//! that needs active handling — see below.
//!
//! # Substitution extraction
//!
//! Outermost `$()`, backtick, `<()`, and `>()` nodes are collected, their
//! inner text is pushed into `subshell_commands`, and their span is
//! replaced with a `__SUBST__` placeholder in the owning segment's text.
//!
//! # Interpreter wrapper unwrap
//!
//! `sh -c '...'`, `bash -c '...'`, `zsh -c '...'` are recursively
//! re-parsed: the wrapper invocation is replaced by the child's
//! invocations, with taint and substitutions threaded through. Recursion
//! is bounded (depth 8) to avoid pathological nesting; hitting the bound
//! keeps the wrapper invocation and sets taint instead of recursing
//! further.
//!
//! # Heredocs
//!
//! Two distinct idioms are handled, per the module-level contract:
//!
//! 1. `$(cat <<MARKER ... MARKER)` — rewritten to a placeholder token
//!    before parsing, so the literal body text never reaches the grammar
//!    or the rules.
//! 2. A bare `cmd <<EOF ... EOF` redirect — recovered by re-parsing only
//!    the first line of the input (with the heredoc marker stripped) and
//!    forcing taint, since the grammar misparses heredoc bodies as
//!    additional commands.

use super::tokenize::invocation_from_segment;
use super::types::{HEREDOC_TEXT_PLACEHOLDER, Invocation, ParseResult, SUBST_PLACEHOLDER};
use regex::Regex;
use std::cell::RefCell;
use std::sync::OnceLock;
use tree_sitter::{Node, Parser, Tree};

/// Bound on recursive `sh -c` / `bash -c` / `zsh -c` unwrapping.
const MAX_UNWRAP_DEPTH: u32 = 8;

thread_local! {
    /// tree-sitter `Parser` is `!Send`, so we use `thread_local!` storage.
    static TS_PARSER: RefCell<Parser> = RefCell::new({
        let mut p = Parser::new();
        p.set_language(&tree_sitter_bash::LANGUAGE.into())
            .expect("failed to load bash grammar");
        p
    });
}

fn parse_tree(source: &str) -> Tree {
    TS_PARSER.with(|p| {
        p.borrow_mut()
            .parse(source, None)
            .expect("tree-sitter parse failed")
    })
}

// ---------------------------------------------------------------------------
// Heredoc preprocessing: `$(cat <<MARKER ... MARKER)`
// ---------------------------------------------------------------------------

fn heredoc_cat_start_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\$\(cat\s+<<-?\s*['"]?(\w+)['"]?"#).unwrap())
}

/// Rewrite every `$(cat <<MARKER ... MARKER)` span to
/// [`HEREDOC_TEXT_PLACEHOLDER`]. The `regex` crate has no backreferences, so
/// the marker's matching terminator line is located with a second,
/// per-match compiled pattern rather than a single backreferenced regex.
fn preprocess_heredoc_cat(input: &str) -> String {
    let start_re = heredoc_cat_start_re();
    let mut out = String::with_capacity(input.len());
    let mut last_end = 0;

    for cap in start_re.captures_iter(input) {
        let whole = cap.get(0).unwrap();
        if whole.start() < last_end {
            continue;
        }
        let marker = cap.get(1).unwrap().as_str();
        let after = &input[whole.end()..];
        let terminator_pat = format!(r"(?m)^\s*{}\s*\)", regex::escape(marker));
        let Ok(term_re) = Regex::new(&terminator_pat) else {
            continue;
        };
        let Some(term_m) = term_re.find(after) else {
            continue;
        };
        out.push_str(&input[last_end..whole.start()]);
        out.push_str(HEREDOC_TEXT_PLACEHOLDER);
        last_end = whole.end() + term_m.end();
    }
    out.push_str(&input[last_end..]);
    out
}

// ---------------------------------------------------------------------------
// Regular heredoc redirect fallback: first-line extraction
// ---------------------------------------------------------------------------

fn heredoc_marker_strip_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"<<-?\s*['"]?\w+['"]?.*"#).unwrap())
}

fn contains_heredoc_redirect(node: Node) -> bool {
    if node.kind() == "heredoc_redirect" {
        return true;
    }
    let mut cursor = node.walk();
    node.children(&mut cursor).any(contains_heredoc_redirect)
}

/// Strip a trailing heredoc redirect from the first line of `input`,
/// leaving the operative command (if any) that precedes it.
fn first_line_without_heredoc(input: &str) -> Option<String> {
    let first_line = input.lines().next()?;
    let stripped = heredoc_marker_strip_re()
        .replace(first_line, "")
        .trim()
        .to_string();
    if stripped.is_empty() { None } else { Some(stripped) }
}

fn looks_like_heredoc(input: &str) -> bool {
    input.lines().next().is_some_and(|l| l.contains("<<"))
}

// ---------------------------------------------------------------------------
// Substitution extraction
// ---------------------------------------------------------------------------

struct SubstSpan {
    start: usize,
    end: usize,
    inner: String,
}

fn collect_substitutions(node: Node, source: &[u8], out: &mut Vec<SubstSpan>) {
    if matches!(node.kind(), "command_substitution" | "process_substitution") {
        let full = node.utf8_text(source).unwrap_or("");
        let inner = strip_subst_delimiters(full);
        if !inner.is_empty() {
            out.push(SubstSpan {
                start: node.start_byte(),
                end: node.end_byte(),
                inner: inner.to_string(),
            });
        }
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_substitutions(child, source, out);
    }
}

fn strip_subst_delimiters(text: &str) -> &str {
    let t = if text.starts_with("$(") || text.starts_with("<(") || text.starts_with(">(") {
        text.get(2..text.len().saturating_sub(1)).unwrap_or("")
    } else if text.starts_with('`') && text.ends_with('`') && text.len() >= 2 {
        &text[1..text.len() - 1]
    } else {
        text
    };
    t.trim()
}

fn text_replacing_substitutions(source: &str, start: usize, end: usize, subs: &[SubstSpan]) -> String {
    let mut relevant: Vec<&SubstSpan> = subs
        .iter()
        .filter(|s| s.start >= start && s.end <= end)
        .collect();
    if relevant.is_empty() {
        return source[start..end].to_string();
    }
    relevant.sort_by(|a, b| b.start.cmp(&a.start));
    let mut text = source[start..end].to_string();
    for sub in relevant {
        text.replace_range((sub.start - start)..(sub.end - start), SUBST_PLACEHOLDER);
    }
    text
}

// ---------------------------------------------------------------------------
// AST walking: command-segment extraction
// ---------------------------------------------------------------------------

/// Accumulated leaf-command byte spans plus the taint flag picked up along
/// the way.
#[derive(Default)]
struct WalkResult {
    spans: Vec<(usize, usize)>,
    taint: bool,
}

impl WalkResult {
    fn merge(&mut self, other: WalkResult) {
        self.spans.extend(other.spans);
        self.taint |= other.taint;
    }
}

/// Container node kinds that are pure structure: recurse into every named
/// child, no taint of their own.
fn is_transparent_container(kind: &str) -> bool {
    matches!(
        kind,
        "program"
            | "list"
            | "pipeline"
            | "compound_statement"
            | "do_group"
            | "else_clause"
            | "elif_clause"
    )
}

/// Control-flow node kinds: spec mandates taint-without-descent.
fn is_control_flow(kind: &str) -> bool {
    matches!(
        kind,
        "for_statement"
            | "while_statement"
            | "until_statement"
            | "c_style_for_statement"
            | "if_statement"
            | "case_statement"
            | "function_definition"
    )
}

fn walk_ast(node: Node, source: &[u8]) -> WalkResult {
    match node.kind() {
        k if is_control_flow(k) => WalkResult {
            spans: Vec::new(),
            taint: true,
        },
        k if is_transparent_container(k) => {
            let mut result = WalkResult::default();
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                result.merge(walk_ast(child, source));
            }
            result
        }
        "command" | "declaration_command" | "variable_assignment" => WalkResult {
            spans: vec![(node.start_byte(), node.end_byte())],
            taint: false,
        },
        "subshell" => {
            let mut result = WalkResult::default();
            result.taint = true;
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                result.merge(walk_ast(child, source));
            }
            result
        }
        "redirected_statement" => {
            let mut result = WalkResult::default();
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                if matches!(
                    child.kind(),
                    "file_redirect" | "herestring_redirect" | "heredoc_redirect"
                ) {
                    continue;
                }
                result.merge(walk_ast(child, source));
            }
            result
        }
        "negated_command" => {
            let mut cursor = node.walk();
            node.named_children(&mut cursor)
                .next()
                .map(|child| walk_ast(child, source))
                .unwrap_or_default()
        }
        "command_substitution" | "process_substitution" | "comment" | "heredoc_body" => {
            WalkResult::default()
        }
        _ if node.is_named() => WalkResult {
            spans: vec![(node.start_byte(), node.end_byte())],
            taint: false,
        },
        _ => WalkResult::default(),
    }
}

// ---------------------------------------------------------------------------
// Interpreter wrapper unwrap
// ---------------------------------------------------------------------------

fn is_shell_wrapper(command: &str) -> bool {
    matches!(command, "sh" | "bash" | "zsh")
}

/// If `inv` is an `sh -c '...'`-style wrapper, recursively parse its script
/// argument and return the child invocations plus threaded taint/subshell
/// data. Returns `None` when `inv` isn't a wrapper, when the depth bound is
/// hit (in which case taint is still set on the wrapper to satisfy the
/// promote-to-ask-on-overflow requirement), or when the child parse failed
/// (the wrapper is kept as-is, per spec).
fn unwrap_shell_wrapper(inv: &Invocation, depth: u32) -> Option<ParseResult> {
    if !is_shell_wrapper(&inv.command) || inv.args.len() < 2 || inv.args[0] != "-c" {
        return None;
    }
    if depth >= MAX_UNWRAP_DEPTH {
        return Some(ParseResult {
            commands: vec![inv.clone()],
            has_subshell: true,
            subshell_commands: Vec::new(),
            parse_error: false,
        });
    }
    let child = parse_depth(&inv.args[1], depth + 1);
    if child.parse_error {
        return None;
    }
    Some(child)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a raw (possibly multi-line) command string into a [`ParseResult`].
/// Never panics: any internal failure that cannot be recovered by the
/// heredoc fallback yields `parse_error = true` with an empty command list.
pub fn parse(input: &str) -> ParseResult {
    if input.trim().is_empty() {
        return ParseResult::empty();
    }
    parse_depth(input, 0)
}

fn parse_depth(input: &str, depth: u32) -> ParseResult {
    if input.trim().is_empty() {
        return ParseResult::empty();
    }

    let preprocessed = preprocess_heredoc_cat(input);
    let tree = parse_tree(&preprocessed);
    let root = tree.root_node();
    let source = preprocessed.as_bytes();

    if contains_heredoc_redirect(root) {
        return match first_line_without_heredoc(&preprocessed) {
            Some(first_line) => {
                let mut result = parse_depth(&first_line, depth);
                result.has_subshell = true;
                result
            }
            None => ParseResult {
                commands: Vec::new(),
                has_subshell: true,
                subshell_commands: Vec::new(),
                parse_error: true,
            },
        };
    }

    if root.has_error() {
        if looks_like_heredoc(&preprocessed)
            && let Some(first_line) = first_line_without_heredoc(&preprocessed)
        {
            let mut result = parse_depth(&first_line, depth);
            result.has_subshell = true;
            return result;
        }
        return ParseResult {
            commands: Vec::new(),
            has_subshell: false,
            subshell_commands: Vec::new(),
            parse_error: true,
        };
    }

    let mut subst_spans = Vec::new();
    collect_substitutions(root, source, &mut subst_spans);

    let walked = walk_ast(root, source);

    let mut commands = Vec::new();
    let mut has_subshell = walked.taint || !subst_spans.is_empty();
    let mut subshell_commands: Vec<String> = subst_spans.iter().map(|s| s.inner.clone()).collect();

    for (start, end) in walked.spans {
        let text = text_replacing_substitutions(&preprocessed, start, end, &subst_spans);
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        let inv = invocation_from_segment(text);
        if inv.command.is_empty() {
            continue;
        }

        match unwrap_shell_wrapper(&inv, depth) {
            Some(child) => {
                commands.extend(child.commands);
                has_subshell |= child.has_subshell;
                subshell_commands.extend(child.subshell_commands);
            }
            None => commands.push(inv),
        }
    }

    ParseResult {
        commands,
        has_subshell,
        subshell_commands,
        parse_error: false,
    }
}

/// Dump the tree-sitter AST and parsed invocations for a command string.
/// Used by the `--dump-ast` CLI flag.
pub fn dump_ast(command: &str) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    let preprocessed = preprocess_heredoc_cat(command);
    let tree = parse_tree(&preprocessed);
    writeln!(out, "── tree-sitter AST ──").unwrap();
    fn print_node(out: &mut String, node: Node, source: &[u8], indent: usize) {
        let text = node.utf8_text(source).unwrap_or("???");
        let short: String = text.chars().take(60).collect();
        let tag = if node.is_named() { "named" } else { "anon" };
        writeln!(out, "{}{} [{}] {:?}", "  ".repeat(indent), node.kind(), tag, short).unwrap();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            print_node(out, child, source, indent + 1);
        }
    }
    print_node(&mut out, tree.root_node(), preprocessed.as_bytes(), 0);

    let result = parse(command);
    writeln!(out, "\n── parsed invocations ──").unwrap();
    for (i, inv) in result.commands.iter().enumerate() {
        writeln!(out, "  {i}: command={:?} args={:?} env={:?}", inv.command, inv.args, inv.env_prefixes).unwrap();
    }
    writeln!(out, "\n  has_subshell={}", result.has_subshell).unwrap();
    writeln!(out, "  parse_error={}", result.parse_error).unwrap();
    if !result.subshell_commands.is_empty() {
        writeln!(out, "\n── subshell commands ──").unwrap();
        for (i, s) in result.subshell_commands.iter().enumerate() {
            writeln!(out, "  {i}: {s:?}").unwrap();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_command() {
        let r = parse("ls -la");
        assert_eq!(r.commands.len(), 1);
        assert_eq!(r.commands[0].command, "ls");
        assert_eq!(r.commands[0].args, vec!["-la"]);
        assert!(!r.has_subshell);
    }

    #[test]
    fn pipe_split() {
        let r = parse("a | b | c");
        assert_eq!(r.commands.len(), 3);
        assert_eq!(r.commands[0].command, "a");
        assert_eq!(r.commands[1].command, "b");
        assert_eq!(r.commands[2].command, "c");
        assert!(!r.has_subshell);
    }

    #[test]
    fn logical_chain() {
        let r = parse("a && b || c");
        assert_eq!(r.commands.len(), 3);
        assert!(!r.has_subshell);
    }

    #[test]
    fn empty_input() {
        let r = parse("");
        assert!(r.commands.is_empty());
        assert!(!r.has_subshell);
        assert!(!r.parse_error);
    }

    #[test]
    fn whitespace_only_input() {
        let r = parse("   \n  ");
        assert!(r.commands.is_empty());
        assert!(!r.has_subshell);
    }

    #[test]
    fn command_substitution_taints_and_collects() {
        let r = parse("echo $(whoami)");
        assert_eq!(r.commands.len(), 1);
        assert_eq!(r.commands[0].args, vec![SUBST_PLACEHOLDER]);
        assert!(r.has_subshell);
        assert_eq!(r.subshell_commands, vec!["whoami"]);
    }

    #[test]
    fn backtick_substitution() {
        let r = parse("echo `date`");
        assert!(r.has_subshell);
        assert_eq!(r.subshell_commands, vec!["date"]);
    }

    #[test]
    fn process_substitution_taints_and_collects() {
        let r = parse("diff <(ls a) <(ls b)");
        assert!(r.has_subshell);
        assert_eq!(r.subshell_commands, vec!["ls a", "ls b"]);
    }

    #[test]
    fn subshell_taints_and_descends() {
        let r = parse("(ls)");
        assert!(r.has_subshell);
        assert_eq!(r.commands.len(), 1);
        assert_eq!(r.commands[0].command, "ls");
    }

    #[test]
    fn for_loop_taints_and_does_not_descend() {
        let r = parse("for i in *; do rm \"$i\"; done");
        assert!(r.has_subshell);
        assert!(r.commands.is_empty());
    }

    #[test]
    fn if_statement_taints_and_does_not_descend() {
        let r = parse("if test -f x; then rm x; fi");
        assert!(r.has_subshell);
        assert!(r.commands.is_empty());
    }

    #[test]
    fn while_loop_taints_and_does_not_descend() {
        let r = parse("while true; do sleep 1; done");
        assert!(r.has_subshell);
        assert!(r.commands.is_empty());
    }

    #[test]
    fn case_statement_taints_and_does_not_descend() {
        let r = parse("case $x in rm) echo hi ;; esac");
        assert!(r.has_subshell);
        assert!(r.commands.is_empty());
    }

    #[test]
    fn function_definition_taints_and_does_not_descend() {
        let r = parse("f() { rm -rf /; }");
        assert!(r.has_subshell);
        assert!(r.commands.is_empty());
    }

    #[test]
    fn basename_normalization() {
        let r = parse("/usr/bin/ls -la");
        assert_eq!(r.commands[0].command, "ls");
        assert_eq!(r.commands[0].raw, "/usr/bin/ls -la");
    }

    #[test]
    fn sh_c_unwrap_transparent() {
        let direct = parse("ls -la");
        let wrapped = parse("sh -c 'ls -la'");
        assert_eq!(wrapped.commands.len(), direct.commands.len());
        assert_eq!(wrapped.commands[0].command, "ls");
    }

    #[test]
    fn bash_c_unwrap_propagates_taint() {
        let r = parse("bash -c 'ls && curl https://example.com'");
        assert_eq!(r.commands.len(), 2);
        assert_eq!(r.commands[0].command, "ls");
        assert_eq!(r.commands[1].command, "curl");
    }

    #[test]
    fn sh_c_nested_substitution_taints() {
        let r = parse("sh -c 'echo $(whoami)'");
        assert!(r.has_subshell);
        assert_eq!(r.subshell_commands, vec!["whoami"]);
    }

    #[test]
    fn heredoc_cat_idiom_is_preprocessed() {
        let cmd = "gh pr create --body \"$(cat <<EOF\nhello\nEOF\n)\"";
        let r = parse(cmd);
        assert!(!r.parse_error);
        assert_eq!(r.commands.len(), 1);
        assert_eq!(r.commands[0].command, "gh");
    }

    #[test]
    fn regular_heredoc_redirect_recovers_first_line() {
        let cmd = "cat <<EOF\nhello\nEOF";
        let r = parse(cmd);
        assert!(r.has_subshell);
        assert_eq!(r.commands.len(), 1);
        assert_eq!(r.commands[0].command, "cat");
    }

    #[test]
    fn round_trip_property() {
        let r = parse("FOO=bar /usr/bin/git push origin main");
        let inv = &r.commands[0];
        let mut parts: Vec<&str> = inv.env_prefixes.iter().map(String::as_str).collect();
        parts.push("/usr/bin/git");
        parts.extend(inv.args.iter().map(String::as_str));
        assert_eq!(parts.join(" "), inv.raw);
    }
}
