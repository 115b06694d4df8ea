//! Shell command parsing: tree-sitter-bash AST, shlex tokenizer, and shared types.
//!
//! - `shell` — tree-sitter-bash AST walker that decomposes a command string
//!   into atomic invocations, subshell taint, and extracted substitutions.
//! - `tokenize` — shlex-based word splitting and invocation assembly.
//! - `types` — data types shared between the parser and the evaluator.

/// tree-sitter-bash AST walker for compound command decomposition.
pub mod shell;
/// shlex-based tokenization and invocation assembly.
pub mod tokenize;
/// Shared types: [`Invocation`], [`ParseResult`].
pub mod types;

pub use shell::{dump_ast, parse};
pub use tokenize::{basename, tokenize};
pub use types::{HEREDOC_TEXT_PLACEHOLDER, Invocation, ParseResult, SUBST_PLACEHOLDER};
