//! Word splitting and invocation assembly from a flat command-segment string.

use super::types::Invocation;

/// Tokenize a command segment into words using shlex (POSIX word splitting).
pub fn tokenize(command: &str) -> Vec<String> {
    shlex::split(command).unwrap_or_else(|| {
        command.split_whitespace().map(String::from).collect()
    })
}

/// Split leading `KEY=VALUE` assignment words from the remaining words.
/// Returns `(env_prefixes, rest)` where `env_prefixes` are the raw
/// `KEY=VALUE` words in order and `rest` is everything after them.
fn split_env_prefixes(words: &[String]) -> (Vec<String>, &[String]) {
    let mut split_at = 0;
    for word in words {
        if is_env_assignment(word) {
            split_at += 1;
        } else {
            break;
        }
    }
    (words[..split_at].to_vec(), &words[split_at..])
}

fn is_env_assignment(word: &str) -> bool {
    let Some(eq_pos) = word.find('=') else {
        return false;
    };
    let before = &word[..eq_pos];
    !before.is_empty()
        && before
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && before
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Strip path components from a command word, keeping only the basename.
/// `/usr/bin/ls` -> `ls`, `./script.sh` -> `script.sh`, `ls` -> `ls`.
pub fn basename(word: &str) -> String {
    match word.rsplit_once('/') {
        Some((_, name)) if !name.is_empty() => name.to_string(),
        _ => word.to_string(),
    }
}

/// Build an [`Invocation`] from a flat command-segment string (already
/// stripped of shell operators, e.g. one side of a pipe).
///
/// `raw` reconstructs `envPrefixes + [original command word] + args`
/// space-joined from the *original* (possibly path-qualified) command word,
/// satisfying the round-trip property: joining those parts exactly
/// reproduces the normalized text of the segment.
pub fn invocation_from_segment(segment: &str) -> Invocation {
    let words = tokenize(segment);
    let (env_prefixes, rest) = split_env_prefixes(&words);

    let Some((command_word, args)) = rest.split_first() else {
        return Invocation {
            command: String::new(),
            args: Vec::new(),
            env_prefixes,
            raw: segment.trim().to_string(),
        };
    };

    let command = basename(command_word);
    let mut raw_parts: Vec<&str> = Vec::with_capacity(env_prefixes.len() + 1 + args.len());
    raw_parts.extend(env_prefixes.iter().map(String::as_str));
    raw_parts.push(command_word.as_str());
    raw_parts.extend(args.iter().map(String::as_str));

    Invocation {
        command,
        args: args.to_vec(),
        env_prefixes,
        raw: raw_parts.join(" "),
    }
}
