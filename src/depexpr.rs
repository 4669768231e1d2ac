//! Rich dependency expression parsing.
//!
//! Given a raw dependency string, yields the flat set of atomic capability
//! names that, if any of them were provided, would be relevant to
//! satisfying the expression. This is a deliberate over-approximation: every
//! leaf of the boolean expression is emitted regardless of operator, since
//! the resolver tracks capabilities by name and never evaluates the boolean
//! structure at selection time. Malformed expressions degrade to
//! best-effort token extraction; this never fails the overall run.

use crate::types::Atom;

const RESERVED_WORDS: &[&str] = &["and", "or", "if", "else", "with", "without", "unless"];

/// Strips only the *unbalanced* leading `(`/trailing `)` from a
/// whitespace-delimited token.
///
/// A token like `pkgX(abc)` carries its own balanced pair of parens and must
/// come through whole; a token like `(pkg_g` or `pkg_h)` carries a
/// structural paren left over from the surrounding boolean expression and
/// must have it stripped. Balance is checked by comparing the token's total
/// `(` and `)` counts before each strip, so a synthetic capability name's
/// internal parens are never touched.
fn strip_structural_parens(token: &str) -> &str {
    let mut s = token;
    while let Some(rest) = s.strip_prefix('(') {
        let opens = s.chars().filter(|&c| c == '(').count();
        let closes = s.chars().filter(|&c| c == ')').count();
        if opens > closes {
            s = rest;
        } else {
            break;
        }
    }
    while let Some(rest) = s.strip_suffix(')') {
        let opens = s.chars().filter(|&c| c == '(').count();
        let closes = s.chars().filter(|&c| c == ')').count();
        if closes > opens {
            s = rest;
        } else {
            break;
        }
    }
    s
}

/// Tokenizes `expr` into leaf capability names.
///
/// Splits on whitespace only, then strips structural parens per token (see
/// [`strip_structural_parens`]) rather than replacing every `(`/`)` in the
/// whole expression with spaces, which would also split apart a synthetic
/// capability name like `pkgX(abc)`. Reserved boolean keywords (`and`, `or`,
/// `if`, `else`, `with`, `without`, `unless`) are dropped. Tokens starting
/// with `/` (filesystem paths) are dropped entirely.
fn tokenize(expr: &str) -> Vec<String> {
    expr.split_whitespace()
        .map(strip_structural_parens)
        .filter(|token| !token.is_empty())
        .filter(|token| !RESERVED_WORDS.contains(token))
        .filter(|token| !token.starts_with('/'))
        .map(str::to_string)
        .collect()
}

/// Expands a single requirement atom into the set of leaf atoms it stands
/// for.
///
/// If `atom.name` is already a bare, single-token capability name, the atom
/// is returned unchanged (preserving `flags`/`epoch`/`version`/`release`).
/// Otherwise `atom.name` is treated as a rich boolean expression and split
/// into name-only leaf atoms, since no structured version constraint can be
/// attributed to an individual leaf of a boolean expression. A file-path
/// atom (or an expression reducing to none) expands to nothing.
#[must_use]
pub fn expand(atom: &Atom) -> Vec<Atom> {
    let leaves = tokenize(&atom.name);
    match leaves.as_slice() {
        [] => Vec::new(),
        [single] if single == atom.name.trim() => vec![atom.clone()],
        _ => leaves.into_iter().map(Atom::named).collect(),
    }
}
