//! Epoch-Version-Release comparison.
//!
//! Implements RPM's package-version ordering, used by every "pick the
//! highest candidate" decision in the resolver. A missing epoch is treated
//! as `0`, matching RPM convention, so a unit with no explicit epoch is
//! never penalized relative to one with `epoch=0`. Segments within a
//! version/release string alternate between numeric and alphabetic runs;
//! numeric segments always outrank alphabetic ones at the same position,
//! leading zeros are ignored when comparing numeric segments, `~` sorts
//! below everything (including the end of the string), and `^` sorts above
//! everything (including the end of the string).

use std::cmp::Ordering;

/// An Epoch-Version-Release tuple, borrowed from a [`BinaryUnit`](crate::BinaryUnit).
#[derive(Clone, Copy, Debug)]
pub struct Evr<'a> {
    /// Epoch, defaulting to `"0"` when absent.
    pub epoch: &'a str,
    /// Version string.
    pub version: &'a str,
    /// Release string.
    pub release: &'a str,
}

impl<'a> Evr<'a> {
    /// Builds an [`Evr`] view, defaulting a missing epoch to `"0"`.
    #[must_use]
    pub fn new(epoch: Option<&'a str>, version: &'a str, release: &'a str) -> Self {
        Self {
            epoch: epoch.unwrap_or("0"),
            version,
            release,
        }
    }
}

impl PartialEq for Evr<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Evr<'_> {}

impl PartialOrd for Evr<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Evr<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        rpmvercmp(self.epoch, other.epoch)
            .then_with(|| rpmvercmp(self.version, other.version))
            .then_with(|| rpmvercmp(self.release, other.release))
    }
}

fn is_separator(c: char) -> bool {
    !c.is_ascii_alphanumeric() && c != '~' && c != '^'
}

/// Compares two version/release segments using RPM's `rpmvercmp` algorithm.
fn rpmvercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let mut a = a;
    let mut b = b;

    loop {
        a = a.trim_start_matches(is_separator);
        b = b.trim_start_matches(is_separator);

        match (a.starts_with('~'), b.starts_with('~')) {
            (true, true) => {
                a = &a[1..];
                b = &b[1..];
                continue;
            }
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        match (a.starts_with('^'), b.starts_with('^')) {
            (true, true) => {
                a = &a[1..];
                b = &b[1..];
                continue;
            }
            (true, false) => {
                return if b.is_empty() {
                    Ordering::Greater
                } else {
                    Ordering::Less
                };
            }
            (false, true) => {
                return if a.is_empty() {
                    Ordering::Less
                } else {
                    Ordering::Greater
                };
            }
            (false, false) => {}
        }

        if a.is_empty() || b.is_empty() {
            break;
        }

        let a_numeric = a.starts_with(|c: char| c.is_ascii_digit());
        let b_numeric = b.starts_with(|c: char| c.is_ascii_digit());

        if a_numeric != b_numeric {
            // A numeric segment always outranks an alphabetic one.
            return if a_numeric {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        let (seg_a, rest_a) = take_run(a, a_numeric);
        let (seg_b, rest_b) = take_run(b, b_numeric);
        a = rest_a;
        b = rest_b;

        let ordering = if a_numeric {
            let seg_a = seg_a.trim_start_matches('0');
            let seg_b = seg_b.trim_start_matches('0');
            seg_a
                .len()
                .cmp(&seg_b.len())
                .then_with(|| seg_a.cmp(seg_b))
        } else {
            seg_a.cmp(seg_b)
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    // Exhausted one side. RPM's convention: a leftover *numeric* segment
    // means the longer string is newer ("1.0.1" > "1.0"), but a leftover
    // *alphabetic* segment means the longer string is older ("1.0" >
    // "1.0a", since a trailing letter reads as a pre-release tag). Any
    // leftover `~`/`^` was already resolved above, so what remains here
    // starts with an ordinary alphanumeric character.
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => {
            if b.starts_with(|c: char| c.is_ascii_digit()) {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
        (false, true) => {
            if a.starts_with(|c: char| c.is_ascii_digit()) {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        (false, false) => Ordering::Equal,
    }
}

fn take_run(s: &str, numeric: bool) -> (&str, &str) {
    let end = s
        .find(|c: char| c.is_ascii_digit() != numeric)
        .unwrap_or(s.len());
    s.split_at(end)
}
