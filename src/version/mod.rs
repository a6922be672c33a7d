//! Version comparison for RPM version-release strings.
//!
//! This module implements rpm's segment-wise ordering over strings of the
//! form `VERSION-RELEASE`. The two halves are compared independently,
//! version first; within a half the string is tokenized into alternating
//! numeric and alphabetic runs. Numeric runs compare numerically (leading
//! zeros ignored), alphabetic runs lexicographically, and a numeric run
//! outranks an alphabetic run at the same position. A tilde marks a
//! pre-release segment and sorts before everything, including the end of
//! the string, so `1.0~rc1-1` orders before `1.0-1`.

use std::cmp::Ordering;

/// Compare two `VERSION-RELEASE` strings.
///
/// The release half is optional; a missing release compares as empty.
/// The resulting order is total, transitive, and antisymmetric.
pub fn compare(a: &str, b: &str) -> Ordering {
    let (av, ar) = split_version_release(a);
    let (bv, br) = split_version_release(b);
    segment_compare(av, bv).then_with(|| segment_compare(ar, br))
}

/// Split on the final dash: rpm versions never contain `-`, releases may
/// not either, so the last dash is the version/release separator.
fn split_version_release(s: &str) -> (&str, &str) {
    match s.rsplit_once('-') {
        Some((version, release)) => (version, release),
        None => (s, ""),
    }
}

/// rpm's segment ordering over one half (version or release).
fn segment_compare(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let a = a.as_bytes();
    let b = b.as_bytes();
    let mut i = 0;
    let mut j = 0;

    loop {
        // Separators (anything that is not alphanumeric or a tilde) only
        // delimit runs; they carry no ordering weight themselves.
        while i < a.len() && !a[i].is_ascii_alphanumeric() && a[i] != b'~' {
            i += 1;
        }
        while j < b.len() && !b[j].is_ascii_alphanumeric() && b[j] != b'~' {
            j += 1;
        }

        // A tilde segment sorts before anything else, including the end of
        // the other string.
        let a_tilde = a.get(i) == Some(&b'~');
        let b_tilde = b.get(j) == Some(&b'~');
        match (a_tilde, b_tilde) {
            (true, true) => {
                i += 1;
                j += 1;
                continue;
            }
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        if i >= a.len() || j >= b.len() {
            break;
        }

        let numeric = a[i].is_ascii_digit();
        let run_a = take_run(a, &mut i, numeric);
        let run_b = take_run(b, &mut j, numeric);

        // Mismatched run types: the numeric side is newer
        // (e.g. "1.0.1" > "1.0.a").
        if run_b.is_empty() {
            return if numeric {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        let ord = if numeric {
            compare_numeric(run_a, run_b)
        } else {
            run_a.cmp(run_b)
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    // Whichever string still has segments left is the newer one; a leftover
    // tilde segment was already handled above.
    match (i >= a.len(), j >= b.len()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => unreachable!("loop exits only when a side is exhausted"),
    }
}

/// Take the maximal run of digits (or letters) starting at `*pos`.
fn take_run<'a>(s: &'a [u8], pos: &mut usize, numeric: bool) -> &'a [u8] {
    let start = *pos;
    while *pos < s.len() {
        let c = s[*pos];
        let matches = if numeric {
            c.is_ascii_digit()
        } else {
            c.is_ascii_alphabetic()
        };
        if !matches {
            break;
        }
        *pos += 1;
    }
    &s[start..*pos]
}

/// Compare two digit runs numerically without parsing into integers, so
/// arbitrarily long runs cannot overflow.
fn compare_numeric(a: &[u8], b: &[u8]) -> Ordering {
    let a = strip_leading_zeros(a);
    let b = strip_leading_zeros(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn strip_leading_zeros(s: &[u8]) -> &[u8] {
    let start = s.iter().position(|&c| c != b'0').unwrap_or(s.len());
    &s[start..]
}
