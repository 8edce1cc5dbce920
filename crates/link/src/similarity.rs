//! Approximate string similarity on a 0–100 scale.
//!
//! `weighted_ratio` picks the best of several Levenshtein-based views of two
//! strings (plain, best-substring, token-sorted, token-set), so it tolerates
//! case, punctuation, token reordering and one name being a fragment of the
//! other.

/// Length ratio at or above which substring alignment is attempted.
const PARTIAL_LEN_RATIO: f64 = 1.5;
/// Length ratio above which substring scores are discounted harder.
const LONG_LEN_RATIO: f64 = 8.0;
const TOKEN_SCALE: f64 = 0.95;

type Scorer = fn(&[char], &[char]) -> f64;

/// A name run through `preprocess` once, ready to be scored against many others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedName {
    chars: Vec<char>,
    /// Tokens sorted, duplicates kept, single-space separated.
    sorted: Vec<char>,
    /// Tokens sorted and deduplicated.
    tokens: Vec<String>,
}

impl PreparedName {
    pub fn new(raw: &str) -> Self {
        let text = preprocess(raw);
        let mut tokens: Vec<String> = text.split_whitespace().map(String::from).collect();
        tokens.sort_unstable();
        let sorted = spaced_chars(tokens.iter().map(String::as_str));
        tokens.dedup();
        Self { chars: text.chars().collect(), sorted, tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// Weighted similarity of `a` and `b`, rounded to 0–100.
/// Either side empty after preprocessing scores 0.
pub fn weighted_ratio(a: &str, b: &str) -> u8 {
    weighted_ratio_prepared(&PreparedName::new(a), &PreparedName::new(b))
}

/// `weighted_ratio` over names already prepared.
pub fn weighted_ratio_prepared(a: &PreparedName, b: &PreparedName) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let base = ratio_chars(&a.chars, &b.chars);
    let (len_a, len_b) = (a.chars.len() as f64, b.chars.len() as f64);
    let len_ratio = len_a.max(len_b) / len_a.min(len_b);

    let best = if len_ratio < PARTIAL_LEN_RATIO {
        base.max(ratio_chars(&a.sorted, &b.sorted) * TOKEN_SCALE)
            .max(token_set_ratio(a, b, ratio_chars) * TOKEN_SCALE)
    } else {
        let scale = if len_ratio > LONG_LEN_RATIO { 0.6 } else { 0.9 };
        base.max(partial_ratio_chars(&a.chars, &b.chars) * scale)
            .max(partial_ratio_chars(&a.sorted, &b.sorted) * TOKEN_SCALE * scale)
            .max(token_set_ratio(a, b, partial_ratio_chars) * TOKEN_SCALE * scale)
    };

    best.round().clamp(0.0, 100.0) as u8
}

/// Lowercase, map every non-alphanumeric char to a space, collapse whitespace.
pub fn preprocess(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() { c.to_lowercase().next().unwrap_or(c) } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized Levenshtein similarity scaled to 0–100.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

/// Best `ratio` of the shorter string against every equal-length window of the longer.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    partial_ratio_chars(&a, &b)
}

/// Char slice as something `strsim::generic_levenshtein` can iterate.
struct Chars<'a>(&'a [char]);

impl<'a, 'b> IntoIterator for &'a Chars<'b> {
    type Item = char;
    type IntoIter = std::iter::Copied<std::slice::Iter<'b, char>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let distance = strsim::generic_levenshtein(&Chars(a), &Chars(b));
    (1.0 - distance as f64 / a.len().max(b.len()) as f64) * 100.0
}

fn partial_ratio_chars(a: &[char], b: &[char]) -> f64 {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0.0;
    }
    if long.len() == short.len() {
        return ratio_chars(short, long);
    }

    let mut best = 0.0_f64;
    for window in long.windows(short.len()) {
        best = best.max(ratio_chars(short, window));
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn spaced_chars<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Vec<char> {
    let mut out = Vec::new();
    for token in tokens {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(token.chars());
    }
    out
}

fn token_set_ratio(a: &PreparedName, b: &PreparedName, scorer: Scorer) -> f64 {
    let shared = |t: &&String, other: &PreparedName| other.tokens.binary_search(*t).is_ok();
    let intersection: Vec<&str> =
        a.tokens.iter().filter(|t| shared(t, b)).map(String::as_str).collect();
    let only_a: Vec<&str> = a.tokens.iter().filter(|t| !shared(t, b)).map(String::as_str).collect();
    let only_b: Vec<&str> = b.tokens.iter().filter(|t| !shared(t, a)).map(String::as_str).collect();

    let combined_a = spaced_chars(intersection.iter().chain(&only_a).copied());
    let combined_b = spaced_chars(intersection.iter().chain(&only_b).copied());
    let intersection = spaced_chars(intersection.iter().copied());

    let mut best = scorer(&combined_a, &combined_b);
    if !intersection.is_empty() {
        best = best
            .max(scorer(&intersection, &combined_a))
            .max(scorer(&intersection, &combined_b));
    }
    best
}
