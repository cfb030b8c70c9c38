use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static WORD_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"((?-u:\w)+)-((?-u:\w)+)\.(?-u:\w)+").expect("valid sort key regex")
});

/// Ordering key for a puzzle URL.
///
/// Takes the leftmost `word-word.ext` run in the URL and returns the word
/// between the hyphen and the dot. Words are ASCII only. URLs without such a
/// run sort by themselves.
pub fn sort_key(url: &str) -> &str {
    WORD_PAIR
        .captures(url)
        .and_then(|caps| caps.get(2))
        .map_or(url, |m| m.as_str())
}

/// Dedupes URLs and orders them ascending by [`sort_key`], then by the URL.
pub fn order_urls<I>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let unique: BTreeSet<String> = urls.into_iter().collect();
    let mut ordered: Vec<String> = unique.into_iter().collect();
    ordered.sort_by(|a, b| sort_key(a).cmp(sort_key(b)).then_with(|| a.cmp(b)));
    ordered
}
