use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::lemma::Lemmatizer;

static NON_ALPHA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z\s]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// English stop-word list used when the title vectorizer was trained.
pub const STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

static STOP_WORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORD_SET.contains(token)
}

/// Lowercases, drops everything but ASCII letters and whitespace, and
/// collapses whitespace runs. Non-Latin input comes back empty.
pub fn clean_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let letters = NON_ALPHA.replace_all(&lowered, "");
    WHITESPACE.replace_all(&letters, " ").trim().to_string()
}

/// Full title normalization: clean, drop stop words, lemmatize, rejoin.
///
/// A lemma that lands on a stop word is not applied, so running the result
/// through here again returns it unchanged.
pub fn normalize_title(title: &str, lemmatizer: &Lemmatizer) -> String {
    let cleaned = clean_text(title);
    let tokens: Vec<String> = cleaned
        .split_whitespace()
        .filter(|token| !is_stop_word(token))
        .map(|token| {
            let lemma = lemmatizer.lemmatize(token);
            if is_stop_word(&lemma) {
                token.to_string()
            } else {
                lemma
            }
        })
        .collect();
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(title: &str) -> String {
        normalize_title(title, &Lemmatizer::default())
    }

    #[test]
    fn test_clean_text_strips_non_letters() {
        assert_eq!(clean_text("  Top 10 Cats!!  of 2023 "), "top cats of");
        assert_eq!(clean_text("Hello,\tWorld\n"), "hello world");
    }

    #[test]
    fn test_non_latin_title_is_empty() {
        assert_eq!(clean_text("新学期欢迎活动🎉📚"), "");
        assert_eq!(normalize("🎉📚"), "");
        assert_eq!(normalize("新学期欢迎活动🎉📚"), "");
    }

    #[test]
    fn test_stop_words_removed_and_lemmatized() {
        assert_eq!(normalize("The Best Videos of the Year"), "best video year");
        assert_eq!(normalize("How I trained my puppies"), "trained puppy");
    }

    #[test]
    fn test_mixed_script_keeps_latin_only() {
        assert_eq!(normalize("Vlog 日本 Trip | Tokyo streets"), "vlog trip tokyo street");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "Hello World",
            "The Best Videos of the Year",
            "Cats & Dogs: 100 funny moments!!!",
            "Boxes, watches and glasses",
            "children playing with mice",
            "新学期欢迎活动🎉📚",
            "",
            "ares thes",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_lemma_landing_on_stop_word_keeps_token() {
        // "ares" would lemmatize to "are", which is a stop word
        assert_eq!(normalize("ares"), "ares");
    }
}
