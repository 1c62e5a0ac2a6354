use std::collections::{HashMap, HashSet};

use crate::error::ArtifactError;

const IRREGULAR: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("lice", "louse"),
    ("oxen", "ox"),
    ("data", "datum"),
    ("media", "medium"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("analyses", "analysis"),
    ("crises", "crisis"),
    ("theses", "thesis"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("lives", "life"),
    ("leaves", "leaf"),
    ("halves", "half"),
    ("calves", "calf"),
    ("wolves", "wolf"),
    ("shelves", "shelf"),
    ("selves", "self"),
    ("thieves", "thief"),
    ("loaves", "loaf"),
    ("aches", "ache"),
    ("headaches", "headache"),
    ("caches", "cache"),
    ("niches", "niche"),
    ("quizzes", "quiz"),
];

/// Words ending in `s` that are already in base form.
const INVARIANT: &[&str] = &[
    "news", "series", "species", "means", "physics", "mathematics", "politics", "economics",
    "always", "perhaps", "whereas", "sometimes", "afterwards", "towards", "besides", "lens",
    "canvas", "christmas", "alias", "atlas",
];

/// Nouns whose plural ends in `ies` but whose singular ends in `ie`.
const IE_NOUNS: &[&str] = &[
    "movie", "cookie", "zombie", "selfie", "calorie", "rookie", "hippie", "pie", "tie", "lie",
    "die", "genie", "goalie", "brownie", "smoothie", "hoodie", "indie", "newbie", "techie",
    "freebie", "birdie", "sweetie", "veggie", "auntie", "prairie",
];

/// Noun lemmatizer: an exported lemma table when training supplied one,
/// suffix rules with an irregular-plural table otherwise.
#[derive(Debug, Default, Clone)]
pub struct Lemmatizer {
    table: HashMap<String, String>,
    known_lemmas: HashSet<String>,
}

impl Lemmatizer {
    pub fn from_table(table: HashMap<String, String>) -> Result<Self, ArtifactError> {
        for (word, lemma) in &table {
            if lemma.is_empty() || !lemma.bytes().all(|b| b.is_ascii_lowercase()) {
                return Err(ArtifactError::invalid(
                    "lemmas",
                    format!("lemma '{}' for '{}' is not a lowercase ASCII word", lemma, word),
                ));
            }
            // a lemma must be a fixed point of the table
            if let Some(next) = table.get(lemma).filter(|next| *next != lemma) {
                return Err(ArtifactError::invalid(
                    "lemmas",
                    format!(
                        "lemma '{}' for '{}' is itself mapped to '{}'",
                        lemma, word, next
                    ),
                ));
            }
        }
        let known_lemmas = table.values().cloned().collect();
        Ok(Self {
            table,
            known_lemmas,
        })
    }

    pub fn table_len(&self) -> usize {
        self.table.len()
    }

    /// Returns the base form of a lowercase ASCII token. The result is a
    /// fixed point: lemmatizing it again yields the same word.
    pub fn lemmatize(&self, word: &str) -> String {
        let mut current = word.to_string();
        loop {
            if let Some(lemma) = self.table.get(&current) {
                return lemma.clone();
            }
            if self.known_lemmas.contains(&current) {
                return current;
            }
            match detach_suffix(&current) {
                Some(next) if next != current => current = next,
                _ => return current,
            }
        }
    }
}

fn detach_suffix(word: &str) -> Option<String> {
    if let Some(&(_, lemma)) = IRREGULAR.iter().find(|(plural, _)| *plural == word) {
        return Some(lemma.to_string());
    }
    if word.len() <= 3 || INVARIANT.contains(&word) {
        return None;
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return None;
    }

    if let Some(stem) = word.strip_suffix("ies") {
        let ie_form = format!("{}ie", stem);
        if IE_NOUNS.contains(&ie_form.as_str()) {
            return Some(ie_form);
        }
        return Some(format!("{}y", stem));
    }
    if word.ends_with("sses")
        || word.ends_with("ches")
        || word.ends_with("shes")
        || word.ends_with("xes")
        || ends_with_consonant_zes(word)
    {
        return Some(word[..word.len() - 2].to_string());
    }
    word.strip_suffix('s').map(str::to_string)
}

/// `buzzes`, `waltzes`: but not `sizes` or `mazes`, whose singular keeps the `e`.
fn ends_with_consonant_zes(word: &str) -> bool {
    word.strip_suffix("zes")
        .and_then(|stem| stem.bytes().last())
        .is_some_and(|b| !b"aeiou".contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_plurals() {
        let lemmatizer = Lemmatizer::default();
        assert_eq!(lemmatizer.lemmatize("videos"), "video");
        assert_eq!(lemmatizer.lemmatize("stories"), "story");
        assert_eq!(lemmatizer.lemmatize("movies"), "movie");
        assert_eq!(lemmatizer.lemmatize("boxes"), "box");
        assert_eq!(lemmatizer.lemmatize("watches"), "watch");
        assert_eq!(lemmatizer.lemmatize("classes"), "class");
        assert_eq!(lemmatizer.lemmatize("games"), "game");
        assert_eq!(lemmatizer.lemmatize("buzzes"), "buzz");
        assert_eq!(lemmatizer.lemmatize("waltzes"), "waltz");
        assert_eq!(lemmatizer.lemmatize("quizzes"), "quiz");
        assert_eq!(lemmatizer.lemmatize("sizes"), "size");
        assert_eq!(lemmatizer.lemmatize("prizes"), "prize");
    }

    #[test]
    fn test_irregular_and_invariant_words() {
        let lemmatizer = Lemmatizer::default();
        assert_eq!(lemmatizer.lemmatize("children"), "child");
        assert_eq!(lemmatizer.lemmatize("men"), "man");
        assert_eq!(lemmatizer.lemmatize("news"), "news");
        assert_eq!(lemmatizer.lemmatize("virus"), "virus");
        assert_eq!(lemmatizer.lemmatize("glass"), "glass");
        assert_eq!(lemmatizer.lemmatize("bus"), "bus");
        assert_eq!(lemmatizer.lemmatize("hello"), "hello");
    }

    #[test]
    fn test_rules_reach_fixed_point() {
        let lemmatizer = Lemmatizer::default();
        // "mens" -> "men" -> "man"
        assert_eq!(lemmatizer.lemmatize("mens"), "man");
        for word in ["mens", "puppies", "dishes", "glasses", "wolves", "tutorials"] {
            let lemma = lemmatizer.lemmatize(word);
            assert_eq!(lemmatizer.lemmatize(&lemma), lemma);
        }
    }

    #[test]
    fn test_table_overrides_rules() {
        let table = HashMap::from([
            ("glasses".to_string(), "glasses".to_string()),
            ("axes".to_string(), "axis".to_string()),
        ]);
        let lemmatizer = Lemmatizer::from_table(table).unwrap();
        assert_eq!(lemmatizer.lemmatize("glasses"), "glasses");
        assert_eq!(lemmatizer.lemmatize("axes"), "axis");
        assert_eq!(lemmatizer.lemmatize("axis"), "axis");
        assert_eq!(lemmatizer.lemmatize("cats"), "cat");
        assert_eq!(lemmatizer.table_len(), 2);
    }

    #[test]
    fn test_table_rejects_unstable_lemma() {
        let table = HashMap::from([
            ("axes".to_string(), "axis".to_string()),
            ("axis".to_string(), "axe".to_string()),
        ]);
        assert!(matches!(
            Lemmatizer::from_table(table),
            Err(ArtifactError::Invalid { name: "lemmas", .. })
        ));
    }

    #[test]
    fn test_table_applies_to_rule_output() {
        // "cats" -> "cat" by rule, then the table takes over
        let table = HashMap::from([("cat".to_string(), "kitten".to_string())]);
        let lemmatizer = Lemmatizer::from_table(table).unwrap();
        assert_eq!(lemmatizer.lemmatize("cats"), "kitten");
        assert_eq!(lemmatizer.lemmatize("kitten"), "kitten");
        for word in ["cats", "cat", "kittens", "videos"] {
            let lemma = lemmatizer.lemmatize(word);
            assert_eq!(lemmatizer.lemmatize(&lemma), lemma);
        }
    }

    #[test]
    fn test_table_rejects_non_word_lemma() {
        let table = HashMap::from([("foo".to_string(), "Foo-1".to_string())]);
        assert!(matches!(
            Lemmatizer::from_table(table),
            Err(ArtifactError::Invalid { name: "lemmas", .. })
        ));
    }
}
