use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

static WORD_PATTERN: OnceLock<Regex> = OnceLock::new();

fn word_pattern() -> &'static Regex {
    WORD_PATTERN.get_or_init(|| Regex::new(r"\w+").unwrap())
}

// Common English words that carry no topical signal. Tokens of length <= 3
// are dropped before this set is consulted, so the short entries only matter
// for completeness.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "almost", "alone", "along",
    "already", "also", "although", "always", "among", "an", "and", "another", "any", "anyone",
    "anything", "anywhere", "are", "around", "as", "at", "back", "be", "became", "because",
    "become", "becomes", "been", "before", "behind", "being", "below", "between", "beyond",
    "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "doing", "done", "down",
    "during", "each", "either", "enough", "even", "ever", "every", "everyone", "everything",
    "few", "find", "first", "for", "former", "from", "further", "had", "has", "have", "having",
    "he", "hence", "her", "here", "hers", "herself", "him", "himself", "his", "how", "however",
    "i", "if", "in", "indeed", "into", "is", "it", "its", "itself", "just", "last", "least",
    "less", "made", "many", "may", "me", "might", "more", "most", "mostly", "much", "must", "my",
    "myself", "name", "namely", "neither", "never", "next", "no", "nobody", "none", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or",
    "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per",
    "perhaps", "please", "put", "rather", "same", "seem", "seemed", "seeming", "seems", "several",
    "she", "should", "since", "so", "some", "somehow", "someone", "something", "sometimes",
    "somewhere", "still", "such", "than", "that", "the", "their", "theirs", "them", "themselves",
    "then", "there", "therefore", "these", "they", "this", "those", "though", "through",
    "throughout", "thus", "to", "together", "too", "toward", "towards", "under", "until", "up",
    "upon", "us", "very", "was", "we", "well", "were", "what", "whatever", "when", "whence",
    "whenever", "where", "whether", "which", "while", "who", "whoever", "whole", "whom", "whose",
    "why", "will", "with", "within", "without", "would", "yet", "you", "your", "yours",
    "yourself", "yourselves",
];

/// Top-n most frequent non-trivial tokens of `text`, lowercased. Tokens that
/// are stopwords or no longer than 3 characters are dropped; ties are broken
/// by the order the tokens were first seen. Empty input yields an empty vec.
pub fn extract(text: &str, n: usize) -> Vec<String> {
    let lowered = text.to_lowercase();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for token in word_pattern().find_iter(&lowered) {
        let word = token.as_str();
        if word.chars().count() <= 3 || STOPWORDS.contains(&word) {
            continue;
        }
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    let mut ranked: Vec<(&str, usize)> = order
        .into_iter()
        .map(|word| (word, counts[word]))
        .collect();
    // sort_by is stable, so equal counts keep first-seen order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    ranked
        .into_iter()
        .take(n)
        .map(|(word, _)| word.to_string())
        .collect()
}
