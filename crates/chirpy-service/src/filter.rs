/// A pure text transform applied to chirp bodies before storage.
pub trait TextFilter: Send + Sync {
    fn filter(&self, text: &str) -> String;
}

/// Words masked by [`ProfanityFilter::default`].
pub const DEFAULT_BANNED_WORDS: &[&str] = &["kerfuffle", "sharbert", "fornax"];

const MASK: &str = "****";

/// Masks banned words with `****`.
///
/// The body is split on single spaces; a word is masked when it equals a
/// banned word ignoring ASCII case. Words with punctuation attached
/// (`"Sharbert!"`) are not matched, and spacing is preserved exactly.
#[derive(Clone, Debug)]
pub struct ProfanityFilter {
    banned: Vec<String>,
}

impl ProfanityFilter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            banned: words
                .into_iter()
                .map(|w| w.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    fn is_banned(&self, word: &str) -> bool {
        self.banned.iter().any(|b| b.eq_ignore_ascii_case(word))
    }
}

impl Default for ProfanityFilter {
    fn default() -> Self {
        Self::new(DEFAULT_BANNED_WORDS)
    }
}

impl TextFilter for ProfanityFilter {
    fn filter(&self, text: &str) -> String {
        text.split(' ')
            .map(|word| if self.is_banned(word) { MASK } else { word })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
