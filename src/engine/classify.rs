use crate::model::{Lexicon, LexiconEntry, Target, DEFAULT_CATEGORY};

/// Assigns a category to a free-text description.
///
/// Matching is first-match by substring on the lowercased description. Target keywords are tried
/// first, in target order and then keyword order, so a user defined target always outranks the
/// lexicon. The lexicon is tried next in its declared order. When nothing matches the result is
/// `Lainnya`.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    lexicon: Lexicon,
}

impl Classifier {
    pub fn new(lexicon: Lexicon) -> Self {
        let entries = lexicon
            .entries()
            .iter()
            .map(|e| LexiconEntry::new(e.category.clone(), &e.keywords))
            .collect();
        Self {
            lexicon: Lexicon::new(entries),
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn classify(&self, description: &str, targets: &[Target]) -> String {
        let description = description.to_lowercase();

        for target in targets {
            if target
                .keywords()
                .iter()
                .any(|k| description.contains(k.to_lowercase().as_str()))
            {
                return target.name().to_string();
            }
        }

        for entry in self.lexicon.entries() {
            if entry
                .keywords
                .iter()
                .any(|k| description.contains(k.as_str()))
            {
                return entry.category.clone();
            }
        }

        DEFAULT_CATEGORY.to_string()
    }
}
