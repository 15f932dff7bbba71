use serde::{Deserialize, Serialize};

/// The category assigned when nothing else matches.
pub const DEFAULT_CATEGORY: &str = "Lainnya";

/// The built-in expense categories, in display order.
pub const EXPENSE_CATEGORIES: [&str; 10] = [
    "Makanan",
    "Transport",
    "Belanja",
    "Tagihan",
    "Hiburan",
    "Kesehatan",
    "Ortu",
    "Tabungan",
    "Cicilan",
    DEFAULT_CATEGORY,
];

/// The built-in income categories, in display order.
pub const INCOME_CATEGORIES: [&str; 4] = ["Gaji", "Bonus", "Hadiah", DEFAULT_CATEGORY];

/// One category of the keyword lexicon together with the substrings that select it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LexiconEntry {
    pub category: String,
    pub keywords: Vec<String>,
}

impl LexiconEntry {
    pub fn new<S: AsRef<str>>(category: impl Into<String>, keywords: &[S]) -> Self {
        Self {
            category: category.into(),
            keywords: keywords.iter().map(|k| k.as_ref().to_lowercase()).collect(),
        }
    }
}

/// The ordered keyword lexicon consulted after target keywords. Earlier entries win.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lexicon(Vec<LexiconEntry>);

impl Lexicon {
    pub fn new(entries: Vec<LexiconEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.0
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self(vec![
            LexiconEntry::new(
                "Makanan",
                &[
                    "makan", "sarapan", "lunch", "dinner", "nasi", "ayam", "snack", "cemilan",
                    "kopi", "minum", "food", "resto", "warteg", "mie", "bakso",
                ],
            ),
            LexiconEntry::new(
                "Transport",
                &[
                    "bensin", "grab", "gojek", "ojol", "parkir", "tol", "transport", "angkot",
                    "bus", "kereta", "travel",
                ],
            ),
            LexiconEntry::new(
                "Belanja",
                &[
                    "belanja",
                    "indomaret",
                    "alfamart",
                    "supermarket",
                    "grocery",
                    "shopee",
                    "tokopedia",
                    "lazada",
                    "beli",
                ],
            ),
            LexiconEntry::new(
                "Hiburan",
                &[
                    "nonton",
                    "bioskop",
                    "game",
                    "streaming",
                    "spotify",
                    "netflix",
                    "jalan",
                    "wisata",
                    "karaoke",
                    "fm",
                    "mall",
                ],
            ),
            LexiconEntry::new(
                "Tagihan",
                &[
                    "listrik", "air", "pdam", "internet", "wifi", "pulsa", "token", "tagihan",
                    "bayar",
                ],
            ),
            LexiconEntry::new(
                "Kesehatan",
                &[
                    "obat",
                    "dokter",
                    "rumah sakit",
                    "klinik",
                    "vitamin",
                    "apotek",
                    "medical",
                ],
            ),
        ])
    }
}
