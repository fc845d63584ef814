//! Numerus (plural form) rules per target language.
//!
//! A TS file stores one `<numerusform>` per plural category of its target
//! language; which category a given count falls into is a property of the
//! language itself. The groupings here cover the common families the
//! format is used with.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Plural-form classification for a target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PluralRule {
    /// One form regardless of count (Chinese, Japanese, Korean, Turkish, ...)
    Single,
    /// Two forms, singular only at exactly one (English, German, Spanish, ...)
    #[default]
    DualOne,
    /// Two forms, singular at zero and one (French, Brazilian Portuguese)
    DualZeroOne,
    /// Three forms, East/South Slavic pattern (Russian, Ukrainian, Serbian, ...)
    Slavic,
    /// Three forms, Polish pattern
    Polish,
    /// Three forms, Czech/Slovak pattern
    Czech,
}

/// Primary language subtag -> rule, for everything that is not the
/// two-form default.
static LANGUAGE_RULES: Lazy<HashMap<&'static str, PluralRule>> = Lazy::new(|| {
    let groups: &[(&[&str], PluralRule)] = &[
        (
            &[
                "zh", "ja", "ko", "vi", "th", "id", "ms", "fa", "tr", "az", "ka", "km", "lo", "my",
            ],
            PluralRule::Single,
        ),
        (&["fr", "oc"], PluralRule::DualZeroOne),
        (&["ru", "uk", "be", "sr", "hr", "bs"], PluralRule::Slavic),
        (&["pl"], PluralRule::Polish),
        (&["cs", "sk"], PluralRule::Czech),
    ];
    let mut map = HashMap::new();
    for (tags, rule) in groups {
        for tag in *tags {
            map.insert(*tag, *rule);
        }
    }
    map
});

impl PluralRule {
    /// Resolve the rule for a TS `language` attribute such as `"zh_CN"`.
    ///
    /// Matches on the primary subtag, case-insensitively, accepting both
    /// `_` and `-` separators. Unknown languages get the two-form
    /// English-like default. Brazilian Portuguese is the one
    /// region-sensitive case.
    pub fn for_language(tag: &str) -> Self {
        let mut parts = tag.split(['_', '-']);
        let primary = parts.next().unwrap_or("").to_ascii_lowercase();
        if primary == "pt" {
            let region = parts.next().unwrap_or("").to_ascii_lowercase();
            return if region == "br" {
                PluralRule::DualZeroOne
            } else {
                PluralRule::DualOne
            };
        }
        LANGUAGE_RULES
            .get(primary.as_str())
            .copied()
            .unwrap_or_default()
    }

    /// Number of plural categories this rule distinguishes.
    pub fn form_count(&self) -> usize {
        match self {
            PluralRule::Single => 1,
            PluralRule::DualOne | PluralRule::DualZeroOne => 2,
            PluralRule::Slavic | PluralRule::Polish | PluralRule::Czech => 3,
        }
    }

    /// Index of the form to use for `n`. Always less than `form_count()`.
    /// Negative counts classify by magnitude.
    pub fn index_for(&self, n: i64) -> usize {
        let n = n.unsigned_abs();
        match self {
            PluralRule::Single => 0,
            PluralRule::DualOne => usize::from(n != 1),
            PluralRule::DualZeroOne => usize::from(n > 1),
            PluralRule::Slavic => {
                if n % 10 == 1 && n % 100 != 11 {
                    0
                } else if (2..=4).contains(&(n % 10)) && !(12..=14).contains(&(n % 100)) {
                    1
                } else {
                    2
                }
            }
            PluralRule::Polish => {
                if n == 1 {
                    0
                } else if (2..=4).contains(&(n % 10)) && !(12..=14).contains(&(n % 100)) {
                    1
                } else {
                    2
                }
            }
            PluralRule::Czech => {
                if n == 1 {
                    0
                } else if (2..=4).contains(&n) {
                    1
                } else {
                    2
                }
            }
        }
    }
}
