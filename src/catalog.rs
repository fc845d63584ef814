//! In-memory translation catalog.
//!
//! Built once from a parsed TS file and read-only afterwards. A language
//! switch never mutates a catalog in place; it builds a new one and swaps
//! the published handle (see [`crate::translator`]).

use std::collections::{HashMap, HashSet};
use std::io::BufReader;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::plural::PluralRule;
use crate::ts::{self, ParseError, TsFile};

/// Where a source string appears in the application sources. Used by
/// translator tooling only, never by runtime lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: u32,
}

/// Lifecycle marker carried on the `translation` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageStatus {
    #[default]
    Finished,
    /// Bound to active UI code but not translated yet.
    Unfinished,
    /// Kept in the file for reference; excluded from runtime lookup.
    Obsolete,
}

/// One `<message>` from a TS file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    pub context: String,
    pub source: String,
    /// Disambiguates identical source strings within one context.
    pub comment: Option<String>,
    /// One element for plain messages, one per numerus form for plural
    /// messages. Never empty; holds a single empty string for an
    /// untranslated message.
    pub translations: Vec<String>,
    /// Set for `numerus="yes"` messages, which select a form by count.
    pub plural: bool,
    /// Legacy `utf8="true"` marker, preserved for round-tripping.
    pub utf8: bool,
    pub status: MessageStatus,
    pub locations: Vec<Location>,
}

impl TranslationEntry {
    pub fn is_obsolete(&self) -> bool {
        self.status == MessageStatus::Obsolete
    }
}

/// Lookup key over the active entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MessageKey {
    context: String,
    source: String,
    comment: Option<String>,
}

/// Catalog statistics, for logging and translator tooling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub contexts: usize,
    pub messages: usize,
    pub finished: usize,
    pub unfinished: usize,
    pub obsolete: usize,
    pub plural_messages: usize,
    /// Non-obsolete key collisions resolved last-wins during indexing.
    pub duplicates_replaced: usize,
}

/// Immutable store of one loaded TS file.
///
/// Keeps the full entry list (obsolete included, document order) for
/// tooling, plus a hash index over the active entries for lookup. All
/// data is fixed after construction, so a `Catalog` can be shared across
/// threads without synchronization.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    language: Option<String>,
    source_language: Option<String>,
    plural_rule: PluralRule,
    entries: Vec<TranslationEntry>,
    index: HashMap<MessageKey, usize>,
    duplicates_replaced: usize,
}

impl Catalog {
    /// The catalog an application runs with before any file is loaded
    /// (or after a rejected load): every lookup falls back to the source
    /// string.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from a parsed TS file.
    ///
    /// Obsolete entries stay in the entry list but are not indexed. When
    /// two active entries collide on (context, source, comment) the
    /// last-parsed one wins and a warning is logged; the collision is
    /// counted in [`CatalogStats::duplicates_replaced`].
    pub fn from_ts(file: TsFile) -> Self {
        let plural_rule = file
            .language
            .as_deref()
            .map(PluralRule::for_language)
            .unwrap_or_default();

        let mut index = HashMap::with_capacity(file.entries.len());
        let mut duplicates_replaced = 0;
        for (idx, entry) in file.entries.iter().enumerate() {
            if entry.is_obsolete() {
                continue;
            }
            let key = MessageKey {
                context: entry.context.clone(),
                source: entry.source.clone(),
                comment: entry.comment.clone(),
            };
            if index.insert(key, idx).is_some() {
                duplicates_replaced += 1;
                warn!(
                    "Duplicate message in context '{}': \"{}\", keeping the last occurrence",
                    entry.context, entry.source
                );
            }
        }

        debug!(
            "Catalog built: language {:?}, {} messages, {} active",
            file.language,
            file.entries.len(),
            index.len()
        );

        Self {
            language: file.language,
            source_language: file.source_language,
            plural_rule,
            entries: file.entries,
            index,
            duplicates_replaced,
        }
    }

    /// Parse a TS document from a string and build a catalog.
    pub fn from_str(source: &str) -> Result<Self, ParseError> {
        Ok(Self::from_ts(ts::parse_ts(source.as_bytes())?))
    }

    /// Load a TS file from disk and build a catalog.
    pub fn load_file(path: &Path) -> Result<Self, ParseError> {
        let file = std::fs::File::open(path)
            .map_err(|e| ParseError::Io(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_ts(ts::parse_ts(BufReader::new(file))?))
    }

    /// Target language declared by the file, e.g. `"zh_CN"`.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Source language declared by the file, if any.
    pub fn source_language(&self) -> Option<&str> {
        self.source_language.as_deref()
    }

    /// Plural rule derived from the target language.
    pub fn plural_rule(&self) -> PluralRule {
        self.plural_rule
    }

    /// Number of active (lookup-visible) entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Full entry list, document order, obsolete entries included.
    pub fn entries(&self) -> &[TranslationEntry] {
        &self.entries
    }

    /// Look up the unique active entry for a key. Obsolete entries are
    /// never returned here.
    pub fn find(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
    ) -> Option<&TranslationEntry> {
        let key = MessageKey {
            context: context.to_string(),
            source: source.to_string(),
            comment: comment.map(str::to_string),
        };
        self.index.get(&key).map(|&idx| &self.entries[idx])
    }

    /// Every entry of a context, document order, obsolete included.
    /// For translator tooling, not runtime rendering.
    pub fn all_for_context(&self, context: &str) -> Vec<&TranslationEntry> {
        self.entries
            .iter()
            .filter(|e| e.context == context)
            .collect()
    }

    /// Context names in order of first appearance.
    pub fn contexts(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut contexts = Vec::new();
        for entry in &self.entries {
            if seen.insert(entry.context.as_str()) {
                contexts.push(entry.context.as_str());
            }
        }
        contexts
    }

    /// Resolve a display string. Total: falls back to `source` when the
    /// key is absent or the stored translation is empty (untranslated
    /// message), so the caller always has something renderable.
    pub fn translate<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        comment: Option<&str>,
    ) -> &'a str {
        match self.find(context, source, comment) {
            Some(entry) => {
                let first = entry.translations.first().map(String::as_str).unwrap_or("");
                if first.is_empty() { source } else { first }
            }
            None => source,
        }
    }

    /// Resolve a quantity-sensitive display string.
    ///
    /// Selects the numerus form via the catalog's plural rule, clamping
    /// to the last stored form when the file carries fewer forms than the
    /// rule distinguishes, then substitutes `%n` with the count. Falls
    /// back to `source` (with the same `%n` substitution) when the key is
    /// absent or the chosen form is empty.
    pub fn translate_n(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        n: i64,
    ) -> String {
        let rendered = match self.find(context, source, comment) {
            Some(entry) => {
                let idx = self
                    .plural_rule
                    .index_for(n)
                    .min(entry.translations.len().saturating_sub(1));
                let form = entry.translations.get(idx).map(String::as_str).unwrap_or("");
                if form.is_empty() { source } else { form }
            }
            None => source,
        };
        rendered.replace("%n", &n.to_string())
    }

    /// Aggregate counts over the full entry list.
    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats {
            contexts: self.contexts().len(),
            messages: self.entries.len(),
            duplicates_replaced: self.duplicates_replaced,
            ..CatalogStats::default()
        };
        for entry in &self.entries {
            match entry.status {
                MessageStatus::Finished => stats.finished += 1,
                MessageStatus::Unfinished => stats.unfinished += 1,
                MessageStatus::Obsolete => stats.obsolete += 1,
            }
            if entry.plural {
                stats.plural_messages += 1;
            }
        }
        stats
    }
}
