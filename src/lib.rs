//! Translation catalog loading and lookup for Qt Linguist TS files.
//!
//! Loads a `.ts` translation file into an immutable [`Catalog`], then
//! answers `(context, source, comment, count)` lookups with
//! fallback-to-source semantics: a missing or untranslated entry yields
//! the source string, so UI code always has something to render and a
//! failed load degrades to the original language instead of crashing.
//!
//! Structure:
//! - `ts`: TS XML parse/stringify
//! - `catalog`: immutable store with hashed lookup and tooling accessors
//! - `plural`: per-language numerus rules
//! - `translator`: shared handle with atomic catalog swap for runtime
//!   language switching
//!
//! ```
//! use ts_catalog::{Catalog, Translator};
//!
//! let doc = r#"<!DOCTYPE TS>
//! <TS version="2.1" language="zh_CN">
//! <context>
//!     <name>AudioEqualizer</name>
//!     <message>
//!         <source>&amp;Apply</source>
//!         <translation>应用(&amp;A)</translation>
//!     </message>
//! </context>
//! </TS>"#;
//!
//! let translator = Translator::new();
//! translator.install(Catalog::from_str(doc).unwrap());
//! assert_eq!(translator.tr("AudioEqualizer", "&Apply"), "应用(&A)");
//! assert_eq!(translator.tr("AudioEqualizer", "&Undo"), "&Undo");
//! ```

pub mod catalog;
pub mod plural;
pub mod translator;
pub mod ts;

pub use catalog::{Catalog, CatalogStats, Location, MessageStatus, TranslationEntry};
pub use plural::PluralRule;
pub use translator::Translator;
pub use ts::{ParseError, TsFile, parse_ts, stringify_ts};
