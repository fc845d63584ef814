//! Runtime lookup facade.
//!
//! A [`Translator`] is the handle UI code calls for display text. It
//! publishes one immutable [`Catalog`] at a time; a language switch
//! builds the next catalog off the hot path and swaps it in with a
//! single pointer store. Readers grab an [`Arc`] snapshot, so an
//! in-flight render finishes entirely against the catalog it started
//! with and never sees a mix of two languages.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::catalog::Catalog;

/// Thread-safe handle to the active translation catalog.
///
/// Pass it through application state rather than a global so tests can
/// run isolated instances. Starts out with an empty catalog: every
/// lookup falls back to the source string, which keeps an application
/// whose translation file failed to load fully usable.
#[derive(Debug, Default)]
pub struct Translator {
    current: RwLock<Arc<Catalog>>,
}

impl Translator {
    /// Translator with no catalog loaded; all lookups fall back to the
    /// source string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Translator starting out with `catalog` installed.
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// Atomically publish a new catalog.
    ///
    /// Readers holding a snapshot keep the old catalog alive until they
    /// drop it; new lookups see the new one immediately.
    pub fn install(&self, catalog: Catalog) {
        info!(
            "Installing translation catalog: language {:?}, {} active messages",
            catalog.language(),
            catalog.len()
        );
        *self.current.write() = Arc::new(catalog);
    }

    /// The currently published catalog.
    ///
    /// Use a snapshot when resolving a batch of strings (a whole menu,
    /// a dialog) that must come from one consistent catalog.
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.current.read().clone()
    }

    /// Shorthand for the common call site: no disambiguation, no count.
    pub fn tr(&self, context: &str, source: &str) -> String {
        self.translate(context, source, None, None)
    }

    /// Resolve a display string.
    ///
    /// Total by design: returns the translation when one is stored, the
    /// source string otherwise — never empty, never an error. With a
    /// count, selects the numerus form and substitutes `%n`.
    pub fn translate(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        n: Option<i64>,
    ) -> String {
        let catalog = self.snapshot();
        match n {
            Some(n) => catalog.translate_n(context, source, comment, n),
            None => catalog.translate(context, source, comment).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    use super::*;

    fn catalog(language: &str, pairs: &[(&str, &str, &str)]) -> Catalog {
        let mut doc = format!(
            "<!DOCTYPE TS>\n<TS version=\"2.1\" language=\"{}\">\n",
            language
        );
        let mut current_context = "";
        for (context, source, translation) in pairs.iter().copied() {
            if context != current_context {
                if !current_context.is_empty() {
                    doc.push_str("</context>\n");
                }
                doc.push_str(&format!("<context><name>{}</name>\n", context));
                current_context = context;
            }
            doc.push_str(&format!(
                "<message><source>{}</source><translation>{}</translation></message>\n",
                source, translation
            ));
        }
        if !current_context.is_empty() {
            doc.push_str("</context>\n");
        }
        doc.push_str("</TS>\n");
        Catalog::from_str(&doc).expect("generated fixture parses")
    }

    #[test]
    fn test_empty_translator_falls_back() {
        let translator = Translator::new();
        assert_eq!(translator.tr("AudioEqualizer", "&Apply"), "&Apply");
        assert_eq!(
            translator.translate("Core", "%n second(s)", None, Some(3)),
            "3 second(s)"
        );
    }

    #[test]
    fn test_tr_resolves_installed_catalog() {
        let translator = Translator::new();
        translator.install(catalog(
            "zh_CN",
            &[("AudioEqualizer", "&amp;Apply", "应用(&amp;A)")],
        ));
        assert_eq!(translator.tr("AudioEqualizer", "&Apply"), "应用(&A)");
        assert_eq!(translator.tr("AudioEqualizer", "&Unknown"), "&Unknown");
    }

    #[test]
    fn test_install_replaces_whole_catalog() {
        let translator = Translator::with_catalog(catalog(
            "zh_CN",
            &[("Core", "Play", "播放"), ("Core", "Stop", "停止")],
        ));
        assert_eq!(translator.tr("Core", "Play"), "播放");

        translator.install(catalog("de_DE", &[("Core", "Play", "Wiedergabe")]));
        assert_eq!(translator.tr("Core", "Play"), "Wiedergabe");
        // "Stop" was only in the old catalog; the swap is whole-store
        assert_eq!(translator.tr("Core", "Stop"), "Stop");
    }

    #[test]
    fn test_snapshot_is_consistent_across_install() {
        let translator = Translator::with_catalog(catalog("zh_CN", &[("Core", "Play", "播放")]));
        let snapshot = translator.snapshot();
        translator.install(catalog("de_DE", &[("Core", "Play", "Wiedergabe")]));
        // The held snapshot still answers from the old catalog
        assert_eq!(snapshot.translate("Core", "Play", None), "播放");
        assert_eq!(translator.tr("Core", "Play"), "Wiedergabe");
    }

    #[test]
    fn test_concurrent_lookups_never_see_a_mixed_catalog() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let zh = || {
            catalog(
                "zh_CN",
                &[("Core", "Play", "播放"), ("Core", "Stop", "停止")],
            )
        };
        let de = || {
            catalog(
                "de_DE",
                &[("Core", "Play", "Wiedergabe"), ("Core", "Stop", "Anhalten")],
            )
        };

        let translator = Arc::new(Translator::with_catalog(zh()));
        let stop = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let translator = Arc::clone(&translator);
                let stop = Arc::clone(&stop);
                thread::spawn(move || {
                    while !stop.load(Ordering::Relaxed) {
                        let snapshot = translator.snapshot();
                        let play = snapshot.translate("Core", "Play", None);
                        let halt = snapshot.translate("Core", "Stop", None);
                        assert!(
                            (play == "播放" && halt == "停止")
                                || (play == "Wiedergabe" && halt == "Anhalten"),
                            "mixed catalogs observed: {} / {}",
                            play,
                            halt
                        );
                    }
                })
            })
            .collect();

        for _ in 0..200 {
            translator.install(de());
            translator.install(zh());
        }
        stop.store(true, Ordering::Relaxed);
        for reader in readers {
            reader.join().expect("reader thread panicked");
        }
    }
}
