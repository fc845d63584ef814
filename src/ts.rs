//! Qt Linguist TS format support.
//!
//! Parses the XML shape produced by lupdate/linguist: a `<TS>` root
//! declaring the target language, `<context>` blocks each holding a
//! `<name>` and `<message>` blocks with location markers, source text, an
//! optional disambiguation comment, and a translation that is either
//! plain text or one `<numerusform>` per plural category. Also writes the
//! same shape back for translator tooling.
//!
//! A malformed document fails the whole load. A half-loaded catalog would
//! silently leave an unpredictable subset of the UI untranslated, which
//! is worse than an explicit failure the caller can handle.

use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::catalog::{Catalog, Location, MessageStatus, TranslationEntry};

/// Raw product of [`parse_ts`], before index construction.
#[derive(Debug, Clone, Default)]
pub struct TsFile {
    /// Target language declared on the root, e.g. `"zh_CN"`.
    pub language: Option<String>,
    /// Source language declared on the root, if any.
    pub source_language: Option<String>,
    /// All messages in document order, obsolete ones included.
    pub entries: Vec<TranslationEntry>,
}

/// Load-time failure. No partial result is ever returned alongside one.
#[derive(Debug, Clone)]
pub enum ParseError {
    /// XML-level error from the underlying reader.
    Xml { message: String, offset: u64 },
    /// Document ended inside an unterminated block.
    UnexpectedEof { context: Option<String> },
    /// A `<message>` closed without a `<source>`.
    MissingSource { context: String, offset: u64 },
    /// An element appeared where the format does not allow it.
    Misplaced { element: String, offset: u64 },
    /// The document has no `<TS>` root.
    MissingRoot,
    /// The file could not be read at all.
    Io(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Xml { message, offset } => {
                write!(f, "XML error at byte {}: {}", offset, message)
            }
            ParseError::UnexpectedEof { context: Some(c) } => {
                write!(f, "Unexpected end of document inside context '{}'", c)
            }
            ParseError::UnexpectedEof { context: None } => {
                write!(f, "Unexpected end of document")
            }
            ParseError::MissingSource { context, offset } => {
                write!(
                    f,
                    "Message without <source> in context '{}' near byte {}",
                    context, offset
                )
            }
            ParseError::Misplaced { element, offset } => {
                write!(f, "Misplaced <{}> element at byte {}", element, offset)
            }
            ParseError::MissingRoot => write!(f, "Document has no <TS> root element"),
            ParseError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseStatus {
    Start,
    InTs,
    InContext,
    InContextName,
    InMessage,
    InSource,
    InComment,
    InTranslation,
    InNumerusForm,
    Done,
}

/// Accumulates one `<message>` until its end tag.
#[derive(Debug, Default)]
struct MessageBuilder {
    source: Option<String>,
    comment: Option<String>,
    translation_text: String,
    numerus_forms: Vec<String>,
    plural: bool,
    utf8: bool,
    status: MessageStatus,
    locations: Vec<Location>,
}

impl MessageBuilder {
    fn finish(self, context: &str, offset: u64) -> Result<TranslationEntry, ParseError> {
        let source = self.source.ok_or_else(|| ParseError::MissingSource {
            context: context.to_string(),
            offset,
        })?;
        // Numerus messages keep their text in the forms; stray whitespace
        // collected between them is discarded.
        let translations = if self.numerus_forms.is_empty() {
            vec![self.translation_text]
        } else {
            self.numerus_forms
        };
        Ok(TranslationEntry {
            context: context.to_string(),
            source,
            // An empty disambiguation is no disambiguation
            comment: self.comment.filter(|c| !c.is_empty()),
            translations,
            plural: self.plural,
            utf8: self.utf8,
            status: self.status,
            locations: self.locations,
        })
    }
}

/// Parse a TS document into its raw entries.
///
/// Unknown elements (e.g. `translatorcomment`) are skipped the way the
/// original tooling tolerates them; structural damage is fatal.
pub fn parse_ts(data: impl BufRead) -> Result<TsFile, ParseError> {
    let mut reader = Reader::from_reader(data);
    let mut buf = Vec::with_capacity(256);
    let mut status = ParseStatus::Start;
    let mut result = TsFile::default();
    let mut context_name = String::new();
    let mut message = MessageBuilder::default();

    loop {
        let offset = reader.buffer_position();
        let event = reader.read_event_into(&mut buf).map_err(|e| ParseError::Xml {
            message: e.to_string(),
            offset: reader.buffer_position(),
        })?;
        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"TS" => {
                    if status != ParseStatus::Start {
                        return Err(ParseError::Misplaced {
                            element: "TS".to_string(),
                            offset,
                        });
                    }
                    for attr in e.attributes() {
                        let attr = map_attr(attr, offset)?;
                        match attr.key.as_ref() {
                            b"language" => result.language = Some(attr_value(&attr, offset)?),
                            b"sourcelanguage" => {
                                result.source_language = Some(attr_value(&attr, offset)?);
                            }
                            _ => {}
                        }
                    }
                    status = ParseStatus::InTs;
                }
                b"context" => {
                    if status != ParseStatus::InTs {
                        return Err(ParseError::Misplaced {
                            element: "context".to_string(),
                            offset,
                        });
                    }
                    context_name.clear();
                    status = ParseStatus::InContext;
                }
                b"name" if status == ParseStatus::InContext => {
                    status = ParseStatus::InContextName;
                }
                b"message" => {
                    if status != ParseStatus::InContext {
                        return Err(ParseError::Misplaced {
                            element: "message".to_string(),
                            offset,
                        });
                    }
                    message = MessageBuilder::default();
                    read_message_attrs(&e, &mut message, offset)?;
                    status = ParseStatus::InMessage;
                }
                b"location" if status == ParseStatus::InMessage => {
                    if let Some(location) = parse_location(&e, offset)? {
                        message.locations.push(location);
                    }
                }
                b"source" if status == ParseStatus::InMessage => {
                    message.source = Some(String::new());
                    status = ParseStatus::InSource;
                }
                b"comment" if status == ParseStatus::InMessage => {
                    message.comment = Some(String::new());
                    status = ParseStatus::InComment;
                }
                b"translation" if status == ParseStatus::InMessage => {
                    read_translation_attrs(&e, &mut message, offset)?;
                    status = ParseStatus::InTranslation;
                }
                b"numerusform" if status == ParseStatus::InTranslation => {
                    message.numerus_forms.push(String::new());
                    status = ParseStatus::InNumerusForm;
                }
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"location" if status == ParseStatus::InMessage => {
                    if let Some(location) = parse_location(&e, offset)? {
                        message.locations.push(location);
                    }
                }
                // e.g. <translation type="unfinished"/>
                b"translation" if status == ParseStatus::InMessage => {
                    read_translation_attrs(&e, &mut message, offset)?;
                }
                b"numerusform" if status == ParseStatus::InTranslation => {
                    message.numerus_forms.push(String::new());
                }
                b"source" if status == ParseStatus::InMessage => {
                    message.source = Some(String::new());
                }
                b"comment" if status == ParseStatus::InMessage => {
                    message.comment = Some(String::new());
                }
                _ => {}
            },
            Event::Text(e) => {
                let text = e.decode().map_err(|err| ParseError::Xml {
                    message: err.to_string(),
                    offset,
                })?;
                push_text(status, &text, &mut context_name, &mut message);
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                push_text(status, &text, &mut context_name, &mut message);
            }
            Event::GeneralRef(e) => {
                // Entity and character references arrive as their own
                // events; resolve the predefined XML set plus numeric refs.
                let name = String::from_utf8_lossy(e.as_ref()).into_owned();
                let resolved = resolve_reference(&name).ok_or_else(|| ParseError::Xml {
                    message: format!("unknown entity reference '&{};'", name),
                    offset,
                })?;
                push_text(status, &resolved, &mut context_name, &mut message);
            }
            Event::End(e) => match e.name().as_ref() {
                b"name" if status == ParseStatus::InContextName => {
                    status = ParseStatus::InContext;
                }
                b"source" if status == ParseStatus::InSource => {
                    status = ParseStatus::InMessage;
                }
                b"comment" if status == ParseStatus::InComment => {
                    status = ParseStatus::InMessage;
                }
                b"numerusform" if status == ParseStatus::InNumerusForm => {
                    status = ParseStatus::InTranslation;
                }
                b"translation" if status == ParseStatus::InTranslation => {
                    status = ParseStatus::InMessage;
                }
                b"message" if status == ParseStatus::InMessage => {
                    let builder = std::mem::take(&mut message);
                    result.entries.push(builder.finish(&context_name, offset)?);
                    status = ParseStatus::InContext;
                }
                b"context" if status == ParseStatus::InContext => {
                    status = ParseStatus::InTs;
                }
                b"TS" if status == ParseStatus::InTs => {
                    status = ParseStatus::Done;
                }
                _ => {}
            },
            Event::Eof => break,
            // XML declaration, doctype, comments, processing instructions
            _ => {}
        }
        buf.clear();
    }

    match status {
        ParseStatus::Done => Ok(result),
        ParseStatus::Start => Err(ParseError::MissingRoot),
        _ => Err(ParseError::UnexpectedEof {
            context: (!context_name.is_empty()).then(|| context_name.clone()),
        }),
    }
}

/// Route character data to whatever the state machine is inside of.
fn push_text(
    status: ParseStatus,
    text: &str,
    context_name: &mut String,
    message: &mut MessageBuilder,
) {
    match status {
        ParseStatus::InContextName => context_name.push_str(text),
        ParseStatus::InSource => {
            message.source.get_or_insert_with(String::new).push_str(text);
        }
        ParseStatus::InComment => {
            message.comment.get_or_insert_with(String::new).push_str(text);
        }
        ParseStatus::InTranslation => message.translation_text.push_str(text),
        ParseStatus::InNumerusForm => {
            if let Some(form) = message.numerus_forms.last_mut() {
                form.push_str(text);
            }
        }
        // Whitespace between structural elements
        _ => {}
    }
}

fn map_attr(
    attr: Result<Attribute<'_>, quick_xml::events::attributes::AttrError>,
    offset: u64,
) -> Result<Attribute<'_>, ParseError> {
    attr.map_err(|e| ParseError::Xml {
        message: e.to_string(),
        offset,
    })
}

fn attr_value(attr: &Attribute<'_>, offset: u64) -> Result<String, ParseError> {
    attr.unescape_value()
        .map(|v| v.into_owned())
        .map_err(|e| ParseError::Xml {
            message: e.to_string(),
            offset,
        })
}

fn read_message_attrs(
    e: &BytesStart<'_>,
    message: &mut MessageBuilder,
    offset: u64,
) -> Result<(), ParseError> {
    for attr in e.attributes() {
        let attr = map_attr(attr, offset)?;
        match attr.key.as_ref() {
            b"numerus" => message.plural = attr.value.as_ref() == b"yes",
            b"utf8" => message.utf8 = attr.value.as_ref() == b"true",
            // Pre-2.0 files spell the flag as encoding="UTF-8"
            b"encoding" => message.utf8 = attr.value.as_ref() == b"UTF-8",
            _ => {}
        }
    }
    Ok(())
}

fn read_translation_attrs(
    e: &BytesStart<'_>,
    message: &mut MessageBuilder,
    offset: u64,
) -> Result<(), ParseError> {
    for attr in e.attributes() {
        let attr = map_attr(attr, offset)?;
        if attr.key.as_ref() == b"type" {
            match attr.value.as_ref() {
                b"unfinished" => message.status = MessageStatus::Unfinished,
                // "vanished" is the newer spelling of the same thing
                b"obsolete" | b"vanished" => message.status = MessageStatus::Obsolete,
                _ => {}
            }
        }
    }
    Ok(())
}

fn parse_location(e: &BytesStart<'_>, offset: u64) -> Result<Option<Location>, ParseError> {
    let mut file = String::new();
    let mut line = 0u32;
    for attr in e.attributes() {
        let attr = map_attr(attr, offset)?;
        match attr.key.as_ref() {
            b"filename" => file = attr_value(&attr, offset)?,
            b"line" => {
                line = attr_value(&attr, offset)?
                    .trim_start_matches('+')
                    .parse()
                    .unwrap_or(0);
            }
            _ => {}
        }
    }
    if file.is_empty() && line == 0 {
        Ok(None)
    } else {
        Ok(Some(Location { file, line }))
    }
}

fn resolve_reference(name: &str) -> Option<String> {
    match name {
        "amp" => Some("&".to_string()),
        "lt" => Some("<".to_string()),
        "gt" => Some(">".to_string()),
        "apos" => Some("'".to_string()),
        "quot" => Some("\"".to_string()),
        _ => {
            let code = name
                .strip_prefix("#x")
                .or_else(|| name.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| name.strip_prefix('#').and_then(|dec| dec.parse().ok()))?;
            char::from_u32(code).map(|c| c.to_string())
        }
    }
}

/// Serialize a catalog back to TS XML.
///
/// Entries keep their document order and obsolete/unfinished markers, so
/// a parse-edit-write cycle through translator tooling loses nothing.
pub fn stringify_ts(catalog: &Catalog) -> String {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    write_document(&mut writer, catalog).expect("writing to an in-memory buffer cannot fail");
    String::from_utf8(writer.into_inner()).expect("writer output is UTF-8")
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), ParseError> {
    writer
        .write_event(event)
        .map_err(|e| ParseError::Io(e.to_string()))
}

fn write_document(writer: &mut Writer<Vec<u8>>, catalog: &Catalog) -> Result<(), ParseError> {
    emit(writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    emit(writer, Event::DocType(BytesText::new("TS")))?;

    let mut ts = BytesStart::new("TS");
    ts.push_attribute(("version", "2.1"));
    if let Some(language) = catalog.language() {
        ts.push_attribute(("language", language));
    }
    if let Some(language) = catalog.source_language() {
        ts.push_attribute(("sourcelanguage", language));
    }
    emit(writer, Event::Start(ts))?;

    for context in catalog.contexts() {
        emit(writer, Event::Start(BytesStart::new("context")))?;
        write_text_element(writer, "name", context)?;
        for entry in catalog.all_for_context(context) {
            write_message(writer, entry)?;
        }
        emit(writer, Event::End(BytesEnd::new("context")))?;
    }

    emit(writer, Event::End(BytesEnd::new("TS")))?;
    Ok(())
}

fn write_message(writer: &mut Writer<Vec<u8>>, entry: &TranslationEntry) -> Result<(), ParseError> {
    let mut msg = BytesStart::new("message");
    if entry.plural {
        msg.push_attribute(("numerus", "yes"));
    }
    if entry.utf8 {
        msg.push_attribute(("utf8", "true"));
    }
    emit(writer, Event::Start(msg))?;

    for location in &entry.locations {
        let mut el = BytesStart::new("location");
        el.push_attribute(("filename", location.file.as_str()));
        let line = location.line.to_string();
        el.push_attribute(("line", line.as_str()));
        emit(writer, Event::Empty(el))?;
    }

    write_text_element(writer, "source", &entry.source)?;
    if let Some(comment) = &entry.comment {
        write_text_element(writer, "comment", comment)?;
    }

    let mut translation = BytesStart::new("translation");
    match entry.status {
        MessageStatus::Finished => {}
        MessageStatus::Unfinished => translation.push_attribute(("type", "unfinished")),
        MessageStatus::Obsolete => translation.push_attribute(("type", "obsolete")),
    }
    if entry.plural {
        emit(writer, Event::Start(translation))?;
        for form in &entry.translations {
            write_text_element(writer, "numerusform", form)?;
        }
        emit(writer, Event::End(BytesEnd::new("translation")))?;
    } else {
        let text = entry.translations.first().map(String::as_str).unwrap_or("");
        if text.is_empty() {
            emit(writer, Event::Empty(translation))?;
        } else {
            emit(writer, Event::Start(translation))?;
            emit(writer, Event::Text(BytesText::new(text)))?;
            emit(writer, Event::End(BytesEnd::new("translation")))?;
        }
    }

    emit(writer, Event::End(BytesEnd::new("message")))?;
    Ok(())
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), ParseError> {
    emit(writer, Event::Start(BytesStart::new(name)))?;
    if !text.is_empty() {
        emit(writer, Event::Text(BytesText::new(text)))?;
    }
    emit(writer, Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let doc = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.0" language="zh_CN" sourcelanguage="en">
<context>
    <name>AudioEqualizer</name>
    <message>
        <source>&amp;Apply</source>
        <translation>应用(&amp;A)</translation>
    </message>
</context>
</TS>
"#;
        let file = parse_ts(doc.as_bytes()).expect("well-formed document");
        assert_eq!(file.language.as_deref(), Some("zh_CN"));
        assert_eq!(file.source_language.as_deref(), Some("en"));
        assert_eq!(file.entries.len(), 1);

        let entry = &file.entries[0];
        assert_eq!(entry.context, "AudioEqualizer");
        assert_eq!(entry.source, "&Apply");
        assert_eq!(entry.translations, vec!["应用(&A)".to_string()]);
        assert_eq!(entry.status, MessageStatus::Finished);
        assert!(!entry.plural);
        assert!(entry.comment.is_none());
    }

    #[test]
    fn test_parse_numerus() {
        let doc = r#"<!DOCTYPE TS>
<TS version="2.0" language="zh_CN">
<context>
    <name>Core</name>
    <message numerus="yes">
        <source>%n second(s)</source>
        <translation>
            <numerusform>%n 秒</numerusform>
        </translation>
    </message>
</context>
</TS>
"#;
        let file = parse_ts(doc.as_bytes()).expect("well-formed document");
        let entry = &file.entries[0];
        assert!(entry.plural);
        assert_eq!(entry.translations, vec!["%n 秒".to_string()]);
    }

    #[test]
    fn test_parse_status_markers() {
        let doc = r#"<!DOCTYPE TS>
<TS version="2.0" language="zh_CN">
<context>
    <name>BaseGui</name>
    <message>
        <source>Old option</source>
        <translation type="obsolete">旧选项</translation>
    </message>
    <message>
        <source>New option</source>
        <translation type="unfinished"></translation>
    </message>
    <message>
        <source>Gone option</source>
        <translation type="vanished">没了</translation>
    </message>
</context>
</TS>
"#;
        let file = parse_ts(doc.as_bytes()).expect("well-formed document");
        assert_eq!(file.entries[0].status, MessageStatus::Obsolete);
        assert_eq!(file.entries[1].status, MessageStatus::Unfinished);
        assert_eq!(file.entries[1].translations, vec![String::new()]);
        assert_eq!(file.entries[2].status, MessageStatus::Obsolete);
    }

    #[test]
    fn test_parse_locations_comment_and_utf8() {
        let doc = r#"<!DOCTYPE TS>
<TS version="2.0" language="zh_CN">
<context>
    <name>PrefSubtitles</name>
    <message utf8="true">
        <location filename="../prefsubtitles.cpp" line="440"/>
        <location filename="../prefsubtitles.ui" line="68"/>
        <source>Top</source>
        <comment>vertical alignment</comment>
        <translation>顶部</translation>
    </message>
</context>
</TS>
"#;
        let file = parse_ts(doc.as_bytes()).expect("well-formed document");
        let entry = &file.entries[0];
        assert!(entry.utf8);
        assert_eq!(entry.comment.as_deref(), Some("vertical alignment"));
        assert_eq!(entry.locations.len(), 2);
        assert_eq!(entry.locations[0].file, "../prefsubtitles.cpp");
        assert_eq!(entry.locations[0].line, 440);
        assert_eq!(entry.locations[1].line, 68);
    }

    #[test]
    fn test_parse_self_closing_translation() {
        let doc = r#"<!DOCTYPE TS>
<TS version="2.1" language="zh_CN">
<context>
    <name>Core</name>
    <message>
        <source>Untranslated</source>
        <translation type="unfinished"/>
    </message>
</context>
</TS>
"#;
        let file = parse_ts(doc.as_bytes()).expect("well-formed document");
        assert_eq!(file.entries[0].status, MessageStatus::Unfinished);
        assert_eq!(file.entries[0].translations, vec![String::new()]);
    }

    #[test]
    fn test_unknown_elements_skipped() {
        let doc = r#"<!DOCTYPE TS>
<TS version="2.1" language="zh_CN">
<context>
    <name>Core</name>
    <message>
        <source>Play</source>
        <translatorcomment>checked against the UI</translatorcomment>
        <translation>播放</translation>
    </message>
</context>
</TS>
"#;
        let file = parse_ts(doc.as_bytes()).expect("unknown elements are tolerated");
        assert_eq!(file.entries[0].translations, vec!["播放".to_string()]);
    }

    #[test]
    fn test_missing_source_fails() {
        let doc = r#"<!DOCTYPE TS>
<TS version="2.0" language="zh_CN">
<context>
    <name>Core</name>
    <message>
        <translation>播放</translation>
    </message>
</context>
</TS>
"#;
        match parse_ts(doc.as_bytes()) {
            Err(ParseError::MissingSource { context, .. }) => assert_eq!(context, "Core"),
            other => panic!("expected MissingSource, got {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_message_fails() {
        let doc = r#"<!DOCTYPE TS>
<TS version="2.0" language="zh_CN">
<context>
    <name>Core</name>
    <message>
        <source>Play</source>
        <translation>播放</translation>
"#;
        assert!(parse_ts(doc.as_bytes()).is_err());
    }

    #[test]
    fn test_truncated_document_fails() {
        let doc = r#"<!DOCTYPE TS>
<TS version="2.0" language="zh_CN">
<context>
    <name>Core</name>
</context>
"#;
        match parse_ts(doc.as_bytes()) {
            Err(ParseError::UnexpectedEof { .. }) | Err(ParseError::Xml { .. }) => {}
            other => panic!("expected a failure, got {:?}", other),
        }
    }

    #[test]
    fn test_not_a_ts_document() {
        assert!(matches!(
            parse_ts("<html><body/></html>".as_bytes()),
            Err(ParseError::MissingRoot)
        ));
    }

    #[test]
    fn test_message_outside_context_fails() {
        let doc = r#"<!DOCTYPE TS>
<TS version="2.0" language="zh_CN">
    <message>
        <source>Play</source>
        <translation>播放</translation>
    </message>
</TS>
"#;
        match parse_ts(doc.as_bytes()) {
            Err(ParseError::Misplaced { element, .. }) => assert_eq!(element, "message"),
            other => panic!("expected Misplaced, got {:?}", other),
        }
    }

    #[test]
    fn test_stringify_round_trip() {
        let doc = r#"<!DOCTYPE TS>
<TS version="2.1" language="zh_CN" sourcelanguage="en">
<context>
    <name>AudioEqualizer</name>
    <message>
        <location filename="../audioequalizer.cpp" line="71"/>
        <source>&amp;Apply</source>
        <translation>应用(&amp;A)</translation>
    </message>
    <message numerus="yes">
        <source>%n second(s)</source>
        <translation><numerusform>%n 秒</numerusform></translation>
    </message>
    <message>
        <source>Old</source>
        <translation type="obsolete">旧</translation>
    </message>
    <message>
        <source>Top</source>
        <comment>vertical alignment</comment>
        <translation type="unfinished"/>
    </message>
</context>
</TS>
"#;
        let catalog = Catalog::from_str(doc).expect("fixture parses");
        let written = stringify_ts(&catalog);
        let reparsed = Catalog::from_str(&written).expect("own output parses");
        assert_eq!(catalog.entries(), reparsed.entries());
        assert_eq!(reparsed.language(), Some("zh_CN"));
        assert_eq!(reparsed.source_language(), Some("en"));
    }

    #[test]
    fn test_stringify_escapes_markup() {
        let doc = r#"<!DOCTYPE TS>
<TS version="2.1" language="zh_CN">
<context>
    <name>Core</name>
    <message>
        <source>Volume &lt; 50%</source>
        <translation>音量 &lt; 50%</translation>
    </message>
</context>
</TS>
"#;
        let catalog = Catalog::from_str(doc).expect("fixture parses");
        let written = stringify_ts(&catalog);
        assert!(written.contains("&lt; 50%"));
        let reparsed = Catalog::from_str(&written).expect("own output parses");
        assert_eq!(reparsed.translate("Core", "Volume < 50%", None), "音量 < 50%");
    }
}
