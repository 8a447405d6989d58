//! Wire codec for the profile documents.
//!
//! Both documents share one shape: a bare root element holding a flat run of
//! record elements, each record's body stored as escaped text content:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <signatures>
//!   <signature name="Work" account="work" default="true">Regards,
//! Alex</signature>
//!   <signature name="Fallback"/>
//! </signatures>
//! ```
//!
//! The reader is strict: unknown elements or attributes, attributes on the
//! root, and non-whitespace text between records all reject the document.
//! Whitespace between elements is tolerated and dropped; text inside a
//! record is the body, preserved verbatim.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{Result, SigformError};
use crate::model::Record;

/// Reader position within the document.
enum State {
    /// Before the root element, or after it closed.
    Root,
    /// Inside the root, between records.
    List,
    /// Inside a record element, accumulating its body.
    Item,
}

fn malformed(kind: &str, detail: impl Into<String>) -> SigformError {
    SigformError::Malformed(format!("{kind}: {}", detail.into()))
}

/// Parses a full document into records, enforcing the shape above.
pub fn read_document<R: Record>(source: &str) -> Result<Vec<R>> {
    let root = R::KIND.root_element();
    let item = R::KIND.item_element();

    let mut reader = Reader::from_str(source);
    let mut state = State::Root;
    let mut saw_root = false;
    let mut records = Vec::new();
    let mut attrs: Vec<(String, String)> = Vec::new();
    let mut body = String::new();

    loop {
        match reader.read_event()? {
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Start(e) => match state {
                State::Root if e.name().as_ref() == root.as_bytes() && !saw_root => {
                    if e.attributes().next().is_some() {
                        return Err(malformed(root, format!("attributes on <{root}>")));
                    }
                    saw_root = true;
                    state = State::List;
                }
                State::List if e.name().as_ref() == item.as_bytes() => {
                    attrs = collect_attrs(&e)?;
                    body.clear();
                    state = State::Item;
                }
                _ => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    return Err(malformed(root, format!("unexpected element <{name}>")));
                }
            },
            Event::Empty(e) => match state {
                State::Root if e.name().as_ref() == root.as_bytes() && !saw_root => {
                    if e.attributes().next().is_some() {
                        return Err(malformed(root, format!("attributes on <{root}>")));
                    }
                    saw_root = true;
                }
                State::List if e.name().as_ref() == item.as_bytes() => {
                    records.push(R::from_parts(collect_attrs(&e)?, String::new())?);
                }
                _ => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    return Err(malformed(root, format!("unexpected element <{name}>")));
                }
            },
            Event::End(e) => match state {
                State::Item if e.name().as_ref() == item.as_bytes() => {
                    records.push(R::from_parts(std::mem::take(&mut attrs), std::mem::take(&mut body))?);
                    state = State::List;
                }
                State::List if e.name().as_ref() == root.as_bytes() => {
                    state = State::Root;
                }
                _ => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    return Err(malformed(root, format!("unexpected </{name}>")));
                }
            },
            Event::Text(t) => {
                let text = t
                    .decode()
                    .map_err(|err| malformed(root, err.to_string()))?;
                match state {
                    State::Item => body.push_str(&text),
                    _ if text.trim().is_empty() => {}
                    _ => return Err(malformed(root, "stray text between elements")),
                }
            }
            Event::CData(c) => match state {
                State::Item => {
                    let text = std::str::from_utf8(&c)
                        .map_err(|err| malformed(root, err.to_string()))?;
                    body.push_str(text);
                }
                _ => return Err(malformed(root, "stray CDATA between elements")),
            },
            // The reader reports `&name;` in text as its own event.
            Event::GeneralRef(e) => match state {
                State::Item => {
                    let name = std::str::from_utf8(&e)
                        .map_err(|err| malformed(root, err.to_string()))?;
                    match resolve_reference(name) {
                        Some(resolved) => body.push_str(&resolved),
                        None => {
                            return Err(malformed(
                                root,
                                format!("unresolvable reference '&{name};'"),
                            ))
                        }
                    }
                }
                _ => return Err(malformed(root, "reference outside a record body")),
            },
            Event::Eof => break,
        }
    }

    if !saw_root {
        return Err(malformed(root, format!("missing <{root}> document element")));
    }
    match state {
        State::Root => Ok(records),
        _ => Err(malformed(root, "unexpected end of document")),
    }
}

/// Serializes records into a complete document, declaration included.
/// Bodies are escaped by the writer; an empty body collapses to a
/// self-closing element so indentation never leaks into it.
pub fn write_document<R: Record>(records: &[R]) -> Result<String> {
    let root = R::KIND.root_element();
    let item = R::KIND.item_element();

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(root)))?;
    for record in records {
        let mut start = BytesStart::new(item);
        for (key, value) in record.attributes() {
            start.push_attribute((key, value.as_str()));
        }
        if record.body().is_empty() {
            writer.write_event(Event::Empty(start))?;
        } else {
            writer.write_event(Event::Start(start))?;
            writer.write_event(Event::Text(BytesText::new(record.body())))?;
            writer.write_event(Event::End(BytesEnd::new(item)))?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new(root)))?;

    String::from_utf8(writer.into_inner())
        .map_err(|err| SigformError::Malformed(err.to_string()))
}

/// Resolves a general reference in body text: character references plus
/// the five predefined XML entities. Anything else is undefined here, the
/// documents carry no DTD.
fn resolve_reference(name: &str) -> Option<String> {
    if let Some(num) = name.strip_prefix('#') {
        let code = if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            num.parse().ok()?
        };
        return char::from_u32(code).map(String::from);
    }
    let text = match name {
        "lt" => "<",
        "gt" => ">",
        "amp" => "&",
        "apos" => "'",
        "quot" => "\"",
        _ => return None,
    };
    Some(text.to_string())
}

fn collect_attrs(e: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| SigformError::Malformed(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| SigformError::Malformed(err.to_string()))?
            .into_owned();
        out.push((key, value));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccountFilter, FixedText, Signature};

    #[test]
    fn reads_a_plain_document() {
        let doc = r#"<?xml version="1.0" encoding="UTF-8"?>
<texts>
  <text name="Greeting">Hello,</text>
  <text name="Farewell">Bye,
Alex</text>
</texts>"#;
        let texts: Vec<FixedText> = read_document(doc).unwrap();
        assert_eq!(
            texts,
            vec![
                FixedText::new("Greeting", "Hello,"),
                FixedText::new("Farewell", "Bye,\nAlex"),
            ]
        );
    }

    #[test]
    fn reads_signature_attributes() {
        let doc = r#"<signatures>
  <signature name="Work" account="work" default="true">Regards</signature>
  <signature name="Lists" account="(news|lists)-.*" match="regex">-- </signature>
  <signature name="Plain"/>
</signatures>"#;
        let sigs: Vec<Signature> = read_document(doc).unwrap();
        assert_eq!(sigs.len(), 3);
        assert_eq!(sigs[0].account, AccountFilter::Account("work".to_string()));
        assert!(sigs[0].is_default);
        assert_eq!(
            sigs[1].account,
            AccountFilter::Pattern("(news|lists)-.*".to_string())
        );
        assert!(!sigs[1].is_default);
        assert_eq!(sigs[2].account, AccountFilter::Any);
        assert_eq!(sigs[2].body, "");
    }

    #[test]
    fn reads_a_self_closing_empty_document() {
        let texts: Vec<FixedText> = read_document("<texts/>").unwrap();
        assert!(texts.is_empty());
        let texts: Vec<FixedText> = read_document("<texts></texts>").unwrap();
        assert!(texts.is_empty());
    }

    #[test]
    fn body_whitespace_survives() {
        let doc = "<texts><text name=\"a\">  two spaces in,\n\tone tab out  </text></texts>";
        let texts: Vec<FixedText> = read_document(doc).unwrap();
        assert_eq!(texts[0].body, "  two spaces in,\n\tone tab out  ");
    }

    #[test]
    fn escaped_body_text_is_decoded() {
        let doc = "<texts><text name=\"a\">a &lt; b &amp;&amp; c &gt; d</text></texts>";
        let texts: Vec<FixedText> = read_document(doc).unwrap();
        assert_eq!(texts[0].body, "a < b && c > d");
    }

    #[test]
    fn character_references_decode_into_the_body() {
        let doc = "<texts><text name=\"a\">line&#10;break &#x26; more</text></texts>";
        let texts: Vec<FixedText> = read_document(doc).unwrap();
        assert_eq!(texts[0].body, "line\nbreak & more");
    }

    #[test]
    fn multibyte_text_decodes_around_references() {
        let doc = "<texts><text name=\"a\">café &amp; crème&#33;</text></texts>";
        let texts: Vec<FixedText> = read_document(doc).unwrap();
        assert_eq!(texts[0].body, "café & crème!");
    }

    #[test]
    fn rejects_undefined_entity_references() {
        let doc = "<texts><text name=\"a\">&nope;</text></texts>";
        assert!(read_document::<FixedText>(doc).is_err());
    }

    #[test]
    fn rejects_wrong_root() {
        let err = read_document::<FixedText>("<signatures/>").unwrap_err();
        assert!(matches!(err, SigformError::Malformed(_)));
    }

    #[test]
    fn rejects_attributes_on_root() {
        assert!(read_document::<FixedText>("<texts version=\"1\"/>").is_err());
    }

    #[test]
    fn rejects_unknown_child_element() {
        let doc = "<texts><template name=\"a\">x</template></texts>";
        assert!(read_document::<FixedText>(doc).is_err());
    }

    #[test]
    fn rejects_nested_record() {
        let doc = "<texts><text name=\"a\"><text name=\"b\">x</text></text></texts>";
        assert!(read_document::<FixedText>(doc).is_err());
    }

    #[test]
    fn rejects_stray_text_between_records() {
        let doc = "<texts>stray<text name=\"a\">x</text></texts>";
        assert!(read_document::<FixedText>(doc).is_err());
    }

    #[test]
    fn tolerates_whitespace_between_records() {
        let doc = "<texts>\n\t  <text name=\"a\">x</text>\n</texts>\n";
        assert_eq!(read_document::<FixedText>(doc).unwrap().len(), 1);
    }

    #[test]
    fn rejects_unclosed_document() {
        assert!(read_document::<FixedText>("<texts><text name=\"a\">x").is_err());
        assert!(read_document::<FixedText>("").is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(read_document::<FixedText>("not xml at all").is_err());
    }

    #[test]
    fn writes_declaration_and_items() {
        let texts = vec![FixedText::new("Greeting", "Hello,")];
        let doc = write_document(&texts).unwrap();
        assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(doc.contains("<text name=\"Greeting\">Hello,</text>"));
        assert!(doc.ends_with("</texts>"));
    }

    #[test]
    fn writes_empty_body_self_closed() {
        let texts = vec![FixedText::new("Blank", "")];
        let doc = write_document(&texts).unwrap();
        assert!(doc.contains("<text name=\"Blank\"/>"));
    }

    #[test]
    fn escapes_markup_in_attributes_and_body() {
        let texts = vec![FixedText::new("a<b", "1 < 2 & \"so on\"")];
        let doc = write_document(&texts).unwrap();
        assert!(doc.contains("name=\"a&lt;b\""));
        assert!(doc.contains("1 &lt; 2 &amp;"));
        let back: Vec<FixedText> = read_document(&doc).unwrap();
        assert_eq!(back, texts);
    }

    #[test]
    fn signatures_round_trip() {
        let sigs = vec![
            Signature::new("Work", "Regards,\nAlex")
                .with_account(AccountFilter::Account("work".to_string()))
                .with_default(true),
            Signature::new("Lists", "-- \nml").with_account(AccountFilter::Pattern(
                "(news|lists)-.*".to_string(),
            )),
            Signature::new("Fallback", ""),
        ];
        let doc = write_document(&sigs).unwrap();
        let back: Vec<Signature> = read_document(&doc).unwrap();
        assert_eq!(back, sigs);
    }

    #[test]
    fn multiline_bodies_round_trip_verbatim() {
        let texts = vec![FixedText::new("sig", "Regards,\n\nAlex Example\n")];
        let doc = write_document(&texts).unwrap();
        let back: Vec<FixedText> = read_document(&doc).unwrap();
        assert_eq!(back[0].body, "Regards,\n\nAlex Example\n");
    }

    #[test]
    fn empty_list_round_trips() {
        let doc = write_document::<FixedText>(&[]).unwrap();
        let back: Vec<FixedText> = read_document(&doc).unwrap();
        assert!(back.is_empty());
    }
}
