//! XML interchange codec for the snippet/folder document format.
//!
//! Master documents are hand-maintained by non-engineers, so decoding is
//! best-effort: tag case is ignored, unknown elements are skipped, missing
//! fields default, and malformed input degrades to whatever was parsed
//! before the error instead of failing. Callers log degraded results if
//! they care.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::fingerprint::{fingerprint, folder_fingerprint};
use crate::models::{Snippet, SnippetFolder, SnippetKind};

#[derive(Default)]
struct PartialSnippet {
    id: Option<String>,
    title: String,
    content: String,
    description: String,
}

#[derive(Default)]
struct PartialFolder {
    name: String,
    snippets: Vec<PartialSnippet>,
}

#[derive(Clone, Copy)]
enum Field {
    Id,
    Title,
    Content,
    Description,
}

/// Decode an interchange document into folders. Total: malformed input
/// yields an empty or partial list, never an error. Snippets without an
/// embedded `<id>` get a fingerprint; `order` follows document position.
/// Everything decodes as master; import paths restamp.
pub fn decode(xml: &[u8]) -> Vec<SnippetFolder> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().check_end_names = false;

    let mut folders: Vec<SnippetFolder> = Vec::new();
    let mut folder: Option<PartialFolder> = None;
    let mut snippet: Option<PartialSnippet> = None;
    let mut field: Option<Field> = None;
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(start)) => {
                match element_name(start.local_name().as_ref()).as_str() {
                    "folder" => {
                        snippet = None;
                        field = None;
                        folder = Some(PartialFolder::default());
                    }
                    "snippet" if folder.is_some() => {
                        field = None;
                        snippet = Some(PartialSnippet::default());
                    }
                    "id" => {
                        field = Some(Field::Id);
                        text.clear();
                    }
                    "title" => {
                        field = Some(Field::Title);
                        text.clear();
                    }
                    "content" => {
                        field = Some(Field::Content);
                        text.clear();
                    }
                    "description" => {
                        field = Some(Field::Description);
                        text.clear();
                    }
                    _ => field = None,
                }
            }
            Ok(Event::Empty(empty)) => {
                match element_name(empty.local_name().as_ref()).as_str() {
                    "folder" => {
                        let order = folders.len();
                        folders.push(build_folder(PartialFolder::default(), order));
                    }
                    "snippet" => {
                        if let Some(open) = folder.as_mut() {
                            open.snippets.push(PartialSnippet::default());
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(t)) => {
                if field.is_some() {
                    match t.unescape() {
                        Ok(s) => text.push_str(&s),
                        Err(_) => text.push_str(&String::from_utf8_lossy(&t)),
                    }
                }
            }
            Ok(Event::CData(data)) => {
                if field.is_some() {
                    text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Ok(Event::End(end)) => match element_name(end.local_name().as_ref()).as_str() {
                "folder" => {
                    if let Some(done) = folder.take() {
                        let order = folders.len();
                        folders.push(build_folder(done, order));
                    }
                    snippet = None;
                    field = None;
                }
                "snippet" => {
                    if let (Some(open), Some(done)) = (folder.as_mut(), snippet.take()) {
                        open.snippets.push(done);
                    }
                    field = None;
                }
                "id" | "title" | "content" | "description" => {
                    if let Some(closed) = field.take() {
                        store_field(closed, &text, folder.as_mut(), snippet.as_mut());
                    }
                    text.clear();
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            // Ill-formed markup: keep whatever decoded cleanly so far.
            Err(_) => break,
            Ok(_) => {}
        }
        buf.clear();
    }

    folders
}

/// Serialize folders back to the interchange format, folders and snippets
/// in their stored display order (stable on ties).
pub fn encode(folders: &[SnippetFolder]) -> String {
    let mut ordered: Vec<&SnippetFolder> = folders.iter().collect();
    ordered.sort_by_key(|f| f.order);

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<folders>\n");
    for folder in ordered {
        out.push_str("  <folder>\n");
        out.push_str(&format!(
            "    <title>{}</title>\n",
            escape_text(&folder.name)
        ));
        out.push_str("    <snippets>\n");

        let mut snippets: Vec<&Snippet> = folder.snippets.iter().collect();
        snippets.sort_by_key(|s| s.order);
        for snippet in snippets {
            out.push_str("      <snippet>\n");
            out.push_str(&format!(
                "        <title>{}</title>\n",
                escape_text(&snippet.title)
            ));
            out.push_str(&format!(
                "        <content>{}</content>\n",
                escape_text(&snippet.content)
            ));
            if let Some(description) = &snippet.description {
                out.push_str(&format!(
                    "        <description>{}</description>\n",
                    escape_text(description)
                ));
            }
            out.push_str("      </snippet>\n");
        }

        out.push_str("    </snippets>\n");
        out.push_str("  </folder>\n");
    }
    out.push_str("</folders>\n");
    out
}

/// Escape the five XML specials. The ampersand goes first so entities
/// introduced by the later substitutions are not escaped again.
fn escape_text(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn element_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

fn store_field(
    field: Field,
    text: &str,
    folder: Option<&mut PartialFolder>,
    snippet: Option<&mut PartialSnippet>,
) {
    match (field, snippet) {
        (Field::Id, Some(snippet)) => {
            let id = text.trim();
            if !id.is_empty() {
                snippet.id = Some(id.to_string());
            }
        }
        (Field::Title, Some(snippet)) => snippet.title = text.trim().to_string(),
        // Content is kept verbatim; titles and names are single-line
        // labels and get trimmed.
        (Field::Content, Some(snippet)) => snippet.content = text.to_string(),
        (Field::Description, Some(snippet)) => snippet.description = text.trim().to_string(),
        (Field::Title, None) => {
            if let Some(folder) = folder {
                folder.name = text.trim().to_string();
            }
        }
        _ => {}
    }
}

fn build_folder(partial: PartialFolder, order: usize) -> SnippetFolder {
    let name = partial.name;
    let snippets: Vec<Snippet> = partial
        .snippets
        .into_iter()
        .enumerate()
        .map(|(position, s)| Snippet {
            id: s
                .id
                .unwrap_or_else(|| fingerprint(&name, &s.title, &s.content)),
            title: s.title,
            content: s.content,
            folder: name.clone(),
            kind: SnippetKind::Master,
            description: if s.description.is_empty() {
                None
            } else {
                Some(s.description)
            },
            order: position,
            created_at: None,
            updated_at: None,
        })
        .collect();

    SnippetFolder {
        id: folder_fingerprint(&name),
        name,
        snippets,
        order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<folders>
  <folder>
    <title>営業</title>
    <snippets>
      <snippet>
        <title>挨拶</title>
        <content>お世話になっております。</content>
        <description>冒頭の定型文</description>
      </snippet>
      <snippet>
        <title>締め</title>
        <content>よろしくお願いいたします。</content>
      </snippet>
    </snippets>
  </folder>
  <folder>
    <title>経理</title>
    <snippets>
      <snippet>
        <title>請求</title>
        <content>請求書を送付いたします。</content>
      </snippet>
    </snippets>
  </folder>
</folders>"#;

    #[test]
    fn decodes_folders_and_snippets_in_document_order() {
        let folders = decode(DOC.as_bytes());

        assert_eq!(folders.len(), 2);
        assert_eq!(folders[0].name, "営業");
        assert_eq!(folders[0].order, 0);
        assert_eq!(folders[1].name, "経理");
        assert_eq!(folders[1].order, 1);

        let first = &folders[0].snippets[0];
        assert_eq!(first.title, "挨拶");
        assert_eq!(first.content, "お世話になっております。");
        assert_eq!(first.description.as_deref(), Some("冒頭の定型文"));
        assert_eq!(first.order, 0);
        assert_eq!(first.kind, SnippetKind::Master);
        assert_eq!(folders[0].snippets[1].order, 1);
        assert_eq!(folders[0].snippets[1].description, None);
    }

    #[test]
    fn assigns_fingerprints_when_no_id_is_embedded() {
        let folders = decode(DOC.as_bytes());
        let snippet = &folders[0].snippets[0];
        assert_eq!(
            snippet.id,
            crate::fingerprint::fingerprint("営業", "挨拶", "お世話になっております。")
        );
    }

    #[test]
    fn honors_an_embedded_id() {
        let doc = "<folders><folder><title>営業</title><snippets><snippet>\
                   <id>snippet_custom</id><title>挨拶</title><content>本文</content>\
                   </snippet></snippets></folder></folders>";
        let folders = decode(doc.as_bytes());
        assert_eq!(folders[0].snippets[0].id, "snippet_custom");
    }

    #[test]
    fn single_snippet_child_normalizes_to_a_one_element_list() {
        let one = "<folders><folder><title>f</title><snippets><snippet>\
                   <title>a</title><content>1</content></snippet></snippets></folder></folders>";
        let two = "<folders><folder><title>f</title><snippets>\
                   <snippet><title>a</title><content>1</content></snippet>\
                   <snippet><title>b</title><content>2</content></snippet>\
                   </snippets></folder></folders>";

        let first = decode(one.as_bytes());
        let second = decode(two.as_bytes());
        assert_eq!(first[0].snippets.len(), 1);
        assert_eq!(second[0].snippets.len(), 2);
        assert_eq!(first[0].snippets[0], second[0].snippets[0]);
    }

    #[test]
    fn tag_case_is_ignored() {
        let doc = "<FOLDERS><Folder><TITLE>営業</TITLE><Snippets><SNIPPET>\
                   <Title>挨拶</Title><CONTENT>本文</CONTENT></SNIPPET></Snippets></Folder></FOLDERS>";
        let folders = decode(doc.as_bytes());
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].name, "営業");
        assert_eq!(folders[0].snippets[0].title, "挨拶");
        assert_eq!(folders[0].snippets[0].content, "本文");
    }

    #[test]
    fn unknown_elements_are_ignored() {
        let doc = "<folders><folder><title>f</title><color>red</color><snippets>\
                   <snippet><title>a</title><content>1</content><priority>9</priority></snippet>\
                   </snippets></folder></folders>";
        let folders = decode(doc.as_bytes());
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].name, "f");
        assert_eq!(folders[0].snippets.len(), 1);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let doc = "<folders><folder><title>f</title><snippets><snippet/></snippets></folder></folders>";
        let folders = decode(doc.as_bytes());
        let snippet = &folders[0].snippets[0];
        assert_eq!(snippet.title, "");
        assert_eq!(snippet.content, "");
        assert_eq!(snippet.description, None);
    }

    #[test]
    fn garbage_input_decodes_to_nothing() {
        assert!(decode(b"").is_empty());
        assert!(decode(b"hello world").is_empty());
        assert!(decode("<folders></folders>".as_bytes()).is_empty());
        // Truncated mid-tag: degrade, never panic.
        let partial = decode("<folders><folder><title>x</tit".as_bytes());
        assert!(partial.is_empty());
    }

    #[test]
    fn entities_are_unescaped_on_decode() {
        let doc = "<folders><folder><title>f</title><snippets><snippet>\
                   <title>t</title><content>A &amp; B &lt;tag&gt; &quot;q&quot; &apos;a&apos;</content>\
                   </snippet></snippets></folder></folders>";
        let folders = decode(doc.as_bytes());
        assert_eq!(folders[0].snippets[0].content, r#"A & B <tag> "q" 'a'"#);
    }

    #[test]
    fn encode_escapes_ampersand_first() {
        let mut folders = decode(DOC.as_bytes());
        folders[0].snippets[0].content = r#"A&B <tag> "q" 'a' &lt;"#.to_string();
        let xml = encode(&folders);
        assert!(xml.contains("A&amp;B &lt;tag&gt; &quot;q&quot; &apos;a&apos; &amp;lt;"));
    }

    #[test]
    fn encode_emits_stored_order() {
        let mut folders = decode(DOC.as_bytes());
        folders[0].order = 5;
        folders[1].order = 2;
        let xml = encode(&folders);
        assert!(xml.find("経理").unwrap() < xml.find("営業").unwrap());
    }

    #[test]
    fn encode_omits_absent_descriptions() {
        let folders = decode(DOC.as_bytes());
        let xml = encode(&folders);
        assert_eq!(xml.matches("<description>").count(), 1);
    }

    #[test]
    fn round_trips_through_encode() {
        let first = decode(DOC.as_bytes());
        let second = decode(encode(&first).as_bytes());
        assert_eq!(first, second);
    }
}
