use crate::error::{ReleasesError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::ops::Range;

/// Lightweight element tree that remembers where each element's text lives
/// in the source, so values can be replaced without re-serializing the XML.
#[derive(Debug, Clone)]
pub struct Element {
    pub name: String,
    pub children: Vec<Element>,
    /// Trimmed text content; empty for elements with child elements.
    pub text: String,
    /// Byte range of `text` within the source document.
    pub text_span: Range<usize>,
}

impl Element {
    fn new(name: String, position: usize) -> Self {
        Self {
            name,
            children: Vec::new(),
            text: String::new(),
            text_span: position..position,
        }
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    /// Follows a path of child names, e.g. `["dependencyManagement", "dependencies"]`.
    pub fn descend(&self, path: &[&str]) -> Option<&Element> {
        path.iter().try_fold(self, |element, name| element.child(name))
    }
}

struct Frame {
    element: Element,
    content_start: usize,
}

/// Parses `source` and returns its root element.
pub fn parse(source: &str) -> Result<Element> {
    let mut reader = Reader::from_str(source);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            ReleasesError::PomParsing(format!(
                "Malformed XML at byte {}: {}",
                reader.error_position(),
                e
            ))
        })?;
        let position = reader.buffer_position() as usize;

        match event {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                stack.push(Frame {
                    element: Element::new(name, position),
                    content_start: position,
                });
            }
            Event::Empty(empty) => {
                let name = String::from_utf8_lossy(empty.local_name().as_ref()).into_owned();
                let element = Element::new(name, position);
                match stack.last_mut() {
                    Some(parent) => parent.element.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::End(_) => {
                let Some(mut frame) = stack.pop() else {
                    return Err(ReleasesError::PomParsing(format!(
                        "Unexpected closing tag at byte {position}"
                    )));
                };

                // the end tag is the last `</` before the reader position
                let content_end = source[..position]
                    .rfind("</")
                    .filter(|end| *end >= frame.content_start)
                    .ok_or_else(|| {
                        ReleasesError::PomParsing(format!("Unbalanced element at byte {position}"))
                    })?;

                if frame.element.children.is_empty() {
                    let raw = &source[frame.content_start..content_end];
                    let leading = raw.len() - raw.trim_start().len();
                    let trimmed = raw.trim();
                    let start = frame.content_start + leading;
                    frame.element.text = trimmed.to_string();
                    frame.element.text_span = start..start + trimmed.len();
                } else {
                    frame.element.text_span = content_end..content_end;
                }

                match stack.last_mut() {
                    Some(parent) => parent.element.children.push(frame.element),
                    None => root = Some(frame.element),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ReleasesError::PomParsing("Unexpected end of document".to_string()));
    }

    root.ok_or_else(|| ReleasesError::PomParsing("Document has no root element".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_text_spans() {
        let source = "<project>\n  <version> 1.0-SNAPSHOT </version>\n</project>";
        let root = parse(source).unwrap();
        let version = root.child("version").unwrap();
        assert_eq!(version.text, "1.0-SNAPSHOT");
        assert_eq!(&source[version.text_span.clone()], "1.0-SNAPSHOT");
    }

    #[test]
    fn descends_nested_elements() {
        let source = "<project><parent><groupId>g</groupId><version>1</version></parent></project>";
        let root = parse(source).unwrap();
        assert_eq!(root.descend(&["parent", "groupId"]).unwrap().text, "g");
        assert!(root.descend(&["parent", "missing"]).is_none());
    }

    #[test]
    fn ignores_comments_and_declarations() {
        let source = r#"<?xml version="1.0"?>
<!-- header -->
<project xmlns="http://maven.apache.org/POM/4.0.0">
  <dependencies>
    <dependency><artifactId>a</artifactId><optional/></dependency>
    <dependency><artifactId>b</artifactId></dependency>
  </dependencies>
</project>"#;
        let root = parse(source).unwrap();
        let dependencies = root.child("dependencies").unwrap();
        let names: Vec<&str> = dependencies
            .children_named("dependency")
            .filter_map(|d| d.child_text("artifactId"))
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn rejects_mismatched_tags() {
        let err = parse("<project><version>1</parent></project>").unwrap_err();
        assert!(matches!(err, ReleasesError::PomParsing(_)));
    }

    #[test]
    fn rejects_truncated_document() {
        assert!(parse("<project><dependencies>").is_err());
    }
}
