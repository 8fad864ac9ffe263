//! Minimal element tree for the data documents.
//!
//! The species/moves files are small, so the whole document is read into an
//! arena of [`Node`]s. Only what the audits need is kept: tag name,
//! attributes, leading text and children. Comments, processing instructions
//! and the prolog are dropped.
//!
//! Text follows the usual XML tree convention: an element's `text` is the
//! character data before its first child element. Whitespace is preserved.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{AuditError, Result};

/// Arena index of an element. Identity, not value: two `<move>Tackle</move>`
/// siblings have different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    /// Read and parse a document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let xml = fs::read_to_string(path).map_err(|e| AuditError::io(path, e))?;
        Self::parse_with_origin(&xml, &path.display().to_string())
    }

    /// Parse a document held in memory.
    pub fn parse(xml: &str) -> Result<Self> {
        Self::parse_with_origin(xml, "<inline>")
    }

    fn parse_with_origin(xml: &str, origin: &str) -> Result<Self> {
        let xml_err = |source: quick_xml::Error| AuditError::Xml {
            origin: origin.to_string(),
            source,
        };
        let structure_err = |message: String| AuditError::XmlStructure {
            origin: origin.to_string(),
            message,
        };
        let open_err = |err: OpenError| match err {
            OpenError::Xml(source) => xml_err(source),
            OpenError::SecondRoot(name) => structure_err(format!("second root element <{name}>")),
        };

        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut nodes: Vec<Node> = Vec::new();
        let mut stack: Vec<NodeId> = Vec::new();
        let mut root: Option<NodeId> = None;

        loop {
            match reader.read_event().map_err(xml_err)? {
                Event::Start(e) => {
                    let id = open_element(&mut nodes, &e, &stack, &mut root).map_err(open_err)?;
                    stack.push(id);
                }
                Event::Empty(e) => {
                    open_element(&mut nodes, &e, &stack, &mut root).map_err(open_err)?;
                }
                Event::End(e) => {
                    if stack.pop().is_none() {
                        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                        return Err(structure_err(format!("unmatched closing tag </{name}>")));
                    }
                }
                Event::Text(t) => {
                    let text = t.unescape().map_err(xml_err)?;
                    push_text(&mut nodes, &stack, &text).map_err(structure_err)?;
                }
                Event::CData(c) => {
                    let raw = c.into_inner();
                    let text = String::from_utf8_lossy(&raw);
                    push_text(&mut nodes, &stack, &text).map_err(structure_err)?;
                }
                Event::Eof => break,
                // Declarations, comments, PIs and DOCTYPE carry nothing we audit.
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            let name = nodes[open.0].name.clone();
            return Err(structure_err(format!("unclosed element <{name}>")));
        }
        let root = root.ok_or_else(|| structure_err("no root element".to_string()))?;

        Ok(Self { nodes, root })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    pub fn attribute(&self, id: NodeId, key: &str) -> Option<&str> {
        self.nodes[id.0]
            .attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Leading character data of the element (empty when there is none).
    pub fn text(&self, id: NodeId) -> &str {
        &self.nodes[id.0].text
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Select elements by a relative path from the root, ElementTree style.
    ///
    /// Segments are separated by `/`. `*` matches any element, anything else
    /// matches by tag name. `find_all("move")` returns the root's direct
    /// `<move>` children; `find_all("*/*/*/move")` looks four levels down.
    /// Results come back in document order.
    pub fn find_all(&self, path: &str) -> Vec<NodeId> {
        let mut current = vec![self.root];
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = current
                .iter()
                .flat_map(|id| self.children(*id).iter().copied())
                .filter(|child| segment == "*" || self.name(*child) == segment)
                .collect();
            if current.is_empty() {
                break;
            }
        }
        current
    }

    /// Build the child -> parent index in one traversal from the root.
    pub fn parent_map(&self) -> ParentMap {
        let mut parents = HashMap::with_capacity(self.nodes.len());
        let mut pending = vec![self.root];
        while let Some(parent) = pending.pop() {
            for &child in self.children(parent) {
                parents.insert(child, parent);
                pending.push(child);
            }
        }
        ParentMap { parents }
    }
}

/// Upward index over a [`Document`].
#[derive(Debug, Clone, Default)]
pub struct ParentMap {
    parents: HashMap<NodeId, NodeId>,
}

impl ParentMap {
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(&id).copied()
    }

    /// Walk `hops` levels up. `ancestor(id, 0)` is `id` itself.
    pub fn ancestor(&self, id: NodeId, hops: usize) -> Option<NodeId> {
        (0..hops).try_fold(id, |node, _| self.parent(node))
    }
}

enum OpenError {
    Xml(quick_xml::Error),
    SecondRoot(String),
}

fn open_element(
    nodes: &mut Vec<Node>,
    start: &BytesStart<'_>,
    stack: &[NodeId],
    root: &mut Option<NodeId>,
) -> std::result::Result<NodeId, OpenError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| OpenError::Xml(e.into()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(OpenError::Xml)?.into_owned();
        attributes.push((key, value));
    }

    let id = NodeId(nodes.len());
    match stack.last() {
        Some(parent) => nodes[parent.0].children.push(id),
        None if root.is_some() => return Err(OpenError::SecondRoot(name)),
        None => *root = Some(id),
    }
    nodes.push(Node {
        name,
        attributes,
        text: String::new(),
        children: Vec::new(),
    });
    Ok(id)
}

fn push_text(nodes: &mut [Node], stack: &[NodeId], text: &str) -> std::result::Result<(), String> {
    match stack.last() {
        Some(open) => {
            let node = &mut nodes[open.0];
            // Only the run before the first child counts as the element's text.
            if node.children.is_empty() {
                node.text.push_str(text);
            }
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(format!("text outside the root element: {:?}", text.trim())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POKEDEX: &str = r#"<?xml version="1.0"?>
<!-- trimmed fixture -->
<pokedex>
  <species name="Bulbasaur" id="1">
    <moveset>
      <moves origin="level">
        <move>Tackle</move>
        <move>Growl</move>
      </moves>
      <moves origin="tm">
        <move>Tackle</move>
      </moves>
    </moveset>
  </species>
  <species name="Ivysaur">
    <moveset/>
  </species>
</pokedex>
"#;

    #[test]
    fn parses_elements_attributes_and_text() {
        let doc = Document::parse(POKEDEX).expect("parse");
        let root = doc.root();
        assert_eq!(doc.name(root), "pokedex");
        assert_eq!(doc.children(root).len(), 2);

        let bulbasaur = doc.children(root)[0];
        assert_eq!(doc.attribute(bulbasaur, "name"), Some("Bulbasaur"));
        assert_eq!(doc.attribute(bulbasaur, "id"), Some("1"));
        assert_eq!(doc.attribute(bulbasaur, "missing"), None);
    }

    #[test]
    fn find_all_walks_levels_in_document_order() {
        let doc = Document::parse(POKEDEX).expect("parse");
        let moves = doc.find_all("*/*/*/move");
        let texts: Vec<&str> = moves.iter().map(|id| doc.text(*id)).collect();
        assert_eq!(texts, vec!["Tackle", "Growl", "Tackle"]);

        let species = doc.find_all("species");
        assert_eq!(species.len(), 2);
        assert!(doc.find_all("move").is_empty());
        assert!(doc.find_all("nothing/here").is_empty());
    }

    #[test]
    fn identical_siblings_keep_distinct_ids() {
        let doc = Document::parse(POKEDEX).expect("parse");
        let moves = doc.find_all("*/*/*/move");
        assert_eq!(doc.text(moves[0]), doc.text(moves[2]));
        assert_ne!(moves[0], moves[2]);

        let parents = doc.parent_map();
        assert_ne!(parents.parent(moves[0]), parents.parent(moves[2]));
        assert_eq!(parents.ancestor(moves[0], 3), parents.ancestor(moves[2], 3));
    }

    #[test]
    fn parent_map_covers_every_non_root_node() {
        let doc = Document::parse(POKEDEX).expect("parse");
        let parents = doc.parent_map();
        assert_eq!(parents.parents.len(), doc.nodes.len() - 1);
        assert_eq!(parents.parent(doc.root()), None);

        let first_move = doc.find_all("*/*/*/move")[0];
        assert_eq!(parents.ancestor(first_move, 0), Some(first_move));
        let species = parents.ancestor(first_move, 3).expect("species");
        assert_eq!(doc.name(species), "species");
        assert_eq!(parents.ancestor(first_move, 4), Some(doc.root()));
        assert_eq!(parents.ancestor(first_move, 5), None);
    }

    #[test]
    fn text_is_leading_run_only_and_unescaped() {
        let doc = Document::parse("<a>x &amp; y<b>inner</b>tail<![CDATA[ignored]]></a>")
            .expect("parse");
        assert_eq!(doc.text(doc.root()), "x & y");
        let b = doc.children(doc.root())[0];
        assert_eq!(doc.text(b), "inner");
    }

    #[test]
    fn cdata_counts_as_text() {
        let doc = Document::parse("<move><![CDATA[Double-Edge]]></move>").expect("parse");
        assert_eq!(doc.text(doc.root()), "Double-Edge");
    }

    #[test]
    fn empty_element_has_empty_text() {
        let doc = Document::parse("<moves><move/></moves>").expect("parse");
        let m = doc.children(doc.root())[0];
        assert_eq!(doc.text(m), "");
    }

    #[test]
    fn rejects_mismatched_tags() {
        let err = Document::parse("<a><b></a></b>").expect_err("mismatch");
        assert!(matches!(err, AuditError::Xml { .. }), "{err:?}");
    }

    #[test]
    fn rejects_unclosed_root() {
        let err = Document::parse("<a><b></b>").expect_err("unclosed");
        assert!(err.to_string().contains("malformed XML"), "{err}");
    }

    #[test]
    fn rejects_second_root_and_stray_text() {
        let err = Document::parse("<a/><b/>").expect_err("two roots");
        assert!(err.to_string().contains("second root"), "{err}");

        let err = Document::parse("<a/>junk").expect_err("junk");
        assert!(err.to_string().contains("outside the root"), "{err}");
    }

    #[test]
    fn rejects_empty_input() {
        let err = Document::parse("  \n").expect_err("empty");
        assert!(err.to_string().contains("no root element"), "{err}");
    }

    #[test]
    fn load_reports_missing_file_with_path() {
        let temp = tempfile::TempDir::new().expect("temp dir");
        let path = temp.path().join("species.xml");
        let err = Document::load(&path).expect_err("missing");
        assert!(matches!(err, AuditError::Io { .. }));
        assert!(err.to_string().contains("species.xml"));
    }
}
