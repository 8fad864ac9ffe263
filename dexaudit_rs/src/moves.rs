//! Move-name validator.
//!
//! Checks every move a species lists in `species.xml` against the names
//! declared in `moves.xml`. Useful for finding capitalization errors and
//! misspellings before the server rejects a species at load time.
//!
//! Expected shapes:
//!
//! ```xml
//! <moves><move name="Tackle">...</move></moves>
//!
//! <pokedex>
//!   <species name="Bulbasaur">
//!     <moveset><moves origin="level"><move>Tackle</move></moves></moveset>
//!   </species>
//! </pokedex>
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::{AuditError, Result};
use crate::xml_tree::{Document, NodeId, ParentMap};

/// Path (relative to the root) of move references in the species document.
pub const SPECIES_MOVE_PATH: &str = "*/*/*/move";

/// Hops from a `<move>` reference up to the element that names its owner.
pub const OWNER_HOPS: usize = 3;

/// Names of every move the moves document declares.
#[derive(Debug, Clone, Default)]
pub struct MoveSet {
    names: HashSet<String>,
}

impl MoveSet {
    pub fn load(path: &Path) -> Result<Self> {
        let doc = Document::load(path)?;
        let set = Self::from_document(&doc)?;
        debug!("loaded {} move names from {}", set.len(), path.display());
        Ok(set)
    }

    /// Collect the `name` attribute of each top-level `<move>`.
    pub fn from_document(doc: &Document) -> Result<Self> {
        let names = doc
            .find_all("move")
            .into_iter()
            .map(|id| required_attribute(doc, id, "name").map(str::to_string))
            .collect::<Result<HashSet<_>>>()?;
        Ok(Self { names })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }
}

impl<S: Into<String>> FromIterator<S> for MoveSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// A species move reference that matches no declared move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    /// `name` attribute of the owning species.
    pub owner: String,
    /// Move text exactly as written in the species document. An empty
    /// `<move/>` gives `""` rather than a `None` placeholder.
    #[serde(rename = "move")]
    pub text: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.owner, self.text)
    }
}

/// Lazily yield one [`Mismatch`] per unknown move reference, in document
/// order. A reference whose owner cannot be resolved yields an error; callers
/// treat it as fatal.
pub fn find_mismatches<'a>(
    species: &'a Document,
    moves: &'a MoveSet,
) -> impl Iterator<Item = Result<Mismatch>> + 'a {
    let parents = species.parent_map();
    species
        .find_all(SPECIES_MOVE_PATH)
        .into_iter()
        .filter(move |id| !moves.contains(species.text(*id)))
        .map(move |id| resolve_mismatch(species, &parents, id))
}

fn resolve_mismatch(doc: &Document, parents: &ParentMap, id: NodeId) -> Result<Mismatch> {
    let owner = parents
        .ancestor(id, OWNER_HOPS)
        .ok_or_else(|| AuditError::MissingAncestor {
            element: doc.name(id).to_string(),
            hops: OWNER_HOPS,
        })?;
    Ok(Mismatch {
        owner: required_attribute(doc, owner, "name")?.to_string(),
        text: doc.text(id).to_string(),
    })
}

fn required_attribute<'d>(doc: &'d Document, id: NodeId, attribute: &str) -> Result<&'d str> {
    doc.attribute(id, attribute)
        .ok_or_else(|| AuditError::MissingAttribute {
            element: doc.name(id).to_string(),
            attribute: attribute.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVES: &str = r#"<moves>
  <move name="Tackle"><type>Normal</type></move>
  <move name="Growl"/>
  <move name="Vine Whip"/>
  <group><move name="Nested"/></group>
</moves>"#;

    fn species(body: &str) -> Document {
        Document::parse(&format!("<pokedex>{body}</pokedex>")).expect("species parse")
    }

    fn mismatches(species: &Document, moves: &MoveSet) -> Vec<String> {
        find_mismatches(species, moves)
            .map(|m| m.expect("mismatch").to_string())
            .collect()
    }

    #[test]
    fn move_set_reads_top_level_names_only() {
        let doc = Document::parse(MOVES).expect("moves parse");
        let set = MoveSet::from_document(&doc).expect("move set");
        assert_eq!(set.len(), 3);
        assert!(set.contains("Tackle"));
        assert!(set.contains("Vine Whip"));
        assert!(!set.contains("Nested"));
        assert!(!set.contains("tackle"));
    }

    #[test]
    fn move_without_name_is_fatal() {
        let doc = Document::parse(r#"<moves><move>Tackle</move></moves>"#).expect("parse");
        let err = MoveSet::from_document(&doc).expect_err("missing name");
        assert!(matches!(err, AuditError::MissingAttribute { .. }), "{err:?}");
    }

    #[test]
    fn reports_misspelled_move_with_species_name() {
        let set: MoveSet = ["Tackle"].into_iter().collect();
        let doc = species(
            r#"<species name="Bulbasaur"><moveset><moves origin="level">
                <move>Tackl</move><move>Tackle</move>
            </moves></moveset></species>"#,
        );
        assert_eq!(mismatches(&doc, &set), vec!["Bulbasaur: Tackl"]);
    }

    #[test]
    fn output_follows_document_order_and_keeps_duplicates() {
        let set: MoveSet = ["Growl"].into_iter().collect();
        let doc = species(
            r#"<species name="Oddish"><moveset>
                 <moves origin="level"><move>Absorb</move><move>Growl</move></moves>
                 <moves origin="egg"><move>Absorb</move></moves>
               </moveset></species>
               <species name="Abra"><moveset>
                 <moves origin="level"><move>teleport</move></moves>
               </moveset></species>"#,
        );
        assert_eq!(
            mismatches(&doc, &set),
            vec!["Oddish: Absorb", "Oddish: Absorb", "Abra: teleport"]
        );
    }

    #[test]
    fn known_moves_never_reported() {
        let set: MoveSet = ["Tackle", "Growl", "Vine Whip"].into_iter().collect();
        let doc = species(
            r#"<species name="Bulbasaur"><moveset><moves>
                 <move>Tackle</move><move>Growl</move><move>Vine Whip</move>
               </moves></moveset></species>"#,
        );
        assert!(mismatches(&doc, &set).is_empty());
    }

    #[test]
    fn move_text_is_compared_verbatim() {
        let set: MoveSet = ["Tackle"].into_iter().collect();
        let doc = species(
            r#"<species name="Rattata"><moveset><moves>
                 <move> Tackle</move><move/>
               </moves></moveset></species>"#,
        );
        assert_eq!(mismatches(&doc, &set), vec!["Rattata:  Tackle", "Rattata: "]);
    }

    #[test]
    fn moves_at_other_depths_are_ignored() {
        let set = MoveSet::default();
        let doc = species(
            r#"<move>Root level</move><species name="X"><move>Shallow</move></species>"#,
        );
        assert!(mismatches(&doc, &set).is_empty());
    }

    #[test]
    fn owner_without_name_is_fatal() {
        let set = MoveSet::default();
        let doc = species(
            r#"<species><moveset><moves><move>Tackle</move></moves></moveset></species>"#,
        );
        let results: Vec<_> = find_mismatches(&doc, &set).collect();
        assert_eq!(results.len(), 1);
        let err = results.into_iter().next().expect("one").expect_err("no name");
        assert!(err.to_string().contains("`name`"), "{err}");
    }

    #[test]
    fn reruns_are_identical() {
        let set: MoveSet = ["Tackle"].into_iter().collect();
        let doc = species(
            r#"<species name="Pidgey"><moveset><moves><move>Gust</move><move>Tackle</move></moves></moveset></species>"#,
        );
        assert_eq!(mismatches(&doc, &set), mismatches(&doc, &set));
    }

    #[test]
    fn json_uses_move_key() {
        let m = Mismatch {
            owner: "Bulbasaur".into(),
            text: "Tackl".into(),
        };
        let json = serde_json::to_value(&m).expect("json");
        assert_eq!(json["owner"], "Bulbasaur");
        assert_eq!(json["move"], "Tackl");
    }
}
