//! Structural checks run on a finished [`PackageTree`] before it is zipped.

use super::relationships::{owner_of_rels, resolve_target};
use super::{ContentTypes, PackageTree, Part, CONTENT_TYPES_PATH};
use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::{HashMap, HashSet};

/// Attributes that carry relationship IDs in the parts we emit.
const REFERENCE_ATTRIBUTES: [&[u8]; 3] = [b"r:embed", b"r:id", b"r:link"];

pub(super) fn verify_tree(tree: &PackageTree, content_types: &ContentTypes) -> Result<()> {
    for part in tree.parts() {
        if part.path != CONTENT_TYPES_PATH && content_types.lookup(&part.path).is_none() {
            return Err(Error::MissingContentType(part.path.clone()));
        }
    }

    // owner part -> declared relationship IDs
    let mut declared: HashMap<String, HashSet<String>> = HashMap::new();

    for part in tree.parts().iter().filter(|p| p.is_relationships()) {
        let owner = owner_of_rels(&part.path)
            .ok_or_else(|| Error::Xml(format!("Misplaced relationship part: {}", part.path)))?;
        if !owner.is_empty() && !tree.contains(&owner) {
            return Err(Error::DanglingRelationship {
                owner: owner.clone(),
                id: String::new(),
                target: part.path.clone(),
            });
        }

        let mut ids = HashSet::new();
        for rel in read_relationships(part)? {
            if !ids.insert(rel.id.clone()) {
                return Err(Error::Xml(format!(
                    "Duplicate relationship ID {} in {}",
                    rel.id, part.path
                )));
            }
            if rel.external {
                continue;
            }
            let target = resolve_target(&owner, &rel.target);
            if !tree.contains(&target) {
                return Err(Error::DanglingRelationship {
                    owner,
                    id: rel.id,
                    target,
                });
            }
        }
        declared.insert(owner, ids);
    }

    for part in tree.parts() {
        if part.is_relationships() || part.path == CONTENT_TYPES_PATH || !is_xml(&part.path) {
            continue;
        }
        let ids = declared.get(&part.path);
        for id in referenced_ids(part)? {
            if !ids.is_some_and(|ids| ids.contains(&id)) {
                return Err(Error::DanglingRelationship {
                    owner: part.path.clone(),
                    id,
                    target: String::new(),
                });
            }
        }
    }

    log::trace!("Package verified: {} parts", tree.len());
    Ok(())
}

struct RelEntry {
    id: String,
    target: String,
    external: bool,
}

fn read_relationships(part: &Part) -> Result<Vec<RelEntry>> {
    let mut reader = Reader::from_reader(part.data.as_slice());
    reader.trim_text(true);

    let mut entries = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    entries.push(RelEntry {
                        id: get_attribute(e, b"Id").unwrap_or_default(),
                        target: get_attribute(e, b"Target").unwrap_or_default(),
                        external: get_attribute(e, b"TargetMode").as_deref() == Some("External"),
                    });
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!("Failed to parse {}: {}", part.path, e)));
            },
            _ => {},
        }
        buf.clear();
    }

    Ok(entries)
}

fn referenced_ids(part: &Part) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(part.data.as_slice());
    reader.trim_text(true);

    let mut ids = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                for attr in e.attributes().flatten() {
                    if REFERENCE_ATTRIBUTES.contains(&attr.key.as_ref()) {
                        ids.push(String::from_utf8_lossy(&attr.value).into_owned());
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Xml(format!("Failed to parse {}: {}", part.path, e)));
            },
            _ => {},
        }
        buf.clear();
    }

    Ok(ids)
}

fn get_attribute(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == name)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

fn is_xml(path: &str) -> bool {
    path.ends_with(".xml")
}
