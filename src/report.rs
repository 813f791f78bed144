//! Entity report: per-entity frequency table of mention surface strings.
//!
//! For every entity that is referred to by at least one mention, the
//! report lists the entity id, its label, and (for groups) its member
//! ids, followed by one indented row per distinct mention string with its
//! occurrence count. Entities, member ids, and mention strings are each
//! emitted in sorted order so the report is deterministic.

use crate::mention::{Entity, Mention};
use anyhow::{bail, ensure, Result};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Renders the tab-separated entity report.
///
/// Mention offsets are codepoint indices into `document_text`; a mention
/// span that does not fit the text is a contract violation and fails the
/// whole report.
pub fn entity_report(
    entities: &[Entity],
    mentions: &[Mention],
    document_text: &str,
) -> Result<String> {
    let references = collect_references(mentions, document_text)?;

    let mut sorted: Vec<&Entity> = entities.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    let mut out = String::new();
    for entity in sorted {
        let Some(mention_texts) = references.get(entity.id.as_str()) else {
            continue;
        };
        out.push_str(&entity.id);
        out.push('\t');
        out.push_str(&entity.label);
        if let Some(members) = &entity.members {
            out.push('\t');
            let mut first = true;
            for member in members {
                if first {
                    first = false;
                } else {
                    out.push(' ');
                }
                out.push_str(member);
            }
        }
        out.push('\n');
        for (text, count) in mention_texts {
            writeln!(out, "\t{text}\t{count}")?;
        }
    }
    Ok(out)
}

/// Groups mention surface strings by entity id and counts duplicates.
fn collect_references<'a>(
    mentions: &'a [Mention],
    document_text: &str,
) -> Result<BTreeMap<&'a str, BTreeMap<String, u64>>> {
    let mut references: BTreeMap<&str, BTreeMap<String, u64>> = BTreeMap::new();
    for mention in mentions {
        let text = mention_text(mention, document_text)?;
        let count = references
            .entry(mention.entity_id.as_str())
            .or_default()
            .entry(text)
            .or_insert(0);
        match count.checked_add(1) {
            Some(incremented) => *count = incremented,
            None => bail!(
                "mention count overflow for entity {}",
                mention.entity_id
            ),
        }
    }
    Ok(references)
}

fn mention_text(mention: &Mention, document_text: &str) -> Result<String> {
    ensure!(
        mention.begin <= mention.end,
        "mention of entity {} has begin {} after end {}",
        mention.entity_id,
        mention.begin,
        mention.end
    );
    let text: String = document_text
        .chars()
        .skip(mention.begin)
        .take(mention.end - mention.begin)
        .collect();
    ensure!(
        text.chars().count() == mention.end - mention.begin,
        "mention of entity {} from {} to {} lies outside the document text",
        mention.entity_id,
        mention.begin,
        mention.end
    );
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn entity(id: &str, label: &str) -> Entity {
        Entity {
            id: id.to_string(),
            label: label.to_string(),
            members: None,
        }
    }

    #[test]
    fn counts_repeated_mention_strings() {
        let text = "Anna met Anna and Bea.";
        let mentions = vec![
            Mention::new(0, 4, "1"),
            Mention::new(9, 13, "1"),
            Mention::new(18, 21, "2"),
        ];
        let entities = vec![entity("1", "PER"), entity("2", "PER")];
        let report = entity_report(&entities, &mentions, text).unwrap();
        assert_eq!(
            report,
            "1\tPER\n\tAnna\t2\n2\tPER\n\tBea\t1\n"
        );
    }

    #[test]
    fn entities_without_mentions_are_omitted() {
        let mentions = vec![Mention::new(0, 3, "b")];
        let entities = vec![entity("a", "LOC"), entity("b", "PER")];
        let report = entity_report(&entities, &mentions, "Ada").unwrap();
        assert!(!report.contains("LOC"));
        assert!(report.starts_with("b\tPER\n"));
    }

    #[test]
    fn entities_are_sorted_by_id_and_members_joined_sorted() {
        let text = "x y";
        let mentions = vec![Mention::new(0, 1, "z9"), Mention::new(2, 3, "a1")];
        let group_members: BTreeSet<String> =
            ["n2".to_string(), "n1".to_string()].into_iter().collect();
        let entities = vec![
            entity("z9", "PER"),
            Entity {
                id: "a1".to_string(),
                label: "GROUP".to_string(),
                members: Some(group_members),
            },
        ];
        let report = entity_report(&entities, &mentions, text).unwrap();
        assert_eq!(
            report,
            "a1\tGROUP\tn1 n2\n\ty\t1\nz9\tPER\n\tx\t1\n"
        );
    }

    #[test]
    fn mention_outside_the_text_is_a_contract_violation() {
        let mentions = vec![Mention::new(2, 9, "1")];
        let entities = vec![entity("1", "PER")];
        assert!(entity_report(&entities, &mentions, "abc").is_err());
    }

    #[test]
    fn unicode_mention_strings_slice_by_codepoint() {
        let text = "\u{4E16}\u{754C} gr\u{FC}\u{DF}t";
        let mentions = vec![Mention::new(0, 2, "w")];
        let entities = vec![entity("w", "MISC")];
        let report = entity_report(&entities, &mentions, text).unwrap();
        assert_eq!(report, "w\tMISC\n\t\u{4E16}\u{754C}\t1\n");
    }
}
