use crate::ingestion::{InputRow, RowSchema};
use crate::places::PlaceCandidate;

/// Ordered priority table: brand names first, then lingerie terms, then
/// generic clothing/fashion terms. Matching is case-insensitive substring
/// matching, not whole-word; "fashion" inside a longer word still counts.
/// That is the long-standing behavior and stays until requirements change.
const PRIORITY_KEYWORDS: &[(&str, &str)] = &[
    ("triumph", "TRIUMPH"),
    ("sloggi", "SLOGGI"),
    ("lingerie", "Lingerie"),
    ("dessous", "Lingerie"),
    ("unterwäsche", "Lingerie"),
    ("wäsche", "Lingerie"),
    ("bielizna", "Lingerie"),
    ("underwear", "Lingerie"),
    ("intimates", "Lingerie"),
    ("intimo", "Lingerie"),
    ("lencería", "Lingerie"),
    ("lenceria", "Lingerie"),
    ("corset", "Lingerie"),
    ("miederwaren", "Lingerie"),
    ("bodywear", "Lingerie"),
    ("damen", "Clothing"),
    ("mode", "Clothing"),
    ("fashion", "Clothing"),
    ("clothing", "Clothing"),
    ("bekleidung", "Clothing"),
    ("kleidung", "Clothing"),
    ("boutique", "Clothing"),
    ("textil", "Clothing"),
    ("odzież", "Clothing"),
    ("moda", "Clothing"),
    ("apparel", "Clothing"),
    ("konfektion", "Clothing"),
    ("abbigliamento", "Clothing"),
    ("vêtements", "Clothing"),
    ("kleding", "Clothing"),
];

#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Found {
        label: String,
        name: String,
        location: String,
    },
    NotFound,
}

/// Decides whether a store of interest exists for this row.
///
/// Two passes, both walking the priority table in order and stopping on the
/// first hit. The input-field pass checks the row's own name hints and always
/// outranks the place-candidate pass, whatever the keyword tier. In the
/// candidate pass, priority order dominates candidate order: every candidate
/// is checked against keyword N before any candidate sees keyword N+1.
pub fn match_store(
    row: &InputRow,
    schema: &RowSchema,
    candidates: &[PlaceCandidate],
) -> MatchOutcome {
    for (keyword, label) in PRIORITY_KEYWORDS {
        for hint in schema.name_hints.iter().copied() {
            let value = row.field(&[hint]);
            if value.to_lowercase().contains(keyword) {
                return MatchOutcome::Found {
                    label: (*label).to_string(),
                    name: value,
                    location: String::new(),
                };
            }
        }
    }

    for (keyword, label) in PRIORITY_KEYWORDS {
        for candidate in candidates {
            if candidate_haystack(candidate).contains(keyword) {
                return MatchOutcome::Found {
                    label: (*label).to_string(),
                    name: candidate.name.clone(),
                    location: candidate.vicinity.clone(),
                };
            }
        }
    }

    MatchOutcome::NotFound
}

fn candidate_haystack(candidate: &PlaceCandidate) -> String {
    format!(
        "{} {} {}",
        candidate.name,
        candidate.vicinity,
        candidate.types.join(" ")
    )
    .to_lowercase()
}
