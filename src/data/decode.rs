//! Decoding of pipe-delimited multi-valued cells
//!
//! Bibliometric exports pack one value per listed author into a single cell,
//! `|`-separated, with the same position across several parallel columns
//! referring to the same author-on-this-work. Everything position-aligned is
//! resolved here, once, into structured per-position records so the rest of
//! the pipeline never touches raw multi-valued strings.

use serde::{Deserialize, Serialize};

/// Institution identity embedded as a dict-like literal inside a cell
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionDescriptor {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub country_code: Option<String>,
}

/// One author position on one work, after alignment and validity filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorSlot {
    /// Author identifier, guaranteed non-empty and not the literal "None"
    pub id: String,
    pub display_name: Option<String>,
    pub orcid: Option<String>,
    pub country: Option<String>,
    pub raw_author_name: Option<String>,
    pub institution: Option<InstitutionDescriptor>,
}

/// Split a multi-valued cell on `|`; a missing cell yields an empty sequence
pub fn split_multi_valued(cell: Option<&str>) -> Vec<&str> {
    match cell {
        Some(s) => s.split('|').collect(),
        None => Vec::new(),
    }
}

/// A field value counts as present only when non-empty and not "None"
fn valid_value(value: Option<&&str>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && *v != "None")
        .map(str::to_string)
}

/// Parse an embedded institution descriptor.
///
/// Descriptors arrive as dict-like record literals, single- or double-quoted,
/// occasionally containing en/em dashes. Parsing failures are logged and
/// reported as `None`; the enclosing author record proceeds without
/// institution fields.
pub fn parse_institution_descriptor(raw: &str) -> Option<InstitutionDescriptor> {
    let normalized = raw.trim().replace(['\u{2013}', '\u{2014}'], "-");
    if normalized.is_empty() {
        return None;
    }

    match serde_json::from_str::<InstitutionDescriptor>(&normalized) {
        Ok(descriptor) => Some(descriptor),
        Err(_) => {
            // Single-quoted literals become JSON after quote substitution.
            // Descriptors whose values contain apostrophes are corrupted by
            // the substitution and are dropped like any other malformed input.
            let requoted = normalized.replace('\'', "\"");
            match serde_json::from_str::<InstitutionDescriptor>(&requoted) {
                Ok(descriptor) => Some(descriptor),
                Err(err) => {
                    log::debug!("dropping unparseable institution descriptor '{raw}': {err}");
                    None
                }
            }
        }
    }
}

/// Raw multi-valued cells of one work row, prior to decoding
#[derive(Debug, Default, Clone, Copy)]
pub struct AuthorshipCells<'a> {
    pub ids: Option<&'a str>,
    pub display_names: Option<&'a str>,
    pub orcids: Option<&'a str>,
    pub countries: Option<&'a str>,
    pub raw_author_names: Option<&'a str>,
    pub institutions: Option<&'a str>,
}

/// Decode the parallel authorship cells of one work into aligned slots.
///
/// The authoritative position count is the maximum length across the present
/// fields; a position without a valid identifier is skipped entirely and
/// contributes neither an author nor an edge endpoint downstream.
pub fn decode_authorships(cells: AuthorshipCells<'_>) -> Vec<AuthorSlot> {
    let ids = split_multi_valued(cells.ids);
    let display_names = split_multi_valued(cells.display_names);
    let orcids = split_multi_valued(cells.orcids);
    let countries = split_multi_valued(cells.countries);
    let raw_names = split_multi_valued(cells.raw_author_names);
    let institutions = split_multi_valued(cells.institutions);

    let positions = [
        ids.len(),
        display_names.len(),
        orcids.len(),
        countries.len(),
        raw_names.len(),
        institutions.len(),
    ]
    .into_iter()
    .max()
    .unwrap_or(0);

    let mut slots = Vec::new();
    for i in 0..positions {
        let Some(id) = valid_value(ids.get(i)) else {
            continue;
        };

        let institution = valid_value(institutions.get(i))
            .and_then(|raw| parse_institution_descriptor(&raw));

        slots.push(AuthorSlot {
            id,
            display_name: valid_value(display_names.get(i)),
            orcid: valid_value(orcids.get(i)),
            country: valid_value(countries.get(i)),
            raw_author_name: valid_value(raw_names.get(i)),
            institution,
        });
    }

    slots
}
