//! CSV table handling for bibliometric export data

use std::fs::File;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use thiserror::Error;

use crate::data::authors::{AuthorRecord, AuthorTable};
use crate::data::decode::{decode_authorships, AuthorshipCells};
use crate::data::works::{coerce_year, WorkRecord};

const COL_YEAR: &str = "publication_year";
const COL_AUTHOR_IDS: &str = "authorships.author.id";
const COL_DISPLAY_NAMES: &str = "authorships.author.display_name";
const COL_ORCIDS: &str = "authorships.author.orcid";
const COL_COUNTRIES: &str = "authorships.countries";
const COL_RAW_NAMES: &str = "authorships.raw_author_name";
const COL_INSTITUTIONS: &str = "authorships.institutions";

/// Errors from reading or writing the works/authors tables
#[derive(Debug, Error)]
pub enum TableError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to process table: {0}")]
    Table(#[from] PolarsError),

    #[error("author table is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Read a CSV export with every column kept as a string
fn read_frame(path: &Path) -> Result<DataFrame, TableError> {
    if !path.exists() {
        return Err(TableError::NotFound(path.to_path_buf()));
    }

    log::info!("Reading CSV file: {}", path.display());
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect()?;

    log::info!("Loaded {} rows from {}", df.height(), path.display());
    Ok(df)
}

fn optional_str_column<'a>(df: &'a DataFrame, name: &str) -> Option<&'a StringChunked> {
    df.column(name).ok().and_then(|column| column.str().ok())
}

fn cell<'a>(column: Option<&'a StringChunked>, row: usize) -> Option<&'a str> {
    column.and_then(|values| values.get(row))
}

fn optional_field(column: Option<&StringChunked>, row: usize) -> Option<String> {
    cell(column, row)
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != "None")
        .map(str::to_string)
}

/// Load a works table, decoding every row's authorship cells once up front
pub fn load_works(path: &Path) -> Result<Vec<WorkRecord>, TableError> {
    let df = read_frame(path)?;
    Ok(works_from_frame(&df))
}

/// Decode a works frame into records with coerced years and aligned authors
pub fn works_from_frame(df: &DataFrame) -> Vec<WorkRecord> {
    let years = optional_str_column(df, COL_YEAR);
    let ids = optional_str_column(df, COL_AUTHOR_IDS);
    let display_names = optional_str_column(df, COL_DISPLAY_NAMES);
    let orcids = optional_str_column(df, COL_ORCIDS);
    let countries = optional_str_column(df, COL_COUNTRIES);
    let raw_names = optional_str_column(df, COL_RAW_NAMES);
    let institutions = optional_str_column(df, COL_INSTITUTIONS);

    let mut works = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let authors = decode_authorships(AuthorshipCells {
            ids: cell(ids, row),
            display_names: cell(display_names, row),
            orcids: cell(orcids, row),
            countries: cell(countries, row),
            raw_author_names: cell(raw_names, row),
            institutions: cell(institutions, row),
        });
        works.push(WorkRecord {
            publication_year: coerce_year(cell(years, row)),
            authors,
        });
    }

    works
}

/// Load a resolved author table; rows without a valid identifier are skipped
pub fn load_authors(path: &Path) -> Result<AuthorTable, TableError> {
    let df = read_frame(path)?;

    let ids = df
        .column("id")
        .map_err(|_| TableError::MissingColumn("id"))?
        .str()?;
    let display_names = optional_str_column(&df, "display_name");
    let orcids = optional_str_column(&df, "orcid");
    let countries = optional_str_column(&df, "country");
    let raw_names = optional_str_column(&df, "raw_author_name");
    let institution_ids = optional_str_column(&df, "institution_id");
    let institution_names = optional_str_column(&df, "institution_display_name");
    let institution_countries = optional_str_column(&df, "institution_country_code");

    let mut records = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let Some(id) = ids
            .get(row)
            .map(str::trim)
            .filter(|value| !value.is_empty() && *value != "None")
        else {
            continue;
        };

        records.push(AuthorRecord {
            id: id.to_string(),
            display_name: optional_field(display_names, row),
            orcid: optional_field(orcids, row),
            country: optional_field(countries, row),
            raw_author_name: optional_field(raw_names, row),
            institution_id: optional_field(institution_ids, row),
            institution_display_name: optional_field(institution_names, row),
            institution_country_code: optional_field(institution_countries, row),
        });
    }

    Ok(AuthorTable::from_records(records))
}

/// Persist a resolved author table as CSV
pub fn save_authors(table: &AuthorTable, path: &Path) -> Result<(), TableError> {
    let column =
        |field: fn(&AuthorRecord) -> Option<String>| -> Vec<Option<String>> {
            table.iter().map(field).collect()
        };

    let mut df = df!(
        "id" => table.iter().map(|record| record.id.clone()).collect::<Vec<_>>(),
        "display_name" => column(|record| record.display_name.clone()),
        "orcid" => column(|record| record.orcid.clone()),
        "country" => column(|record| record.country.clone()),
        "raw_author_name" => column(|record| record.raw_author_name.clone()),
        "institution_id" => column(|record| record.institution_id.clone()),
        "institution_display_name" => column(|record| record.institution_display_name.clone()),
        "institution_country_code" => column(|record| record.institution_country_code.clone()),
    )?;

    CsvWriter::new(File::create(path)?)
        .include_header(true)
        .finish(&mut df)?;

    log::info!("Saved {} author records to {}", table.len(), path.display());
    Ok(())
}
