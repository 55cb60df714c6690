//! Member list loading.
//!
//! The member list arrives as a JSON array of objects, one per spreadsheet
//! row. Keys may be the snake_case field names, their camelCase spelling,
//! or the spreadsheet's own column headers:
//!
//! | Field | Also accepted |
//! |---|---|
//! | `name` | `Nome` |
//! | `tax_id` | `taxId`, `CPF` |
//! | `role` | `Funcao` |
//! | `birth_date` | `birthDate`, `DataNascimento` |
//! | `congregation` | `Congregacao` |
//! | `baptism_date` | `baptismDate`, `DataBatismo` |
//! | `valid_until` | `validUntil`, `Validade` |
//! | `photo_ref` | `photoRef`, `Foto` |
//!
//! Unknown columns are ignored. Strings are trimmed and blank cells become
//! absent. Numbers are kept as numbers for the date and tax ID columns, and
//! rendered as text for the rest. A row without a name is rejected.

use crate::types::{CellValue, MemberRecord};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum MembersError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("member list is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("member #{index} has no name")]
    MissingName { index: usize },
}

#[derive(Deserialize)]
struct RawMember {
    #[serde(default, alias = "Nome")]
    name: Option<CellValue>,
    #[serde(default, alias = "taxId", alias = "CPF")]
    tax_id: Option<CellValue>,
    #[serde(default, alias = "Funcao")]
    role: Option<CellValue>,
    #[serde(default, alias = "birthDate", alias = "DataNascimento")]
    birth_date: Option<CellValue>,
    #[serde(default, alias = "Congregacao")]
    congregation: Option<CellValue>,
    #[serde(default, alias = "baptismDate", alias = "DataBatismo")]
    baptism_date: Option<CellValue>,
    #[serde(default, alias = "validUntil", alias = "Validade")]
    valid_until: Option<CellValue>,
    #[serde(default, alias = "photoRef", alias = "Foto")]
    photo_ref: Option<CellValue>,
}

/// Read and normalize the member list at `path`.
pub fn load_members(path: &Path) -> Result<Vec<MemberRecord>, MembersError> {
    let content = std::fs::read_to_string(path)?;
    let members = parse_members(&content)?;
    debug!(path = %path.display(), count = members.len(), "loaded members");
    Ok(members)
}

/// Parse and normalize a JSON member list.
pub fn parse_members(json: &str) -> Result<Vec<MemberRecord>, MembersError> {
    let raw: Vec<RawMember> = serde_json::from_str(json)?;
    raw.into_iter()
        .enumerate()
        .map(|(index, row)| normalize(index, row))
        .collect()
}

fn normalize(index: usize, row: RawMember) -> Result<MemberRecord, MembersError> {
    let name = text(row.name).ok_or(MembersError::MissingName { index })?;
    Ok(MemberRecord {
        name,
        tax_id: cell(row.tax_id),
        role: text(row.role),
        birth_date: cell(row.birth_date),
        congregation: text(row.congregation),
        baptism_date: cell(row.baptism_date),
        valid_until: cell(row.valid_until),
        photo_ref: text(row.photo_ref),
    })
}

/// Trimmed text, numbers kept as-is, blanks dropped.
fn cell(value: Option<CellValue>) -> Option<CellValue> {
    match value? {
        CellValue::Text(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| CellValue::Text(s.to_string()))
        }
        n @ CellValue::Number(_) => Some(n),
    }
}

/// A text column. Numeric cells are printed as a spreadsheet would show them.
fn text(value: Option<CellValue>) -> Option<String> {
    match cell(value)? {
        CellValue::Text(s) => Some(s),
        CellValue::Number(n) => Some(n.to_string()),
    }
}
