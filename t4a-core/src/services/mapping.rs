//! Column matching and resolution
//!
//! Matches raw CSV headers against the field table aliases. Matching is
//! greedy: fields are visited in table order and each takes the first
//! remaining header that matches, so an earlier field wins an alias it
//! shares with a later one.

use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{normalize_header, SlipField};

/// First header (in list order) whose normalized text equals one of `aliases`
pub fn find_match<'a, S: AsRef<str>>(headers: &'a [S], aliases: &[&str]) -> Option<&'a str> {
    headers.iter().map(|h| h.as_ref()).find(|header| {
        let normalized = normalize_header(header);
        aliases
            .iter()
            .any(|alias| normalize_header(alias) == normalized)
    })
}

/// One distinct header and where it maps
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedColumn {
    pub header: String,
    /// Column read for this header (first occurrence when the text repeats)
    pub index: usize,
    pub field: Option<SlipField>,
}

/// Header to field mapping, in column order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    columns: Vec<MappedColumn>,
}

impl ColumnMapping {
    /// Every header unmapped, duplicates collapsed to their first column
    pub fn unmapped<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut columns: Vec<MappedColumn> = Vec::new();
        for (index, header) in headers.iter().enumerate() {
            let header = header.as_ref();
            if columns.iter().any(|c| c.header == header) {
                continue;
            }
            columns.push(MappedColumn {
                header: header.to_string(),
                index,
                field: None,
            });
        }
        Self { columns }
    }

    pub fn columns(&self) -> &[MappedColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Mapping for a header; None if the header is not in the file
    pub fn get(&self, header: &str) -> Option<Option<SlipField>> {
        self.columns
            .iter()
            .find(|c| c.header == header)
            .map(|c| c.field)
    }

    /// Point a header at a field, or clear it with None
    pub fn set(&mut self, header: &str, field: Option<SlipField>) -> Result<()> {
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.header == header)
            .ok_or_else(|| Error::UnknownColumn(header.to_string()))?;
        column.field = field;
        Ok(())
    }

    pub fn mapped(&self) -> impl Iterator<Item = &MappedColumn> {
        self.columns.iter().filter(|c| c.field.is_some())
    }

    pub fn unmatched(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.field.is_none())
            .map(|c| c.header.as_str())
    }

    /// Mapped fields in column order, each listed once
    pub fn active_fields(&self) -> Vec<SlipField> {
        let mut fields = Vec::new();
        for field in self.columns.iter().filter_map(|c| c.field) {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
        fields
    }
}

/// Map every header to a field or to nothing
///
/// Fields are tried in precedence order; a header claimed by one field is no
/// longer offered to the ones after it. Headers nobody claims stay unmapped.
pub fn resolve<S: AsRef<str>>(headers: &[S]) -> ColumnMapping {
    let mut mapping = ColumnMapping::unmapped(headers);
    let mut remaining: Vec<String> = mapping.columns.iter().map(|c| c.header.clone()).collect();

    for field in SlipField::importable() {
        let Some(header) = find_match(&remaining, field.aliases()).map(str::to_string) else {
            continue;
        };
        if let Some(column) = mapping.columns.iter_mut().find(|c| c.header == header) {
            column.field = Some(field);
        }
        remaining.retain(|h| *h != header);
    }

    mapping
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_match_is_first_in_list_order() {
        let headers = ["Social Insurance Number", "SIN"];
        assert_eq!(
            find_match(&headers, SlipField::Sin.aliases()),
            Some("Social Insurance Number")
        );
    }

    #[test]
    fn test_find_match_ignores_case_and_punctuation() {
        let headers = ["Notes", "RCPNT_BN:"];
        assert_eq!(
            find_match(&headers, SlipField::RecipientBn.aliases()),
            Some("RCPNT_BN:")
        );
        assert_eq!(find_match(&headers, SlipField::Sin.aliases()), None);
    }

    #[test]
    fn test_resolve_covers_every_header() {
        let headers = ["Last Name", "First Name", "SIN", "Mystery", "Box 016", "Notes"];
        let mapping = resolve(&headers);

        assert_eq!(mapping.len(), headers.len());
        assert_eq!(mapping.mapped().count() + mapping.unmatched().count(), headers.len());
        assert_eq!(mapping.get("Last Name"), Some(Some(SlipField::Surname)));
        assert_eq!(mapping.get("Box 016"), Some(Some(SlipField::PensionSuperannuation)));
        assert_eq!(mapping.get("Mystery"), Some(None));
        assert_eq!(mapping.get("Absent"), None);
    }

    #[test]
    fn test_earlier_field_claims_shared_alias() {
        let headers = ["Notes", "Annuity"];
        let mapping = resolve(&headers);
        assert_eq!(mapping.get("Annuity"), Some(Some(SlipField::Annuities)));
    }

    #[test]
    fn test_each_field_claims_one_header() {
        let headers = ["SIN", "Social Insurance Number"];
        let mapping = resolve(&headers);
        assert_eq!(mapping.get("SIN"), Some(Some(SlipField::Sin)));
        assert_eq!(mapping.get("Social Insurance Number"), Some(None));
    }

    #[test]
    fn test_duplicate_headers_collapse() {
        let headers = ["City", "SIN", "City"];
        let mapping = resolve(&headers);
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.columns()[0].index, 0);
    }

    #[test]
    fn test_active_fields_in_column_order() {
        let headers = ["City", "Surname", "Whatever"];
        let mapping = resolve(&headers);
        assert_eq!(
            mapping.active_fields(),
            vec![SlipField::City, SlipField::Surname]
        );
    }

    #[test]
    fn test_set_unknown_column() {
        let mut mapping = resolve(&["City"]);
        assert!(matches!(
            mapping.set("Town", Some(SlipField::City)),
            Err(Error::UnknownColumn(_))
        ));
        mapping.set("City", None).unwrap();
        assert_eq!(mapping.get("City"), Some(None));
    }
}
