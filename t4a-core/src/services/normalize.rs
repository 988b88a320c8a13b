//! Slip building from raw CSV rows
//!
//! Cell text is cleaned according to the field's kind before it is stored.
//! A cell that is blank, or that cleans down to nothing, leaves the slip's
//! default in place.

use std::sync::LazyLock;

use regex::Regex;

use super::mapping::ColumnMapping;
use crate::domain::{FieldKind, RecipientType, SlipDraft, SlipField};

/// Trailing decimal separator followed by exactly two digits
static CENTS_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.,][0-9]{2}$").expect("valid regex"));

/// Strip hyphens and whitespace from a SIN
pub fn normalize_sin(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect()
}

/// Reduce a money cell to digits with an optional two-digit cents part
///
/// Every non-digit is dropped. When the cell, ignoring any trailing currency
/// symbol or code, ends in `.dd` or `,dd` the last two digits become cents,
/// otherwise the digits are whole dollars. So `"1,234.56"` and `"1 234,56 $"`
/// give `"1234.56"`, `"1.234"` gives `"1234"` and `",50"` gives `"0.50"`.
/// Signs are dropped along with every other non-digit.
pub fn normalize_currency(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return digits;
    }

    let number = raw
        .trim()
        .trim_end_matches(|c: char| !c.is_ascii_digit() && c != '.' && c != ',');
    if CENTS_SUFFIX.is_match(number) && digits.len() >= 2 {
        let (whole, cents) = digits.split_at(digits.len() - 2);
        let whole = if whole.is_empty() { "0" } else { whole };
        format!("{}.{}", whole, cents)
    } else {
        digits
    }
}

fn apply_cell(slip: &mut SlipDraft, field: SlipField, cell: &str) {
    match field.kind() {
        FieldKind::RecipientType => {
            if let Some(recipient_type) = RecipientType::parse(cell) {
                slip.recipient_type = recipient_type;
            }
        }
        kind => {
            let value = match kind {
                FieldKind::Sin => normalize_sin(cell),
                FieldKind::Currency => normalize_currency(cell),
                _ => cell.to_string(),
            };
            if value.is_empty() {
                return;
            }
            if let Some(slot) = field.text_mut(slip) {
                *slot = value;
            }
        }
    }
}

/// Build one slip per data row (header row not included in `rows`)
///
/// Only columns mapped to a field in `active_fields` are read. Rows shorter
/// than the header read their missing cells as blank. When two columns map to
/// the same field the later non-blank cell wins.
pub fn build<S: AsRef<str>>(
    rows: &[Vec<S>],
    mapping: &ColumnMapping,
    active_fields: &[SlipField],
) -> Vec<SlipDraft> {
    let columns: Vec<(usize, SlipField)> = mapping
        .mapped()
        .filter_map(|c| c.field.map(|f| (c.index, f)))
        .filter(|(_, f)| active_fields.contains(f))
        .collect();

    rows.iter()
        .map(|row| {
            let mut slip = SlipDraft::default();
            for &(index, field) in &columns {
                let cell = row.get(index).map(|c| c.as_ref()).unwrap_or("");
                if cell.trim().is_empty() {
                    continue;
                }
                apply_cell(&mut slip, field, cell);
            }
            slip
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mapping::resolve;

    fn build_rows(headers: &[&str], rows: &[Vec<&str>]) -> Vec<SlipDraft> {
        let mapping = resolve(headers);
        build(rows, &mapping, &mapping.active_fields())
    }

    #[test]
    fn test_sin_normalization() {
        assert_eq!(normalize_sin("123-456 789"), "123456789");
        assert_eq!(normalize_sin(" 123\t456-789 "), "123456789");
    }

    #[test]
    fn test_currency_normalization() {
        assert_eq!(normalize_currency("1,234.56"), "1234.56");
        assert_eq!(normalize_currency("500"), "500");
        assert_eq!(normalize_currency("$ 1 234,56"), "1234.56");
        assert_eq!(normalize_currency("1.234"), "1234");
        assert_eq!(normalize_currency(",50"), "0.50");
        assert_eq!(normalize_currency("-12.00"), "12.00");
        assert_eq!(normalize_currency("N/A"), "");
    }

    #[test]
    fn test_currency_with_trailing_symbol() {
        assert_eq!(normalize_currency("1 234,56 $"), "1234.56");
        assert_eq!(normalize_currency("$1,234.56 CAD"), "1234.56");
        assert_eq!(normalize_currency("500 $"), "500");
        assert_eq!(normalize_currency("12.50$"), "12.50");
    }

    #[test]
    fn test_build_french_formatted_amount() {
        let slips = build_rows(&["Box 018"], &[vec!["1 234,56 $"]]);
        assert_eq!(slips[0].amounts.lsp_amt, "1234.56");
    }

    #[test]
    fn test_build_fills_mapped_fields() {
        let slips = build_rows(
            &["Surname", "SIN", "Box 016", "City", "Type"],
            &[vec!["Tremblay", "123-456 789", "1,234.56", "Québec", "Corporation"]],
        );

        assert_eq!(slips.len(), 1);
        let slip = &slips[0];
        assert_eq!(slip.recipient_name.snm, "Tremblay");
        assert_eq!(slip.sin, "123456789");
        assert_eq!(slip.amounts.pens_spran_amt, "1234.56");
        assert_eq!(slip.recipient_address.cty_nm, "Québec");
        assert_eq!(slip.recipient_type, RecipientType::Corporation);
    }

    #[test]
    fn test_blank_cells_keep_defaults() {
        let slips = build_rows(
            &["SIN", "Box 018", "Type"],
            &[vec!["", "N/A", "partnership"]],
        );
        let slip = &slips[0];
        assert_eq!(slip.sin, "000000000");
        assert_eq!(slip.amounts.lsp_amt, "");
        assert_eq!(slip.recipient_type, RecipientType::Individual);
    }

    #[test]
    fn test_short_rows_read_as_blank() {
        let slips = build_rows(&["Surname", "SIN", "City"], &[vec!["Roy"]]);
        assert_eq!(slips[0].recipient_name.snm, "Roy");
        assert_eq!(slips[0].sin, "000000000");
        assert_eq!(slips[0].recipient_address.cty_nm, "");
    }

    #[test]
    fn test_inactive_fields_ignored() {
        let mapping = resolve(&["Surname", "City"]);
        let slips = build(&[vec!["Roy", "Laval"]], &mapping, &[SlipField::Surname]);
        assert_eq!(slips[0].recipient_name.snm, "Roy");
        assert_eq!(slips[0].recipient_address.cty_nm, "");
    }

    #[test]
    fn test_whitespace_only_text_keeps_default() {
        let slips = build_rows(&["City", "Surname"], &[vec!["   ", "\t"]]);
        assert_eq!(slips[0], SlipDraft::default());
    }

    #[test]
    fn test_text_copied_verbatim() {
        let slips = build_rows(&["Address Line 1"], &[vec![" 12  Rue Principale "]]);
        assert_eq!(slips[0].recipient_address.addr_l1_txt, " 12  Rue Principale ");
    }

    #[test]
    fn test_unmapped_build_is_default() {
        let slips = build_rows(&["Nothing"], &[vec!["x"], vec!["y"]]);
        assert_eq!(slips, vec![SlipDraft::default(), SlipDraft::default()]);
    }
}
