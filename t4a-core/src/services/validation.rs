//! Slip validation
//!
//! One rule set serves both hand-entered and imported slips. Checking a slip
//! is a pure function of the slip, so a batch is validated by walking it in
//! row order.

use std::collections::BTreeMap;

use crate::domain::{field_table, SlipDraft, SlipField};

/// Outcome of checking one slip
///
/// Both lists are in form order. An empty verdict means the slip is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationVerdict {
    pub required: Vec<SlipField>,
    pub pattern: Vec<SlipField>,
}

impl ValidationVerdict {
    pub fn is_valid(&self) -> bool {
        self.required.is_empty() && self.pattern.is_empty()
    }

    /// Display messages, required errors before pattern errors
    pub fn messages(&self) -> Vec<String> {
        self.required
            .iter()
            .map(|f| format!("Required field: {}", f.title()))
            .chain(
                self.pattern
                    .iter()
                    .map(|f| format!("Pattern error: {}", f.title())),
            )
            .collect()
    }
}

/// Check one slip against the field rules
///
/// Name fields belonging to the other recipient type are skipped. A SIN and
/// recipient BN both left at their defaults are reported as pattern errors.
pub fn validate(slip: &SlipDraft) -> ValidationVerdict {
    let table = field_table();
    let no_identity = slip.has_default_identity();
    let mut verdict = ValidationVerdict::default();

    for &field in SlipField::ALL {
        let rule = field.rule();
        if !rule.applies(slip.recipient_type) {
            continue;
        }
        let Some(value) = field.text(slip) else {
            continue;
        };

        if value.is_empty() {
            if rule.is_required() {
                verdict.required.push(field);
            }
            continue;
        }

        let pattern_ok = table.pattern(field).is_none_or(|re| re.is_match(value));
        let placeholder_identity =
            no_identity && matches!(field, SlipField::Sin | SlipField::RecipientBn);
        if !pattern_ok || placeholder_identity {
            verdict.pattern.push(field);
        }
    }

    verdict
}

/// Validate every slip, keyed by row index; valid rows are absent
pub fn validate_batch(slips: &[SlipDraft]) -> BTreeMap<usize, Vec<String>> {
    let mut errors = BTreeMap::new();
    for (index, slip) in slips.iter().enumerate() {
        let verdict = validate(slip);
        if !verdict.is_valid() {
            errors.insert(index, verdict.messages());
        }
    }
    errors
}
