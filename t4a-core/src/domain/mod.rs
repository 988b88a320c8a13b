//! Core domain entities
//!
//! Slip records, the field table that describes them, and the currency and
//! summary arithmetic. Pure data and rules, no I/O.

pub mod currency;
pub mod field;
pub mod result;
mod slip;
mod summary;

pub use field::{
    alias_table, field_table, normalize_header, AliasEntry, FieldGroup, FieldKind, FieldRule,
    FieldTable, Requirement, SlipField,
};
pub use slip::{
    AddInfo, Address, OtherInfo, RecipientCorpName, RecipientName, RecipientType, ReportType,
    SlipDraft, T4AAmounts, DEFAULT_RCPNT_BN, DEFAULT_SIN,
};
pub use summary::{SlipSummary, SummaryTotals};
