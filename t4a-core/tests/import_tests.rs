//! Integration tests for t4a-core import flow
//!
//! These tests drive real CSV files on disk through the import session,
//! settings profiles and the event log.
//!
//! Run with: cargo test --test import_tests -- --nocapture

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use t4a_core::adapters::CsvFileSource;
use t4a_core::config::{Config, ImportProfile};
use t4a_core::domain::{alias_table, AliasEntry, RecipientType, SlipDraft, SlipField, SlipSummary};
use t4a_core::services::{
    resolve, validate, validate_batch, ImportOutcome, ImportPhase, ImportService, ImportSession,
    LogEvent, LoggingService,
};
use t4a_core::{Error, T4aContext};

const PAYER_BN: &str = "123456789RP0001";

// ============================================================================
// Test Helpers
// ============================================================================

/// Write a CSV file into the temp dir and return its path
fn write_csv(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write CSV");
    path
}

fn open(path: &Path) -> ImportSession {
    ImportSession::open(&CsvFileSource::new(), path, PAYER_BN).expect("Failed to open session")
}

// ============================================================================
// Column Resolution
// ============================================================================

#[test]
fn test_first_matching_header_wins() {
    let mapping = resolve(&["Social Insurance Number", "SIN"]);
    assert_eq!(mapping.get("Social Insurance Number"), Some(Some(SlipField::Sin)));
    assert_eq!(mapping.get("SIN"), Some(None));
}

#[test]
fn test_shared_alias_goes_to_amounts_regardless_of_position() {
    for headers in [vec!["Annuity", "Surname"], vec!["Surname", "Notes", "Annuity"]] {
        let mapping = resolve(&headers);
        assert_eq!(mapping.get("Annuity"), Some(Some(SlipField::Annuities)));
    }
    assert!(SlipField::AldaPurchase.aliases().contains(&"annuity"));
}

#[test]
fn test_resolve_partitions_headers() {
    let headers = [
        "Recipient Type",
        "Surname",
        "Given Name",
        "Corporation Name",
        "SIN",
        "Recipient BN",
        "Address Line 1",
        "City",
        "Province",
        "Postal Code",
        "Box 016",
        "Code 028",
        "Favourite Colour",
    ];
    let mapping = resolve(&headers);

    assert_eq!(mapping.len(), headers.len());
    let matched = mapping.mapped().count();
    let unmatched = mapping.unmatched().count();
    assert_eq!(matched + unmatched, headers.len());
    assert_eq!(unmatched, 1);
    assert_eq!(mapping.get("Code 028"), Some(Some(SlipField::OtherIncome)));
}

#[test]
fn test_alias_table_view() {
    let table = alias_table();
    let (_, address) = table
        .iter()
        .find(|(key, _)| *key == "recipientAddress")
        .expect("address group");
    match address {
        AliasEntry::Grouped(members) => {
            let names: Vec<_> = members.iter().map(|(m, _)| *m).collect();
            assert_eq!(
                names,
                vec!["addr_l1_txt", "addr_l2_txt", "cty_nm", "prov_cd", "cntry_cd", "pstl_cd"]
            );
        }
        AliasEntry::Flat(_) => panic!("address should be grouped"),
    }
}

// ============================================================================
// Slip Building
// ============================================================================

#[test]
fn test_build_normalizes_by_kind() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "slips.csv",
        "Surname,SIN,Box 016,Box 018,Province\n\
         Tremblay,123-456 789,\"1,234.56\",500,QC\n",
    );

    let session = open(&path);
    let slip = &session.slips()[0];
    assert_eq!(slip.sin, "123456789");
    assert_eq!(slip.amounts.pens_spran_amt, "1234.56");
    assert_eq!(slip.amounts.lsp_amt, "500");
    assert_eq!(slip.recipient_address.prov_cd, "QC");
    assert_eq!(slip.bn, PAYER_BN);
}

#[test]
fn test_empty_sin_cell_keeps_default() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "slips.csv", "Surname,SIN\nTremblay,\n");

    let session = open(&path);
    assert_eq!(session.slips()[0].sin, "000000000");
}

#[test]
fn test_imported_slip_matches_hand_entered_shape() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "slips.csv", "Surname,Given Name\nRoy,Anne\n");

    let session = open(&path);
    let mut expected = SlipDraft::default();
    expected.recipient_name.snm = "Roy".to_string();
    expected.recipient_name.gvn_nm = "Anne".to_string();
    expected.bn = PAYER_BN.to_string();
    assert_eq!(session.slips()[0], expected);
}

#[test]
fn test_corporation_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "corps.csv",
        "Type,Company Name,Business Number,Fees\ncorp,Maple Widgets Inc,987654321RT0001,2500.00\n",
    );

    let mut session = open(&path);
    let slip = &session.slips()[0];
    assert_eq!(slip.recipient_type, RecipientType::Corporation);
    assert_eq!(slip.recipient_corp_name.l1_nm, "Maple Widgets Inc");
    assert_eq!(slip.rcpnt_bn, "987654321RT0001");
    assert_eq!(slip.amounts.fee_or_oth_srvc_amt, "2500.00");
    assert!(validate(slip).is_valid());

    let mut target = Vec::new();
    session.proceed().unwrap();
    assert_eq!(session.commit(&mut target).unwrap(), ImportOutcome::Committed(1));
}

// ============================================================================
// Validation and Commit Gate
// ============================================================================

#[test]
fn test_one_bad_row_blocks_whole_batch() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "slips.csv",
        "Surname,SIN\nRoy,123456789\n,234567890\nCôté,345678901\n",
    );

    let mut session = open(&path);
    session.proceed().unwrap();

    let mut existing = vec![SlipDraft::default()];
    let outcome = session.commit(&mut existing).unwrap();

    let mut expected = BTreeMap::new();
    expected.insert(1, vec!["Required field: Surname".to_string()]);
    assert_eq!(outcome, ImportOutcome::Rejected(expected));
    assert_eq!(existing.len(), 1);
    assert_eq!(session.phase(), ImportPhase::Confirm);
}

#[test]
fn test_default_identity_reports_both_fields() {
    let mut slip = SlipDraft::default();
    slip.recipient_name.snm = "Roy".to_string();
    slip.bn = PAYER_BN.to_string();

    let errors = validate_batch(&[slip]);
    assert_eq!(
        errors[&0],
        vec!["Pattern error: SIN", "Pattern error: Recipient Business Number"]
    );
}

#[test]
fn test_missing_payer_bn_is_required_error() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "slips.csv", "Surname,SIN\nRoy,123456789\n");

    let session = ImportSession::open(&CsvFileSource::new(), &path, "").unwrap();
    let errors = session.validate();
    assert_eq!(
        errors[&0],
        vec!["Required field: Payer's Account Number (BN)"]
    );
}

#[test]
fn test_empty_file_is_malformed() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "empty.csv", "");

    let err = ImportSession::open(&CsvFileSource::new(), &path, PAYER_BN).unwrap_err();
    assert!(matches!(err, Error::MalformedFile(_)));
}

#[test]
fn test_cancel_after_rejection_leaves_collection_untouched() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "slips.csv", "Surname,SIN
Roy,123456789
,234567890
");

    let mut kept = SlipDraft::default();
    kept.recipient_name.snm = "Gagnon".to_string();
    kept.sin = "456789012".to_string();
    let mut collection = vec![kept];
    let before = serde_json::to_string(&collection).unwrap();

    let mut session = open(&path);
    session.proceed().unwrap();
    let outcome = session.commit(&mut collection).unwrap();
    assert!(matches!(outcome, ImportOutcome::Rejected(_)));

    session.edit_slip(1).unwrap().recipient_name.snm = "Côté".to_string();
    session.cancel();

    assert_eq!(serde_json::to_string(&collection).unwrap(), before);
}

#[test]
fn test_commit_after_fix_appends_behind_existing() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "slips.csv", "Surname,SIN
Roy,123456789
,234567890
");

    let mut collection = vec![SlipDraft::default()];
    let mut session = open(&path);
    session.proceed().unwrap();
    assert!(matches!(
        session.commit(&mut collection).unwrap(),
        ImportOutcome::Rejected(_)
    ));

    session.edit_slip(1).unwrap().recipient_name.snm = "Côté".to_string();
    assert_eq!(session.commit(&mut collection).unwrap(), ImportOutcome::Committed(2));
    assert_eq!(collection.len(), 3);
    assert_eq!(collection[0], SlipDraft::default());
    assert_eq!(collection[2].recipient_name.snm, "Côté");
}

// ============================================================================
// Profiles and Settings
// ============================================================================

#[test]
fn test_profile_round_trip_through_settings() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "payroll.csv", "Emp Last,Emp SIN\nRoy,123456789\n");
    let service = ImportService::new(dir.path().to_path_buf());

    let mut session = service.open(&csv, PAYER_BN).unwrap();
    assert_eq!(session.mapping().mapped().count(), 0);
    session.set_mapping("Emp Last", Some(SlipField::Surname)).unwrap();
    session.set_mapping("Emp SIN", Some(SlipField::Sin)).unwrap();
    service
        .save_profile("payroll", &session, Some("HR export".to_string()))
        .unwrap();

    let profile = service.get_profile("payroll").unwrap().expect("saved profile");
    let mut fresh = service.open(&csv, PAYER_BN).unwrap();
    fresh.apply_profile(&profile).unwrap();
    assert_eq!(fresh.slips()[0].recipient_name.snm, "Roy");
    assert_eq!(fresh.slips()[0].sin, "123456789");

    assert_eq!(service.list_profiles().unwrap().len(), 1);
}

#[test]
fn test_profile_with_unknown_path_is_rejected() {
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir, "slips.csv", "Surname,Amount\nRoy,12\n");

    let mut session = open(&csv);
    let before = session.mapping().clone();

    let mut column_mappings = BTreeMap::new();
    column_mappings.insert("Amount".to_string(), "amounts.bonus_amt".to_string());
    let profile = ImportProfile {
        column_mappings,
        description: None,
    };

    assert!(matches!(
        session.apply_profile(&profile),
        Err(Error::UnknownField(_))
    ));
    assert_eq!(session.mapping(), &before);
}

#[test]
fn test_context_reads_payer_bn_from_settings() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.payer_bn = Some(PAYER_BN.to_string());
    config.save(dir.path()).unwrap();

    let context = T4aContext::new(dir.path()).unwrap();
    if std::env::var("T4A_PAYER_BN").is_err() {
        assert_eq!(context.payer_bn(None), PAYER_BN);
    }
    assert_eq!(context.payer_bn(Some("999999999RC0001")), "999999999RC0001");
}

// ============================================================================
// Summary Totals
// ============================================================================

#[test]
fn test_summary_after_import() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        &dir,
        "slips.csv",
        "Surname,SIN,Box 016,Code 028,Code 104,Code 034\n\
         Roy,123456789,100,7,3.25,40\n\
         Côté,234567890,0.50,,1.00,\n",
    );

    let mut session = open(&path);
    session.proceed().unwrap();
    let mut slips = Vec::new();
    assert_eq!(session.commit(&mut slips).unwrap(), ImportOutcome::Committed(2));

    let summary = SlipSummary::from_slips(&slips).unwrap();
    assert_eq!(summary.slp_cnt, 2);
    assert_eq!(summary.total_amounts.tot_pens_spran_amt, "100.50");
    assert_eq!(summary.total_amounts.totr_incamt, "7.00");
    assert_eq!(summary.total_amounts.tot_padj_amt, "40.00");
    assert_eq!(summary.total_amounts.rpt_tot_oth_info_amt, "4.25");
}

// ============================================================================
// Event Log
// ============================================================================

#[test]
fn test_import_events_carry_counts_only() {
    let dir = TempDir::new().unwrap();
    let logging = LoggingService::new(dir.path(), "test").unwrap();

    logging
        .log(LogEvent::new("import_rejected").with_command("import").with_rows(3))
        .unwrap();

    let entries = logging.get_recent(5).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].row_count, Some(3));
    assert!(entries[0].error_message.is_none());
}
