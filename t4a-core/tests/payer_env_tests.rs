//! Payer BN environment override tests
//!
//! These mutate `T4A_PAYER_BN`, so they live in their own test binary and
//! run as a single test to keep the variable out of every other test.

use std::path::PathBuf;

use tempfile::TempDir;

use t4a_core::config::{Config, PAYER_BN_ENV};
use t4a_core::services::ImportService;
use t4a_core::{SlipField, T4aContext};

const SETTINGS_BN: &str = "123456789RP0001";
const ENV_BN: &str = "999999999RT0001";

fn write_csv(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("payroll.csv");
    std::fs::write(&path, "Emp Last,SIN\nRoy,123456789\n").expect("Failed to write CSV");
    path
}

#[test]
fn test_env_override_is_never_persisted() {
    // No payer in settings: saving a profile under the override writes no BN
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir);
    let service = ImportService::new(dir.path().to_path_buf());

    std::env::set_var(PAYER_BN_ENV, ENV_BN);

    let context = T4aContext::new(dir.path()).unwrap();
    assert_eq!(context.payer_bn(None), ENV_BN);
    assert_eq!(context.config.payer_bn, None);

    let mut session = service.open(&csv, &context.payer_bn(None)).unwrap();
    assert_eq!(session.slips()[0].bn, ENV_BN);
    session.set_mapping("Emp Last", Some(SlipField::Surname)).unwrap();
    service.save_profile("payroll", &session, None).unwrap();

    std::env::remove_var(PAYER_BN_ENV);

    assert_eq!(Config::load(dir.path()).unwrap().payer_bn, None);
    let content = std::fs::read_to_string(dir.path().join("settings.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(json["payer"].get("bn").is_none());

    // Payer in settings: the override wins at use but the file keeps its own value
    let dir = TempDir::new().unwrap();
    let csv = write_csv(&dir);
    let mut config = Config::default();
    config.payer_bn = Some(SETTINGS_BN.to_string());
    config.save(dir.path()).unwrap();

    std::env::set_var(PAYER_BN_ENV, ENV_BN);

    let service = ImportService::new(dir.path().to_path_buf());
    let session = service.open(&csv, ENV_BN).unwrap();
    service.save_profile("payroll", &session, None).unwrap();
    let context = T4aContext::new(dir.path()).unwrap();
    assert_eq!(context.payer_bn(None), ENV_BN);
    assert_eq!(context.payer_bn(Some("111111111RC0001")), "111111111RC0001");

    std::env::remove_var(PAYER_BN_ENV);

    assert_eq!(
        Config::load(dir.path()).unwrap().payer_bn.as_deref(),
        Some(SETTINGS_BN)
    );
    assert_eq!(T4aContext::new(dir.path()).unwrap().payer_bn(None), SETTINGS_BN);
}
