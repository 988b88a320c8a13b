//! Totals command - T4A Summary totals for a slip collection

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use super::load_slips;
use crate::output;
use t4a_core::SlipSummary;

pub fn run(file: &Path, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("Slip collection not found: {}", file.display());
    }
    let slips = load_slips(file)?;
    let summary = SlipSummary::from_slips(&slips)
        .with_context(|| format!("Cannot total {}", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let t = &summary.total_amounts;
    let rows = [
        ("016", "Pension or superannuation", &t.tot_pens_spran_amt),
        ("018", "Lump-sum payments", &t.tot_lsp_amt),
        ("020", "Self-employed commissions", &t.tot_self_cmsn_amt),
        ("022", "Income tax deducted", &t.tot_itx_dedn_amt),
        ("024", "Annuities", &t.tot_annty_incamt),
        ("028", "Other income", &t.totr_incamt),
        ("030", "Patronage allocations", &t.tot_ptrng_aloc_amt),
        ("032", "Pension plan contributions (past service)", &t.tot_past_srvc_amt),
        ("034", "Pension adjustment", &t.tot_padj_amt),
        ("040", "RESP accumulated income payments", &t.tot_resp_aip_amt),
        ("042", "RESP educational assistance payments", &t.tot_resp_amt),
        ("048", "Fees for services", &t.rpt_tot_fee_srvc_amt),
        ("-", "Other information", &t.rpt_tot_oth_info_amt),
    ];

    println!("{}", "T4A Summary".bold());
    println!("  Slips: {}", summary.slp_cnt);
    println!();

    let mut table = output::create_table();
    table.set_header(vec!["Box", "Description", "Total"]);
    for (code, label, amount) in rows {
        let amount = if amount.is_empty() { "-".to_string() } else { amount.to_string() };
        table.add_row(vec![code.to_string(), label.to_string(), amount]);
    }
    println!("{}", table);

    Ok(())
}
