//! T4A Summary totals derived from a slip collection

use serde::{Deserialize, Serialize};

use super::currency::add_amounts;
use super::field::{FieldGroup, SlipField};
use super::result::Result;
use super::slip::SlipDraft;

/// Totals reported on the T4A Summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTotals {
    /// Box 016
    pub tot_pens_spran_amt: String,
    /// Box 018
    pub tot_lsp_amt: String,
    /// Box 020
    pub tot_self_cmsn_amt: String,
    /// Code 030
    pub tot_ptrng_aloc_amt: String,
    /// Code 032
    pub tot_past_srvc_amt: String,
    /// Box 024
    pub tot_annty_incamt: String,
    /// Code 028
    pub totr_incamt: String,
    /// Box 022
    pub tot_itx_dedn_amt: String,
    /// Code 034
    pub tot_padj_amt: String,
    /// Code 040
    pub tot_resp_aip_amt: String,
    /// Code 042
    pub tot_resp_amt: String,
    /// Box 048
    pub rpt_tot_fee_srvc_amt: String,
    /// Every other information code not reported in its own box above
    pub rpt_tot_oth_info_amt: String,
}

/// Slip count plus totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlipSummary {
    pub slp_cnt: usize,
    #[serde(rename = "totalAmounts")]
    pub total_amounts: SummaryTotals,
}

/// Other information codes that have their own summary box
const SEPARATELY_REPORTED: [&str; 6] = [
    "rpp_past_srvc_amt",
    "oth_incamt",
    "ptrng_aloc_amt",
    "padj_amt",
    "resp_aip_amt",
    "resp_educt_ast_amt",
];

fn accumulate(total: &mut String, amount: &str) -> Result<()> {
    *total = add_amounts(amount, total)?;
    Ok(())
}

impl SlipSummary {
    /// Sum every slip into the summary boxes
    ///
    /// Fails with a currency error if any slip holds an amount the summary
    /// cannot represent (more than two decimals, stray characters).
    pub fn from_slips(slips: &[SlipDraft]) -> Result<Self> {
        let mut t = SummaryTotals::default();

        for slip in slips {
            let amounts = &slip.amounts;
            let other = &slip.other_info;

            accumulate(&mut t.tot_pens_spran_amt, &amounts.pens_spran_amt)?;
            accumulate(&mut t.tot_lsp_amt, &amounts.lsp_amt)?;
            accumulate(&mut t.tot_self_cmsn_amt, &amounts.self_empl_cmsn_amt)?;
            accumulate(&mut t.tot_ptrng_aloc_amt, &other.ptrng_aloc_amt)?;
            accumulate(&mut t.tot_past_srvc_amt, &other.rpp_past_srvc_amt)?;
            accumulate(&mut t.tot_annty_incamt, &amounts.annty_amt)?;
            accumulate(&mut t.totr_incamt, &other.oth_incamt)?;
            accumulate(&mut t.tot_itx_dedn_amt, &amounts.itx_ddct_amt)?;
            accumulate(&mut t.tot_padj_amt, &other.padj_amt)?;
            accumulate(&mut t.tot_resp_aip_amt, &other.resp_aip_amt)?;
            accumulate(&mut t.tot_resp_amt, &other.resp_educt_ast_amt)?;
            accumulate(&mut t.rpt_tot_fee_srvc_amt, &amounts.fee_or_oth_srvc_amt)?;

            let remaining = SlipField::ALL.iter().filter(|f| {
                f.group() == Some(FieldGroup::OtherInfo) && !SEPARATELY_REPORTED.contains(&f.member())
            });
            for field in remaining {
                accumulate(&mut t.rpt_tot_oth_info_amt, field.text(slip).unwrap_or(""))?;
            }
        }

        Ok(Self {
            slp_cnt: slips.len(),
            total_amounts: t,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection() {
        let summary = SlipSummary::from_slips(&[]).unwrap();
        assert_eq!(summary.slp_cnt, 0);
        assert_eq!(summary.total_amounts, SummaryTotals::default());
    }

    #[test]
    fn test_totals() {
        let mut a = SlipDraft::default();
        a.amounts.pens_spran_amt = "100".to_string();
        a.amounts.fee_or_oth_srvc_amt = "10.5".to_string();
        a.other_info.oth_incamt = "7".to_string();
        a.other_info.rsch_grnt_amt = "3.25".to_string();

        let mut b = SlipDraft::default();
        b.amounts.pens_spran_amt = "0.50".to_string();
        b.other_info.padj_amt = "40".to_string();
        b.other_info.brsy_amt = "1".to_string();

        let summary = SlipSummary::from_slips(&[a, b]).unwrap();
        let t = &summary.total_amounts;
        assert_eq!(summary.slp_cnt, 2);
        assert_eq!(t.tot_pens_spran_amt, "100.50");
        assert_eq!(t.rpt_tot_fee_srvc_amt, "10.50");
        assert_eq!(t.totr_incamt, "7.00");
        assert_eq!(t.tot_padj_amt, "40.00");
        assert_eq!(t.rpt_tot_oth_info_amt, "4.25");
        assert_eq!(t.tot_lsp_amt, "");
    }

    #[test]
    fn test_bad_amount_fails() {
        let mut slip = SlipDraft::default();
        slip.amounts.lsp_amt = "1.999".to_string();
        assert!(SlipSummary::from_slips(&[slip]).is_err());
    }
}
