//! T4A slip domain model
//!
//! Field names follow the CRA T4A XML element names. Group structs serialize
//! with the same member names, and the slip itself uses the record keys the
//! submission files have always used (`recipientName`, `otherInfo`, ...).

use serde::{Deserialize, Serialize};

/// Value `sin` holds until a real SIN is supplied
pub const DEFAULT_SIN: &str = "000000000";

/// Value `rcpnt_bn` holds until a real business number is supplied
pub const DEFAULT_RCPNT_BN: &str = "000000000RT0000";

/// Whether the slip is issued to a person or a corporation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    #[default]
    Individual,
    Corporation,
}

impl RecipientType {
    /// Parse a spreadsheet cell. Returns None for anything unrecognized.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "individual" | "ind" | "i" | "person" => Some(Self::Individual),
            "corporation" | "corp" | "c" | "business" | "company" => Some(Self::Corporation),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Corporation => "corporation",
        }
    }
}

/// Report type code (`rpt_tcd`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportType {
    /// Original
    #[default]
    #[serde(rename = "O")]
    Original,
    #[serde(rename = "A")]
    Amendment,
    #[serde(rename = "C")]
    Cancel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientName {
    pub snm: String,
    pub gvn_nm: String,
    pub init: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientCorpName {
    pub l1_nm: String,
    pub l2_nm: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub addr_l1_txt: String,
    pub addr_l2_txt: String,
    pub cty_nm: String,
    pub prov_cd: String,
    pub cntry_cd: String,
    pub pstl_cd: String,
}

/// Boxes 016 to 048 printed on the face of the slip
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct T4AAmounts {
    pub pens_spran_amt: String,
    pub lsp_amt: String,
    pub self_empl_cmsn_amt: String,
    pub itx_ddct_amt: String,
    pub annty_amt: String,
    pub fee_or_oth_srvc_amt: String,
}

/// "Other information" boxes, one member per CRA code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherInfo {
    pub elg_rtir_amt: String,
    pub nelg_rtir_amt: String,
    pub oth_incamt: String,
    pub ptrng_aloc_amt: String,
    pub rpp_past_srvc_amt: String,
    pub padj_amt: String,
    pub alda_amt: String,
    pub resp_aip_amt: String,
    pub resp_educt_ast_amt: String,
    pub chrty_dons_amt: String,
    pub nr_lsp_trnsf_amt: String,
    pub rsch_grnt_amt: String,
    pub brsy_amt: String,
    pub dth_ben_amt: String,
    pub wag_ls_incamt: String,
    pub lsp_rpp_nelg_amt: String,
    pub nrgst_ppln_amt: String,
    pub pr_71_acr_lsp_amt: String,
    pub inc_avg_annty_amt: String,
    pub dpsp_ins_pay_amt: String,
    pub med_trvl_amt: String,
    pub loan_ben_amt: String,
    pub med_prem_ben_amt: String,
    pub grp_trm_life_amt: String,
    pub resp_aip_oth_amt: String,
    pub ins_rvk_dpsp_amt: String,
    pub brd_wrk_site_amt: String,
    pub dsblt_ben_amt: String,
    pub cntrbr_prr_pspp_cnamt: String,
    pub vtrn_ben_amt: String,
    pub vtrn_ben_pens_splt_elg_amt: String,
    pub tx_dfr_ptrng_dvamt: String,
    pub atp_inctv_grnt_amt: String,
    pub rdsp_amt: String,
    pub wag_ptct_pgm_amt: String,
    pub var_pens_ben_amt: String,
    pub tfsa_tax_amt: String,
    pub rcpnt_pay_prem_phsp_amt: String,
    pub pmmc_isg_amt: String,
    pub indn_oth_incamt: String,
    pub indn_xmpt_pens_amt: String,
    pub indn_xmpt_lsp_amt: String,
    pub lbr_adj_ben_aprpt_act_amt: String,
    pub subp_qlf_amt: String,
    pub csh_awrd_pze_payr_amt: String,
    pub bkcy_sttl_amt: String,
    pub lsp_nelg_trnsf_amt: String,
    pub ncntrbr_prr_pspp_cnamt: String,
    pub lsp_dpsp_nelg_amt: String,
    pub lsp_nrgst_pens_amt: String,
    pub prpp_tx_inc_pamt: String,
    pub prpp_txmpt_inc_pamt: String,
    pub abe_tuit_ast_amt: String,
    pub prov_trty_emrg_ben_amt: String,
    pub repmt_covid_fncl_asstnc: String,
    pub oas_lump_sum_pamt: String,
    pub pst_dctrl_fshp_amt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddInfo {
    pub spp_sps_cntrb_ind: String,
    pub spp_sps_cntrbr_sin: String,
}

/// A single T4A recipient record
///
/// `SlipDraft::default()` is the untouched shape used by both manual entry
/// and CSV import, so slips built either way are indistinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlipDraft {
    #[serde(rename = "recipientType")]
    pub recipient_type: RecipientType,
    #[serde(rename = "recipientName")]
    pub recipient_name: RecipientName,
    #[serde(rename = "recipientCorpName")]
    pub recipient_corp_name: RecipientCorpName,
    pub sin: String,
    pub rcpnt_bn: String,
    #[serde(rename = "recipientAddress")]
    pub recipient_address: Address,
    pub rcpnt_nbr: String,
    /// Payer's account number, copied from the summary
    pub bn: String,
    pub payr_dntl_ben_rpt_cd: String,
    pub ppln_dpsp_rgst_nbr: String,
    pub rpt_tcd: ReportType,
    pub amounts: T4AAmounts,
    #[serde(rename = "otherInfo")]
    pub other_info: OtherInfo,
    #[serde(rename = "addInfo", default)]
    pub add_info: AddInfo,
}

impl Default for SlipDraft {
    fn default() -> Self {
        Self {
            recipient_type: RecipientType::Individual,
            recipient_name: RecipientName::default(),
            recipient_corp_name: RecipientCorpName::default(),
            sin: DEFAULT_SIN.to_string(),
            rcpnt_bn: DEFAULT_RCPNT_BN.to_string(),
            recipient_address: Address::default(),
            rcpnt_nbr: String::new(),
            bn: String::new(),
            payr_dntl_ben_rpt_cd: String::new(),
            ppln_dpsp_rgst_nbr: String::new(),
            rpt_tcd: ReportType::Original,
            amounts: T4AAmounts::default(),
            other_info: OtherInfo::default(),
            add_info: AddInfo::default(),
        }
    }
}

impl SlipDraft {
    /// Label shown in slip lists: "Surname, Given" or the corporation's first line
    pub fn display_name(&self) -> String {
        match self.recipient_type {
            RecipientType::Individual => format!(
                "{}, {}",
                self.recipient_name.snm, self.recipient_name.gvn_nm
            ),
            RecipientType::Corporation => self.recipient_corp_name.l1_nm.clone(),
        }
    }

    /// True while neither SIN nor recipient BN has been supplied
    pub fn has_default_identity(&self) -> bool {
        self.sin == DEFAULT_SIN && self.rcpnt_bn == DEFAULT_RCPNT_BN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shape() {
        let slip = SlipDraft::default();
        assert_eq!(slip.recipient_type, RecipientType::Individual);
        assert_eq!(slip.rpt_tcd, ReportType::Original);
        assert_eq!(slip.sin, "000000000");
        assert_eq!(slip.rcpnt_bn, "000000000RT0000");
        assert!(slip.amounts.annty_amt.is_empty());
        assert!(slip.has_default_identity());
    }

    #[test]
    fn test_serializes_with_record_keys() {
        let json = serde_json::to_value(SlipDraft::default()).unwrap();
        assert_eq!(json["recipientType"], "individual");
        assert_eq!(json["rpt_tcd"], "O");
        assert!(json["recipientName"]["snm"].is_string());
        assert!(json["otherInfo"]["alda_amt"].is_string());
    }

    #[test]
    fn test_recipient_type_parse() {
        assert_eq!(RecipientType::parse(" Corporation "), Some(RecipientType::Corporation));
        assert_eq!(RecipientType::parse("IND"), Some(RecipientType::Individual));
        assert_eq!(RecipientType::parse("partnership"), None);
    }

    #[test]
    fn test_display_name() {
        let mut slip = SlipDraft::default();
        slip.recipient_name.snm = "Tremblay".to_string();
        slip.recipient_name.gvn_nm = "Marie".to_string();
        assert_eq!(slip.display_name(), "Tremblay, Marie");

        slip.recipient_type = RecipientType::Corporation;
        slip.recipient_corp_name.l1_nm = "Maple Widgets Inc".to_string();
        assert_eq!(slip.display_name(), "Maple Widgets Inc");
    }
}
