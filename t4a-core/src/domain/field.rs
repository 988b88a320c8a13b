//! Slip field table
//!
//! Every addressable slip field is listed once below with its dotted record
//! path, display title, value class, validation rule and the CSV header
//! aliases it answers to. The table order is the order fields appear on the
//! entry form, which is also the precedence order used when resolving CSV
//! columns.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::result::{Error, Result};
use super::slip::{RecipientType, SlipDraft};

/// Nested record groups a field can live in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    RecipientName,
    RecipientCorpName,
    RecipientAddress,
    Amounts,
    OtherInfo,
}

impl FieldGroup {
    /// Record key of the group
    pub fn key(&self) -> &'static str {
        match self {
            FieldGroup::RecipientName => "recipientName",
            FieldGroup::RecipientCorpName => "recipientCorpName",
            FieldGroup::RecipientAddress => "recipientAddress",
            FieldGroup::Amounts => "amounts",
            FieldGroup::OtherInfo => "otherInfo",
        }
    }
}

/// How raw cell text is normalized before it is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    RecipientType,
    Sin,
    Currency,
    Text,
}

/// Whether a field must be filled in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Optional,
    Required,
}

/// Validation rule for one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub requirement: Requirement,
    pub pattern: Option<&'static str>,
    /// Field is only present on the form for this recipient type
    pub applies_to: Option<RecipientType>,
}

impl FieldRule {
    const NONE: FieldRule = FieldRule {
        requirement: Requirement::Optional,
        pattern: None,
        applies_to: None,
    };

    const fn optional(pattern: &'static str) -> Self {
        Self {
            requirement: Requirement::Optional,
            pattern: Some(pattern),
            applies_to: None,
        }
    }

    const fn required(pattern: &'static str) -> Self {
        Self {
            requirement: Requirement::Required,
            pattern: Some(pattern),
            applies_to: None,
        }
    }

    const fn only_for(self, recipient_type: RecipientType) -> Self {
        Self {
            applies_to: Some(recipient_type),
            ..self
        }
    }

    pub fn is_required(&self) -> bool {
        self.requirement == Requirement::Required
    }

    /// Whether the rule is checked on a slip of the given recipient type
    pub fn applies(&self, recipient_type: RecipientType) -> bool {
        self.applies_to.is_none_or(|t| t == recipient_type)
    }
}

const SIN_PATTERN: &str = "^[0-9]{9}$";
const BN15_PATTERN: &str = "^[0-9]{9}(RT|RZ|RP|RC)[0-9]{4}$";
const CURRENCY_PATTERN: &str = r"^[0-9]{1,8}(\.[0-9]{0,2})?$";

const CURRENCY: FieldRule = FieldRule::optional(CURRENCY_PATTERN);
const INDIVIDUAL: RecipientType = RecipientType::Individual;
const CORPORATION: RecipientType = RecipientType::Corporation;

/// Normalize a CSV header or alias for comparison
///
/// Lower-cases and strips `:`, `-` and `_`. Whitespace and other punctuation
/// are kept, so "Province/Territory" only matches an alias containing the slash.
pub fn normalize_header(header: &str) -> String {
    header
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ':' | '-' | '_'))
        .collect()
}

macro_rules! slip_fields {
    (
        $(
            $variant:ident => $path:literal, $group:expr, $($slot:ident).+ ;
                $kind:ident, $rule:expr, $title:literal,
                [$($alias:literal),* $(,)?]
        )*
    ) => {
        /// A canonical slip field
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum SlipField {
            RecipientType,
            $($variant,)*
        }

        impl SlipField {
            /// Every field, in form order
            pub const ALL: &'static [SlipField] = &[
                SlipField::RecipientType,
                $(SlipField::$variant,)*
            ];

            /// Dotted record path, e.g. `recipientAddress.cty_nm`
            pub fn path(self) -> &'static str {
                match self {
                    SlipField::RecipientType => "recipientType",
                    $(SlipField::$variant => $path,)*
                }
            }

            pub fn group(self) -> Option<FieldGroup> {
                match self {
                    SlipField::RecipientType => None,
                    $(SlipField::$variant => $group,)*
                }
            }

            pub fn kind(self) -> FieldKind {
                match self {
                    SlipField::RecipientType => FieldKind::RecipientType,
                    $(SlipField::$variant => FieldKind::$kind,)*
                }
            }

            pub fn rule(self) -> FieldRule {
                match self {
                    SlipField::RecipientType => FieldRule::NONE,
                    $(SlipField::$variant => $rule,)*
                }
            }

            /// Display title, shared by the entry form and error messages
            pub fn title(self) -> &'static str {
                match self {
                    SlipField::RecipientType => "Recipient Type",
                    $(SlipField::$variant => $title,)*
                }
            }

            /// Normalized header aliases. Empty for fields that are never imported.
            pub fn aliases(self) -> &'static [&'static str] {
                match self {
                    SlipField::RecipientType => &[
                        "recipient type", "recipienttype", "type", "payee type", "entity type",
                    ],
                    $(SlipField::$variant => &[$($alias),*],)*
                }
            }

            /// Current text value; None for the recipient type selector
            pub fn text(self, slip: &SlipDraft) -> Option<&str> {
                match self {
                    SlipField::RecipientType => None,
                    $(SlipField::$variant => Some(slip.$($slot).+.as_str()),)*
                }
            }

            pub fn text_mut(self, slip: &mut SlipDraft) -> Option<&mut String> {
                match self {
                    SlipField::RecipientType => None,
                    $(SlipField::$variant => Some(&mut slip.$($slot).+),)*
                }
            }
        }
    };
}

slip_fields! {
    // Recipient name (individual)
    Surname => "recipientName.snm", Some(FieldGroup::RecipientName), recipient_name.snm;
        Text, FieldRule::required("^.{1,20}$").only_for(INDIVIDUAL), "Surname",
        ["surname", "last name", "lastname", "family name", "snm", "recipient surname", "recipient last name"]
    GivenName => "recipientName.gvn_nm", Some(FieldGroup::RecipientName), recipient_name.gvn_nm;
        Text, FieldRule::optional("^.{1,12}$").only_for(INDIVIDUAL), "Given Name",
        ["given name", "first name", "firstname", "givenname", "gvnnm", "recipient first name"]
    Initial => "recipientName.init", Some(FieldGroup::RecipientName), recipient_name.init;
        Text, FieldRule::optional("^[a-zA-Z]{1}$").only_for(INDIVIDUAL), "Middle Name Initial",
        ["middle name initial", "middle initial", "initial", "init", "mi"]

    // Recipient name (corporation)
    CorpNameLine1 => "recipientCorpName.l1_nm", Some(FieldGroup::RecipientCorpName), recipient_corp_name.l1_nm;
        Text, FieldRule::required("^.{1,30}$").only_for(CORPORATION), "Corporation Name Line 1",
        ["corporation name line 1", "corporation name", "company name", "business name", "corp name", "l1nm"]
    CorpNameLine2 => "recipientCorpName.l2_nm", Some(FieldGroup::RecipientCorpName), recipient_corp_name.l2_nm;
        Text, FieldRule::optional("^.{1,30}$").only_for(CORPORATION), "Corporation Name Line 2",
        ["corporation name line 2", "company name 2", "business name 2", "l2nm"]

    // Identity
    Sin => "sin", None, sin;
        Sin, FieldRule::required(SIN_PATTERN), "SIN",
        ["sin", "social insurance number", "social insurance no", "sin number", "recipient sin"]
    RecipientBn => "rcpnt_bn", None, rcpnt_bn;
        Text, FieldRule::required(BN15_PATTERN), "Recipient Business Number",
        ["rcpntbn", "recipient business number", "recipient bn", "business number", "bn"]

    // Recipient address
    AddressLine1 => "recipientAddress.addr_l1_txt", Some(FieldGroup::RecipientAddress), recipient_address.addr_l1_txt;
        Text, FieldRule::optional("^.{1,30}$"), "Address Line 1",
        ["address line 1", "address 1", "address1", "street address", "street", "addrl1txt"]
    AddressLine2 => "recipientAddress.addr_l2_txt", Some(FieldGroup::RecipientAddress), recipient_address.addr_l2_txt;
        Text, FieldRule::optional("^.{1,30}$"), "Address Line 2",
        ["address line 2", "address 2", "address2", "unit", "suite", "addrl2txt"]
    City => "recipientAddress.cty_nm", Some(FieldGroup::RecipientAddress), recipient_address.cty_nm;
        Text, FieldRule::optional("^.{1,28}$"), "City",
        ["city", "town", "municipality", "ctynm"]
    Province => "recipientAddress.prov_cd", Some(FieldGroup::RecipientAddress), recipient_address.prov_cd;
        Text, FieldRule::optional("^[A-Z]{2}$"), "Province/Territory Code",
        ["province", "province/territory", "province/territory code", "province code", "prov", "state", "provcd"]
    Country => "recipientAddress.cntry_cd", Some(FieldGroup::RecipientAddress), recipient_address.cntry_cd;
        Text, FieldRule::optional("^[A-Z]{3}$"), "Country Code",
        ["country", "country code", "cntrycd"]
    PostalCode => "recipientAddress.pstl_cd", Some(FieldGroup::RecipientAddress), recipient_address.pstl_cd;
        Text, FieldRule::optional("^.{1,10}$"), "Postal Code",
        ["postal code", "postal", "postcode", "zip", "zip code", "pstlcd"]

    // Slip references
    RecipientNumber => "rcpnt_nbr", None, rcpnt_nbr;
        Text, FieldRule::optional("^.{1,20}$"), "Recipient Number",
        ["recipient number", "recipient no", "rcpntnbr", "employee number", "employee id", "payee id", "vendor id"]
    PayerBn => "bn", None, bn;
        Text, FieldRule::required(BN15_PATTERN), "Payer's Account Number (BN)",
        []
    DentalBenefitsCode => "payr_dntl_ben_rpt_cd", None, payr_dntl_ben_rpt_cd;
        Text, FieldRule::optional("^[1-5]$"), "Payer Dental Benefits Report Code",
        ["payer dental benefits report code", "dental benefits code", "dental code", "dental benefits", "payrdntlbenrptcd", "box 015"]
    PlanRegistrationNumber => "ppln_dpsp_rgst_nbr", None, ppln_dpsp_rgst_nbr;
        Text, FieldRule::optional("^[0-9]{7}$"), "Plan or DPSP Registration Number",
        ["plan or dpsp registration number", "dpsp registration number", "plan registration number", "rpp number", "dpsp number", "ppln dpsp rgst nbr", "pplndpsprgstnbr", "box 036"]

    // Amounts (face of slip)
    PensionSuperannuation => "amounts.pens_spran_amt", Some(FieldGroup::Amounts), amounts.pens_spran_amt;
        Currency, CURRENCY, "Pension or Superannuation",
        ["pension or superannuation", "pension", "superannuation", "pensspranamt", "box 016", "016"]
    LumpSum => "amounts.lsp_amt", Some(FieldGroup::Amounts), amounts.lsp_amt;
        Currency, CURRENCY, "Lump-sum Payments",
        ["lumpsum payments", "lump sum payments", "lump sum", "lspamt", "box 018", "018"]
    SelfEmployedCommissions => "amounts.self_empl_cmsn_amt", Some(FieldGroup::Amounts), amounts.self_empl_cmsn_amt;
        Currency, CURRENCY, "Self-employed Commissions",
        ["selfemployed commissions", "self employed commissions", "commissions", "selfemplcmsnamt", "box 020", "020"]
    IncomeTaxDeducted => "amounts.itx_ddct_amt", Some(FieldGroup::Amounts), amounts.itx_ddct_amt;
        Currency, CURRENCY, "Income Tax Deducted",
        ["income tax deducted", "tax deducted", "income tax", "withholding", "itxddctamt", "box 022", "022"]
    Annuities => "amounts.annty_amt", Some(FieldGroup::Amounts), amounts.annty_amt;
        Currency, CURRENCY, "Annuities",
        ["annuities", "annuity", "anntyamt", "box 024", "024"]
    FeesForServices => "amounts.fee_or_oth_srvc_amt", Some(FieldGroup::Amounts), amounts.fee_or_oth_srvc_amt;
        Currency, CURRENCY, "Fees for Services",
        ["fees for services", "fees for other services", "fees", "service fees", "feeorothsrvcamt", "box 048", "048"]

    // Other information
    EligibleRetiringAllowances => "otherInfo.elg_rtir_amt", Some(FieldGroup::OtherInfo), other_info.elg_rtir_amt;
        Currency, CURRENCY, "Eligible Retiring Allowances (Code 026)",
        ["eligible retiring allowances", "elgrtiramt", "code 026", "box 026", "026"]
    NonEligibleRetiringAllowances => "otherInfo.nelg_rtir_amt", Some(FieldGroup::OtherInfo), other_info.nelg_rtir_amt;
        Currency, CURRENCY, "Non-eligible Retiring Allowances (Code 027)",
        ["noneligible retiring allowances", "non eligible retiring allowances", "nelgrtiramt", "code 027", "box 027", "027"]
    OtherIncome => "otherInfo.oth_incamt", Some(FieldGroup::OtherInfo), other_info.oth_incamt;
        Currency, CURRENCY, "Other Income (Code 028)",
        ["other income", "othincamt", "code 028", "box 028", "028"]
    PatronageAllocations => "otherInfo.ptrng_aloc_amt", Some(FieldGroup::OtherInfo), other_info.ptrng_aloc_amt;
        Currency, CURRENCY, "Patronage Allocations (Code 030)",
        ["patronage allocations", "ptrngalocamt", "code 030", "box 030", "030"]
    RppPastService => "otherInfo.rpp_past_srvc_amt", Some(FieldGroup::OtherInfo), other_info.rpp_past_srvc_amt;
        Currency, CURRENCY, "Registered Pension Plan Contributions - Past Service (Code 032)",
        ["rpp past service contributions", "past service contributions", "rpppastsrvcamt", "code 032", "box 032", "032"]
    PensionAdjustment => "otherInfo.padj_amt", Some(FieldGroup::OtherInfo), other_info.padj_amt;
        Currency, CURRENCY, "Pension Adjustment (Code 034)",
        ["pension adjustment", "padjamt", "code 034", "box 034", "034"]
    AldaPurchase => "otherInfo.alda_amt", Some(FieldGroup::OtherInfo), other_info.alda_amt;
        Currency, CURRENCY, "Advanced Life Deferred Annuity Purchase (Code 037)",
        ["advanced life deferred annuity purchase", "alda", "annuity purchase", "annuity", "aldaamt", "code 037", "box 037", "037"]
    RespAccumulatedIncome => "otherInfo.resp_aip_amt", Some(FieldGroup::OtherInfo), other_info.resp_aip_amt;
        Currency, CURRENCY, "RESP Accumulated Income Payments (Code 040)",
        ["resp accumulated income payments", "respaipamt", "code 040", "box 040", "040"]
    RespEducationalAssistance => "otherInfo.resp_educt_ast_amt", Some(FieldGroup::OtherInfo), other_info.resp_educt_ast_amt;
        Currency, CURRENCY, "RESP Educational Assistance Payments (Code 042)",
        ["resp educational assistance payments", "respeductastamt", "code 042", "box 042", "042"]
    CharitableDonations => "otherInfo.chrty_dons_amt", Some(FieldGroup::OtherInfo), other_info.chrty_dons_amt;
        Currency, CURRENCY, "Charitable Donations (Code 046)",
        ["charitable donations", "chrtydonsamt", "code 046", "box 046", "046"]
    NonResidentLumpSumTransfer => "otherInfo.nr_lsp_trnsf_amt", Some(FieldGroup::OtherInfo), other_info.nr_lsp_trnsf_amt;
        Currency, CURRENCY, "Lump-sum Payments - Non-resident Services Transfer (Code 102)",
        ["nonresident services transfer", "nrlsptrnsfamt", "code 102", "box 102", "102"]
    ResearchGrants => "otherInfo.rsch_grnt_amt", Some(FieldGroup::OtherInfo), other_info.rsch_grnt_amt;
        Currency, CURRENCY, "Research Grants (Code 104)",
        ["research grants", "research grant", "rschgrntamt", "code 104", "box 104", "104"]
    Bursaries => "otherInfo.brsy_amt", Some(FieldGroup::OtherInfo), other_info.brsy_amt;
        Currency, CURRENCY, "Scholarships, Fellowships, or Bursaries (Code 105)",
        ["scholarships", "bursaries", "scholarships, fellowships, or bursaries", "brsyamt", "code 105", "box 105", "105"]
    DeathBenefits => "otherInfo.dth_ben_amt", Some(FieldGroup::OtherInfo), other_info.dth_ben_amt;
        Currency, CURRENCY, "Death Benefits (Code 106)",
        ["death benefits", "dthbenamt", "code 106", "box 106", "106"]
    WageLossReplacement => "otherInfo.wag_ls_incamt", Some(FieldGroup::OtherInfo), other_info.wag_ls_incamt;
        Currency, CURRENCY, "Wage Loss Replacement Plan Income (Code 107)",
        ["wage loss replacement plan income", "wage loss replacement", "waglsincamt", "code 107", "box 107", "107"]
    RppLumpSumNotEligible => "otherInfo.lsp_rpp_nelg_amt", Some(FieldGroup::OtherInfo), other_info.lsp_rpp_nelg_amt;
        Currency, CURRENCY, "RPP Lump-sum Payments - Not Eligible for Transfer (Code 108)",
        ["lsprppnelgamt", "code 108", "box 108", "108"]
    UnregisteredPensionPlan => "otherInfo.nrgst_ppln_amt", Some(FieldGroup::OtherInfo), other_info.nrgst_ppln_amt;
        Currency, CURRENCY, "Unregistered Pension Plan (Code 109)",
        ["unregistered pension plan", "nrgstpplnamt", "code 109", "box 109", "109"]
    LumpSumAccruedTo1971 => "otherInfo.pr_71_acr_lsp_amt", Some(FieldGroup::OtherInfo), other_info.pr_71_acr_lsp_amt;
        Currency, CURRENCY, "Lump-sum Payments Accrued to December 31, 1971 (Code 110)",
        ["pr71acrlspamt", "code 110", "box 110", "110"]
    IaacAnnuities => "otherInfo.inc_avg_annty_amt", Some(FieldGroup::OtherInfo), other_info.inc_avg_annty_amt;
        Currency, CURRENCY, "IAAC Annuities (Code 111)",
        ["iaac annuities", "incavganntyamt", "code 111", "box 111", "111"]
    DpspInstallments => "otherInfo.dpsp_ins_pay_amt", Some(FieldGroup::OtherInfo), other_info.dpsp_ins_pay_amt;
        Currency, CURRENCY, "DPSP Installment or Annuity Payments (Code 115)",
        ["dpsp installment or annuity payments", "dpspinspayamt", "code 115", "box 115", "115"]
    MedicalTravel => "otherInfo.med_trvl_amt", Some(FieldGroup::OtherInfo), other_info.med_trvl_amt;
        Currency, CURRENCY, "Medical Travel (Code 116)",
        ["medical travel", "medtrvlamt", "code 116", "box 116", "116"]
    LoanBenefit => "otherInfo.loan_ben_amt", Some(FieldGroup::OtherInfo), other_info.loan_ben_amt;
        Currency, CURRENCY, "Loan Benefit under Subsection 80.4(2) (Code 117)",
        ["loan benefit", "loanbenamt", "code 117", "box 117", "117"]
    MedicalPremiumBenefit => "otherInfo.med_prem_ben_amt", Some(FieldGroup::OtherInfo), other_info.med_prem_ben_amt;
        Currency, CURRENCY, "Medical Premium Benefit (Code 118)",
        ["medical premium benefit", "medprembenamt", "code 118", "box 118", "118"]
    GroupTermLife => "otherInfo.grp_trm_life_amt", Some(FieldGroup::OtherInfo), other_info.grp_trm_life_amt;
        Currency, CURRENCY, "Group Term Life Insurance Benefit (Code 119)",
        ["group term life insurance benefit", "group term life", "grptrmlifeamt", "code 119", "box 119", "119"]
    RespAccumulatedIncomeOther => "otherInfo.resp_aip_oth_amt", Some(FieldGroup::OtherInfo), other_info.resp_aip_oth_amt;
        Currency, CURRENCY, "RESP Accumulated Income Payments to Other (Code 122)",
        ["respaipothamt", "code 122", "box 122", "122"]
    RevokedDpspInstallments => "otherInfo.ins_rvk_dpsp_amt", Some(FieldGroup::OtherInfo), other_info.ins_rvk_dpsp_amt;
        Currency, CURRENCY, "Revoked DPSP Installment or Annuity Payments (Code 123)",
        ["insrvkdpspamt", "code 123", "box 123", "123"]
    BoardAndLodging => "otherInfo.brd_wrk_site_amt", Some(FieldGroup::OtherInfo), other_info.brd_wrk_site_amt;
        Currency, CURRENCY, "Board and Lodging at Special Work Sites (Code 124)",
        ["board and lodging", "brdwrksiteamt", "code 124", "box 124", "124"]
    DisabilityBenefits => "otherInfo.dsblt_ben_amt", Some(FieldGroup::OtherInfo), other_info.dsblt_ben_amt;
        Currency, CURRENCY, "Disability Benefits (Code 125)",
        ["disability benefits", "dsbltbenamt", "code 125", "box 125", "125"]
    ContributorPre1990PastService => "otherInfo.cntrbr_prr_pspp_cnamt", Some(FieldGroup::OtherInfo), other_info.cntrbr_prr_pspp_cnamt;
        Currency, CURRENCY, "Contributor RPP Past Service Pre-1990 Contributions (Code 126)",
        ["cntrbrprrpsppcnamt", "code 126", "box 126", "126"]
    VeteransBenefit => "otherInfo.vtrn_ben_amt", Some(FieldGroup::OtherInfo), other_info.vtrn_ben_amt;
        Currency, CURRENCY, "Veteran's Benefit (Code 127)",
        ["veteran's benefit", "veterans benefit", "vtrnbenamt", "code 127", "box 127", "127"]
    VeteransPensionSplitting => "otherInfo.vtrn_ben_pens_splt_elg_amt", Some(FieldGroup::OtherInfo), other_info.vtrn_ben_pens_splt_elg_amt;
        Currency, CURRENCY, "Veterans' Benefits Eligible for Pension Splitting (Code 128)",
        ["vtrnbenpenssplteglamt", "vtrnbenpensspltelgamt", "code 128", "box 128", "128"]
    TaxDeferredPatronage => "otherInfo.tx_dfr_ptrng_dvamt", Some(FieldGroup::OtherInfo), other_info.tx_dfr_ptrng_dvamt;
        Currency, CURRENCY, "Tax Deferred Patronage Dividends (Code 129)",
        ["tax deferred patronage dividends", "txdfrptrngdvamt", "code 129", "box 129", "129"]
    ApprenticeshipGrant => "otherInfo.atp_inctv_grnt_amt", Some(FieldGroup::OtherInfo), other_info.atp_inctv_grnt_amt;
        Currency, CURRENCY, "Apprenticeship Incentive/Completion Grant (Code 130)",
        ["apprenticeship grant", "apprenticeship incentive/completion grant", "atpinctvgrntamt", "code 130", "box 130", "130"]
    Rdsp => "otherInfo.rdsp_amt", Some(FieldGroup::OtherInfo), other_info.rdsp_amt;
        Currency, CURRENCY, "Registered Disability Savings Plan (Code 131)",
        ["registered disability savings plan", "rdsp", "rdspamt", "code 131", "box 131", "131"]
    WageEarnerProtection => "otherInfo.wag_ptct_pgm_amt", Some(FieldGroup::OtherInfo), other_info.wag_ptct_pgm_amt;
        Currency, CURRENCY, "Wage Earner Protection Program (Code 132)",
        ["wage earner protection program", "wepp", "wagptctpgmamt", "code 132", "box 132", "132"]
    VariablePensionBenefits => "otherInfo.var_pens_ben_amt", Some(FieldGroup::OtherInfo), other_info.var_pens_ben_amt;
        Currency, CURRENCY, "Variable Pension Benefits (Code 133)",
        ["variable pension benefits", "varpensbenamt", "code 133", "box 133", "133"]
    TfsaTaxable => "otherInfo.tfsa_tax_amt", Some(FieldGroup::OtherInfo), other_info.tfsa_tax_amt;
        Currency, CURRENCY, "TFSA/FHSA Taxable Amount (Code 134)",
        ["tfsa/fhsa taxable amount", "tfsa taxable amount", "tfsataxamt", "code 134", "box 134", "134"]
    PrivateHealthPremiums => "otherInfo.rcpnt_pay_prem_phsp_amt", Some(FieldGroup::OtherInfo), other_info.rcpnt_pay_prem_phsp_amt;
        Currency, CURRENCY, "Recipient-paid Private Health Services Plan Premiums (Code 135)",
        ["rcpntpaypremphspamt", "code 135", "box 135", "135"]
    PmmcBenefits => "otherInfo.pmmc_isg_amt", Some(FieldGroup::OtherInfo), other_info.pmmc_isg_amt;
        Currency, CURRENCY, "Parents of Murdered/Missing Children Benefits (Code 136)",
        ["pmmcisgamt", "code 136", "box 136", "136"]
    IndianActOtherIncome => "otherInfo.indn_oth_incamt", Some(FieldGroup::OtherInfo), other_info.indn_oth_incamt;
        Currency, CURRENCY, "Indian Act - Exempt Other Income (Code 144)",
        ["indnothincamt", "code 144", "box 144", "144"]
    IndianActPension => "otherInfo.indn_xmpt_pens_amt", Some(FieldGroup::OtherInfo), other_info.indn_xmpt_pens_amt;
        Currency, CURRENCY, "Indian Act - Exempt Pension/Superannuation (Code 146)",
        ["indnxmptpensamt", "code 146", "box 146", "146"]
    IndianActLumpSum => "otherInfo.indn_xmpt_lsp_amt", Some(FieldGroup::OtherInfo), other_info.indn_xmpt_lsp_amt;
        Currency, CURRENCY, "Indian Act - Exempt Lump-sum Payments (Code 148)",
        ["indnxmptlspamt", "code 148", "box 148", "148"]
    LabourAdjustmentBenefits => "otherInfo.lbr_adj_ben_aprpt_act_amt", Some(FieldGroup::OtherInfo), other_info.lbr_adj_ben_aprpt_act_amt;
        Currency, CURRENCY, "Labour Adjustment Benefits (Code 150)",
        ["labour adjustment benefits", "lbradjbenaprptactamt", "code 150", "box 150", "150"]
    SubpQualified => "otherInfo.subp_qlf_amt", Some(FieldGroup::OtherInfo), other_info.subp_qlf_amt;
        Currency, CURRENCY, "SUBP Qualified Under Income Tax Act (Code 152)",
        ["subp", "subpqlfamt", "code 152", "box 152", "152"]
    CashAwardOrPrize => "otherInfo.csh_awrd_pze_payr_amt", Some(FieldGroup::OtherInfo), other_info.csh_awrd_pze_payr_amt;
        Currency, CURRENCY, "Cash Award or Prize from Payer (Code 154)",
        ["cash award or prize", "cash award", "prize", "cshawrdpzepayramt", "code 154", "box 154", "154"]
    BankruptcySettlement => "otherInfo.bkcy_sttl_amt", Some(FieldGroup::OtherInfo), other_info.bkcy_sttl_amt;
        Currency, CURRENCY, "Bankruptcy Settlement (Code 156)",
        ["bankruptcy settlement", "bkcysttlamt", "code 156", "box 156", "156"]
    LumpSumNotEligible => "otherInfo.lsp_nelg_trnsf_amt", Some(FieldGroup::OtherInfo), other_info.lsp_nelg_trnsf_amt;
        Currency, CURRENCY, "Lump-sum Payments - Not Eligible for Transfer (Code 158)",
        ["lspnelgtrnsfamt", "code 158", "box 158", "158"]
    NonContributorPre1990PastService => "otherInfo.ncntrbr_prr_pspp_cnamt", Some(FieldGroup::OtherInfo), other_info.ncntrbr_prr_pspp_cnamt;
        Currency, CURRENCY, "Non-Contributor RPP Past Service Pre-1990 (Code 162)",
        ["ncntrbrprrpsppcnamt", "code 162", "box 162", "162"]
    DpspLumpSumNotEligible => "otherInfo.lsp_dpsp_nelg_amt", Some(FieldGroup::OtherInfo), other_info.lsp_dpsp_nelg_amt;
        Currency, CURRENCY, "DPSP Lump-sum Payments - Not Eligible for Transfer (Code 180)",
        ["lspdpspnelgamt", "code 180", "box 180", "180"]
    UnregisteredPensionLumpSum => "otherInfo.lsp_nrgst_pens_amt", Some(FieldGroup::OtherInfo), other_info.lsp_nrgst_pens_amt;
        Currency, CURRENCY, "Unregistered Pension Benefits Lump-sum (Code 190)",
        ["lspnrgstpensamt", "code 190", "box 190", "190"]
    PrppPayments => "otherInfo.prpp_tx_inc_pamt", Some(FieldGroup::OtherInfo), other_info.prpp_tx_inc_pamt;
        Currency, CURRENCY, "PRPP Payments (Code 194)",
        ["prpp payments", "prpptxincpamt", "code 194", "box 194", "194"]
    IndianActPrpp => "otherInfo.prpp_txmpt_inc_pamt", Some(FieldGroup::OtherInfo), other_info.prpp_txmpt_inc_pamt;
        Currency, CURRENCY, "Indian Act - Exempt PRPP Payments (Code 195)",
        ["prpptxmptincpamt", "code 195", "box 195", "195"]
    AdultBasicEducation => "otherInfo.abe_tuit_ast_amt", Some(FieldGroup::OtherInfo), other_info.abe_tuit_ast_amt;
        Currency, CURRENCY, "Adult Basic Education Tuition Assistance (Code 196)",
        ["adult basic education tuition assistance", "abetuitastamt", "code 196", "box 196", "196"]
    ProvincialCovidAssistance => "otherInfo.prov_trty_emrg_ben_amt", Some(FieldGroup::OtherInfo), other_info.prov_trty_emrg_ben_amt;
        Currency, CURRENCY, "Provincial/Territorial COVID-19 Assistance (Code 200)",
        ["provtrtyemrgbenamt", "code 200", "box 200", "200"]
    CovidRepayment => "otherInfo.repmt_covid_fncl_asstnc", Some(FieldGroup::OtherInfo), other_info.repmt_covid_fncl_asstnc;
        Currency, CURRENCY, "Repayment of COVID-19 Financial Assistance (Code 201)",
        ["repmtcovidfnclasstnc", "code 201", "box 201", "201"]
    OlderSeniorsPayment => "otherInfo.oas_lump_sum_pamt", Some(FieldGroup::OtherInfo), other_info.oas_lump_sum_pamt;
        Currency, CURRENCY, "One-time Payment for Older Seniors (Code 205)",
        ["oaslumpsumpamt", "code 205", "box 205", "205"]
    PostdoctoralFellowship => "otherInfo.pst_dctrl_fshp_amt", Some(FieldGroup::OtherInfo), other_info.pst_dctrl_fshp_amt;
        Currency, CURRENCY, "Postdoctoral Fellowship Income (Code 210)",
        ["postdoctoral fellowship income", "postdoctoral fellowship", "pstdctrlfshpamt", "code 210", "box 210", "210"]
}

impl SlipField {
    /// Look up a field by its dotted record path
    pub fn from_path(path: &str) -> Option<SlipField> {
        SlipField::ALL.iter().copied().find(|f| f.path() == path)
    }

    /// Member name within its group, or the flat field name
    pub fn member(self) -> &'static str {
        let path = self.path();
        path.split_once('.').map_or(path, |(_, member)| member)
    }

    /// Whether CSV columns can be mapped onto this field
    pub fn is_importable(self) -> bool {
        !self.aliases().is_empty()
    }

    /// Importable fields in resolution precedence order
    pub fn importable() -> impl Iterator<Item = SlipField> {
        SlipField::ALL.iter().copied().filter(|f| f.is_importable())
    }
}

impl std::fmt::Display for SlipField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

impl std::str::FromStr for SlipField {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        SlipField::from_path(path.trim()).ok_or_else(|| Error::UnknownField(path.to_string()))
    }
}

impl Serialize for SlipField {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.path())
    }
}

/// Aliases for a flat field, or per member for a grouped one
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AliasEntry {
    Flat(&'static [&'static str]),
    Grouped(Vec<(&'static str, &'static [&'static str])>),
}

/// Read-only nested view of the alias table, keyed by flat field or group
pub fn alias_table() -> Vec<(&'static str, AliasEntry)> {
    let mut table: Vec<(&'static str, AliasEntry)> = Vec::new();

    for field in SlipField::importable() {
        match field.group() {
            None => table.push((field.path(), AliasEntry::Flat(field.aliases()))),
            Some(group) => {
                let member = (field.member(), field.aliases());
                match table.iter_mut().find(|(key, _)| *key == group.key()) {
                    Some((_, AliasEntry::Grouped(members))) => members.push(member),
                    _ => table.push((group.key(), AliasEntry::Grouped(vec![member]))),
                }
            }
        }
    }

    table
}

/// Compiled view of the field table, checked once at load
pub struct FieldTable {
    patterns: HashMap<SlipField, Regex>,
}

impl FieldTable {
    /// Check table consistency and compile every declared pattern
    pub fn load() -> Result<Self> {
        let mut paths = HashSet::new();
        let mut patterns = HashMap::new();

        for &field in SlipField::ALL {
            if !paths.insert(field.path()) {
                return Err(Error::FieldTable(format!("duplicate path {}", field.path())));
            }
            if field.title().is_empty() {
                return Err(Error::FieldTable(format!("{} has no title", field.path())));
            }
            if let Some(group) = field.group() {
                if !field.path().starts_with(&format!("{}.", group.key())) {
                    return Err(Error::FieldTable(format!(
                        "{} is not under group {}",
                        field.path(),
                        group.key()
                    )));
                }
            }
            for alias in field.aliases() {
                if alias.is_empty() || normalize_header(alias) != *alias {
                    return Err(Error::FieldTable(format!(
                        "alias '{}' of {} is not normalized",
                        alias,
                        field.path()
                    )));
                }
            }
            if let Some(pattern) = field.rule().pattern {
                let regex = Regex::new(pattern)
                    .map_err(|e| Error::FieldTable(format!("{}: {}", field.path(), e)))?;
                patterns.insert(field, regex);
            }
        }

        Ok(Self { patterns })
    }

    /// Compiled pattern for a field, if it declares one
    pub fn pattern(&self, field: SlipField) -> Option<&Regex> {
        self.patterns.get(&field)
    }
}

static FIELD_TABLE: LazyLock<FieldTable> =
    LazyLock::new(|| FieldTable::load().expect("slip field table is inconsistent"));

/// The process-wide field table
pub fn field_table() -> &'static FieldTable {
    &FIELD_TABLE
}
