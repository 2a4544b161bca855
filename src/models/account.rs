use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ChoiceEnum, RecordId};

pub const ACCOUNT_CODE_MAX_LENGTH: usize = 10;
pub const ACCOUNT_NAME_MAX_LENGTH: usize = 100;

/// A node of a chart of accounts. Roots have no parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountModel {
    pub id: Option<RecordId>,
    pub coa_id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<RecordId>,
    pub code: String,
    pub name: String,
    pub role: AccountRole,
    pub balance_type: BalanceType,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "AccountModel::default_active")]
    pub active: bool,
}

impl AccountModel {
    /// Creates an unlocked, active root account inside the given chart.
    pub fn new(
        coa_id: impl Into<RecordId>,
        code: impl Into<String>,
        name: impl Into<String>,
        role: AccountRole,
        balance_type: BalanceType,
    ) -> Self {
        Self {
            id: None,
            coa_id: coa_id.into(),
            parent_id: None,
            code: code.into(),
            name: name.into(),
            role,
            balance_type,
            locked: false,
            active: true,
        }
    }

    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<RecordId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// `"1010 - Cash"`, the text shown in parent/account select boxes.
    pub fn display_label(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }

    pub fn default_active() -> bool {
        true
    }
}

/// Debit or credit orientation of an account's normal balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceType {
    #[default]
    Debit,
    Credit,
}

impl ChoiceEnum for BalanceType {
    fn all() -> &'static [Self] {
        &[BalanceType::Debit, BalanceType::Credit]
    }

    fn as_str(&self) -> &'static str {
        match self {
            BalanceType::Debit => "debit",
            BalanceType::Credit => "credit",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            BalanceType::Debit => "Debit",
            BalanceType::Credit => "Credit",
        }
    }
}

impl fmt::Display for BalanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Functional classification of an account within the financial statements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    #[default]
    AssetCaCash,
    AssetCaMktSec,
    AssetCaRecv,
    AssetCaInv,
    AssetCaUncoll,
    AssetCaPrepaid,
    AssetCaOther,
    AssetLtiNotes,
    AssetLtiLand,
    AssetLtiSec,
    AssetPpeBuild,
    AssetPpePlant,
    AssetPpeEquip,
    AssetIa,
    AssetAdjustment,
    LiaClAccPay,
    LiaClWagePay,
    LiaClIntPay,
    LiaClStNotesPayable,
    LiaClLtdMat,
    LiaClDefRev,
    LiaClOther,
    LiaLtlNotes,
    LiaLtlBonds,
    LiaLtlMortgage,
    EqCapital,
    EqStockC,
    EqStockP,
    EqAdjustment,
    EqDividends,
    InSales,
    InPassive,
    InOther,
    ExCogs,
    ExRegular,
    ExInterest,
    ExTaxes,
    ExCapital,
    ExOther,
}

const ACCOUNT_ROLES: &[AccountRole] = &[
    AccountRole::AssetCaCash,
    AccountRole::AssetCaMktSec,
    AccountRole::AssetCaRecv,
    AccountRole::AssetCaInv,
    AccountRole::AssetCaUncoll,
    AccountRole::AssetCaPrepaid,
    AccountRole::AssetCaOther,
    AccountRole::AssetLtiNotes,
    AccountRole::AssetLtiLand,
    AccountRole::AssetLtiSec,
    AccountRole::AssetPpeBuild,
    AccountRole::AssetPpePlant,
    AccountRole::AssetPpeEquip,
    AccountRole::AssetIa,
    AccountRole::AssetAdjustment,
    AccountRole::LiaClAccPay,
    AccountRole::LiaClWagePay,
    AccountRole::LiaClIntPay,
    AccountRole::LiaClStNotesPayable,
    AccountRole::LiaClLtdMat,
    AccountRole::LiaClDefRev,
    AccountRole::LiaClOther,
    AccountRole::LiaLtlNotes,
    AccountRole::LiaLtlBonds,
    AccountRole::LiaLtlMortgage,
    AccountRole::EqCapital,
    AccountRole::EqStockC,
    AccountRole::EqStockP,
    AccountRole::EqAdjustment,
    AccountRole::EqDividends,
    AccountRole::InSales,
    AccountRole::InPassive,
    AccountRole::InOther,
    AccountRole::ExCogs,
    AccountRole::ExRegular,
    AccountRole::ExInterest,
    AccountRole::ExTaxes,
    AccountRole::ExCapital,
    AccountRole::ExOther,
];

impl ChoiceEnum for AccountRole {
    fn all() -> &'static [Self] {
        ACCOUNT_ROLES
    }

    fn as_str(&self) -> &'static str {
        match self {
            AccountRole::AssetCaCash => "asset_ca_cash",
            AccountRole::AssetCaMktSec => "asset_ca_mkt_sec",
            AccountRole::AssetCaRecv => "asset_ca_recv",
            AccountRole::AssetCaInv => "asset_ca_inv",
            AccountRole::AssetCaUncoll => "asset_ca_uncoll",
            AccountRole::AssetCaPrepaid => "asset_ca_prepaid",
            AccountRole::AssetCaOther => "asset_ca_other",
            AccountRole::AssetLtiNotes => "asset_lti_notes",
            AccountRole::AssetLtiLand => "asset_lti_land",
            AccountRole::AssetLtiSec => "asset_lti_sec",
            AccountRole::AssetPpeBuild => "asset_ppe_build",
            AccountRole::AssetPpePlant => "asset_ppe_plant",
            AccountRole::AssetPpeEquip => "asset_ppe_equip",
            AccountRole::AssetIa => "asset_ia",
            AccountRole::AssetAdjustment => "asset_adjustment",
            AccountRole::LiaClAccPay => "lia_cl_acc_pay",
            AccountRole::LiaClWagePay => "lia_cl_wage_pay",
            AccountRole::LiaClIntPay => "lia_cl_int_pay",
            AccountRole::LiaClStNotesPayable => "lia_cl_st_notes_payable",
            AccountRole::LiaClLtdMat => "lia_cl_ltd_mat",
            AccountRole::LiaClDefRev => "lia_cl_def_rev",
            AccountRole::LiaClOther => "lia_cl_other",
            AccountRole::LiaLtlNotes => "lia_ltl_notes",
            AccountRole::LiaLtlBonds => "lia_ltl_bonds",
            AccountRole::LiaLtlMortgage => "lia_ltl_mortgage",
            AccountRole::EqCapital => "eq_capital",
            AccountRole::EqStockC => "eq_stock_c",
            AccountRole::EqStockP => "eq_stock_p",
            AccountRole::EqAdjustment => "eq_adjustment",
            AccountRole::EqDividends => "eq_dividends",
            AccountRole::InSales => "in_sales",
            AccountRole::InPassive => "in_passive",
            AccountRole::InOther => "in_other",
            AccountRole::ExCogs => "ex_cogs",
            AccountRole::ExRegular => "ex_regular",
            AccountRole::ExInterest => "ex_interest",
            AccountRole::ExTaxes => "ex_taxes",
            AccountRole::ExCapital => "ex_capital",
            AccountRole::ExOther => "ex_other",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            AccountRole::AssetCaCash => "Current Asset",
            AccountRole::AssetCaMktSec => "Marketable Securities",
            AccountRole::AssetCaRecv => "Receivables",
            AccountRole::AssetCaInv => "Inventory",
            AccountRole::AssetCaUncoll => "Uncollectibles",
            AccountRole::AssetCaPrepaid => "Prepaid",
            AccountRole::AssetCaOther => "Other Liquid Assets",
            AccountRole::AssetLtiNotes => "Notes Receivable",
            AccountRole::AssetLtiLand => "Land",
            AccountRole::AssetLtiSec => "Securities",
            AccountRole::AssetPpeBuild => "Buildings",
            AccountRole::AssetPpePlant => "Plant",
            AccountRole::AssetPpeEquip => "Equipment",
            AccountRole::AssetIa => "Intangible Assets",
            AccountRole::AssetAdjustment => "Other Assets",
            AccountRole::LiaClAccPay => "Accounts Payable",
            AccountRole::LiaClWagePay => "Wages Payable",
            AccountRole::LiaClIntPay => "Interest Payable",
            AccountRole::LiaClStNotesPayable => "Notes Payable",
            AccountRole::LiaClLtdMat => "Current Maturities of Long Term Debt",
            AccountRole::LiaClDefRev => "Deferred Revenue",
            AccountRole::LiaClOther => "Other Liabilities",
            AccountRole::LiaLtlNotes => "Long Term Notes Payable",
            AccountRole::LiaLtlBonds => "Bonds Payable",
            AccountRole::LiaLtlMortgage => "Mortgage Payable",
            AccountRole::EqCapital => "Capital",
            AccountRole::EqStockC => "Common Stock",
            AccountRole::EqStockP => "Preferred Stock",
            AccountRole::EqAdjustment => "Other Equity Adjustments",
            AccountRole::EqDividends => "Dividends & Distributions to Shareholders",
            AccountRole::InSales => "Sales Income",
            AccountRole::InPassive => "Passive Income",
            AccountRole::InOther => "Other Income",
            AccountRole::ExCogs => "Cost of Goods Sold",
            AccountRole::ExRegular => "Regular Expense",
            AccountRole::ExInterest => "Interest Expense",
            AccountRole::ExTaxes => "Tax Expense",
            AccountRole::ExCapital => "Capital Expense",
            AccountRole::ExOther => "Other Expense",
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
