//! Company feature modules.
//!
//! The company record carries its enabled modules as an integer bitmask.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A feature module that a company can switch on or off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    /// Recurring invoices
    RecurringInvoices,
    /// Credits
    Credits,
    /// Quotes
    Quotes,
    /// Tasks
    Tasks,
    /// Expenses
    Expenses,
    /// Projects
    Projects,
    /// Vendors
    Vendors,
    /// Recurring expenses
    RecurringExpenses,
    /// Invoices
    Invoices,
    /// Purchase orders
    PurchaseOrders,
    /// Bank transactions
    Transactions,
}

impl Module {
    /// Every module, in bit order
    pub const ALL: [Module; 11] = [
        Self::RecurringInvoices,
        Self::Credits,
        Self::Quotes,
        Self::Tasks,
        Self::Expenses,
        Self::Projects,
        Self::Vendors,
        Self::RecurringExpenses,
        Self::Invoices,
        Self::PurchaseOrders,
        Self::Transactions,
    ];

    /// Bit assigned to this module in the company bitmask
    #[must_use]
    pub const fn bit(self) -> u32 {
        match self {
            Self::RecurringInvoices => 1,
            Self::Credits => 2,
            Self::Quotes => 4,
            Self::Tasks => 8,
            Self::Expenses => 16,
            Self::Projects => 32,
            Self::Vendors => 64,
            Self::RecurringExpenses => 512,
            Self::Invoices => 4096,
            Self::PurchaseOrders => 16384,
            Self::Transactions => 32768,
        }
    }

    /// Wire name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RecurringInvoices => "recurring_invoices",
            Self::Credits => "credits",
            Self::Quotes => "quotes",
            Self::Tasks => "tasks",
            Self::Expenses => "expenses",
            Self::Projects => "projects",
            Self::Vendors => "vendors",
            Self::RecurringExpenses => "recurring_expenses",
            Self::Invoices => "invoices",
            Self::PurchaseOrders => "purchase_orders",
            Self::Transactions => "transactions",
        }
    }
}

impl FromStr for Module {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::ALL
            .into_iter()
            .find(|module| module.as_str() == s)
            .ok_or_else(|| CoreError::UnknownModule {
                name: s.to_string(),
            })
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of enabled modules, stored as the company bitmask
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleSet(u32);

impl ModuleSet {
    /// No modules enabled
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every known module enabled
    #[must_use]
    pub fn all() -> Self {
        Module::ALL.into_iter().collect()
    }

    /// Wrap a raw bitmask; unknown bits are kept
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bitmask
    #[must_use]
    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// Enable a module
    pub fn enable(&mut self, module: Module) {
        self.0 |= module.bit();
    }

    /// Enable a module, builder style
    #[must_use]
    pub fn with(mut self, module: Module) -> Self {
        self.enable(module);
        self
    }

    /// Check if a module is enabled
    #[must_use]
    pub const fn contains(&self, module: Module) -> bool {
        self.0 & module.bit() != 0
    }

    /// Iterate over enabled known modules
    pub fn iter(&self) -> impl Iterator<Item = Module> + '_ {
        Module::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

impl FromIterator<Module> for ModuleSet {
    fn from_iter<I: IntoIterator<Item = Module>>(iter: I) -> Self {
        let mut set = Self::empty();
        for module in iter {
            set.enable(module);
        }
        set
    }
}
