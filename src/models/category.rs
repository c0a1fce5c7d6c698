use std::str::FromStr;

use crate::error::StoreError;

use super::Flow;

/// Transaction categories. Income and expense draw from different sets;
/// `Other` belongs to both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Salary,
    Freelance,
    Investments,
    Gift,
    CheckingAccount,
    Caju,
    Food,
    Transport,
    Leisure,
    Health,
    Education,
    Shopping,
    CardInvoice,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Salary => "Salário",
            Self::Freelance => "Freelance",
            Self::Investments => "Investimentos",
            Self::Gift => "Presente",
            Self::CheckingAccount => "Conta Corrente",
            Self::Caju => "Caju",
            Self::Food => "Alimentação",
            Self::Transport => "Transporte",
            Self::Leisure => "Lazer",
            Self::Health => "Saúde",
            Self::Education => "Educação",
            Self::Shopping => "Compras",
            Self::CardInvoice => "Fatura Cartão",
            Self::Other => "Outros",
        }
    }

    /// Case-insensitive lookup. Accent-free spellings are accepted so the
    /// categories can be typed on any keyboard.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        let found = match lower.as_str() {
            "salário" | "salario" => Self::Salary,
            "freelance" => Self::Freelance,
            "investimentos" => Self::Investments,
            "presente" => Self::Gift,
            "conta corrente" => Self::CheckingAccount,
            "caju" => Self::Caju,
            "alimentação" | "alimentacao" => Self::Food,
            "transporte" => Self::Transport,
            "lazer" => Self::Leisure,
            "saúde" | "saude" => Self::Health,
            "educação" | "educacao" => Self::Education,
            "compras" => Self::Shopping,
            "fatura cartão" | "fatura cartao" | "fatura" => Self::CardInvoice,
            "outros" => Self::Other,
            _ => return None,
        };
        Some(found)
    }

    pub fn income() -> &'static [Category] {
        &[
            Self::Salary,
            Self::Freelance,
            Self::Investments,
            Self::Gift,
            Self::CheckingAccount,
            Self::Caju,
            Self::Other,
        ]
    }

    pub fn expense() -> &'static [Category] {
        &[
            Self::Food,
            Self::Transport,
            Self::Leisure,
            Self::Health,
            Self::Education,
            Self::Shopping,
            Self::CardInvoice,
            Self::Other,
        ]
    }

    /// Expense categories a monthly limit can be set for.
    pub fn budgetable() -> &'static [Category] {
        &[
            Self::Food,
            Self::Transport,
            Self::Leisure,
            Self::Health,
            Self::Education,
            Self::Shopping,
            Self::Other,
        ]
    }

    pub fn of(flow: Flow) -> &'static [Category] {
        match flow {
            Flow::Income => Self::income(),
            Flow::Expense => Self::expense(),
        }
    }

    pub fn accepts(&self, flow: Flow) -> bool {
        Self::of(flow).contains(self)
    }

    /// Card bill payments. These duplicate itemized card spend and never count
    /// towards expense totals.
    pub fn is_invoice(&self) -> bool {
        matches!(self, Self::CardInvoice)
    }

    pub fn is_budgetable(&self) -> bool {
        Self::budgetable().contains(self)
    }
}

impl FromStr for Category {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| StoreError::invalid(format!("unknown category '{s}'")))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
