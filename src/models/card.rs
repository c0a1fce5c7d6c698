use std::str::FromStr;

use crate::error::StoreError;

/// Label older databases used for "no card".
pub(crate) const LEGACY_NO_CARD: &str = "Nenhum (Débito/Dinheiro)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Card {
    /// Cash, debit or transfer. Always used for income.
    #[default]
    None,
    Nubank,
    MercadoPago,
    C6,
    Elo,
    Azul,
    Caju,
    Other,
}

impl Card {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "N/A",
            Self::Nubank => "Nubank",
            Self::MercadoPago => "Mercado Pago",
            Self::C6 => "C6",
            Self::Elo => "Elo",
            Self::Azul => "Azul",
            Self::Caju => "Caju",
            Self::Other => "Outro",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(LEGACY_NO_CARD) {
            return Some(Self::None);
        }
        let found = match trimmed.to_lowercase().as_str() {
            "" | "n/a" | "na" | "none" | "nenhum" | "debito" | "débito" | "dinheiro" => Self::None,
            "nubank" => Self::Nubank,
            "mercado pago" | "mercadopago" => Self::MercadoPago,
            "c6" => Self::C6,
            "elo" => Self::Elo,
            "azul" => Self::Azul,
            "caju" => Self::Caju,
            "outro" | "other" => Self::Other,
            _ => return None,
        };
        Some(found)
    }

    pub fn all() -> &'static [Card] {
        &[
            Self::None,
            Self::Nubank,
            Self::MercadoPago,
            Self::C6,
            Self::Elo,
            Self::Azul,
            Self::Caju,
            Self::Other,
        ]
    }

    /// Cards that produce a monthly invoice.
    pub fn credit() -> &'static [Card] {
        &[
            Self::Nubank,
            Self::MercadoPago,
            Self::C6,
            Self::Elo,
            Self::Azul,
            Self::Other,
        ]
    }

    pub fn is_card(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Caju is a benefits card: it is swiped like one but never billed.
    pub fn is_credit(&self) -> bool {
        !matches!(self, Self::None | Self::Caju)
    }
}

impl FromStr for Card {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            let known: Vec<&str> = Self::all().iter().map(Card::as_str).collect();
            StoreError::invalid(format!("unknown card '{s}' (one of: {})", known.join(", ")))
        })
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
