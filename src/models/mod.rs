mod budget;
mod card;
mod category;
mod invoice;
mod period;
mod transaction;

pub use budget::BudgetLimit;
pub use card::Card;
#[cfg(test)]
pub(crate) use card::LEGACY_NO_CARD;
pub use category::Category;
pub use invoice::Invoice;
pub use period::{parse_date, DateRange, YearMonth};
pub use transaction::{check_amount, parse_amount, Flow, Transaction, MAX_AMOUNT};

#[cfg(test)]
mod tests;
