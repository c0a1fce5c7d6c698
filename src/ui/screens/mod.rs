pub(crate) mod budgets;
pub(crate) mod cards;
pub(crate) mod dashboard;
pub(crate) mod transactions;
