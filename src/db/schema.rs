pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS transactions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    date        TEXT NOT NULL,
    category    TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    amount      TEXT NOT NULL,
    card        TEXT NOT NULL DEFAULT 'N/A'
);

CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category);

CREATE TABLE IF NOT EXISTS invoices (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    card    TEXT NOT NULL,
    period  TEXT NOT NULL,
    total   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_invoices_period ON invoices(period);

CREATE TABLE IF NOT EXISTS budgets (
    category      TEXT PRIMARY KEY,
    limit_amount  TEXT NOT NULL
);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];
