mod export;
mod schema;

use rusqlite::types::{Type, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::models::*;

const TRANSACTION_COLUMNS: &str = "id, date, category, description, amount, card";

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> StoreResult<Self> {
        info!(path = %path.display(), "opening database");
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> StoreResult<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            debug!(version = schema::CURRENT_VERSION, "creating schema");
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        let tx = self.conn.transaction()?;
        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                debug!(from_version, "applying migration");
                tx.execute_batch(sql)?;
            }
        }
        if current < schema::CURRENT_VERSION {
            tx.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }
        tx.commit()?;

        Ok(())
    }

    // ── Transactions ──────────────────────────────────────────

    pub(crate) fn create_transaction(&self, txn: &Transaction) -> StoreResult<i64> {
        self.conn.execute(
            "INSERT INTO transactions (date, category, description, amount, card)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                txn.date,
                txn.category.as_str(),
                txn.description,
                txn.amount.to_string(),
                txn.card.as_str(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, amount = %txn.amount, category = %txn.category, "created transaction");
        Ok(id)
    }

    /// Transactions within `range` (inclusive), newest first. `None` returns
    /// every row.
    pub(crate) fn read_transactions(&self, range: Option<&DateRange>) -> StoreResult<Vec<Transaction>> {
        let rows = match range {
            Some(r) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {TRANSACTION_COLUMNS} FROM transactions
                     WHERE date BETWEEN ?1 AND ?2
                     ORDER BY date DESC, id DESC"
                ))?;
                let rows = stmt.query_map(params![r.start, r.end], row_to_transaction)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {TRANSACTION_COLUMNS} FROM transactions
                     ORDER BY date DESC, id DESC"
                ))?;
                let rows = stmt.query_map([], row_to_transaction)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(rows)
    }

    pub(crate) fn get_transaction(&self, id: i64) -> StoreResult<Option<Transaction>> {
        let txn = self
            .conn
            .query_row(
                &format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1"),
                params![id],
                row_to_transaction,
            )
            .optional()?;
        Ok(txn)
    }

    /// Replace every field of transaction `id`.
    pub(crate) fn update_transaction(&self, id: i64, txn: &Transaction) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE transactions
             SET date = ?1, category = ?2, description = ?3, amount = ?4, card = ?5
             WHERE id = ?6",
            params![
                txn.date,
                txn.category.as_str(),
                txn.description,
                txn.amount.to_string(),
                txn.card.as_str(),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "transaction",
                id,
            });
        }
        debug!(id, "updated transaction");
        Ok(())
    }

    pub(crate) fn delete_transaction(&self, id: i64) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "transaction",
                id,
            });
        }
        debug!(id, "deleted transaction");
        Ok(())
    }

    pub(crate) fn transaction_count(&self) -> StoreResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
    }

    // ── Invoices ──────────────────────────────────────────────

    /// Append an invoice. Saving the same card and period twice keeps both.
    pub(crate) fn create_invoice(&self, invoice: &Invoice) -> StoreResult<i64> {
        self.conn.execute(
            "INSERT INTO invoices (card, period, total) VALUES (?1, ?2, ?3)",
            params![
                invoice.card.as_str(),
                invoice.period.to_string(),
                invoice.total.to_string(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, card = %invoice.card, period = %invoice.period, "created invoice");
        Ok(id)
    }

    pub(crate) fn read_invoices(&self) -> StoreResult<Vec<Invoice>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, card, period, total FROM invoices ORDER BY period, id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Invoice {
                id: Some(row.get(0)?),
                card: parse_column(row, 1, Card::parse)?,
                period: parse_column(row, 2, |s| YearMonth::from_str(s).ok())?,
                total: decimal_column(row, 3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // ── Budgets ───────────────────────────────────────────────

    /// Insert or replace the limit for the budget's category.
    pub(crate) fn upsert_budget(&self, budget: &BudgetLimit) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO budgets (category, limit_amount) VALUES (?1, ?2)
             ON CONFLICT(category) DO UPDATE SET limit_amount = excluded.limit_amount",
            params![budget.category.as_str(), budget.limit.to_string()],
        )?;
        debug!(category = %budget.category, limit = %budget.limit, "saved budget");
        Ok(())
    }

    pub(crate) fn read_budgets(&self) -> StoreResult<Vec<BudgetLimit>> {
        let mut stmt = self
            .conn
            .prepare("SELECT category, limit_amount FROM budgets")?;
        let rows = stmt.query_map([], |row| {
            Ok(BudgetLimit {
                category: parse_column(row, 0, Category::parse)?,
                limit: decimal_column(row, 1)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: Some(row.get(0)?),
        date: row.get(1)?,
        category: parse_column(row, 2, Category::parse)?,
        description: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        amount: decimal_column(row, 4)?,
        card: parse_column(row, 5, Card::parse)?,
    })
}

fn parse_column<T>(row: &Row<'_>, idx: usize, parse: impl Fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unrecognized value '{raw}'").into(),
        )
    })
}

/// Amounts are written as decimal text, but rows written by other tools may
/// hold REAL or INTEGER values.
fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let amount = raw_decimal_column(row, idx)?;
    if amount.abs() > MAX_AMOUNT {
        return Err(rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("amount {amount} out of range").into(),
        ));
    }
    Ok(amount)
}

fn raw_decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let fail = |ty: Type, msg: String| rusqlite::Error::FromSqlConversionFailure(idx, ty, msg.into());
    match row.get_ref(idx)? {
        ValueRef::Text(bytes) => {
            let s = std::str::from_utf8(bytes)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))?;
            Decimal::from_str(s.trim()).map_err(|_| fail(Type::Text, format!("invalid amount '{s}'")))
        }
        ValueRef::Real(f) => {
            // Round through the shortest decimal representation so 150.1 stays 150.1.
            Decimal::from_str(&f.to_string())
                .ok()
                .or_else(|| Decimal::from_f64(f))
                .ok_or_else(|| fail(Type::Real, format!("invalid amount {f}")))
        }
        ValueRef::Integer(i) => Ok(Decimal::from(i)),
        ValueRef::Null => Err(fail(Type::Null, "amount is null".into())),
        ValueRef::Blob(_) => Err(fail(Type::Blob, "amount is a blob".into())),
    }
}
