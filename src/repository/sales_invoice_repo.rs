// ==========================================
// Accurate 导入服务 - 销售发票数据仓储
// ==========================================
// 对齐: sales_invoices 表
// ==========================================

use crate::domain::sales_invoice::{NewSalesInvoice, SalesInvoice};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str =
    "id, accurate_id, invoice_number, customer_name, amount, status, date, created_at";

pub struct SalesInvoiceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SalesInvoiceRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<SalesInvoice> {
        Ok(SalesInvoice {
            id: row.get(0)?,
            accurate_id: row.get(1)?,
            invoice_number: row.get(2)?,
            customer_name: row.get(3)?,
            amount: row.get(4)?,
            status: row.get(5)?,
            date: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    pub fn create(&self, new: &NewSalesInvoice) -> RepositoryResult<SalesInvoice> {
        let conn = self.get_conn()?;
        let created_at = Utc::now();

        conn.execute(
            r#"
            INSERT INTO sales_invoices (
                accurate_id, invoice_number, customer_name, amount, status, date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                new.accurate_id,
                new.invoice_number,
                new.customer_name,
                new.amount,
                new.status,
                new.date,
                created_at,
            ],
        )?;

        Ok(SalesInvoice {
            id: conn.last_insert_rowid(),
            accurate_id: new.accurate_id.clone(),
            invoice_number: new.invoice_number.clone(),
            customer_name: new.customer_name.clone(),
            amount: new.amount,
            status: new.status.clone(),
            date: new.date.clone(),
            created_at,
        })
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<SalesInvoice>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM sales_invoices WHERE id = ?1", SELECT_COLUMNS);
        Ok(conn.query_row(&sql, params![id], Self::map_row).optional()?)
    }

    pub fn find_by_accurate_id(&self, accurate_id: &str) -> RepositoryResult<Option<SalesInvoice>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM sales_invoices WHERE accurate_id = ?1 ORDER BY id ASC LIMIT 1",
            SELECT_COLUMNS
        );
        Ok(conn
            .query_row(&sql, params![accurate_id], Self::map_row)
            .optional()?)
    }

    pub fn list(&self) -> RepositoryResult<Vec<SalesInvoice>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM sales_invoices ORDER BY id ASC", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let invoices = stmt
            .query_map([], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(invoices)
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        Ok(conn.query_row("SELECT COUNT(*) FROM sales_invoices", [], |row| row.get(0))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{open_store, IN_MEMORY_PATH};

    fn invoice(number: &str, accurate_id: Option<&str>) -> NewSalesInvoice {
        NewSalesInvoice {
            accurate_id: accurate_id.map(str::to_string),
            invoice_number: number.to_string(),
            customer_name: "Customer ABC".to_string(),
            amount: 150_000_000,
            status: "paid".to_string(),
            date: "2024-01-15".to_string(),
        }
    }

    #[test]
    fn test_create_and_lookup() {
        let repo = SalesInvoiceRepository::new(open_store(IN_MEMORY_PATH).unwrap());
        let created = repo.create(&invoice("INV-2024-001", Some("55"))).unwrap();

        let by_id = repo.find_by_id(created.id).unwrap().unwrap();
        assert_eq!(by_id.invoice_number, "INV-2024-001");
        assert_eq!(by_id.amount, 150_000_000);

        let by_remote = repo.find_by_accurate_id("55").unwrap().unwrap();
        assert_eq!(by_remote.id, created.id);
        assert!(repo.find_by_accurate_id("56").unwrap().is_none());
    }

    #[test]
    fn test_list_in_insert_order() {
        let repo = SalesInvoiceRepository::new(open_store(IN_MEMORY_PATH).unwrap());
        repo.create(&invoice("A", None)).unwrap();
        repo.create(&invoice("B", None)).unwrap();

        let numbers: Vec<_> = repo
            .list()
            .unwrap()
            .into_iter()
            .map(|i| i.invoice_number)
            .collect();
        assert_eq!(numbers, vec!["A", "B"]);
        assert_eq!(repo.count().unwrap(), 2);
    }
}
