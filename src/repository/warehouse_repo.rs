// ==========================================
// Accurate 导入服务 - 仓库数据仓储
// ==========================================
// 对齐: warehouses 表
// 红线: Repository 不做业务逻辑, 只做数据映射
// ==========================================

use crate::domain::warehouse::{NewWarehouse, Warehouse};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = "id, accurate_id, name, description, created_at";

pub struct WarehouseRepository {
    conn: Arc<Mutex<Connection>>,
}

impl WarehouseRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Warehouse> {
        Ok(Warehouse {
            id: row.get(0)?,
            accurate_id: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入仓库, 返回带自增 id 的实体
    pub fn create(&self, new: &NewWarehouse) -> RepositoryResult<Warehouse> {
        let conn = self.get_conn()?;
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO warehouses (accurate_id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![new.accurate_id, new.name, new.description, created_at],
        )?;

        Ok(Warehouse {
            id: conn.last_insert_rowid(),
            accurate_id: new.accurate_id.clone(),
            name: new.name.clone(),
            description: new.description.clone(),
            created_at,
        })
    }

    /// 更新名称与描述
    pub fn update(&self, id: i64, name: &str, description: Option<&str>) -> RepositoryResult<Warehouse> {
        {
            let conn = self.get_conn()?;
            let rows = conn.execute(
                "UPDATE warehouses SET name = ?1, description = ?2 WHERE id = ?3",
                params![name, description, id],
            )?;
            if rows == 0 {
                return Err(RepositoryError::NotFound {
                    entity: "Warehouse",
                    id,
                });
            }
        }
        self.find_by_id(id)?.ok_or_else(|| RepositoryError::NotFound {
            entity: "Warehouse",
            id,
        })
    }

    /// 删除仓库, 返回是否存在
    pub fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let rows = conn.execute("DELETE FROM warehouses WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // ==========================================
    // 查询操作
    // ==========================================

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Warehouse>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM warehouses WHERE id = ?1", SELECT_COLUMNS);
        let warehouse = conn
            .query_row(&sql, params![id], Self::map_row)
            .optional()?;
        Ok(warehouse)
    }

    /// 按远端 id 查找 (无唯一约束, 取最早一条)
    pub fn find_by_accurate_id(&self, accurate_id: &str) -> RepositoryResult<Option<Warehouse>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM warehouses WHERE accurate_id = ?1 ORDER BY id ASC LIMIT 1",
            SELECT_COLUMNS
        );
        let warehouse = conn
            .query_row(&sql, params![accurate_id], Self::map_row)
            .optional()?;
        Ok(warehouse)
    }

    pub fn list(&self) -> RepositoryResult<Vec<Warehouse>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM warehouses ORDER BY id ASC", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let warehouses = stmt
            .query_map([], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(warehouses)
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM warehouses", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{open_store, IN_MEMORY_PATH};

    fn setup_repo() -> WarehouseRepository {
        WarehouseRepository::new(open_store(IN_MEMORY_PATH).unwrap())
    }

    fn new_warehouse(name: &str, accurate_id: Option<&str>) -> NewWarehouse {
        NewWarehouse {
            accurate_id: accurate_id.map(str::to_string),
            name: name.to_string(),
            description: Some(format!("{} description", name)),
        }
    }

    #[test]
    fn test_create_assigns_increasing_ids() {
        let repo = setup_repo();
        let a = repo.create(&new_warehouse("A", Some("1"))).unwrap();
        let b = repo.create(&new_warehouse("B", None)).unwrap();
        assert!(b.id > a.id);
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_find_by_accurate_id() {
        let repo = setup_repo();
        repo.create(&new_warehouse("A", Some("100"))).unwrap();

        let found = repo.find_by_accurate_id("100").unwrap().unwrap();
        assert_eq!(found.name, "A");
        assert!(repo.find_by_accurate_id("200").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_accurate_ids_allowed() {
        let repo = setup_repo();
        repo.create(&new_warehouse("A", Some("7"))).unwrap();
        repo.create(&new_warehouse("A again", Some("7"))).unwrap();
        assert_eq!(repo.list().unwrap().len(), 2);
    }

    #[test]
    fn test_update_and_delete() {
        let repo = setup_repo();
        let w = repo.create(&new_warehouse("A", None)).unwrap();

        let updated = repo.update(w.id, "A2", None).unwrap();
        assert_eq!(updated.name, "A2");
        assert!(updated.description.is_none());

        assert!(repo.delete(w.id).unwrap());
        assert!(!repo.delete(w.id).unwrap());
        assert!(repo.find_by_id(w.id).unwrap().is_none());
        assert!(matches!(
            repo.update(w.id, "x", None),
            Err(RepositoryError::NotFound { .. })
        ));
    }
}
