//! Key/value settings.

use rb_core::{Error, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::models::Setting;

/// Get a setting's value, if set.
pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
        row.get(0)
    })
    .optional()
    .map_err(|e| Error::database(e.to_string()))
}

/// Insert or overwrite a setting.
pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT (key) DO UPDATE SET value = excluded.value",
        [key, value],
    )
    .map_err(|e| Error::database(e.to_string()))?;
    Ok(())
}

/// List all settings ordered by key.
pub fn list_settings(conn: &Connection) -> Result<Vec<Setting>> {
    let mut stmt = conn
        .prepare("SELECT key, value FROM settings ORDER BY key")
        .map_err(|e| Error::database(e.to_string()))?;
    let rows = stmt
        .query_map([], Setting::from_row)
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(rows)
}

/// Remove a setting.
pub fn delete_setting(conn: &Connection, key: &str) -> Result<bool> {
    let n = conn
        .execute("DELETE FROM settings WHERE key = ?1", [key])
        .map_err(|e| Error::database(e.to_string()))?;
    Ok(n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::init_memory_pool;

    #[test]
    fn set_get_overwrite_delete() {
        let pool = init_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        assert_eq!(get_setting(&conn, "lang").unwrap(), None);
        set_setting(&conn, "lang", "en").unwrap();
        set_setting(&conn, "lang", "fr").unwrap();
        assert_eq!(get_setting(&conn, "lang").unwrap().as_deref(), Some("fr"));

        set_setting(&conn, "api_version", "2.1").unwrap();
        let keys: Vec<_> = list_settings(&conn).unwrap().into_iter().map(|s| s.key).collect();
        assert_eq!(keys, vec!["api_version", "lang"]);

        assert!(delete_setting(&conn, "lang").unwrap());
        assert!(!delete_setting(&conn, "lang").unwrap());
    }
}
