//! Administrator account and password storage.
//!
//! Passwords are stored as a salted SHA-256 digest in the `passwords` table,
//! keyed by the owning user's id.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};

/// User name of the built-in administrator account.
pub const ADMIN_USER: &str = "admin";

/// Create the administrator account if it does not exist. Returns its id.
pub fn ensure_admin_user(conn: &Connection) -> Result<i64> {
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT OR IGNORE INTO users (user_name, display_name, role, created_at, updated_at)
         VALUES (?1, 'Admin', 'admin', ?2, ?2)",
        params![ADMIN_USER, now],
    )
    .context("failed to create admin user")?;

    let id = conn.query_row(
        "SELECT id FROM users WHERE user_name = ?1",
        [ADMIN_USER],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// Set the administrator password, creating the account when missing.
pub fn init_admin_password(conn: &Connection, password: &str) -> Result<()> {
    anyhow::ensure!(!password.is_empty(), "admin password must not be empty");

    let user_id = ensure_admin_user(conn)?;
    let salt = uuid::Uuid::new_v4().simple().to_string();
    let hash = hash_password(&salt, password);
    let now = chrono::Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO passwords (user_id, salt, hash, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?4)
         ON CONFLICT(user_id) DO UPDATE SET salt = ?2, hash = ?3, updated_at = ?4",
        params![user_id, salt, hash, now],
    )
    .context("failed to store admin password")?;

    tracing::debug!(user = ADMIN_USER, "admin password stored");
    Ok(())
}

/// Whether the administrator account has a password set.
pub fn admin_has_password(conn: &Connection) -> Result<bool> {
    let has: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM passwords p JOIN users u ON u.id = p.user_id
         WHERE u.user_name = ?1",
        [ADMIN_USER],
        |row| row.get(0),
    )?;
    Ok(has)
}

/// Check `password` against the stored credential of `user_name`.
///
/// Returns `false` when the user or their password row does not exist.
pub fn verify_password(conn: &Connection, user_name: &str, password: &str) -> Result<bool> {
    let stored: Option<(String, String)> = conn
        .query_row(
            "SELECT p.salt, p.hash FROM passwords p JOIN users u ON u.id = p.user_id
             WHERE u.user_name = ?1",
            [user_name],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    Ok(stored.is_some_and(|(salt, hash)| hash_password(&salt, password) == hash))
}

fn hash_password(salt: &str, password: &str) -> String {
    let digest = Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(password.as_bytes())
        .finalize();
    format!("{digest:x}")
}
