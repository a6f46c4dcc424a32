use libsql::{params, Connection};

use crate::error::Result;
use crate::models::User;

pub struct UserRepository;

const USER_COLUMNS: &str =
    "id, username, omi_id, base_wallet, eth_wallet, polygon_wallet, arbitrum_wallet";

impl UserRepository {
    pub async fn get_by_device_id(conn: &Connection, device_id: &str) -> Result<Option<User>> {
        let mut rows = conn
            .query(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE omi_id = ?1"),
                params![device_id],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_user(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn get_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
        let mut rows = conn
            .query(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
                params![username],
            )
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_user(&row)?))
        } else {
            Ok(None)
        }
    }

    pub async fn list_usernames(conn: &Connection) -> Result<Vec<String>> {
        let mut rows = conn
            .query("SELECT username FROM users ORDER BY username", ())
            .await?;

        let mut usernames = Vec::new();
        while let Some(row) = rows.next().await? {
            usernames.push(row.get(0)?);
        }
        Ok(usernames)
    }

    fn row_to_user(row: &libsql::Row) -> Result<User> {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            omi_id: row.get(2)?,
            base_wallet: row.get(3)?,
            eth_wallet: row.get(4)?,
            polygon_wallet: row.get(5)?,
            arbitrum_wallet: row.get(6)?,
        })
    }
}
