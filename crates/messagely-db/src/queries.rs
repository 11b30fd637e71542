use crate::models::{CounterpartMessageRow, NewUserRow, ProfileRow, PublicUserRow, UserRow};
use crate::Database;
use anyhow::Result;
use rusqlite::{Connection, ErrorCode, Row};

impl Database {
    // -- Users --

    /// Insert a new user and return the stored row.
    /// Returns `None` if the username is already taken.
    pub fn insert_user(&self, user: &NewUserRow<'_>) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let inserted = conn.query_row(
                "INSERT INTO users (username, password, first_name, last_name, phone, join_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING username, password, first_name, last_name, phone, join_at, last_login_at",
                rusqlite::params![
                    user.username,
                    user.password,
                    user.first_name,
                    user.last_name,
                    user.phone,
                    user.join_at
                ],
                map_user,
            );

            match inserted {
                Ok(row) => Ok(Some(row)),
                Err(e) if is_unique_violation(&e) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    /// Set `last_login_at`. Returns the number of rows touched (0 for an
    /// unknown username).
    pub fn update_last_login(&self, username: &str, at: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET last_login_at = ?1 WHERE username = ?2",
                (at, username),
            )?;
            Ok(changed)
        })
    }

    pub fn list_users(&self) -> Result<Vec<PublicUserRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT username, first_name, last_name, phone FROM users")?;

            let rows = stmt
                .query_map([], |row| map_public_user(row, 0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn get_user_profile(&self, username: &str) -> Result<Option<ProfileRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT username, first_name, last_name, phone, join_at, last_login_at
                 FROM users WHERE username = ?1",
            )?;

            let row = stmt
                .query_row([username], |row| {
                    Ok(ProfileRow {
                        username: row.get(0)?,
                        first_name: row.get(1)?,
                        last_name: row.get(2)?,
                        phone: row.get(3)?,
                        join_at: row.get(4)?,
                        last_login_at: row.get(5)?,
                    })
                })
                .optional()?;

            Ok(row)
        })
    }

    // -- Messages --

    /// Messages sent by `username`, each joined with its recipient.
    pub fn messages_from(&self, username: &str) -> Result<Vec<CounterpartMessageRow>> {
        self.with_conn(|conn| {
            query_counterpart_messages(
                conn,
                "SELECT m.id, u.username, u.first_name, u.last_name, u.phone,
                        m.body, m.sent_at, m.read_at
                 FROM messages AS m
                 JOIN users AS u ON m.to_username = u.username
                 WHERE m.from_username = ?1
                 ORDER BY m.id",
                username,
            )
        })
    }

    /// Messages addressed to `username`, each joined with its sender.
    pub fn messages_to(&self, username: &str) -> Result<Vec<CounterpartMessageRow>> {
        self.with_conn(|conn| {
            query_counterpart_messages(
                conn,
                "SELECT m.id, u.username, u.first_name, u.last_name, u.phone,
                        m.body, m.sent_at, m.read_at
                 FROM messages AS m
                 JOIN users AS u ON m.from_username = u.username
                 WHERE m.to_username = ?1
                 ORDER BY m.id",
                username,
            )
        })
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT username, password, first_name, last_name, phone, join_at, last_login_at
         FROM users WHERE username = ?1",
    )?;

    let row = stmt.query_row([username], map_user).optional()?;

    Ok(row)
}

fn query_counterpart_messages(
    conn: &Connection,
    sql: &str,
    username: &str,
) -> Result<Vec<CounterpartMessageRow>> {
    let mut stmt = conn.prepare(sql)?;

    let rows = stmt
        .query_map([username], |row| {
            Ok(CounterpartMessageRow {
                id: row.get(0)?,
                counterpart: map_public_user(row, 1)?,
                body: row.get(5)?,
                sent_at: row.get(6)?,
                read_at: row.get(7)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        username: row.get(0)?,
        password: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        phone: row.get(4)?,
        join_at: row.get(5)?,
        last_login_at: row.get(6)?,
    })
}

/// Read `username, first_name, last_name, phone` starting at column `start`.
fn map_public_user(row: &Row<'_>, start: usize) -> rusqlite::Result<PublicUserRow> {
    Ok(PublicUserRow {
        username: row.get(start)?,
        first_name: row.get(start + 1)?,
        last_name: row.get(start + 2)?,
        phone: row.get(start + 3)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && matches!(
                    e.extended_code,
                    rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                        | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                )
        }
        _ => false,
    }
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user<'a>(username: &'a str, first_name: &'a str) -> NewUserRow<'a> {
        NewUserRow {
            username,
            password: "hash",
            first_name,
            last_name: "Test",
            phone: "555-0100",
            join_at: "2024-01-01T00:00:00Z",
        }
    }

    fn seed_message(db: &Database, from: &str, to: &str, body: &str) {
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (from_username, to_username, body, sent_at)
                 VALUES (?1, ?2, ?3, '2024-01-02T00:00:00Z')",
                (from, to, body),
            )?;
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn insert_returns_stored_row() {
        let db = Database::open_in_memory().unwrap();
        let row = db.insert_user(&new_user("alice", "Alice")).unwrap().unwrap();

        assert_eq!(row.username, "alice");
        assert_eq!(row.password, "hash");
        assert_eq!(row.join_at, "2024-01-01T00:00:00Z");
        assert!(row.last_login_at.is_none());
    }

    #[test]
    fn duplicate_username_is_reported_as_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.insert_user(&new_user("alice", "Alice")).unwrap().is_some());
        assert!(db.insert_user(&new_user("alice", "Other")).unwrap().is_none());

        // first insert untouched
        let row = db.get_user_by_username("alice").unwrap().unwrap();
        assert_eq!(row.first_name, "Alice");
    }

    #[test]
    fn update_last_login_counts_rows() {
        let db = Database::open_in_memory().unwrap();
        db.insert_user(&new_user("alice", "Alice")).unwrap();

        assert_eq!(db.update_last_login("alice", "2024-01-03T00:00:00Z").unwrap(), 1);
        assert_eq!(db.update_last_login("nobody", "2024-01-03T00:00:00Z").unwrap(), 0);

        let profile = db.get_user_profile("alice").unwrap().unwrap();
        assert_eq!(profile.last_login_at.as_deref(), Some("2024-01-03T00:00:00Z"));
    }

    #[test]
    fn missing_profile_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_user_profile("ghost").unwrap().is_none());
    }

    #[test]
    fn message_joins_resolve_the_counterpart() {
        let db = Database::open_in_memory().unwrap();
        db.insert_user(&new_user("alice", "Alice")).unwrap();
        db.insert_user(&new_user("bob", "Bob")).unwrap();
        db.insert_user(&new_user("carol", "Carol")).unwrap();
        seed_message(&db, "alice", "bob", "hi bob");
        seed_message(&db, "carol", "bob", "hey bob");
        seed_message(&db, "bob", "alice", "hi alice");

        let sent = db.messages_from("alice").unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].counterpart.username, "bob");
        assert_eq!(sent[0].counterpart.first_name, "Bob");

        // the sender, not the recipient, must be joined in
        let received = db.messages_to("bob").unwrap();
        let senders: Vec<_> = received.iter().map(|m| m.counterpart.username.as_str()).collect();
        assert_eq!(senders, vec!["alice", "carol"]);
        assert_eq!(received[1].counterpart.first_name, "Carol");
        assert_eq!(received[0].body, "hi bob");
    }

    #[test]
    fn message_to_unknown_user_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        db.insert_user(&new_user("alice", "Alice")).unwrap();

        let result = db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (from_username, to_username, body, sent_at)
                 VALUES ('alice', 'ghost', 'x', '2024-01-02T00:00:00Z')",
                [],
            )?;
            Ok(())
        });
        assert!(result.is_err());
    }
}
