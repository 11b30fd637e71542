/// Database row types, mapped column-for-column from SQLite.
/// Timestamps stay as stored text; callers convert them.

pub struct UserRow {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub join_at: String,
    pub last_login_at: Option<String>,
}

pub struct PublicUserRow {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

pub struct ProfileRow {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub join_at: String,
    pub last_login_at: Option<String>,
}

/// One message joined with the account on the other end of it: the
/// recipient when listing sent messages, the sender when listing received ones.
pub struct CounterpartMessageRow {
    pub id: i64,
    pub counterpart: PublicUserRow,
    pub body: String,
    pub sent_at: String,
    pub read_at: Option<String>,
}

/// Insert payload for a new account. `last_login_at` always starts NULL.
pub struct NewUserRow<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub join_at: &'a str,
}
