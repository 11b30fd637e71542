use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

use messagely_db::models::{CounterpartMessageRow, ProfileRow, PublicUserRow, UserRow};
use messagely_types::models::{Account, AccountProfile, PublicAccount, ReceivedMessage, SentMessage};

pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // Rows written by hand or by older tooling use SQLite's
            // "YYYY-MM-DD HH:MM:SS" without a zone. Read them as UTC.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .map_err(|e| anyhow!("Corrupt timestamp '{}': {}", raw, e))
}

fn parse_optional(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    raw.map(parse_timestamp).transpose()
}

pub(crate) fn account(row: UserRow) -> Result<Account> {
    Ok(Account {
        joined_at: parse_timestamp(&row.join_at)?,
        last_login_at: parse_optional(row.last_login_at.as_deref())?,
        username: row.username,
        credential_hash: row.password,
        first_name: row.first_name,
        last_name: row.last_name,
        phone: row.phone,
    })
}

pub(crate) fn public(row: PublicUserRow) -> PublicAccount {
    PublicAccount {
        username: row.username,
        first_name: row.first_name,
        last_name: row.last_name,
        phone: row.phone,
    }
}

pub(crate) fn profile(row: ProfileRow) -> Result<AccountProfile> {
    Ok(AccountProfile {
        joined_at: parse_timestamp(&row.join_at)?,
        last_login_at: parse_optional(row.last_login_at.as_deref())?,
        username: row.username,
        first_name: row.first_name,
        last_name: row.last_name,
        phone: row.phone,
    })
}

pub(crate) fn sent(row: CounterpartMessageRow) -> Result<SentMessage> {
    Ok(SentMessage {
        id: row.id,
        sent_at: parse_timestamp(&row.sent_at)?,
        read_at: parse_optional(row.read_at.as_deref())?,
        to_user: public(row.counterpart),
        body: row.body,
    })
}

pub(crate) fn received(row: CounterpartMessageRow) -> Result<ReceivedMessage> {
    Ok(ReceivedMessage {
        id: row.id,
        sent_at: parse_timestamp(&row.sent_at)?,
        read_at: parse_optional(row.read_at.as_deref())?,
        from_user: public(row.counterpart),
        body: row.body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_round_trip_with_subsecond_precision() {
        let now = Utc::now();
        assert_eq!(parse_timestamp(&format_timestamp(now)).unwrap(), now);
    }

    #[test]
    fn accepts_sqlite_datetime_format() {
        let parsed = parse_timestamp("2024-03-01 12:30:00").unwrap();
        assert_eq!(format_timestamp(parsed), "2024-03-01T12:30:00.000000000Z");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
    }
}
