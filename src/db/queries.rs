use rusqlite::{params, Connection};

use crate::models::{ChatMessage, DemoBooking};

// ── Demo bookings ──

pub fn insert_demo_booking(conn: &Connection, booking: &DemoBooking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO demo_bookings (id, name, email, company, phone, product_interest, preferred_date, message, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            booking.id,
            booking.name,
            booking.email,
            booking.company,
            booking.phone,
            booking.product_interest,
            booking.preferred_date,
            booking.message,
            booking.created_at,
        ],
    )?;
    Ok(())
}

const BOOKING_COLUMNS: &str =
    "id, name, email, company, phone, product_interest, preferred_date, message, created_at";

pub fn get_demo_bookings(
    conn: &Connection,
    product_filter: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<DemoBooking>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match product_filter {
        Some(product) => (
            format!(
                "SELECT {BOOKING_COLUMNS} FROM demo_bookings \
                 WHERE product_interest = ?1 COLLATE NOCASE ORDER BY created_at DESC, rowid DESC LIMIT ?2"
            ),
            vec![
                Box::new(product.to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
            ],
        ),
        None => (
            format!(
                "SELECT {BOOKING_COLUMNS} FROM demo_bookings ORDER BY created_at DESC, rowid DESC LIMIT ?1"
            ),
            vec![Box::new(limit) as Box<dyn rusqlite::types::ToSql>],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), parse_booking_row)?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

pub fn get_demo_booking_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<DemoBooking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM demo_bookings WHERE id = ?1"),
        params![id],
        parse_booking_row,
    );

    match result {
        Ok(booking) => Ok(Some(booking)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn parse_booking_row(row: &rusqlite::Row) -> rusqlite::Result<DemoBooking> {
    Ok(DemoBooking {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        company: row.get(3)?,
        phone: row.get(4)?,
        product_interest: row.get(5)?,
        preferred_date: row.get(6)?,
        message: row.get(7)?,
        created_at: row.get(8)?,
    })
}

// ── Chat transcripts ──

pub fn load_transcript(conn: &Connection, key: &str) -> anyhow::Result<Vec<ChatMessage>> {
    let result = conn.query_row(
        "SELECT messages FROM chat_transcripts WHERE key = ?1",
        params![key],
        |row| row.get::<_, String>(0),
    );

    match result {
        Ok(json) => Ok(serde_json::from_str(&json).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "unreadable transcript, starting fresh");
            Vec::new()
        })),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

pub fn save_transcript(conn: &Connection, key: &str, messages: &[ChatMessage]) -> anyhow::Result<()> {
    let json = serde_json::to_string(messages)?;
    conn.execute(
        "INSERT INTO chat_transcripts (key, messages) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET
           messages = excluded.messages,
           updated_at = datetime('now')",
        params![key, json],
    )?;
    Ok(())
}

pub fn delete_transcript(conn: &Connection, key: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM chat_transcripts WHERE key = ?1", params![key])?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::Role;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn booking(id: &str, product: &str, created_at: &str) -> DemoBooking {
        DemoBooking {
            id: id.to_string(),
            name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            company: "Acme".to_string(),
            phone: "+1 555 1234567".to_string(),
            product_interest: product.to_string(),
            preferred_date: Some("2025-06-23T10:00:00+00:00".to_string()),
            message: Some("Attendees: 3".to_string()),
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn test_insert_and_get_booking() {
        let conn = setup_db();
        insert_demo_booking(&conn, &booking("b-1", "Ayura", "2025-06-16 09:00:00")).unwrap();

        let found = get_demo_booking_by_id(&conn, "b-1").unwrap().unwrap();
        assert_eq!(found.product_interest, "Ayura");
        assert_eq!(found.preferred_date.as_deref(), Some("2025-06-23T10:00:00+00:00"));
        assert!(get_demo_booking_by_id(&conn, "missing").unwrap().is_none());
    }

    #[test]
    fn test_list_bookings_newest_first_with_filter() {
        let conn = setup_db();
        insert_demo_booking(&conn, &booking("b-1", "Ayura", "2025-06-16 09:00:00")).unwrap();
        insert_demo_booking(&conn, &booking("b-2", "NexaKYC", "2025-06-16 10:00:00")).unwrap();
        insert_demo_booking(&conn, &booking("b-3", "Ayura", "2025-06-16 11:00:00")).unwrap();

        let all = get_demo_bookings(&conn, None, 50).unwrap();
        let ids: Vec<&str> = all.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b-3", "b-2", "b-1"]);

        let ayura = get_demo_bookings(&conn, Some("ayura"), 50).unwrap();
        assert_eq!(ayura.len(), 2);

        let limited = get_demo_bookings(&conn, None, 1).unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_transcript_roundtrip_and_overwrite() {
        let conn = setup_db();
        assert!(load_transcript(&conn, "k").unwrap().is_empty());

        let first = vec![ChatMessage::new(Role::User, "hi")];
        save_transcript(&conn, "k", &first).unwrap();
        assert_eq!(load_transcript(&conn, "k").unwrap(), first);

        let second = vec![
            ChatMessage::new(Role::User, "hi"),
            ChatMessage::new(Role::Bot, "Hello!"),
        ];
        save_transcript(&conn, "k", &second).unwrap();
        assert_eq!(load_transcript(&conn, "k").unwrap().len(), 2);

        assert!(delete_transcript(&conn, "k").unwrap());
        assert!(load_transcript(&conn, "k").unwrap().is_empty());
    }
}
