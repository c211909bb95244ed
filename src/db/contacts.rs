use rusqlite::params;

use super::*;

impl ContactDb {
    // =========================================================================
    // Users
    // =========================================================================

    /// Insert or rename a user account.
    pub fn upsert_user(&self, id: &str, name: Option<&str>) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO users (id, name) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET name = COALESCE(excluded.name, users.name)",
            params![id, name],
        )?;
        Ok(())
    }

    /// Record an email address for a user (stored normalized, INSERT OR IGNORE).
    pub fn add_user_email(&self, user_id: &str, email: &str) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO user_emails (user_id, email) VALUES (?1, ?2)",
            params![user_id, normalize_email(email)],
        )?;
        Ok(())
    }

    /// All email addresses known for a user, normalized.
    pub fn get_user_emails(&self, user_id: &str) -> Result<Vec<String>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT email FROM user_emails WHERE user_id = ?1 ORDER BY email")?;
        let rows = stmt.query_map(params![user_id], |row| row.get::<_, String>(0))?;
        let mut emails = Vec::new();
        for row in rows {
            emails.push(normalize_email(&row?));
        }
        Ok(emails)
    }

    // =========================================================================
    // Contacts
    // =========================================================================

    /// Insert or update a contact row, including its score columns.
    pub fn upsert_contact(&self, contact: &DbContact) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO contacts (id, user_id, name, relationship_strength, relationship_strength_time)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                user_id = excluded.user_id,
                name = COALESCE(excluded.name, contacts.name),
                relationship_strength = excluded.relationship_strength,
                relationship_strength_time = excluded.relationship_strength_time",
            params![
                contact.id,
                contact.user_id,
                contact.name,
                contact.relationship_strength,
                contact.relationship_strength_time,
            ],
        )?;
        Ok(())
    }

    pub fn get_contact(&self, id: &str) -> Result<Option<DbContact>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name, relationship_strength, relationship_strength_time
             FROM contacts WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map(params![id], Self::map_contact_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// The `limit` contacts scored longest ago, stalest first.
    ///
    /// Ties keep storage (rowid) order.
    pub fn get_stalest_contacts(&self, limit: usize) -> Result<Vec<DbContact>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name, relationship_strength, relationship_strength_time
             FROM contacts
             ORDER BY relationship_strength_time ASC, rowid ASC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], Self::map_contact_row)?;
        let mut contacts = Vec::new();
        for row in rows {
            contacts.push(row?);
        }
        Ok(contacts)
    }

    /// Write a new score and scoring time for one contact.
    ///
    /// Returns false when the contact no longer exists.
    pub fn update_relationship_strength(
        &self,
        contact_id: &str,
        strength: f64,
        scored_at: i64,
    ) -> Result<bool, DbError> {
        let changed = self.conn.execute(
            "UPDATE contacts
             SET relationship_strength = ?2, relationship_strength_time = ?3
             WHERE id = ?1",
            params![contact_id, strength, scored_at],
        )?;
        Ok(changed > 0)
    }

    fn map_contact_row(row: &rusqlite::Row) -> rusqlite::Result<DbContact> {
        Ok(DbContact {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            relationship_strength: row.get(3)?,
            relationship_strength_time: row.get(4)?,
        })
    }

    // =========================================================================
    // Contact jobs
    // =========================================================================

    pub fn add_contact_job(&self, contact_id: &str, job: &Tenure) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO jobs (contact_id, company, start_time, end_time) VALUES (?1, ?2, ?3, ?4)",
            params![contact_id, job.company, job.start_time, job.end_time],
        )?;
        Ok(())
    }

    pub fn get_contact_jobs(&self, contact_id: &str) -> Result<Vec<Tenure>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT company, start_time, end_time FROM jobs WHERE contact_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![contact_id], map_tenure_row)?;
        let mut jobs = Vec::new();
        for row in rows {
            jobs.push(row?);
        }
        Ok(jobs)
    }
}

pub(super) fn map_tenure_row(row: &rusqlite::Row) -> rusqlite::Result<Tenure> {
    Ok(Tenure {
        company: row.get(0)?,
        start_time: row.get(1)?,
        end_time: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::test_db;
    use super::*;

    fn contact(id: &str, user_id: Option<&str>, scored_at: i64) -> DbContact {
        DbContact {
            id: id.to_string(),
            user_id: user_id.map(str::to_string),
            name: Some(format!("Contact {}", id)),
            relationship_strength: 0.0,
            relationship_strength_time: scored_at,
        }
    }

    #[test]
    fn test_user_emails_are_lowercased() {
        let db = test_db();
        db.upsert_user("u1", Some("Ada")).expect("user");
        db.add_user_email("u1", "Ada@Example.COM").expect("email");
        db.add_user_email("u1", "ada@example.com").expect("duplicate ignored");

        let emails = db.get_user_emails("u1").expect("emails");
        assert_eq!(emails, vec!["ada@example.com".to_string()]);
    }

    #[test]
    fn test_user_emails_fold_non_ascii_case() {
        let db = test_db();
        db.upsert_user("u1", None).expect("user");
        db.add_user_email("u1", "JÖRG@Example.com").expect("email");
        db.add_user_email("u1", "jörg@example.com").expect("same address, ignored");

        let emails = db.get_user_emails("u1").expect("emails");
        assert_eq!(emails, vec!["jörg@example.com".to_string()]);
    }

    #[test]
    fn test_stalest_contacts_ordering_and_limit() {
        let db = test_db();
        db.upsert_user("u1", None).expect("user");
        for (id, t) in [("c1", 300), ("c2", 100), ("c3", 200), ("c4", 0)] {
            db.upsert_contact(&contact(id, Some("u1"), t)).expect("contact");
        }

        let stalest = db.get_stalest_contacts(3).expect("query");
        let ids: Vec<&str> = stalest.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c4", "c2", "c3"]);
    }

    #[test]
    fn test_stalest_contacts_fewer_than_limit() {
        let db = test_db();
        db.upsert_contact(&contact("c1", None, 5)).expect("contact");
        let stalest = db.get_stalest_contacts(20).expect("query");
        assert_eq!(stalest.len(), 1);
    }

    #[test]
    fn test_update_relationship_strength() {
        let db = test_db();
        db.upsert_contact(&contact("c1", None, 0)).expect("contact");

        assert!(db
            .update_relationship_strength("c1", 4.25, 1_700_000_000)
            .expect("update"));
        let stored = db.get_contact("c1").expect("get").expect("exists");
        assert_eq!(stored.relationship_strength, 4.25);
        assert_eq!(stored.relationship_strength_time, 1_700_000_000);

        assert!(!db
            .update_relationship_strength("missing", 1.0, 1)
            .expect("update missing"));
    }

    #[test]
    fn test_contact_jobs_preserve_null_bounds() {
        let db = test_db();
        db.upsert_contact(&contact("c1", None, 0)).expect("contact");
        db.add_contact_job("c1", &Tenure::new("Acme", Some(100), None))
            .expect("job");
        db.add_contact_job("c1", &Tenure::new("Globex", None, None))
            .expect("job");

        let jobs = db.get_contact_jobs("c1").expect("jobs");
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0], Tenure::new("Acme", Some(100), None));
        assert_eq!(jobs[1], Tenure::new("Globex", None, None));
    }
}
