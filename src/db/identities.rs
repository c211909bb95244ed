use rusqlite::params;

use super::*;

impl ContactDb {
    // =========================================================================
    // Global identities (cross-user contact records)
    // =========================================================================

    pub fn upsert_global_contact(&self, id: &str, name: Option<&str>) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO global_contacts (id, name) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET name = COALESCE(excluded.name, global_contacts.name)",
            params![id, name],
        )?;
        Ok(())
    }

    /// Record an email address for a global identity (stored normalized).
    pub fn add_global_email(&self, global_contact_id: &str, email: &str) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO global_emails (global_contact_id, email) VALUES (?1, ?2)",
            params![global_contact_id, normalize_email(email)],
        )?;
        Ok(())
    }

    pub fn add_global_job(&self, global_contact_id: &str, job: &Tenure) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO global_jobs (global_contact_id, company, start_time, end_time)
             VALUES (?1, ?2, ?3, ?4)",
            params![global_contact_id, job.company, job.start_time, job.end_time],
        )?;
        Ok(())
    }

    /// Find the global identity owning any of `emails` (case-insensitive,
    /// exact match). When several match, the earliest stored email wins.
    pub fn find_global_contact_by_emails(
        &self,
        emails: &[String],
    ) -> Result<Option<String>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT rowid, global_contact_id FROM global_emails
             WHERE email = ?1
             ORDER BY rowid
             LIMIT 1",
        )?;
        let mut best: Option<(i64, String)> = None;
        for email in emails {
            let mut rows = stmt.query_map(params![normalize_email(email)], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?;
            if let Some(row) = rows.next() {
                let (rowid, global_id) = row?;
                if best.as_ref().map_or(true, |(b, _)| rowid < *b) {
                    best = Some((rowid, global_id));
                }
            }
        }
        Ok(best.map(|(_, global_id)| global_id))
    }

    pub fn get_global_jobs(&self, global_contact_id: &str) -> Result<Vec<Tenure>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT company, start_time, end_time FROM global_jobs
             WHERE global_contact_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![global_contact_id], super::contacts::map_tenure_row)?;
        let mut jobs = Vec::new();
        for row in rows {
            jobs.push(row?);
        }
        Ok(jobs)
    }
}
