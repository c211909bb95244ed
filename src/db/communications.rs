use rusqlite::params;

use super::*;

impl ContactDb {
    /// Record one communication (email, meeting or interaction) with a contact.
    ///
    /// `time` is epoch seconds; `None` stores a record without a timestamp,
    /// which still counts but never becomes the most recent.
    pub fn record_communication(
        &self,
        channel: Channel,
        contact_id: &str,
        time: Option<i64>,
    ) -> Result<(), DbError> {
        let sql = format!(
            "INSERT INTO {} (contact_id, time) VALUES (?1, ?2)",
            channel.table()
        );
        self.conn.execute(&sql, params![contact_id, time])?;
        Ok(())
    }

    /// Count and latest timestamp of a contact's records on one channel.
    ///
    /// A contact with no records yields `count = 0, most_recent = None`.
    pub fn get_channel_aggregate(
        &self,
        channel: Channel,
        contact_id: &str,
    ) -> Result<ChannelAggregate, DbError> {
        let sql = format!(
            "SELECT COUNT(*), MAX(time) FROM {} WHERE contact_id = ?1",
            channel.table()
        );
        let (count, most_recent): (i64, Option<i64>) = self
            .conn
            .query_row(&sql, params![contact_id], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?;
        Ok(ChannelAggregate {
            count: count.max(0) as u64,
            most_recent,
        })
    }
}
