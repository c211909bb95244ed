//! Storage contract consumed by the strength cycle.
//!
//! The cycle only reads through these queries and hands every score back in a
//! single `commit_scores` call, so an implementation that makes that call
//! atomic gets all-or-nothing cycles.

use crate::db::{Channel, ChannelAggregate, ContactDb, ContactSnapshot, DbError, ScoreUpdate, Tenure};

pub trait StrengthStore {
    /// Up to `limit` contacts ordered by `relationship_strength_time`
    /// ascending, with their jobs and their owner's emails loaded.
    fn stalest_contacts(&self, limit: usize) -> Result<Vec<ContactSnapshot>, DbError>;

    /// Count and most-recent time of one channel's records for a contact.
    fn channel_aggregate(
        &self,
        contact_id: &str,
        channel: Channel,
    ) -> Result<ChannelAggregate, DbError>;

    /// Global identity whose known emails intersect `emails`
    /// (case-insensitive), if any.
    fn find_global_identity(&self, emails: &[String]) -> Result<Option<String>, DbError>;

    /// Every tenure recorded for a global identity.
    fn global_tenures(&self, global_id: &str) -> Result<Vec<Tenure>, DbError>;

    /// Persist all updates atomically. On error none of them may persist.
    fn commit_scores(&mut self, updates: &[ScoreUpdate]) -> Result<(), DbError>;
}

impl StrengthStore for ContactDb {
    fn stalest_contacts(&self, limit: usize) -> Result<Vec<ContactSnapshot>, DbError> {
        let contacts = self.get_stalest_contacts(limit)?;
        let mut snapshots = Vec::with_capacity(contacts.len());
        for contact in contacts {
            let jobs = self.get_contact_jobs(&contact.id)?;
            let owner_emails = match contact.user_id.as_deref() {
                Some(user_id) => self.get_user_emails(user_id)?,
                None => Vec::new(),
            };
            snapshots.push(ContactSnapshot {
                contact,
                jobs,
                owner_emails,
            });
        }
        Ok(snapshots)
    }

    fn channel_aggregate(
        &self,
        contact_id: &str,
        channel: Channel,
    ) -> Result<ChannelAggregate, DbError> {
        self.get_channel_aggregate(channel, contact_id)
    }

    fn find_global_identity(&self, emails: &[String]) -> Result<Option<String>, DbError> {
        self.find_global_contact_by_emails(emails)
    }

    fn global_tenures(&self, global_id: &str) -> Result<Vec<Tenure>, DbError> {
        self.get_global_jobs(global_id)
    }

    fn commit_scores(&mut self, updates: &[ScoreUpdate]) -> Result<(), DbError> {
        self.with_transaction(|db| {
            for update in updates {
                if !db.update_relationship_strength(
                    &update.contact_id,
                    update.relationship_strength,
                    update.relationship_strength_time,
                )? {
                    log::debug!("Contact {} vanished before commit", update.contact_id);
                }
            }
            Ok(())
        })
    }
}
