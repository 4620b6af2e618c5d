use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    models::submission_models::{NewContactSubmission, NewWaitlistEntry},
    schema::{contact_submissions, waitlist_entries},
    validation::ValidatedContact,
    DbPool,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DieselError),
    #[error("Connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    /// The unique index on waitlist email fired. Detected from the insert
    /// itself, not a pre-check, so concurrent signups cannot both win.
    #[error("Email already registered")]
    DuplicateEmail,
}

pub struct SubmissionStore {
    pool: DbPool,
}

impl SubmissionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn now() -> i32 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i32
    }

    /// Append-only: rows are never updated or deleted by this pipeline.
    /// The caller guarantees the record already passed validation.
    pub fn create_contact_submission(
        &self,
        contact: &ValidatedContact,
        has_attachment: bool,
        attachment_name: Option<String>,
    ) -> Result<(), StoreError> {
        let mut conn = self.pool.get()?;
        let new_submission = NewContactSubmission {
            full_name: contact.full_name.clone(),
            email: contact.email.clone(),
            subject: contact.subject.clone(),
            project_details: contact.project_details.clone(),
            contact_type: contact.contact_type.clone(),
            has_attachment,
            attachment_name,
            created_at: Self::now(),
        };
        diesel::insert_into(contact_submissions::table)
            .values(&new_submission)
            .execute(&mut conn)?;
        Ok(())
    }

    pub fn waitlist_email_exists(&self, search_email: &str) -> Result<bool, StoreError> {
        let mut conn = self.pool.get()?;
        let found: Option<String> = waitlist_entries::table
            .filter(waitlist_entries::email.eq(search_email))
            .select(waitlist_entries::email)
            .first::<String>(&mut conn)
            .optional()?;
        Ok(found.is_some())
    }

    pub fn insert_waitlist_entry(&self, email: &str) -> Result<(), StoreError> {
        let mut conn = self.pool.get()?;
        let new_entry = NewWaitlistEntry {
            email: email.to_string(),
            created_at: Self::now(),
        };
        diesel::insert_into(waitlist_entries::table)
            .values(&new_entry)
            .execute(&mut conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    StoreError::DuplicateEmail
                }
                other => StoreError::Database(other),
            })?;
        Ok(())
    }

    /// Social-proof read: total entries plus up to five initials from the
    /// most recent signups.
    pub fn waitlist_summary(&self) -> Result<(i64, Vec<String>), StoreError> {
        let mut conn = self.pool.get()?;
        let count: i64 = waitlist_entries::table.count().get_result(&mut conn)?;
        let recent_emails: Vec<String> = waitlist_entries::table
            .select(waitlist_entries::email)
            .order(waitlist_entries::id.desc())
            .limit(5)
            .load::<String>(&mut conn)?;
        let initials = recent_emails
            .iter()
            .filter_map(|email| email.chars().next())
            .map(|c| c.to_ascii_uppercase().to_string())
            .collect();
        Ok((count, initials))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_pool;
    use crate::validation::{validate_contact, ContactFields};

    fn store() -> SubmissionStore {
        SubmissionStore::new(test_pool())
    }

    fn validated() -> ValidatedContact {
        validate_contact(&ContactFields {
            full_name: "Grace Hopper".to_string(),
            email: "grace@outlook.com".to_string(),
            subject: "Compilers".to_string(),
            project_details: "A to-do list".to_string(),
            contact_type: "Individual".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn contact_submission_round_trips() {
        let store = store();
        store
            .create_contact_submission(&validated(), true, Some("deck.pdf".to_string()))
            .unwrap();

        let mut conn = store.pool.get().unwrap();
        let rows: Vec<crate::models::submission_models::ContactSubmission> =
            contact_submissions::table.load(&mut conn).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].email, "grace@outlook.com");
        assert_eq!(rows[0].contact_type, "INDIVIDUAL");
        assert!(rows[0].has_attachment);
        assert_eq!(rows[0].attachment_name.as_deref(), Some("deck.pdf"));
    }

    #[test]
    fn duplicate_waitlist_email_hits_the_unique_index() {
        let store = store();
        store.insert_waitlist_entry("person@gmail.com").unwrap();
        let err = store.insert_waitlist_entry("person@gmail.com").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));

        let (count, _) = store.waitlist_summary().unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn summary_caps_initials_at_five() {
        let store = store();
        for name in ["ada", "bob", "cleo", "dan", "eve", "finn"] {
            store
                .insert_waitlist_entry(&format!("{name}@gmail.com"))
                .unwrap();
        }
        let (count, initials) = store.waitlist_summary().unwrap();
        assert_eq!(count, 6);
        assert_eq!(initials, vec!["F", "E", "D", "C", "B"]);
        assert!(!store.waitlist_email_exists("ghost@gmail.com").unwrap());
        assert!(store.waitlist_email_exists("ada@gmail.com").unwrap());
    }
}
