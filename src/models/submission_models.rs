use diesel::prelude::*;
use crate::schema::contact_submissions;
use crate::schema::waitlist_entries;

#[derive(Queryable, Selectable, Clone)]
#[diesel(table_name = contact_submissions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ContactSubmission {
    pub id: Option<i32>,
    pub full_name: String,
    pub email: String, // normalized to lowercase before insert
    pub subject: String,
    pub project_details: String,
    pub contact_type: String, // "INDIVIDUAL" or "BUSINESS"
    pub has_attachment: bool,
    pub attachment_name: Option<String>,
    pub created_at: i32,
}

#[derive(Insertable)]
#[diesel(table_name = contact_submissions)]
pub struct NewContactSubmission {
    pub full_name: String,
    pub email: String,
    pub subject: String,
    pub project_details: String,
    pub contact_type: String,
    pub has_attachment: bool,
    pub attachment_name: Option<String>,
    pub created_at: i32,
}

#[derive(Queryable, Selectable, Clone)]
#[diesel(table_name = waitlist_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WaitlistEntry {
    pub id: Option<i32>,
    pub email: String,
    pub created_at: i32,
}

#[derive(Insertable)]
#[diesel(table_name = waitlist_entries)]
pub struct NewWaitlistEntry {
    pub email: String,
    pub created_at: i32,
}
