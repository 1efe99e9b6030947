//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Guardian accounts mirrored from the identity service.
    guardians (id) {
        id -> Uuid,
        display_name -> Varchar,
        /// Reminder recipient address.
        email -> Varchar,
        /// `parent` or `school`.
        kind -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Enrolled children.
    children (id) {
        id -> Uuid,
        /// Owning guardian; no foreign key, see the migration.
        guardian_id -> Uuid,
        name -> Varchar,
        date_of_birth -> Date,
        gender -> Varchar,
        blood_group -> Varchar,
        medical_history -> Text,
        /// Enrolment order for listings.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per scheduled vaccine dose.
    dose_records (id) {
        id -> Uuid,
        /// Cascades on child deletion.
        child_id -> Uuid,
        vaccine_name -> Varchar,
        description -> Text,
        due_date -> Date,
        status -> Varchar,
        /// Present exactly when `status` is `Completed`.
        completion_date -> Nullable<Date>,
        notes -> Nullable<Text>,
    }
}

diesel::table! {
    /// Append-only reminder history.
    notification_log (id) {
        id -> Uuid,
        child_id -> Uuid,
        dose_record_id -> Uuid,
        channel -> Varchar,
        message -> Text,
        status -> Varchar,
        sent_at -> Timestamptz,
        error -> Nullable<Text>,
    }
}

diesel::joinable!(dose_records -> children (child_id));

diesel::allow_tables_to_appear_in_same_query!(guardians, children, dose_records, notification_log);
