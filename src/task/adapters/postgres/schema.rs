//! Diesel schema for tasks and the reference data they point at.

diesel::table! {
    /// Accounts tasks can be assigned to.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Unique, lowercased email address.
        #[max_length = 255]
        email -> Varchar,
        /// Account role (`admin` or `member`).
        #[max_length = 20]
        role -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Status catalogue.
    task_statuses (id) {
        /// Status identifier.
        id -> Uuid,
        /// Unique display name.
        #[max_length = 100]
        name -> Varchar,
        /// Hex colour code.
        #[max_length = 7]
        color -> Varchar,
    }
}

diesel::table! {
    /// Task assignments with their inclusive schedule.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// First occupied day.
        start_date -> Date,
        /// Last occupied day.
        end_date -> Date,
        /// Assigned user.
        user_id -> Uuid,
        /// Status reference.
        status_id -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> users (user_id));
diesel::joinable!(tasks -> task_statuses (status_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, task_statuses, users);
