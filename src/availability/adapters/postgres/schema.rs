//! Diesel schema for availability rows.

diesel::table! {
    /// One occupied day per user, owned by the task that occupies it.
    user_availabilities (id) {
        /// Row identifier.
        id -> Uuid,
        /// Occupied user.
        user_id -> Uuid,
        /// Owning task.
        task_id -> Uuid,
        /// Occupied day.
        date -> Date,
        /// Materialisation timestamp.
        created_at -> Timestamptz,
    }
}
