/// All entity primary keys are PostgreSQL UUIDs.
pub type DbId = uuid::Uuid;

/// Subject of an identity-provider access token (the user's id).
pub type UserId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
