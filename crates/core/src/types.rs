/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Entity names reported in [`CoreError::NotFound`](crate::error::CoreError::NotFound).
pub mod entity {
    pub const USER: &str = "User";
    pub const CHARACTER: &str = "Character";
    pub const SOURCE: &str = "Source";
    pub const TAG: &str = "Tag";
    pub const TAG_CATEGORY: &str = "TagCategory";
    pub const CHARACTER_TAG: &str = "CharacterTag";
    pub const IMAGE: &str = "Image";
}
