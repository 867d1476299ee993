pub mod conversation;
pub mod course;
pub mod message;
pub mod session;
pub mod user;

pub use conversation::ConversationRecord;
pub use course::CourseRecord;
pub use message::{MessageRecord, MessageRole};
pub use session::SessionRecord;
pub use user::UserRecord;
