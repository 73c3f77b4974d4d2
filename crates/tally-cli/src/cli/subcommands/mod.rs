mod comment;
mod feedback;
mod item;
mod session;

pub use comment::CommentCommands;
pub use feedback::FeedbackCommands;
pub use item::ItemCommands;
pub use session::SessionCommands;
