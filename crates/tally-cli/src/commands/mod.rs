pub mod apply;
pub mod audit;
pub mod comment;
pub mod dashboard;
pub mod dispatch;
pub mod feedback;
pub mod item;
pub mod progress;
pub mod quorum;
pub mod schema;
pub mod session;
pub mod shared;
