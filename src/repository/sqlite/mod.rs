mod page_repository;
mod queue_repository;

pub use page_repository::SqlitePageRepository;
pub use queue_repository::SqliteQueueRepository;
