pub mod checker;
pub mod due;
pub mod reminder;
pub mod repository;
pub mod store;

pub use checker::DueChecker;
pub use due::{default_due_date, in_due_window, is_overdue};
pub use reminder::{Priority, Reminder};
pub use repository::{JsonFileRepository, MemoryRepository, ReminderRepository};
pub use store::{Filter, ReminderStore, Stats};
