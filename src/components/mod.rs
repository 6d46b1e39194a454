pub mod reminder_form;
pub mod reminder_list;
pub mod smart_input;

pub use reminder_form::{ReminderForm, ReminderFormState};
pub use reminder_list::ReminderList;
pub use smart_input::{SmartInput, SmartInputState};
