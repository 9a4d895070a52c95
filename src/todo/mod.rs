pub mod category_map;
pub mod change;
pub mod completed;
pub mod error;
pub mod filter;
pub mod layout;
pub mod service;

pub use category_map::{CategoryMap, EditTarget, validate_text};
pub use change::Change;
pub use completed::{CompletedLog, CompletedRecord};
pub use error::{TodoError, TodoResult};
pub use filter::{FilteredView, filter, filter_view};
pub use layout::{LayoutError, ListLayout, Section};
pub use service::TodoService;

/// Categories offered by the picker when the config does not override them.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["General", "Business", "Personal", "Shop", "Health"];

/// Category preselected for new items.
pub const DEFAULT_CATEGORY: &str = "General";
