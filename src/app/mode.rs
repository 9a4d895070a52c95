use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Navigate,
    Edit,
    PickCategory,
    Search,
    DoneList,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Navigate => write!(f, "NAVIGATE"),
            Mode::Edit => write!(f, "INSERT"),
            Mode::PickCategory => write!(f, "CATEGORY"),
            Mode::Search => write!(f, "SEARCH"),
            Mode::DoneList => write!(f, "DONE"),
        }
    }
}
