use std::fmt;

/// Screen the front end should show next after a state operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Upload,
    Course(String),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => f.write_str("/login"),
            Self::Dashboard => f.write_str("/dashboard"),
            Self::Upload => f.write_str("/upload"),
            Self::Course(id) => write!(f, "/course/{id}"),
        }
    }
}
