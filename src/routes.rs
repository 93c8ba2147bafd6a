/// The pages of this application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppRoute {
    Landing,
    Auth,
    Dashboard,
}

impl AppRoute {
    pub fn path(self) -> &'static str {
        match self {
            AppRoute::Landing => "/",
            AppRoute::Auth => "/auth",
            AppRoute::Dashboard => "/dashboard",
        }
    }
}
