mod auth;
mod dashboard;
mod landing;

pub use auth::AuthPage;
pub use dashboard::Dashboard;
pub use landing::Landing;
