pub mod assets;
pub mod auth;
pub mod chunked_upload;
pub mod health;
pub mod history;
pub mod projects;
