mod assets;
mod history;
mod members;
mod projects;
mod upload_sessions;

pub use assets::AssetRepository;
pub use history::HistoryRepository;
pub use members::MemberRepository;
pub use projects::ProjectRepository;
pub use upload_sessions::UploadSessionRepository;
