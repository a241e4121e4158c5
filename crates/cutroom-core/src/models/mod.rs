//! Data models shared between the repositories and the API layer.

pub mod asset;
pub mod history;
pub mod member;
pub mod project;
pub mod upload;

pub use asset::{Asset, AssetResponse};
pub use history::{EditAction, EditHistory, EditHistoryResponse};
pub use member::{Member, MemberResponse};
pub use project::Project;
pub use upload::UploadSession;
