pub mod config;
pub mod error;
pub mod format;
pub mod github;
pub mod mail;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod window;
pub mod writer;

pub use config::Config;
pub use error::{FetchError, FormatError};
pub use format::{format_records, truncate_title};
pub use github::GitHubClient;
pub use mail::{MailCredentials, MailService, MailTransport};
pub use models::*;
pub use pipeline::ReportPipeline;
pub use render::{count_rows, render_document, render_table, NO_DATA_PLACEHOLDER};
pub use window::DateWindow;
pub use writer::{report_file_name, write_report};
