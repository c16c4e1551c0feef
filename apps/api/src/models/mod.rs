pub mod announcement;
pub mod content;
pub mod locality;
pub mod subject;
pub mod template;
pub mod tenant;
