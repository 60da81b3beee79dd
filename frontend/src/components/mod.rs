pub mod auth;
pub mod client_detail;
pub mod client_form;
pub mod dashboard;
pub mod layout;
pub mod pagination_controls;
pub mod tag_input;

pub use auth::{CrmContext, CrmProvider, LoginForm};
pub use layout::Layout;
