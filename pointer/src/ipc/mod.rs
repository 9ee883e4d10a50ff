//! S-expression command protocol for driving a pointer from another process.

pub mod dispatch;
pub(crate) mod plist;

pub use dispatch::handle_message;
