//! CLI command handlers. Each command is in its own file for clarity.

mod add;
mod list;
mod prune;
mod remove;
mod rename;
mod show;

pub use add::run_add;
pub use list::run_list;
pub use prune::run_prune;
pub use remove::run_remove;
pub use rename::run_rename;
pub use show::run_show;
