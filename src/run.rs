mod cli;
mod tui;

pub(crate) use cli::{as_cli, home_dir, shellexpand, Cli};
pub(crate) use tui::as_tui;
