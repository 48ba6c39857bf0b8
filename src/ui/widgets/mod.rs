//! TUI widgets.

mod help;
mod notifications;
mod price_board;
mod status_bar;
mod symbol_list;

pub use help::HelpPanel;
pub use notifications::{render_info, render_notification};
pub use price_board::PriceBoard;
pub use status_bar::StatusBar;
pub use symbol_list::{SearchBar, SymbolList};
