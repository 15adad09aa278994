//! Custom widgets for the LIME console

mod config_table;
mod header;
mod nav_tree;
mod qos_view;
mod result_view;
mod status_bar;
mod toolbar;

pub use config_table::ConfigView;
pub use header::MainHeader;
pub use nav_tree::NavTree;
pub use qos_view::QosView;
pub use result_view::ResultView;
pub use status_bar::StatusBar;
pub use toolbar::Toolbar;
