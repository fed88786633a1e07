pub mod dialog;
pub mod filter;
pub mod view;

pub use dialog::{DetailDialog, ResolutionDialog};
pub use filter::visible_reports;
pub use view::{Loadable, Msg, ReportsView};
