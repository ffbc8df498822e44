pub mod error;
pub mod event;
pub mod format;
pub mod model;
pub mod month;
pub mod peak;
pub mod state;
pub mod window;

pub use error::{DashError, Result};
pub use event::{Endpoint, Message};
pub use month::MonthCursor;
pub use peak::PeakTracker;
pub use state::DashboardState;
pub use window::{RollingWindow, Sample};
