pub mod scan;
pub mod watch;

pub use scan::handle_scan;
pub use watch::handle_watch;
