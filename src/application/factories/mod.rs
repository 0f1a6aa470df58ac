mod blocklist_factory;
mod formatter_factory;
mod presenter_factory;

pub use blocklist_factory::{BlocklistFactory, CacheSettings};
pub use formatter_factory::FormatterFactory;
pub use presenter_factory::{PresenterFactory, PresenterType};
