pub mod blocklist;
pub mod finding;
pub mod graph;
pub mod lockfile;
pub mod package;

pub use blocklist::{Blocklist, BlocklistEntry, Severity};
pub use finding::Finding;
pub use graph::{Depth, Graph, Node, ROOT_KEY};
pub use lockfile::{node_modules_key, Lockfile, LockfileFormat};
pub use package::Package;
