mod graph_builder;
mod graph_scanner;
mod path_resolver;

pub use graph_builder::GraphBuilder;
pub use graph_scanner::GraphScanner;
pub use path_resolver::PathResolver;
