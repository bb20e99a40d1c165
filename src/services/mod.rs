pub mod storage;
pub mod route_table;
pub mod route_resolver;
pub mod deep_link_service;

pub use storage::{default_storage, load_json, save_json, MemoryStorage, SessionStorage};
pub use route_table::{RouteTable, RouteTableBuilder};
pub use route_resolver::RouteAccessResolver;
pub use deep_link_service::{classify_file, DeepLinkResolver};
