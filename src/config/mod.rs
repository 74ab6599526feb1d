pub mod site;

pub use site::{ ConfigError, SiteContentStore };
