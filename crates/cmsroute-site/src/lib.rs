//! cmsroute site layer
//!
//! This crate ties the pieces together for one connector plugin:
//! - `SiteRegistry`: site symbol → `SiteConfig`
//! - `Site`: table access bound to one site, plus the initialization hook
//! - `Table`: table handle whose name and connection follow its site
//! - `TableLocator`: builds tables and fires the initialization event
//! - `Connector`: the plugin, holding the collaborators sites share

pub mod connector;
pub mod site;
pub mod sites;
pub mod table;
pub mod table_locator;

pub use connector::Connector;
pub use site::Site;
pub use sites::SiteRegistry;
pub use table::{EntityBinding, Table};
pub use table_locator::{ListenerId, ModelListener, TableLocator, TableRequest};
