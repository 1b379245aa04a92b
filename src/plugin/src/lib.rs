pub mod actual;
pub mod carbon;
pub mod config;
pub mod constants;
pub mod dispatch;
pub mod embedded;
pub mod errors;
pub mod estimators;
pub mod logging;
pub mod metadata;
pub mod pricing;
pub mod recommend;
pub mod regions;
pub mod resource;
pub mod server;

pub use config::PluginConfig;
pub use dispatch::ServiceKind;
pub use pricing::PricingCatalog;
pub use resource::ResourceDescriptor;
pub use server::PluginServer;
