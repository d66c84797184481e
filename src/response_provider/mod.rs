#[allow(clippy::module_inception)]
pub mod response_provider;

pub use response_provider::ResponseProvider;
