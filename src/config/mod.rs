pub mod classes;
pub mod credentials;

pub use classes::*;
pub use credentials::ApiCredentials;
