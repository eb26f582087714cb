pub mod activation;
pub mod dense;
pub mod loss;
pub mod network;
pub mod sgd;

pub use activation::Activation;
pub use dense::Layer;
pub use loss::CrossEntropyLoss;
pub use network::Network;
pub use sgd::Sgd;
