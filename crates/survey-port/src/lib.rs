pub mod context;
pub mod error;
pub mod handle;
pub mod markup;
pub mod port;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use context::CancelContext;
pub use error::TransportError;
pub use handle::MessageHandle;
pub use markup::{InlineButton, Markup};
pub use port::OutboundPort;
