//! Token lifecycle services: codec, issuer, validator and the session
//! service that ties them to the store.

mod codec;
mod config;
mod issuer;
mod service;
mod validator;

pub use codec::TokenCodec;
pub use config::TokenServiceConfig;
pub use issuer::{IssuedRefresh, TokenIssuer};
pub use service::SessionService;
pub use validator::TokenValidator;
