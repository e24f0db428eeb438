//! Signed identity tokens for the signet toolkit.
//!
//! This crate issues and verifies JWTs carrying a [`Consumer`] (the
//! authenticated principal) alongside the registered claims, and translates
//! every verification failure into one variant of a precise error taxonomy:
//!
//! - [`Issuer`] signs [`Claims`] into token strings with a private key
//! - [`Parser`] verifies a token's signature and validity window with a
//!   public key
//! - [`TokenError`] tells callers apart what to reject outright and what
//!   should additionally hint a key broker to renew
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   issue    ┌──────────────┐   parse    ┌──────────────┐
//! │   Consumer   │───────────▶│ signed token │───────────▶│    Claims    │
//! │ (principal)  │  private   │   (string)   │   public   │ (+ Consumer) │
//! └──────────────┘    key     └──────────────┘    key     └──────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use signet_token::{Consumer, Issuer, Parser};
//!
//! # fn example(private_pem: &[u8], public_pem: &[u8]) -> Result<(), signet_token::TokenError> {
//! let issuer = Issuer::from_pem(private_pem, "identity-service", 60)?;
//! let token = issuer.issue(Consumer { id: 42, ..Consumer::default() })?;
//!
//! let parser = Parser::from_pem(public_pem)?;
//! let claims = parser.parse(&token)?;
//! assert_eq!(claims.consumer.id, 42);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod claims;
pub mod consumer;
pub mod error;
pub mod issuer;
pub mod parser;

#[cfg(any(test, feature = "test-utils"))]
pub mod testkeys;

pub use claims::Claims;
pub use consumer::Consumer;
pub use error::{Result, TokenError};
pub use issuer::{Issuer, DEFAULT_VALIDITY_MINUTES};
pub use parser::Parser;

pub use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
