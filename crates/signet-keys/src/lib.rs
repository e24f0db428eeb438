//! Key sourcing and background key brokering for the signet toolkit.
//!
//! Verification keys rotate; request paths must not notice. This crate
//! keeps key material fresh off the request path:
//!
//! - [`KeySource`] resolves raw PEM bytes from one origin (inline value,
//!   file, environment variable or URL); [`SourceChain`] tries an ordered
//!   list of sources and returns the first success
//! - [`KeyBroker`] polls a chain from a single background task and
//!   publishes parsed key material for lock-protected concurrent reads
//! - [`RotatingVerifier`] wires verification failures back into the
//!   broker: a signature mismatch hints that the key rotated and requests
//!   an out-of-cycle renewal
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐  copy()   ┌──────────────────┐  poll / renew
//! │ request tasks  │◀──────────│    KeyBroker     │───────────────┐
//! │ (parse tokens) │           │ (background task)│               │
//! └───────┬────────┘           └──────────────────┘               ▼
//!         │ signature                  ▲                 ┌──────────────┐
//!         │ mismatch                   │                 │ SourceChain  │
//!         └────────── renew() ─────────┘                 │ value▸file▸… │
//!                                                        └──────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use signet_keys::{KeyBroker, RotatingVerifier, SourceChain, FileSource, HttpSource};
//!
//! # async fn example(token: &str) {
//! let chain = SourceChain::new(vec![
//!     Box::new(FileSource::new("/etc/signet/public.pem")),
//!     Box::new(HttpSource::new("https://keys.example.com/public.pem")),
//! ]);
//!
//! let broker = Arc::new(KeyBroker::new(chain, Duration::from_secs(300)));
//! broker.run();
//!
//! // In a request handler:
//! let verifier = RotatingVerifier::new(Arc::clone(&broker));
//! match verifier.verify(token) {
//!     Ok(claims) => println!("consumer {}", claims.consumer.id),
//!     Err(err) => println!("rejected: {err}"),
//! }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod broker;
pub mod chain;
pub mod config;
pub mod error;
pub mod material;
pub mod recovery;
pub mod source;

pub use broker::{KeyBroker, SigningKeyBroker, VerificationKeyBroker};
pub use chain::SourceChain;
pub use config::BrokerConfig;
pub use error::{Result, SourceError};
pub use material::{BrokeredKey, SigningKey, VerificationKey};
pub use recovery::RotatingVerifier;
pub use source::{EnvSource, FileSource, HttpSource, KeySource, ValueSource};
