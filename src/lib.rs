//! Lifecycle management client for webMethods-style API gateways.
//!
//! The gateway owns an inventory of API definitions; this crate decides how
//! to get a specification document onto it. Given a resolved spec
//! (name, version, payload) and the gateway's current inventory,
//! [`GatewayClient::reconcile`] picks one of three actions: create the API
//! fresh, update the matching version in place, or branch a new version off
//! the latest lineage member and replace its content. Around that core sit
//! activation with idempotent-failure tolerance, sentinel-checked deletion,
//! and stage promotion.
//!
//! The gateway's success and error shapes are inconsistent; everything is
//! normalized into [`GatewayError`], a tagged taxonomy callers can branch
//! on without matching message strings.
//!
//! ## Module Structure
//!
//! - [`session`]: connection context (management endpoint + credentials)
//! - [`model`]: gateway resources and their wire envelopes
//! - [`spec`]: specification resolution and inspection
//! - [`error`]: the domain error taxonomy and transport faults
//!
//! ## Examples
//!
//! ```rust,no_run
//! use apigw_client::{GatewayClient, PromoteOptions, SpecResolver};
//!
//! # async fn demo() -> Result<(), apigw_client::GatewayError> {
//! let client = GatewayClient::connect("http://localhost:5555", "Administrator", "manage")?;
//!
//! // Create, version, or update, depending on what the gateway holds.
//! let resolver = SpecResolver::new()?;
//! let spec = resolver.descriptor("petstore.openapi.json").await?;
//! let api = client.reconcile(&spec).await?;
//!
//! // Safe to repeat: an already-active API is tolerated.
//! let api = client.activate(&api.id, false).await?;
//!
//! // Promote it to a deployment stage.
//! let stage = client.find_stage("production").await?;
//! client
//!     .promote("petstore-release", &api.id, &stage.id, PromoteOptions::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod model;
pub mod session;
pub mod spec;

mod client;
mod directory;
mod lifecycle;
mod promotion;
mod transport;

pub use client::GatewayClient;
pub use error::{GatewayError, TransportFault};
pub use model::{ApiResource, ApiState, Promotion, Stage};
pub use promotion::PromoteOptions;
pub use session::{Credentials, Session};
pub use spec::{SpecDescriptor, SpecFormat, SpecResolver};
