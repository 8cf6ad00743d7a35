//! Stream URL resolution.
//!
//! A route resolves in three dependent steps:
//!
//! 1. [`PageTokenResolver`]: provider live page → token-issuing URL
//! 2. [`PlayerTokenClient`]: token-issuing URL → short-lived player token
//! 3. [`StreamLinkClient`]: route profile/DRM + player token → stream URL
//!
//! [`ResolutionPipeline`] chains them behind the [`RouteResolver`] trait.

pub mod link;
pub mod page;
pub mod pipeline;
pub mod token;

pub use link::{StreamLinkClient, StreamLinkRequest};
pub use page::{NextDataResolver, PageTokenResolver};
pub use pipeline::{ResolutionPipeline, RouteResolver};
pub use token::PlayerTokenClient;
