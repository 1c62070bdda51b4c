//! Issue-drafting agents with artifact handoffs.
//!
//! A coordinator agent talks to the user and delegates to a technical writer
//! and a duplicate-search analyst through [`tools::handoff::ArtifactHandoffTool`].
//! Large drafts travel between agents as `<artifact id="..." />` tags backed by
//! a per-session store from the `coordination` crate, and are expanded only in
//! the answer delivered to the user.

pub mod agents;
pub mod config;
pub mod console;
pub mod delegate;
pub mod prompts;
pub mod session;
pub mod templates;
pub mod tools;
pub mod tracker;
