//! Tollgate - Tier-Aware Request Rate Limiting
//!
//! This crate decides, per incoming request, whether a caller identified by
//! id and membership tier has exceeded its rate limit policy. Policies are
//! resolved from an ordered tier table, histories of request timestamps are
//! kept per identity and pruned lazily, and administrators bypass limiting
//! entirely. The hosting layer (HTTP server, filter chain, queue worker)
//! calls [`ratelimit::RateLimitService::evaluate_request`] once per request
//! and passes the body through on acceptance.

pub mod config;
pub mod error;
pub mod ratelimit;
