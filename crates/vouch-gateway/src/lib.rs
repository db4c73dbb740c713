// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP ingress for the Vouch approval gateway.
//!
//! Workflow engines POST review requests here; each request becomes a
//! Telegram prompt with decision buttons and an open session keyed by the
//! sent message.

pub mod handlers;
pub mod server;

pub use server::{start_server, GatewayState, ServerConfig};
