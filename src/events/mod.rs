// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
pub mod feeds;
pub mod router;

pub use feeds::start_feeds;
pub use router::EventRouter;
