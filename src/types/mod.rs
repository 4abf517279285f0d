// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! SocialBook custom resource and work queue identity types.

pub mod key;
pub mod socialbook;

pub use key::ReconcileKey;
pub use socialbook::{Phase, SocialBook, SocialBookSpec, SocialBookStatus};
