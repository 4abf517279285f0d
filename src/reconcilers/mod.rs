// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Reconciliation of SocialBooks into their dependent objects.

pub mod provision;
pub mod socialbook;

pub use provision::Provisioner;
pub use socialbook::SocialBookReconciler;
