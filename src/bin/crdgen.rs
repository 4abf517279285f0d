// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Print the SocialBook CustomResourceDefinition as YAML

use kube::CustomResourceExt;
use socialbook_operator::types::SocialBook;

fn main() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&SocialBook::crd())?);
    Ok(())
}
