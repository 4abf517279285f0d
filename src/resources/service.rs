// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::mongo;
use crate::error::Result;
use crate::resources::common::app_labels;
use crate::resources::{names, object_meta};
use crate::types::SocialBook;
use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

/// In-cluster endpoint for MongoDB; its name is the host in the connection string
pub fn backend(sb: &SocialBook) -> Result<Service> {
    Ok(Service {
        metadata: object_meta(sb, names::backend(sb), true)?,
        spec: Some(ServiceSpec {
            selector: Some(app_labels(names::backend(sb))),
            ports: Some(vec![ServicePort {
                port: mongo::PORT,
                target_port: Some(IntOrString::Int(mongo::PORT)),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    })
}

/// NodePort exposing the social-book server outside the cluster
pub fn frontend(sb: &SocialBook) -> Result<Service> {
    let port = sb.container_port()?;

    Ok(Service {
        metadata: object_meta(sb, names::frontend(sb), true)?,
        spec: Some(ServiceSpec {
            type_: Some("NodePort".to_string()),
            selector: Some(app_labels(names::frontend_pods(sb))),
            ports: Some(vec![ServicePort {
                port,
                target_port: Some(IntOrString::Int(port)),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::tests::make_socialbook;

    #[test]
    fn test_backend_service_selects_mongo_pods() {
        let sb = make_socialbook("default", "blog");
        let svc = backend(&sb).unwrap();
        let spec = svc.spec.unwrap();

        assert_eq!(svc.metadata.name.as_deref(), Some("blog-mongo"));
        assert_eq!(spec.selector.unwrap()["app"], "blog-mongo");
        assert_eq!(spec.ports.unwrap()[0].port, 27017);
        assert_eq!(spec.type_, None);
    }

    #[test]
    fn test_frontend_service_exposes_configured_port() {
        let sb = make_socialbook("default", "blog");
        let svc = frontend(&sb).unwrap();
        let spec = svc.spec.unwrap();

        assert_eq!(svc.metadata.name.as_deref(), Some("blog"));
        assert_eq!(spec.type_.as_deref(), Some("NodePort"));
        assert_eq!(spec.selector.unwrap()["app"], "blog-sb");
        let port = &spec.ports.unwrap()[0];
        assert_eq!(port.port, 8080);
        assert_eq!(port.target_port, Some(IntOrString::Int(8080)));
        assert_eq!(port.node_port, None);
    }
}
