// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! MongoDB and social-book server deployments

use crate::constants::{frontend, mongo};
use crate::error::Result;
use crate::resources::common::{app_labels, app_selector};
use crate::resources::configmap::keys;
use crate::resources::{names, object_meta};
use crate::types::SocialBook;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    ConfigMapKeySelector, Container, ContainerPort, EnvVar, EnvVarSource,
    PersistentVolumeClaimVolumeSource, PodSpec, PodTemplateSpec, Volume, VolumeMount,
};
use kube::api::ObjectMeta;

/// Environment variable resolved from a config map key when the pod starts
fn env_from_config_map(name: &str, config_map: &str, key: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value_from: Some(EnvVarSource {
            config_map_key_ref: Some(ConfigMapKeySelector {
                name: config_map.to_string(),
                key: key.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn pod_template(pod_label: String, spec: PodSpec) -> PodTemplateSpec {
    PodTemplateSpec {
        metadata: Some(ObjectMeta {
            name: Some(pod_label.clone()),
            labels: Some(app_labels(pod_label)),
            ..Default::default()
        }),
        spec: Some(spec),
    }
}

/// Single-replica MongoDB with its data directory on the claim
pub fn backend(sb: &SocialBook) -> Result<Deployment> {
    let name = names::backend(sb);
    let cm_name = names::config_map(sb);
    let volume_name = names::persistent_volume(sb);

    let container = Container {
        name: name.clone(),
        image: Some(mongo::IMAGE.to_string()),
        ports: Some(vec![ContainerPort {
            container_port: mongo::PORT,
            ..Default::default()
        }]),
        env: Some(vec![
            env_from_config_map("MONGO_INITDB_ROOT_USERNAME", &cm_name, keys::MONGO_ROOT_USERNAME),
            env_from_config_map("MONGO_INITDB_ROOT_PASSWORD", &cm_name, keys::MONGO_ROOT_PASSWORD),
        ]),
        volume_mounts: Some(vec![VolumeMount {
            name: volume_name.clone(),
            mount_path: mongo::DATA_PATH.to_string(),
            ..Default::default()
        }]),
        ..Default::default()
    };

    let pod_spec = PodSpec {
        volumes: Some(vec![Volume {
            name: volume_name,
            persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                claim_name: names::persistent_volume_claim(sb),
                ..Default::default()
            }),
            ..Default::default()
        }]),
        containers: vec![container],
        ..Default::default()
    };

    Ok(Deployment {
        metadata: object_meta(sb, name.clone(), true)?,
        spec: Some(DeploymentSpec {
            replicas: Some(1),
            selector: app_selector(name.clone()),
            template: pod_template(name, pod_spec),
            ..Default::default()
        }),
        ..Default::default()
    })
}

/// social-book server scaled to the requested replica count
pub fn frontend(sb: &SocialBook) -> Result<Deployment> {
    let port = sb.container_port()?;
    let name = names::frontend(sb);
    let pod_label = names::frontend_pods(sb);
    let cm_name = names::config_map(sb);

    let env = [
        ("PORT", keys::PORT),
        ("MONGODB_URI", keys::MONGODB_URI),
        ("SECRET", keys::SECRET),
        ("STRIPE_API_KEY", keys::STRIPE_API_KEY),
        ("USER_EMAIL", keys::USER_EMAIL),
        ("USER_PASSWORD", keys::USER_PASSWORD),
        ("CLIENT_URL", keys::CLIENT_URL),
    ]
    .into_iter()
    .map(|(var, key)| env_from_config_map(var, &cm_name, key))
    .collect();

    let container = Container {
        name: name.clone(),
        image: Some(frontend::IMAGE.to_string()),
        ports: Some(vec![ContainerPort {
            container_port: port,
            ..Default::default()
        }]),
        env: Some(env),
        ..Default::default()
    };

    Ok(Deployment {
        metadata: object_meta(sb, name, true)?,
        spec: Some(DeploymentSpec {
            replicas: Some(sb.spec.replicas),
            selector: app_selector(pod_label.clone()),
            template: pod_template(
                pod_label,
                PodSpec {
                    containers: vec![container],
                    ..Default::default()
                },
            ),
            ..Default::default()
        }),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::tests::make_socialbook;

    fn container(dep: &Deployment) -> &Container {
        &dep.spec.as_ref().unwrap().template.spec.as_ref().unwrap().containers[0]
    }

    #[test]
    fn test_backend_mounts_claim_and_reads_credentials() {
        let sb = make_socialbook("default", "blog");
        let dep = backend(&sb).unwrap();
        let spec = dep.spec.as_ref().unwrap();

        assert_eq!(spec.replicas, Some(1));
        let pod = spec.template.spec.as_ref().unwrap();
        let volume = &pod.volumes.as_ref().unwrap()[0];
        assert_eq!(
            volume.persistent_volume_claim.as_ref().unwrap().claim_name,
            "blog-pvc"
        );

        let c = container(&dep);
        assert_eq!(c.image.as_deref(), Some("mongo"));
        assert_eq!(c.volume_mounts.as_ref().unwrap()[0].mount_path, "/data/db");
        let env = c.env.as_ref().unwrap();
        let selector = env[0].value_from.as_ref().unwrap().config_map_key_ref.as_ref().unwrap();
        assert_eq!(selector.name, "blog-cm");
        assert_eq!(selector.key, "mongo-root-username");
    }

    #[test]
    fn test_frontend_env_is_never_inlined() {
        let sb = make_socialbook("default", "blog");
        let dep = frontend(&sb).unwrap();
        let env = container(&dep).env.clone().unwrap();

        let names: Vec<&str> = env.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "PORT",
                "MONGODB_URI",
                "SECRET",
                "STRIPE_API_KEY",
                "USER_EMAIL",
                "USER_PASSWORD",
                "CLIENT_URL"
            ]
        );
        for var in &env {
            assert!(var.value.is_none(), "{} must come from the config map", var.name);
            assert_eq!(
                var.value_from.as_ref().unwrap().config_map_key_ref.as_ref().unwrap().name,
                "blog-cm"
            );
        }
    }

    #[test]
    fn test_frontend_replicas_port_and_labels() {
        let sb = make_socialbook("default", "blog");
        let dep = frontend(&sb).unwrap();
        let spec = dep.spec.as_ref().unwrap();

        assert_eq!(dep.metadata.name.as_deref(), Some("blog"));
        assert_eq!(spec.replicas, Some(3));
        assert_eq!(
            spec.selector.match_labels.as_ref().unwrap()["app"],
            "blog-sb"
        );
        assert_eq!(container(&dep).ports.as_ref().unwrap()[0].container_port, 8080);
    }
}
