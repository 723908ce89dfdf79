use k8s_openapi::api::core::v1::{EnvVar, EnvVarSource, SecretKeySelector};
use std::collections::BTreeMap;

/// Sets the value of an environment variable.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvSetter {
    Value(String),
    SecretKey { secret: String, key: String },
}

impl EnvSetter {
    pub fn value(value: &str) -> Self {
        EnvSetter::Value(value.to_string())
    }

    pub fn secret_key(secret: &str, key: &str) -> Self {
        EnvSetter::SecretKey {
            secret: secret.to_string(),
            key: key.to_string(),
        }
    }

    fn apply(&self, env: &mut EnvVar) {
        match self {
            EnvSetter::Value(value) => {
                env.value = Some(value.clone());
                env.value_from = None;
            }
            EnvSetter::SecretKey { secret, key } => {
                env.value = None;
                env.value_from = Some(EnvVarSource {
                    secret_key_ref: Some(SecretKeySelector {
                        name: Some(secret.clone()),
                        key: key.clone(),
                        ..SecretKeySelector::default()
                    }),
                    ..EnvVarSource::default()
                });
            }
        }
    }
}

/// Applies `envs` on top of `base` and returns the variables sorted by name.
///
/// A setter replaces a base variable of the same name; new names are added.
pub fn merge_envs(base: Vec<EnvVar>, envs: &BTreeMap<String, EnvSetter>) -> Vec<EnvVar> {
    let mut merged: BTreeMap<String, EnvVar> = base
        .into_iter()
        .map(|env| (env.name.clone(), env))
        .collect();

    for (name, setter) in envs.iter() {
        let env = merged.entry(name.clone()).or_insert_with(|| EnvVar {
            name: name.clone(),
            ..EnvVar::default()
        });
        setter.apply(env);
    }

    merged.into_iter().map(|(_, env)| env).collect()
}
