//! Callable method catalogue.

use crate::index::qualify_type_name;
use crate::model::DescriptorSet;
use std::fmt;

/// `package.Service.Method` (or `Service.Method` in the root package).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallableMethod(String);

impl CallableMethod {
    pub fn new(service_fqn: &str, method: &str) -> Self {
        CallableMethod(format!("{service_fqn}.{method}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CallableMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CallableMethod {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for CallableMethod {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CallableMethod {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Every method of every service, in file → service → method declaration order.
pub fn list_methods(set: &DescriptorSet) -> Vec<CallableMethod> {
    let mut out = Vec::new();
    for file in &set.files {
        for service in &file.services {
            let service_fqn = qualify_type_name(&file.package, &service.name);
            for method in &service.methods {
                out.push(CallableMethod::new(&service_fqn, &method.name));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileDescriptor, MethodDescriptor, ServiceDescriptor};

    fn service(name: &str, methods: &[&str]) -> ServiceDescriptor {
        ServiceDescriptor {
            name: name.to_string(),
            methods: methods
                .iter()
                .map(|m| MethodDescriptor {
                    name: m.to_string(),
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[test]
    fn test_declaration_order_is_kept_across_files() {
        let set = DescriptorSet {
            files: vec![
                FileDescriptor {
                    package: "b".to_string(),
                    services: vec![service("Zeta", &["Z", "A"])],
                    ..Default::default()
                },
                FileDescriptor {
                    package: "a".to_string(),
                    services: vec![service("Alpha", &["M"]), service("Beta", &["N"])],
                    ..Default::default()
                },
            ],
        };
        assert_eq!(
            list_methods(&set),
            vec!["b.Zeta.Z", "b.Zeta.A", "a.Alpha.M", "a.Beta.N"]
        );
    }

    #[test]
    fn test_no_services_is_empty() {
        let set = DescriptorSet {
            files: vec![FileDescriptor::default()],
        };
        assert!(list_methods(&set).is_empty());
    }
}
