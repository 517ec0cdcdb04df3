use pkg_types::quota::ResourceQuotaLimit;

/// One quota-limited resource type. `Dimension::ALL` fixes the order in
/// which dimensions are checked and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Pods,
    Services,
    ReplicationControllers,
    Secrets,
    ConfigMaps,
    PersistentVolumeClaims,
    ServicesNodePorts,
    ServicesLoadBalancers,
    RequestsCpu,
    RequestsMemory,
    RequestsStorage,
    LimitsCpu,
    LimitsMemory,
}

impl Dimension {
    pub const ALL: [Dimension; 13] = [
        Dimension::Pods,
        Dimension::Services,
        Dimension::ReplicationControllers,
        Dimension::Secrets,
        Dimension::ConfigMaps,
        Dimension::PersistentVolumeClaims,
        Dimension::ServicesNodePorts,
        Dimension::ServicesLoadBalancers,
        Dimension::RequestsCpu,
        Dimension::RequestsMemory,
        Dimension::RequestsStorage,
        Dimension::LimitsCpu,
        Dimension::LimitsMemory,
    ];

    /// Name used in rejection messages.
    pub fn name(self) -> &'static str {
        match self {
            Dimension::Pods => "Pods",
            Dimension::Services => "Services",
            Dimension::ReplicationControllers => "ReplicationControllers",
            Dimension::Secrets => "Secrets",
            Dimension::ConfigMaps => "ConfigMaps",
            Dimension::PersistentVolumeClaims => "PersistentVolumeClaims",
            Dimension::ServicesNodePorts => "ServicesNodePorts",
            Dimension::ServicesLoadBalancers => "ServicesLoadBalancers",
            Dimension::RequestsCpu => "RequestsCPU",
            Dimension::RequestsMemory => "RequestsMemory",
            Dimension::RequestsStorage => "RequestsStorage",
            Dimension::LimitsCpu => "LimitsCPU",
            Dimension::LimitsMemory => "LimitsMemory",
        }
    }

    /// The raw quantity string set for this dimension; unset reads as "".
    pub fn value(self, limit: &ResourceQuotaLimit) -> &str {
        let field = match self {
            Dimension::Pods => &limit.pods,
            Dimension::Services => &limit.services,
            Dimension::ReplicationControllers => &limit.replication_controllers,
            Dimension::Secrets => &limit.secrets,
            Dimension::ConfigMaps => &limit.config_maps,
            Dimension::PersistentVolumeClaims => &limit.persistent_volume_claims,
            Dimension::ServicesNodePorts => &limit.services_node_ports,
            Dimension::ServicesLoadBalancers => &limit.services_load_balancers,
            Dimension::RequestsCpu => &limit.requests_cpu,
            Dimension::RequestsMemory => &limit.requests_memory,
            Dimension::RequestsStorage => &limit.requests_storage,
            Dimension::LimitsCpu => &limit.limits_cpu,
            Dimension::LimitsMemory => &limit.limits_memory,
        };
        field.as_deref().unwrap_or("")
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_is_reachable() {
        let limit = ResourceQuotaLimit {
            pods: Some("1".into()),
            services: Some("2".into()),
            replication_controllers: Some("3".into()),
            secrets: Some("4".into()),
            config_maps: Some("5".into()),
            persistent_volume_claims: Some("6".into()),
            services_node_ports: Some("7".into()),
            services_load_balancers: Some("8".into()),
            requests_cpu: Some("9".into()),
            requests_memory: Some("10".into()),
            requests_storage: Some("11".into()),
            limits_cpu: Some("12".into()),
            limits_memory: Some("13".into()),
        };
        let values: Vec<&str> = Dimension::ALL.iter().map(|d| d.value(&limit)).collect();
        assert_eq!(
            values,
            vec!["1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13"]
        );
    }

    #[test]
    fn test_unset_reads_empty() {
        let limit = ResourceQuotaLimit::default();
        assert!(Dimension::ALL.iter().all(|d| d.value(&limit).is_empty()));
    }

    #[test]
    fn test_names_in_table_order() {
        let names: Vec<&str> = Dimension::ALL.iter().map(|d| d.name()).collect();
        assert_eq!(names.first(), Some(&"Pods"));
        assert_eq!(names.last(), Some(&"LimitsMemory"));
        assert_eq!(Dimension::RequestsCpu.to_string(), "RequestsCPU");
        assert_eq!(Dimension::LimitsCpu.to_string(), "LimitsCPU");
    }
}
