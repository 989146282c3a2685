//! In-memory record of the resources a run created and deleted

/// Kind of remote resource the workflow touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    ResourceGroup,
    HostingPlan,
    Site,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::ResourceGroup => write!(f, "resource group"),
            ResourceKind::HostingPlan => write!(f, "hosting plan"),
            ResourceKind::Site => write!(f, "site"),
        }
    }
}

/// Handle to a remote resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub name: String,
}

impl ResourceRef {
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}

/// Tracks which resources currently exist because of this run
///
/// A run provisions into a single resource group, so deleting a group also
/// clears every plan and site recorded alongside it.
#[derive(Debug, Clone, Default)]
pub struct ResourceLedger {
    live: Vec<ResourceRef>,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a created (or updated) resource. Re-recording is a no-op.
    pub fn created(&mut self, resource: ResourceRef) {
        if !self.live.contains(&resource) {
            tracing::debug!("Recorded {}", resource);
            self.live.push(resource);
        }
    }

    /// Record a deletion
    pub fn deleted(&mut self, kind: ResourceKind, name: &str) {
        if kind == ResourceKind::ResourceGroup {
            self.live
                .retain(|r| r.kind == ResourceKind::ResourceGroup && r.name != name);
        } else {
            self.live.retain(|r| !(r.kind == kind && r.name == name));
        }
    }

    pub fn contains(&self, kind: ResourceKind, name: &str) -> bool {
        self.live.iter().any(|r| r.kind == kind && r.name == name)
    }

    /// Resources still alive, in creation order
    pub fn live(&self) -> &[ResourceRef] {
        &self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Get resources by kind
    pub fn by_kind(&self, kind: ResourceKind) -> Vec<&ResourceRef> {
        self.live.iter().filter(|r| r.kind == kind).collect()
    }
}

impl std::fmt::Display for ResourceLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.live.is_empty() {
            return write!(f, "nothing");
        }
        let names: Vec<String> = self.live.iter().map(ToString::to_string).collect();
        write!(f, "{}", names.join(", "))
    }
}
