//! External-name selection for a target reached through aliases

use crate::error::ResolveError;
use crate::types::{DeclId, ModuleId};

/// One alias asking for its canonical target to be exposed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRequest {
    pub alias: DeclId,
    /// Fully-qualified alias name, used in diagnostics
    pub qualified_name: String,
    /// Name the alias binds (its last path segment)
    pub name: String,
    pub module: ModuleId,
    /// Tagged `visible` directly: emitted as a forwarded binding of its own
    pub forward: bool,
    pub encourage: bool,
    /// Emission site requested through `expose_here`
    pub relocate_to: Option<ModuleId>,
    /// Visible only through an enclosing scope; transparent unless it is the sole name
    pub implicit: bool,
}

impl AliasRequest {
    pub fn is_explicit(&self) -> bool {
        self.forward || self.encourage || self.relocate_to.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    Encouraged(DeclId),
    Relocation(DeclId),
    /// The target's own name, from a direct exposure
    Target,
    Forwarded(DeclId),
    /// Implicitly visible alias promoted because nothing else names the target
    Promoted(DeclId),
}

impl NameSource {
    pub fn alias(&self) -> Option<DeclId> {
        match self {
            NameSource::Encouraged(id)
            | NameSource::Relocation(id)
            | NameSource::Forwarded(id)
            | NameSource::Promoted(id) => Some(*id),
            NameSource::Target => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingDecision {
    pub external_name: String,
    pub source: NameSource,
}

/// Pick the single external name for a target.
///
/// Precedence: encouraged alias, relocating alias, the target itself when
/// directly exposed, first forwarding alias, first implicit alias. Requests
/// are expected in traversal order. Returns `Ok(None)` when nothing exposes
/// the target.
pub fn choose_external_name(
    target_name: &str,
    target_short_name: &str,
    direct: bool,
    requests: &[AliasRequest],
) -> Result<Option<NamingDecision>, ResolveError> {
    let encouraged: Vec<&AliasRequest> = requests.iter().filter(|r| r.encourage).collect();
    if encouraged.len() > 1 {
        return Err(ResolveError::AmbiguousEncouragement {
            target: target_name.to_string(),
            aliases: encouraged
                .iter()
                .map(|r| r.qualified_name.clone())
                .collect(),
        });
    }

    let decision = |request: &AliasRequest, source: NameSource| NamingDecision {
        external_name: request.name.clone(),
        source,
    };

    if let Some(request) = encouraged.first() {
        return Ok(Some(decision(request, NameSource::Encouraged(request.alias))));
    }

    if let Some(request) = requests.iter().find(|r| r.relocate_to.is_some()) {
        return Ok(Some(decision(request, NameSource::Relocation(request.alias))));
    }

    if direct {
        return Ok(Some(NamingDecision {
            external_name: target_short_name.to_string(),
            source: NameSource::Target,
        }));
    }

    if let Some(request) = requests.iter().find(|r| r.forward) {
        return Ok(Some(decision(request, NameSource::Forwarded(request.alias))));
    }

    Ok(requests
        .iter()
        .find(|r| r.implicit)
        .map(|request| decision(request, NameSource::Promoted(request.alias))))
}
