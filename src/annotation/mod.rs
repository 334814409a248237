//! Exposure directives attached to declarations
//!
//! The front end surfaces each in-source marker as a [`RawAnnotation`]
//! (tag + optional payload). The [`extractor`] turns those into typed
//! [`Annotation`] values, validating the vocabulary and placement.
//!
//! [`RawAnnotation`]: crate::graph::RawAnnotation

pub mod cache;
pub mod extractor;

pub use cache::AnnotationCache;
pub use extractor::{AnnotationExtractor, ExtractionOutcome};

use crate::types::DeclKind;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The directive vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Directive {
    Visible,
    Hidden,
    Encourage,
    ExposeHere,
    Manual,
    Import,
}

impl Directive {
    pub const ALL: [Directive; 6] = [
        Directive::Visible,
        Directive::Hidden,
        Directive::Encourage,
        Directive::ExposeHere,
        Directive::Manual,
        Directive::Import,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Directive::Visible => "visible",
            Directive::Hidden => "hidden",
            Directive::Encourage => "encourage",
            Directive::ExposeHere => "expose_here",
            Directive::Manual => "manual",
            Directive::Import => "import",
        }
    }

    /// Whether this directive may be attached at `site`.
    pub fn allowed_on(&self, site: AnnotationSite) -> bool {
        use AnnotationSite::{Declaration, ModuleScope};

        match self {
            Directive::Visible | Directive::Hidden => true,
            Directive::Encourage | Directive::ExposeHere => {
                matches!(site, Declaration(DeclKind::Alias))
            }
            Directive::Manual => matches!(
                site,
                ModuleScope | Declaration(DeclKind::Namespace) | Declaration(DeclKind::Struct)
            ),
            Directive::Import => matches!(site, ModuleScope | Declaration(DeclKind::Namespace)),
        }
    }

    pub(crate) fn payload_rule(&self) -> PayloadRule {
        match self {
            Directive::Visible | Directive::Hidden | Directive::Encourage => PayloadRule::Forbidden,
            Directive::ExposeHere => PayloadRule::Optional,
            Directive::Manual | Directive::Import => PayloadRule::Required,
        }
    }
}

impl FromStr for Directive {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Directive::ALL
            .into_iter()
            .find(|directive| directive.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PayloadRule {
    Forbidden,
    Optional,
    Required,
}

/// Where an annotation sits: on a declaration, or at module (file) scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationSite {
    Declaration(DeclKind),
    ModuleScope,
}

impl fmt::Display for AnnotationSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationSite::Declaration(kind) => write!(f, "{kind}"),
            AnnotationSite::ModuleScope => f.write_str("module scope"),
        }
    }
}

/// A validated directive with its payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "directive", rename_all = "snake_case")]
pub enum Annotation {
    Visible,
    Hidden,
    Encourage,
    /// Relocate the target's emission site; `None` means the alias's own module
    ExposeHere { module: Option<String> },
    Manual { code: String },
    Import { module: String },
}

impl Annotation {
    pub fn directive(&self) -> Directive {
        match self {
            Annotation::Visible => Directive::Visible,
            Annotation::Hidden => Directive::Hidden,
            Annotation::Encourage => Directive::Encourage,
            Annotation::ExposeHere { .. } => Directive::ExposeHere,
            Annotation::Manual { .. } => Directive::Manual,
            Annotation::Import { .. } => Directive::Import,
        }
    }
}

/// Visibility decided at one scope level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeVisibility {
    Visible,
    Hidden,
}

/// Exposure and `hidden` requested at the same scope level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityConflict;

/// Ordered, immutable annotations of one declaration or module scope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationSet {
    items: Vec<Annotation>,
}

impl AnnotationSet {
    pub fn new(items: Vec<Annotation>) -> Self {
        Self { items }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn has(&self, directive: Directive) -> bool {
        self.items.iter().any(|a| a.directive() == directive)
    }

    /// Relocation request, with its optional target module.
    pub fn expose_here(&self) -> Option<Option<&str>> {
        self.items.iter().find_map(|a| match a {
            Annotation::ExposeHere { module } => Some(module.as_deref()),
            _ => None,
        })
    }

    pub fn manual_blocks(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|a| match a {
            Annotation::Manual { code } => Some(code.as_str()),
            _ => None,
        })
    }

    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|a| match a {
            Annotation::Import { module } => Some(module.as_str()),
            _ => None,
        })
    }

    /// Visibility requested at this scope level.
    ///
    /// `encourage` and `expose_here` request exposure just like `visible`.
    /// Fails when exposure and `hidden` are both present.
    pub fn visibility(&self) -> Result<Option<ScopeVisibility>, VisibilityConflict> {
        let exposed = self.has(Directive::Visible)
            || self.has(Directive::Encourage)
            || self.has(Directive::ExposeHere);
        let hidden = self.has(Directive::Hidden);

        match (exposed, hidden) {
            (true, true) => Err(VisibilityConflict),
            (true, false) => Ok(Some(ScopeVisibility::Visible)),
            (false, true) => Ok(Some(ScopeVisibility::Hidden)),
            (false, false) => Ok(None),
        }
    }
}
