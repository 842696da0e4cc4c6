//! In-memory network of timed automata (NTA).
//!
//! All graph elements live in arenas owned by the [`Nta`]. Templates list the
//! ids of their own locations and edges in creation order; every
//! cross-reference is an id into one of the arenas.

use crate::error::{BuildError, EdgeEnd};
use cranelift_entity::{entity_impl, PrimaryMap};
use std::ops::Index;

#[cfg(feature = "snapshot")]
use serde::Serialize;

/// Prefix used for generated location names when the caller supplies none.
pub const DEFAULT_LOCATION_PREFIX: &str = "Location";

#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "snapshot", derive(Serialize))]
pub struct TemplateId(u32);
entity_impl!(TemplateId, "template");

#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "snapshot", derive(Serialize))]
pub struct LocationId(u32);
entity_impl!(LocationId, "location");

#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "snapshot", derive(Serialize))]
pub struct EdgeId(u32);
entity_impl!(EdgeId, "edge");

/// An opaque guard, update or declaration text. Never parsed or checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "snapshot", derive(Serialize), serde(transparent))]
pub struct Expression(String);

impl Expression {
    pub fn new(exp: impl Into<String>) -> Self {
        Self(exp.into())
    }

    pub fn exp(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Expression {
    fn from(exp: &str) -> Self {
        Self::new(exp)
    }
}

impl From<String> for Expression {
    fn from(exp: String) -> Self {
        Self(exp)
    }
}

/// Name for the `n`-th location of a model.
///
/// An empty prefix falls back to [`DEFAULT_LOCATION_PREFIX`].
pub fn location_name(prefix: &str, n: usize) -> String {
    if prefix.is_empty() {
        format!("{DEFAULT_LOCATION_PREFIX}_{n}")
    } else {
        format!("{prefix}_{n}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "snapshot", derive(Serialize))]
pub struct Template {
    name: String,
    declarations: Vec<Expression>,
    locations: Vec<LocationId>,
    edges: Vec<EdgeId>,
    init: Option<LocationId>,
}

impl Template {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            declarations: Vec::new(),
            locations: Vec::new(),
            edges: Vec::new(),
            init: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Template-local declarations, in insertion order.
    pub fn declarations(&self) -> &[Expression] {
        &self.declarations
    }

    pub fn locations(&self) -> &[LocationId] {
        &self.locations
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn init(&self) -> Option<LocationId> {
        self.init
    }

    pub(crate) fn push_declaration(&mut self, exp: Expression) {
        self.declarations.push(exp);
    }

    pub(crate) fn push_location(&mut self, id: LocationId) {
        self.locations.push(id);
    }

    pub(crate) fn push_edge(&mut self, id: EdgeId) {
        self.edges.push(id);
    }

    pub(crate) fn set_init(&mut self, id: LocationId) {
        self.init = Some(id);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "snapshot", derive(Serialize))]
pub struct Location {
    name: String,
    comment: Option<String>,
    template: TemplateId,
}

impl Location {
    pub(crate) fn new(name: String, template: TemplateId) -> Self {
        Self {
            name,
            comment: None,
            template,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// The template this location belongs to.
    pub fn template(&self) -> TemplateId {
        self.template
    }

    pub(crate) fn set_comment(&mut self, comment: String) {
        self.comment = Some(comment);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "snapshot", derive(Serialize))]
pub struct Edge {
    template: TemplateId,
    source: Option<LocationId>,
    target: Option<LocationId>,
    guard: Option<Expression>,
    updates: Vec<Expression>,
}

impl Edge {
    pub(crate) fn new(template: TemplateId) -> Self {
        Self {
            template,
            source: None,
            target: None,
            guard: None,
            updates: Vec::new(),
        }
    }

    pub fn template(&self) -> TemplateId {
        self.template
    }

    pub fn source(&self) -> Option<LocationId> {
        self.source
    }

    pub fn target(&self) -> Option<LocationId> {
        self.target
    }

    pub fn guard(&self) -> Option<&Expression> {
        self.guard.as_ref()
    }

    /// All update expressions, in insertion order.
    ///
    /// The XML output only carries an assignment label when there is exactly
    /// one update.
    pub fn updates(&self) -> &[Expression] {
        &self.updates
    }

    pub(crate) fn set_end(&mut self, end: EdgeEnd, location: LocationId) {
        match end {
            EdgeEnd::Source => self.source = Some(location),
            EdgeEnd::Target => self.target = Some(location),
        }
    }

    pub(crate) fn set_guard(&mut self, guard: Expression) {
        self.guard = Some(guard);
    }

    pub(crate) fn push_update(&mut self, update: Expression) {
        self.updates.push(update);
    }
}

/// The top-level model: declarations plus the template/location/edge arenas.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "snapshot", derive(Serialize))]
pub struct Nta {
    name: String,
    global_declarations: Vec<Expression>,
    system_declarations: Vec<Expression>,
    templates: PrimaryMap<TemplateId, Template>,
    locations: PrimaryMap<LocationId, Location>,
    edges: PrimaryMap<EdgeId, Edge>,
}

impl Nta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn global_declarations(&self) -> &[Expression] {
        &self.global_declarations
    }

    pub fn system_declarations(&self) -> &[Expression] {
        &self.system_declarations
    }

    /// Templates in creation order.
    pub fn templates(&self) -> impl Iterator<Item = (TemplateId, &Template)> {
        self.templates.iter()
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    /// Number of locations created in this model, across all templates.
    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn template(&self, id: TemplateId) -> Option<&Template> {
        self.templates.get(id)
    }

    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Look up a location of `template` by its generated name.
    pub fn find_location(&self, template: TemplateId, name: &str) -> Option<LocationId> {
        self.templates
            .get(template)?
            .locations
            .iter()
            .copied()
            .find(|&id| self.locations[id].name == name)
    }

    /// Check that the model can be rendered: every template has an initial
    /// location and every edge has both endpoints set.
    pub fn validate(&self) -> Result<(), BuildError> {
        for (_, template) in self.templates.iter() {
            if template.init.is_none() {
                return Err(BuildError::MissingInitialLocation {
                    template: template.name.clone(),
                });
            }
            for &edge_id in &template.edges {
                let edge = &self.edges[edge_id];
                for (end, location) in [(EdgeEnd::Source, edge.source), (EdgeEnd::Target, edge.target)] {
                    if location.is_none() {
                        return Err(BuildError::DanglingEdge {
                            template: template.name.clone(),
                            edge: edge_id,
                            end,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub(crate) fn push_global_declaration(&mut self, exp: Expression) {
        self.global_declarations.push(exp);
    }

    pub(crate) fn push_system_declaration(&mut self, exp: Expression) {
        self.system_declarations.push(exp);
    }

    pub(crate) fn push_template(&mut self, template: Template) -> TemplateId {
        self.templates.push(template)
    }

    pub(crate) fn push_location(&mut self, location: Location) -> LocationId {
        self.locations.push(location)
    }

    pub(crate) fn push_edge(&mut self, edge: Edge) -> EdgeId {
        self.edges.push(edge)
    }

    pub(crate) fn template_mut(&mut self, id: TemplateId) -> Option<&mut Template> {
        self.templates.get_mut(id)
    }

    pub(crate) fn location_mut(&mut self, id: LocationId) -> Option<&mut Location> {
        self.locations.get_mut(id)
    }

    pub(crate) fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id)
    }
}

impl Index<TemplateId> for Nta {
    type Output = Template;

    fn index(&self, index: TemplateId) -> &Self::Output {
        &self.templates[index]
    }
}

impl Index<LocationId> for Nta {
    type Output = Location;

    fn index(&self, index: LocationId) -> &Self::Output {
        &self.locations[index]
    }
}

impl Index<EdgeId> for Nta {
    type Output = Edge;

    fn index(&self, index: EdgeId) -> &Self::Output {
        &self.edges[index]
    }
}
