//! The build context: grows an [`Nta`] one element at a time.
//!
//! A traverser walks the statement trace and drives a [`ModelBuilder`]
//! through the operations below. Handles returned by earlier calls stay valid
//! until [`ModelBuilder::new_automaton`] or [`ModelBuilder::reset`].
//!
//! # Example
//!
//! ```
//! use nta_builder::{serialize_to_string, ModelBuilder};
//!
//! let mut builder = ModelBuilder::new();
//! builder.new_automaton("counter");
//! builder.add_global_declaration("int x;");
//!
//! let t = builder.new_template("T");
//! let l0 = builder.new_location("L", t)?;
//! let l1 = builder.new_location("L", t)?;
//! builder.set_initial_location(l0, t)?;
//!
//! let e = builder.new_edge(t)?;
//! builder.set_edge_source(e, l0)?;
//! builder.set_edge_target(e, l1)?;
//! builder.set_edge_guard(e, "x>0")?;
//! builder.set_edge_update(e, "x:=x+1")?;
//!
//! let xml = serialize_to_string(builder.finalize_model()?)?;
//! assert!(xml.contains("<label kind=\"guard\">x&gt;0</label>"));
//! # Ok::<(), nta_builder::Error>(())
//! ```

use crate::error::{BuildError, EdgeEnd};
use crate::model::{
    location_name, Edge, EdgeId, Expression, Location, LocationId, Nta, Template, TemplateId,
};
use tracing::debug;

/// Owns the model under construction.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    nta: Nta,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The model as built so far.
    pub fn nta(&self) -> &Nta {
        &self.nta
    }

    /// Take the model out of the context, leaving a pristine one behind.
    pub fn take_nta(&mut self) -> Nta {
        std::mem::take(&mut self.nta)
    }

    /// Discard the current model and start an empty one called `name`.
    pub fn new_automaton(&mut self, name: impl Into<String>) {
        self.nta = Nta::new(name);
        debug!(name = %self.nta.name(), "Started new automaton");
    }

    pub fn new_template(&mut self, name: impl Into<String>) -> TemplateId {
        let id = self.nta.push_template(Template::new(name.into()));
        debug!(template = %id, name = %self.nta[id].name(), "Created template");
        id
    }

    pub fn add_local_declaration(
        &mut self,
        template: TemplateId,
        exp: impl Into<Expression>,
    ) -> Result<(), BuildError> {
        self.template_mut(template)?.push_declaration(exp.into());
        Ok(())
    }

    pub fn add_global_declaration(&mut self, exp: impl Into<Expression>) {
        self.nta.push_global_declaration(exp.into());
    }

    /// Declarations emitted at the top of the `<system>` block.
    pub fn add_system_declaration(&mut self, exp: impl Into<Expression>) {
        self.nta.push_system_declaration(exp.into());
    }

    /// Create a location in `template`, named `<prefix>_<N>` where `N` counts
    /// every location created so far in the whole model.
    pub fn new_location(&mut self, prefix: &str, template: TemplateId) -> Result<LocationId, BuildError> {
        self.check_template(template)?;
        let name = location_name(prefix, self.nta.location_count());
        let id = self.nta.push_location(Location::new(name, template));
        self.template_mut(template)?.push_location(id);
        debug!(location = %self.nta[id].name(), template = %template, "Created location");
        Ok(id)
    }

    /// Set (or overwrite) the initial location of `template`.
    pub fn set_initial_location(
        &mut self,
        location: LocationId,
        template: TemplateId,
    ) -> Result<(), BuildError> {
        self.check_template(template)?;
        self.check_owner(location, template)?;
        self.template_mut(template)?.set_init(location);
        Ok(())
    }

    pub fn set_location_comment(
        &mut self,
        location: LocationId,
        comment: impl Into<String>,
    ) -> Result<(), BuildError> {
        self.nta
            .location_mut(location)
            .ok_or(BuildError::UnknownLocation(location))?
            .set_comment(comment.into());
        Ok(())
    }

    /// Create an edge in `template` with no endpoints, guard or updates.
    pub fn new_edge(&mut self, template: TemplateId) -> Result<EdgeId, BuildError> {
        self.check_template(template)?;
        let id = self.nta.push_edge(Edge::new(template));
        self.template_mut(template)?.push_edge(id);
        Ok(id)
    }

    pub fn set_edge_source(&mut self, edge: EdgeId, location: LocationId) -> Result<(), BuildError> {
        self.set_edge_end(edge, EdgeEnd::Source, location)
    }

    pub fn set_edge_target(&mut self, edge: EdgeId, location: LocationId) -> Result<(), BuildError> {
        self.set_edge_end(edge, EdgeEnd::Target, location)
    }

    /// Replace the guard of `edge`.
    pub fn set_edge_guard(&mut self, edge: EdgeId, exp: impl Into<Expression>) -> Result<(), BuildError> {
        self.edge_mut(edge)?.set_guard(exp.into());
        Ok(())
    }

    /// Append an update to `edge`. Earlier updates are kept.
    pub fn set_edge_update(&mut self, edge: EdgeId, exp: impl Into<Expression>) -> Result<(), BuildError> {
        self.edge_mut(edge)?.push_update(exp.into());
        Ok(())
    }

    /// Check the model is complete and hand it out for serialization.
    ///
    /// Locations and edges are attached to their templates as they are
    /// created, so this only validates; calling it repeatedly is harmless.
    pub fn finalize_model(&self) -> Result<&Nta, BuildError> {
        self.nta.validate()?;
        debug!(
            templates = self.nta.template_count(),
            locations = self.nta.location_count(),
            edges = self.nta.edge_count(),
            "Model finalized"
        );
        Ok(&self.nta)
    }

    /// Drop everything, including the location counter.
    pub fn reset(&mut self) {
        self.nta = Nta::default();
    }

    fn set_edge_end(&mut self, edge: EdgeId, end: EdgeEnd, location: LocationId) -> Result<(), BuildError> {
        let template = self.nta.edge(edge).ok_or(BuildError::UnknownEdge(edge))?.template();
        self.check_owner(location, template)?;
        self.edge_mut(edge)?.set_end(end, location);
        Ok(())
    }

    fn check_template(&self, template: TemplateId) -> Result<(), BuildError> {
        match self.nta.template(template) {
            Some(_) => Ok(()),
            None => Err(BuildError::UnknownTemplate(template)),
        }
    }

    fn check_owner(&self, location: LocationId, template: TemplateId) -> Result<(), BuildError> {
        let owner = self
            .nta
            .location(location)
            .ok_or(BuildError::UnknownLocation(location))?
            .template();
        if owner != template {
            return Err(BuildError::ForeignLocation {
                location,
                owner,
                template,
            });
        }
        Ok(())
    }

    fn template_mut(&mut self, template: TemplateId) -> Result<&mut Template, BuildError> {
        self.nta
            .template_mut(template)
            .ok_or(BuildError::UnknownTemplate(template))
    }

    fn edge_mut(&mut self, edge: EdgeId) -> Result<&mut Edge, BuildError> {
        self.nta.edge_mut(edge).ok_or(BuildError::UnknownEdge(edge))
    }
}
