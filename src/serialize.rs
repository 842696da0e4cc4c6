//! UPPAAL XML serialization.
//!
//! Renders an [`Nta`] into the flat-system XML format read by UPPAAL: a
//! header with the global declarations, one `<template>` block per template
//! and a `<system>` footer instantiating every template once.
//!
//! Edges carry an assignment label only when they have exactly one update.
//! Edges with several updates are written without one; traversers are
//! expected to chain single-update edges instead.

use crate::error::NtaResult;
use crate::model::{Edge, Expression, Location, Nta, Template};
use crate::util::with_appended_extension;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

pub const XML_PROLOG: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

pub const DOCTYPE: &str = "<!DOCTYPE nta PUBLIC '-//Uppaal Team//DTD Flat System 1.1//EN' \
                           'http://www.it.uu.se/research/group/darts/uppaal/flat-1_1.dtd'>";

/// Prefix of the generated process instance names in the system block.
pub const PROCESS_PREFIX: &str = "Process";

/// Write `nta` as UPPAAL XML.
///
/// The model is validated first, so nothing is written for a model with a
/// missing initial location or a dangling edge.
pub fn serialize(out: &mut impl Write, nta: &Nta) -> NtaResult<()> {
    nta.validate()?;
    write_header(out, nta)?;
    for (_, template) in nta.templates() {
        write_template(out, nta, template)?;
    }
    write_footer(out, nta)?;
    Ok(())
}

pub fn serialize_to_string(nta: &Nta) -> NtaResult<String> {
    let mut out = Vec::new();
    serialize(&mut out, nta)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Serialize `nta` into `<path>.xml` and return the written path.
pub fn write_xml_file(nta: &Nta, path: &Path) -> NtaResult<PathBuf> {
    nta.validate()?;
    let xml_path = with_appended_extension(path, "xml");
    let file = std::fs::File::create(&xml_path)?;
    let mut writer = std::io::BufWriter::new(file);
    serialize(&mut writer, nta)?;
    writer.flush()?;
    info!(path = %xml_path.display(), templates = nta.template_count(), "Wrote UPPAAL model");
    Ok(xml_path)
}

/// Like [`write_xml_file`], but failures are logged and reported as `None`.
pub fn save_to_xml(nta: &Nta, path: &Path) -> Option<PathBuf> {
    match write_xml_file(nta, path) {
        Ok(xml_path) => Some(xml_path),
        Err(e) => {
            error!(path = %path.display(), error = %e, "An error has occurred while creating the XML file");
            None
        }
    }
}

fn write_header(out: &mut impl Write, nta: &Nta) -> std::io::Result<()> {
    writeln!(out, "{XML_PROLOG}")?;
    writeln!(out, "{DOCTYPE}")?;
    writeln!(out, "<nta>")?;
    write_declarations(out, nta.global_declarations())
}

/// Declarations go one per line, with a blank line between consecutive ones.
fn write_declarations(out: &mut impl Write, declarations: &[Expression]) -> std::io::Result<()> {
    write!(out, "<declaration>")?;
    if !declarations.is_empty() {
        let body: Vec<String> = declarations.iter().map(|d| escape_text(d.exp())).collect();
        write!(out, "\n{}\n", body.join("\n\n"))?;
    }
    writeln!(out, "</declaration>")
}

fn write_template(out: &mut impl Write, nta: &Nta, template: &Template) -> NtaResult<()> {
    debug!(
        template = %template.name(),
        locations = template.locations().len(),
        edges = template.edges().len(),
        "Serializing template"
    );
    writeln!(out, "<template>")?;
    writeln!(out, "<name>{}</name>", escape_text(template.name()))?;
    write_declarations(out, template.declarations())?;

    for &id in template.locations() {
        write_location(out, &nta[id])?;
    }

    // validated by the caller
    if let Some(init) = template.init() {
        writeln!(out, "<init ref=\"{}\"/>", escape_attr(nta[init].name()))?;
    }

    for &id in template.edges() {
        write_transition(out, nta, &nta[id])?;
    }
    writeln!(out, "</template>")?;
    Ok(())
}

fn write_location(out: &mut impl Write, location: &Location) -> std::io::Result<()> {
    writeln!(out, "<location id=\"{}\">", escape_attr(location.name()))?;
    writeln!(out, "<name>{}</name>", escape_text(location.name()))?;
    if let Some(comment) = location.comment() {
        writeln!(out, "<label kind=\"comments\">{}</label>", escape_text(comment))?;
    }
    writeln!(out, "</location>")
}

fn write_transition(out: &mut impl Write, nta: &Nta, edge: &Edge) -> std::io::Result<()> {
    writeln!(out, "<transition>")?;
    if let Some(source) = edge.source() {
        writeln!(out, "<source ref=\"{}\"/>", escape_attr(nta[source].name()))?;
    }
    if let Some(target) = edge.target() {
        writeln!(out, "<target ref=\"{}\"/>", escape_attr(nta[target].name()))?;
    }
    if let Some(guard) = edge.guard() {
        writeln!(out, "<label kind=\"guard\">{}</label>", escape_text(guard.exp()))?;
    }
    if let [update] = edge.updates() {
        writeln!(out, "<label kind=\"assignment\">{}</label>", escape_text(update.exp()))?;
    }
    writeln!(out, "</transition>")
}

/// Process numbering restarts at 1 for every call.
fn write_footer(out: &mut impl Write, nta: &Nta) -> std::io::Result<()> {
    writeln!(out, "<system>")?;
    for declaration in nta.system_declarations() {
        writeln!(out, "{}", escape_text(declaration.exp()))?;
    }

    let mut processes = Vec::with_capacity(nta.template_count());
    for (k, (_, template)) in nta.templates().enumerate() {
        let process = format!("{PROCESS_PREFIX}{}", k + 1);
        writeln!(out, "{process} =  {}();", escape_text(template.name()))?;
        processes.push(process);
    }

    writeln!(out, "system ")?;
    writeln!(out, "{};", processes.join(", "))?;
    writeln!(out, "</system>")?;
    writeln!(out, "</nta>")
}

/// Escape character data for an XML element body.
fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// Escape a double-quoted XML attribute value.
fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}
