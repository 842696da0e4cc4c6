//! Statement traces and the traversal that turns them into automata.
//!
//! A trace is a newline-delimited JSON file with one statement per line:
//! ```json
//! {"kind": "global_declaration", "expr": "int x = 0;"}
//! {"kind": "test", "expr": "x >= 0"}
//! {"kind": "update", "expr": "x := x + 1"}
//! ```
//!
//! [`SequentialTraverser`] chains the statements into a single template: each
//! update becomes a new location reached by an edge carrying that update, and
//! each test becomes the guard of the next edge.

use crate::builder::ModelBuilder;
use crate::error::{NtaResult, StatementError};
use crate::model::{LocationId, TemplateId};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// One executable statement of the source trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Statement {
    /// Assignment executed on the way to the next location.
    Update { expr: String },
    /// Condition without branches; guards the next transition.
    Test { expr: String },
    LocalDeclaration { expr: String },
    GlobalDeclaration { expr: String },
    /// Free text attached to the current location.
    Comment { text: String },
}

impl Statement {
    pub fn update(expr: impl Into<String>) -> Self {
        Statement::Update { expr: expr.into() }
    }

    pub fn test(expr: impl Into<String>) -> Self {
        Statement::Test { expr: expr.into() }
    }
}

/// Read a statement trace from an NDJSON file. Blank lines are skipped.
pub fn load_statements(path: &Path) -> Result<Vec<Statement>, StatementError> {
    if !path.is_file() {
        return Err(StatementError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let statements = parse_statements(&content)?;
    if statements.is_empty() {
        return Err(StatementError::Empty(path.to_path_buf()));
    }
    info!(path = %path.display(), count = statements.len(), "Loaded statements");
    Ok(statements)
}

pub fn parse_statements(content: &str) -> Result<Vec<Statement>, StatementError> {
    let mut statements = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let statement = serde_json::from_str(line).map_err(|e| StatementError::InvalidJson {
            line: i + 1,
            reason: e.to_string(),
        })?;
        statements.push(statement);
    }
    Ok(statements)
}

/// Drives a [`ModelBuilder`] from a statement sequence.
pub trait Traverser {
    fn run(&mut self, builder: &mut ModelBuilder, statements: &[Statement]) -> NtaResult<()>;
}

/// Turns a straight-line trace into one template of chained locations.
#[derive(Debug, Clone)]
pub struct SequentialTraverser {
    template_name: String,
    location_prefix: String,
    initial_comment: Option<String>,
}

impl SequentialTraverser {
    pub fn new(template_name: impl Into<String>) -> Self {
        Self {
            template_name: template_name.into(),
            location_prefix: String::new(),
            initial_comment: None,
        }
    }

    /// Prefix for generated location names; empty means `Location`.
    pub fn location_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.location_prefix = prefix.into();
        self
    }

    pub fn initial_comment(mut self, comment: Option<String>) -> Self {
        self.initial_comment = comment;
        self
    }
}

/// Traversal position inside the template being built.
struct Cursor {
    template: TemplateId,
    current: LocationId,
    pending_guard: Option<String>,
}

impl SequentialTraverser {
    /// Move to a fresh location over a new edge carrying the pending guard
    /// and, if given, `update`.
    fn advance(&self, builder: &mut ModelBuilder, cursor: &mut Cursor, update: Option<&str>) -> NtaResult<()> {
        let next = builder.new_location(&self.location_prefix, cursor.template)?;
        let edge = builder.new_edge(cursor.template)?;
        builder.set_edge_source(edge, cursor.current)?;
        builder.set_edge_target(edge, next)?;
        if let Some(guard) = cursor.pending_guard.take() {
            builder.set_edge_guard(edge, guard)?;
        }
        if let Some(update) = update {
            builder.set_edge_update(edge, update)?;
        }
        cursor.current = next;
        Ok(())
    }
}

impl Traverser for SequentialTraverser {
    fn run(&mut self, builder: &mut ModelBuilder, statements: &[Statement]) -> NtaResult<()> {
        let template = builder.new_template(self.template_name.as_str());
        let initial = builder.new_location(&self.location_prefix, template)?;
        builder.set_initial_location(initial, template)?;
        if let Some(comment) = &self.initial_comment {
            builder.set_location_comment(initial, comment.as_str())?;
        }

        let mut cursor = Cursor {
            template,
            current: initial,
            pending_guard: None,
        };

        for statement in statements {
            debug!(?statement, "Traversing statement");
            match statement {
                Statement::Update { expr } => self.advance(builder, &mut cursor, Some(expr.as_str()))?,
                Statement::Test { expr } => {
                    cursor.pending_guard = Some(match cursor.pending_guard.take() {
                        Some(guard) => format!("{guard} && {expr}"),
                        None => expr.clone(),
                    });
                }
                Statement::LocalDeclaration { expr } => {
                    builder.add_local_declaration(template, expr.as_str())?
                }
                Statement::GlobalDeclaration { expr } => builder.add_global_declaration(expr.as_str()),
                Statement::Comment { text } => builder.set_location_comment(cursor.current, text.as_str())?,
            }
        }

        if cursor.pending_guard.is_some() {
            self.advance(builder, &mut cursor, None)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Expression;

    #[test]
    fn parse_statement_kinds() {
        let statements = parse_statements(
            r#"{"kind": "update", "expr": "x := 1"}

{"kind": "test", "expr": "x > 0"}
{"kind": "comment", "text": "done"}"#,
        )
        .unwrap();
        assert_eq!(
            statements,
            vec![
                Statement::update("x := 1"),
                Statement::test("x > 0"),
                Statement::Comment { text: "done".to_string() },
            ]
        );
    }

    #[test]
    fn parse_reports_line_number() {
        let err = parse_statements("{\"kind\": \"update\", \"expr\": \"a\"}\n{\"kind\": \"jump\"}").unwrap_err();
        assert!(matches!(err, StatementError::InvalidJson { line: 2, .. }));
    }

    #[test]
    fn updates_chain_locations() {
        let mut b = ModelBuilder::new();
        b.new_automaton("m");
        let statements = [Statement::update("x:=1"), Statement::update("x:=2")];
        SequentialTraverser::new("T").run(&mut b, &statements).unwrap();

        let nta = b.finalize_model().unwrap();
        assert_eq!(nta.location_count(), 3);
        assert_eq!(nta.edge_count(), 2);
        let (t, template) = nta.templates().next().unwrap();
        assert_eq!(template.init(), nta.find_location(t, "Location_0"));
        let second = &nta[template.edges()[1]];
        assert_eq!(nta[second.source().unwrap()].name(), "Location_1");
        assert_eq!(nta[second.target().unwrap()].name(), "Location_2");
        assert_eq!(second.updates(), &[Expression::new("x:=2")]);
    }

    #[test]
    fn tests_guard_the_next_edge() {
        let mut b = ModelBuilder::new();
        let statements = [
            Statement::test("x>0"),
            Statement::test("y>0"),
            Statement::update("x:=x+1"),
        ];
        SequentialTraverser::new("T")
            .location_prefix("S")
            .run(&mut b, &statements)
            .unwrap();

        let nta = b.nta();
        assert_eq!(nta.location_count(), 2);
        let (_, template) = nta.templates().next().unwrap();
        let edge = &nta[template.edges()[0]];
        assert_eq!(edge.guard().map(Expression::exp), Some("x>0 && y>0"));
        assert_eq!(nta[edge.target().unwrap()].name(), "S_1");
    }

    #[test]
    fn trailing_test_gets_final_edge() {
        let mut b = ModelBuilder::new();
        let statements = [Statement::update("x:=1"), Statement::test("x==1")];
        SequentialTraverser::new("T").run(&mut b, &statements).unwrap();

        let nta = b.nta();
        assert_eq!(nta.edge_count(), 2);
        let (_, template) = nta.templates().next().unwrap();
        let last = &nta[template.edges()[1]];
        assert_eq!(last.guard().map(Expression::exp), Some("x==1"));
        assert!(last.updates().is_empty());
    }

    #[test]
    fn comments_and_declarations() {
        let mut b = ModelBuilder::new();
        let statements = [
            Statement::GlobalDeclaration { expr: "int x;".to_string() },
            Statement::LocalDeclaration { expr: "clock c;".to_string() },
            Statement::Comment { text: "start".to_string() },
        ];
        SequentialTraverser::new("T")
            .initial_comment(Some("from trace".to_string()))
            .run(&mut b, &statements)
            .unwrap();

        let nta = b.nta();
        assert_eq!(nta.global_declarations(), &[Expression::new("int x;")]);
        let (_, template) = nta.templates().next().unwrap();
        assert_eq!(template.declarations(), &[Expression::new("clock c;")]);
        assert_eq!(nta[template.locations()[0]].comment(), Some("start"));
    }
}
