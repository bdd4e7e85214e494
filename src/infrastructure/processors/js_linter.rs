use crate::core::interfaces::SourceLinter;
use crate::core::models::LintFinding;
use crate::core::rules::*;
use crate::utils::position::line_col;
use oxc_allocator::Allocator;
use oxc_ast::ast::{BinaryExpression, BinaryOperator, Expression, StaticMemberExpression};
use oxc_ast::AstKind;
use oxc_diagnostics::OxcDiagnostic;
use oxc_parser::Parser;
use oxc_semantic::{AstNode, Semantic, SemanticBuilder};
use oxc_span::{GetSpan, SourceType};
use std::path::{Path, PathBuf};

/// Linter backed by the oxc parser and semantic analysis.
///
/// Every rule except the line length check works on the parsed module, so
/// code inside template substitutions is linted like any other code.
#[derive(Debug, Default, Clone)]
pub struct OxcLinter;

impl OxcLinter {
    pub fn new() -> Self {
        Self
    }
}

impl SourceLinter for OxcLinter {
    fn lint(&self, file: &Path, source: &str, profile: &RuleProfile) -> Vec<LintFinding> {
        let mut sink = FindingSink {
            file: file.to_path_buf(),
            source,
            profile,
            findings: Vec::new(),
        };

        check_module(&mut sink);
        check_line_length(&mut sink);

        let mut findings = sink.findings;
        findings.sort_by(|a, b| {
            (a.line, a.column, &a.rule).cmp(&(b.line, b.column, &b.rule))
        });
        findings
    }
}

struct FindingSink<'a> {
    file: PathBuf,
    source: &'a str,
    profile: &'a RuleProfile,
    findings: Vec<LintFinding>,
}

impl FindingSink<'_> {
    fn report(&mut self, rule: &str, offset: usize, message: String, detail: Option<String>) {
        let (line, column) = line_col(self.source, offset);
        self.report_at(rule, line, column, message, detail);
    }

    fn report_at(
        &mut self,
        rule: &str,
        line: usize,
        column: usize,
        message: String,
        detail: Option<String>,
    ) {
        let Some(severity) = self.profile.severity(rule) else {
            return;
        };

        self.findings.push(LintFinding {
            file: self.file.clone(),
            line,
            column,
            rule: rule.to_string(),
            severity,
            message,
            detail,
        });
    }
}

fn diagnostic_offset(diagnostic: &OxcDiagnostic) -> usize {
    diagnostic
        .labels
        .as_ref()
        .and_then(|labels| labels.first())
        .map(|label| label.offset())
        .unwrap_or(0)
}

fn check_module(sink: &mut FindingSink<'_>) {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, sink.source, SourceType::cjs()).parse();

    if parsed.panicked || !parsed.errors.is_empty() {
        for diagnostic in &parsed.errors {
            sink.report(
                SYNTAX_ERROR,
                diagnostic_offset(diagnostic),
                diagnostic.to_string(),
                None,
            );
        }
        return;
    }

    let semantic_ret = SemanticBuilder::new().build(&parsed.program);
    let semantic = &semantic_ret.semantic;

    check_references(sink, semantic);
    check_unused(sink, semantic);
    for node in semantic.nodes().iter() {
        check_node(sink, semantic, node);
    }
}

fn check_references(sink: &mut FindingSink<'_>, semantic: &Semantic<'_>) {
    let scoping = semantic.scoping();
    let mut unresolved: Vec<(String, usize)> = scoping
        .root_unresolved_references()
        .iter()
        .filter(|(name, _)| !sink.profile.allows_global(name))
        .map(|(name, references)| {
            let offset = references
                .iter()
                .map(|&id| {
                    let node_id = scoping.get_reference(id).node_id();
                    semantic.nodes().get_node(node_id).kind().span().start as usize
                })
                .min()
                .unwrap_or(0);
            (name.to_string(), offset)
        })
        .collect();
    unresolved.sort();

    for (name, offset) in unresolved {
        sink.report(
            UNDECLARED_GLOBAL,
            offset,
            format!("Undeclared '{}'.", name),
            Some(name),
        );
    }
}

fn check_unused(sink: &mut FindingSink<'_>, semantic: &Semantic<'_>) {
    let scoping = semantic.scoping();
    let mut unused: Vec<(usize, String)> = scoping
        .symbol_ids()
        .filter(|&symbol_id| scoping.get_resolved_reference_ids(symbol_id).is_empty())
        .map(|symbol_id| {
            (
                scoping.symbol_span(symbol_id).start as usize,
                scoping.symbol_name(symbol_id).to_string(),
            )
        })
        .filter(|(_, name)| !name.starts_with('_'))
        .collect();
    unused.sort();

    for (offset, name) in unused {
        sink.report(
            UNUSED_BINDING,
            offset,
            format!("Unused '{}'.", name),
            Some(name),
        );
    }
}

fn check_node(sink: &mut FindingSink<'_>, semantic: &Semantic<'_>, node: &AstNode<'_>) {
    match node.kind() {
        AstKind::DebuggerStatement(statement) => {
            sink.report(
                NO_DEBUGGER,
                statement.span.start as usize,
                "Unexpected 'debugger'.".to_string(),
                None,
            );
        }
        AstKind::BinaryExpression(binary) => check_equality(sink, binary),
        AstKind::Directive(directive) if directive.directive == "use strict" => {
            let leading = match semantic.nodes().parent_kind(node.id()) {
                AstKind::Program(program) => program
                    .directives
                    .first()
                    .is_some_and(|first| first.span == directive.span),
                _ => false,
            };
            if !leading {
                report_directive(sink, directive.span.start as usize);
            }
        }
        AstKind::ExpressionStatement(statement) => {
            if let Expression::StringLiteral(literal) = &statement.expression {
                if literal.value == "use strict" {
                    report_directive(sink, literal.span.start as usize);
                }
            }
        }
        AstKind::StaticMemberExpression(member) => {
            check_property_name(sink, member);
            check_console(sink, semantic, member);
        }
        _ => {}
    }
}

fn check_equality(sink: &mut FindingSink<'_>, binary: &BinaryExpression<'_>) {
    let strict = match binary.operator {
        BinaryOperator::Equality => "===",
        BinaryOperator::Inequality => "!==",
        _ => return,
    };
    let loose = binary.operator.as_str();

    let gap_start = binary.left.span().end as usize;
    let gap_end = binary.right.span().start as usize;
    let offset = sink
        .source
        .get(gap_start..gap_end)
        .and_then(|gap| gap.find(loose))
        .map(|index| gap_start + index)
        .unwrap_or(binary.span.start as usize);

    sink.report(
        EQEQEQ,
        offset,
        format!("Expected '{}' and instead saw '{}'.", strict, loose),
        Some(loose.to_string()),
    );
}

fn report_directive(sink: &mut FindingSink<'_>, offset: usize) {
    sink.report(
        DIRECTIVE_POSITION,
        offset,
        "Expected 'use strict' before other statements.".to_string(),
        Some("use strict".to_string()),
    );
}

fn check_property_name(sink: &mut FindingSink<'_>, member: &StaticMemberExpression<'_>) {
    let name = member.property.name.as_str();
    let bad = name.starts_with('$') || name.starts_with('_') || (name.len() > 1 && name.ends_with('_'));
    if bad {
        sink.report(
            PROPERTY_NAMING,
            member.property.span.start as usize,
            format!("Bad property name '{}'.", name),
            Some(name.to_string()),
        );
    }
}

fn check_console(
    sink: &mut FindingSink<'_>,
    semantic: &Semantic<'_>,
    member: &StaticMemberExpression<'_>,
) {
    let Expression::Identifier(object) = &member.object else {
        return;
    };
    if object.name != "console" {
        return;
    }
    // a local named console is not the host console
    if semantic
        .scoping()
        .get_reference(object.reference_id())
        .symbol_id()
        .is_some()
    {
        return;
    }

    sink.report(
        NO_CONSOLE,
        object.span.start as usize,
        "Unexpected 'console'.".to_string(),
        None,
    );
}

fn check_line_length(sink: &mut FindingSink<'_>) {
    let max = sink.profile.max_line_length();
    let long_lines: Vec<usize> = sink
        .source
        .lines()
        .enumerate()
        .filter(|(_, line)| line.chars().count() > max)
        .map(|(index, _)| index + 1)
        .collect();

    for line in long_lines {
        sink.report_at(
            MAX_LINE_LENGTH,
            line,
            max + 1,
            format!("Line is longer than {} characters.", max),
            None,
        );
    }
}
