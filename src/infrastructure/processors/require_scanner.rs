use anyhow::{anyhow, Result};
use oxc_allocator::Allocator;
use oxc_ast::ast::{Argument, Expression};
use oxc_ast::AstKind;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;

/// A literal `require(...)` call found in a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireCall {
    pub specifier: String,
    /// Byte offset of the specifier text in the source
    pub offset: usize,
}

/// Collect the static `require` calls of a CommonJS module in source order.
///
/// Only calls to the free `require` binding with a single string argument
/// count. A module that declares its own `require` keeps it.
pub fn find_requires(source: &str) -> Result<Vec<RequireCall>> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, SourceType::cjs()).parse();
    if let Some(diagnostic) = parsed.errors.first() {
        return Err(anyhow!("Cannot parse module: {}", diagnostic));
    }
    if parsed.panicked {
        return Err(anyhow!("Cannot parse module"));
    }

    let semantic_ret = SemanticBuilder::new().build(&parsed.program);
    let semantic = semantic_ret.semantic;
    let scoping = semantic.scoping();

    let mut calls: Vec<RequireCall> = semantic
        .nodes()
        .iter()
        .filter_map(|node| {
            let AstKind::CallExpression(call) = node.kind() else {
                return None;
            };
            let Expression::Identifier(callee) = &call.callee else {
                return None;
            };
            if callee.name != "require" || call.arguments.len() != 1 {
                return None;
            }
            if scoping.get_reference(callee.reference_id()).symbol_id().is_some() {
                return None;
            }

            match &call.arguments[0] {
                Argument::StringLiteral(literal) => Some(RequireCall {
                    specifier: literal.value.to_string(),
                    offset: literal.span.start as usize + 1,
                }),
                Argument::TemplateLiteral(template) if template.expressions.is_empty() => {
                    let cooked = template.quasis.first()?.value.cooked.as_ref()?;
                    Some(RequireCall {
                        specifier: cooked.to_string(),
                        offset: template.span.start as usize + 1,
                    })
                }
                _ => None,
            }
        })
        .collect();

    calls.sort_by_key(|call| call.offset);
    Ok(calls)
}
