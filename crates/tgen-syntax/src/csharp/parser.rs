//! tree-sitter backed C# parser
//!
//! Walks the concrete syntax tree and lifts the parts the model cares about:
//! top-level `using` directives, the first namespace, and every class with its direct methods.

use crate::error::ParseError;
use crate::model::{
    ClassDeclaration, CompilationUnit, ImportDeclaration, MethodBody, MethodDeclaration, Modifier,
    Parameter,
};
use tree_sitter::Node;

/// Longest snippet of offending source quoted in a syntax error
const SNIPPET_LIMIT: usize = 32;

/// Parse C# source into a compilation unit
///
/// # Errors
/// - `ParseError::ParserInit` if the grammar cannot be loaded
/// - `ParseError::ParseFailed` if tree-sitter gives up
/// - `ParseError::Syntax` at the first ERROR or MISSING node
pub(crate) fn parse_compilation_unit(source: &str) -> Result<CompilationUnit, ParseError> {
    let language: tree_sitter::Language = tree_sitter_c_sharp::LANGUAGE.into();

    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| ParseError::ParserInit(e.to_string()))?;

    let tree = parser.parse(source, None).ok_or(ParseError::ParseFailed)?;
    let root = tree.root_node();

    if root.has_error() {
        return Err(first_syntax_error(root, source));
    }

    let mut unit = CompilationUnit::new();
    collect(root, source, &mut unit);
    Ok(unit)
}

/// Pre-order walk filling the unit in document order
fn collect(node: Node<'_>, source: &str, unit: &mut CompilationUnit) {
    match node.kind() {
        "using_directive" => {
            // Namespace-scoped directives resolve relative to their namespace
            let top_level = node.parent().is_some_and(|p| p.kind() == "compilation_unit");
            if top_level {
                if let Some(import) = lift_using(node, source) {
                    unit.imports.push(import);
                }
            }
            return;
        }
        "namespace_declaration" | "file_scoped_namespace_declaration" => {
            if unit.namespace.is_none() {
                unit.namespace = node
                    .child_by_field_name("name")
                    .map(|name| compact(text(name, source)));
            }
        }
        "class_declaration" => {
            if let Some(class) = lift_class(node, source) {
                unit.classes.push(class);
            }
        }
        // Method bodies never contain declarations we track
        "method_declaration" => return,
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect(child, source, unit);
    }
}

fn lift_using(node: Node<'_>, source: &str) -> Option<ImportDeclaration> {
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();

    let is_static = children.iter().any(|c| c.kind() == "static");
    let is_global = children.iter().any(|c| c.kind() == "global");

    let (alias, path) = if let Some(eq) = children.iter().position(|c| c.kind() == "=") {
        // using Alias = Target;
        let alias = children[..eq].iter().rev().find(|c| c.is_named());
        let target = children[eq + 1..].iter().find(|c| c.is_named());
        (alias.map(|a| compact(text(*a, source))), target?)
    } else if let Some(equals) = children.iter().find(|c| c.kind() == "name_equals") {
        let target = children
            .iter()
            .rev()
            .find(|c| c.is_named() && c.kind() != "name_equals")?;
        let alias = compact(text(*equals, source)).trim_end_matches('=').to_string();
        (Some(alias), target)
    } else {
        (None, children.iter().rev().find(|c| c.is_named())?)
    };

    Some(ImportDeclaration {
        path: compact(text(*path, source)),
        alias,
        is_static,
        is_global,
    })
}

fn lift_class(node: Node<'_>, source: &str) -> Option<ClassDeclaration> {
    let name = text(node.child_by_field_name("name")?, source).to_string();

    let mut class = ClassDeclaration::new(name);
    class.modifiers = modifiers(node, source);
    class.attributes = attributes(node, source);

    let mut cursor = node.walk();
    let body = node
        .children(&mut cursor)
        .find(|c| c.kind() == "declaration_list");

    if let Some(body) = body {
        let mut body_cursor = body.walk();
        for member in body.named_children(&mut body_cursor) {
            if member.kind() == "method_declaration" {
                if let Some(method) = lift_method(member, source) {
                    class.methods.push(method);
                }
            }
        }
    }

    Some(class)
}

fn lift_method(node: Node<'_>, source: &str) -> Option<MethodDeclaration> {
    let name = text(node.child_by_field_name("name")?, source).to_string();

    let return_type = node
        .child_by_field_name("returns")
        .or_else(|| node.child_by_field_name("type"))
        .map(|t| text(t, source).to_string())
        .unwrap_or_else(|| "void".to_string());

    let parameters = node
        .child_by_field_name("parameters")
        .map(|list| lift_parameters(list, source))
        .unwrap_or_default();

    let body = match node.child_by_field_name("body") {
        Some(body) if body.kind() == "arrow_expression_clause" => {
            MethodBody::Opaque(format!("{};", text(body, source)))
        }
        Some(body) => MethodBody::Opaque(text(body, source).to_string()),
        None => MethodBody::Opaque(String::new()),
    };

    Some(MethodDeclaration {
        name,
        modifiers: modifiers(node, source),
        attributes: attributes(node, source),
        return_type,
        parameters,
        body,
    })
}

fn lift_parameters(list: Node<'_>, source: &str) -> Vec<Parameter> {
    let mut cursor = list.walk();
    list.named_children(&mut cursor)
        .filter(|p| p.kind() == "parameter")
        .filter_map(|p| {
            let name = text(p.child_by_field_name("name")?, source);
            let ty = p
                .child_by_field_name("type")
                .map(|t| text(t, source))
                .unwrap_or_default();
            Some(Parameter::new(ty, name))
        })
        .collect()
}

fn modifiers(node: Node<'_>, source: &str) -> Vec<Modifier> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|c| c.kind() == "modifier")
        .map(|c| Modifier::from_keyword(text(c, source).trim()))
        .collect()
}

fn attributes(node: Node<'_>, source: &str) -> Vec<String> {
    let mut cursor = node.walk();
    let lists: Vec<Node<'_>> = node
        .children(&mut cursor)
        .filter(|c| c.kind() == "attribute_list")
        .collect();

    let mut names = Vec::new();
    for list in lists {
        let mut list_cursor = list.walk();
        for attribute in list.named_children(&mut list_cursor) {
            if attribute.kind() == "attribute" {
                if let Some(name) = attribute.child_by_field_name("name") {
                    names.push(compact(text(name, source)));
                }
            }
        }
    }
    names
}

fn first_syntax_error(root: Node<'_>, source: &str) -> ParseError {
    let Some(node) = find_error(root) else {
        return ParseError::syntax_error(1, 1, "malformed source");
    };

    let position = node.start_position();
    let message = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let snippet: String = text(node, source)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .chars()
            .take(SNIPPET_LIMIT)
            .collect();
        if snippet.is_empty() {
            "unexpected input".to_string()
        } else {
            format!("unexpected `{snippet}`")
        }
    };

    ParseError::syntax_error(position.row + 1, position.column + 1, message)
}

fn find_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }

    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(find_error)
}

fn text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    &source[node.byte_range()]
}

/// Drop all whitespace from a name (`System . Linq` → `System.Linq`)
fn compact(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
using System;
using System.Collections.Generic;
using static System.Math;
using Col = System.Collections;

namespace App.Example
{
    [Serializable]
    public class Foo
    {
        public void Bar() { }
        public int Baz(int a, string b) => a;
        private void Hidden() { }
        protected internal void Shared() { }
        public static void Bar(int x) { }

        public class Inner
        {
            public void Deep() { }
        }
    }

    internal class Helper
    {
        public abstract void Run();
    }
}
"#;

    #[test]
    fn parses_namespace_and_imports() {
        let unit = parse_compilation_unit(SAMPLE).unwrap();

        assert_eq!(unit.namespace.as_deref(), Some("App.Example"));
        let paths: Vec<_> = unit.imports.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "System",
                "System.Collections.Generic",
                "System.Math",
                "System.Collections"
            ]
        );
        assert!(unit.imports[2].is_static);
        assert_eq!(unit.imports[3].alias.as_deref(), Some("Col"));
    }

    #[test]
    fn parses_classes_in_document_order() {
        let unit = parse_compilation_unit(SAMPLE).unwrap();

        let names: Vec<_> = unit.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Foo", "Inner", "Helper"]);

        let foo = &unit.classes[0];
        assert!(foo.is_public());
        assert_eq!(foo.attributes, vec!["Serializable".to_string()]);
        assert!(!unit.classes[2].is_public());
    }

    #[test]
    fn parses_direct_methods_only() {
        let unit = parse_compilation_unit(SAMPLE).unwrap();
        let foo = unit.find_class("Foo").unwrap();

        let names: Vec<_> = foo.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Bar", "Baz", "Hidden", "Shared", "Bar"]);

        let public: Vec<_> = foo.public_methods().map(|m| m.name.as_str()).collect();
        assert_eq!(public, vec!["Bar", "Baz", "Bar"]);

        let baz = &foo.methods[1];
        assert_eq!(baz.return_type, "int");
        assert_eq!(
            baz.parameters,
            vec![Parameter::new("int", "a"), Parameter::new("string", "b")]
        );
    }

    #[test]
    fn namespace_scoped_usings_are_not_imports() {
        let source = "using System;\n\nnamespace App\n{\n    using Models;\n\n    public class Foo\n    {\n        public void Run() { }\n    }\n}\n";
        let unit = parse_compilation_unit(source).unwrap();

        let paths: Vec<_> = unit.imports.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["System"]);
        assert_eq!(unit.classes[0].name, "Foo");
    }

    #[test]
    fn parses_file_scoped_namespace() {
        let source = "using System;\n\nnamespace App.Scoped;\n\npublic class Widget\n{\n    public void Run() { }\n}\n";
        let unit = parse_compilation_unit(source).unwrap();

        assert_eq!(unit.namespace.as_deref(), Some("App.Scoped"));
        assert_eq!(unit.classes.len(), 1);
        assert_eq!(unit.classes[0].methods.len(), 1);
    }

    #[test]
    fn parses_unit_without_namespace() {
        let source = "public class Widget\n{\n    public void Run() { }\n}\n";
        let unit = parse_compilation_unit(source).unwrap();

        assert!(unit.namespace.is_none());
        assert!(unit.imports.is_empty());
        assert_eq!(unit.classes[0].name, "Widget");
    }

    #[test]
    fn file_without_classes_has_none() {
        let source = "using System;\n\nnamespace Empty\n{\n    public interface IThing\n    {\n        void Do();\n    }\n}\n";
        let unit = parse_compilation_unit(source).unwrap();

        assert!(unit.classes.is_empty());
        assert_eq!(unit.namespace.as_deref(), Some("Empty"));
    }

    #[test]
    fn malformed_source_is_syntax_error() {
        let source = "namespace Broken\n{\n    public class Foo\n    {\n        public void Bar( { }\n";
        let err = parse_compilation_unit(source).unwrap_err();

        assert!(matches!(err, ParseError::Syntax { .. }), "got {err:?}");
    }
}
