//! Test synthesizer
//!
//! Turns one class of a parsed compilation unit into a new compilation unit
//! holding `<Class>Tests`, with one failing test per public method.
//!
//! # Rules
//!
//! - Imports: the source namespace first (when declared), then the source
//!   imports, deduplicated by path, first occurrence wins
//! - Namespace: `<Source>.Tests`, or `Tests` when the source has none
//! - Methods: public source methods in declaration order, named via [`UniqueNames`]
//! - Body: a single forced-failure call with an empty message

use crate::framework::TestFramework;
use crate::naming::UniqueNames;
use indexmap::IndexMap;
use tgen_syntax::{
    ClassDeclaration, CompilationUnit, Expression, ImportDeclaration, MethodBody,
    MethodDeclaration, Modifier, ParseError, SourceSyntax, Statement,
};

/// Suffix appended to a source class name
pub const CLASS_SUFFIX: &str = "Tests";

/// Namespace segment appended to the source namespace
pub const NAMESPACE_SUFFIX: &str = "Tests";

/// A generated test file ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFile {
    /// Generated class name, always `<SourceClass>Tests`
    pub name: String,
    /// Rendered source text
    pub content: String,
}

impl TestFile {
    /// File name with extension (`FooTests.cs`)
    #[inline]
    #[must_use]
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.name, extension)
    }
}

/// Synthesizes test classes and renders them through a [`SourceSyntax`]
#[derive(Debug, Clone, Default)]
pub struct TestSynthesizer<S> {
    syntax: S,
    framework: TestFramework,
}

impl<S: SourceSyntax> TestSynthesizer<S> {
    /// Create synthesizer for a syntax with the default framework
    #[inline]
    #[must_use]
    pub fn new(syntax: S) -> Self {
        Self {
            syntax,
            framework: TestFramework::default(),
        }
    }

    /// With test framework
    #[inline]
    #[must_use]
    pub fn with_framework(mut self, framework: TestFramework) -> Self {
        self.framework = framework;
        self
    }

    /// Get syntax
    #[inline]
    #[must_use]
    pub fn syntax(&self) -> &S {
        &self.syntax
    }

    /// Get framework
    #[inline]
    #[must_use]
    pub fn framework(&self) -> TestFramework {
        self.framework
    }

    /// Build the test compilation unit for one class of `unit`
    #[must_use]
    pub fn synthesize(&self, unit: &CompilationUnit, class: &ClassDeclaration) -> CompilationUnit {
        let mut test_class = ClassDeclaration::new(test_class_name(&class.name))
            .with_modifier(Modifier::Public);
        if let Some(marker) = self.framework.class_attribute() {
            test_class = test_class.with_attribute(marker);
        }
        test_class.methods = self.test_methods(class);

        CompilationUnit {
            imports: merge_imports(unit),
            namespace: Some(test_namespace(unit.namespace.as_deref())),
            classes: vec![test_class],
        }
    }

    /// Synthesize and render one class
    #[must_use]
    pub fn generate(&self, unit: &CompilationUnit, class: &ClassDeclaration) -> TestFile {
        let generated = self.synthesize(unit, class);
        let name = test_class_name(&class.name);
        tracing::trace!(class = %class.name, test_class = %name, "synthesized test class");

        TestFile {
            name,
            content: self.syntax.render(&generated),
        }
    }

    /// Parse source text and generate one test file per class, in class order
    ///
    /// # Errors
    /// Returns `ParseError` if the text cannot be parsed
    pub fn generate_all(&self, text: &str) -> Result<Vec<TestFile>, ParseError> {
        let unit = self.syntax.parse(text)?;
        Ok(unit
            .classes
            .iter()
            .map(|class| self.generate(&unit, class))
            .collect())
    }

    fn test_methods(&self, class: &ClassDeclaration) -> Vec<MethodDeclaration> {
        let mut names = UniqueNames::new();

        class
            .public_methods()
            .map(|method| {
                MethodDeclaration::new(names.reserve_test_name(&method.name))
                    .with_attribute(self.framework.method_attribute())
                    .with_modifier(Modifier::Public)
                    .with_body(MethodBody::Block(vec![self.fail_statement()]))
            })
            .collect()
    }

    fn fail_statement(&self) -> Statement {
        Statement::Expression(Expression::call(
            self.framework.fail_callee(),
            vec![Expression::StringLiteral(String::new())],
        ))
    }
}

/// `<Class>Tests`
#[inline]
#[must_use]
pub fn test_class_name(class_name: &str) -> String {
    format!("{class_name}{CLASS_SUFFIX}")
}

/// `<Namespace>.Tests`, or `Tests` without a source namespace
#[must_use]
pub fn test_namespace(source_namespace: Option<&str>) -> String {
    match source_namespace {
        Some(namespace) => format!("{namespace}.{NAMESPACE_SUFFIX}"),
        None => NAMESPACE_SUFFIX.to_string(),
    }
}

/// Imports of the generated unit
///
/// The source namespace comes first when declared, followed by the source
/// imports. Duplicates by path are dropped, keeping the first occurrence.
#[must_use]
pub fn merge_imports(unit: &CompilationUnit) -> Vec<ImportDeclaration> {
    let mut merged: IndexMap<String, ImportDeclaration> = IndexMap::new();

    if let Some(namespace) = &unit.namespace {
        merged.insert(namespace.clone(), ImportDeclaration::new(namespace.clone()));
    }

    for import in &unit.imports {
        merged
            .entry(import.path.clone())
            .or_insert_with(|| import.clone());
    }

    merged.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tgen_syntax::{CSharpSyntax, LineEnding};

    fn synthesizer() -> TestSynthesizer<CSharpSyntax> {
        TestSynthesizer::new(CSharpSyntax::new().with_line_ending(LineEnding::Lf))
    }

    fn public(name: &str) -> MethodDeclaration {
        MethodDeclaration::new(name).with_modifier(Modifier::Public)
    }

    #[test]
    fn namespace_gets_tests_suffix() {
        assert_eq!(test_namespace(Some("App.Example")), "App.Example.Tests");
        assert_eq!(test_namespace(None), "Tests");
    }

    #[test]
    fn merge_imports_puts_namespace_first_and_dedups() {
        let unit = CompilationUnit::new()
            .with_namespace("App.Example")
            .with_import(ImportDeclaration::new("System"))
            .with_import(ImportDeclaration::new("System.Linq"))
            .with_import(ImportDeclaration::new("System"))
            .with_import(ImportDeclaration::new("App.Example"));

        let paths: Vec<_> = merge_imports(&unit).into_iter().map(|i| i.path).collect();
        assert_eq!(paths, vec!["App.Example", "System", "System.Linq"]);
    }

    #[test]
    fn namespace_scoped_using_is_not_carried_over() {
        let source = "using System;\nnamespace App\n{\n    using Models;\n    public class Foo\n    {\n        public void Run() { }\n    }\n}\n";

        let files = synthesizer().generate_all(source).unwrap();
        let unit = synthesizer().syntax().parse(&files[0].content).unwrap();
        let paths: Vec<_> = unit.imports.into_iter().map(|i| i.path).collect();
        assert_eq!(paths, vec!["App", "System"]);
        assert!(files[0].content.starts_with("using App;\nusing System;\n\nnamespace App.Tests\n"));
        assert!(!files[0].content.contains("Models"));
    }

    #[test]
    fn merge_imports_without_namespace() {
        let unit = CompilationUnit::new()
            .with_import(ImportDeclaration::new("System.Text"))
            .with_import(ImportDeclaration::new("System"));

        let paths: Vec<_> = merge_imports(&unit).into_iter().map(|i| i.path).collect();
        assert_eq!(paths, vec!["System.Text", "System"]);
    }

    #[test]
    fn merge_imports_keeps_first_form_of_duplicate() {
        let unit = CompilationUnit::new()
            .with_import(ImportDeclaration::new("System.Math").with_static())
            .with_import(ImportDeclaration::new("System.Math"));

        let merged = merge_imports(&unit);
        assert_eq!(merged.len(), 1);
        assert!(merged[0].is_static);
    }

    #[test]
    fn only_public_methods_become_tests() {
        let class = ClassDeclaration::new("Foo")
            .with_modifier(Modifier::Public)
            .with_method(public("Bar"))
            .with_method(MethodDeclaration::new("Hidden").with_modifier(Modifier::Private))
            .with_method(MethodDeclaration::new("Implicit"))
            .with_method(public("Baz"));
        let unit = CompilationUnit::new().with_class(class.clone());

        let generated = synthesizer().synthesize(&unit, &class);
        let names: Vec<_> = generated.classes[0]
            .methods
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["BarTest", "BazTest"]);
    }

    #[test]
    fn overloads_resolve_to_suffixed_names() {
        let class = ClassDeclaration::new("Calc")
            .with_method(public("Compute"))
            .with_method(public("Compute").with_parameter(tgen_syntax::Parameter::new("int", "x")))
            .with_method(public("Reset"));
        let unit = CompilationUnit::new().with_class(class.clone());

        let generated = synthesizer().synthesize(&unit, &class);
        let names: Vec<_> = generated.classes[0]
            .methods
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["ComputeTest", "ComputeTest1", "ResetTest"]);
    }

    #[test]
    fn generated_methods_are_marked_public_void_failing() {
        let class = ClassDeclaration::new("Widget").with_method(public("Run"));
        let unit = CompilationUnit::new().with_class(class.clone());

        let generated = synthesizer().synthesize(&unit, &class);
        let test_class = &generated.classes[0];
        assert_eq!(test_class.attributes, vec!["TestClass".to_string()]);
        assert!(test_class.is_public());

        let method = &test_class.methods[0];
        assert_eq!(method.attributes, vec!["TestMethod".to_string()]);
        assert_eq!(method.modifiers, vec![Modifier::Public]);
        assert_eq!(method.return_type, "void");
        assert!(method.parameters.is_empty());
        assert_eq!(
            method.body,
            MethodBody::Block(vec![Statement::Expression(Expression::call(
                &["Assert", "Fail"],
                vec![Expression::StringLiteral(String::new())]
            ))])
        );
    }

    #[test]
    fn widget_without_namespace_renders_expected_text() {
        let source = "public class Widget\n{\n    public void Run() { }\n}\n";

        let files = synthesizer().generate_all(source).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "WidgetTests");

        let expected = "\
namespace Tests
{
    [TestClass]
    public class WidgetTests
    {
        [TestMethod]
        public void RunTest()
        {
            Assert.Fail(\"\");
        }
    }
}
";
        assert_eq!(files[0].content, expected);
    }

    #[test]
    fn nunit_and_xunit_markers() {
        let class = ClassDeclaration::new("Widget").with_method(public("Run"));
        let unit = CompilationUnit::new().with_class(class.clone());

        let nunit = synthesizer()
            .with_framework(TestFramework::NUnit)
            .synthesize(&unit, &class);
        assert_eq!(nunit.classes[0].attributes, vec!["TestFixture".to_string()]);
        assert_eq!(nunit.classes[0].methods[0].attributes, vec!["Test".to_string()]);

        let xunit = synthesizer()
            .with_framework(TestFramework::XUnit)
            .synthesize(&unit, &class);
        assert!(xunit.classes[0].attributes.is_empty());
        assert_eq!(xunit.classes[0].methods[0].attributes, vec!["Fact".to_string()]);
    }

    #[test]
    fn one_file_per_class_in_declaration_order() {
        let source = "namespace N\n{\n    public class A { public void X() { } }\n    class B { }\n    public class C { }\n}\n";

        let files = synthesizer().generate_all(source).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["ATests", "BTests", "CTests"]);
    }

    #[test]
    fn no_classes_yields_no_files() {
        let files = synthesizer().generate_all("using System;\n").unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn parse_error_propagates() {
        let result = synthesizer().generate_all("public class {");
        assert!(result.is_err());
    }

    #[test]
    fn generation_is_deterministic() {
        let source = "using System;\nnamespace App\n{\n    public class Foo\n    {\n        public void A() { }\n        public void A(int x) { }\n    }\n}\n";
        let synth = synthesizer();

        assert_eq!(
            synth.generate_all(source).unwrap(),
            synth.generate_all(source).unwrap()
        );
    }

    #[test]
    fn file_name_uses_extension() {
        let file = TestFile {
            name: "FooTests".to_string(),
            content: String::new(),
        };
        assert_eq!(file.file_name("cs"), "FooTests.cs");
    }
}
