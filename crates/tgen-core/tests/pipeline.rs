//! End-to-end tests for the generation pipeline.
//!
//! Guarantees exercised here:
//! - Generated files carry the merged imports, the `.Tests` namespace, the
//!   `<Class>Tests` name and one uniquely named test per public method.
//! - A failure in one input (unreadable, unparsable) never prevents the other
//!   inputs from being written, and always lands in the report.
//! - Output is a pure function of the inputs and configuration, whatever the
//!   parallelism limits.

use pretty_assertions::assert_eq;
use tgen_core::{CollisionPolicy, FileStatus, GeneratorConfig, RunReport, TestGenerator};
use tgen_syntax::LineEnding;
use tgen_synth::TestFramework;
use tgen_test_utils::{
    import_paths, method_names, parse_csharp, SourceTree, EXAMPLE_CLASS_1, EXAMPLE_CLASS_1_TESTS,
    EXAMPLE_CLASS_2, EXAMPLE_CLASS_2_IMPORTS, MALFORMED, NO_CLASSES, TWO_CLASSES, WIDGET,
};

async fn run(config: GeneratorConfig) -> RunReport {
    TestGenerator::csharp(config).generate().await.unwrap()
}

/// Imports: source namespace first, then the source imports in order.
#[tokio::test]
async fn generated_file_has_merged_imports() {
    let tree = SourceTree::new();
    let source = tree.add("ExampleClass2.cs", EXAMPLE_CLASS_2);

    let report = run(GeneratorConfig::new(vec![source], tree.output_dir())).await;
    assert!(report.is_success());

    let text = tree.read_output("ExampleClass2Tests.cs");
    assert_eq!(import_paths(&text), EXAMPLE_CLASS_2_IMPORTS.to_vec());
}

/// Namespace of the generated file is `<source namespace>.Tests`.
#[tokio::test]
async fn generated_file_has_tests_namespace() {
    let tree = SourceTree::new();
    let source = tree.add("ExampleClass1.cs", EXAMPLE_CLASS_1);

    run(GeneratorConfig::new(vec![source], tree.output_dir())).await;

    let unit = parse_csharp(&tree.read_output("ExampleClass1Tests.cs"));
    assert_eq!(unit.namespace.as_deref(), Some("TestGenerator.Example.Tests"));
}

/// The generated class is named after the source class.
#[tokio::test]
async fn generated_class_is_named_after_source() {
    let tree = SourceTree::new();
    let source = tree.add("ExampleClass1.cs", EXAMPLE_CLASS_1);

    let report = run(GeneratorConfig::new(vec![source], tree.output_dir())).await;

    let unit = parse_csharp(&tree.read_output("ExampleClass1Tests.cs"));
    assert_eq!(unit.classes.len(), 1);
    assert_eq!(unit.classes[0].name, "ExampleClass1Tests");
    assert_eq!(report.files[0].classes, vec!["ExampleClass1Tests".to_string()]);
}

/// Overloads get numeric suffixes; private methods get no test.
#[tokio::test]
async fn generated_methods_are_unique_and_ordered() {
    let tree = SourceTree::new();
    let source = tree.add("ExampleClass1.cs", EXAMPLE_CLASS_1);

    run(GeneratorConfig::new(vec![source], tree.output_dir())).await;

    let text = tree.read_output("ExampleClass1Tests.cs");
    assert_eq!(method_names(&text), EXAMPLE_CLASS_1_TESTS.to_vec());
    assert_eq!(text.matches("Assert.Fail(\"\");").count(), 4);
}

/// Without a source namespace the generated namespace is plain `Tests`.
#[tokio::test]
async fn source_without_namespace() {
    let tree = SourceTree::new();
    let source = tree.add("Widget.cs", WIDGET);

    run(GeneratorConfig::new(vec![source], tree.output_dir())).await;

    let unit = parse_csharp(&tree.read_output("WidgetTests.cs"));
    assert_eq!(unit.namespace.as_deref(), Some("Tests"));
    assert!(unit.imports.is_empty());
}

/// One output file per class, in declaration order.
#[tokio::test]
async fn one_file_per_class() {
    let tree = SourceTree::new();
    let source = tree.add("Shapes.cs", TWO_CLASSES);

    let report = run(GeneratorConfig::new(vec![source], tree.output_dir())).await;

    assert_eq!(
        report.files[0].classes,
        vec!["CircleTests".to_string(), "SquareTests".to_string()]
    );
    assert_eq!(tree.output_files(), vec!["CircleTests.cs", "SquareTests.cs"]);
    assert_eq!(
        method_names(&tree.read_output("SquareTests.cs")),
        vec!["AreaTest", "PerimeterTest"]
    );
}

/// A file without classes produces nothing and is not a failure.
#[tokio::test]
async fn file_without_classes_produces_nothing() {
    let tree = SourceTree::new();
    let source = tree.add("Empty.cs", NO_CLASSES);

    let report = run(GeneratorConfig::new(vec![source], tree.output_dir())).await;

    assert!(report.is_success());
    assert_eq!(report.files[0].status(), FileStatus::Empty);
    assert!(tree.output_files().is_empty());
}

/// An unreadable path is reported; the other inputs are still written.
#[tokio::test]
async fn unreadable_path_is_isolated() {
    let tree = SourceTree::new();
    let missing = tree.missing("Missing.cs");
    let widget = tree.add("Widget.cs", WIDGET);

    let report = run(GeneratorConfig::new(
        vec![missing.clone(), widget.clone()],
        tree.output_dir(),
    ))
    .await;

    assert!(!report.is_success());
    assert_eq!(report.failure_count(), 1);
    assert_eq!(report.file(&missing).unwrap().errors[0].kind(), "read");
    assert_eq!(report.file(&widget).unwrap().status(), FileStatus::Succeeded);
    assert_eq!(tree.output_files(), vec!["WidgetTests.cs"]);
}

/// A syntax error is reported against its file only.
#[tokio::test]
async fn parse_error_is_isolated() {
    let tree = SourceTree::new();
    let broken = tree.add("Broken.cs", MALFORMED);
    let widget = tree.add("Widget.cs", WIDGET);

    let report = run(GeneratorConfig::new(vec![broken, widget], tree.output_dir())).await;

    assert_eq!(report.files[0].status(), FileStatus::Failed);
    assert_eq!(report.files[0].errors[0].kind(), "parse");
    assert!(report.files[0].written.is_empty());
    assert_eq!(report.files[1].status(), FileStatus::Succeeded);
    assert_eq!(tree.output_files(), vec!["WidgetTests.cs"]);
}

/// Duplicate paths are processed independently and collide harmlessly.
#[tokio::test]
async fn duplicate_paths_are_read_independently() {
    let tree = SourceTree::new();
    let widget = tree.add("Widget.cs", WIDGET);

    let report = run(GeneratorConfig::new(
        vec![widget.clone(), widget],
        tree.output_dir(),
    ))
    .await;

    assert!(report.is_success());
    assert_eq!(report.files.len(), 2);
    assert_eq!(report.written_count(), 2);
    assert_eq!(report.warning_count(), 1);
    assert_eq!(tree.output_files(), vec!["WidgetTests.cs"]);
}

/// Overwrite keeps the last dispatched file and warns.
#[tokio::test]
async fn overwrite_collision_keeps_last_file() {
    let tree = SourceTree::new();
    let first = tree.add("a/Foo.cs", "public class Foo { public void First() { } }");
    let second = tree.add("b/Foo.cs", "public class Foo { public void Second() { } }");

    let config = GeneratorConfig::new(vec![first, second], tree.output_dir())
        .with_parallelism(1, 1, 1)
        .with_collision_policy(CollisionPolicy::Overwrite);
    let report = run(config).await;

    assert!(report.is_success());
    assert_eq!(report.files[1].warnings[0].kind(), "name-collision");
    assert_eq!(method_names(&tree.read_output("FooTests.cs")), vec!["SecondTest"]);
}

/// Skip keeps the first file and fails the later one.
#[tokio::test]
async fn skip_collision_keeps_first_file() {
    let tree = SourceTree::new();
    let first = tree.add("a/Foo.cs", "public class Foo { public void First() { } }");
    let second = tree.add("b/Foo.cs", "public class Foo { public void Second() { } }");

    let config = GeneratorConfig::new(vec![first, second], tree.output_dir())
        .with_parallelism(1, 1, 1)
        .with_collision_policy(CollisionPolicy::Skip);
    let report = run(config).await;

    assert!(!report.is_success());
    assert_eq!(report.files[1].errors[0].kind(), "name-collision");
    assert!(report.files[1].written.is_empty());
    assert_eq!(method_names(&tree.read_output("FooTests.cs")), vec!["FirstTest"]);
}

/// Same inputs, different limits, byte-identical outputs.
#[tokio::test]
async fn output_is_independent_of_parallelism() {
    let tree = SourceTree::new();
    let paths = vec![
        tree.add("ExampleClass1.cs", EXAMPLE_CLASS_1),
        tree.add("ExampleClass2.cs", EXAMPLE_CLASS_2),
        tree.add("Shapes.cs", TWO_CLASSES),
        tree.add("Widget.cs", WIDGET),
    ];

    let serial = tree.root().join("serial");
    let parallel = tree.root().join("parallel");
    run(GeneratorConfig::new(paths.clone(), &serial).with_parallelism(1, 1, 1)).await;
    run(GeneratorConfig::new(paths, &parallel).with_parallelism(4, 8, 4)).await;

    for name in [
        "ExampleClass1Tests.cs",
        "ExampleClass2Tests.cs",
        "CircleTests.cs",
        "SquareTests.cs",
        "WidgetTests.cs",
    ] {
        let a = std::fs::read(serial.join(name)).unwrap();
        let b = std::fs::read(parallel.join(name)).unwrap();
        assert_eq!(a, b, "{name} differs");
    }
}

/// Many inputs through the tightest limits all complete.
#[tokio::test]
async fn many_files_through_single_slot_stages() {
    let tree = SourceTree::new();
    let paths: Vec<_> = (0..25)
        .map(|i| {
            tree.add(
                &format!("C{i}.cs"),
                &format!("public class C{i} {{ public void M() {{ }} }}"),
            )
        })
        .collect();

    let report = run(GeneratorConfig::new(paths, tree.output_dir()).with_parallelism(1, 1, 1)).await;

    assert!(report.is_success());
    assert_eq!(report.written_count(), 25);
    assert_eq!(tree.output_files().len(), 25);
}

/// Missing output directories are created, nested ones included.
#[tokio::test]
async fn output_directory_is_created() {
    let tree = SourceTree::new();
    let widget = tree.add("Widget.cs", WIDGET);
    let output = tree.root().join("deep/nested/out");

    let report = run(GeneratorConfig::new(vec![widget], &output)).await;

    assert!(report.is_success());
    assert!(output.join("WidgetTests.cs").is_file());
}

/// xUnit tests carry `[Fact]` and no class marker.
#[tokio::test]
async fn xunit_framework() {
    let tree = SourceTree::new();
    let widget = tree.add("Widget.cs", WIDGET);

    let config = GeneratorConfig::new(vec![widget], tree.output_dir())
        .with_framework(TestFramework::XUnit)
        .with_line_ending(LineEnding::Lf);
    run(config).await;

    let unit = parse_csharp(&tree.read_output("WidgetTests.cs"));
    assert!(unit.classes[0].attributes.is_empty());
    assert_eq!(unit.classes[0].methods[0].attributes, vec!["Fact".to_string()]);
}
