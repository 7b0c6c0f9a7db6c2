//! Testing utilities for TGen workspace
//!
//! Sample C# sources and temporary source trees.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tgen_syntax::{CSharpSyntax, CompilationUnit, SourceSyntax};

/// Two overloads of `ThirdMethod`, one private helper
pub const EXAMPLE_CLASS_1: &str = r#"using System;
using System.Collections.Generic;

namespace TestGenerator.Example
{
    public class ExampleClass1
    {
        public void FirstMethod()
        {
            Console.WriteLine("First method");
        }

        public int SecondMethod(int value)
        {
            return value * 2;
        }

        public void ThirdMethod(int a)
        {
        }

        public void ThirdMethod(string s, double d)
        {
        }

        private void Helper()
        {
        }
    }
}
"#;

/// Five imports, one public method
pub const EXAMPLE_CLASS_2: &str = r#"using System;
using System.Collections.Generic;
using System.Linq;
using System.Text;
using System.Threading.Tasks;

namespace TestGenerator.Example
{
    public class ExampleClass2
    {
        public List<string> Names()
        {
            return new List<string>();
        }
    }
}
"#;

/// No namespace, no imports
pub const WIDGET: &str = r#"public class Widget
{
    public void Spin()
    {
    }
}
"#;

/// Two classes in one file
pub const TWO_CLASSES: &str = r#"using System;

namespace Shapes
{
    public class Circle
    {
        public double Area() { return 0; }
    }

    public class Square
    {
        public double Area() { return 0; }
        public double Perimeter() { return 0; }
    }
}
"#;

/// Valid source without any class
pub const NO_CLASSES: &str = r#"using System;

namespace Empty
{
    public interface IShape
    {
        double Area();
    }
}
"#;

/// Unbalanced braces
pub const MALFORMED: &str = "namespace Broken { public class Oops { public void Run( { } ";

/// Test names expected for [`EXAMPLE_CLASS_1`]
pub const EXAMPLE_CLASS_1_TESTS: [&str; 4] = [
    "FirstMethodTest",
    "SecondMethodTest",
    "ThirdMethodTest",
    "ThirdMethodTest1",
];

/// Imports expected in `ExampleClass2Tests`
pub const EXAMPLE_CLASS_2_IMPORTS: [&str; 6] = [
    "TestGenerator.Example",
    "System",
    "System.Collections.Generic",
    "System.Linq",
    "System.Text",
    "System.Threading.Tasks",
];

/// Temporary directory holding source files and an output directory
pub struct SourceTree {
    dir: TempDir,
}

impl SourceTree {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Write `contents` to `name` under the tree root, returning the full path
    pub fn add(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Path under the root that is never created
    pub fn missing(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Output directory (not created)
    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    /// Contents of a generated file in the output directory
    pub fn read_output(&self, file_name: &str) -> String {
        std::fs::read_to_string(self.output_dir().join(file_name)).unwrap()
    }

    /// Sorted names of all files in the output directory
    pub fn output_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.output_dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl Default for SourceTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse C# text, panicking on syntax errors
pub fn parse_csharp(source: &str) -> CompilationUnit {
    CSharpSyntax::new().parse(source).unwrap()
}

/// Method names of the first class in rendered C# text
pub fn method_names(source: &str) -> Vec<String> {
    parse_csharp(source).classes[0]
        .methods
        .iter()
        .map(|m| m.name.clone())
        .collect()
}

/// Import paths of rendered C# text
pub fn import_paths(source: &str) -> Vec<String> {
    parse_csharp(source)
        .imports
        .into_iter()
        .map(|i| i.path)
        .collect()
}
