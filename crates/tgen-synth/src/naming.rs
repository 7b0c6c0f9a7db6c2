//! Unique test-method names
//!
//! Names are reserved in processing order. The first method named `M` gets
//! `MTest`; later collisions get `MTest1`, `MTest2`, ... . The set lives for
//! one class synthesis and is never shared.

use std::collections::HashSet;

/// Suffix appended to a source method name
pub const TEST_SUFFIX: &str = "Test";

/// Case-sensitive set of names already taken in one generated class
#[derive(Debug, Default)]
pub struct UniqueNames {
    taken: HashSet<String>,
}

impl UniqueNames {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the first free name derived from `base`
    ///
    /// Tries `base`, then `base1`, `base2`, ... until one is unused.
    pub fn reserve(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }

        let mut suffix: u64 = 1;
        loop {
            let candidate = format!("{base}{suffix}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Reserve a test name for a source method name
    pub fn reserve_test_name(&mut self, method_name: &str) -> String {
        self.reserve(&format!("{method_name}{TEST_SUFFIX}"))
    }

    /// Whether a name is already reserved
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    /// Number of reserved names
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.taken.len()
    }

    /// Whether nothing is reserved
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}
