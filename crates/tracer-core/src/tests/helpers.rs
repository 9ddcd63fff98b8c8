//! A minimal synthetic [`HostFrame`] for driving [`History`] directly in
//! tests, without needing a real interpreter.

use indexmap::IndexMap;

use crate::frame::HostFrame;
use crate::value::RawValue;

#[derive(Debug, Clone)]
pub struct TestFrame {
    pub function: String,
    pub line: u32,
    pub locals: IndexMap<String, RawValue>,
    pub globals: IndexMap<String, RawValue>,
    pub ancestors: Vec<String>,
}

impl TestFrame {
    pub fn new(function: &str, line: u32, ancestors: &[&str]) -> Self {
        Self {
            function: function.to_string(),
            line,
            locals: IndexMap::new(),
            globals: IndexMap::new(),
            ancestors: ancestors.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_local(mut self, name: &str, value: RawValue) -> Self {
        self.locals.insert(name.to_string(), value);
        self
    }

    pub fn with_global(mut self, name: &str, value: RawValue) -> Self {
        self.globals.insert(name.to_string(), value);
        self
    }
}

impl HostFrame for TestFrame {
    fn function_name(&self) -> &str {
        &self.function
    }

    fn line(&self) -> u32 {
        self.line
    }

    fn locals(&self) -> IndexMap<String, RawValue> {
        self.locals.clone()
    }

    fn globals(&self) -> IndexMap<String, RawValue> {
        self.globals.clone()
    }

    fn ancestor_function_names(&self) -> Vec<String> {
        self.ancestors.clone()
    }
}
