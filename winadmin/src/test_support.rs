//! Test-only helpers: scripted tool runner, in-memory registry, scratch trees.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::core::invocation::Invocation;
use crate::io::registry::{PolicyRegistry, PolicyValue};
use crate::io::tools::{ToolOutput, ToolRunner};

type Matcher = Box<dyn Fn(&Invocation) -> bool>;

enum Scripted {
    Output(ToolOutput),
    SpawnError(String),
}

/// [`ToolRunner`] that records every call and answers from rules.
///
/// Rules are checked in insertion order; the first match wins. Calls matching
/// no rule succeed with empty output.
#[derive(Default)]
pub struct ScriptedToolRunner {
    rules: Vec<(Matcher, Scripted)>,
    calls: RefCell<Vec<Invocation>>,
    launches: RefCell<Vec<Invocation>>,
}

impl ScriptedToolRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer calls matching `matcher` with `output`.
    pub fn with_rule(
        mut self,
        matcher: impl Fn(&Invocation) -> bool + 'static,
        output: ToolOutput,
    ) -> Self {
        self.rules.push((Box::new(matcher), Scripted::Output(output)));
        self
    }

    /// Fail calls matching `matcher` as if the program could not be started.
    pub fn with_spawn_error(
        mut self,
        matcher: impl Fn(&Invocation) -> bool + 'static,
        message: &str,
    ) -> Self {
        self.rules
            .push((Box::new(matcher), Scripted::SpawnError(message.to_string())));
        self
    }

    /// Every `run` call so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Every `launch` call so far, in order.
    pub fn launches(&self) -> Vec<Invocation> {
        self.launches.borrow().clone()
    }
}

impl ToolRunner for ScriptedToolRunner {
    fn run(&self, invocation: &Invocation) -> Result<ToolOutput> {
        self.calls.borrow_mut().push(invocation.clone());
        let rule = self
            .rules
            .iter()
            .find(|(matcher, _)| matcher(invocation))
            .map(|(_, scripted)| scripted);
        match rule {
            Some(Scripted::Output(output)) => Ok(output.clone()),
            Some(Scripted::SpawnError(message)) => Err(anyhow!("{message}")),
            None => Ok(ToolOutput::ok("")),
        }
    }

    fn launch(&self, invocation: &Invocation) -> Result<()> {
        self.launches.borrow_mut().push(invocation.clone());
        Ok(())
    }
}

/// [`PolicyRegistry`] kept in memory.
#[derive(Default)]
pub struct InMemoryRegistry {
    values: RefCell<BTreeMap<(String, String), u32>>,
    fail_writes: bool,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose writes and deletes always fail (reads still work).
    pub fn read_only() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn with_value(self, value: &PolicyValue, data: u32) -> Self {
        self.values
            .borrow_mut()
            .insert(Self::slot(value), data);
        self
    }

    pub fn get(&self, value: &PolicyValue) -> Option<u32> {
        self.values.borrow().get(&Self::slot(value)).copied()
    }

    fn slot(value: &PolicyValue) -> (String, String) {
        (
            value.key.to_ascii_lowercase(),
            value.name.to_ascii_lowercase(),
        )
    }
}

impl PolicyRegistry for InMemoryRegistry {
    fn read_dword(&self, value: &PolicyValue) -> Result<Option<u32>> {
        Ok(self.get(value))
    }

    fn write_dword(&self, value: &PolicyValue, data: u32) -> Result<()> {
        if self.fail_writes {
            return Err(anyhow!("access denied writing {}", value.name));
        }
        self.values.borrow_mut().insert(Self::slot(value), data);
        Ok(())
    }

    fn delete_value(&self, value: &PolicyValue) -> Result<bool> {
        if self.fail_writes {
            return Err(anyhow!("access denied deleting {}", value.name));
        }
        Ok(self.values.borrow_mut().remove(&Self::slot(value)).is_some())
    }
}

/// Scratch directory tree for walker and grant tests.
///
/// Specs ending in `/` create directories; everything else creates a file
/// (parents included).
pub struct TestTree {
    dir: tempfile::TempDir,
}

impl TestTree {
    pub fn new(specs: &[&str]) -> Result<Self> {
        let dir = tempfile::tempdir().context("create tempdir")?;
        for spec in specs {
            let path = dir.path().join(spec.trim_end_matches('/'));
            if spec.ends_with('/') {
                fs::create_dir_all(&path)
                    .with_context(|| format!("create {}", path.display()))?;
                continue;
            }
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            fs::write(&path, spec.as_bytes())
                .with_context(|| format!("write {}", path.display()))?;
        }
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}
