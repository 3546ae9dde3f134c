#![allow(dead_code)]

use std::fmt::Write;

use procwatch::types::Pk;

/// Builds registry TOML text for `ProcessRegistry` tests.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    processes: Vec<ProcessBuilder>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_process(mut self, process: ProcessBuilder) -> Self {
        self.processes.push(process);
        self
    }

    pub fn build(&self) -> String {
        let mut out = String::new();
        for p in &self.processes {
            p.write_to(&mut out);
        }
        out
    }
}

/// One `[[process]]` table.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    pk: Pk,
    label: String,
    ctime: String,
    state: Option<String>,
    sealed: bool,
    formula: Option<String>,
    subtasks: Vec<(u64, String, String, bool)>,
}

impl ProcessBuilder {
    pub fn new(pk: Pk, label: &str) -> Self {
        Self {
            pk,
            label: label.to_string(),
            ctime: String::new(),
            state: None,
            sealed: false,
            formula: Some(format!("Formula{pk}")),
            subtasks: Vec::new(),
        }
    }

    pub fn ctime(mut self, ctime: &str) -> Self {
        self.ctime = ctime.to_string();
        self
    }

    pub fn state(mut self, state: &str) -> Self {
        self.state = Some(state.to_string());
        self
    }

    pub fn sealed(mut self, sealed: bool) -> Self {
        self.sealed = sealed;
        self
    }

    pub fn without_formula(mut self) -> Self {
        self.formula = None;
        self
    }

    pub fn subtask(mut self, id: u64, workdir: &str, output: &str) -> Self {
        self.subtasks
            .push((id, workdir.to_string(), output.to_string(), true));
        self
    }

    pub fn inactive_subtask(mut self, id: u64, workdir: &str, output: &str) -> Self {
        self.subtasks
            .push((id, workdir.to_string(), output.to_string(), false));
        self
    }

    fn write_to(&self, out: &mut String) {
        let _ = writeln!(out, "[[process]]");
        let _ = writeln!(out, "pk = {}", self.pk);
        let _ = writeln!(out, "label = {:?}", self.label);
        let _ = writeln!(out, "ctime = {:?}", self.ctime);
        if let Some(state) = &self.state {
            let _ = writeln!(out, "state = {:?}", state);
        }
        let _ = writeln!(out, "sealed = {}", self.sealed);
        if let Some(formula) = &self.formula {
            let _ = writeln!(out, "formula = {:?}", formula);
        }
        for (id, workdir, output, active) in &self.subtasks {
            let _ = writeln!(out, "[[process.subtask]]");
            let _ = writeln!(out, "id = {id}");
            let _ = writeln!(out, "remote_workdir = {:?}", workdir);
            let _ = writeln!(out, "output_filename = {:?}", output);
            let _ = writeln!(out, "active = {active}");
        }
        out.push('\n');
    }
}
