//! Emission steps of the package writer and the order they may run in.
//!
//! Each step names the steps whose output it depends on. [`EmitGraph::waves`]
//! groups the steps into waves: every step of a wave only depends on steps of
//! earlier waves, so steps sharing a wave may run concurrently.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;

/// One unit of package emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EmitStep {
    ContentTypes,
    PackageRels,
    WorkbookRels,
    Worksheets,
    SharedStrings,
    Drawings,
    Themes,
    Styles,
    Media,
    AppProps,
    CoreProps,
    Workbook,
}

impl EmitStep {
    /// All steps in declaration order.
    pub const ALL: [EmitStep; 12] = [
        EmitStep::ContentTypes,
        EmitStep::PackageRels,
        EmitStep::WorkbookRels,
        EmitStep::Worksheets,
        EmitStep::SharedStrings,
        EmitStep::Drawings,
        EmitStep::Themes,
        EmitStep::Styles,
        EmitStep::Media,
        EmitStep::AppProps,
        EmitStep::CoreProps,
        EmitStep::Workbook,
    ];
}

impl fmt::Display for EmitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Dependency graph over emission steps.
#[derive(Debug, Clone, Default)]
pub struct EmitGraph {
    deps: BTreeMap<EmitStep, Vec<EmitStep>>,
}

impl EmitGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// The graph the package writer runs.
    ///
    /// Worksheet XML embeds the workbook relationship ids, so worksheets wait
    /// for `WorkbookRels`. Shared strings and drawings are only complete once
    /// every worksheet has been rendered. The workbook part comes last because
    /// it describes everything before it.
    pub fn package() -> Self {
        use EmitStep::*;
        let mut graph = Self::new();
        graph.add(ContentTypes, &[]);
        graph.add(PackageRels, &[ContentTypes]);
        graph.add(WorkbookRels, &[PackageRels]);
        graph.add(Worksheets, &[WorkbookRels]);
        graph.add(SharedStrings, &[Worksheets]);
        graph.add(Drawings, &[Worksheets]);
        graph.add(Themes, &[SharedStrings, Drawings]);
        graph.add(Styles, &[SharedStrings, Drawings]);
        graph.add(Media, &[Themes, Styles]);
        graph.add(AppProps, &[Media]);
        graph.add(CoreProps, &[Media]);
        graph.add(Workbook, &[AppProps, CoreProps]);
        graph
    }

    /// Add a step with its predecessors.
    pub fn add(&mut self, step: EmitStep, after: &[EmitStep]) {
        self.deps.entry(step).or_default().extend_from_slice(after);
    }

    /// Predecessors of a step.
    pub fn dependencies(&self, step: EmitStep) -> &[EmitStep] {
        self.deps.get(&step).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Group the steps into waves, in declaration order within each wave.
    ///
    /// Fails if a step depends on a step missing from the graph or if the
    /// dependencies form a cycle.
    pub fn waves(&self) -> Result<Vec<Vec<EmitStep>>> {
        for (step, deps) in &self.deps {
            if let Some(missing) = deps.iter().find(|d| !self.deps.contains_key(*d)) {
                return Err(Error::InvalidData(format!(
                    "emission step {step} depends on unscheduled step {missing}"
                )));
            }
        }

        let mut placed: BTreeMap<EmitStep, usize> = BTreeMap::new();
        let mut waves: Vec<Vec<EmitStep>> = Vec::new();

        while placed.len() < self.deps.len() {
            let ready: Vec<EmitStep> = self
                .deps
                .iter()
                .filter(|(step, deps)| {
                    !placed.contains_key(*step) && deps.iter().all(|d| placed.contains_key(d))
                })
                .map(|(step, _)| *step)
                .collect();

            if ready.is_empty() {
                let stuck: Vec<String> = self
                    .deps
                    .keys()
                    .filter(|s| !placed.contains_key(*s))
                    .map(ToString::to_string)
                    .collect();
                return Err(Error::InvalidData(format!(
                    "emission steps form a cycle: {}",
                    stuck.join(", ")
                )));
            }

            for step in &ready {
                placed.insert(*step, waves.len());
            }
            waves.push(ready);
        }

        Ok(waves)
    }
}
