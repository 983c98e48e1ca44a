//! Symbol table management for labels

use super::{AssemblerError, Dependency, ErrorKind, Label};

/// Labels collected during the first pass.
///
/// A label defined by label math (`NAME = OTHER + 1`) stays unresolved until
/// [`resolve_dependencies`](SymbolTable::resolve_dependencies) runs, and
/// [`lookup`](SymbolTable::lookup) does not see it before then.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    labels: Vec<Label>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines `name` at `address`.
    pub fn define(&mut self, name: &str, address: u16, line: usize) -> Result<(), ErrorKind> {
        self.check_unique(name)?;

        self.labels.push(Label {
            name: name.to_string(),
            address,
            dependency: None,
            line,
        });
        Ok(())
    }

    /// Defines `name` as `dependency + offset`, resolved at the end of the
    /// first pass.
    pub fn define_relative(
        &mut self,
        name: &str,
        dependency: &str,
        offset: i32,
        address: u16,
        line: usize,
    ) -> Result<(), ErrorKind> {
        self.check_unique(name)?;
        if name == dependency {
            return Err(ErrorKind::SelfReferentialLabel(name.to_string()));
        }

        self.labels.push(Label {
            name: name.to_string(),
            address,
            dependency: Some(Dependency {
                label: dependency.to_string(),
                offset,
            }),
            line,
        });
        Ok(())
    }

    /// A resolved label by name.
    pub fn lookup(&self, name: &str) -> Option<&Label> {
        self.labels
            .iter()
            .find(|label| label.name == name && label.dependency.is_none())
    }

    /// Resolves label-math definitions. A definition may build on any other
    /// label, including a label-math definition further down the source.
    ///
    /// Definitions left unresolved fail with `MissingDependentLabel` when one
    /// of them names an undefined label, otherwise with `CircularLabel` for
    /// the first of them in source order.
    pub fn resolve_dependencies(&mut self) -> Result<(), AssemblerError> {
        loop {
            let mut progress = false;

            for index in 0..self.labels.len() {
                let Some(dependency) = self.labels[index].dependency.clone() else {
                    continue;
                };
                let Some(target) = self.lookup(&dependency.label).map(|label| label.address)
                else {
                    continue;
                };

                let label = &mut self.labels[index];
                label.address = (target as i32 + dependency.offset) as u16;
                label.dependency = None;
                progress = true;
            }

            if !progress {
                break;
            }
        }

        let mut unresolved = self
            .labels
            .iter()
            .filter_map(|label| Some((label, &label.dependency.as_ref()?.label)));

        let Some((first, _)) = unresolved.clone().next() else {
            return Ok(());
        };

        if let Some((label, dependency)) = unresolved
            .find(|(_, dependency)| !self.labels.iter().any(|other| &other.name == *dependency))
        {
            return Err(AssemblerError::at(
                label.line,
                ErrorKind::MissingDependentLabel {
                    label: label.name.clone(),
                    dependency: dependency.clone(),
                },
            ));
        }

        Err(AssemblerError::at(
            first.line,
            ErrorKind::CircularLabel(first.name.clone()),
        ))
    }

    pub fn into_labels(self) -> Vec<Label> {
        self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn check_unique(&self, name: &str) -> Result<(), ErrorKind> {
        if self.labels.iter().any(|label| label.name == name) {
            return Err(ErrorKind::DuplicateLabel(name.to_string()));
        }
        Ok(())
    }
}
