//! Simulation projects: the creation wizard and the project list
//!
//! A project is a named target pollutant, a simulation kind and an ordered
//! workflow of digital operators. The wizard walks through three steps and
//! hands a finished draft to the catalog.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::simulation::ActiveProject;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationKind {
    ReactionKinetics,
    MolecularDynamics,
    ToxicityPrediction,
    TransportModel,
}

impl SimulationKind {
    pub const ALL: [SimulationKind; 4] = [
        SimulationKind::ReactionKinetics,
        SimulationKind::MolecularDynamics,
        SimulationKind::ToxicityPrediction,
        SimulationKind::TransportModel,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SimulationKind::ReactionKinetics => "Reaction kinetics",
            SimulationKind::MolecularDynamics => "Molecular dynamics",
            SimulationKind::ToxicityPrediction => "Toxicity prediction",
            SimulationKind::TransportModel => "Transport model",
        }
    }

    /// Entries of the kind dropdown, in display order
    pub fn options() -> Vec<SimulationKindOption> {
        Self::ALL
            .iter()
            .map(|kind| SimulationKindOption {
                kind: *kind,
                label: kind.label(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationKindOption {
    pub kind: SimulationKind,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    Quantum,
    Physics,
    Math,
    Ai,
    Data,
}

/// Compute tier shown on each workflow card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputeCost {
    High,
    Medium,
    Low,
    AiInference,
}

/// Entry of the digital operator palette
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigitalOperator {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: OperatorKind,
    pub description: &'static str,
    pub cost: ComputeCost,
}

/// Operators available to every workflow
pub static OPERATOR_CATALOG: [DigitalOperator; 6] = [
    DigitalOperator {
        id: "dn1",
        name: "Quantum chemistry (DFT)",
        kind: OperatorKind::Quantum,
        description: "HOMO-LUMO gap and reactive sites of the molecule",
        cost: ComputeCost::High,
    },
    DigitalOperator {
        id: "dn2",
        name: "Molecular dynamics (MD)",
        kind: OperatorKind::Physics,
        description: "Diffusion of the pollutant in the water phase",
        cost: ComputeCost::Medium,
    },
    DigitalOperator {
        id: "dn3",
        name: "Reaction kinetics solver",
        kind: OperatorKind::Math,
        description: "ODE solution of the degradation rate equation",
        cost: ComputeCost::Low,
    },
    DigitalOperator {
        id: "dn4",
        name: "QSAR toxicity evolution",
        kind: OperatorKind::Ai,
        description: "Toxicity trend of degradation intermediates",
        cost: ComputeCost::AiInference,
    },
    DigitalOperator {
        id: "dn5",
        name: "Multiphysics coupling (CFD)",
        kind: OperatorKind::Physics,
        description: "Flow field inside the reactor",
        cost: ComputeCost::High,
    },
    DigitalOperator {
        id: "dn6",
        name: "Experimental data fit",
        kind: OperatorKind::Data,
        description: "Correlation check against historical experiments",
        cost: ComputeCost::Low,
    },
];

pub fn find_operator(id: &str) -> Option<&'static DigitalOperator> {
    OPERATOR_CATALOG.iter().find(|op| op.id == id)
}

/// One placed operator; the same operator may appear several times
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowStep {
    pub instance_id: u64,
    pub operator: DigitalOperator,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectDraft {
    pub name: String,
    pub target: String,  // SMILES or common name
    pub kind: SimulationKind,
    pub steps: Vec<WorkflowStep>,
}

impl Default for ProjectDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            target: String::new(),
            kind: SimulationKind::ReactionKinetics,
            steps: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Basics,
    Workflow,
    Confirm,
}

/// What the wizard screen renders after every edit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardView {
    pub step: WizardStep,
    pub draft: ProjectDraft,
    pub can_advance: bool,
    pub summary: Vec<String>,
}

/// Three-step project creation form
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWizard {
    step: WizardStep,
    draft: ProjectDraft,
    next_instance_id: u64,
}

impl Default for ProjectWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Basics,
            draft: ProjectDraft::default(),
            next_instance_id: 1,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &ProjectDraft {
        &self.draft
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_target(&mut self, target: impl Into<String>) {
        self.draft.target = target.into();
    }

    pub fn set_kind(&mut self, kind: SimulationKind) {
        self.draft.kind = kind;
    }

    pub fn view(&self) -> WizardView {
        WizardView {
            step: self.step,
            draft: self.draft.clone(),
            can_advance: self.can_advance(),
            summary: self.summary(),
        }
    }

    pub fn can_advance(&self) -> bool {
        self.step != WizardStep::Confirm && !self.draft.name.trim().is_empty()
    }

    pub fn next(&mut self) -> Result<WizardStep> {
        if self.draft.name.trim().is_empty() {
            return Err(SimulationError::Wizard("project name is required".into()));
        }
        self.step = match self.step {
            WizardStep::Basics => WizardStep::Workflow,
            WizardStep::Workflow | WizardStep::Confirm => WizardStep::Confirm,
        };
        Ok(self.step)
    }

    pub fn back(&mut self) -> WizardStep {
        self.step = match self.step {
            WizardStep::Basics | WizardStep::Workflow => WizardStep::Basics,
            WizardStep::Confirm => WizardStep::Workflow,
        };
        self.step
    }

    /// Append an operator from the palette to the end of the workflow
    pub fn add_operator(&mut self, operator_id: &str) -> Result<&WorkflowStep> {
        let operator = find_operator(operator_id)
            .ok_or_else(|| SimulationError::Wizard(format!("unknown operator '{}'", operator_id)))?;

        let instance_id = self.next_instance_id;
        self.next_instance_id += 1;
        self.draft.steps.push(WorkflowStep {
            instance_id,
            operator: operator.clone(),
        });
        Ok(&self.draft.steps[self.draft.steps.len() - 1])
    }

    pub fn remove_step(&mut self, index: usize) -> Result<WorkflowStep> {
        if index >= self.draft.steps.len() {
            return Err(SimulationError::Wizard(format!(
                "no workflow step at position {}",
                index + 1
            )));
        }
        Ok(self.draft.steps.remove(index))
    }

    /// Numbered operator names, as listed on the confirm page
    pub fn summary(&self) -> Vec<String> {
        self.draft
            .steps
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}", i + 1, step.operator.name))
            .collect()
    }

    /// Hand over the draft. Only allowed from the confirm page.
    pub fn complete(self) -> Result<ProjectDraft> {
        if self.step != WizardStep::Confirm {
            return Err(SimulationError::Wizard("project is not confirmed yet".into()));
        }
        Ok(self.draft)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Completed,
    Running,
    Draft,
}

/// Row of the project list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationProject {
    pub id: String,
    pub name: String,
    pub status: ProjectStatus,
    pub kind_label: String,
    pub owner: String,
    pub date: Option<String>,
    pub steps: Vec<WorkflowStep>,
}

impl From<&SimulationProject> for ActiveProject {
    fn from(project: &SimulationProject) -> Self {
        ActiveProject {
            id: project.id.clone(),
            name: project.name.clone(),
        }
    }
}

/// In-memory list of simulation projects
#[derive(Debug, Clone, Serialize)]
pub struct ProjectCatalog {
    projects: Vec<SimulationProject>,
}

impl Default for ProjectCatalog {
    fn default() -> Self {
        Self::seeded()
    }
}

impl ProjectCatalog {
    pub fn empty() -> Self {
        Self { projects: Vec::new() }
    }

    /// Catalog pre-filled with the recent projects shown on first load
    pub fn seeded() -> Self {
        let seed = [
            ("SIM-2024-001", "PFOS photolysis pathway DFT", ProjectStatus::Completed, "Quantum chemistry", "Dr. Li", "2024-05-18"),
            ("SIM-2024-002", "Estuary antibiotic dispersion CFD", ProjectStatus::Running, "Multiphysics", "AI Agent", "2024-05-19"),
            ("SIM-2024-003", "Microcystin oxidation kinetics", ProjectStatus::Draft, "Kinetics", "Dr. Wang", "2024-05-20"),
        ];
        let projects = seed
            .iter()
            .map(|(id, name, status, kind, owner, date)| SimulationProject {
                id: id.to_string(),
                name: name.to_string(),
                status: *status,
                kind_label: kind.to_string(),
                owner: owner.to_string(),
                date: Some(date.to_string()),
                steps: Vec::new(),
            })
            .collect();
        Self { projects }
    }

    pub fn list(&self) -> &[SimulationProject] {
        &self.projects
    }

    pub fn get(&self, id: &str) -> Option<&SimulationProject> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Register a completed draft under the next sequential id
    pub fn register(&mut self, draft: ProjectDraft, owner: impl Into<String>) -> &SimulationProject {
        let next_seq = self
            .projects
            .iter()
            .filter_map(|p| p.id.rsplit('-').next()?.parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1;

        let project = SimulationProject {
            id: format!("SIM-2024-{:03}", next_seq),
            name: draft.name,
            status: ProjectStatus::Draft,
            kind_label: draft.kind.label().to_string(),
            owner: owner.into(),
            date: None,
            steps: draft.steps,
        };
        log::info!("[project] Registered {} '{}'", project.id, project.name);
        self.projects.push(project);
        &self.projects[self.projects.len() - 1]
    }

    pub fn set_status(&mut self, id: &str, status: ProjectStatus) -> bool {
        match self.projects.iter_mut().find(|p| p.id == id) {
            Some(project) => {
                project.status = status;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_required_to_advance() {
        let mut wizard = ProjectWizard::new();
        assert!(!wizard.can_advance());
        assert!(matches!(wizard.next(), Err(SimulationError::Wizard(_))));
        assert_eq!(wizard.step(), WizardStep::Basics);

        wizard.set_name("   ");
        assert!(wizard.next().is_err());

        wizard.set_name("C-109 photolysis kinetics");
        assert_eq!(wizard.next(), Ok(WizardStep::Workflow));
        assert_eq!(wizard.next(), Ok(WizardStep::Confirm));
        assert!(!wizard.can_advance());
        assert_eq!(wizard.back(), WizardStep::Workflow);
    }

    #[test]
    fn test_view_tracks_wizard() {
        let mut wizard = ProjectWizard::new();
        let view = wizard.view();
        assert_eq!(view.step, WizardStep::Basics);
        assert!(!view.can_advance);
        assert!(view.summary.is_empty());

        wizard.set_name("Carbamazepine by-products");
        wizard.add_operator("dn2").unwrap();
        let view = wizard.view();
        assert!(view.can_advance);
        assert_eq!(view.draft.name, "Carbamazepine by-products");
        assert_eq!(view.summary.len(), 1);

        wizard.next().unwrap();
        wizard.next().unwrap();
        assert!(!wizard.view().can_advance);
    }

    #[test]
    fn test_kind_options_follow_all() {
        let options = SimulationKind::options();
        assert_eq!(options.len(), SimulationKind::ALL.len());
        assert_eq!(options[0].kind, SimulationKind::ReactionKinetics);
        assert_eq!(options[3].label, "Transport model");
    }

    #[test]
    fn test_active_project_from_catalog_entry() {
        let catalog = ProjectCatalog::seeded();
        let active = ActiveProject::from(catalog.get("SIM-2024-001").unwrap());
        assert_eq!(active.id, "SIM-2024-001");
        assert_eq!(active.name, "PFOS photolysis pathway DFT");
    }

    #[test]
    fn test_workflow_editing() {
        let mut wizard = ProjectWizard::new();
        let first = wizard.add_operator("dn1").unwrap().instance_id;
        let second = wizard.add_operator("dn3").unwrap().instance_id;
        wizard.add_operator("dn1").unwrap();
        assert_ne!(first, second);
        assert!(wizard.add_operator("dn99").is_err());

        let removed = wizard.remove_step(1).unwrap();
        assert_eq!(removed.operator.id, "dn3");
        assert!(wizard.remove_step(5).is_err());

        assert_eq!(
            wizard.summary(),
            vec![
                "1. Quantum chemistry (DFT)".to_string(),
                "2. Quantum chemistry (DFT)".to_string(),
            ]
        );
    }

    #[test]
    fn test_complete_only_from_confirm() {
        let mut wizard = ProjectWizard::new();
        wizard.set_name("PFOA screening");
        wizard.next().unwrap();
        assert!(wizard.clone().complete().is_err());

        wizard.set_target("C8HF15O2");
        wizard.set_kind(SimulationKind::ToxicityPrediction);
        wizard.add_operator("dn4").unwrap();
        wizard.next().unwrap();

        let draft = wizard.complete().unwrap();
        assert_eq!(draft.kind, SimulationKind::ToxicityPrediction);
        assert_eq!(draft.steps.len(), 1);
    }

    #[test]
    fn test_catalog_registration() {
        let mut catalog = ProjectCatalog::seeded();
        assert_eq!(catalog.list().len(), 3);

        let draft = ProjectDraft {
            name: "Triclosan UV/TiO2".into(),
            ..Default::default()
        };
        let id = catalog.register(draft, "Dr. Zhao").id.clone();
        assert_eq!(id, "SIM-2024-004");
        assert_eq!(catalog.get(&id).unwrap().kind_label, "Reaction kinetics");

        assert!(catalog.set_status(&id, ProjectStatus::Running));
        assert_eq!(catalog.get(&id).unwrap().status, ProjectStatus::Running);
        assert!(!catalog.set_status("SIM-1999-001", ProjectStatus::Completed));

        let mut empty = ProjectCatalog::empty();
        assert_eq!(empty.register(ProjectDraft::default(), "x").id, "SIM-2024-001");
    }
}
