//! Session facade - the turn flow presentation callers drive.
//!
//! `visit` selects, composes and executes a step for an id. `choose` applies an
//! option's effects, runs its skill check if it has one, and visits the target.
//! The session owns the single random source for its player.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use story_rules::{PlayerState, SkillCheck, Step};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::executor::{AppliedMutation, StepExecutor};
use crate::library::ContentLibrary;
use crate::matcher::StepMatcher;
use crate::options::{OptionGate, OptionState};
use crate::patches::PatchComposer;
use crate::render::render;
use crate::skill_check::SkillResolver;

/// An option as the player sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    /// Position in the composed step's option list.
    pub index: usize,
    pub label: String,
    pub state: OptionState,
}

impl OptionView {
    pub fn is_shown(&self) -> bool {
        self.state != OptionState::Hidden
    }
}

/// An executed, composed step ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    pub step: Step,
    pub text: String,
    pub log_entry: Option<String>,
    pub options: Vec<OptionView>,
    pub mutations: Vec<AppliedMutation>,
}

impl Scene {
    /// Options that should be displayed, disabled or not.
    pub fn visible_options(&self) -> impl Iterator<Item = &OptionView> {
        self.options.iter().filter(|o| o.is_shown())
    }
}

/// Result of visiting an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit {
    Scene(Box<Scene>),
    /// Steps exist for the id but none match the player: a coverage gap.
    NothingHere { id: String },
    /// No step carries the id at all.
    Broken { id: String },
    /// The chosen option had no target.
    Ended,
}

impl Visit {
    pub fn scene(&self) -> Option<&Scene> {
        match self {
            Visit::Scene(scene) => Some(scene),
            _ => None,
        }
    }
}

/// Result of choosing an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub mutations: Vec<AppliedMutation>,
    pub check: Option<SkillCheck>,
    /// The id navigated to, if any.
    pub target: Option<String>,
    pub visit: Visit,
}

/// One player's session over shared content.
pub struct Session<'l, R: Rng = ChaCha8Rng> {
    library: &'l ContentLibrary,
    config: EngineConfig,
    rng: R,
}

impl<'l> Session<'l, ChaCha8Rng> {
    /// A session with a reproducible random source.
    pub fn seeded(library: &'l ContentLibrary, config: EngineConfig, seed: u64) -> Self {
        Self::new(library, config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<'l, R: Rng> Session<'l, R> {
    pub fn new(library: &'l ContentLibrary, config: EngineConfig, rng: R) -> Self {
        Self { library, config, rng }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn library(&self) -> &'l ContentLibrary {
        self.library
    }

    /// Select, compose and execute the step for `id`.
    pub fn visit(&mut self, id: &str, state: &mut PlayerState) -> Visit {
        if !self.library.has_id(id) {
            tracing::warn!(id, "reference to unknown id");
            return Visit::Broken { id: id.to_string() };
        }

        let matcher = StepMatcher::new(&self.config);
        let Some(base) = matcher.select_step(id, state, self.library.steps_for(id), &mut self.rng) else {
            return Visit::NothingHere { id: id.to_string() };
        };

        let composer = PatchComposer::new(&self.config);
        let step = composer
            .compose(base, self.library.patches_for(id), state)
            .into_owned();

        let execution = StepExecutor::new(&self.config).execute(&step, state, &mut self.rng);
        let options = self.option_views(&step, state);

        Visit::Scene(Box::new(Scene {
            step,
            text: execution.text,
            log_entry: execution.log_entry,
            options,
            mutations: execution.mutations,
        }))
    }

    /// Current presentation of every option on a step.
    pub fn option_views(&self, step: &Step, state: &PlayerState) -> Vec<OptionView> {
        let gate = OptionGate::new(&self.config);
        step.options
            .iter()
            .enumerate()
            .map(|(index, option)| OptionView {
                index,
                label: render(&option.label, state.variables()),
                state: gate.state_of(option, state),
            })
            .collect()
    }

    /// Pick option `index` on `scene`'s step.
    pub fn choose(&mut self, scene: &Scene, index: usize, state: &mut PlayerState) -> EngineResult<Choice> {
        let option = scene
            .step
            .options
            .get(index)
            .ok_or(EngineError::OptionOutOfRange {
                index,
                available: scene.step.options.len(),
            })?;

        if !OptionGate::new(&self.config).is_available(option, state) {
            return Err(EngineError::OptionUnavailable {
                label: option.label.clone(),
            });
        }

        let mutations = StepExecutor::new(&self.config).apply_mutations(option.mutations(), state);

        let (check, target) = if option.has_skill_check() {
            let Some(dc) = option.dc else {
                tracing::warn!(label = %option.label, "skill check without a DC");
                return Ok(Choice {
                    mutations,
                    check: None,
                    target: None,
                    visit: Visit::Broken {
                        id: scene.step.id.clone(),
                    },
                });
            };
            let check = SkillResolver::new(&self.config).roll(&option.skill, dc, state, &mut self.rng);
            let target = if check.success {
                option.pass.clone()
            } else {
                option.fail.clone()
            };
            (Some(check), target)
        } else {
            (None, option.pass.clone())
        };

        let visit = match &target {
            Some(id) => self.visit(id, state),
            None if check.as_ref().is_some_and(|c| !c.success) => {
                tracing::warn!(label = %option.label, "failed check without a fail target");
                Visit::Broken {
                    id: scene.step.id.clone(),
                }
            }
            None => Visit::Ended,
        };

        Ok(Choice {
            mutations,
            check,
            target,
            visit,
        })
    }
}
