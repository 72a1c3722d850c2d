pub mod ai;
pub mod controller;
pub mod session;
pub mod settings;
pub mod templates;

pub use ai::provider::AiProvider;
pub use controller::{EnhanceError, EnhancementController, Phase, PhaseKind, RequestSnapshot};
pub use session::{EnhancerActor, EnhancerActorMessage, EnhancerEvent};
pub use settings::{Settings, SettingsManager};
pub use templates::{EnhancementTemplate, TemplateRegistry};
