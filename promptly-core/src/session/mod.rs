pub mod actor;
pub mod events;
pub mod provider;

pub use actor::{EnhancerActor, EnhancerActorBuilder, EnhancerActorMessage};
pub use events::{EnhancerEvent, TemplateInfo};
pub use provider::create_active_provider;
