//! Domain models with validation at the boundary
//!
//! Each entity module holds the stored record, the insertable `New*` row, the
//! GraphQL create/update inputs and the list filter. Create inputs apply
//! defaults and validate; update inputs merge into a loaded record which is
//! validated again before it is written back.

pub mod agent;
pub mod audience;
pub mod campaign;
pub mod client;
pub mod enums;
pub mod interaction;
pub mod lead;
pub mod pagination;
pub mod patch;
pub mod service;
pub mod stats;
pub mod template;
pub mod training;
pub mod user;
pub mod validation;

pub use agent::{AgentFilter, AiAgent, CreateAiAgentInput, NewAiAgent, UpdateAiAgentInput};
pub use audience::{
    CreateTargetAudienceInput, NewTargetAudience, TargetAudience, TargetAudienceFilter,
    UpdateTargetAudienceInput,
};
pub use campaign::{
    Campaign, CampaignFilter, CreateCampaignInput, NewCampaign, UpdateCampaignInput,
};
pub use client::{Client, ClientFilter, CreateClientInput, NewClient, UpdateClientInput};
pub use enums::{
    AgentStatus, CampaignStatus, Channel, ClientStatus, InteractionStatus, InteractionType,
    LeadStatus, TrainingStatus, UserRole,
};
pub use interaction::{
    CreateInteractionInput, Interaction, InteractionFilter, NewInteraction,
    UpdateInteractionInput,
};
pub use lead::{CreateLeadInput, Lead, LeadFilter, NewLead, UpdateLeadInput};
pub use pagination::Page;
pub use service::{CreateServiceInput, NewService, Service, ServiceFilter, UpdateServiceInput};
pub use stats::{
    AgentStats, AgentStatsFilter, CampaignMetrics, CampaignMetricsFilter,
    UpdateAgentStatsInput, UpdateCampaignMetricsInput, ALL_TIME,
};
pub use template::{
    CreateMessageTemplateInput, MessageTemplate, MessageTemplateFilter, NewMessageTemplate,
    UpdateMessageTemplateInput,
};
pub use training::{
    CreateTrainingModuleInput, CreateTrainingProgramInput, NewTrainingModule,
    NewTrainingProgram, TrainingModule, TrainingModuleFilter, TrainingProgram,
    TrainingProgramFilter, UpdateTrainingModuleInput, UpdateTrainingProgramInput,
};
pub use user::{CreateUserInput, NewUser, UpdateUserInput, User, UserFilter};
pub use validation::ValidationError;
