pub mod chat;
mod errors;
pub mod experts;
pub mod filter;
pub mod forms;
pub mod inputs;
pub mod insurance;
pub mod loader;
mod params;
mod provenance;

pub use chat::{ChatExchange, ChatMessage, ChatRole, ChatSession};
pub use errors::SubmitError;
pub use experts::ExpertScreen;
pub use filter::{FilterCriteria, Filterable};
pub use forms::FormKind;
pub use inputs::InputMarketScreen;
pub use insurance::InsuranceScreen;
pub use loader::{LoadOutcome, Loader};
pub use params::{FallbackWrites, ScreenOptions};
pub use provenance::{DataOrigin, Provenance};
