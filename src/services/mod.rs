//! Service layer: orchestration over domain models and ports.

pub mod batch_dispatcher;
pub mod batch_status;
pub mod callback_reconciler;
pub mod demographic_sampler;
pub mod persona_generator;
pub mod persona_selection;

pub use batch_dispatcher::{BatchDispatcher, DispatchOptions, DispatchSummary};
pub use batch_status::{summarize, BatchStatusReport, SlotCounts};
pub use callback_reconciler::{CallbackReconciler, IngestOutcome};
pub use persona_generator::{GenerationOptions, GenerationOutcome, PersonaGenerator};
pub use persona_selection::{select_top_personas, SelectionOutcome};
