// Org domain components.
//
// Structure
// - events.rs: closed event union with stable wire tags
// - state.rs: lifecycle write model (creation/removal slice only)
// - message_text.rs: localized message text templates and their write model

pub mod events;
pub mod message_text;
pub mod state;
