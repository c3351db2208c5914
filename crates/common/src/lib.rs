// slash-common: shared types for the Slash Reader workspace

pub mod document;
pub mod protocol;
