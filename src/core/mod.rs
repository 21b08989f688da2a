pub mod llm;
pub mod logging;
pub mod wizard;
