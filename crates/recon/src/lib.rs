pub mod gemini;
pub mod locator;
pub mod reconciler;
pub mod refine;
pub(crate) mod util;

pub use gemini::GeminiRefiner;
pub use locator::{FragmentMatch, Locator};
pub use reconciler::Reconciler;
pub use refine::{MockRefiner, NoRefine, RefineBackend, RefineError};
