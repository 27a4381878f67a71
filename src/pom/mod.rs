pub mod document;
pub mod model;
pub mod reactor;
pub mod xml;

pub use document::{DependencySection, DescriptorRewriter, Locator, PomDocument};
pub use model::{Dependency, ProjectModel};
pub use reactor::Reactor;
