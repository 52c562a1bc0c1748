pub mod cache;
pub mod skill_tree;

pub use cache::TtlCache;
pub use skill_tree::{parse_skill_tree, SkillTreeError, SkillTreeGenerator};
