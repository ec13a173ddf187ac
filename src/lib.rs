pub mod frontmatter;
pub mod page;
pub mod quiz;
