pub mod component_generator;
pub mod design_review;
pub mod style_guide;

pub use component_generator::*;
pub use design_review::*;
pub use style_guide::*;

/// Markdown bullet list, one line per item
pub(crate) fn bullets<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}
