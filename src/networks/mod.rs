mod catalog;
mod theme;

pub use catalog::*;
pub use theme::{theme_for_chain, ChainTheme, ThemeTag};
