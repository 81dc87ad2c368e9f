//! Built-in tag plugins.

mod conditional;
mod estree;
mod for_each;
mod raw;

use std::collections::HashMap;
use std::sync::Arc;

pub use conditional::{ElseIfPlugin, ElsePlugin, IfPlugin};
pub use for_each::ForEachPlugin;
pub use raw::RawPlugin;

use crate::interpreter::TagPlugin;

/// The built-in tag plugins, keyed by element name.
pub(crate) fn builtin_tag_plugins() -> HashMap<String, Arc<dyn TagPlugin>> {
    let plugins: [(&str, Arc<dyn TagPlugin>); 5] = [
        ("If", Arc::new(IfPlugin)),
        ("ElseIf", Arc::new(ElseIfPlugin)),
        ("Else", Arc::new(ElsePlugin)),
        ("ForEach", Arc::new(ForEachPlugin)),
        ("Raw", Arc::new(RawPlugin)),
    ];
    plugins
        .into_iter()
        .map(|(name, plugin)| (name.to_string(), plugin))
        .collect()
}
