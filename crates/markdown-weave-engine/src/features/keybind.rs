//! `<keybind;key.jump>`, replaced by the key currently bound to an action.
//!
//! Bindings come from the host through a [`KeyBindingLookup`]. The lookup
//! runs while lexing; a key it does not know leaves the whole tag as plain
//! text.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::sync::Arc;

use markdown_weave_syntax::{
    Compiler, Element, MarkdownFeature, NamedColor, Node, NodeRegistrar, ParseRule, StringCursor,
    Token, TokenBuffer, TokenRegistrar, lex_fn,
};

const KEYBIND_PREFIX: &str = "<keybind;";

/// A host key binding, already translated for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub category: String,
    pub name: String,
    /// The key the action is bound to, e.g. `Space`.
    pub bound_key: String,
}

/// Resolves a binding's translation key to the binding.
pub trait KeyBindingLookup: Send + Sync {
    fn find(&self, translation_key: &str) -> Option<KeyBinding>;
}

impl<S: BuildHasher + Send + Sync> KeyBindingLookup for HashMap<String, KeyBinding, S> {
    fn find(&self, translation_key: &str) -> Option<KeyBinding> {
        self.get(translation_key).cloned()
    }
}

impl KeyBindingLookup for BTreeMap<String, KeyBinding> {
    fn find(&self, translation_key: &str) -> Option<KeyBinding> {
        self.get(translation_key).cloned()
    }
}

#[derive(Debug, Clone)]
struct KeybindToken {
    binding: KeyBinding,
    content: String,
}

impl Token for KeybindToken {
    fn content(&self) -> &str {
        &self.content
    }
}

#[derive(Debug)]
struct KeybindElement {
    binding: KeyBinding,
}

impl Element for KeybindElement {
    fn visit_start(&self, compiler: &mut dyn Compiler) {
        let tooltip = format!(
            "Category: {}\nKey Bind: {}",
            self.binding.category, self.binding.name
        );
        compiler.visit_style(&|style| {
            style
                .with_color(NamedColor::Gold)
                .with_tooltip(tooltip.as_str())
        });
        compiler.visit_text(&self.binding.bound_key);
    }

    fn visit_end(&self, compiler: &mut dyn Compiler) {
        compiler.visit_style_end();
    }
}

pub struct KeybindFeature {
    lookup: Arc<dyn KeyBindingLookup>,
}

impl std::fmt::Debug for KeybindFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeybindFeature").finish_non_exhaustive()
    }
}

impl KeybindFeature {
    pub fn new(lookup: impl KeyBindingLookup + 'static) -> Self {
        Self::from_shared(Arc::new(lookup))
    }

    pub fn from_shared(lookup: Arc<dyn KeyBindingLookup>) -> Self {
        Self { lookup }
    }
}

impl MarkdownFeature for KeybindFeature {
    fn name(&self) -> &str {
        "keybindings"
    }

    fn supports_compiler(&self, _compiler: &dyn Compiler) -> bool {
        true
    }

    fn register_tokens(&self, registrar: &mut dyn TokenRegistrar) {
        let lookup = Arc::clone(&self.lookup);
        registrar.register_token(
            lex_fn(move |cursor, tokens| lex_keybind(lookup.as_ref(), cursor, tokens)),
            '<',
        );
    }

    fn register_nodes(&self, registrar: &mut dyn NodeRegistrar) {
        registrar.register_node(ParseRule::for_token::<KeybindToken, _>(|_, keybind, _| {
            Node::new(KeybindElement {
                binding: keybind.binding,
            })
        }));
    }
}

fn lex_keybind(
    lookup: &dyn KeyBindingLookup,
    cursor: &mut StringCursor<'_>,
    tokens: &mut TokenBuffer,
) -> bool {
    let start = cursor.position();
    if !cursor.eat_str(KEYBIND_PREFIX) {
        return false;
    }
    let Some(key) = cursor.consume_until('>') else {
        return false;
    };
    let Some(binding) = lookup.find(key) else {
        log::debug!("no key binding for '{key}'");
        return false;
    };

    tokens.push(KeybindToken {
        binding,
        content: cursor.source()[start..cursor.position()].to_owned(),
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::trace;
    use pretty_assertions::assert_eq;

    fn bindings() -> BTreeMap<String, KeyBinding> {
        BTreeMap::from([(
            "key.jump".to_owned(),
            KeyBinding {
                category: "Movement".to_owned(),
                name: "Jump".to_owned(),
                bound_key: "Space".to_owned(),
            },
        )])
    }

    fn keybinds(input: &str) -> Vec<String> {
        trace(vec![Arc::new(KeybindFeature::new(bindings()))], input)
    }

    #[test]
    fn known_binding_shows_bound_key() {
        assert_eq!(
            keybinds("press <keybind;key.jump>!"),
            vec![
                r#"text "press ""#,
                r#"style color=gold tooltip="Category: Movement\nKey Bind: Jump""#,
                r#"text "Space""#,
                "end_style",
                r#"text "!""#,
            ]
        );
    }

    #[test]
    fn unknown_binding_is_text() {
        assert_eq!(
            keybinds("<keybind;key.fly>"),
            vec![r#"text "<keybind;key.fly>""#]
        );
    }

    #[test]
    fn unterminated_tag_is_text() {
        assert_eq!(keybinds("<keybind;key.jump"), vec![r#"text "<keybind;key.jump""#]);
    }

    #[test]
    fn hash_map_lookup() {
        let map: HashMap<String, KeyBinding> = bindings().into_iter().collect();
        assert_eq!(map.find("key.jump").map(|b| b.bound_key), Some("Space".to_owned()));
        assert_eq!(map.find("key.fly"), None);
    }
}
