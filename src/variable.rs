//! Resolution of `{{key}}` interpolation tokens.
//!
//! Three scopes contribute keys: the fixed contact fields, the enclosing
//! flow's input variables, and the workspace's custom attributes. A key is
//! either *valued* (its text is substituted now) or merely *declared*
//! (resolvable, value supplied by the runtime later). Tokens whose key is
//! in no scope are left untouched and reported; resolution never fails and
//! never drops text.

use crate::attribute::{AttributeModel, AttributeRegistry};
use crate::graph::InputVariable;
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;

/// The contact fields that are always resolvable.
pub const CONTACT_FIELDS: [&str; 5] = [
    "contact.name",
    "contact.email",
    "contact.phone",
    "contact.company",
    "contact.location",
];

/// Outcome of resolving one string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Input text with every valued token substituted. Declared and
    /// unknown tokens keep their literal `{{key}}` form.
    pub text: String,
    /// Unique unresolvable keys, in order of first appearance.
    pub unknown: Vec<String>,
}

impl Resolution {
    pub fn is_clean(&self) -> bool {
        self.unknown.is_empty()
    }
}

/// Resolves interpolation tokens against a fixed set of scopes.
#[derive(Debug, Clone, Default)]
pub struct VariableResolver {
    values: AHashMap<String, String>,
    declared: AHashSet<String>,
}

/// Assembles a [`VariableResolver`] scope by scope.
#[derive(Debug, Clone, Default)]
pub struct VariableResolverBuilder {
    resolver: VariableResolver,
}

impl VariableResolverBuilder {
    /// Declares the fixed contact fields, without values.
    pub fn with_contact_fields(mut self) -> Self {
        for field in CONTACT_FIELDS {
            self.resolver.declared.insert(field.to_string());
        }
        self
    }

    /// Declares the contact fields and supplies the values the runtime
    /// already knows. Keys are the bare field names (`name`, `email`, ...).
    pub fn with_contact_values(mut self, values: &AHashMap<String, String>) -> Self {
        for field in CONTACT_FIELDS {
            self.resolver.declared.insert(field.to_string());
        }
        for (field, value) in values {
            self.resolver
                .values
                .insert(format!("contact.{}", field), value.clone());
        }
        self
    }

    /// Declares the enclosing flow's input variables.
    pub fn with_flow_inputs(mut self, inputs: &[InputVariable]) -> Self {
        for input in inputs {
            self.resolver.declared.insert(input.key.clone());
        }
        self
    }

    /// Supplies concrete values for flow inputs, declaring them as well.
    pub fn with_input_values(mut self, values: &AHashMap<String, String>) -> Self {
        for (key, value) in values {
            self.resolver.declared.insert(key.clone());
            self.resolver.values.insert(key.clone(), value.clone());
        }
        self
    }

    /// Declares custom attribute keys, optionally restricted to one model
    /// (e.g. a `set_attribute` node only sees its target model's keys).
    pub fn with_attributes(
        mut self,
        registry: &AttributeRegistry,
        model: Option<AttributeModel>,
    ) -> Self {
        for def in registry.iter(model) {
            self.resolver.declared.insert(def.key.clone());
        }
        self
    }

    pub fn build(self) -> VariableResolver {
        self.resolver
    }
}

impl VariableResolver {
    pub fn builder() -> VariableResolverBuilder {
        VariableResolverBuilder::default()
    }

    /// True when `key` is in any scope, valued or not.
    pub fn is_resolvable(&self, key: &str) -> bool {
        self.values.contains_key(key) || self.declared.contains(key)
    }

    /// Expands every `{{key}}` token in `text`.
    pub fn resolve(&self, text: &str) -> Resolution {
        let mut out = String::with_capacity(text.len());
        let mut unknown = Vec::new();
        let mut rest = text;

        while let Some(open) = rest.find("{{") {
            let after_open = &rest[open + 2..];
            let Some(close) = after_open.find("}}") else {
                // Unterminated token: keep the remainder verbatim.
                break;
            };
            out.push_str(&rest[..open]);

            let token = &rest[open..open + 2 + close + 2];
            let key = after_open[..close].trim();

            if let Some(value) = self.values.get(key) {
                out.push_str(value);
            } else {
                if !key.is_empty() && !self.declared.contains(key) {
                    unknown.push(key.to_string());
                }
                out.push_str(token);
            }
            rest = &rest[open + 2 + close + 2..];
        }
        out.push_str(rest);

        Resolution {
            text: out,
            unknown: unknown.into_iter().unique().collect(),
        }
    }

    /// Collects the unresolvable keys of `text` without rewriting it.
    pub fn unknown_keys(&self, text: &str) -> Vec<String> {
        self.resolve(text).unknown
    }
}
