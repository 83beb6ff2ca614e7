use crate::{
    error::ModelError,
    field::{FieldDescriptor, allowed::AllowedFields},
};
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

/// The searchable fields of one entity, in registration order.
///
/// Built once and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRegistry {
    entity: String,
    fields: Vec<FieldDescriptor>,
    index: HashMap<String, usize>,
}

/// Result of matching an allow-list against the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct AllowedSelection<'r> {
    pub fields: Vec<&'r FieldDescriptor>,
    /// Allowed names that are not registered
    pub unknown: Vec<String>,
}

impl FieldRegistry {
    pub fn new(
        entity: impl Into<String>,
        fields: impl IntoIterator<Item = FieldDescriptor>,
    ) -> Result<Self, ModelError> {
        let mut registry = FieldRegistry {
            entity: entity.into(),
            fields: Vec::new(),
            index: HashMap::new(),
        };

        for field in fields {
            if registry.index.contains_key(&field.name) {
                return Err(ModelError::DuplicateField(field.name));
            }
            registry
                .index
                .insert(field.name.clone(), registry.fields.len());
            registry.fields.push(field);
        }

        Ok(registry)
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up `key` if, and only if, the allow-list admits it.
    pub fn resolve(&self, key: &str, allowed: &AllowedFields) -> Option<&FieldDescriptor> {
        let key = key.trim();
        if allowed.contains(key) {
            self.get(key)
        } else {
            None
        }
    }

    /// Descriptors named by the allow-list, in allow-list order.
    pub fn select(&self, allowed: &AllowedFields) -> AllowedSelection<'_> {
        match allowed {
            AllowedFields::All => AllowedSelection {
                fields: self.fields.iter().collect(),
                unknown: Vec::new(),
            },
            AllowedFields::Only(names) => {
                let mut fields = Vec::with_capacity(names.len());
                let mut unknown = Vec::new();
                for name in names {
                    match self.get(name) {
                        Some(field) => fields.push(field),
                        None => unknown.push(name.clone()),
                    }
                }
                AllowedSelection { fields, unknown }
            }
        }
    }
}

/// Shared, swappable registry.
///
/// Readers take a snapshot and keep it for a whole compile call; writers
/// publish a complete replacement, so a reader never sees a half-updated
/// registry.
#[derive(Debug)]
pub struct RegistryHandle {
    current: RwLock<Arc<FieldRegistry>>,
}

impl RegistryHandle {
    pub fn new(registry: FieldRegistry) -> Self {
        RegistryHandle {
            current: RwLock::new(Arc::new(registry)),
        }
    }

    pub fn snapshot(&self) -> Arc<FieldRegistry> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the registry, returning the previous one.
    pub fn publish(&self, registry: FieldRegistry) -> Arc<FieldRegistry> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(registry))
    }
}
